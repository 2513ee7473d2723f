// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Error types for inventory operations.

use thiserror::Error;

/// Inventory and lending errors.
///
/// Every fallible operation leaves the network unchanged when it returns one
/// of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    /// ISBN does not match `ISBN D-DDD-DDDDD-D`
    #[error("invalid ISBN (expected `ISBN D-DDD-DDDDD-D`)")]
    InvalidIsbn,

    /// Copy count is zero or would overflow
    #[error("invalid copy count")]
    InvalidCount,

    /// Requested copies exceed the book's available pool
    #[error("there are not enough copies")]
    InsufficientCopies,

    /// Per-library copy adjustments require the book to have been stocked first
    #[error("no copies of this book have been added to a library yet")]
    CopiesNotAdded,

    /// Library does not stock the book
    #[error("book is not stocked by this library")]
    NotStocked,

    /// Library already stocks the book
    #[error("book is already stocked by this library")]
    AlreadyStocked,

    /// Every copy in the library is on loan
    #[error("no copies available to lend")]
    NoCopiesAvailable,

    /// Customer has not borrowed the book
    #[error("book was not borrowed by this customer")]
    NotBorrowed,

    /// Customer still holds copies lent by another library
    #[error("customer has outstanding loans from another library")]
    LoansOutstanding,

    /// User is not registered with, or employed by, any library
    #[error("user is not registered with a library")]
    NotRegistered,

    /// Operation is reserved for customers
    #[error("user is not a customer")]
    NotACustomer,

    /// Operation is reserved for employees
    #[error("user is not an employee")]
    NotAnEmployee,

    /// A book with the same ISBN is already catalogued
    #[error("duplicate ISBN")]
    DuplicateBook,

    /// Referenced ISBN is not catalogued
    #[error("book not found")]
    BookNotFound,

    /// Referenced library does not exist
    #[error("library not found")]
    LibraryNotFound,

    /// Referenced user does not exist
    #[error("user not found")]
    UserNotFound,
}

#[cfg(test)]
mod tests {
    use super::LibraryError;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            LibraryError::InvalidIsbn.to_string(),
            "invalid ISBN (expected `ISBN D-DDD-DDDDD-D`)"
        );
        assert_eq!(LibraryError::InvalidCount.to_string(), "invalid copy count");
        assert_eq!(
            LibraryError::InsufficientCopies.to_string(),
            "there are not enough copies"
        );
        assert_eq!(
            LibraryError::NotStocked.to_string(),
            "book is not stocked by this library"
        );
        assert_eq!(
            LibraryError::NoCopiesAvailable.to_string(),
            "no copies available to lend"
        );
        assert_eq!(
            LibraryError::NotBorrowed.to_string(),
            "book was not borrowed by this customer"
        );
        assert_eq!(
            LibraryError::LoansOutstanding.to_string(),
            "customer has outstanding loans from another library"
        );
        assert_eq!(LibraryError::NotAnEmployee.to_string(), "user is not an employee");
        assert_eq!(LibraryError::DuplicateBook.to_string(), "duplicate ISBN");
        assert_eq!(LibraryError::LibraryNotFound.to_string(), "library not found");
    }

    #[test]
    fn errors_are_cloneable() {
        let error = LibraryError::InsufficientCopies;
        let cloned = error.clone();
        assert_eq!(error, cloned);
    }
}
