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

//! Customers and employees.
//!
//! Both are [`User`]s distinguished by their [`Role`]. Customers borrow and
//! return books; employees stock and unstock them. Every operation takes the
//! library and book it touches explicitly and checks that the user belongs
//! to that library. The operations are reached through
//! [`Network`](crate::Network), which also settles loans written off when a
//! shelf is closed.

use crate::base::{Isbn, LibraryId, UserId};
use crate::book::Book;
use crate::library::Library;
use crate::LibraryError;
use std::fmt;

/// One borrowed copy, tied to the shelf it was lent from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    pub library: LibraryId,
    pub isbn: Isbn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Customer {
        /// Outstanding loans, one entry per copy held.
        borrowed: Vec<Loan>,
    },
    Employee {
        position: String,
        salary: u32,
    },
}

#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    name: String,
    library: Option<LibraryId>,
    role: Role,
}

impl User {
    pub fn customer(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            library: None,
            role: Role::Customer {
                borrowed: Vec::new(),
            },
        }
    }

    pub fn employee(
        id: UserId,
        name: impl Into<String>,
        position: impl Into<String>,
        salary: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            library: None,
            role: Role::Employee {
                position: position.into(),
                salary,
            },
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The library this user is registered with or employed by.
    pub fn library(&self) -> Option<LibraryId> {
        self.library
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn is_customer(&self) -> bool {
        matches!(self.role, Role::Customer { .. })
    }

    pub fn is_employee(&self) -> bool {
        matches!(self.role, Role::Employee { .. })
    }

    /// Outstanding loans. Always empty for employees.
    pub fn borrowed_books(&self) -> &[Loan] {
        match &self.role {
            Role::Customer { borrowed } => borrowed,
            Role::Employee { .. } => &[],
        }
    }

    /// Number of copies of `isbn` this user holds from `library`.
    pub fn loans(&self, library: LibraryId, isbn: &Isbn) -> usize {
        self.borrowed_books()
            .iter()
            .filter(|loan| loan.library == library && loan.isbn == *isbn)
            .count()
    }

    pub fn position(&self) -> Option<&str> {
        match &self.role {
            Role::Employee { position, .. } => Some(position),
            Role::Customer { .. } => None,
        }
    }

    pub fn salary(&self) -> Option<u32> {
        match self.role {
            Role::Employee { salary, .. } => Some(salary),
            Role::Customer { .. } => None,
        }
    }

    pub(crate) fn set_library(&mut self, library: LibraryId) {
        self.library = Some(library);
    }

    /// Drops every loan of `isbn` lent by `library`. Returns how many were dropped.
    pub(crate) fn write_off(&mut self, library: LibraryId, isbn: &Isbn) -> usize {
        let Role::Customer { borrowed } = &mut self.role else {
            return 0;
        };
        let before = borrowed.len();
        borrowed.retain(|loan| !(loan.library == library && loan.isbn == *isbn));
        before - borrowed.len()
    }

    /// Fails unless this user belongs to `library`.
    fn check_member(&self, library: &Library) -> Result<(), LibraryError> {
        match self.library {
            Some(id) if id == library.id() => Ok(()),
            _ => Err(LibraryError::NotRegistered),
        }
    }

    /// Borrows one copy of `book` from `library`.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::NotACustomer`] - User is an employee.
    /// - [`LibraryError::NotRegistered`] - User is not registered with `library`.
    /// - [`LibraryError::NotStocked`] - `library` does not stock `book`.
    /// - [`LibraryError::NoCopiesAvailable`] - Every copy in `library` is on loan.
    pub(crate) fn take_book(
        &mut self,
        library: &Library,
        book: &mut Book,
    ) -> Result<(), LibraryError> {
        self.check_member(library)?;
        let Role::Customer { borrowed } = &mut self.role else {
            return Err(LibraryError::NotACustomer);
        };
        if !library.stocks(book.isbn()) {
            return Err(LibraryError::NotStocked);
        }
        book.lend(library.id())?;
        borrowed.push(Loan {
            library: library.id(),
            isbn: book.isbn().clone(),
        });
        Ok(())
    }

    /// Returns one copy of `book` borrowed from `library`.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::NotACustomer`] - User is an employee.
    /// - [`LibraryError::NotRegistered`] - User is not registered with `library`.
    /// - [`LibraryError::NotBorrowed`] - User holds no copy of `book` lent by
    ///   `library`, including loans written off when the book was removed.
    pub(crate) fn return_book(
        &mut self,
        library: &Library,
        book: &mut Book,
    ) -> Result<(), LibraryError> {
        self.check_member(library)?;
        let Role::Customer { borrowed } = &mut self.role else {
            return Err(LibraryError::NotACustomer);
        };
        let position = borrowed
            .iter()
            .position(|loan| loan.library == library.id() && loan.isbn == *book.isbn())
            .ok_or(LibraryError::NotBorrowed)?;
        book.restore(library.id())?;
        borrowed.remove(position);
        Ok(())
    }

    /// Stocks `count` copies of `book` in `library`.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::NotAnEmployee`] - User is a customer.
    /// - [`LibraryError::NotRegistered`] - User does not work at `library`.
    /// - [`LibraryError::AlreadyStocked`] - `library` already stocks `book`.
    /// - [`LibraryError::InvalidCount`] - `count` is zero.
    /// - [`LibraryError::InsufficientCopies`] - `count` exceeds the book's pool.
    pub(crate) fn add_book(
        &self,
        library: &mut Library,
        book: &mut Book,
        count: u32,
    ) -> Result<(), LibraryError> {
        if !self.is_employee() {
            return Err(LibraryError::NotAnEmployee);
        }
        self.check_member(library)?;
        if library.stocks(book.isbn()) {
            return Err(LibraryError::AlreadyStocked);
        }
        book.stock(library.id(), count)?;
        library.push_book(book.isbn().clone());
        Ok(())
    }

    /// Removes `book` from `library`, returning its copies to the pool.
    ///
    /// Outstanding loans from the closed shelf must then be written off with
    /// [`User::write_off`] on every customer.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::NotAnEmployee`] - User is a customer.
    /// - [`LibraryError::NotRegistered`] - User does not work at `library`.
    /// - [`LibraryError::NotStocked`] - `library` does not stock `book`.
    pub(crate) fn remove_book(
        &self,
        library: &mut Library,
        book: &mut Book,
    ) -> Result<(), LibraryError> {
        if !self.is_employee() {
            return Err(LibraryError::NotAnEmployee);
        }
        self.check_member(library)?;
        if !library.stocks(book.isbn()) {
            return Err(LibraryError::NotStocked);
        }
        book.unstock(library.id())?;
        library.remove_book(book.isbn());
        Ok(())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.role {
            Role::Customer { borrowed } => {
                let titles: Vec<&str> = borrowed.iter().map(|loan| loan.isbn.as_str()).collect();
                write!(f, "Customer('{}', '{:?}')", self.name, titles)
            }
            Role::Employee { position, salary } => {
                write!(f, "Employee('{}', '{}', '{}')", self.name, position, salary)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Library, Book, User, User) {
        let mut library = Library::new(LibraryId(1), "Best Library");
        let book = Book::new(
            "Noel Papa",
            "Santa Claus",
            Isbn::parse("ISBN 0-061-96436-1").unwrap(),
            10,
        );
        let mut dave = User::employee(UserId(1), "Dave", "Administrator", 500);
        let mut adam = User::customer(UserId(2), "Adam");
        library.hire_employee(&mut dave).unwrap();
        library.register_user(&mut adam).unwrap();
        (library, book, dave, adam)
    }

    #[test]
    fn role_accessors() {
        let (_, _, dave, adam) = setup();
        assert!(dave.is_employee());
        assert_eq!(dave.position(), Some("Administrator"));
        assert_eq!(dave.salary(), Some(500));
        assert!(dave.borrowed_books().is_empty());
        assert!(adam.is_customer());
        assert_eq!(adam.position(), None);
        assert_eq!(adam.salary(), None);
    }

    #[test]
    fn customer_cannot_stock_books() {
        let (mut library, mut book, _, adam) = setup();
        assert_eq!(
            adam.add_book(&mut library, &mut book, 1),
            Err(LibraryError::NotAnEmployee)
        );
        assert_eq!(
            adam.remove_book(&mut library, &mut book),
            Err(LibraryError::NotAnEmployee)
        );
    }

    #[test]
    fn employee_cannot_borrow() {
        let (mut library, mut book, mut dave, _) = setup();
        dave.add_book(&mut library, &mut book, 2).unwrap();
        assert_eq!(
            dave.take_book(&library, &mut book),
            Err(LibraryError::NotACustomer)
        );
    }

    #[test]
    fn unregistered_users_are_rejected() {
        let (mut library, mut book, _, _) = setup();
        let stranger = User::employee(UserId(9), "Kevin", "Manager", 1500);
        let mut walk_in = User::customer(UserId(10), "Eve");
        assert_eq!(
            stranger.add_book(&mut library, &mut book, 1),
            Err(LibraryError::NotRegistered)
        );
        assert_eq!(
            walk_in.take_book(&library, &mut book),
            Err(LibraryError::NotRegistered)
        );
    }

    #[test]
    fn add_book_twice_is_rejected_without_leaking_copies() {
        let (mut library, mut book, dave, _) = setup();
        dave.add_book(&mut library, &mut book, 5).unwrap();
        assert_eq!(
            dave.add_book(&mut library, &mut book, 3),
            Err(LibraryError::AlreadyStocked)
        );
        assert_eq!(book.total_copies_available(), 5);
        assert_eq!(book.copies(library.id()), Some(5));
        assert_eq!(library.books().len(), 1);
    }

    #[test]
    fn take_and_return_track_borrowed_list() {
        let (mut library, mut book, dave, mut adam) = setup();
        dave.add_book(&mut library, &mut book, 2).unwrap();

        adam.take_book(&library, &mut book).unwrap();
        adam.take_book(&library, &mut book).unwrap();
        assert_eq!(adam.borrowed_books().len(), 2);
        assert_eq!(
            adam.take_book(&library, &mut book),
            Err(LibraryError::NoCopiesAvailable)
        );
        assert_eq!(adam.borrowed_books().len(), 2);

        adam.return_book(&library, &mut book).unwrap();
        assert_eq!(adam.borrowed_books().len(), 1);
        assert_eq!(book.copies_available(library.id()), Some(1));
    }

    #[test]
    fn return_without_loan_is_rejected() {
        let (mut library, mut book, dave, mut adam) = setup();
        dave.add_book(&mut library, &mut book, 2).unwrap();
        assert_eq!(
            adam.return_book(&library, &mut book),
            Err(LibraryError::NotBorrowed)
        );
    }

    #[test]
    fn loans_record_the_lending_library() {
        let (mut library, mut book, dave, mut adam) = setup();
        dave.add_book(&mut library, &mut book, 2).unwrap();
        adam.take_book(&library, &mut book).unwrap();

        assert_eq!(
            adam.borrowed_books(),
            &[Loan {
                library: library.id(),
                isbn: book.isbn().clone(),
            }]
        );
        assert_eq!(adam.loans(library.id(), book.isbn()), 1);
        assert_eq!(adam.loans(LibraryId(2), book.isbn()), 0);
    }

    #[test]
    fn write_off_drops_only_matching_loans() {
        let (mut library, mut book, dave, mut adam) = setup();
        dave.add_book(&mut library, &mut book, 3).unwrap();
        adam.take_book(&library, &mut book).unwrap();
        adam.take_book(&library, &mut book).unwrap();

        assert_eq!(adam.write_off(LibraryId(2), book.isbn()), 0);
        assert_eq!(adam.write_off(library.id(), book.isbn()), 2);
        assert!(adam.borrowed_books().is_empty());
        assert_eq!(dave.clone().write_off(library.id(), book.isbn()), 0);
    }

    #[test]
    fn display_by_role() {
        let (mut library, mut book, dave, mut adam) = setup();
        assert_eq!(dave.to_string(), "Employee('Dave', 'Administrator', '500')");
        assert_eq!(adam.to_string(), "Customer('Adam', '[]')");

        dave.add_book(&mut library, &mut book, 1).unwrap();
        adam.take_book(&library, &mut book).unwrap();
        assert_eq!(
            adam.to_string(),
            "Customer('Adam', '[\"ISBN 0-061-96436-1\"]')"
        );
    }
}
