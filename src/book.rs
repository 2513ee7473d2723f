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

//! Book inventory bookkeeping.
//!
//! A [`Book`] owns a global pool of copies and a per-library ledger. Copies
//! move between the pool and a library's shelf; loans only touch the shelf.
//!
//! ```text
//!   pool (total_copies_available) ──stock / increase_copies──► shelf[L].copies
//!         ▲                                                     shelf[L].available
//!         └─────────────unstock / decrease_copies───────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use library_network_rs::{Book, Isbn};
//!
//! let isbn = Isbn::parse("ISBN 0-061-96436-1").unwrap();
//! let mut book = Book::new("Noel Papa", "Santa Claus", isbn, 10);
//! book.increase_total_copies(5).unwrap();
//! assert_eq!(book.total_copies(), 15);
//! assert_eq!(book.total_copies_available(), 15);
//! ```

use crate::base::{Isbn, LibraryId};
use crate::library::Library;
use crate::LibraryError;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Copies of a book held by a single library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Shelf {
    copies: u32,
    available: u32,
}

/// A catalogued title with its global and per-library copy counts.
#[derive(Debug, Clone)]
pub struct Book {
    title: String,
    author: String,
    isbn: Isbn,
    total_copies: u32,
    /// Copies not allocated to any library.
    total_copies_available: u32,
    ledger: BTreeMap<LibraryId, Shelf>,
    /// Set once any library stocks the book; never cleared.
    copies_added: bool,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: Isbn,
        total_copies: u32,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn,
            total_copies,
            total_copies_available: total_copies,
            ledger: BTreeMap::new(),
            copies_added: false,
        }
    }

    /// Returns `true` if `isbn` is a well-formed `ISBN D-DDD-DDDDD-D` string.
    pub fn validate_isbn(isbn: &str) -> bool {
        Isbn::is_valid(isbn)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub fn total_copies(&self) -> u32 {
        self.total_copies
    }

    pub fn total_copies_available(&self) -> u32 {
        self.total_copies_available
    }

    pub fn copies_added(&self) -> bool {
        self.copies_added
    }

    /// Copies held by `library`, or `None` if it does not stock the book.
    pub fn copies(&self, library: LibraryId) -> Option<u32> {
        self.ledger.get(&library).map(|shelf| shelf.copies)
    }

    /// Copies `library` can currently lend, or `None` if it does not stock the book.
    pub fn copies_available(&self, library: LibraryId) -> Option<u32> {
        self.ledger.get(&library).map(|shelf| shelf.available)
    }

    /// Libraries with a ledger entry, in id order.
    pub fn libraries(&self) -> impl Iterator<Item = LibraryId> + '_ {
        self.ledger.keys().copied()
    }

    /// Sum of copies allocated to libraries.
    pub fn allocated(&self) -> u32 {
        self.ledger.values().map(|shelf| shelf.copies).sum()
    }

    /// Human-readable availability of this book in `library`.
    pub fn check_availability(&self, library: &Library) -> String {
        match self.copies_available(library.id()) {
            Some(available) if library.stocks(&self.isbn) => {
                format!("There are {available} copies available.")
            }
            _ => "There is no such book in this library.".to_owned(),
        }
    }

    /// Moves `value` copies from the pool onto `library`'s shelf.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::InvalidCount`] - `value` is zero.
    /// - [`LibraryError::CopiesNotAdded`] - No library has stocked the book yet.
    /// - [`LibraryError::NotStocked`] - `library` has no ledger entry.
    /// - [`LibraryError::InsufficientCopies`] - `value` exceeds the pool.
    pub fn increase_copies(&mut self, library: LibraryId, value: u32) -> Result<(), LibraryError> {
        if value == 0 {
            return Err(LibraryError::InvalidCount);
        }
        if !self.copies_added {
            return Err(LibraryError::CopiesNotAdded);
        }
        if value > self.total_copies_available {
            return Err(LibraryError::InsufficientCopies);
        }
        let shelf = self
            .ledger
            .get_mut(&library)
            .ok_or(LibraryError::NotStocked)?;
        shelf.copies += value;
        shelf.available += value;
        self.total_copies_available -= value;
        self.assert_invariants();
        Ok(())
    }

    /// Returns `value` lendable copies from `library`'s shelf to the pool.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::InvalidCount`] - `value` is zero.
    /// - [`LibraryError::CopiesNotAdded`] - No library has stocked the book yet.
    /// - [`LibraryError::NotStocked`] - `library` has no ledger entry.
    /// - [`LibraryError::InsufficientCopies`] - `value` exceeds the copies `library` can lend.
    pub fn decrease_copies(&mut self, library: LibraryId, value: u32) -> Result<(), LibraryError> {
        if value == 0 {
            return Err(LibraryError::InvalidCount);
        }
        if !self.copies_added {
            return Err(LibraryError::CopiesNotAdded);
        }
        let shelf = self
            .ledger
            .get_mut(&library)
            .ok_or(LibraryError::NotStocked)?;
        if value > shelf.available {
            return Err(LibraryError::InsufficientCopies);
        }
        shelf.copies -= value;
        shelf.available -= value;
        self.total_copies_available += value;
        self.assert_invariants();
        Ok(())
    }

    /// Acquires `value` new copies into the pool.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::InvalidCount`] if `value` is zero or the total would overflow.
    pub fn increase_total_copies(&mut self, value: u32) -> Result<(), LibraryError> {
        if value == 0 {
            return Err(LibraryError::InvalidCount);
        }
        let total = self
            .total_copies
            .checked_add(value)
            .ok_or(LibraryError::InvalidCount)?;
        self.total_copies = total;
        self.total_copies_available += value;
        self.assert_invariants();
        Ok(())
    }

    /// Discards `value` copies from the pool.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::InvalidCount`] - `value` is zero.
    /// - [`LibraryError::InsufficientCopies`] - `value` exceeds the pool.
    pub fn decrease_total_copies(&mut self, value: u32) -> Result<(), LibraryError> {
        if value == 0 {
            return Err(LibraryError::InvalidCount);
        }
        if value > self.total_copies_available {
            return Err(LibraryError::InsufficientCopies);
        }
        self.total_copies -= value;
        self.total_copies_available -= value;
        self.assert_invariants();
        Ok(())
    }

    /// Opens a shelf of `count` copies in `library`, taken from the pool.
    pub(crate) fn stock(&mut self, library: LibraryId, count: u32) -> Result<(), LibraryError> {
        if count == 0 {
            return Err(LibraryError::InvalidCount);
        }
        if self.ledger.contains_key(&library) {
            return Err(LibraryError::AlreadyStocked);
        }
        if count > self.total_copies_available {
            return Err(LibraryError::InsufficientCopies);
        }
        self.total_copies_available -= count;
        self.ledger.insert(
            library,
            Shelf {
                copies: count,
                available: count,
            },
        );
        self.copies_added = true;
        self.assert_invariants();
        Ok(())
    }

    /// Closes `library`'s shelf and returns all of its copies to the pool.
    ///
    /// Copies on loan are returned too; the shelf is gone so the loans can no
    /// longer be settled. Returns the number of copies released.
    pub(crate) fn unstock(&mut self, library: LibraryId) -> Result<u32, LibraryError> {
        let shelf = self
            .ledger
            .remove(&library)
            .ok_or(LibraryError::NotStocked)?;
        self.total_copies_available += shelf.copies;
        self.assert_invariants();
        Ok(shelf.copies)
    }

    /// Lends one copy from `library`'s shelf.
    pub(crate) fn lend(&mut self, library: LibraryId) -> Result<(), LibraryError> {
        let shelf = self
            .ledger
            .get_mut(&library)
            .ok_or(LibraryError::NotStocked)?;
        if shelf.available == 0 {
            return Err(LibraryError::NoCopiesAvailable);
        }
        shelf.available -= 1;
        self.assert_invariants();
        Ok(())
    }

    /// Takes back one lent copy onto `library`'s shelf.
    ///
    /// Callers must hold a loan recorded against this shelf; loans are purged
    /// when the shelf is closed, so a live loan always has a lent copy here.
    pub(crate) fn restore(&mut self, library: LibraryId) -> Result<(), LibraryError> {
        let shelf = self
            .ledger
            .get_mut(&library)
            .ok_or(LibraryError::NotStocked)?;
        shelf.available += 1;
        self.assert_invariants();
        Ok(())
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.ledger.values().all(|shelf| shelf.available <= shelf.copies),
            "Invariant violated: a shelf lends more copies than it holds: {:?}",
            self.ledger
        );
        debug_assert_eq!(
            u64::from(self.total_copies_available) + u64::from(self.allocated()),
            u64::from(self.total_copies),
            "Invariant violated: pool plus allocated copies must equal total copies"
        );
    }

    /// Ledger rendered as `library=copies/available` pairs.
    fn ledger_summary(&self) -> String {
        self.ledger
            .iter()
            .map(|(library, shelf)| format!("{library}={}/{}", shelf.copies, shelf.available))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Book('{}', '{}', '{}')", self.title, self.author, self.isbn)
    }
}

impl Serialize for Book {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Book", 7)?;
        state.serialize_field("isbn", &self.isbn)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("author", &self.author)?;
        state.serialize_field("total_copies", &self.total_copies)?;
        state.serialize_field("total_copies_available", &self.total_copies_available)?;
        state.serialize_field("allocated", &self.allocated())?;
        state.serialize_field("libraries", &self.ledger_summary())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const L1: LibraryId = LibraryId(1);
    const L2: LibraryId = LibraryId(2);

    fn book(total: u32) -> Book {
        Book::new(
            "Noel Papa",
            "Santa Claus",
            Isbn::parse("ISBN 0-061-96436-1").unwrap(),
            total,
        )
    }

    // === Shelf Internal Tests ===

    #[test]
    fn stock_moves_copies_from_pool() {
        let mut book = book(10);
        book.stock(L1, 4).unwrap();
        assert_eq!(book.total_copies_available(), 6);
        assert_eq!(book.copies(L1), Some(4));
        assert_eq!(book.copies_available(L1), Some(4));
        assert!(book.copies_added());
    }

    #[test]
    fn stock_twice_is_rejected() {
        let mut book = book(10);
        book.stock(L1, 4).unwrap();
        assert_eq!(book.stock(L1, 2), Err(LibraryError::AlreadyStocked));
        assert_eq!(book.total_copies_available(), 6);
        assert_eq!(book.copies(L1), Some(4));
    }

    #[test]
    fn stock_beyond_pool_changes_nothing() {
        let mut book = book(3);
        assert_eq!(book.stock(L1, 4), Err(LibraryError::InsufficientCopies));
        assert_eq!(book.total_copies_available(), 3);
        assert_eq!(book.copies(L1), None);
        assert!(!book.copies_added());
    }

    #[test]
    fn unstock_releases_loaned_copies_too() {
        let mut book = book(10);
        book.stock(L1, 5).unwrap();
        book.lend(L1).unwrap();
        assert_eq!(book.unstock(L1), Ok(5));
        assert_eq!(book.total_copies_available(), 10);
        assert_eq!(book.copies(L1), None);
        assert!(book.copies_added());
    }

    #[test]
    fn lend_stops_at_zero() {
        let mut book = book(10);
        book.stock(L1, 1).unwrap();
        book.lend(L1).unwrap();
        assert_eq!(book.lend(L1), Err(LibraryError::NoCopiesAvailable));
        assert_eq!(book.copies_available(L1), Some(0));
    }

    #[test]
    fn restore_puts_lent_copy_back() {
        let mut book = book(10);
        book.stock(L1, 2).unwrap();
        book.lend(L1).unwrap();
        book.restore(L1).unwrap();
        assert_eq!(book.copies_available(L1), Some(2));
        assert_eq!(book.restore(L2), Err(LibraryError::NotStocked));
    }

    #[test]
    fn ledger_summary_lists_shelves_in_library_order() {
        let mut book = book(10);
        assert_eq!(book.ledger_summary(), "");
        book.stock(L2, 3).unwrap();
        book.stock(L1, 2).unwrap();
        book.lend(L2).unwrap();
        assert_eq!(book.ledger_summary(), "1=2/2 2=3/2");
    }

    // === Copy Adjustment Tests ===

    #[test]
    fn increase_copies_requires_stocked_book() {
        let mut book = book(10);
        assert_eq!(book.increase_copies(L1, 1), Err(LibraryError::CopiesNotAdded));
        book.stock(L1, 2).unwrap();
        assert_eq!(book.increase_copies(L2, 1), Err(LibraryError::NotStocked));
    }

    #[test]
    fn increase_copies_draws_from_pool() {
        let mut book = book(10);
        book.stock(L1, 2).unwrap();
        book.increase_copies(L1, 3).unwrap();
        assert_eq!(book.copies(L1), Some(5));
        assert_eq!(book.copies_available(L1), Some(5));
        assert_eq!(book.total_copies_available(), 5);
        assert_eq!(book.increase_copies(L1, 6), Err(LibraryError::InsufficientCopies));
    }

    #[test]
    fn decrease_copies_limited_by_lendable_copies() {
        let mut book = book(10);
        book.stock(L1, 3).unwrap();
        book.lend(L1).unwrap();
        assert_eq!(book.decrease_copies(L1, 3), Err(LibraryError::InsufficientCopies));
        book.decrease_copies(L1, 2).unwrap();
        assert_eq!(book.copies(L1), Some(1));
        assert_eq!(book.copies_available(L1), Some(0));
        assert_eq!(book.total_copies_available(), 9);
    }

    #[test]
    fn zero_counts_are_rejected() {
        let mut book = book(10);
        book.stock(L1, 3).unwrap();
        assert_eq!(book.increase_copies(L1, 0), Err(LibraryError::InvalidCount));
        assert_eq!(book.decrease_copies(L1, 0), Err(LibraryError::InvalidCount));
        assert_eq!(book.increase_total_copies(0), Err(LibraryError::InvalidCount));
        assert_eq!(book.decrease_total_copies(0), Err(LibraryError::InvalidCount));
        assert_eq!(book.stock(L2, 0), Err(LibraryError::InvalidCount));
    }

    // === Total Copy Tests ===

    #[test]
    fn decrease_total_copies_limited_by_pool() {
        let mut book = book(10);
        book.stock(L1, 8).unwrap();
        assert_eq!(book.decrease_total_copies(3), Err(LibraryError::InsufficientCopies));
        book.decrease_total_copies(2).unwrap();
        assert_eq!(book.total_copies(), 8);
        assert_eq!(book.total_copies_available(), 0);
    }

    #[test]
    fn increase_total_copies_rejects_overflow() {
        let mut book = book(u32::MAX - 1);
        assert_eq!(book.increase_total_copies(2), Err(LibraryError::InvalidCount));
        assert_eq!(book.total_copies(), u32::MAX - 1);
        book.increase_total_copies(1).unwrap();
        assert_eq!(book.total_copies(), u32::MAX);
    }

    // === Rendering Tests ===

    #[test]
    fn display_matches_catalog_format() {
        assert_eq!(
            book(1).to_string(),
            "Book('Noel Papa', 'Santa Claus', 'ISBN 0-061-96436-1')"
        );
    }

    #[test]
    fn serializer_summarises_ledger() {
        let mut book = book(10);
        book.stock(L1, 5).unwrap();
        book.stock(L2, 3).unwrap();
        book.lend(L1).unwrap();

        let json = serde_json::to_string(&book).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["isbn"], "ISBN 0-061-96436-1");
        assert_eq!(parsed["total_copies"], 10);
        assert_eq!(parsed["total_copies_available"], 2);
        assert_eq!(parsed["allocated"], 8);
        assert_eq!(parsed["libraries"], "1=5/4 2=3/3");
    }
}
