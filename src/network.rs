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

//! Library network registry.
//!
//! The [`Network`] owns every library, user and book and resolves the
//! identifier relations between them. It is the only place identifiers are
//! handed out.
//!
//! # Operations
//!
//! - **Catalog**: register books with [`Network::add_book_title`].
//! - **Libraries**: open with [`Network::open_library`]; the current network
//!   name is baked into each library's display name.
//! - **Staff**: [`Network::add_employee`], [`Network::hire_employee`],
//!   then [`Network::add_book`] / [`Network::remove_book`].
//! - **Lending**: [`Network::add_customer`], [`Network::register_user`],
//!   then [`Network::take_book`] / [`Network::return_book`].

use crate::base::{Isbn, LibraryId, UserId};
use crate::book::Book;
use crate::library::Library;
use crate::user::User;
use crate::LibraryError;
use std::collections::BTreeMap;
use std::io::{self, Write};
use tracing::debug;

/// Owning registry for a network of libraries.
///
/// # Invariants
///
/// - Library and user ids are assigned sequentially from 1 and never reused.
/// - Every ISBN in a library's stock list names a catalogued book with a
///   ledger entry for that library.
/// - A user appears on at most one library's roster.
#[derive(Debug)]
pub struct Network {
    name: String,
    libraries: BTreeMap<LibraryId, Library>,
    users: BTreeMap<UserId, User>,
    books: BTreeMap<Isbn, Book>,
    next_library_id: u32,
    next_user_id: u32,
}

impl Network {
    pub const DEFAULT_NAME: &'static str = "Best Library";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            libraries: BTreeMap::new(),
            users: BTreeMap::new(),
            books: BTreeMap::new(),
            next_library_id: 1,
            next_user_id: 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the network. Only libraries opened afterwards carry the new name.
    pub fn change_lib_name(&mut self, new_name: impl Into<String>) {
        self.name = new_name.into();
        debug!(name = %self.name, "network renamed");
    }

    /// Opens a new, empty library.
    pub fn open_library(&mut self) -> LibraryId {
        let id = LibraryId(self.next_library_id);
        self.next_library_id += 1;
        let library = Library::new(id, &self.name);
        debug!(library = %id, name = library.name(), "library opened");
        self.libraries.insert(id, library);
        id
    }

    /// Adds `book` to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::DuplicateBook`] if its ISBN is already catalogued.
    pub fn add_book_title(&mut self, book: Book) -> Result<Isbn, LibraryError> {
        let isbn = book.isbn().clone();
        if self.books.contains_key(&isbn) {
            return Err(LibraryError::DuplicateBook);
        }
        debug!(isbn = %isbn, total = book.total_copies(), "book catalogued");
        self.books.insert(isbn.clone(), book);
        Ok(isbn)
    }

    pub fn add_customer(&mut self, name: impl Into<String>) -> UserId {
        let id = self.next_user_id();
        self.users.insert(id, User::customer(id, name));
        id
    }

    pub fn add_employee(
        &mut self,
        name: impl Into<String>,
        position: impl Into<String>,
        salary: u32,
    ) -> UserId {
        let id = self.next_user_id();
        self.users
            .insert(id, User::employee(id, name, position, salary));
        id
    }

    fn next_user_id(&mut self) -> UserId {
        let id = UserId(self.next_user_id);
        self.next_user_id += 1;
        id
    }

    /// Registers customer `user` with `library`, leaving any previous library.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::LibraryNotFound`] / [`LibraryError::UserNotFound`] - Unknown id.
    /// - [`LibraryError::NotACustomer`] - `user` is an employee.
    pub fn register_user(&mut self, library: LibraryId, user: UserId) -> Result<(), LibraryError> {
        let customer = self.users.get(&user).ok_or(LibraryError::UserNotFound)?;
        if !customer.is_customer() {
            return Err(LibraryError::NotACustomer);
        }
        self.move_user(library, user, Library::register_user)?;
        debug!(library = %library, user = %user, "customer registered");
        Ok(())
    }

    /// Hires `employee` at `library`, leaving any previous library.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::LibraryNotFound`] / [`LibraryError::UserNotFound`] - Unknown id.
    /// - [`LibraryError::NotAnEmployee`] - `employee` is a customer.
    pub fn hire_employee(
        &mut self,
        library: LibraryId,
        employee: UserId,
    ) -> Result<(), LibraryError> {
        let staff = self
            .users
            .get(&employee)
            .ok_or(LibraryError::UserNotFound)?;
        if !staff.is_employee() {
            return Err(LibraryError::NotAnEmployee);
        }
        self.move_user(library, employee, Library::hire_employee)?;
        debug!(library = %library, user = %employee, "employee hired");
        Ok(())
    }

    /// Enrols `user` in `library`, then drops it from its previous library's roster.
    fn move_user(
        &mut self,
        library: LibraryId,
        user: UserId,
        enrol: fn(&mut Library, &mut User) -> Result<(), LibraryError>,
    ) -> Result<(), LibraryError> {
        let target = self
            .libraries
            .get_mut(&library)
            .ok_or(LibraryError::LibraryNotFound)?;
        let member = self.users.get_mut(&user).ok_or(LibraryError::UserNotFound)?;
        let previous = member.library();
        enrol(target, member)?;
        if let Some(previous) = previous.filter(|id| *id != library)
            && let Some(old) = self.libraries.get_mut(&previous)
        {
            old.detach(user);
        }
        Ok(())
    }

    /// Employee `employee` stocks `count` copies of `isbn` in their library.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::UserNotFound`] / [`LibraryError::BookNotFound`] - Unknown id.
    /// - [`LibraryError::NotRegistered`] - Employee is not hired anywhere.
    /// - [`LibraryError::InsufficientCopies`] - `count` exceeds the book's pool.
    /// - Anything `User::add_book` returns.
    pub fn add_book(
        &mut self,
        employee: UserId,
        isbn: &Isbn,
        count: u32,
    ) -> Result<(), LibraryError> {
        let (user, library, book) = self.resolve(employee, isbn)?;
        user.add_book(library, book, count)?;
        debug!(library = %library.id(), isbn = %isbn, count, "book added");
        Ok(())
    }

    /// Employee `employee` removes `isbn` from their library.
    ///
    /// Copies still on loan from the closed shelf are written off: every
    /// customer's matching loans are dropped.
    ///
    /// # Errors
    ///
    /// Resolution errors as for [`Network::add_book`], then anything
    /// `User::remove_book` returns.
    pub fn remove_book(&mut self, employee: UserId, isbn: &Isbn) -> Result<(), LibraryError> {
        let (user, library, book) = self.resolve(employee, isbn)?;
        user.remove_book(library, book)?;
        let closed = library.id();
        let written_off: usize = self
            .users
            .values_mut()
            .map(|customer| customer.write_off(closed, isbn))
            .sum();
        debug!(library = %closed, isbn = %isbn, written_off, "book removed");
        Ok(())
    }

    /// Customer `customer` borrows one copy of `isbn` from their library.
    ///
    /// # Errors
    ///
    /// Resolution errors as for [`Network::add_book`], then anything
    /// `User::take_book` returns.
    pub fn take_book(&mut self, customer: UserId, isbn: &Isbn) -> Result<(), LibraryError> {
        let (user, library, book) = self.resolve(customer, isbn)?;
        user.take_book(library, book)?;
        debug!(library = %library.id(), user = %customer, isbn = %isbn, "book lent");
        Ok(())
    }

    /// Customer `customer` returns one copy of `isbn` to their library.
    ///
    /// # Errors
    ///
    /// Resolution errors as for [`Network::add_book`], then anything
    /// `User::return_book` returns.
    pub fn return_book(&mut self, customer: UserId, isbn: &Isbn) -> Result<(), LibraryError> {
        let (user, library, book) = self.resolve(customer, isbn)?;
        user.return_book(library, book)?;
        debug!(library = %library.id(), user = %customer, isbn = %isbn, "book returned");
        Ok(())
    }

    /// Borrows the user, their library and the book disjointly.
    fn resolve(
        &mut self,
        user: UserId,
        isbn: &Isbn,
    ) -> Result<(&mut User, &mut Library, &mut Book), LibraryError> {
        let user = self.users.get_mut(&user).ok_or(LibraryError::UserNotFound)?;
        let library_id = user.library().ok_or(LibraryError::NotRegistered)?;
        let library = self
            .libraries
            .get_mut(&library_id)
            .ok_or(LibraryError::LibraryNotFound)?;
        let book = self.books.get_mut(isbn).ok_or(LibraryError::BookNotFound)?;
        Ok((user, library, book))
    }

    /// Looks up `isbn` among the books `library` stocks.
    ///
    /// Returns `None` for malformed ISBNs, unknown libraries and books the
    /// library does not stock.
    pub fn find_book(&self, library: LibraryId, isbn: &str) -> Option<&Book> {
        let stocked = self.libraries.get(&library)?.find_book(isbn)?;
        self.books.get(stocked)
    }

    /// Availability message for `isbn` in `library`.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::BookNotFound`] or [`LibraryError::LibraryNotFound`].
    pub fn check_availability(
        &self,
        isbn: &Isbn,
        library: LibraryId,
    ) -> Result<String, LibraryError> {
        let book = self.books.get(isbn).ok_or(LibraryError::BookNotFound)?;
        let library = self
            .libraries
            .get(&library)
            .ok_or(LibraryError::LibraryNotFound)?;
        Ok(book.check_availability(library))
    }

    /// Writes one line per book stocked by `library`.
    pub fn show_books<W: Write>(&self, library: LibraryId, mut out: W) -> io::Result<()> {
        for isbn in self.library_or_io(library)?.books() {
            if let Some(book) = self.books.get(isbn) {
                writeln!(out, "{book}")?;
            }
        }
        Ok(())
    }

    /// Writes one line per customer registered with `library`.
    pub fn show_customers<W: Write>(&self, library: LibraryId, out: W) -> io::Result<()> {
        let library = self.library_or_io(library)?;
        self.show_users(library.customers(), out)
    }

    /// Writes one line per employee of `library`.
    pub fn show_employees<W: Write>(&self, library: LibraryId, out: W) -> io::Result<()> {
        let library = self.library_or_io(library)?;
        self.show_users(library.employees(), out)
    }

    fn show_users<W: Write>(&self, ids: &[UserId], mut out: W) -> io::Result<()> {
        for user in ids.iter().filter_map(|id| self.users.get(id)) {
            writeln!(out, "{user}")?;
        }
        Ok(())
    }

    fn library_or_io(&self, library: LibraryId) -> io::Result<&Library> {
        self.libraries.get(&library).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, LibraryError::LibraryNotFound)
        })
    }

    pub fn library(&self, id: LibraryId) -> Option<&Library> {
        self.libraries.get(&id)
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn book(&self, isbn: &Isbn) -> Option<&Book> {
        self.books.get(isbn)
    }

    /// Mutable access for copy adjustments that do not involve a user
    /// (`increase_copies`, `decrease_total_copies`, ...).
    pub fn book_mut(&mut self, isbn: &Isbn) -> Option<&mut Book> {
        self.books.get_mut(isbn)
    }

    /// Libraries in id order.
    pub fn libraries(&self) -> impl Iterator<Item = &Library> {
        self.libraries.values()
    }

    /// Users in id order.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// Catalogued books in ISBN order.
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}
