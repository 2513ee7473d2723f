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

//! Library rosters and stock lists.
//!
//! A [`Library`] only records *which* books and users belong to it. Copy
//! counts live on the [`Book`](crate::Book) ledger and the entities
//! themselves are owned by the [`Network`](crate::Network).

use crate::base::{Isbn, LibraryId, UserId};
use crate::user::User;
use crate::LibraryError;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Library {
    id: LibraryId,
    name: String,
    /// Stocked books in the order they were added.
    books: Vec<Isbn>,
    customers: Vec<UserId>,
    employees: Vec<UserId>,
}

impl Library {
    /// Creates an empty library named `"{network_name}. №{id}"`.
    pub fn new(id: LibraryId, network_name: &str) -> Self {
        Self {
            id,
            name: format!("{network_name}. №{id}"),
            books: Vec::new(),
            customers: Vec::new(),
            employees: Vec::new(),
        }
    }

    pub fn id(&self) -> LibraryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn books(&self) -> &[Isbn] {
        &self.books
    }

    pub fn customers(&self) -> &[UserId] {
        &self.customers
    }

    pub fn employees(&self) -> &[UserId] {
        &self.employees
    }

    pub fn stocks(&self, isbn: &Isbn) -> bool {
        self.books.contains(isbn)
    }

    /// Returns the stocked ISBN equal to `isbn`, validating the format first.
    pub fn find_book(&self, isbn: &str) -> Option<&Isbn> {
        if !Isbn::is_valid(isbn) {
            return None;
        }
        self.books.iter().find(|stocked| stocked.as_str() == isbn)
    }

    /// Registers `user` as a customer of this library.
    ///
    /// Registering the same customer twice is a no-op on the roster.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::NotACustomer`] - `user` is an employee.
    /// - [`LibraryError::LoansOutstanding`] - `user` belongs to another library
    ///   and still holds copies lent there.
    pub fn register_user(&mut self, user: &mut User) -> Result<(), LibraryError> {
        if !user.is_customer() {
            return Err(LibraryError::NotACustomer);
        }
        if user.library() != Some(self.id) && !user.borrowed_books().is_empty() {
            return Err(LibraryError::LoansOutstanding);
        }
        user.set_library(self.id);
        if !self.customers.contains(&user.id()) {
            self.customers.push(user.id());
        }
        Ok(())
    }

    /// Adds `employee` to this library's staff.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::NotAnEmployee`] if `employee` is a customer.
    pub fn hire_employee(&mut self, employee: &mut User) -> Result<(), LibraryError> {
        if !employee.is_employee() {
            return Err(LibraryError::NotAnEmployee);
        }
        employee.set_library(self.id);
        if !self.employees.contains(&employee.id()) {
            self.employees.push(employee.id());
        }
        Ok(())
    }

    pub(crate) fn push_book(&mut self, isbn: Isbn) {
        self.books.push(isbn);
    }

    pub(crate) fn remove_book(&mut self, isbn: &Isbn) -> bool {
        let before = self.books.len();
        self.books.retain(|stocked| stocked != isbn);
        self.books.len() != before
    }

    /// Drops `user` from both rosters.
    pub(crate) fn detach(&mut self, user: UserId) {
        self.customers.retain(|id| *id != user);
        self.employees.retain(|id| *id != user);
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Library('{}', '{}')", self.name, self.id)
    }
}
