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

//! # Library Network
//!
//! This library keeps the inventory of a network of lending libraries: which
//! books each library stocks, how many copies it holds, how many of those are
//! on loan, and how many copies of each title are still unallocated.
//!
//! ## Core Components
//!
//! - [`Network`]: Owning registry for libraries, users and books
//! - [`Book`]: Catalogued title with a global pool and per-library ledger
//! - [`Library`]: Stock list and customer/employee rosters
//! - [`User`]: Customer or employee, distinguished by [`Role`]
//! - [`LibraryError`]: Error types for inventory and lending failures
//!
//! ## Example
//!
//! ```
//! use library_network_rs::{Book, Isbn, Network};
//!
//! let mut network = Network::default();
//! let library = network.open_library();
//! let admin = network.add_employee("Dave", "Administrator", 500);
//! let adam = network.add_customer("Adam");
//! network.hire_employee(library, admin).unwrap();
//! network.register_user(library, adam).unwrap();
//!
//! let isbn = Isbn::parse("ISBN 0-061-96436-1").unwrap();
//! network
//!     .add_book_title(Book::new("Noel Papa", "Santa Claus", isbn.clone(), 10))
//!     .unwrap();
//!
//! network.add_book(admin, &isbn, 5).unwrap();
//! network.take_book(adam, &isbn).unwrap();
//!
//! let book = network.book(&isbn).unwrap();
//! assert_eq!(book.total_copies_available(), 5);
//! assert_eq!(book.copies_available(library), Some(4));
//! ```
//!
//! ## Single-threaded
//!
//! Every mutation takes `&mut Network`; callers that share a network across
//! threads must wrap it in their own lock.

mod base;
pub mod book;
pub mod error;
pub mod library;
mod network;
pub mod user;

pub use base::{Isbn, LibraryId, UserId};
pub use book::Book;
pub use error::LibraryError;
pub use library::Library;
pub use network::Network;
pub use user::{Loan, Role, User};
