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

//! Core identifier types for libraries, users and books.

use crate::LibraryError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Anchored `ISBN D-DDD-DDDDD-D` pattern.
static ISBN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ISBN [0-9]-[0-9]{3}-[0-9]{5}-[0-9]$").expect("ISBN pattern is valid")
});

/// Unique identifier for a library within a [`Network`](crate::Network).
///
/// Assigned sequentially starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct LibraryId(pub u32);

impl fmt::Display for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a customer or employee.
///
/// Customers and employees share one sequence, so an id never names
/// two users of different roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated ISBN of the form `ISBN D-DDD-DDDDD-D`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Isbn(String);

impl Isbn {
    /// Exact length of a well-formed ISBN string.
    pub const LEN: usize = 18;

    /// Returns `true` if `isbn` is exactly [`Isbn::LEN`] characters long and
    /// matches `ISBN D-DDD-DDDDD-D`.
    pub fn is_valid(isbn: &str) -> bool {
        isbn.len() == Self::LEN && ISBN_PATTERN.is_match(isbn)
    }

    /// Parses and validates an ISBN.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::InvalidIsbn`] if the string is malformed.
    pub fn parse(isbn: &str) -> Result<Self, LibraryError> {
        if Self::is_valid(isbn) {
            Ok(Self(isbn.to_owned()))
        } else {
            Err(LibraryError::InvalidIsbn)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Isbn {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Isbn {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_isbn() {
        assert!(Isbn::is_valid("ISBN 0-061-96436-1"));
        assert!(Isbn::is_valid("ISBN 9-999-00000-0"));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(!Isbn::is_valid(""));
        assert!(!Isbn::is_valid("ISBN 0-061-96436-"));
        assert!(!Isbn::is_valid("ISBN 0-061-96436-12"));
        assert!(!Isbn::is_valid(" ISBN 0-061-96436-1"));
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(!Isbn::is_valid("ISBN 0-06196-436-1"));
        assert!(!Isbn::is_valid("ISBN A-061-96436-1"));
        assert!(!Isbn::is_valid("isbn 0-061-96436-1"));
        assert!(!Isbn::is_valid("ISBN 0 061 96436 1"));
        assert!(!Isbn::is_valid("XXXX 0-061-96436-1"));
    }

    #[test]
    fn parse_round_trips_display() {
        let isbn = Isbn::parse("ISBN 0-061-96436-1").unwrap();
        assert_eq!(isbn.to_string(), "ISBN 0-061-96436-1");
        assert_eq!(isbn.as_str(), "ISBN 0-061-96436-1");
    }

    #[test]
    fn parse_rejects_malformed() {
        assert_eq!(Isbn::parse("0-061-96436-1"), Err(LibraryError::InvalidIsbn));
        assert_eq!("nope".parse::<Isbn>(), Err(LibraryError::InvalidIsbn));
    }

    #[test]
    fn deserialize_validates() {
        let ok: Isbn = serde_json::from_str("\"ISBN 1-234-56789-0\"").unwrap();
        assert_eq!(ok.as_str(), "ISBN 1-234-56789-0");
        assert!(serde_json::from_str::<Isbn>("\"ISBN 1-234\"").is_err());
    }

    #[test]
    fn ids_display_as_numbers() {
        assert_eq!(LibraryId(3).to_string(), "3");
        assert_eq!(UserId(42).to_string(), "42");
    }
}
