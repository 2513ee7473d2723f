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

use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer, WriterBuilder};
use library_network_rs::{Book, Isbn, LibraryError, LibraryId, Network, UserId};
use serde::Deserialize;
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Library Network - Replay inventory operations
///
/// Reads library operations from a CSV file and outputs the book inventory
/// to stdout. Set `RUST_LOG=debug` to trace every applied operation.
#[derive(Parser, Debug)]
#[command(name = "library-network-rs")]
#[command(about = "Replays library inventory operations and reports book stock", long_about = None)]
struct Args {
    /// Path to CSV file with operations
    ///
    /// Expected format: type,user,library,isbn,count,name,detail
    /// Example: cargo run -- operations.csv > inventory.csv
    #[arg(value_name = "FILE", required_unless_present = "demo")]
    input: Option<PathBuf>,

    /// Name prefix for libraries opened before any `rename` row
    #[arg(long, default_value = Network::DEFAULT_NAME)]
    network_name: String,

    /// Run the built-in demonstration instead of reading a file
    #[arg(long, conflicts_with = "input")]
    demo: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.demo {
        if let Err(e) = run_demo(Network::new(args.network_name), std::io::stdout()) {
            eprintln!("Error running demo: {}", e);
            process::exit(1);
        }
        return;
    }

    let Some(input) = args.input else {
        eprintln!("No input file given");
        process::exit(1);
    };

    let file = match File::open(&input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", input.display(), e);
            process::exit(1);
        }
    };

    let network = Network::new(args.network_name);
    let network = match process_operations(BufReader::new(file), network) {
        Ok(network) => network,
        Err(e) => {
            eprintln!("Error processing operations: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = write_books(&network, std::io::stdout()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `type, user, library, isbn, count, name, detail`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "type")]
    op: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    user: Option<u32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    library: Option<u32>,
    #[serde(default)]
    isbn: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    count: Option<u32>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// A parsed inventory operation.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Operation {
    Rename { name: String },
    OpenLibrary,
    Catalog {
        isbn: Isbn,
        total: u32,
        title: String,
        author: String,
    },
    Customer {
        name: String,
        library: Option<LibraryId>,
    },
    Employee {
        name: String,
        position: String,
        salary: u32,
        library: Option<LibraryId>,
    },
    Add { user: UserId, isbn: Isbn, count: u32 },
    Remove { user: UserId, isbn: Isbn },
    Take { user: UserId, isbn: Isbn },
    Return { user: UserId, isbn: Isbn },
    Restock { library: LibraryId, isbn: Isbn, count: u32 },
    Withdraw { library: LibraryId, isbn: Isbn, count: u32 },
    Acquire { isbn: Isbn, count: u32 },
    Discard { isbn: Isbn, count: u32 },
}

impl CsvRecord {
    /// Converts CSV record to an [`Operation`].
    ///
    /// Returns `None` for unknown operation types, missing required fields
    /// and malformed ISBNs.
    fn into_operation(self) -> Option<Operation> {
        let isbn = || self.isbn.as_deref().and_then(|raw| Isbn::parse(raw).ok());
        let user = self.user.map(UserId);
        let library = self.library.map(LibraryId);

        match self.op.to_lowercase().as_str() {
            "rename" => Some(Operation::Rename { name: self.name? }),
            "library" => Some(Operation::OpenLibrary),
            "book" => Some(Operation::Catalog {
                isbn: isbn()?,
                total: self.count?,
                title: self.name?,
                author: self.detail.unwrap_or_default(),
            }),
            "customer" => Some(Operation::Customer {
                name: self.name?,
                library,
            }),
            "employee" => Some(Operation::Employee {
                name: self.name?,
                position: self.detail.unwrap_or_default(),
                salary: self.count.unwrap_or_default(),
                library,
            }),
            "add" => Some(Operation::Add {
                user: user?,
                isbn: isbn()?,
                count: self.count?,
            }),
            "remove" => Some(Operation::Remove {
                user: user?,
                isbn: isbn()?,
            }),
            "take" => Some(Operation::Take {
                user: user?,
                isbn: isbn()?,
            }),
            "return" => Some(Operation::Return {
                user: user?,
                isbn: isbn()?,
            }),
            "restock" => Some(Operation::Restock {
                library: library?,
                isbn: isbn()?,
                count: self.count?,
            }),
            "withdraw" => Some(Operation::Withdraw {
                library: library?,
                isbn: isbn()?,
                count: self.count?,
            }),
            "acquire" => Some(Operation::Acquire {
                isbn: isbn()?,
                count: self.count?,
            }),
            "discard" => Some(Operation::Discard {
                isbn: isbn()?,
                count: self.count?,
            }),
            _ => None,
        }
    }
}

/// Applies a single operation to the network.
fn apply(network: &mut Network, operation: Operation) -> Result<(), LibraryError> {
    match operation {
        Operation::Rename { name } => network.change_lib_name(name),
        Operation::OpenLibrary => {
            network.open_library();
        }
        Operation::Catalog {
            isbn,
            total,
            title,
            author,
        } => {
            network.add_book_title(Book::new(title, author, isbn, total))?;
        }
        Operation::Customer { name, library } => {
            let id = network.add_customer(name);
            if let Some(library) = library {
                network.register_user(library, id)?;
            }
        }
        Operation::Employee {
            name,
            position,
            salary,
            library,
        } => {
            let id = network.add_employee(name, position, salary);
            if let Some(library) = library {
                network.hire_employee(library, id)?;
            }
        }
        Operation::Add { user, isbn, count } => network.add_book(user, &isbn, count)?,
        Operation::Remove { user, isbn } => network.remove_book(user, &isbn)?,
        Operation::Take { user, isbn } => network.take_book(user, &isbn)?,
        Operation::Return { user, isbn } => network.return_book(user, &isbn)?,
        Operation::Restock {
            library,
            isbn,
            count,
        } => book_mut(network, &isbn)?.increase_copies(library, count)?,
        Operation::Withdraw {
            library,
            isbn,
            count,
        } => book_mut(network, &isbn)?.decrease_copies(library, count)?,
        Operation::Acquire { isbn, count } => {
            book_mut(network, &isbn)?.increase_total_copies(count)?
        }
        Operation::Discard { isbn, count } => {
            book_mut(network, &isbn)?.decrease_total_copies(count)?
        }
    }
    Ok(())
}

fn book_mut<'a>(network: &'a mut Network, isbn: &Isbn) -> Result<&'a mut Book, LibraryError> {
    network.book_mut(isbn).ok_or(LibraryError::BookNotFound)
}

/// Replay operations from a CSV reader.
///
/// Malformed rows and failed operations are skipped and logged; the replay
/// never stops on a domain error.
///
/// # CSV Format
///
/// Expected columns: `type, user, library, isbn, count, name, detail`
///
/// # Example
///
/// ```csv
/// type,user,library,isbn,count,name,detail
/// library,,,,,,
/// book,,,ISBN 0-061-96436-1,10,Noel Papa,Santa Claus
/// employee,,1,,500,Dave,Administrator
/// add,1,,ISBN 0-061-96436-1,5,,
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
pub fn process_operations<R: Read>(
    reader: R,
    mut network: Network,
) -> Result<Network, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    for (row, result) in rdr.deserialize::<CsvRecord>().enumerate() {
        match result {
            Ok(record) => {
                let Some(operation) = record.into_operation() else {
                    warn!(row, "skipping invalid operation record");
                    continue;
                };

                debug!(row, ?operation, "applying operation");
                if let Err(e) = apply(&mut network, operation) {
                    warn!(row, error = %e, "skipping failed operation");
                }
            }
            Err(e) => {
                warn!(row, error = %e, "skipping malformed row");
                continue;
            }
        }
    }

    Ok(network)
}

/// Write the book inventory to a CSV writer.
///
/// # CSV Format
///
/// Columns: `isbn, title, author, total_copies, total_copies_available, allocated, libraries`
///
/// `libraries` lists `library=copies/available` pairs separated by spaces.
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_books<W: Write>(network: &Network, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for book in network.books() {
        wtr.serialize(book)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Walks two libraries through stocking, lending and removal, printing the
/// rosters and counters along the way.
fn run_demo<W: Write>(mut network: Network, mut out: W) -> Result<(), Box<dyn Error>> {
    let first_lib = network.open_library();
    let first_book = network.add_book_title(Book::new(
        "Noel Papa",
        "Santa Claus",
        Isbn::parse("ISBN 0-061-96436-1")?,
        100,
    ))?;
    let second_book = network.add_book_title(Book::new(
        "Noel Papa2",
        "Santa Claus2",
        Isbn::parse("ISBN 0-061-96436-2")?,
        10,
    ))?;

    let admin = network.add_employee("Dave", "Administrator", 500);
    network.hire_employee(first_lib, admin)?;
    network.add_book(admin, &first_book, 50)?;
    network.add_book(admin, &second_book, 5)?;
    network.show_books(first_lib, &mut out)?;

    let first_customer = network.add_customer("Adam");
    let second_customer = network.add_customer("Adam2");
    network.register_user(first_lib, first_customer)?;
    network.take_book(first_customer, &second_book)?;
    print_counters(&network, &second_book, &mut out)?;

    book_mut(&mut network, &second_book)?.increase_total_copies(6)?;
    print_counters(&network, &second_book, &mut out)?;
    network.show_customers(first_lib, &mut out)?;
    network.show_employees(first_lib, &mut out)?;

    let second_lib = network.open_library();
    let manager = network.add_employee("Kevin", "Manager", 1500);
    network.hire_employee(second_lib, manager)?;
    network.register_user(second_lib, second_customer)?;
    network.add_book(manager, &second_book, 3)?;
    print_counters(&network, &second_book, &mut out)?;

    book_mut(&mut network, &second_book)?.decrease_total_copies(5)?;
    network.show_books(second_lib, &mut out)?;
    writeln!(out, "{}", network.check_availability(&second_book, second_lib)?)?;
    writeln!(out, "{}", network.check_availability(&second_book, first_lib)?)?;

    network.remove_book(manager, &second_book)?;
    writeln!(out, "{}", network.check_availability(&second_book, first_lib)?)?;
    print_counters(&network, &second_book, &mut out)?;
    Ok(())
}

/// Prints one headerless inventory row for `isbn`.
fn print_counters<W: Write>(
    network: &Network,
    isbn: &Isbn,
    mut out: W,
) -> Result<(), Box<dyn Error>> {
    let book = network.book(isbn).ok_or(LibraryError::BookNotFound)?;
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_writer(&mut out);
    wtr.serialize(book)?;
    wtr.flush()?;
    Ok(())
}
