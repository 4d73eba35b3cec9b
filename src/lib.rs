//! Reader for the header of PostgreSQL custom format archives
//!
//! Every archive made with `pg_dump -Fc` (and the `toc.dat` file of a
//! directory format dump) starts with a header recording the archive format
//! version, the server and pg_dump versions, the database name, the creation
//! time and the number of table of contents entries. This crate decodes that
//! header without needing the PostgreSQL tools, and can render it as JSON.
//!
//! ```rust
//! use pgdump_header::{Header, HeaderError};
//!
//! fn main() {
//!     let mut input: &[u8] = b"PGDMP";
//!     match Header::parse(&mut input) {
//!         Ok(header) => println!("This is a backup of {:?}", header.database_name),
//!         Err(HeaderError::NeedMoreData) => println!("archive is truncated"),
//!         Err(e) => println!("can not read header: {}", e),
//!     };
//! }
//! ```
mod config;
mod header;
mod io;
mod render;
mod types;

pub use config::{extract, Config, Input};
pub use header::{CreationTime, Header, MAGIC};
pub use io::{read_exact_bytes, read_exact_int, ReadConfig, MAX_INT_SIZE, MAX_STRING_LENGTH};
pub use render::{to_json, to_json_pretty};
pub use types::{
    version_key, ArchiveFormat, Compression, HeaderError, Version, K_VERS_1_15, K_VERS_1_16,
};
