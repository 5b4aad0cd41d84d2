#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # MRRC MARC-8: MARC-8 character set conversion
//!
//! Converts between MARC-8, the legacy character encoding of MARC
//! bibliographic records, and Unicode.
//!
//! ## Quick Start
//!
//! ```
//! use mrrc_marc8::{marc8_to_utf8, utf8_to_marc8};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Diacritics come before their base character in MARC-8
//! assert_eq!(marc8_to_utf8(b"Bront\xE8e", None)?, "Brontë");
//!
//! // Escape sequences switch character sets
//! assert_eq!(utf8_to_marc8("H₂O", None)?, b"H\x1Bb2\x1B(BO");
//! # Ok(())
//! # }
//! ```
//!
//! ### Error policy
//!
//! ```
//! use mrrc_marc8::{config, marc8_to_utf8};
//!
//! # fn main() -> mrrc_marc8::Result<()> {
//! // Strict by default: the first unmapped byte fails the conversion
//! assert!(marc8_to_utf8(b"ab\x01cd", None).is_err());
//!
//! // Per-call override
//! assert_eq!(marc8_to_utf8(b"ab\x01cd", Some(true))?, "abcd");
//!
//! // Process-wide: on an unmapped byte, decode the whole input as UTF-8
//! config::set_ignore_errors(true);
//! config::set_assume_unicode(true);
//! assert_eq!(marc8_to_utf8("Straße".as_bytes(), None)?, "Straße");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`convert`] — The converter and the top-level entry points
//! - [`config`] — Error policy, fallback encoding and default character sets
//! - [`charset`] — Character set identifiers and G0/G1 state
//! - [`escape`] — ISO 2022 escape sequences
//! - [`code`] — Code records
//! - [`marc8_tables`] — Code table trait and the built-in table
//! - [`reorder`] — Combining mark reordering
//! - [`encoding`] — Leader-driven MARC-8/UTF-8 dispatch
//! - [`error`] — Error types and result type

pub mod charset;
pub mod code;
pub mod config;
pub mod convert;
pub mod encoding;
pub mod error;
pub mod escape;
pub mod marc8_tables;
pub mod reorder;

pub use charset::{CharsetId, CharsetState, WorkingSet};
pub use code::Code;
pub use config::Marc8Config;
pub use convert::{marc8_to_utf8, utf8_to_marc8, ConversionReport, Marc8Converter};
pub use encoding::MarcEncoding;
pub use error::{Marc8Error, Result};
pub use marc8_tables::{default_table, CodeTable, Marc8Table};
