//! Error types for MARC-8 conversion.
//!
//! This module provides the [`Marc8Error`] type for all conversion operations
//! and the [`Result`] convenience type.

use thiserror::Error;

use crate::charset::CharsetId;

/// Error type for all MARC-8 conversion operations.
///
/// Under the strict policy the first error aborts the conversion. Under the
/// ignore policy the same values are collected in a
/// [`ConversionReport`](crate::convert::ConversionReport) instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Marc8Error {
    /// A MARC-8 byte has no mapping in either active working set.
    #[error("no mapping found for byte 0x{byte:02X} at offset {offset} (g0={g0}, g1={g1})")]
    UnmappedByte {
        /// The first byte of the unmapped unit.
        byte: u8,
        /// Offset of the byte in the input.
        offset: usize,
        /// Character set active in G0 at that point.
        g0: CharsetId,
        /// Character set active in G1 at that point.
        g1: CharsetId,
    },

    /// An escape byte that did not begin a recognized escape sequence and
    /// could not be mapped as a character either.
    #[error("malformed escape sequence at offset {offset}")]
    MalformedEscape {
        /// Offset of the escape byte in the input.
        offset: usize,
    },

    /// A Unicode character has no MARC-8 mapping.
    #[error("no MARC-8 mapping for {ch:?} at position {position}")]
    UnmappedCodePoint {
        /// The unmapped character.
        ch: char,
        /// Character position in the canonically decomposed input.
        position: usize,
    },

    /// The fallback encoding label is not recognized.
    #[error("unknown fallback encoding: {0}")]
    UnknownEncoding(String),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Leader position 9 holds an unknown character coding scheme.
    #[error("Unknown character encoding: {0}")]
    InvalidLeaderCoding(char),

    /// Data declared as UTF-8 is not valid UTF-8.
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(String),
}

/// Convenience type alias for [`std::result::Result`] with [`Marc8Error`].
pub type Result<T> = std::result::Result<T, Marc8Error>;
