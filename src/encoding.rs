//! Leader-driven choice between MARC-8 and UTF-8.
//!
//! Leader position 9 declares how a record's field data is coded: a space
//! for MARC-8, `a` for UCS/Unicode. [`decode_bytes`] and [`encode_string`]
//! take that declaration and run the matching conversion, so code handling
//! field data never has to branch on MARC-8 itself.

use crate::convert::{marc8_to_utf8, utf8_to_marc8};
use crate::error::{Marc8Error, Result};

/// Character coding declared in leader position 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarcEncoding {
    /// `' '`: MARC-8 with ISO 2022 escapes
    Marc8,
    /// `'a'`: UTF-8
    Utf8,
}

impl MarcEncoding {
    /// Read the coding from leader position 9.
    ///
    /// # Errors
    ///
    /// Returns `Marc8Error::InvalidLeaderCoding` for anything but `' '` or `'a'`.
    pub fn from_leader_char(c: char) -> Result<Self> {
        match c {
            ' ' => Ok(MarcEncoding::Marc8),
            'a' => Ok(MarcEncoding::Utf8),
            other => Err(Marc8Error::InvalidLeaderCoding(other)),
        }
    }

    /// The leader position 9 value for this coding.
    #[must_use]
    pub fn as_leader_char(self) -> char {
        match self {
            MarcEncoding::Marc8 => ' ',
            MarcEncoding::Utf8 => 'a',
        }
    }
}

/// Turn field bytes into a string according to `coding`.
///
/// MARC-8 data is converted under the process-wide configuration.
///
/// # Errors
///
/// Returns `Marc8Error::InvalidUtf8` when UTF-8 data is malformed, or any
/// error [`marc8_to_utf8`] reports for MARC-8 data.
pub fn decode_bytes(bytes: &[u8], coding: MarcEncoding) -> Result<String> {
    match coding {
        MarcEncoding::Marc8 => marc8_to_utf8(bytes, None),
        MarcEncoding::Utf8 => std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| Marc8Error::InvalidUtf8(e.to_string())),
    }
}

/// Turn a string into field bytes according to `coding`.
///
/// # Errors
///
/// Returns any error [`utf8_to_marc8`] reports for MARC-8 output.
pub fn encode_string(text: &str, coding: MarcEncoding) -> Result<Vec<u8>> {
    match coding {
        MarcEncoding::Marc8 => utf8_to_marc8(text, None),
        MarcEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
    }
}
