//! MARC-8 ⇄ Unicode conversion.
//!
//! [`Marc8Converter`] pairs a read-only [`CodeTable`] with a [`Marc8Config`].
//! Every call builds its own working-set state and combining buffer, so a
//! converter (and the table behind it) can be used from many threads at once.
//!
//! The free functions [`marc8_to_utf8`] and [`utf8_to_marc8`] use the
//! built-in table and a snapshot of the process-wide configuration.
//!
//! # Examples
//!
//! ```
//! use mrrc_marc8::{marc8_to_utf8, utf8_to_marc8};
//!
//! # fn main() -> mrrc_marc8::Result<()> {
//! // Acute accent (0xE2) precedes its base in MARC-8
//! assert_eq!(marc8_to_utf8(b"P\xE2erez", None)?, "Pérez");
//! assert_eq!(utf8_to_marc8("Pérez", None)?, b"P\xE2erez");
//! # Ok(())
//! # }
//! ```

use std::fmt;

use smallvec::SmallVec;
use unicode_normalization::char::compose;
use unicode_normalization::UnicodeNormalization;

use crate::charset::{CharsetId, CharsetState, WorkingSet};
use crate::code::Code;
use crate::config::{self, Marc8Config};
use crate::error::{Marc8Error, Result};
use crate::escape::{self, ESCAPE};
use crate::marc8_tables::{default_table, CodeTable, Marc8Table};
use crate::reorder::{CombiningBuffer, Unit, UnitBuffer};

/// What a conversion had to skip or replace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Units skipped under the ignore policy, in input order
    pub skipped: Vec<Marc8Error>,
    /// Name of the fallback encoding, if the input was decoded with it
    pub fallback: Option<String>,
}

impl ConversionReport {
    /// Whether the conversion completed without skipping anything.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.fallback.is_none()
    }
}

/// Converter between MARC-8 and Unicode.
pub struct Marc8Converter<'t, T: CodeTable + ?Sized = Marc8Table> {
    table: &'t T,
    config: Marc8Config,
}

impl<T: CodeTable + ?Sized> fmt::Debug for Marc8Converter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Marc8Converter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Marc8Converter<'static> {
    /// Converter over the built-in table.
    #[must_use]
    pub fn with_config(config: Marc8Config) -> Self {
        Marc8Converter::new(default_table(), config)
    }
}

impl Default for Marc8Converter<'static> {
    fn default() -> Self {
        Marc8Converter::with_config(Marc8Config::default())
    }
}

impl<'t, T: CodeTable + ?Sized> Marc8Converter<'t, T> {
    /// Converter over `table`.
    #[must_use]
    pub fn new(table: &'t T, config: Marc8Config) -> Self {
        Marc8Converter { table, config }
    }

    /// The configuration every call of this converter uses.
    #[must_use]
    pub fn config(&self) -> &Marc8Config {
        &self.config
    }

    /// Convert MARC-8 bytes to an NFC-normalized string.
    ///
    /// # Errors
    ///
    /// Under the strict policy, returns `Marc8Error::UnmappedByte` (or
    /// `Marc8Error::MalformedEscape` for a stray escape byte) for the first
    /// byte with no mapping. With a fallback encoding configured, returns
    /// `Marc8Error::UnknownEncoding` if its label is not recognized.
    pub fn marc8_to_utf8(&self, marc8: &[u8]) -> Result<String> {
        self.decode_with_report(marc8).map(|(text, _)| text)
    }

    /// Like [`marc8_to_utf8`](Self::marc8_to_utf8), also reporting what
    /// was skipped.
    ///
    /// # Errors
    ///
    /// See [`marc8_to_utf8`](Self::marc8_to_utf8).
    pub fn decode_with_report(&self, marc8: &[u8]) -> Result<(String, ConversionReport)> {
        let mut report = ConversionReport::default();
        let text = Decoder::new(self.table, &self.config).run(marc8, &mut report)?;
        Ok((text, report))
    }

    /// Convert a string to MARC-8 bytes.
    ///
    /// # Errors
    ///
    /// Under the strict policy, returns `Marc8Error::UnmappedCodePoint` for
    /// the first character with no mapping.
    pub fn utf8_to_marc8(&self, text: &str) -> Result<Vec<u8>> {
        self.encode_with_report(text).map(|(bytes, _)| bytes)
    }

    /// Like [`utf8_to_marc8`](Self::utf8_to_marc8), also reporting what
    /// was skipped.
    ///
    /// # Errors
    ///
    /// See [`utf8_to_marc8`](Self::utf8_to_marc8).
    pub fn encode_with_report(&self, text: &str) -> Result<(Vec<u8>, ConversionReport)> {
        let mut report = ConversionReport::default();
        let bytes = Encoder::new(self.table, &self.config, text.len()).run(text, &mut report)?;
        Ok((bytes, report))
    }
}

/// Convert MARC-8 bytes to a string using the process-wide configuration.
///
/// `ignore_errors` overrides the configured policy for this call only.
///
/// # Errors
///
/// See [`Marc8Converter::marc8_to_utf8`].
pub fn marc8_to_utf8(marc8: &[u8], ignore_errors: Option<bool>) -> Result<String> {
    let config = config::snapshot().with_ignore_errors(ignore_errors);
    Marc8Converter::with_config(config).marc8_to_utf8(marc8)
}

/// Convert a string to MARC-8 bytes using the process-wide configuration.
///
/// `ignore_errors` overrides the configured policy for this call only.
///
/// # Errors
///
/// See [`Marc8Converter::utf8_to_marc8`].
pub fn utf8_to_marc8(text: &str, ignore_errors: Option<bool>) -> Result<Vec<u8>> {
    let config = config::snapshot().with_ignore_errors(ignore_errors);
    Marc8Converter::with_config(config).utf8_to_marc8(text)
}

/// Space, TAB, LF, VT, FF and CR pass through both directions untouched.
fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

fn whitespace_byte(ch: char) -> Option<u8> {
    u8::try_from(ch).ok().filter(|&b| is_whitespace(b))
}

/// Bytes to look up for `chunk` read through `slot`.
///
/// A 94-character set sits in 0x21-0x7E when designated to its native
/// slot; read through the other slot its bytes carry the opposite high bit.
fn invoked_key(slot: WorkingSet, charset: CharsetId, chunk: &[u8]) -> SmallVec<[u8; 3]> {
    let native = charset.canonical().default_group();
    chunk
        .iter()
        .map(|&b| match (slot, native) {
            (WorkingSet::G1, WorkingSet::G0) if (0xA1..=0xFE).contains(&b) => b & 0x7F,
            (WorkingSet::G0, WorkingSet::G1) if (0x21..=0x7E).contains(&b) => b | 0x80,
            _ => b,
        })
        .collect()
}

struct Decoder<'a, T: CodeTable + ?Sized> {
    table: &'a T,
    config: &'a Marc8Config,
    state: CharsetState,
    combining: CombiningBuffer,
    open_half: Option<u8>,
}

impl<'a, T: CodeTable + ?Sized> Decoder<'a, T> {
    fn new(table: &'a T, config: &'a Marc8Config) -> Self {
        Decoder {
            table,
            config,
            state: config.initial_state(),
            combining: CombiningBuffer::new(),
            open_half: None,
        }
    }

    fn run(mut self, marc8: &[u8], report: &mut ConversionReport) -> Result<String> {
        let mut out = String::with_capacity(marc8.len());
        let mut pos = 0;

        while pos < marc8.len() {
            let byte = marc8[pos];
            if is_whitespace(byte) {
                out.push(char::from(byte));
                pos += 1;
                continue;
            }

            let next = escape::process_escape(marc8, pos, &mut self.state);
            if next > pos {
                pos = next;
                continue;
            }

            if let Some((code, width)) = self.lookup(&marc8[pos..]) {
                pos += width;
                if code.is_second_half() {
                    // a second half closing an open first half adds nothing
                    if self.open_half == code.marc8_value().first().copied() {
                        self.open_half = None;
                        continue;
                    }
                } else if let Some(second) = code.matching_second_half() {
                    self.open_half = Some(second);
                }
                if code.is_combining() {
                    self.combining.push(code.utf8_value());
                } else {
                    self.combining.emit_with_base(code.utf8_value(), &mut out);
                }
                continue;
            }

            let error = if byte == ESCAPE {
                Marc8Error::MalformedEscape { offset: pos }
            } else {
                Marc8Error::UnmappedByte {
                    byte,
                    offset: pos,
                    g0: self.state.g0,
                    g1: self.state.g1,
                }
            };
            if !self.config.ignore_errors {
                return Err(error);
            }
            if let Some(encoding) = self.config.fallback_encoding()? {
                log::warn!("{error}; decoding whole input as {}", encoding.name());
                let (text, had_errors) = encoding.decode_without_bom_handling(marc8);
                if had_errors {
                    log::warn!("input is not valid {} either", encoding.name());
                }
                report.skipped.push(error);
                report.fallback = Some(encoding.name().to_string());
                return Ok(text.into_owned());
            }
            log::warn!("{error}; skipping");
            report.skipped.push(error);
            pos += 1;
        }

        self.combining.flush(&mut out);
        Ok(out.nfc().collect())
    }

    /// Try G0, then G1. Returns the record and the number of bytes it spans.
    fn lookup(&self, rest: &[u8]) -> Option<(&'a Code, usize)> {
        let table: &'a T = self.table;
        [WorkingSet::G0, WorkingSet::G1].into_iter().find_map(|slot| {
            let charset = self.state.get(slot);
            let width = charset.char_width();
            let chunk = rest.get(..width)?;
            table
                .lookup_by_marc8(charset, &invoked_key(slot, charset, chunk))
                .map(|code| (code, width))
        })
    }
}

struct Encoder<'a, T: CodeTable + ?Sized> {
    table: &'a T,
    config: &'a Marc8Config,
    state: CharsetState,
    out: UnitBuffer,
    last_base: Option<char>,
    pending_half: Option<&'a Code>,
    emitted_half: Option<u8>,
}

impl<'a, T: CodeTable + ?Sized> Encoder<'a, T> {
    fn new(table: &'a T, config: &'a Marc8Config, capacity: usize) -> Self {
        Encoder {
            table,
            config,
            state: config.initial_state(),
            out: UnitBuffer::with_capacity(capacity),
            last_base: None,
            pending_half: None,
            emitted_half: None,
        }
    }

    fn run(mut self, text: &str, report: &mut ConversionReport) -> Result<Vec<u8>> {
        let table: &'a T = self.table;

        for (position, ch) in text.nfd().enumerate() {
            if let Some(byte) = whitespace_byte(ch) {
                self.out.push_unit(&[byte], None);
                self.last_base = None;
                continue;
            }

            let Some(code) = table.lookup_by_utf8(ch) else {
                if self.recompose(ch) {
                    continue;
                }
                let error = Marc8Error::UnmappedCodePoint { ch, position };
                if !self.config.ignore_errors {
                    return Err(error);
                }
                log::warn!("{error}; skipping");
                report.skipped.push(error);
                continue;
            };

            if code.is_combining() {
                if code.is_second_half() && self.absorb_second_half(code) {
                    continue;
                }
                let base = self.out.take_last();
                self.designate(code.charset_id(), code.escape_sequence());
                self.out.push_raw(code.marc8_value());
                if let Some(base) = base {
                    self.push_unit(&base);
                }
                if let Some(second) = self.second_half(code) {
                    self.pending_half = Some(second);
                }
            } else {
                self.emitted_half = None;
                if let Some(half) = self.pending_half.take() {
                    self.designate(half.charset_id(), half.escape_sequence());
                    self.out.push_raw(half.marc8_value());
                    self.emitted_half = half.marc8_value().first().copied();
                }
                self.designate(code.charset_id(), code.escape_sequence());
                self.out.push_unit(code.marc8_value(), Some(code.charset_id()));
                self.last_base = Some(ch);
            }
        }

        self.restore_defaults();
        Ok(self.out.into_bytes())
    }

    /// Emit `escape` unless `charset` is already active in its working set.
    fn designate(&mut self, charset: CharsetId, escape: &[u8]) {
        let slot = charset.default_group();
        if self.state.get(slot).is_interchangeable_with(charset) {
            return;
        }
        self.out.push_raw(escape);
        self.state.set(slot, charset);
    }

    fn push_unit(&mut self, unit: &Unit) {
        if let Some(charset) = unit.charset {
            self.designate(charset, &charset.escape_sequence());
        }
        self.out.push_unit(&unit.bytes, unit.charset);
    }

    /// The second half to write before the next base, for ligature and
    /// double tilde first halves.
    fn second_half(&self, code: &Code) -> Option<&'a Code> {
        let second = code.matching_second_half()?;
        let table: &'a T = self.table;
        table.lookup_by_marc8(CharsetId::EXTENDED_LATIN, &[second])
    }

    /// Whether an explicit second half is already covered by the one a
    /// first half queued or wrote.
    fn absorb_second_half(&mut self, code: &Code) -> bool {
        let byte = code.marc8_value().first().copied();
        if self.pending_half.and_then(|half| half.marc8_value().first().copied()) == byte {
            return true;
        }
        if self.emitted_half.is_some() && self.emitted_half == byte {
            self.emitted_half = None;
            return true;
        }
        false
    }

    /// Replace the last base with its composition with `mark`, when the
    /// mark alone has no mapping but the composed character does.
    fn recompose(&mut self, mark: char) -> bool {
        let table: &'a T = self.table;
        let Some(code) = self
            .last_base
            .and_then(|base| compose(base, mark))
            .and_then(|composed| table.lookup_by_utf8(composed))
            .filter(|code| !code.is_combining())
        else {
            return false;
        };
        if self.out.take_last().is_none() {
            return false;
        }
        self.designate(code.charset_id(), code.escape_sequence());
        self.out.push_unit(code.marc8_value(), Some(code.charset_id()));
        self.last_base = Some(code.utf8_value());
        true
    }

    fn restore_defaults(&mut self) {
        for (slot, default) in [
            (WorkingSet::G0, self.config.default_g0),
            (WorkingSet::G1, self.config.default_g1),
        ] {
            if !self.state.get(slot).is_interchangeable_with(default) {
                self.out.push_raw(&escape::designation(slot, default));
                self.state.set(slot, default);
            }
        }
    }
}
