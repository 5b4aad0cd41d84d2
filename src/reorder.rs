//! Reordering of combining marks between MARC-8 and Unicode order.
//!
//! MARC-8 stores a diacritic before the character it modifies, Unicode
//! after it. Decoding buffers marks until the next base character;
//! encoding pulls the last emitted unit back out so a mark can be written
//! in front of it.

use smallvec::SmallVec;

use crate::charset::CharsetId;

/// Combining marks waiting for their base character (decode side).
#[derive(Debug, Default)]
pub struct CombiningBuffer {
    pending: SmallVec<[char; 4]>,
}

impl CombiningBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold a combining mark until the next base character.
    pub fn push(&mut self, mark: char) {
        self.pending.push(mark);
    }

    /// Whether no marks are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Write `base` followed by the pending marks, in the order they were met.
    pub fn emit_with_base(&mut self, base: char, out: &mut String) {
        out.push(base);
        self.flush(out);
    }

    /// Write the pending marks with no base.
    pub fn flush(&mut self, out: &mut String) {
        out.extend(self.pending.drain(..));
    }
}

/// A unit of encoded output: the bytes of one character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// The unit's MARC-8 bytes
    pub bytes: SmallVec<[u8; 3]>,
    /// The character set the bytes are read in, `None` for whitespace
    pub charset: Option<CharsetId>,
}

/// Encoded output that remembers where its last unit starts (encode side).
#[derive(Debug, Default)]
pub struct UnitBuffer {
    bytes: Vec<u8>,
    last: Option<(usize, Option<CharsetId>)>,
}

impl UnitBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        UnitBuffer {
            bytes: Vec::with_capacity(capacity),
            last: None,
        }
    }

    /// Append bytes that are not a character (escape sequences).
    pub fn push_raw(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Append one character unit.
    pub fn push_unit(&mut self, bytes: &[u8], charset: Option<CharsetId>) {
        self.last = Some((self.bytes.len(), charset));
        self.bytes.extend_from_slice(bytes);
    }

    /// Remove the most recently pushed unit.
    ///
    /// Anything pushed after the unit is removed with it. Returns `None` if
    /// there is no unit to take back (start of output, or already taken).
    pub fn take_last(&mut self) -> Option<Unit> {
        let (start, charset) = self.last.take()?;
        let bytes = SmallVec::from_slice(&self.bytes[start..]);
        self.bytes.truncate(start);
        Some(Unit { bytes, charset })
    }

    /// The bytes written so far.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
