//! The [`Code`] record: one entry of the MARC-8 / Unicode mapping.

use smallvec::SmallVec;

use crate::charset::{CharsetId, WorkingSet};

/// ANSEL double diacritics as (first half, second half): ligature and
/// double tilde.
const DOUBLE_DIACRITICS: [(u8, u8); 2] = [(0xEB, 0xEC), (0xFA, 0xFB)];

/// One mapping between a MARC-8 byte sequence and a Unicode character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    marc8: SmallVec<[u8; 3]>,
    utf8: char,
    charset: CharsetId,
    is_combining: bool,
    escape: SmallVec<[u8; 4]>,
}

impl Code {
    /// Create a code record.
    ///
    /// The escape sequence into the record's default working set is
    /// computed here, once.
    #[must_use]
    pub fn new(charset: CharsetId, marc8: &[u8], utf8: char, is_combining: bool) -> Self {
        Code {
            marc8: SmallVec::from_slice(marc8),
            utf8,
            charset,
            is_combining,
            escape: charset.escape_sequence(),
        }
    }

    /// The MARC-8 bytes (three for CJK, one otherwise).
    #[must_use]
    pub fn marc8_value(&self) -> &[u8] {
        &self.marc8
    }

    /// The Unicode character.
    #[must_use]
    pub fn utf8_value(&self) -> char {
        self.utf8
    }

    /// The character set this mapping belongs to.
    #[must_use]
    pub fn charset_id(&self) -> CharsetId {
        self.charset
    }

    /// The working set the character set is designated to by default.
    #[must_use]
    pub fn default_group(&self) -> WorkingSet {
        self.charset.default_group()
    }

    /// Whether this is a combining (diacritic) mark.
    #[must_use]
    pub fn is_combining(&self) -> bool {
        self.is_combining
    }

    /// Escape sequence switching into this record's character set.
    #[must_use]
    pub fn escape_sequence(&self) -> &[u8] {
        &self.escape
    }

    /// The single ANSEL byte of this record, if it is one.
    fn ansel_byte(&self) -> Option<u8> {
        match self.marc8.as_slice() {
            [b] if self.charset == CharsetId::EXTENDED_LATIN => Some(*b),
            _ => None,
        }
    }

    /// For the first half of an ANSEL double diacritic, the byte of the
    /// matching second half.
    #[must_use]
    pub fn matching_second_half(&self) -> Option<u8> {
        let byte = self.ansel_byte()?;
        DOUBLE_DIACRITICS
            .iter()
            .find(|&&(first, _)| first == byte)
            .map(|&(_, second)| second)
    }

    /// Whether this is the second half of an ANSEL double diacritic.
    #[must_use]
    pub fn is_second_half(&self) -> bool {
        self.ansel_byte()
            .is_some_and(|byte| DOUBLE_DIACRITICS.iter().any(|&(_, second)| second == byte))
    }
}
