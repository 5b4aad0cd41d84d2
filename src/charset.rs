//! MARC-8 graphic character sets and the G0/G1 working-set state.
//!
//! MARC-8 identifies each graphic character set by the final byte of the
//! escape sequence that designates it. A stream has two working sets,
//! G0 and G1, each holding one designated character set at a time.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::escape;

/// Identifier of a MARC-8 graphic character set.
///
/// The wrapped value is the final byte used to designate the set
/// (for example `B` for Basic Latin, `E` for Extended Latin).
/// Escape sequences may designate any byte, so unknown identifiers are
/// representable; they simply have no table entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharsetId(u8);

impl CharsetId {
    /// Basic Latin (ASCII), `ESC ( B`
    pub const BASIC_LATIN: Self = Self(0x42);
    /// ASCII default, `ESC s`. Interchangeable with Basic Latin.
    pub const ASCII_DEFAULT: Self = Self(0x73);
    /// Extended Latin (ANSEL), `ESC ) E`
    pub const EXTENDED_LATIN: Self = Self(0x45);
    /// Greek symbols, `ESC g`
    pub const GREEK_SYMBOLS: Self = Self(0x67);
    /// Subscripts, `ESC b`
    pub const SUBSCRIPTS: Self = Self(0x62);
    /// Superscripts, `ESC p`
    pub const SUPERSCRIPTS: Self = Self(0x70);
    /// Basic Hebrew, `ESC ( 2`
    pub const BASIC_HEBREW: Self = Self(0x32);
    /// Basic Arabic, `ESC ( 3`
    pub const BASIC_ARABIC: Self = Self(0x33);
    /// Extended Arabic, `ESC ) 4`
    pub const EXTENDED_ARABIC: Self = Self(0x34);
    /// Basic Cyrillic, `ESC ( N`
    pub const BASIC_CYRILLIC: Self = Self(0x4E);
    /// Extended Cyrillic, `ESC ) Q`
    pub const EXTENDED_CYRILLIC: Self = Self(0x51);
    /// Basic Greek, `ESC ( S`
    pub const BASIC_GREEK: Self = Self(0x53);
    /// East Asian Character Code (CJK), `ESC $ 1`
    pub const CJK: Self = Self(0x31);

    /// Create an identifier from its designating final byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    /// The designating final byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self.0
    }

    /// Human readable name of the character set.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::BASIC_LATIN => "Basic Latin (ASCII)",
            Self::ASCII_DEFAULT => "ASCII default",
            Self::EXTENDED_LATIN => "Extended Latin (ANSEL)",
            Self::GREEK_SYMBOLS => "Greek symbols",
            Self::SUBSCRIPTS => "Subscripts",
            Self::SUPERSCRIPTS => "Superscripts",
            Self::BASIC_HEBREW => "Basic Hebrew",
            Self::BASIC_ARABIC => "Basic Arabic",
            Self::EXTENDED_ARABIC => "Extended Arabic",
            Self::BASIC_CYRILLIC => "Basic Cyrillic",
            Self::EXTENDED_CYRILLIC => "Extended Cyrillic",
            Self::BASIC_GREEK => "Basic Greek",
            Self::CJK => "East Asian (EACC)",
            _ => "unknown",
        }
    }

    /// Whether this is one of the character sets this crate knows by name.
    #[must_use]
    pub fn is_known(self) -> bool {
        self.name() != "unknown"
    }

    /// Whether this set uses three-byte characters.
    #[must_use]
    pub fn is_cjk(self) -> bool {
        self == Self::CJK
    }

    /// Number of bytes per character in this set.
    #[must_use]
    pub fn char_width(self) -> usize {
        if self.is_cjk() {
            3
        } else {
            1
        }
    }

    /// Whether the set is designated with the two-byte `ESC F` form.
    #[must_use]
    pub fn has_direct_designator(self) -> bool {
        matches!(
            self,
            Self::GREEK_SYMBOLS | Self::SUBSCRIPTS | Self::SUPERSCRIPTS | Self::ASCII_DEFAULT
        )
    }

    /// The identifier used for table lookups: ASCII default reads as Basic Latin.
    #[must_use]
    pub fn canonical(self) -> Self {
        if self == Self::ASCII_DEFAULT {
            Self::BASIC_LATIN
        } else {
            self
        }
    }

    /// Whether switching between `self` and `other` needs no escape.
    #[must_use]
    pub fn is_interchangeable_with(self, other: Self) -> bool {
        self.canonical() == other.canonical()
    }

    /// The working set this character set is conventionally designated to.
    ///
    /// The extended Latin, Arabic and Cyrillic sets live in G1, all others in G0.
    #[must_use]
    pub fn default_group(self) -> WorkingSet {
        match self {
            Self::EXTENDED_LATIN | Self::EXTENDED_ARABIC | Self::EXTENDED_CYRILLIC => {
                WorkingSet::G1
            },
            _ => WorkingSet::G0,
        }
    }

    /// Escape sequence designating this set into its default working set.
    #[must_use]
    pub fn escape_sequence(self) -> SmallVec<[u8; 4]> {
        escape::designation(self.default_group(), self)
    }
}

impl fmt::Display for CharsetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.name(), self.0)
    }
}

/// One of the two working-set slots of a MARC-8 stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkingSet {
    /// Primary set
    G0,
    /// Secondary set
    G1,
}

/// Currently designated character sets for G0 and G1.
///
/// Each conversion owns its own state; nothing here is shared between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharsetState {
    /// Character set designated to G0
    pub g0: CharsetId,
    /// Character set designated to G1
    pub g1: CharsetId,
}

impl CharsetState {
    /// Create a state holding the given designations.
    #[must_use]
    pub const fn new(g0: CharsetId, g1: CharsetId) -> Self {
        CharsetState { g0, g1 }
    }

    /// Character set currently designated to `slot`.
    #[must_use]
    pub fn get(&self, slot: WorkingSet) -> CharsetId {
        match slot {
            WorkingSet::G0 => self.g0,
            WorkingSet::G1 => self.g1,
        }
    }

    /// Designate `charset` to `slot`.
    pub fn set(&mut self, slot: WorkingSet, charset: CharsetId) {
        match slot {
            WorkingSet::G0 => self.g0 = charset,
            WorkingSet::G1 => self.g1 = charset,
        }
    }
}

impl Default for CharsetState {
    /// G0 = ASCII default, G1 = Extended Latin
    fn default() -> Self {
        CharsetState::new(CharsetId::ASCII_DEFAULT, CharsetId::EXTENDED_LATIN)
    }
}
