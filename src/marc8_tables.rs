//! MARC-8 code tables.
//!
//! The converter only sees the [`CodeTable`] trait. [`Marc8Table`] is the
//! built-in implementation: it is built once from the static data below and
//! is read-only afterwards, so one instance can be shared by any number of
//! concurrent conversions. A table built from other data (for example the
//! complete Library of Congress code tables) can be injected through
//! [`Marc8Table::from_codes`] and
//! [`Marc8Converter::new`](crate::convert::Marc8Converter::new).

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::charset::CharsetId;
use crate::code::Code;

/// Read-only bidirectional lookup between MARC-8 and Unicode.
pub trait CodeTable {
    /// Find the record for `marc8` bytes in `charset`.
    fn lookup_by_marc8(&self, charset: CharsetId, marc8: &[u8]) -> Option<&Code>;

    /// Find the record for a Unicode character.
    fn lookup_by_utf8(&self, ch: char) -> Option<&Code>;
}

/// Hash key for a MARC-8 byte sequence of at most three bytes.
fn marc8_key(marc8: &[u8]) -> Option<u32> {
    if marc8.is_empty() || marc8.len() > 3 {
        return None;
    }
    Some(marc8.iter().fold(0u32, |key, &b| (key << 8) | u32::from(b)))
}

/// In-memory code table.
#[derive(Debug, Clone, Default)]
pub struct Marc8Table {
    codes: Vec<Code>,
    by_marc8: HashMap<(CharsetId, u32), usize>,
    by_utf8: HashMap<char, usize>,
}

impl Marc8Table {
    /// Build a table from code records.
    ///
    /// A later record for the same charset and bytes replaces an earlier one.
    /// When several records share a Unicode character, the first one
    /// registered is used for encoding.
    #[must_use]
    pub fn from_codes<I>(codes: I) -> Self
    where
        I: IntoIterator<Item = Code>,
    {
        let mut table = Marc8Table::default();
        for code in codes {
            table.insert(code);
        }
        table
    }

    /// The built-in table.
    ///
    /// Prefer [`default_table`], which builds it only once.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Marc8Table::default();
        for b in 0x21..=0x7Eu8 {
            table.insert(Code::new(CharsetId::BASIC_LATIN, &[b], char::from(b), false));
        }
        for &(charset, entries) in SINGLE_BYTE_SETS {
            for &(b, cp, combining) in entries {
                if let Some(ch) = char::from_u32(cp) {
                    table.insert(Code::new(charset, &[b], ch, combining));
                }
            }
        }
        for (charset, first, count, start) in CONTIGUOUS_RUNS {
            for i in 0..*count {
                let ch = char::from_u32(start + u32::from(i));
                if let Some(ch) = ch {
                    table.insert(Code::new(*charset, &[first + i], ch, false));
                }
            }
        }
        for &(key, cp) in EACC {
            if let Some(ch) = char::from_u32(cp) {
                let bytes = key.to_be_bytes();
                table.insert(Code::new(CharsetId::CJK, &bytes[1..], ch, false));
            }
        }
        // Half marks are accepted on encode and written as ANSEL halves.
        table = table
            .with_alias('\u{FE20}', CharsetId::EXTENDED_LATIN, &[0xEB])
            .with_alias('\u{FE22}', CharsetId::EXTENDED_LATIN, &[0xFA]);
        table
    }

    /// Add an encode-only mapping from `ch` to an existing record.
    ///
    /// Does nothing if no record exists for `charset` and `marc8`, or if
    /// `ch` already maps somewhere.
    #[must_use]
    pub fn with_alias(mut self, ch: char, charset: CharsetId, marc8: &[u8]) -> Self {
        let index = marc8_key(marc8).and_then(|key| self.by_marc8.get(&(charset, key)).copied());
        if let Some(index) = index {
            self.by_utf8.entry(ch).or_insert(index);
        }
        self
    }

    /// Number of records in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the table has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterate over all records in insertion order.
    pub fn codes(&self) -> impl Iterator<Item = &Code> {
        self.codes.iter()
    }

    fn insert(&mut self, code: Code) {
        let Some(key) = marc8_key(code.marc8_value()) else {
            return;
        };
        let ch = code.utf8_value();
        let slot = (code.charset_id().canonical(), key);
        let index = if let Some(&existing) = self.by_marc8.get(&slot) {
            self.by_utf8.retain(|_, index| *index != existing);
            self.codes[existing] = code;
            existing
        } else {
            self.codes.push(code);
            self.codes.len() - 1
        };
        self.by_marc8.insert(slot, index);
        self.by_utf8.entry(ch).or_insert(index);
    }
}

impl CodeTable for Marc8Table {
    fn lookup_by_marc8(&self, charset: CharsetId, marc8: &[u8]) -> Option<&Code> {
        let key = marc8_key(marc8)?;
        self.by_marc8
            .get(&(charset.canonical(), key))
            .map(|&index| &self.codes[index])
    }

    fn lookup_by_utf8(&self, ch: char) -> Option<&Code> {
        self.by_utf8.get(&ch).map(|&index| &self.codes[index])
    }
}

lazy_static! {
    static ref DEFAULT_TABLE: Marc8Table = Marc8Table::builtin();
}

/// The shared built-in table, built on first use.
#[must_use]
pub fn default_table() -> &'static Marc8Table {
    &DEFAULT_TABLE
}

type Entries = &'static [(u8, u32, bool)];

/// Single-byte sets: (byte, code point, combining)
const SINGLE_BYTE_SETS: &[(CharsetId, Entries)] = &[
    (CharsetId::EXTENDED_LATIN, ANSEL),
    (CharsetId::SUBSCRIPTS, SUBSCRIPTS),
    (CharsetId::SUPERSCRIPTS, SUPERSCRIPTS),
    (CharsetId::GREEK_SYMBOLS, GREEK_SYMBOLS),
    (CharsetId::BASIC_GREEK, BASIC_GREEK),
    (CharsetId::BASIC_CYRILLIC, BASIC_CYRILLIC),
    (CharsetId::EXTENDED_CYRILLIC, EXTENDED_CYRILLIC),
    (CharsetId::BASIC_HEBREW, BASIC_HEBREW),
    (CharsetId::BASIC_ARABIC, BASIC_ARABIC),
];

/// Runs of consecutive bytes mapping to consecutive code points:
/// (charset, first byte, count, first code point)
const CONTIGUOUS_RUNS: &[(CharsetId, u8, u8, u32)] = &[
    // alef..tav, final forms included
    (CharsetId::BASIC_HEBREW, 0x60, 27, 0x05D0),
    // hamza..ghain
    (CharsetId::BASIC_ARABIC, 0x41, 26, 0x0621),
    // tatweel..yeh
    (CharsetId::BASIC_ARABIC, 0x60, 11, 0x0640),
    // Arabic-Indic digits
    (CharsetId::BASIC_ARABIC, 0x30, 10, 0x0660),
];

/// Extended Latin (ANSEL)
const ANSEL: Entries = &[
    (0xA1, 0x0141, false),
    (0xA2, 0x00D8, false),
    (0xA3, 0x0110, false),
    (0xA4, 0x00DE, false),
    (0xA5, 0x00C6, false),
    (0xA6, 0x0152, false),
    (0xA7, 0x02B9, false),
    (0xA8, 0x00B7, false),
    (0xA9, 0x266D, false),
    (0xAA, 0x00AE, false),
    (0xAB, 0x00B1, false),
    (0xAC, 0x01A0, false),
    (0xAD, 0x01AF, false),
    (0xAE, 0x02BC, false),
    (0xB0, 0x02BB, false),
    (0xB1, 0x0142, false),
    (0xB2, 0x00F8, false),
    (0xB3, 0x0111, false),
    (0xB4, 0x00FE, false),
    (0xB5, 0x00E6, false),
    (0xB6, 0x0153, false),
    (0xB7, 0x02BA, false),
    (0xB8, 0x0131, false),
    (0xB9, 0x00A3, false),
    (0xBA, 0x00F0, false),
    (0xBC, 0x01A1, false),
    (0xBD, 0x01B0, false),
    (0xC0, 0x00B0, false),
    (0xC1, 0x2113, false),
    (0xC2, 0x2117, false),
    (0xC3, 0x00A9, false),
    (0xC4, 0x266F, false),
    (0xC5, 0x00BF, false),
    (0xC6, 0x00A1, false),
    (0xC7, 0x00DF, false),
    (0xC8, 0x20AC, false),
    (0xE0, 0x0309, true),
    (0xE1, 0x0300, true),
    (0xE2, 0x0301, true),
    (0xE3, 0x0302, true),
    (0xE4, 0x0303, true),
    (0xE5, 0x0304, true),
    (0xE6, 0x0306, true),
    (0xE7, 0x0307, true),
    (0xE8, 0x0308, true),
    (0xE9, 0x030C, true),
    (0xEA, 0x030A, true),
    // ligature, first half
    (0xEB, 0x0361, true),
    // ligature, second half
    (0xEC, 0xFE21, true),
    (0xED, 0x0315, true),
    (0xEE, 0x030B, true),
    (0xEF, 0x0310, true),
    (0xF0, 0x0327, true),
    (0xF1, 0x0328, true),
    (0xF2, 0x0323, true),
    (0xF3, 0x0324, true),
    (0xF4, 0x0325, true),
    (0xF5, 0x0333, true),
    (0xF6, 0x0332, true),
    (0xF7, 0x0326, true),
    (0xF8, 0x031C, true),
    (0xF9, 0x032E, true),
    // double tilde, first half
    (0xFA, 0x0360, true),
    // double tilde, second half
    (0xFB, 0xFE23, true),
    (0xFE, 0x0313, true),
];

const SUBSCRIPTS: Entries = &[
    (0x28, 0x208D, false),
    (0x29, 0x208E, false),
    (0x2B, 0x208A, false),
    (0x2D, 0x208B, false),
    (0x30, 0x2080, false),
    (0x31, 0x2081, false),
    (0x32, 0x2082, false),
    (0x33, 0x2083, false),
    (0x34, 0x2084, false),
    (0x35, 0x2085, false),
    (0x36, 0x2086, false),
    (0x37, 0x2087, false),
    (0x38, 0x2088, false),
    (0x39, 0x2089, false),
];

const SUPERSCRIPTS: Entries = &[
    (0x28, 0x207D, false),
    (0x29, 0x207E, false),
    (0x2B, 0x207A, false),
    (0x2D, 0x207B, false),
    (0x30, 0x2070, false),
    (0x31, 0x00B9, false),
    (0x32, 0x00B2, false),
    (0x33, 0x00B3, false),
    (0x34, 0x2074, false),
    (0x35, 0x2075, false),
    (0x36, 0x2076, false),
    (0x37, 0x2077, false),
    (0x38, 0x2078, false),
    (0x39, 0x2079, false),
];

const GREEK_SYMBOLS: Entries = &[
    (0x61, 0x03B1, false),
    (0x62, 0x03B2, false),
    (0x63, 0x03B3, false),
];

const BASIC_GREEK: Entries = &[
    (0x41, 0x0391, false),
    (0x42, 0x0392, false),
    (0x44, 0x0393, false),
    (0x45, 0x0394, false),
    (0x46, 0x0395, false),
    (0x47, 0x03DA, false),
    (0x48, 0x03DC, false),
    (0x49, 0x0396, false),
    (0x4A, 0x0397, false),
    (0x4B, 0x0398, false),
    (0x4C, 0x0399, false),
    (0x4D, 0x039A, false),
    (0x4E, 0x039B, false),
    (0x4F, 0x039C, false),
    (0x50, 0x039D, false),
    (0x51, 0x039E, false),
    (0x52, 0x039F, false),
    (0x53, 0x03A0, false),
    (0x54, 0x03DE, false),
    (0x55, 0x03A1, false),
    (0x56, 0x03A3, false),
    (0x58, 0x03A4, false),
    (0x59, 0x03A5, false),
    (0x5A, 0x03A6, false),
    (0x5B, 0x03A7, false),
    (0x5C, 0x03A8, false),
    (0x5D, 0x03A9, false),
    (0x5E, 0x03E0, false),
    (0x61, 0x03B1, false),
    (0x62, 0x03B2, false),
    (0x63, 0x03D0, false),
    (0x64, 0x03B3, false),
    (0x65, 0x03B4, false),
    (0x66, 0x03B5, false),
    (0x67, 0x03DB, false),
    (0x68, 0x03DD, false),
    (0x69, 0x03B6, false),
    (0x6A, 0x03B7, false),
    (0x6B, 0x03B8, false),
    (0x6C, 0x03B9, false),
    (0x6D, 0x03BA, false),
    (0x6E, 0x03BB, false),
    (0x6F, 0x03BC, false),
    (0x70, 0x03BD, false),
    (0x71, 0x03BE, false),
    (0x72, 0x03BF, false),
    (0x73, 0x03C0, false),
    (0x74, 0x03DF, false),
    (0x75, 0x03C1, false),
    (0x76, 0x03C3, false),
    (0x77, 0x03C2, false),
    (0x78, 0x03C4, false),
    (0x79, 0x03C5, false),
    (0x7A, 0x03C6, false),
    (0x7B, 0x03C7, false),
    (0x7C, 0x03C8, false),
    (0x7D, 0x03C9, false),
    (0x7E, 0x03E1, false),
];

/// ISO 5427
const BASIC_CYRILLIC: Entries = &[
    (0x40, 0x044E, false),
    (0x41, 0x0430, false),
    (0x42, 0x0431, false),
    (0x43, 0x0446, false),
    (0x44, 0x0434, false),
    (0x45, 0x0435, false),
    (0x46, 0x0444, false),
    (0x47, 0x0433, false),
    (0x48, 0x0445, false),
    (0x49, 0x0438, false),
    (0x4A, 0x0439, false),
    (0x4B, 0x043A, false),
    (0x4C, 0x043B, false),
    (0x4D, 0x043C, false),
    (0x4E, 0x043D, false),
    (0x4F, 0x043E, false),
    (0x50, 0x043F, false),
    (0x51, 0x044F, false),
    (0x52, 0x0440, false),
    (0x53, 0x0441, false),
    (0x54, 0x0442, false),
    (0x55, 0x0443, false),
    (0x56, 0x0436, false),
    (0x57, 0x0432, false),
    (0x58, 0x044C, false),
    (0x59, 0x044B, false),
    (0x5A, 0x0437, false),
    (0x5B, 0x0448, false),
    (0x5C, 0x044D, false),
    (0x5D, 0x0449, false),
    (0x5E, 0x0447, false),
    (0x5F, 0x044A, false),
    (0x60, 0x042E, false),
    (0x61, 0x0410, false),
    (0x62, 0x0411, false),
    (0x63, 0x0426, false),
    (0x64, 0x0414, false),
    (0x65, 0x0415, false),
    (0x66, 0x0424, false),
    (0x67, 0x0413, false),
    (0x68, 0x0425, false),
    (0x69, 0x0418, false),
    (0x6A, 0x0419, false),
    (0x6B, 0x041A, false),
    (0x6C, 0x041B, false),
    (0x6D, 0x041C, false),
    (0x6E, 0x041D, false),
    (0x6F, 0x041E, false),
    (0x70, 0x041F, false),
    (0x71, 0x042F, false),
    (0x72, 0x0420, false),
    (0x73, 0x0421, false),
    (0x74, 0x0422, false),
    (0x75, 0x0423, false),
    (0x76, 0x0416, false),
    (0x77, 0x0412, false),
    (0x78, 0x042C, false),
    (0x79, 0x042B, false),
    (0x7A, 0x0417, false),
    (0x7B, 0x0428, false),
    (0x7C, 0x042D, false),
    (0x7D, 0x0429, false),
    (0x7E, 0x0427, false),
];

const EXTENDED_CYRILLIC: Entries = &[
    (0xC0, 0x0491, false),
    (0xC1, 0x0452, false),
    (0xC2, 0x0453, false),
    (0xC3, 0x0454, false),
    (0xC4, 0x0451, false),
    (0xC5, 0x0455, false),
    (0xC6, 0x0456, false),
    (0xC7, 0x0457, false),
    (0xC8, 0x0458, false),
    (0xC9, 0x0459, false),
    (0xCA, 0x045A, false),
    (0xCB, 0x045B, false),
    (0xCC, 0x045C, false),
    (0xCD, 0x045E, false),
    (0xCE, 0x045F, false),
    (0xD0, 0x0463, false),
    (0xD1, 0x0473, false),
    (0xD2, 0x0475, false),
    (0xD3, 0x046B, false),
    (0xE0, 0x0490, false),
    (0xE1, 0x0402, false),
    (0xE2, 0x0403, false),
    (0xE3, 0x0404, false),
    (0xE4, 0x0401, false),
    (0xE5, 0x0405, false),
    (0xE6, 0x0406, false),
    (0xE7, 0x0407, false),
    (0xE8, 0x0408, false),
    (0xE9, 0x0409, false),
    (0xEA, 0x040A, false),
    (0xEB, 0x040B, false),
    (0xEC, 0x040C, false),
    (0xED, 0x040E, false),
    (0xEE, 0x040F, false),
    (0xEF, 0x042A, false),
    (0xF0, 0x0462, false),
    (0xF1, 0x0472, false),
    (0xF2, 0x0474, false),
    (0xF3, 0x046A, false),
];

/// Punctuation only; the letters are a contiguous run.
const BASIC_HEBREW: Entries = &[
    (0x21, 0x0021, false),
    (0x22, 0x05F4, false),
    (0x27, 0x05F3, false),
    (0x2C, 0x002C, false),
    (0x2D, 0x05BE, false),
    (0x2E, 0x002E, false),
    (0x3F, 0x003F, false),
];

/// Punctuation and harakat; letters and digits are contiguous runs.
const BASIC_ARABIC: Entries = &[
    (0x2C, 0x060C, false),
    (0x3B, 0x061B, false),
    (0x3F, 0x061F, false),
    (0x6B, 0x064B, true),
    (0x6C, 0x064C, true),
    (0x6D, 0x064D, true),
    (0x6E, 0x064E, true),
    (0x6F, 0x064F, true),
    (0x70, 0x0650, true),
    (0x71, 0x0651, true),
    (0x72, 0x0652, true),
];

/// A sample of EACC: (three-byte code, code point)
const EACC: &[(u32, u32)] = &[
    (0x21_23_20, 0x3000),
    (0x21_23_21, 0x3001),
    (0x21_23_22, 0x3002),
    (0x21_23_28, 0xFF08),
    (0x21_23_29, 0xFF09),
    (0x21_30_21, 0x4E00),
    (0x21_30_22, 0x4E59),
    (0x21_30_23, 0x4E01),
    (0x21_30_24, 0x4E03),
    (0x69_24_22, 0x3042),
    (0x69_24_24, 0x3044),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_latin_lookup() {
        let table = default_table();
        let code = table
            .lookup_by_marc8(CharsetId::BASIC_LATIN, b"A")
            .expect("A should be mapped");
        assert_eq!(code.utf8_value(), 'A');
        assert!(!code.is_combining());
    }

    #[test]
    fn test_ascii_default_reads_as_basic_latin() {
        let table = default_table();
        let code = table
            .lookup_by_marc8(CharsetId::ASCII_DEFAULT, b"z")
            .expect("z should be mapped");
        assert_eq!(code.charset_id(), CharsetId::BASIC_LATIN);
    }

    #[test]
    fn test_same_byte_differs_by_charset() {
        let table = default_table();
        let latin = table.lookup_by_marc8(CharsetId::BASIC_LATIN, b"a").unwrap();
        let cyrillic = table.lookup_by_marc8(CharsetId::BASIC_CYRILLIC, b"a").unwrap();
        let greek = table.lookup_by_marc8(CharsetId::GREEK_SYMBOLS, b"a").unwrap();
        assert_eq!(latin.utf8_value(), 'a');
        assert_eq!(cyrillic.utf8_value(), 'А');
        assert_eq!(greek.utf8_value(), 'α');
    }

    #[test]
    fn test_ansel_combining() {
        let table = default_table();
        let acute = table
            .lookup_by_marc8(CharsetId::EXTENDED_LATIN, &[0xE2])
            .unwrap();
        assert!(acute.is_combining());
        assert_eq!(acute.utf8_value(), '\u{0301}');
        let l_stroke = table
            .lookup_by_marc8(CharsetId::EXTENDED_LATIN, &[0xA1])
            .unwrap();
        assert!(!l_stroke.is_combining());
        assert_eq!(l_stroke.utf8_value(), 'Ł');
    }

    #[test]
    fn test_cjk_lookup_needs_three_bytes() {
        let table = default_table();
        let code = table
            .lookup_by_marc8(CharsetId::CJK, &[0x21, 0x30, 0x21])
            .unwrap();
        assert_eq!(code.utf8_value(), '一');
        assert!(table.lookup_by_marc8(CharsetId::CJK, &[0x21]).is_none());
        assert!(table.lookup_by_marc8(CharsetId::CJK, &[0x21, 0x30]).is_none());
    }

    #[test]
    fn test_utf8_lookup_prefers_basic_latin() {
        let table = default_table();
        let code = table.lookup_by_utf8('!').unwrap();
        assert_eq!(code.charset_id(), CharsetId::BASIC_LATIN);
        let code = table.lookup_by_utf8('٣').unwrap();
        assert_eq!(code.charset_id(), CharsetId::BASIC_ARABIC);
        assert_eq!(code.marc8_value(), b"3");
    }

    #[test]
    fn test_hebrew_and_arabic_runs() {
        let table = default_table();
        assert_eq!(
            table.lookup_by_marc8(CharsetId::BASIC_HEBREW, &[0x60]).unwrap().utf8_value(),
            'א'
        );
        assert_eq!(
            table.lookup_by_marc8(CharsetId::BASIC_HEBREW, &[0x7A]).unwrap().utf8_value(),
            'ת'
        );
        assert_eq!(
            table.lookup_by_marc8(CharsetId::BASIC_ARABIC, &[0x48]).unwrap().utf8_value(),
            'ب'
        );
        assert!(table
            .lookup_by_marc8(CharsetId::BASIC_ARABIC, &[0x6E])
            .unwrap()
            .is_combining());
    }

    #[test]
    fn test_half_mark_aliases() {
        let table = default_table();
        let code = table.lookup_by_utf8('\u{FE20}').unwrap();
        assert_eq!(code.marc8_value(), &[0xEB]);
        assert_eq!(code.utf8_value(), '\u{0361}');
    }

    #[test]
    fn test_from_codes_injection() {
        let table = Marc8Table::from_codes([
            Code::new(CharsetId::BASIC_LATIN, b"A", 'A', false),
            Code::new(CharsetId::BASIC_LATIN, b"A", 'Ä', false),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.lookup_by_marc8(CharsetId::BASIC_LATIN, b"A").unwrap().utf8_value(),
            'Ä'
        );
        assert!(table.lookup_by_marc8(CharsetId::BASIC_LATIN, b"B").is_none());
        assert!(table.lookup_by_utf8('A').is_none());
        assert_eq!(table.lookup_by_utf8('Ä').unwrap().marc8_value(), b"A");
    }

    #[test]
    fn test_rejects_oversized_keys() {
        assert_eq!(marc8_key(&[]), None);
        assert_eq!(marc8_key(&[1, 2, 3, 4]), None);
        assert_eq!(marc8_key(&[0x21, 0x30, 0x21]), Some(0x21_30_21));
    }
}
