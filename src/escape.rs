//! ISO 2022 escape sequences as profiled by MARC-8.
//!
//! Recognized forms (`I` = intermediate byte, `F` = final byte):
//!
//! | Bytes | Form | Effect |
//! |---|---|---|
//! | `ESC F` | [`EscapeForm::Direct`] | G0 = F, for F in `g b p s` |
//! | `ESC ( F`, `ESC , F` | [`EscapeForm::Single`] | G0 = F |
//! | `ESC ) F`, `ESC - F` | [`EscapeForm::Single`] | G1 = F |
//! | `ESC $ F` | [`EscapeForm::Multi`] | G0 = F |
//! | `ESC $ , F` | [`EscapeForm::MultiIntermediate`] | G0 = F |
//! | `ESC $ ) F`, `ESC $ - F` | [`EscapeForm::MultiIntermediate`] | G1 = F |
//!
//! Anything else is not an escape; the escape byte is left for the caller
//! to treat as an ordinary (and normally unmapped) byte.

use smallvec::SmallVec;

use crate::charset::{CharsetId, CharsetState, WorkingSet};

/// Escape byte introducing every sequence
pub const ESCAPE: u8 = 0x1B;

const SINGLE_G0_A: u8 = b'(';
const SINGLE_G0_B: u8 = b',';
const SINGLE_G1_A: u8 = b')';
const SINGLE_G1_B: u8 = b'-';
const MULTI: u8 = b'$';

/// Shape of a recognized escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeForm {
    /// `ESC F`
    Direct,
    /// `ESC I F` with a single-byte-set intermediate
    Single,
    /// `ESC $ F`
    Multi,
    /// `ESC $ I F`
    MultiIntermediate,
}

impl EscapeForm {
    /// Total number of bytes in this form, escape byte included.
    #[must_use]
    pub const fn byte_len(self) -> usize {
        match self {
            EscapeForm::Direct => 2,
            EscapeForm::Single | EscapeForm::Multi => 3,
            EscapeForm::MultiIntermediate => 4,
        }
    }
}

/// A recognized designation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Designation {
    /// Form that matched
    pub form: EscapeForm,
    /// Working set being designated
    pub slot: WorkingSet,
    /// Character set designated to it
    pub charset: CharsetId,
}

impl Designation {
    /// Number of bytes the sequence occupies.
    #[must_use]
    pub const fn byte_len(&self) -> usize {
        self.form.byte_len()
    }
}

/// Recognize an escape sequence at the start of `bytes`.
///
/// Returns `None` if `bytes` does not start with a complete escape of one of
/// the recognized forms.
#[must_use]
pub fn recognize(bytes: &[u8]) -> Option<Designation> {
    let (&first, rest) = bytes.split_first()?;
    if first != ESCAPE {
        return None;
    }
    let (&i1, rest) = rest.split_first()?;

    let direct = CharsetId::from_byte(i1);
    if direct.has_direct_designator() {
        return Some(Designation {
            form: EscapeForm::Direct,
            slot: WorkingSet::G0,
            charset: direct,
        });
    }

    let (&b2, rest) = rest.split_first()?;
    let single = |slot| Designation {
        form: EscapeForm::Single,
        slot,
        charset: CharsetId::from_byte(b2),
    };
    match i1 {
        SINGLE_G0_A | SINGLE_G0_B => Some(single(WorkingSet::G0)),
        SINGLE_G1_A | SINGLE_G1_B => Some(single(WorkingSet::G1)),
        MULTI => {
            let slot = match b2 {
                SINGLE_G0_B => Some(WorkingSet::G0),
                SINGLE_G1_A | SINGLE_G1_B => Some(WorkingSet::G1),
                _ => None,
            };
            match slot {
                Some(slot) => rest.first().map(|&f| Designation {
                    form: EscapeForm::MultiIntermediate,
                    slot,
                    charset: CharsetId::from_byte(f),
                }),
                None => Some(Designation {
                    form: EscapeForm::Multi,
                    slot: WorkingSet::G0,
                    charset: CharsetId::from_byte(b2),
                }),
            }
        },
        _ => None,
    }
}

/// Consume an escape sequence at `pos`, updating `state`.
///
/// Returns the position after the sequence, or `pos` unchanged when no
/// escape sequence starts there.
pub fn process_escape(bytes: &[u8], pos: usize, state: &mut CharsetState) -> usize {
    let Some(designation) = bytes.get(pos..).and_then(recognize) else {
        return pos;
    };
    if !designation.charset.is_known() {
        log::debug!(
            "escape at offset {pos} designates unknown character set {}",
            designation.charset
        );
    }
    state.set(designation.slot, designation.charset);
    pos + designation.byte_len()
}

/// Escape sequence designating `charset` into `slot`.
#[must_use]
pub fn designation(slot: WorkingSet, charset: CharsetId) -> SmallVec<[u8; 4]> {
    let mut seq = SmallVec::new();
    seq.push(ESCAPE);
    match slot {
        WorkingSet::G0 if charset.has_direct_designator() => {},
        WorkingSet::G0 if charset.is_cjk() => seq.push(MULTI),
        WorkingSet::G0 => seq.push(SINGLE_G0_A),
        WorkingSet::G1 if charset.is_cjk() => seq.extend_from_slice(&[MULTI, SINGLE_G1_A]),
        WorkingSet::G1 => seq.push(SINGLE_G1_A),
    }
    seq.push(charset.as_byte());
    seq
}
