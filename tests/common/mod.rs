//! Common test helpers and sample data shared across the test suite.

#![allow(dead_code)]

use mrrc_marc8::{Marc8Config, Marc8Converter};

/// MARC-8 / Unicode pairs that convert exactly in both directions.
///
/// The Unicode side is NFC, the form decoding produces.
pub const SAMPLES: &[(&[u8], &str)] = &[
    (b"The Great Gatsby", "The Great Gatsby"),
    (b"caf\xE2e", "café"),
    (b"Bront\xE8e, Charlotte", "Brontë, Charlotte"),
    (b"Dvo\xE9r\xE2ak", "Dvořák"),
    (b"\xA1\xE2od\xE2z", "Łódź"),
    (b"H\x1Bb2\x1B(BO", "H₂O"),
    (b"E = mc\x1Bp2\x1Bs", "E = mc²"),
    (b"\x1Bgabc\x1Bs", "αβγ"),
    (
        b"\x1B(Nwo\xE6ina i mir \x1B(B(War and Peace)",
        "ВОЙНА И МИР (War and Peace)",
    ),
    (b"\x1B$1\x21\x30\x21\x21\x30\x24\x1Bs", "一七"),
];

/// Creates a strict converter over the built-in table.
pub fn strict() -> Marc8Converter<'static> {
    Marc8Converter::default()
}

/// Creates a converter that skips unmapped input.
pub fn ignoring() -> Marc8Converter<'static> {
    Marc8Converter::with_config(Marc8Config {
        ignore_errors: true,
        ..Marc8Config::default()
    })
}
