//! Integration tests for MARC-8 conversion in both directions

mod common;

use common::{ignoring, strict, SAMPLES};
use mrrc_marc8::{
    CharsetId, Code, Marc8Config, Marc8Converter, Marc8Error, Marc8Table, MarcEncoding,
};

#[test]
fn test_samples_decode() {
    for (marc8, text) in SAMPLES {
        let decoded = strict().marc8_to_utf8(marc8).expect("sample should decode");
        assert_eq!(&decoded, text, "decoding {marc8:?}");
    }
}

#[test]
fn test_samples_encode() {
    for (marc8, text) in SAMPLES {
        let encoded = strict().utf8_to_marc8(text).expect("sample should encode");
        assert_eq!(&encoded, marc8, "encoding {text}");
    }
}

#[test]
fn test_acute_then_i_is_single_code_point() {
    let decoded = strict().marc8_to_utf8(b"\xE2i").unwrap();
    assert_eq!(decoded, "\u{00ED}");
    assert_eq!(decoded.chars().count(), 1);
}

#[test]
fn test_whitespace_only_input_is_unchanged() {
    let inputs: [&[u8]; 4] = [b"", b" ", b"\r\n", b"  \t \n\n\r "];
    for input in inputs {
        let decoded = strict().marc8_to_utf8(input).unwrap();
        assert_eq!(decoded.as_bytes(), input);
    }
}

#[test]
fn test_whitespace_does_not_flush_marks() {
    // the mark waits for the next base character, not the space
    let decoded = strict().marc8_to_utf8(b"\xE2 e").unwrap();
    assert_eq!(decoded, " é");
}

#[test]
fn test_escape_state_persists_until_next_escape() {
    let decoded = strict()
        .marc8_to_utf8(b"\x1Bp123 456\x1Bs789")
        .unwrap();
    assert_eq!(decoded, "¹²³ ⁴⁵⁶789");
}

#[test]
fn test_state_does_not_leak_between_calls() {
    let converter = strict();
    assert_eq!(converter.marc8_to_utf8(b"\x1B(NABC").unwrap(), "абц");
    assert_eq!(converter.marc8_to_utf8(b"abc").unwrap(), "abc");

    // a failed call leaves nothing behind either
    assert!(converter.marc8_to_utf8(b"\x1Bb1\x01").is_err());
    assert_eq!(converter.marc8_to_utf8(b"1").unwrap(), "1");
}

#[test]
fn test_hebrew_in_g0() {
    let decoded = strict().marc8_to_utf8(b"\x1B(2`ab\x1B(B!").unwrap();
    assert_eq!(decoded, "אבג!");
    let encoded = strict().utf8_to_marc8("אבג!").unwrap();
    assert_eq!(encoded, b"\x1B(2`ab\x1B(B!");
}

#[test]
fn test_arabic_with_harakat() {
    // beh with fatha, then alef
    let decoded = strict().marc8_to_utf8(b"\x1B(3\x6EHG\x1Bs").unwrap();
    assert_eq!(decoded, "بَا");
    let encoded = strict().utf8_to_marc8("بَا").unwrap();
    assert_eq!(encoded, b"\x1B(3\x6EHG\x1Bs");
}

#[test]
fn test_extended_cyrillic_in_g1() {
    let encoded = strict().utf8_to_marc8("ђ").unwrap();
    assert_eq!(encoded, b"\x1B)Q\xC1\x1B)E");
    assert_eq!(strict().marc8_to_utf8(&encoded).unwrap(), "ђ");
}

#[test]
fn test_cjk_in_g1() {
    let decoded = strict().marc8_to_utf8(b"\x1B$)1\xA1\xB0\xA1").unwrap();
    assert_eq!(decoded, "一");
}

#[test]
fn test_cjk_always_three_bytes() {
    // six bytes, two characters; never six single-byte lookups
    let decoded = strict()
        .marc8_to_utf8(b"\x1B$1\x21\x30\x21\x21\x30\x22")
        .unwrap();
    assert_eq!(decoded.chars().count(), 2);
    assert_eq!(decoded, "一乙");
}

#[test]
fn test_strict_unmapped_byte() {
    let err = strict().marc8_to_utf8(b"Title\x7F").unwrap_err();
    assert!(matches!(
        err,
        Marc8Error::UnmappedByte {
            byte: 0x7F,
            offset: 5,
            ..
        }
    ));
}

#[test]
fn test_ignore_omits_exactly_one_byte() {
    let strict_input = b"P\xE2erez\x9Fand \xE8a";
    assert!(strict().marc8_to_utf8(strict_input).is_err());
    let (decoded, report) = ignoring().decode_with_report(strict_input).unwrap();
    assert_eq!(decoded, "Pérezand ä");
    assert_eq!(
        report.skipped,
        vec![Marc8Error::UnmappedByte {
            byte: 0x9F,
            offset: 6,
            g0: CharsetId::ASCII_DEFAULT,
            g1: CharsetId::EXTENDED_LATIN,
        }]
    );
}

#[test]
fn test_fallback_replaces_all_output() {
    let converter = Marc8Converter::with_config(Marc8Config {
        ignore_errors: true,
        assume_encoding: Some("windows-1252".to_string()),
        ..Marc8Config::default()
    });
    // the acute would have been reordered under MARC-8; fallback keeps the raw bytes
    let (decoded, report) = converter.decode_with_report(b"\xE2e \x81").unwrap();
    assert_eq!(decoded, "\u{E2}e \u{81}");
    assert_eq!(report.fallback.as_deref(), Some("windows-1252"));
    assert_eq!(report.skipped.len(), 1);
}

#[test]
fn test_encode_unmapped_code_point() {
    let err = strict().utf8_to_marc8("snow ☃ man").unwrap_err();
    assert_eq!(err, Marc8Error::UnmappedCodePoint { ch: '☃', position: 5 });

    let (encoded, report) = ignoring().encode_with_report("snow ☃ man").unwrap();
    assert_eq!(encoded, b"snow  man");
    assert_eq!(report.skipped.len(), 1);
}

#[test]
fn test_encode_ends_in_default_sets() {
    let encoded = strict().utf8_to_marc8("Ł₂").unwrap();
    assert!(encoded.ends_with(b"\x1Bs"));

    let converter = Marc8Converter::with_config(Marc8Config {
        default_g0: CharsetId::BASIC_LATIN,
        ..Marc8Config::default()
    });
    let encoded = converter.utf8_to_marc8("Ł₂").unwrap();
    assert_eq!(encoded, b"\xA1\x1Bb2\x1B(B");
}

#[test]
fn test_cjk_default_g0() {
    let converter = Marc8Converter::with_config(Marc8Config {
        default_g0: CharsetId::CJK,
        ..Marc8Config::default()
    });
    assert_eq!(converter.marc8_to_utf8(b"\x21\x30\x21").unwrap(), "一");
    let encoded = converter.utf8_to_marc8("一a").unwrap();
    assert_eq!(encoded, b"\x21\x30\x21\x1B(Ba\x1B$1");
}

#[test]
fn test_mark_before_first_base() {
    // nothing to move in front of: the mark is written where it is
    let encoded = strict().utf8_to_marc8("\u{0301}a").unwrap();
    assert_eq!(encoded, b"\xE2a");
}

#[test]
fn test_injected_table() {
    let table = Marc8Table::from_codes([
        Code::new(CharsetId::BASIC_LATIN, b"a", 'a', false),
        Code::new(CharsetId::BASIC_GREEK, b"a", 'α', false),
    ]);
    let converter = Marc8Converter::new(&table, Marc8Config::default());
    assert_eq!(converter.utf8_to_marc8("aα").unwrap(), b"a\x1B(Sa\x1Bs");
    assert_eq!(converter.marc8_to_utf8(b"a\x1B(Sa\x1Bs").unwrap(), "aα");
}

#[test]
fn test_leader_dispatch() {
    let encoding = MarcEncoding::from_leader_char(' ').unwrap();
    assert_eq!(
        mrrc_marc8::encoding::decode_bytes(b"Bront\xE8e", encoding).unwrap(),
        "Brontë"
    );
}
