//! MARC-8 Conversion Example
//!
//! This example demonstrates:
//! - Decoding MARC-8 field data chosen by the leader's character coding
//! - Diacritics that precede their base character in MARC-8
//! - Escape sequences switching between character sets
//! - Strict and ignore error policies, with and without a fallback encoding

use anyhow::Result;
use mrrc_marc8::{encoding, Marc8Config, Marc8Converter, MarcEncoding};

fn main() -> Result<()> {
    println!("=== MARC-8 Conversion ===\n");

    // Example 1: Leader-driven decoding
    leader_example()?;

    // Example 2: Round trips through MARC-8
    roundtrip_example()?;

    // Example 3: Error policies
    error_policy_example()?;

    Ok(())
}

/// Decodes the same title stored under both leader codings.
fn leader_example() -> Result<()> {
    println!("1. Decoding by Leader Position 9\n");

    let fields: [(char, &[u8]); 2] = [
        (' ', b"Bront\xE8e, Charlotte"),
        ('a', "Brontë, Charlotte".as_bytes()),
    ];
    for (leader_char, bytes) in fields {
        let coding = MarcEncoding::from_leader_char(leader_char)?;
        let text = encoding::decode_bytes(bytes, coding)?;
        println!("   Leader 9 = '{leader_char}' ({coding:?}): {text}");
    }
    println!();
    Ok(())
}

/// Shows the MARC-8 bytes produced for text in several scripts.
fn roundtrip_example() -> Result<()> {
    println!("2. Round Trips\n");

    let converter = Marc8Converter::default();
    for text in ["café", "Dvořák", "H₂O", "Война и мир", "一七"] {
        let marc8 = converter.utf8_to_marc8(text)?;
        let back = converter.marc8_to_utf8(&marc8)?;
        println!("   {text:<12} -> {:<40} -> {back}", escape_bytes(&marc8));
    }
    println!();
    Ok(())
}

/// Compares strict decoding, skipping, and fallback on damaged input.
fn error_policy_example() -> Result<()> {
    println!("3. Error Policies\n");

    // UTF-8 that was mislabeled as MARC-8
    let mislabeled = "Straße".as_bytes();

    match Marc8Converter::default().marc8_to_utf8(mislabeled) {
        Ok(text) => println!("   strict:   {text}"),
        Err(e) => println!("   strict:   error: {e}"),
    }

    let skipping = Marc8Converter::with_config(Marc8Config {
        ignore_errors: true,
        ..Marc8Config::default()
    });
    let (text, report) = skipping.decode_with_report(mislabeled)?;
    println!("   ignore:   {text} ({} byte skipped)", report.skipped.len());

    let fallback = Marc8Converter::with_config(Marc8Config::from_json(
        r#"{"ignore_errors": true, "assume_encoding": "utf-8"}"#,
    )?);
    let (text, report) = fallback.decode_with_report(mislabeled)?;
    println!(
        "   fallback: {text} (decoded as {})",
        report.fallback.as_deref().unwrap_or("MARC-8")
    );
    println!();
    Ok(())
}

fn escape_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x1B => "<ESC>".to_string(),
            0x20..=0x7E => char::from(b).to_string(),
            _ => format!("<{b:02X}>"),
        })
        .collect()
}
