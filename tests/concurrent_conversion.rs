//! Conversions running in parallel must not see each other's state.

mod common;

use common::SAMPLES;
use mrrc_marc8::{default_table, CharsetId, Marc8Config, Marc8Converter};
use rayon::prelude::*;

#[test]
fn test_parallel_decode_matches_sequential() {
    let converter = Marc8Converter::default();
    let inputs: Vec<&[u8]> = SAMPLES
        .iter()
        .cycle()
        .take(SAMPLES.len() * 50)
        .map(|(marc8, _)| *marc8)
        .collect();

    let sequential: Vec<String> = inputs
        .iter()
        .map(|input| converter.marc8_to_utf8(input).unwrap())
        .collect();
    let parallel: Vec<String> = inputs
        .par_iter()
        .map(|input| converter.marc8_to_utf8(input).unwrap())
        .collect();

    assert_eq!(sequential, parallel);
}

#[test]
fn test_parallel_encode_restores_escapes_per_call() {
    // each of these leaves G0 or G1 switched mid-string
    let texts = ["H₂O", "ВОЙНА", "一七", "ђ", "αβγ", "plain"];
    let converter = Marc8Converter::default();

    let results: Vec<(usize, Vec<u8>)> = (0..600usize)
        .into_par_iter()
        .map(|i| {
            let text = texts[i % texts.len()];
            (i, converter.utf8_to_marc8(text).unwrap())
        })
        .collect();

    for (i, bytes) in results {
        let text = texts[i % texts.len()];
        assert_eq!(converter.marc8_to_utf8(&bytes).unwrap(), text);
    }
}

#[test]
fn test_converters_with_different_configs_share_table() {
    let ascii = Marc8Converter::default();
    let cyrillic = Marc8Converter::new(
        default_table(),
        Marc8Config {
            default_g0: CharsetId::BASIC_CYRILLIC,
            ..Marc8Config::default()
        },
    );

    let outputs: Vec<(String, String)> = (0..200)
        .into_par_iter()
        .map(|_| {
            (
                ascii.marc8_to_utf8(b"ABC").unwrap(),
                cyrillic.marc8_to_utf8(b"ABC").unwrap(),
            )
        })
        .collect();

    assert!(outputs
        .iter()
        .all(|(latin, cyr)| latin == "ABC" && cyr == "абц"));
}

#[test]
fn test_parallel_ignore_reports_are_independent() {
    let converter = Marc8Converter::with_config(Marc8Config {
        ignore_errors: true,
        ..Marc8Config::default()
    });

    let reports: Vec<usize> = (0..100usize)
        .into_par_iter()
        .map(|n| {
            let mut input = b"ok".to_vec();
            input.extend(std::iter::repeat(0x01).take(n % 5));
            let (text, report) = converter.decode_with_report(&input).unwrap();
            assert_eq!(text, "ok");
            report.skipped.len()
        })
        .collect();

    for (n, skipped) in reports.into_iter().enumerate() {
        assert_eq!(skipped, n % 5);
    }
}
