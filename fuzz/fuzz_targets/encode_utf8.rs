#![no_main]

use libfuzzer_sys::fuzz_target;
use mrrc_marc8::{Marc8Config, Marc8Converter};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

fuzz_target!(|text: &str| {
    let ignoring = Marc8Converter::with_config(Marc8Config {
        ignore_errors: true,
        ..Marc8Config::default()
    });
    let marc8 = ignoring
        .utf8_to_marc8(text)
        .expect("ignore policy never fails on encode");

    // Whatever was encodable must decode strictly.
    let decoded = Marc8Converter::default()
        .marc8_to_utf8(&marc8)
        .expect("encoder output should decode");

    // Fully mappable input without marks survives the round trip.
    if Marc8Converter::default().utf8_to_marc8(text).is_ok()
        && !text.nfd().any(is_combining_mark)
    {
        assert_eq!(decoded, text.nfc().collect::<String>());
    }
});

