#![no_main]

use libfuzzer_sys::fuzz_target;
use mrrc_marc8::{Marc8Config, Marc8Converter};

fuzz_target!(|data: &[u8]| {
    // Strict decoding may fail, but must not panic.
    let _ = Marc8Converter::default().marc8_to_utf8(data);

    // Ignoring errors always produces output.
    let ignoring = Marc8Converter::with_config(Marc8Config {
        ignore_errors: true,
        ..Marc8Config::default()
    });
    let (_, report) = ignoring
        .decode_with_report(data)
        .expect("ignore policy without fallback never fails");
    assert!(report.skipped.len() <= data.len());
});
