//! Fuzz target: print → parse gives back the same tree
//!
//! Any input that parses is printed in both formats and re-parsed; the
//! re-parsed tree must equal the original. A failure here is a printer
//! bug (or a grammar ambiguity the printer does not account for).

#![no_main]

use libfuzzer_sys::fuzz_target;
use sql_parser::{parse, to_sql, FormatMode};

fuzz_target!(|data: &[u8]| {
    let Ok(sql) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(original) = parse(sql) else {
        return;
    };

    for mode in [FormatMode::Compact, FormatMode::Pretty] {
        let printed = to_sql(&original, mode);
        match parse(&printed) {
            Ok(reparsed) => assert_eq!(
                original, reparsed,
                "Round-trip changed the tree!\nOriginal: {sql}\nPrinted: {printed}"
            ),
            Err(err) => panic!("Round-trip failed!\nOriginal: {sql}\nPrinted: {printed}\nError: {err}"),
        }
    }
});
