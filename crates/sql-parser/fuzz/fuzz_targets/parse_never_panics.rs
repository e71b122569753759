//! Fuzz target: the lexer and parser return errors, never panic

#![no_main]

use libfuzzer_sys::fuzz_target;
use sql_parser::{parse_script, tokenize};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = tokenize(s);
        // Exercises single statements too, plus separator handling
        let _ = parse_script(s);
    }
});
