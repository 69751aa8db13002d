#![no_main]

use libfuzzer_sys::fuzz_target;
use phonodrift::Engine;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let engine = Engine::new();

        if let Ok(rule) = engine.parse_rule(s) {
            let _ = engine.parse_rule(&rule.to_string());
        }
    }
});
