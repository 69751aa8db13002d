#![no_main]

use libfuzzer_sys::fuzz_target;
use phonodrift::Engine;

// Two rules separated by a newline; composition must stay bounded
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Some((first, second)) = s.split_once('\n') else {
        return;
    };
    let engine = Engine::new();
    if let (Ok(first), Ok(second)) = (engine.parse_rule(first), engine.parse_rule(second)) {
        let _ = engine.combine(&first, &second);
        let _ = first.trim();
        let _ = first.merge_sequential(&second, engine.catalog());
    }
});
