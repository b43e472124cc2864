#![no_main]
use libfuzzer_sys::fuzz_target;
use squirrel::parse_grammar;

fuzz_target!(|data: &[u8]| {
    let Ok(spec) = std::str::from_utf8(data) else {
        return;
    };
    // Any grammar that parses must print back to an equivalent specification.
    if let Ok(grammar) = parse_grammar(spec) {
        let printed = grammar.to_string();
        let reparsed = parse_grammar(&printed).unwrap();
        assert_eq!(printed, reparsed.to_string());
    }
});
