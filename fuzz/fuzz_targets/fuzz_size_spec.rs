#![no_main]

use libfuzzer_sys::fuzz_target;
use sash_layout::{SizeSpec, SpecEncoding};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 4096 {
        return;
    }

    for encoding in [SpecEncoding::Extended, SpecEncoding::ModeTagged] {
        // Parsing never panics and never yields a non-finite or negative default.
        let spec = SizeSpec::parse(encoding, text);
        assert!(spec.default_value.is_finite() && spec.default_value >= 0.0);

        // Serialized output parses back to the same spec.
        let serialized = spec.serialize(encoding);
        let reparsed = SizeSpec::parse(encoding, &serialized);
        assert_eq!(spec, reparsed, "{text:?} -> {serialized:?}");
    }
});
