#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;

use dobverify_verification::{DateExtractor, ExtractorConfig, FileTextSource};

// Extraction over arbitrary document text never panics, and anything it
// returns is an in-range date with the raw text it came from.
fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let text: &str = &text;
    let config = ExtractorConfig::default();
    let extractor = DateExtractor::new(Arc::new(FileTextSource::new(None)), &config).unwrap();

    let extracted = extractor.extract_from_text(text);
    if let Some(date) = extracted.normalized_value {
        assert!(text.contains(&extracted.raw_text));
        assert!((config.min_year..=config.max_year).contains(&date.year()));
    }

    for candidate in extractor.candidates(text) {
        assert_eq!(&text[candidate.start..candidate.end], candidate.raw_text);
    }
});
