#![no_main]

use libfuzzer_sys::fuzz_target;

use dobverify_verification::{AccuracyScorer, DateParser, ExtractorConfig, ScoringRule};

// Input is "claimed|extracted". Scores stay within [0, 100] and a recognised
// date always scores 100 against its own ISO form.
fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let text: &str = &text;
    let (claimed, extracted) = text.split_once('|').unwrap_or((text, ""));
    let parser = DateParser::new(&ExtractorConfig::default()).unwrap();

    for rule in [ScoringRule::Exact, ScoringRule::FieldWeighted] {
        let scorer = AccuracyScorer::new(rule, parser.clone());
        let score = scorer.score(claimed, extracted);
        assert!((0.0..=100.0).contains(&score));

        if let Some(date) = parser.normalize(claimed) {
            assert_eq!(scorer.score(&date.to_string(), claimed), 100.0);
        }
    }
});
