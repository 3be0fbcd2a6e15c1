#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::LazyLock;
use url::Url;

use triplet::config::ContentStrategy;
use triplet::extractor::assemble;
use triplet::ner::{EntityRecognizer, RuleRecognizer};

static BASE_URL: LazyLock<Url> = LazyLock::new(|| Url::parse("https://example.com/page").unwrap());
static RECOGNIZER: LazyLock<RuleRecognizer> = LazyLock::new(RuleRecognizer::new);

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);

    // Extraction and recognition must never panic, whatever the markup.
    for strategy in [ContentStrategy::Canola, ContentStrategy::Readability] {
        let page = assemble(&html, &BASE_URL, strategy);
        let _ = RECOGNIZER.recognize(&page.corpus());
    }
});
