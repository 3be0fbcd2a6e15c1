use std::fs;
use url::Url;

use crate::config::ContentStrategy;
use crate::extractor::{PageText, assemble, extract_main_content, extract_metadata};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

#[test]
fn test_company_article_metadata() {
    let html = fixture("company.html");
    let url = Url::parse("https://news.example.com/acme").unwrap();

    assert_eq!(
        extract_metadata(&html, &url),
        "Acme Corp is a technology company."
    );
}

#[test]
fn test_company_article_content() {
    let html = fixture("company.html");
    let url = Url::parse("https://news.example.com/acme").unwrap();
    let content = extract_main_content(Some(&html), &url, ContentStrategy::Canola).unwrap();

    assert!(content.contains("Acme Corp announced on Monday"));
    assert!(content.contains("Chief executive John Smith"));
    assert!(content.contains("twelve countries"));
    assert!(!content.contains("About Us"));
    assert!(!content.contains("Privacy"));
    assert!(!content.contains("window.analytics"));
    assert!(!content.contains("font-family"));
    // Trailing periods are replaced by the ". " separator.
    assert!(content.contains("grid storage. The company was founded"));
    assert!(!content.ends_with('.'));
}

#[test]
fn test_link_portal_has_no_prose() {
    let html = fixture("portal.html");
    let url = Url::parse("https://portal.example.org/").unwrap();
    let text = assemble(&html, &url, ContentStrategy::Canola);

    assert_eq!(
        text.metadata,
        "Portal. Directory of regional services and local news"
    );
    assert_eq!(text.content, "");
    assert_eq!(text.corpus(), text.metadata);
}

#[test]
fn test_missing_document() {
    let url = Url::parse("https://example.com").unwrap();
    assert_eq!(
        extract_main_content(None, &url, ContentStrategy::Canola),
        None
    );
    assert_eq!(
        extract_main_content(None, &url, ContentStrategy::Readability),
        None
    );
}

#[test]
fn test_malformed_html() {
    let html = "<html><head><title>Broken</title><body><p>Unclosed tags and a rather long sentence that keeps going on and on well past the twenty word mark without any end<div>More content";
    let url = Url::parse("https://example.com/broken").unwrap();

    let text = assemble(html, &url, ContentStrategy::Canola);
    assert_eq!(text.metadata, "");
    assert!(text.content.contains("Unclosed tags"));
}

#[test]
fn test_readability_strategy() {
    let html = fixture("company.html");
    let url = Url::parse("https://news.example.com/acme").unwrap();
    let content = extract_main_content(Some(&html), &url, ContentStrategy::Readability).unwrap();

    assert!(content.contains("Acme Corp announced on Monday"));
}

#[test]
fn test_corpus_concatenation() {
    let text = PageText {
        metadata: "Acme Corp is a technology company.".to_string(),
        content: "Acme Corp announced a campus".to_string(),
    };
    assert_eq!(
        text.corpus(),
        "Acme Corp is a technology company. Acme Corp announced a campus"
    );
    assert_eq!(PageText::default().corpus(), "");
    assert!(PageText::default().is_empty());
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_assemble_never_panics(html in ".*", path in "[a-z/]*") {
            let url = Url::parse(&format!("https://example.com/{path}")).unwrap();
            let _ = assemble(&html, &url, ContentStrategy::Canola);
        }

        #[test]
        fn test_content_lines_are_long(html in "(<p>[a-z ]{0,80}</p>){0,8}") {
            let url = Url::parse("https://example.com").unwrap();
            let content = extract_main_content(Some(&html), &url, ContentStrategy::Canola).unwrap();
            for segment in content.split(". ").filter(|s| !s.is_empty()) {
                prop_assert!(segment.split_whitespace().count() >= 7);
            }
        }
    }
}
