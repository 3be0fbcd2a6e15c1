pub mod boilerplate;
pub mod language;
pub mod metadata;
pub mod reader;

#[cfg(test)]
mod tests;

pub use metadata::{MetadataNode, extract_metadata};

use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ContentStrategy;
use crate::fetcher::Fetcher;

/// The two text sources of a page, kept apart until recognition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageText {
    pub metadata: String,
    pub content: String,
}

impl PageText {
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty() && self.content.is_empty()
    }

    /// Metadata text followed by main content, separated by one space when
    /// both are present.
    pub fn corpus(&self) -> String {
        match (self.metadata.is_empty(), self.content.is_empty()) {
            (false, false) => format!("{} {}", self.metadata, self.content),
            (false, true) => self.metadata.clone(),
            _ => self.content.clone(),
        }
    }
}

/// Main content with short lines removed, or `None` when there is no document.
pub fn extract_main_content(
    html: Option<&str>,
    url: &Url,
    strategy: ContentStrategy,
) -> Option<String> {
    let html = html?;
    let content = match strategy {
        ContentStrategy::Canola => boilerplate::canola_content(html),
        ContentStrategy::Readability => reader::readable_text(html, url),
    };
    Some(boilerplate::filter_sentences(&content))
}

/// Both text sources for an already-fetched document.
pub fn assemble(html: &str, url: &Url, strategy: ContentStrategy) -> PageText {
    let metadata = extract_metadata(html, url);
    let content = extract_main_content(Some(html), url, strategy).unwrap_or_default();
    debug!(
        metadata_chars = metadata.len(),
        content_chars = content.len(),
        "assembled page text"
    );
    PageText { metadata, content }
}

/// Fetch a page and assemble its text. A failed fetch yields empty text and
/// no parsing work at all.
#[instrument(skip(fetcher), fields(url = %url))]
pub async fn corpus(fetcher: &Fetcher, url: &str, strategy: ContentStrategy) -> PageText {
    let Some(page) = fetcher.fetch(url).await else {
        return PageText::default();
    };
    assemble(&page.body, &page.url_final, strategy)
}
