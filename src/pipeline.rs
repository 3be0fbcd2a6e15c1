//! URL to candidate subjects: fetch, assemble text, recognize, filter.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::ContentStrategy;
use crate::extractor::{self, PageText, language::DetectedLanguage, language::detect_language};
use crate::fetcher::Fetcher;
use crate::ner::{EntityLabel, EntityRecognizer, RecognizeError, TextSpan, select_candidates};

/// Everything one pass produces for a URL.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    pub page: PageText,
    pub language: Option<DetectedLanguage>,
    pub spans: Vec<TextSpan>,
    pub candidates: HashSet<String>,
}

impl Extraction {
    /// Candidates in a stable order for display.
    pub fn sorted_candidates(&self) -> Vec<String> {
        let mut candidates: Vec<String> = self.candidates.iter().cloned().collect();
        candidates.sort();
        candidates
    }
}

/// The recognizer is built once at startup and shared by every request.
#[derive(Clone)]
pub struct TextToTriples {
    fetcher: Fetcher,
    recognizer: Arc<dyn EntityRecognizer>,
    strategy: ContentStrategy,
}

impl TextToTriples {
    pub fn new(
        fetcher: Fetcher,
        recognizer: Arc<dyn EntityRecognizer>,
        strategy: ContentStrategy,
    ) -> Self {
        Self {
            fetcher,
            recognizer,
            strategy,
        }
    }

    pub fn strategy(&self) -> ContentStrategy {
        self.strategy
    }

    #[instrument(skip(self, allowed), fields(url = %url))]
    pub async fn extract(
        &self,
        url: &str,
        allowed: &HashSet<EntityLabel>,
    ) -> Result<Extraction, RecognizeError> {
        let page = extractor::corpus(&self.fetcher, url, self.strategy).await;
        self.recognize_page(page, allowed)
    }

    /// Recognition over already-assembled text. An empty page never reaches
    /// the recognizer.
    pub fn recognize_page(
        &self,
        page: PageText,
        allowed: &HashSet<EntityLabel>,
    ) -> Result<Extraction, RecognizeError> {
        if page.is_empty() {
            info!("no text available, skipping recognition");
            return Ok(Extraction {
                page,
                ..Extraction::default()
            });
        }

        let corpus = page.corpus();
        let language = detect_language(&corpus);
        if let Some(lang) = &language
            && !lang.is_english()
        {
            warn!(language = %lang.code, "corpus is not English, recognition quality may suffer");
        }

        let spans = self.recognizer.recognize(&corpus)?;
        let candidates = select_candidates(&spans, allowed);
        info!(
            spans = spans.len(),
            candidates = candidates.len(),
            "recognized entities"
        );

        Ok(Extraction {
            page,
            language,
            spans,
            candidates,
        })
    }
}
