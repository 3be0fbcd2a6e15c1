use readability::extractor;
use tracing::debug;
use url::Url;

/// Main text according to readability scoring, one paragraph per line.
///
/// Readability failures yield an empty string; the caller treats that the same
/// as a page with no prose.
pub fn readable_text(html: &str, url: &Url) -> String {
    match extractor::extract(&mut html.as_bytes(), url) {
        Ok(article) => article
            .text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Err(err) => {
            debug!(error = %err, "readability extraction failed");
            String::new()
        }
    }
}
