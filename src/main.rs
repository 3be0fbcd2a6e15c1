use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use triplet::config::{self, ContentStrategy};
use triplet::fetcher::Fetcher;
use triplet::ner::{EntityLabel, RuleRecognizer, SUBJECT_LABELS};
use triplet::pipeline::TextToTriples;
use triplet::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "triplet",
    about = "Fetch a web page and list the entities it could be a source for"
)]
struct Cli {
    /// Page to read.
    url: String,

    /// Entity label to offer as a candidate (repeatable). Defaults to ORG and PERSON.
    #[arg(long = "label", value_name = "LABEL")]
    labels: Vec<String>,

    /// Main-content heuristic: canola or readability.
    #[arg(long)]
    strategy: Option<ContentStrategy>,

    /// Fetch timeout in seconds (at least 1).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Print the full extraction as JSON instead of one candidate per line.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    let mut config = config::Config::from_env().context("Failed to load configuration")?;
    if let Some(strategy) = cli.strategy {
        config = config.with_content_strategy(strategy);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_fetch_timeout(Duration::from_secs(secs));
    }

    let allowed: HashSet<EntityLabel> = if cli.labels.is_empty() {
        SUBJECT_LABELS.into_iter().collect()
    } else {
        cli.labels
            .iter()
            .map(|tag| EntityLabel::parse(tag))
            .filter(EntityLabel::is_known)
            .collect()
    };

    let fetcher = Fetcher::new(&config)?;
    let pipeline = TextToTriples::new(
        fetcher,
        Arc::new(RuleRecognizer::new()),
        config.content_strategy(),
    );
    let extraction = pipeline
        .extract(&cli.url, &allowed)
        .await
        .context("Entity recognition failed")?;

    let candidates = extraction.sorted_candidates();
    if cli.json {
        let report = json!({
            "url": cli.url,
            "metadata_text": extraction.page.metadata,
            "content_text": extraction.page.content,
            "language": extraction.language,
            "entities": extraction.spans,
            "candidates": candidates,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if candidates.is_empty() {
        eprintln!("No candidates found");
    } else {
        for candidate in candidates {
            println!("{candidate}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_must_be_positive() {
        assert!(Cli::try_parse_from(["triplet", "https://acme.example", "--timeout-secs", "0"]).is_err());

        let cli =
            Cli::try_parse_from(["triplet", "https://acme.example", "--timeout-secs", "5"]).unwrap();
        assert_eq!(cli.timeout_secs, Some(5));
    }

    #[test]
    fn test_labels_repeat() {
        let cli = Cli::try_parse_from([
            "triplet",
            "https://acme.example",
            "--label",
            "ORG",
            "--label",
            "GPE",
        ])
        .unwrap();
        assert_eq!(cli.labels, vec!["ORG".to_string(), "GPE".to_string()]);
        assert!(cli.timeout_secs.is_none());
    }
}
