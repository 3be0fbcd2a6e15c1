use std::sync::Arc;

use crate::config::Config;
use crate::fetcher::Fetcher;
use crate::graph::{GraphApi, GraphQlClient};
use crate::ner::RuleRecognizer;
use crate::pipeline::TextToTriples;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: TextToTriples,
    pub graph: Arc<dyn GraphApi>,
}

impl AppState {
    pub fn new(pipeline: TextToTriples, graph: Arc<dyn GraphApi>) -> Self {
        Self { pipeline, graph }
    }

    /// Production wiring: one fetcher, one recognizer and one graph client
    /// shared by all requests.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let fetcher = Fetcher::new(config)?;
        let pipeline = TextToTriples::new(
            fetcher,
            Arc::new(RuleRecognizer::new()),
            config.content_strategy(),
        );
        let graph = GraphQlClient::new(config)?;
        Ok(Self::new(pipeline, Arc::new(graph)))
    }
}
