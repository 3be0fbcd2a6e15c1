pub mod api;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod graph;
pub mod ner;
pub mod pipeline;
pub mod telemetry;
