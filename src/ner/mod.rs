//! Named entity recognition.
//!
//! The pipeline only depends on [`EntityRecognizer`]; [`RuleRecognizer`] is
//! the engine bundled with the crate.

pub mod candidates;
pub mod rules;

pub use candidates::{SUBJECT_LABELS, select_candidates};
pub use rules::RuleRecognizer;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Entity categories produced by recognizers. Tags outside the closed set
/// parse to `Unknown` and are never offered as candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum EntityLabel {
    Person,
    Norp,
    Facility,
    Org,
    Gpe,
    Location,
    Product,
    Event,
    WorkOfArt,
    Law,
    Language,
    Date,
    Cardinal,
    Money,
    Ordinal,
    Percent,
    Quantity,
    Time,
    Unknown,
}

impl EntityLabel {
    pub const ALL: [EntityLabel; 18] = [
        Self::Person,
        Self::Norp,
        Self::Facility,
        Self::Org,
        Self::Gpe,
        Self::Location,
        Self::Product,
        Self::Event,
        Self::WorkOfArt,
        Self::Law,
        Self::Language,
        Self::Date,
        Self::Cardinal,
        Self::Money,
        Self::Ordinal,
        Self::Percent,
        Self::Quantity,
        Self::Time,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Norp => "NORP",
            Self::Facility => "FACILITY",
            Self::Org => "ORG",
            Self::Gpe => "GPE",
            Self::Location => "LOCATION",
            Self::Product => "PRODUCT",
            Self::Event => "EVENT",
            Self::WorkOfArt => "WORK_OF_ART",
            Self::Law => "LAW",
            Self::Language => "LANGUAGE",
            Self::Date => "DATE",
            Self::Cardinal => "CARDINAL",
            Self::Money => "MONEY",
            Self::Ordinal => "ORDINAL",
            Self::Percent => "PERCENT",
            Self::Quantity => "QUANTITY",
            Self::Time => "TIME",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Lenient parse: accepts the common short aliases, never fails.
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().replace(' ', "_").as_str() {
            "PERSON" | "PER" => Self::Person,
            "NORP" => Self::Norp,
            "FACILITY" | "FAC" => Self::Facility,
            "ORG" | "ORGANIZATION" => Self::Org,
            "GPE" => Self::Gpe,
            "LOCATION" | "LOC" => Self::Location,
            "PRODUCT" => Self::Product,
            "EVENT" => Self::Event,
            "WORK_OF_ART" => Self::WorkOfArt,
            "LAW" => Self::Law,
            "LANGUAGE" => Self::Language,
            "DATE" => Self::Date,
            "CARDINAL" => Self::Cardinal,
            "MONEY" => Self::Money,
            "ORDINAL" => Self::Ordinal,
            "PERCENT" => Self::Percent,
            "QUANTITY" => Self::Quantity,
            "TIME" => Self::Time,
            _ => Self::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for EntityLabel {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        label.as_str().to_string()
    }
}

/// One entity mention. `start`/`end` are character (not byte) offsets into
/// the recognized text, end exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub label: EntityLabel,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Error)]
pub enum RecognizeError {
    #[error("recognizer model error: {0}")]
    Model(String),
}

/// A sequence labeler. Implementations are deterministic for a fixed input
/// and return disjoint spans ordered by ascending start offset.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Result<Vec<TextSpan>, RecognizeError>;
}
