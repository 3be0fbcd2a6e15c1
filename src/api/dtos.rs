use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::{IntoParams, ToSchema};

use crate::graph::{
    EntityDraft, ObjectField, Predicate, RowOutcome, StatementDraft, TriplePreview, object_field,
};
use crate::ner::{EntityLabel, SUBJECT_LABELS, TextSpan};
use crate::pipeline::Extraction;

const MAX_URL_LENGTH: usize = 2048;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExtractRequest {
    pub url: String,
    /// Entity labels to offer as candidates; defaults to ORG and PERSON.
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

impl ExtractRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("URL cannot be empty".to_string());
        }
        if self.url.len() > MAX_URL_LENGTH {
            return Err("URL too long".to_string());
        }
        Ok(())
    }

    /// Labels outside the known set are dropped.
    pub fn allowed_labels(&self) -> HashSet<EntityLabel> {
        match &self.labels {
            None => SUBJECT_LABELS.into_iter().collect(),
            Some(labels) => labels
                .iter()
                .map(|tag| EntityLabel::parse(tag))
                .filter(EntityLabel::is_known)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EntityMention {
    pub label: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl From<TextSpan> for EntityMention {
    fn from(span: TextSpan) -> Self {
        Self {
            label: span.label.to_string(),
            text: span.text,
            start: span.start,
            end: span.end,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExtractResponse {
    pub metadata_text: String,
    pub content_text: String,
    /// ISO 639 code of the corpus language, when it could be detected.
    pub language: Option<String>,
    pub entities: Vec<EntityMention>,
    pub candidates: Vec<String>,
}

impl From<Extraction> for ExtractResponse {
    fn from(extraction: Extraction) -> Self {
        let candidates = extraction.sorted_candidates();
        Self {
            metadata_text: extraction.page.metadata,
            content_text: extraction.page.content,
            language: extraction.language.map(|lang| lang.code),
            entities: extraction.spans.into_iter().map(EntityMention::from).collect(),
            candidates,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PredicateView {
    #[serde(flatten)]
    pub predicate: Predicate,
    /// Input kind for the object; absent for object types this service
    /// cannot edit.
    pub field: Option<ObjectField>,
}

impl From<Predicate> for PredicateView {
    fn from(predicate: Predicate) -> Self {
        let field = object_field(&predicate.object_type).ok();
        Self { predicate, field }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EntitySearchParams {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatementCreatedResponse {
    pub id: String,
    pub subject_id: String,
    pub link: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PreviewRequest {
    /// Display name of the subject.
    pub subject: String,
    #[serde(flatten)]
    pub statement: StatementDraft,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EntityCreatedResponse {
    pub id: String,
    pub link: String,
    pub preview: Vec<TriplePreview>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EntityPreviewResponse {
    pub name: String,
    pub statements: Vec<TriplePreview>,
}

impl From<&EntityDraft> for EntityPreviewResponse {
    fn from(draft: &EntityDraft) -> Self {
        Self {
            name: draft.name.clone(),
            statements: draft.preview(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    pub outcomes: Vec<RowOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(labels: Option<Vec<&str>>) -> ExtractRequest {
        ExtractRequest {
            url: "https://example.com".to_string(),
            labels: labels.map(|l| l.into_iter().map(str::to_string).collect()),
        }
    }

    #[test]
    fn test_default_labels() {
        let allowed = request(None).allowed_labels();
        assert_eq!(
            allowed,
            HashSet::from([EntityLabel::Org, EntityLabel::Person])
        );
    }

    #[test]
    fn test_unknown_labels_ignored() {
        let allowed = request(Some(vec!["gpe", "SPACESHIP"])).allowed_labels();
        assert_eq!(allowed, HashSet::from([EntityLabel::Gpe]));
        assert!(request(Some(vec![])).allowed_labels().is_empty());
    }

    #[test]
    fn test_validate_url() {
        assert!(request(None).validate().is_ok());
        let empty = ExtractRequest {
            url: " ".to_string(),
            labels: None,
        };
        assert_eq!(empty.validate(), Err("URL cannot be empty".to_string()));
        let long = ExtractRequest {
            url: format!("https://example.com/{}", "a".repeat(3000)),
            labels: None,
        };
        assert_eq!(long.validate(), Err("URL too long".to_string()));
    }
}
