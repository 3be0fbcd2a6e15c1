use thiserror::Error;

/// Failures talking to the graph-protocol API.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("graph API request failed: {0}")]
    Transport(String),

    #[error("graph API timed out")]
    Timeout,

    #[error("graph API returned HTTP {status}")]
    Status { status: u16, body: String },

    /// Query errors on reads.
    #[error("graph API query failed: {0}")]
    Query(String),

    /// A mutation the API refused; `body` is the raw response text.
    #[error("graph API rejected the submission")]
    Rejected { body: String },

    #[error("unexpected graph API response: {0}")]
    Decode(String),
}

impl GraphError {
    pub(crate) fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }

    /// The raw upstream body when there is one worth showing.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::Rejected { body } | Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Draft validation failures, reported before anything is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown object type `{0}`")]
    UnknownObjectType(String),

    #[error("unknown predicate `{0}`")]
    UnknownPredicate(String),

    #[error("unknown template `{0}`")]
    UnknownTemplate(String),

    #[error("subject entity id is required")]
    MissingSubject,

    #[error("entity name must not be blank")]
    BlankName,

    #[error("predicate `{predicate}` needs an object")]
    MissingObject { predicate: String },

    #[error("predicate `{predicate}` takes either a value or an entity id, not both")]
    AmbiguousObject { predicate: String },

    #[error("`{value}` is not a valid URI")]
    InvalidUri { value: String },

    #[error("`{value}` is not a date in DD-MM-YYYY form")]
    InvalidDate { value: String },

    #[error("an entity needs at least one statement")]
    NoStatements,

    #[error("{count} statements given, at most {max} allowed")]
    TooManyStatements { count: usize, max: usize },
}

/// Structured-data ingest failures, all detected before submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("column `{0}` is not in the table")]
    UnknownColumn(String),

    #[error("row {row} has an empty subject")]
    BlankSubject { row: usize },

    #[error(transparent)]
    Form(#[from] FormError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_body() {
        let rejected = GraphError::Rejected {
            body: r#"{"errors":[{"message":"nope"}]}"#.to_string(),
        };
        assert_eq!(rejected.raw_body(), Some(r#"{"errors":[{"message":"nope"}]}"#));
        assert_eq!(GraphError::Timeout.raw_body(), None);
    }

    #[test]
    fn test_form_error_into_ingest_error() {
        let err: IngestError = FormError::UnknownTemplate("Company".to_string()).into();
        assert_eq!(err.to_string(), "unknown template `Company`");
    }
}
