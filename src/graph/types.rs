use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Kind of object a predicate accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ObjectType {
    Entity,
    AnyUri,
    String,
    Date,
    /// A type this client does not know how to edit yet.
    Unknown(String),
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Entity => "ENTITY",
            Self::AnyUri => "ANY_URI",
            Self::String => "STRING",
            Self::Date => "DATE",
            Self::Unknown(other) => other,
        }
    }
}

impl From<String> for ObjectType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ENTITY" => Self::Entity,
            "ANY_URI" => Self::AnyUri,
            "STRING" => Self::String,
            "DATE" => Self::Date,
            _ => Self::Unknown(value),
        }
    }
}

impl From<ObjectType> for String {
    fn from(value: ObjectType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Predicate {
    pub id: String,
    pub name: String,
    #[schema(value_type = String, example = "ENTITY")]
    pub object_type: ObjectType,
}

/// An entity-type classifier such as "Company", referenced via "Is a".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub entity_id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EntitySummary {
    pub id: String,
    pub name: String,
}

/// One statement as submitted: exactly one of `object_value` and
/// `object_entity_id` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatementInput {
    pub predicate_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_entity_id: Option<String>,
    pub citation_urls: Vec<String>,
    pub qualifiers: Vec<QualifierInput>,
}

impl StatementInput {
    pub fn value(predicate_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            predicate_id: predicate_id.into(),
            object_value: Some(value.into()),
            object_entity_id: None,
            citation_urls: Vec::new(),
            qualifiers: Vec::new(),
        }
    }

    pub fn entity(predicate_id: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            predicate_id: predicate_id.into(),
            object_value: None,
            object_entity_id: Some(entity_id.into()),
            citation_urls: Vec::new(),
            qualifiers: Vec::new(),
        }
    }

    pub fn with_citations(mut self, citation_urls: Vec<String>) -> Self {
        self.citation_urls = citation_urls;
        self
    }
}

/// Qualifiers are carried on the wire but never produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QualifierInput {
    pub predicate_id: String,
    pub object_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStatementInput {
    pub subject_id: String,
    #[serde(flatten)]
    pub statement: StatementInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CreateEntityInput {
    pub name: String,
    pub statements: Vec<StatementInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedEntity {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedStatement {
    pub id: String,
    pub subject_id: String,
}

/// Caller credentials forwarded to the graph API. Empty means "use the
/// client's default token, if any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bearer(Option<String>);

impl Bearer {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.trim().is_empty() {
            Self(None)
        } else {
            Self(Some(token))
        }
    }

    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_type_parsing() {
        assert_eq!(ObjectType::from("ENTITY".to_string()), ObjectType::Entity);
        assert_eq!(ObjectType::from("ANY_URI".to_string()), ObjectType::AnyUri);
        assert_eq!(
            ObjectType::from("FLOAT".to_string()),
            ObjectType::Unknown("FLOAT".to_string())
        );
        assert_eq!(ObjectType::Unknown("FLOAT".to_string()).to_string(), "FLOAT");
    }

    #[test]
    fn test_predicate_wire_format() {
        let predicate: Predicate = serde_json::from_value(json!({
            "id": "p1",
            "name": "Founded by",
            "objectType": "ENTITY"
        }))
        .unwrap();
        assert_eq!(predicate.object_type, ObjectType::Entity);
    }

    #[test]
    fn test_statement_input_omits_unset_object() {
        let input = CreateStatementInput {
            subject_id: "s1".to_string(),
            statement: StatementInput::value("p1", "https://acme.example")
                .with_citations(vec!["https://news.example/a".to_string()]),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(
            json,
            json!({
                "subjectId": "s1",
                "predicateId": "p1",
                "objectValue": "https://acme.example",
                "citationUrls": ["https://news.example/a"],
                "qualifiers": []
            })
        );
    }

    #[test]
    fn test_blank_bearer_is_anonymous() {
        assert_eq!(Bearer::new("  "), Bearer::anonymous());
        assert_eq!(Bearer::new("abc").token(), Some("abc"));
    }
}
