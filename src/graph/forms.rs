//! Validation and assembly of statements and entities before submission.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;
use utoipa::ToSchema;

use crate::graph::errors::FormError;
use crate::graph::types::{
    CreateEntityInput, CreateStatementInput, ObjectType, Predicate, StatementInput,
};

pub const MAX_ENTITY_STATEMENTS: usize = 10;
pub const DATE_FORMAT: &str = "%d-%m-%Y";
const ENTITY_LINK_BASE: &str = "https://dapp.golden.xyz/entity/";

/// How the object of a statement is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ObjectField {
    /// Pick an existing entity found by name search.
    EntitySearch,
    UriInput,
    StringInput,
    /// `DD-MM-YYYY`
    DateInput,
}

/// Object input for a predicate's object type. Types this client does not
/// recognize are refused rather than edited as free text.
pub fn object_field(object_type: &ObjectType) -> Result<ObjectField, FormError> {
    match object_type {
        ObjectType::Entity => Ok(ObjectField::EntitySearch),
        ObjectType::AnyUri => Ok(ObjectField::UriInput),
        ObjectType::String => Ok(ObjectField::StringInput),
        ObjectType::Date => Ok(ObjectField::DateInput),
        ObjectType::Unknown(other) => Err(FormError::UnknownObjectType(other.clone())),
    }
}

pub fn entity_link(entity_id: &str) -> String {
    format!("{ENTITY_LINK_BASE}{entity_id}")
}

/// Predicates by name, as listed by the graph API.
#[derive(Debug, Clone, Default)]
pub struct PredicateIndex {
    by_name: HashMap<String, Predicate>,
    names_by_id: HashMap<String, String>,
}

impl PredicateIndex {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        let mut index = Self::default();
        for predicate in predicates {
            index
                .names_by_id
                .insert(predicate.id.clone(), predicate.name.clone());
            index.by_name.insert(predicate.name.clone(), predicate);
        }
        index
    }

    pub fn get(&self, name: &str) -> Result<&Predicate, FormError> {
        self.by_name
            .get(name)
            .ok_or_else(|| FormError::UnknownPredicate(name.to_string()))
    }

    pub fn name_of(&self, predicate_id: &str) -> Option<&str> {
        self.names_by_id.get(predicate_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// One statement as entered: predicate by name, object as a literal or an
/// existing entity id, and an optional citation URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct StatementDraft {
    pub predicate: String,
    #[serde(default)]
    pub object_value: Option<String>,
    #[serde(default)]
    pub object_entity_id: Option<String>,
    #[serde(default)]
    pub citation: String,
}

impl StatementDraft {
    pub fn to_input(&self, predicates: &PredicateIndex) -> Result<StatementInput, FormError> {
        let predicate = predicates.get(&self.predicate)?;
        let field = object_field(&predicate.object_type)?;

        let value = non_blank(self.object_value.as_deref());
        let entity_id = non_blank(self.object_entity_id.as_deref());

        let input = match (field, value, entity_id) {
            (_, Some(_), Some(_)) => {
                return Err(FormError::AmbiguousObject {
                    predicate: predicate.name.clone(),
                });
            }
            (ObjectField::EntitySearch, None, Some(id)) => {
                StatementInput::entity(&predicate.id, id)
            }
            (field, Some(value), None) if field != ObjectField::EntitySearch => {
                validate_literal(field, value)?;
                StatementInput::value(&predicate.id, value)
            }
            _ => {
                return Err(FormError::MissingObject {
                    predicate: predicate.name.clone(),
                });
            }
        };

        Ok(input.with_citations(citation_urls(&self.citation)))
    }

    pub fn preview(&self, subject: &str) -> TriplePreview {
        let object = non_blank(self.object_value.as_deref())
            .or_else(|| non_blank(self.object_entity_id.as_deref()))
            .unwrap_or_default();
        TriplePreview {
            subject: subject.to_string(),
            predicate: self.predicate.clone(),
            object: object.to_string(),
            citation: citation_urls(&self.citation),
        }
    }
}

/// A statement about an existing subject entity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct NewStatement {
    pub subject_id: String,
    #[serde(flatten)]
    pub statement: StatementDraft,
}

impl NewStatement {
    pub fn to_input(&self, predicates: &PredicateIndex) -> Result<CreateStatementInput, FormError> {
        let subject_id = non_blank(Some(&self.subject_id)).ok_or(FormError::MissingSubject)?;
        Ok(CreateStatementInput {
            subject_id: subject_id.to_string(),
            statement: self.statement.to_input(predicates)?,
        })
    }
}

/// A new entity with the statements that disambiguate it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct EntityDraft {
    pub name: String,
    pub statements: Vec<StatementDraft>,
}

impl EntityDraft {
    pub fn to_input(&self, predicates: &PredicateIndex) -> Result<CreateEntityInput, FormError> {
        let name = non_blank(Some(&self.name)).ok_or(FormError::BlankName)?;
        if self.statements.is_empty() {
            return Err(FormError::NoStatements);
        }
        if self.statements.len() > MAX_ENTITY_STATEMENTS {
            return Err(FormError::TooManyStatements {
                count: self.statements.len(),
                max: MAX_ENTITY_STATEMENTS,
            });
        }

        let statements = self
            .statements
            .iter()
            .map(|draft| draft.to_input(predicates))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CreateEntityInput {
            name: name.to_string(),
            statements,
        })
    }

    pub fn preview(&self) -> Vec<TriplePreview> {
        self.statements
            .iter()
            .map(|draft| draft.preview(&self.name))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TriplePreview {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub citation: Vec<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn citation_urls(citation: &str) -> Vec<String> {
    non_blank(Some(citation))
        .map(|c| vec![c.to_string()])
        .unwrap_or_default()
}

fn validate_literal(field: ObjectField, value: &str) -> Result<(), FormError> {
    match field {
        ObjectField::UriInput => Url::parse(value)
            .map(|_| ())
            .map_err(|_| FormError::InvalidUri {
                value: value.to_string(),
            }),
        ObjectField::DateInput => NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(|_| ())
            .map_err(|_| FormError::InvalidDate {
                value: value.to_string(),
            }),
        ObjectField::StringInput | ObjectField::EntitySearch => Ok(()),
    }
}
