//! Table rows to new entities: one subject per row, typed with a template
//! and described by mapped columns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::graph::client::GraphApi;
use crate::graph::errors::{FormError, IngestError};
use crate::graph::forms::{PredicateIndex, entity_link};
use crate::graph::types::{Bearer, CreateEntityInput, StatementInput, Template};

pub const MAX_INGEST_ROWS: usize = 10;
pub const IS_A_PREDICATE: &str = "Is a";
pub const VALUE_DELIMITER: &str = ", ";

/// A table of string cells; short rows read as empty trailing cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    fn column_index(&self, name: &str) -> Result<usize, IngestError> {
        self.columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| IngestError::UnknownColumn(name.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct IngestRequest {
    pub table: DataTable,
    pub subject_column: String,
    /// Template name, e.g. "Company".
    pub template: String,
    /// Column name to predicate name; unmapped columns are ignored.
    #[serde(default)]
    pub mapping: BTreeMap<String, String>,
}

/// Result of submitting one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RowOutcome {
    pub row: usize,
    pub name: String,
    pub entity_id: Option<String>,
    pub link: Option<String>,
    /// Raw API response when the row was rejected.
    pub error: Option<String>,
}

/// Build the entity inputs for the first [`MAX_INGEST_ROWS`] rows. Every
/// name is resolved before anything is submitted.
pub fn plan_ingest(
    request: &IngestRequest,
    predicates: &PredicateIndex,
    templates: &[Template],
) -> Result<Vec<CreateEntityInput>, IngestError> {
    let template = templates
        .iter()
        .find(|template| template.name == request.template)
        .ok_or_else(|| FormError::UnknownTemplate(request.template.clone()))?;
    let is_a = predicates.get(IS_A_PREDICATE)?;

    let table = &request.table;
    let subject_idx = table.column_index(&request.subject_column)?;

    let mut mapped = Vec::new();
    for (column, predicate_name) in &request.mapping {
        if *column == request.subject_column {
            continue;
        }
        let idx = table.column_index(column)?;
        let predicate = predicates.get(predicate_name)?;
        mapped.push((idx, predicate.id.as_str()));
    }

    if table.rows.len() > MAX_INGEST_ROWS {
        warn!(
            rows = table.rows.len(),
            max = MAX_INGEST_ROWS,
            "table truncated for ingest"
        );
    }

    table
        .rows
        .iter()
        .take(MAX_INGEST_ROWS)
        .enumerate()
        .map(|(row, cells)| {
            let cell = |idx: usize| cells.get(idx).map(|c| c.trim()).unwrap_or_default();

            let name = cell(subject_idx);
            if name.is_empty() {
                return Err(IngestError::BlankSubject { row });
            }

            let mut statements = vec![StatementInput::entity(&is_a.id, &template.entity_id)];
            for (idx, predicate_id) in &mapped {
                let value = cell(*idx);
                if value.is_empty() {
                    continue;
                }
                statements.extend(
                    value
                        .split(VALUE_DELIMITER)
                        .map(str::trim)
                        .filter(|v| !v.is_empty())
                        .map(|v| StatementInput::value(*predicate_id, v)),
                );
            }

            Ok(CreateEntityInput {
                name: name.to_string(),
                statements,
            })
        })
        .collect()
}

/// Submit entities one after another; a rejected row does not stop the rest.
#[instrument(skip_all, fields(entities = inputs.len()))]
pub async fn submit_all(
    graph: &dyn GraphApi,
    auth: &Bearer,
    inputs: Vec<CreateEntityInput>,
) -> Vec<RowOutcome> {
    let mut outcomes = Vec::with_capacity(inputs.len());
    for (row, input) in inputs.into_iter().enumerate() {
        let name = input.name.clone();
        let outcome = match graph.create_entity(auth, input).await {
            Ok(created) => RowOutcome {
                row,
                name,
                link: Some(entity_link(&created.id)),
                entity_id: Some(created.id),
                error: None,
            },
            Err(err) => {
                warn!(row, error = %err, "entity submission failed");
                RowOutcome {
                    row,
                    name,
                    entity_id: None,
                    link: None,
                    error: Some(
                        err.raw_body()
                            .map(str::to_string)
                            .unwrap_or_else(|| err.to_string()),
                    ),
                }
            }
        };
        outcomes.push(outcome);
    }

    let created = outcomes.iter().filter(|o| o.entity_id.is_some()).count();
    info!(created, total = outcomes.len(), "ingest finished");
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::client::MockGraphApi;
    use crate::graph::errors::GraphError;
    use crate::graph::types::{CreatedEntity, ObjectType, Predicate};

    fn predicates() -> PredicateIndex {
        let predicate = |id: &str, name: &str, object_type: ObjectType| Predicate {
            id: id.to_string(),
            name: name.to_string(),
            object_type,
        };
        PredicateIndex::new(vec![
            predicate("p-isa", "Is a", ObjectType::Entity),
            predicate("p-web", "Website", ObjectType::AnyUri),
            predicate("p-ind", "Industry", ObjectType::String),
        ])
    }

    fn templates() -> Vec<Template> {
        vec![Template {
            id: "t1".to_string(),
            entity_id: "e-company".to_string(),
            name: "Company".to_string(),
            description: None,
        }]
    }

    fn request(rows: Vec<Vec<&str>>) -> IngestRequest {
        IngestRequest {
            table: DataTable {
                columns: vec!["Name".into(), "Site".into(), "Sectors".into(), "Notes".into()],
                rows: rows
                    .into_iter()
                    .map(|row| row.into_iter().map(str::to_string).collect())
                    .collect(),
            },
            subject_column: "Name".to_string(),
            template: "Company".to_string(),
            mapping: BTreeMap::from([
                ("Site".to_string(), "Website".to_string()),
                ("Sectors".to_string(), "Industry".to_string()),
            ]),
        }
    }

    #[test]
    fn test_plan_rows() {
        let plan = plan_ingest(
            &request(vec![
                vec!["Acme Corp", "https://acme.example", "Energy, Storage", "ignored"],
                vec!["Globex", "", "Chemicals"],
            ]),
            &predicates(),
            &templates(),
        )
        .unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].name, "Acme Corp");
        assert_eq!(plan[0].statements[0], StatementInput::entity("p-isa", "e-company"));
        let values: Vec<_> = plan[0]
            .statements
            .iter()
            .filter_map(|s| s.object_value.as_deref())
            .collect();
        assert_eq!(values, vec!["Energy", "Storage", "https://acme.example"]);

        // Empty cell contributes nothing; short row is fine.
        assert_eq!(plan[1].statements.len(), 2);
    }

    #[test]
    fn test_plan_truncates_to_ten_rows() {
        let rows = (0..15).map(|_| vec!["Acme Corp"]).collect();
        let plan = plan_ingest(&request(rows), &predicates(), &templates()).unwrap();
        assert_eq!(plan.len(), MAX_INGEST_ROWS);
    }

    #[test]
    fn test_plan_rejects_unknown_names() {
        let mut bad_template = request(vec![vec!["Acme Corp"]]);
        bad_template.template = "Planet".to_string();
        assert_eq!(
            plan_ingest(&bad_template, &predicates(), &templates()),
            Err(IngestError::Form(FormError::UnknownTemplate("Planet".to_string())))
        );

        let mut bad_predicate = request(vec![vec!["Acme Corp"]]);
        bad_predicate
            .mapping
            .insert("Notes".to_string(), "Color".to_string());
        assert_eq!(
            plan_ingest(&bad_predicate, &predicates(), &templates()),
            Err(IngestError::Form(FormError::UnknownPredicate("Color".to_string())))
        );

        let mut bad_column = request(vec![vec!["Acme Corp"]]);
        bad_column.subject_column = "Title".to_string();
        assert_eq!(
            plan_ingest(&bad_column, &predicates(), &templates()),
            Err(IngestError::UnknownColumn("Title".to_string()))
        );
    }

    #[test]
    fn test_plan_rejects_blank_subject() {
        assert_eq!(
            plan_ingest(&request(vec![vec!["Acme"], vec![" "]]), &predicates(), &templates()),
            Err(IngestError::BlankSubject { row: 1 })
        );
    }

    #[tokio::test]
    async fn test_submit_reports_each_row() {
        let mut graph = MockGraphApi::new();
        let mut sequence = mockall::Sequence::new();
        graph
            .expect_create_entity()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| {
                Ok(CreatedEntity {
                    id: "e1".to_string(),
                })
            });
        graph
            .expect_create_entity()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| {
                Err(GraphError::Rejected {
                    body: r#"{"errors":[{"message":"duplicate"}]}"#.to_string(),
                })
            });

        let inputs = plan_ingest(
            &request(vec![vec!["Acme Corp"], vec!["Globex"]]),
            &predicates(),
            &templates(),
        )
        .unwrap();
        let outcomes = submit_all(&graph, &Bearer::anonymous(), inputs).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].entity_id.as_deref(), Some("e1"));
        assert_eq!(
            outcomes[0].link.as_deref(),
            Some("https://dapp.golden.xyz/entity/e1")
        );
        assert_eq!(outcomes[1].name, "Globex");
        assert_eq!(
            outcomes[1].error.as_deref(),
            Some(r#"{"errors":[{"message":"duplicate"}]}"#)
        );
    }
}
