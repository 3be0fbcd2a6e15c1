//! Knowledge-graph side: protocol client, statement/entity forms and
//! tabular ingest.

pub mod client;
pub mod errors;
pub mod forms;
pub mod ingest;
pub mod types;

pub use client::{GraphApi, GraphQlClient};
pub use errors::{FormError, GraphError, IngestError};
pub use forms::{
    EntityDraft, NewStatement, ObjectField, PredicateIndex, StatementDraft, TriplePreview,
    entity_link, object_field,
};
pub use ingest::{DataTable, IngestRequest, RowOutcome, plan_ingest, submit_all};
pub use types::{
    Bearer, CreateEntityInput, CreateStatementInput, CreatedEntity, CreatedStatement,
    EntitySummary, ObjectType, Predicate, StatementInput, Template,
};
