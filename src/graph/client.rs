use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::graph::errors::GraphError;
use crate::graph::types::{
    Bearer, CreateEntityInput, CreateStatementInput, CreatedEntity, CreatedStatement,
    EntitySummary, Predicate, Template,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const PREDICATES_QUERY: &str = "query Predicates { predicates { edges { node { id name objectType } } } }";
const TEMPLATES_QUERY: &str =
    "query Templates { templates { edges { node { id entityId entity { name description } } } } }";
const ENTITY_SEARCH_QUERY: &str =
    "query EntityByName($name: String!) { entityByName(name: $name) { nodes { id name } } }";
const CREATE_ENTITY_MUTATION: &str =
    "mutation CreateEntity($input: CreateEntityInput!) { createEntity(input: $input) { entity { id } } }";
const CREATE_STATEMENT_MUTATION: &str = "mutation CreateStatement($input: CreateStatementInput!) { createStatement(input: $input) { statement { id subject { id } } } }";

/// Read and write access to the knowledge graph.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphApi: Send + Sync {
    async fn list_predicates(&self, auth: &Bearer) -> Result<Vec<Predicate>, GraphError>;

    async fn list_templates(&self, auth: &Bearer) -> Result<Vec<Template>, GraphError>;

    /// Candidate entities for disambiguation. A blank name matches nothing.
    async fn search_entities_by_name(
        &self,
        auth: &Bearer,
        name: &str,
    ) -> Result<Vec<EntitySummary>, GraphError>;

    async fn create_entity(
        &self,
        auth: &Bearer,
        input: CreateEntityInput,
    ) -> Result<CreatedEntity, GraphError>;

    async fn create_statement(
        &self,
        auth: &Bearer,
        input: CreateStatementInput,
    ) -> Result<CreatedStatement, GraphError>;
}

/// [`GraphApi`] over GraphQL-on-HTTP.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    client: Client,
    endpoint: String,
    default_token: Option<String>,
}

impl GraphQlClient {
    pub fn new(config: &Config) -> Result<Self, GraphError> {
        Self::with_endpoint(config.graph_api_url(), config.graph_api_token())
    }

    pub fn with_endpoint(endpoint: &str, default_token: Option<&str>) -> Result<Self, GraphError> {
        let client = ClientBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GraphError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            default_token: default_token.map(str::to_string),
        })
    }

    /// POST one GraphQL operation and return the status and raw body text.
    async fn post(
        &self,
        auth: &Bearer,
        query: &str,
        variables: Value,
    ) -> Result<(reqwest::StatusCode, String), GraphError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .json(&json!({ "query": query, "variables": variables }));

        if let Some(token) = auth.token().or(self.default_token.as_deref()) {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(GraphError::from_reqwest_error)?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(GraphError::from_reqwest_error)?;
        debug!(status = %status, bytes = body.len(), "graph API response");
        Ok((status, body))
    }

    async fn read<T: DeserializeOwned>(
        &self,
        auth: &Bearer,
        query: &str,
        variables: Value,
    ) -> Result<T, GraphError> {
        let (status, body) = self.post(auth, query, variables).await?;
        if !status.is_success() {
            return Err(GraphError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response: GraphQlResponse<T> =
            serde_json::from_str(&body).map_err(|e| GraphError::Decode(e.to_string()))?;
        if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(GraphError::Query(message));
        }
        response
            .data
            .ok_or_else(|| GraphError::Decode("response has no data".to_string()))
    }

    /// Mutations: anything other than clean data comes back verbatim.
    async fn write<T: DeserializeOwned>(
        &self,
        auth: &Bearer,
        query: &str,
        variables: Value,
    ) -> Result<T, GraphError> {
        let (status, body) = self.post(auth, query, variables).await?;

        let parsed = serde_json::from_str::<GraphQlResponse<T>>(&body).ok();
        match parsed {
            Some(GraphQlResponse {
                data: Some(data),
                errors: None,
            }) if status.is_success() => Ok(data),
            Some(GraphQlResponse {
                data: Some(data),
                errors: Some(errors),
            }) if status.is_success() && errors.is_empty() => Ok(data),
            _ => {
                warn!(status = %status, "graph API rejected mutation");
                Err(GraphError::Rejected { body })
            }
        }
    }
}

#[async_trait]
impl GraphApi for GraphQlClient {
    #[instrument(skip_all)]
    async fn list_predicates(&self, auth: &Bearer) -> Result<Vec<Predicate>, GraphError> {
        let data: PredicatesData = self.read(auth, PREDICATES_QUERY, json!({})).await?;
        Ok(data.predicates.into_nodes())
    }

    #[instrument(skip_all)]
    async fn list_templates(&self, auth: &Bearer) -> Result<Vec<Template>, GraphError> {
        let data: TemplatesData = self.read(auth, TEMPLATES_QUERY, json!({})).await?;
        Ok(data
            .templates
            .into_nodes()
            .into_iter()
            .map(TemplateNode::into_template)
            .collect())
    }

    #[instrument(skip_all, fields(name = %name))]
    async fn search_entities_by_name(
        &self,
        auth: &Bearer,
        name: &str,
    ) -> Result<Vec<EntitySummary>, GraphError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Vec::new());
        }
        let data: EntityByNameData = self
            .read(auth, ENTITY_SEARCH_QUERY, json!({ "name": name }))
            .await?;
        Ok(data
            .entity_by_name
            .map(|found| found.nodes)
            .unwrap_or_default())
    }

    #[instrument(skip_all, fields(name = %input.name, statements = input.statements.len()))]
    async fn create_entity(
        &self,
        auth: &Bearer,
        input: CreateEntityInput,
    ) -> Result<CreatedEntity, GraphError> {
        let data: CreateEntityData = self
            .write(auth, CREATE_ENTITY_MUTATION, json!({ "input": input }))
            .await?;
        Ok(CreatedEntity {
            id: data.create_entity.entity.id,
        })
    }

    #[instrument(skip_all, fields(subject_id = %input.subject_id))]
    async fn create_statement(
        &self,
        auth: &Bearer,
        input: CreateStatementInput,
    ) -> Result<CreatedStatement, GraphError> {
        let data: CreateStatementData = self
            .write(auth, CREATE_STATEMENT_MUTATION, json!({ "input": input }))
            .await?;
        let statement = data.create_statement.statement;
        Ok(CreatedStatement {
            id: statement.id,
            subject_id: statement.subject.id,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlErrorMessage>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(bound = "T: Deserialize<'de>")]
struct Connection<T> {
    #[serde(default)]
    edges: Vec<Edge<T>>,
}

impl<T> Connection<T> {
    fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
struct PredicatesData {
    predicates: Connection<Predicate>,
}

#[derive(Debug, Deserialize)]
struct TemplatesData {
    templates: Connection<TemplateNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateNode {
    id: String,
    entity_id: String,
    entity: TemplateEntity,
}

#[derive(Debug, Deserialize)]
struct TemplateEntity {
    name: String,
    description: Option<String>,
}

impl TemplateNode {
    fn into_template(self) -> Template {
        Template {
            id: self.id,
            entity_id: self.entity_id,
            name: self.entity.name,
            description: self.entity.description,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityByNameData {
    entity_by_name: Option<Nodes<EntitySummary>>,
}

#[derive(Debug, Deserialize)]
#[serde(bound = "T: Deserialize<'de>")]
struct Nodes<T> {
    #[serde(default)]
    nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct IdOnly {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateEntityData {
    create_entity: EntityPayload,
}

#[derive(Debug, Deserialize)]
struct EntityPayload {
    entity: IdOnly,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateStatementData {
    create_statement: StatementPayload,
}

#[derive(Debug, Deserialize)]
struct StatementPayload {
    statement: StatementNode,
}

#[derive(Debug, Deserialize)]
struct StatementNode {
    id: String,
    subject: IdOnly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_node_flattens_entity() {
        let node: TemplateNode = serde_json::from_value(json!({
            "id": "t1",
            "entityId": "e-company",
            "entity": { "name": "Company", "description": "A business" }
        }))
        .unwrap();
        let template = node.into_template();
        assert_eq!(template.name, "Company");
        assert_eq!(template.entity_id, "e-company");
    }

    #[test]
    fn test_missing_edges_and_nodes_decode_empty() {
        let predicates: PredicatesData =
            serde_json::from_value(json!({ "predicates": {} })).unwrap();
        assert!(predicates.predicates.into_nodes().is_empty());

        let found: EntityByNameData =
            serde_json::from_value(json!({ "entityByName": {} })).unwrap();
        assert!(found.entity_by_name.unwrap().nodes.is_empty());
    }

    #[test]
    fn test_null_write_payload_does_not_decode() {
        let body = r#"{"data":{"createEntity":null},"errors":[{"message":"Not authorized"}]}"#;
        let parsed = serde_json::from_str::<GraphQlResponse<CreateEntityData>>(body);
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn test_blank_search_skips_network() {
        // Unroutable endpoint: any request would fail.
        let client = GraphQlClient::with_endpoint("http://127.0.0.1:9/graphql", None).unwrap();
        let found = client
            .search_entities_by_name(&Bearer::anonymous(), "   ")
            .await
            .unwrap();
        assert!(found.is_empty());
    }
}
