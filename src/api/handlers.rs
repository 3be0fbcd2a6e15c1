use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::info;

use crate::api::{
    dtos::{
        EntityCreatedResponse, EntityPreviewResponse, EntitySearchParams, ExtractRequest,
        ExtractResponse, IngestResponse, PredicateView, PreviewRequest, StatementCreatedResponse,
    },
    errors::{ApiError, ErrorResponse},
    state::AppState,
};
use crate::graph::{
    Bearer, EntityDraft, EntitySummary, IngestRequest, NewStatement, PredicateIndex, Template,
    TriplePreview, entity_link, plan_ingest, submit_all,
};

#[utoipa::path(
    post,
    path = "/v1/extract",
    tag = "extract",
    request_body = ExtractRequest,
    responses(
        (status = 200, description = "Page text, entities and subject candidates", body = ExtractResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Recognition failed", body = ErrorResponse)
    )
)]
pub async fn extract(
    State(state): State<AppState>,
    Json(payload): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    payload.validate().map_err(ApiError::BadRequest)?;

    let allowed = payload.allowed_labels();
    let extraction = state.pipeline.extract(payload.url.trim(), &allowed).await?;
    Ok(Json(ExtractResponse::from(extraction)))
}

#[utoipa::path(
    get,
    path = "/v1/predicates",
    tag = "graph",
    responses(
        (status = 200, description = "All predicates with their object input kind", body = [PredicateView]),
        (status = 502, description = "Graph API failure", body = ErrorResponse)
    )
)]
pub async fn list_predicates(
    bearer: Bearer,
    State(state): State<AppState>,
) -> Result<Json<Vec<PredicateView>>, ApiError> {
    let predicates = state.graph.list_predicates(&bearer).await?;
    Ok(Json(predicates.into_iter().map(PredicateView::from).collect()))
}

#[utoipa::path(
    get,
    path = "/v1/templates",
    tag = "graph",
    responses(
        (status = 200, description = "Entity templates", body = [Template]),
        (status = 502, description = "Graph API failure", body = ErrorResponse)
    )
)]
pub async fn list_templates(
    bearer: Bearer,
    State(state): State<AppState>,
) -> Result<Json<Vec<Template>>, ApiError> {
    Ok(Json(state.graph.list_templates(&bearer).await?))
}

#[utoipa::path(
    get,
    path = "/v1/entities",
    tag = "graph",
    params(EntitySearchParams),
    responses(
        (status = 200, description = "Entities matching the name", body = [EntitySummary]),
        (status = 502, description = "Graph API failure", body = ErrorResponse)
    )
)]
pub async fn search_entities(
    bearer: Bearer,
    State(state): State<AppState>,
    Query(params): Query<EntitySearchParams>,
) -> Result<Json<Vec<EntitySummary>>, ApiError> {
    Ok(Json(
        state
            .graph
            .search_entities_by_name(&bearer, &params.name)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/v1/statements/preview",
    tag = "graph",
    request_body = PreviewRequest,
    responses(
        (status = 200, description = "Validated triple preview", body = TriplePreview),
        (status = 422, description = "Invalid statement", body = ErrorResponse)
    )
)]
pub async fn preview_statement(
    bearer: Bearer,
    State(state): State<AppState>,
    Json(payload): Json<PreviewRequest>,
) -> Result<Json<TriplePreview>, ApiError> {
    let predicates = predicate_index(&state, &bearer).await?;
    payload.statement.to_input(&predicates)?;
    Ok(Json(payload.statement.preview(&payload.subject)))
}

#[utoipa::path(
    post,
    path = "/v1/statements",
    tag = "graph",
    request_body = NewStatement,
    responses(
        (status = 201, description = "Statement created", body = StatementCreatedResponse),
        (status = 422, description = "Invalid statement", body = ErrorResponse),
        (status = 502, description = "Graph API rejected the statement", body = ErrorResponse)
    )
)]
pub async fn create_statement(
    bearer: Bearer,
    State(state): State<AppState>,
    Json(payload): Json<NewStatement>,
) -> Result<(StatusCode, Json<StatementCreatedResponse>), ApiError> {
    let predicates = predicate_index(&state, &bearer).await?;
    let input = payload.to_input(&predicates)?;

    let created = state.graph.create_statement(&bearer, input).await?;
    info!(statement_id = %created.id, subject_id = %created.subject_id, "statement created");
    Ok((
        StatusCode::CREATED,
        Json(StatementCreatedResponse {
            link: entity_link(&created.subject_id),
            id: created.id,
            subject_id: created.subject_id,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/v1/entities/preview",
    tag = "graph",
    request_body = EntityDraft,
    responses(
        (status = 200, description = "Validated entity preview", body = EntityPreviewResponse),
        (status = 422, description = "Invalid entity", body = ErrorResponse)
    )
)]
pub async fn preview_entity(
    bearer: Bearer,
    State(state): State<AppState>,
    Json(payload): Json<EntityDraft>,
) -> Result<Json<EntityPreviewResponse>, ApiError> {
    let predicates = predicate_index(&state, &bearer).await?;
    payload.to_input(&predicates)?;
    Ok(Json(EntityPreviewResponse::from(&payload)))
}

#[utoipa::path(
    post,
    path = "/v1/entities",
    tag = "graph",
    request_body = EntityDraft,
    responses(
        (status = 201, description = "Entity created", body = EntityCreatedResponse),
        (status = 422, description = "Invalid entity", body = ErrorResponse),
        (status = 502, description = "Graph API rejected the entity", body = ErrorResponse)
    )
)]
pub async fn create_entity(
    bearer: Bearer,
    State(state): State<AppState>,
    Json(payload): Json<EntityDraft>,
) -> Result<(StatusCode, Json<EntityCreatedResponse>), ApiError> {
    let predicates = predicate_index(&state, &bearer).await?;
    let input = payload.to_input(&predicates)?;

    let created = state.graph.create_entity(&bearer, input).await?;
    info!(entity_id = %created.id, "entity created");
    Ok((
        StatusCode::CREATED,
        Json(EntityCreatedResponse {
            link: entity_link(&created.id),
            id: created.id,
            preview: payload.preview(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/v1/ingest",
    tag = "graph",
    request_body = IngestRequest,
    responses(
        (status = 200, description = "Outcome per submitted row", body = IngestResponse),
        (status = 422, description = "Table or mapping invalid", body = ErrorResponse),
        (status = 502, description = "Graph API failure", body = ErrorResponse)
    )
)]
pub async fn ingest(
    bearer: Bearer,
    State(state): State<AppState>,
    Json(payload): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, ApiError> {
    let predicates = predicate_index(&state, &bearer).await?;
    let templates = state.graph.list_templates(&bearer).await?;
    let inputs = plan_ingest(&payload, &predicates, &templates)?;

    let outcomes = submit_all(state.graph.as_ref(), &bearer, inputs).await;
    Ok(Json(IngestResponse { outcomes }))
}

async fn predicate_index(state: &AppState, bearer: &Bearer) -> Result<PredicateIndex, ApiError> {
    let predicates = state.graph.list_predicates(bearer).await?;
    Ok(PredicateIndex::new(predicates))
}
