//! JSON HTTP surface: text-to-triples extraction plus the statement, entity
//! and ingest forms backed by the graph API.

pub mod auth;
pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod state;

pub use errors::{ApiError, ErrorResponse};
pub use state::AppState;

use axum::{
    Json, Router,
    routing::{get, post},
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "triplet", description = "Web page to knowledge-graph triples"),
    paths(
        health::health_check,
        handlers::extract,
        handlers::list_predicates,
        handlers::list_templates,
        handlers::search_entities,
        handlers::preview_statement,
        handlers::create_statement,
        handlers::preview_entity,
        handlers::create_entity,
        handlers::ingest,
    ),
    components(schemas(
        dtos::ExtractRequest,
        dtos::ExtractResponse,
        dtos::EntityMention,
        dtos::PredicateView,
        dtos::PreviewRequest,
        dtos::StatementCreatedResponse,
        dtos::EntityCreatedResponse,
        dtos::EntityPreviewResponse,
        dtos::IngestResponse,
        errors::ErrorResponse,
        health::HealthResponse,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "extract", description = "Entity candidates from a web page"),
        (name = "graph", description = "Knowledge-graph reads and submissions")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/v1/extract", post(handlers::extract))
        .route("/v1/predicates", get(handlers::list_predicates))
        .route("/v1/templates", get(handlers::list_templates))
        .route(
            "/v1/entities",
            get(handlers::search_entities).post(handlers::create_entity),
        )
        .route("/v1/entities/preview", post(handlers::preview_entity))
        .route("/v1/statements", post(handlers::create_statement))
        .route("/v1/statements/preview", post(handlers::preview_statement))
        .route("/v1/ingest", post(handlers::ingest))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
