//! Router assembly and cross-cutting middleware.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method, Request};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use tracing::warn;
use uuid::Uuid;

use studium_core::defaults;

use crate::handlers;
use crate::state::AppState;

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically, which
/// keeps log correlation cheap.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Parse `ALLOWED_ORIGINS` (comma-separated) into origin header values.
///
/// Defaults to the local dev frontend when unset; a wildcard is
/// deliberately not supported since credentials are allowed.
fn parse_allowed_origins() -> Vec<HeaderValue> {
    let raw = std::env::var("ALLOWED_ORIGINS").unwrap_or_default();
    let configured: Vec<HeaderValue> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(
                    subsystem = "api",
                    component = "cors",
                    origin = origin,
                    "Ignoring unparseable origin"
                );
                None
            }
        })
        .collect();

    if configured.is_empty() {
        vec![HeaderValue::from_static("http://localhost:3000")]
    } else {
        configured
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parse_allowed_origins()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(defaults::USER_ID_HEADER),
        ])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Build the application router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let request_id_header = header::HeaderName::from_static("x-request-id");

    Router::new()
        .route("/health", get(health_check))
        // Notes
        .route(
            "/api/notes",
            get(handlers::notes::list_notes).post(handlers::notes::create_note),
        )
        .route(
            "/api/notes/:id",
            get(handlers::notes::get_note)
                .put(handlers::notes::update_note)
                .delete(handlers::notes::delete_note),
        )
        // Flashcards
        .route(
            "/api/flashcards/list",
            get(handlers::flashcards::list_flashcard_sets),
        )
        .route(
            "/api/flashcards/create",
            post(handlers::flashcards::create_flashcards),
        )
        .route(
            "/api/flashcards/:id",
            get(handlers::flashcards::get_flashcard_set)
                .delete(handlers::flashcards::delete_flashcard_set),
        )
        // Quizzes
        .route("/api/quizzes/list", get(handlers::quizzes::list_quiz_sets))
        .route("/api/quizzes/create", post(handlers::quizzes::create_quiz))
        .route(
            "/api/quizzes/:id",
            get(handlers::quizzes::get_quiz_set).delete(handlers::quizzes::delete_quiz_set),
        )
        // Upload
        .route("/api/upload", post(handlers::upload::upload_files))
        // Chat
        .route("/api/chatbot", post(handlers::chat::chat))
        // Me / dashboard
        .route("/api/me/documents", get(handlers::documents::list_documents))
        .route(
            "/api/dashboard/stats",
            get(handlers::dashboard::dashboard_stats),
        )
        .layer(DefaultBodyLimit::max(defaults::MAX_UPLOAD_BODY_BYTES))
        .layer(cors_layer())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            request_id_header,
            MakeRequestUuidV7,
        ))
        .with_state(state)
}
