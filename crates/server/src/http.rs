//! HTTP Endpoints
//!
//! REST API for the loan officer. Chat and upload turns lock the
//! session's conversation mutex, so two requests for the same session
//! never interleave.

use axum::{
    extract::{DefaultBodyLimit, Json, Multipart, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use loan_officer_core::ConversationState;
use loan_officer_documents::{verified_monthly_salary, DocumentResult};

use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let config = state.config.read();
    let cors_layer = build_cors_layer(&config.server.cors_origins, config.server.cors_enabled);
    let max_upload_bytes = config.documents.max_upload_bytes;
    drop(config); // Release lock before building router

    Router::new()
        // Session endpoints
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id", delete(delete_session))
        .route("/api/sessions", get(list_sessions))
        // Chat endpoint
        .route("/api/chat/:session_id", post(chat))
        // Salary slip upload
        .route(
            "/api/upload/:session_id",
            post(upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        // Sanction letter download
        .route("/api/sanction-letter/:session_id", get(sanction_letter))
        // Health check
        .route("/health", get(health_check))
        // Admin endpoints
        .route("/admin/reload-config", post(reload_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:3000 for safety
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::info!("No valid CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin(HeaderValue::from_static("http://localhost:3000"))
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    // Credentials forbid wildcard headers, so list them explicitly
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Chat request
#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

/// Chat / upload response
#[derive(Debug, Serialize)]
struct ChatResponse {
    reply: String,
    session_id: String,
    state: &'static str,
}

/// Create a new session
async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let session = state.sessions.create().map_err(|e| {
        tracing::warn!("Session creation failed: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    Ok(Json(serde_json::json!({
        "session_id": session.id,
        "state": ConversationState::Init.as_str(),
    })))
}

/// Get session info
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let session = state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let conversation = session.conversation.lock().await;

    Ok(Json(serde_json::json!({
        "session_id": session.id,
        "active": session.is_active(),
        "state": conversation.state.as_str(),
        "name": conversation.name,
        "loan_amount": conversation.loan_amount,
        "tenure_months": conversation.tenure_months,
        "emi": conversation.emi,
    })))
}

/// Delete session
async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.sessions.remove(&id);
    StatusCode::NO_CONTENT
}

/// List sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.list();
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

/// Chat endpoint: one free-text turn
async fn chat(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, StatusCode> {
    let session = state
        .sessions
        .get(&session_id)
        .ok_or(StatusCode::NOT_FOUND)?;

    session.touch();

    let mut conversation = session.conversation.lock().await;
    match state.engine.handle_turn(&request.message, &mut conversation) {
        Ok(reply) => Ok(Json(ChatResponse {
            reply,
            session_id,
            state: conversation.state.as_str(),
        })),
        Err(e) => {
            tracing::error!("Chat error: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Salary slip upload: verify income and run underwriting immediately
async fn upload(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<ChatResponse>, StatusCode> {
    let session = state
        .sessions
        .get(&session_id)
        .ok_or(StatusCode::NOT_FOUND)?;

    session.touch();

    let mut conversation = session.conversation.lock().await;

    // The upload only makes sense once the offer is in place
    if !matches!(
        conversation.state,
        ConversationState::WaitUpload | ConversationState::AskPan | ConversationState::AskSalary
    ) {
        return Ok(Json(ChatResponse {
            reply: "Please complete the basic details (loan amount, salary & PAN) \
                    before uploading your salary slip."
                .to_string(),
            session_id,
            state: conversation.state.as_str(),
        }));
    }

    let mut slip_bytes: Option<Vec<u8>> = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Malformed upload: {}", e);
        StatusCode::BAD_REQUEST
    })? {
        if field.name() == Some("file") {
            let bytes = field.bytes().await.map_err(|e| {
                tracing::warn!("Upload read failed: {}", e);
                StatusCode::PAYLOAD_TOO_LARGE
            })?;
            slip_bytes = Some(bytes.to_vec());
            break;
        }
    }

    let slip_bytes = slip_bytes.ok_or(StatusCode::BAD_REQUEST)?;

    // Best effort: scan whatever text the file yields. Binary garbage
    // simply produces no candidates and lands on the fallback salary.
    let slip_text = String::from_utf8_lossy(&slip_bytes);
    let verified_salary = verified_monthly_salary(&slip_text);

    let reply = state
        .engine
        .complete_document_upload(verified_salary, &mut conversation);

    Ok(Json(ChatResponse {
        reply,
        session_id,
        state: conversation.state.as_str(),
    }))
}

/// Sanction letter download (approved sessions only)
async fn sanction_letter(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Response, StatusCode> {
    let session = state
        .sessions
        .get(&session_id)
        .ok_or(StatusCode::NOT_FOUND)?;

    let conversation = session.conversation.lock().await.clone();

    if conversation.state != ConversationState::Approved {
        return Err(StatusCode::BAD_REQUEST);
    }

    let reference_id = format!(
        "LOAN-{}",
        session_id.chars().take(8).collect::<String>().to_uppercase()
    );

    match state.renderer.render(&conversation, &reference_id).await {
        Ok(DocumentResult::Pdf(bytes)) => Ok((
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"sanction_letter.pdf\"".to_string(),
                ),
            ],
            bytes,
        )
            .into_response()),
        Ok(DocumentResult::Html(html)) => Ok((
            [(header::CONTENT_TYPE, "text/html; charset=utf-8".to_string())],
            html,
        )
            .into_response()),
        Err(e) => {
            tracing::error!("Sanction letter rendering failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Health check
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "Digital Loan Officer",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.sessions.count(),
    }))
}

/// Reload configuration from disk
async fn reload_config(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    match state.reload_config() {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "reloaded" })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "status": "error", "message": e })),
        ),
    }
}
