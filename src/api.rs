//! HTTP surface: `POST /bfhl`, `GET /health`, and a JSON 404 for the rest.

use std::any::Any;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::Value;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::consts::MAX_BODY_BYTES;
use crate::dispatch::Dispatcher;
use crate::envelope::Envelope;
use crate::error::{ApiError, ApiResult};
use crate::request::validate;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<Dispatcher>,
    official_email: Arc<str>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, official_email: &str) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            official_email: Arc::from(official_email),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/bfhl", post(handle_bfhl).fallback(not_found))
        .route("/health", get(health).fallback(not_found))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_bfhl(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Envelope>> {
    let body = match body {
        Ok(Json(value)) => Some(value),
        Err(rejection) => {
            debug!(%rejection, "unreadable request body");
            None
        }
    };

    let request = validate(body.as_ref())?;
    let operation = request.kind.key();
    let data = state.dispatcher.dispatch(request).await?;
    info!(operation, "request served");

    Ok(Json(Envelope::success(&state.official_email, data)))
}

async fn health(State(state): State<AppState>) -> Json<Envelope> {
    Json(Envelope::health(&state.official_email))
}

async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    ApiError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}
