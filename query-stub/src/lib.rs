//! Placeholder question/answer endpoint.
//!
//! `POST /api/query` echoes the submitted question inside a canned answer. There is no model
//! behind it; the route exists so a front end has something to talk to.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tower_http::cors::CorsLayer;

/// Errors that can occur while serving.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound.
    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    /// The server stopped with an error.
    #[error("server error: {0}")]
    Server(String),
}

/// Configuration for the stub server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], 5000).into(),
        }
    }
}

impl ServerConfig {
    /// Creates a config with a custom port.
    pub fn with_port(port: u16) -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], port).into(),
        }
    }
}

/// Successful reply.
#[derive(Debug, Serialize)]
pub struct AnswerBody {
    /// Canned answer quoting the question.
    pub answer: String,
}

/// Error reply.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub error: String,
}

/// Build the application router.
pub fn router() -> Router {
    Router::new()
        .route("/api/query", post(query_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
}

/// Serve [`router`] until the process is stopped.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    tracing::info!(addr = %config.bind_addr, "query stub listening");

    axum::serve(listener, router())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))
}

/// Handler for `POST /api/query`.
///
/// A missing or malformed body counts as an empty object. A non-string question is echoed as
/// its compact JSON text, so `true` stays `true` and a list reads `["a"]`.
async fn query_handler(body: Bytes) -> Response {
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let question = payload.get("question").filter(|q| is_truthy(q));

    let Some(question) = question else {
        tracing::debug!("rejecting query without a question");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "No question provided".to_string(),
            }),
        )
            .into_response();
    };

    let text = match question {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    (
        StatusCode::OK,
        Json(AnswerBody {
            answer: demo_answer(&text),
        }),
    )
        .into_response()
}

/// Handler for `GET /health`.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// The canned reply for `question`.
pub fn demo_answer(question: &str) -> String {
    format!("This is a demo answer for your question: \"{question}\"")
}

/// Empty strings, `null`, `false`, zero and empty containers do not count as a question.
fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
