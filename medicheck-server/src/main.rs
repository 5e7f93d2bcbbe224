//! HTTP API for the MediCheck validation pipeline.
//!
//! Routes (prefix /api): validate-summary (JSON body), validate-summary-stream
//! (SSE of per-stage progress), validate-upload (multipart file), and
//! generate-summary. Configure via env: OPENAI_API_KEY, OPENAI_MODEL,
//! OPENAI_BASE_URL, BIND_ADDR. Loads .env with dotenv.

use std::convert::Infallible;
use std::io::Write;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio_stream::{Stream, StreamExt};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span};

use medicheck::collab::{LlmChat, LlmExtractor, LlmGuardrail, LlmPolicy, LlmSummarizer, LlmValidator};
use medicheck::{Collaborators, FlowError, FlowEvent, FlowState, Pipeline, ValidationReport};

/// Error responses follow the `{"detail": ...}` shape the frontend expects.
enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail }))).into_response()
            }
        }
    }
}

impl From<FlowError> for ApiError {
    fn from(error: FlowError) -> Self {
        ApiError::BadRequest(error.to_string())
    }
}

/// Validates a clinical summary passed as the JSON request body.
async fn validate_summary(
    State(pipeline): State<Arc<Pipeline>>,
    Json(document): Json<Value>,
) -> Result<Json<ValidationReport>, ApiError> {
    let state = pipeline.validate(FlowState::from_document(document)).await?;
    Ok(Json(ValidationReport::from(state)))
}

#[derive(Serialize)]
struct StageUpdate {
    stage: String,
    report: ValidationReport,
}

/// Streams per-stage progress as SSE: one `stage` event per completed stage,
/// then a final `result` event with the terminal report.
async fn validate_summary_stream(
    State(pipeline): State<Arc<Pipeline>>,
    Json(document): Json<Value>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let events = pipeline.validate_stream(FlowState::from_document(document))?;
    let stream = events.map(|event| {
        let built = match event {
            FlowEvent::StageCompleted { stage, state } => Event::default().event("stage").json_data(
                StageUpdate {
                    stage: stage.to_string(),
                    report: ValidationReport::from(state),
                },
            ),
            FlowEvent::Finished(state) => Event::default()
                .event("result")
                .json_data(ValidationReport::from(state)),
        };
        Ok(built.unwrap_or_else(|_| Event::default().event("error").data("{}")))
    });
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Validates an uploaded file. JSON uploads are parsed and validated
/// directly; anything else is written to a temp file and enters the flow
/// through the extraction stage.
async fn validate_upload(
    State(pipeline): State<Arc<Pipeline>>,
    mut multipart: Multipart,
) -> Result<Json<ValidationReport>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let is_json = field
            .file_name()
            .map(|name| name.ends_with(".json"))
            .or_else(|| field.content_type().map(|ct| ct.ends_with("json")))
            .unwrap_or(false);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {}", e)))?;

        let entry = if is_json {
            let document: Value = serde_json::from_slice(&bytes)
                .map_err(|_| ApiError::BadRequest("Invalid JSON file.".to_string()))?;
            FlowState::from_document(document)
        } else {
            let mut file = tempfile::NamedTempFile::new()
                .map_err(|e| ApiError::BadRequest(format!("cannot store upload: {}", e)))?;
            file.write_all(&bytes)
                .map_err(|e| ApiError::BadRequest(format!("cannot store upload: {}", e)))?;
            let state = pipeline
                .validate(FlowState::from_source_ref(file.path().to_string_lossy()))
                .await?;
            // Temp file lives until here so extraction can read it.
            drop(file);
            return Ok(Json(ValidationReport::from(state)));
        };

        let state = pipeline.validate(entry).await?;
        return Ok(Json(ValidationReport::from(state)));
    }
    Err(ApiError::BadRequest(
        "multipart field 'file' is required".to_string(),
    ))
}

#[derive(Serialize)]
struct SummaryResponse {
    summary: Option<String>,
    message: String,
}

/// Generates a prose summary for the JSON request body, independent of validation.
async fn generate_summary(
    State(pipeline): State<Arc<Pipeline>>,
    Json(document): Json<Value>,
) -> Json<SummaryResponse> {
    let state = pipeline.summarize(document).await;
    Json(SummaryResponse {
        summary: state.summary,
        message: state.message,
    })
}

async fn health() -> &'static str {
    "ok"
}

fn app(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/validate-summary", post(validate_summary))
        .route("/api/validate-summary-stream", post(validate_summary_stream))
        .route("/api/validate-upload", post(validate_upload))
        .route("/api/generate-summary", post(generate_summary))
        .layer(
            TraceLayer::new_for_http().make_span_with(
                |req: &axum::http::Request<axum::body::Body>| {
                    info_span!("request", method = %req.method(), uri = %req.uri())
                },
            ),
        )
        .layer(CorsLayer::permissive())
        .with_state(pipeline)
}

/// Load .env from current directory; if not found, try parent (workspace root
/// when run from the crate dir).
fn load_dotenv() {
    if dotenv::dotenv().is_ok() {
        return;
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(parent) = cwd.parent() {
            let env_path = parent.join(".env");
            if env_path.is_file() {
                let _ = dotenv::from_path(env_path);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    load_dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,medicheck_server=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if std::env::var("OPENAI_API_KEY").unwrap_or_default().is_empty() {
        return Err("OPENAI_API_KEY must be set".into());
    }

    let chat = Arc::new(LlmChat::from_env());
    let collabs = Collaborators {
        guardrail: Arc::new(LlmGuardrail::new(Arc::clone(&chat))),
        validator: Arc::new(LlmValidator::new(Arc::clone(&chat))),
        policy: Arc::new(LlmPolicy::new(Arc::clone(&chat))),
        extractor: Arc::new(LlmExtractor::new(Arc::clone(&chat))),
        summarizer: Arc::new(LlmSummarizer::new(Arc::clone(&chat))),
    };
    // Both flows are built once here and shared across all requests.
    let pipeline = Arc::new(Pipeline::new(&collabs)?);

    let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    info!("listening on http://{}", bind);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    axum::serve(listener, app(pipeline)).await?;
    Ok(())
}
