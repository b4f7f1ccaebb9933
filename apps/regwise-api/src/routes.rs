use axum::{
	Json, Router,
	extract::{Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use regwise_service::{Answer, BLANK_QUESTION_MESSAGE, Error as ServiceError, SourceRef};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/copilot", get(copilot))
		.route("/v1/context", post(context))
		.with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct CopilotQuery {
	pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContextRequest {
	pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContextResponse {
	pub grounded: bool,
	pub context: String,
	pub matches: Vec<SourceRef>,
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn copilot(
	State(state): State<AppState>,
	Query(query): Query<CopilotQuery>,
) -> Result<Json<Answer>, ApiError> {
	let question = query.q.unwrap_or_default();
	let answer = state.service.ask(&question).await?;

	Ok(Json(answer))
}

/// Returns the formatted context block for a query without calling the language model.
async fn context(
	State(state): State<AppState>,
	Json(payload): Json<ContextRequest>,
) -> Result<Json<ContextResponse>, ApiError> {
	if payload.query.trim().is_empty() {
		return Err(json_error(StatusCode::BAD_REQUEST, "invalid_request", BLANK_QUESTION_MESSAGE));
	}

	let grounding = state.service.ground(&payload.query).await?;
	let context = state.service.formatter().format(grounding.segments());

	Ok(Json(ContextResponse {
		grounded: grounding.is_grounded(),
		context,
		matches: grounding.sources(),
	}))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let (status, code) = match &err {
			ServiceError::InvalidRequest { message } => {
				return json_error(StatusCode::BAD_REQUEST, "invalid_request", message.clone());
			},
			ServiceError::Retrieval { .. } => (StatusCode::BAD_GATEWAY, "retrieval_failed"),
			ServiceError::Provider { .. } => (StatusCode::BAD_GATEWAY, "provider_failed"),
			ServiceError::Ingestion { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "ingestion_failed"),
			ServiceError::Storage { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "storage_failed"),
			ServiceError::Config { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
		};

		tracing::error!(error = %err, error_code = code, "Request failed.");

		json_error(status, code, err.to_string())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}
