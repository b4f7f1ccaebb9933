use std::{env, fs, path::Path, sync::Arc};

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use color_eyre::eyre;
use serde_json::{Map, Value};
use tower::util::ServiceExt;

use regwise_api::{routes, state::AppState};
use regwise_config::{
	ChunkingProviderConfig, Config, Context, EmbeddingProviderConfig, Ingestion, LlmProviderConfig,
	Providers as ProviderConfigs, Qdrant, Retrieval, Service, Storage,
};
use regwise_domain::{
	document::{DocumentMetadata, DocumentType},
	page::{Chunk, PageUnit},
	provenance::RetrievalMatch,
};
use regwise_service::{
	BoxFuture, ChatProvider, DocumentChunker, EmbeddingProvider, Providers, RegService, VectorStore,
};

const VECTOR_DIM: u32 = 4;

struct DummyEmbedding;
impl EmbeddingProvider for DummyEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		let fail = texts.iter().any(|text| text.contains("unreachable"));

		Box::pin(async move {
			if fail {
				return Err(eyre::eyre!("Embedding endpoint unreachable."));
			}

			Ok(vec![vec![1.0, 0.0, 0.0, 0.0]; texts.len()])
		})
	}
}

struct NoChunker;
impl DocumentChunker for NoChunker {
	fn chunk<'a>(
		&'a self,
		_cfg: &'a ChunkingProviderConfig,
		_path: &'a Path,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Chunk>>> {
		Box::pin(async move { Ok(Vec::new()) })
	}
}

struct EchoChat;
impl ChatProvider for EchoChat {
	fn complete<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		let answer = format!("Answered from {} messages.", messages.len());

		Box::pin(async move { Ok(answer) })
	}
}

struct CannedStore {
	matches: Vec<RetrievalMatch>,
}
impl VectorStore for CannedStore {
	fn add_entry<'a>(
		&'a self,
		_vector: Vec<f32>,
		_unit: &'a PageUnit,
	) -> BoxFuture<'a, regwise_storage::Result<()>> {
		Box::pin(async move { Ok(()) })
	}

	fn search<'a>(
		&'a self,
		_vector: Vec<f32>,
		_max_results: u32,
		_min_score: f32,
	) -> BoxFuture<'a, regwise_storage::Result<Vec<RetrievalMatch>>> {
		let matches = self.matches.clone();

		Box::pin(async move { Ok(matches) })
	}
}

struct FailingStore;
impl VectorStore for FailingStore {
	fn add_entry<'a>(
		&'a self,
		_vector: Vec<f32>,
		_unit: &'a PageUnit,
	) -> BoxFuture<'a, regwise_storage::Result<()>> {
		Box::pin(async move { Ok(()) })
	}

	fn search<'a>(
		&'a self,
		_vector: Vec<f32>,
		_max_results: u32,
		_min_score: f32,
	) -> BoxFuture<'a, regwise_storage::Result<Vec<RetrievalMatch>>> {
		Box::pin(async move {
			Err(regwise_storage::Error::InvalidArgument("Collection is unavailable.".to_string()))
		})
	}
}

fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage {
			qdrant: Qdrant {
				url: "http://127.0.0.1:6334".to_string(),
				collection: "regwise_http".to_string(),
				vector_dim: VECTOR_DIM,
			},
		},
		providers: ProviderConfigs {
			embedding: EmbeddingProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1".to_string(),
				api_key: "test-key".to_string(),
				path: "/embeddings".to_string(),
				model: "test".to_string(),
				dimensions: VECTOR_DIM,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			chunking: ChunkingProviderConfig {
				api_base: "http://127.0.0.1".to_string(),
				path: "/v1/chunk/hybrid/file".to_string(),
				api_key: None,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			chat: LlmProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1".to_string(),
				api_key: "test-key".to_string(),
				path: "/chat/completions".to_string(),
				model: "test".to_string(),
				temperature: 0.2,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		ingestion: Ingestion::default(),
		retrieval: Retrieval::default(),
		context: Context::default(),
	}
}

fn bulletin_match(score: f32) -> RetrievalMatch {
	RetrievalMatch {
		text: "Reporting deadline moves to 30 June.".to_string(),
		metadata: DocumentMetadata::new(
			Some("bulletin-7.pdf".to_string()),
			Some("bulletin-7.pdf".to_string()),
			Some(2),
			Some(DocumentType::Pdf),
		),
		score,
	}
}

fn app(matches: Vec<RetrievalMatch>) -> Router {
	app_with_store(Arc::new(CannedStore { matches }))
}

fn app_with_store(store: Arc<dyn VectorStore>) -> Router {
	let providers = Providers::new(Arc::new(DummyEmbedding), Arc::new(NoChunker), Arc::new(EchoChat));
	let service =
		RegService::with_providers(test_config(), store, providers).expect("Failed to build service.");

	routes::router(AppState::from_service(service))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
	let response = app.oneshot(request).await.expect("Failed to call the router.");
	let status = response.status();
	let bytes =
		body::to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body.");
	let json = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).expect("Response body is not JSON.")
	};

	(status, json)
}

fn get(uri: &str) -> Request<Body> {
	Request::builder().uri(uri).body(Body::empty()).expect("Failed to build request.")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header("content-type", "application/json")
		.body(Body::from(body.to_string()))
		.expect("Failed to build request.")
}

#[tokio::test]
async fn health_ok() {
	let (status, _) = send(app(Vec::new()), get("/health")).await;

	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn copilot_rejects_missing_and_blank_questions() {
	for uri in ["/v1/copilot", "/v1/copilot?q=", "/v1/copilot?q=%20%20"] {
		let (status, json) = send(app(vec![bulletin_match(0.9)]), get(uri)).await;

		assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
		assert_eq!(json["error_code"], "invalid_request");
		assert_eq!(json["message"], "Please provide a question about regulatory changes.");
	}
}

#[tokio::test]
async fn copilot_answers_with_sources() {
	let (status, json) = send(
		app(vec![bulletin_match(0.9), bulletin_match(0.5)]),
		get("/v1/copilot?q=When%20is%20the%20reporting%20deadline%3F"),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["answer"], "Answered from 2 messages.");
	assert_eq!(json["grounded"], true);
	assert_eq!(json["sources"].as_array().map(Vec::len), Some(1));
	assert_eq!(json["sources"][0]["doc_id"], "bulletin-7.pdf");
	assert_eq!(json["sources"][0]["page_number"], 2);
}

#[tokio::test]
async fn context_returns_formatted_blocks() {
	let (status, json) = send(
		app(vec![bulletin_match(0.9)]),
		post_json("/v1/context", serde_json::json!({ "query": "reporting deadline" })),
	)
	.await;
	let context = json["context"].as_str().expect("Missing context.");

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["grounded"], true);
	assert!(context.starts_with("--- Content Block 1 ---\nDocument Information:\n"));
	assert!(context.contains("\nContent:\nReporting deadline moves to 30 June."));
	assert!(context.contains("  Method: vector_search\n"));
	assert_eq!(json["matches"][0]["page_number"], 2);
}

#[tokio::test]
async fn context_reports_empty_grounding() {
	let (status, json) = send(
		app(vec![bulletin_match(0.4)]),
		post_json("/v1/context", serde_json::json!({ "query": "capital buffers" })),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["grounded"], false);
	assert_eq!(json["context"], "");
	assert_eq!(json["matches"], serde_json::json!([]));
}

#[tokio::test]
async fn context_rejects_blank_query() {
	let (status, json) = send(
		app(Vec::new()),
		post_json("/v1/context", serde_json::json!({ "query": "  " })),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_request");
}

#[tokio::test]
async fn retrieval_failure_maps_to_bad_gateway() {
	let (status, json) =
		send(app(vec![bulletin_match(0.9)]), get("/v1/copilot?q=unreachable%20topic")).await;

	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert_eq!(json["error_code"], "retrieval_failed");
}

#[tokio::test]
async fn store_failure_maps_to_bad_gateway() {
	let (status, json) = send(
		app_with_store(Arc::new(FailingStore)),
		get("/v1/copilot?q=What%20changed%3F"),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert_eq!(json["error_code"], "retrieval_failed");
	assert!(
		json["message"].as_str().is_some_and(|message| message.contains("Collection is unavailable."))
	);

	let (status, json) = send(
		app_with_store(Arc::new(FailingStore)),
		post_json("/v1/context", serde_json::json!({ "query": "capital buffers" })),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert_eq!(json["error_code"], "retrieval_failed");
}

#[tokio::test]
async fn bootstrap_keeps_the_ingest_report() {
	let dir = env::temp_dir().join(format!("regwise_api_bootstrap_{}", std::process::id()));

	fs::create_dir_all(&dir).expect("Failed to create documents directory.");
	fs::write(dir.join("bulletin-7.pdf"), b"fixture").expect("Failed to write fixture.");
	fs::write(dir.join("notes.txt"), b"fixture").expect("Failed to write fixture.");

	let mut cfg = test_config();

	cfg.ingestion.documents_dir = dir.display().to_string();

	let providers = Providers::new(Arc::new(DummyEmbedding), Arc::new(NoChunker), Arc::new(EchoChat));
	let store = Arc::new(CannedStore { matches: Vec::new() });
	let service =
		RegService::with_providers(cfg, store, providers).expect("Failed to build service.");
	let state = AppState::from_service(service);

	assert!(state.ingest_report.is_none());

	let skipped = state.clone().bootstrap(false).await;

	assert!(skipped.ingest_report.is_none());

	let loaded = state.bootstrap(true).await;
	let report = loaded.ingest_report.as_deref().expect("Missing ingest report.");

	assert_eq!(report.succeeded, 1);
	assert_eq!(report.skipped, 1);
	assert_eq!(report.failed, 0);
	assert_eq!(report.total_pages, 0);

	fs::remove_dir_all(dir).ok();
}
