use serde::Deserialize;
use serde_json::{Map, Value};

use regwise_domain::context::MetadataKey;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub ingestion: Ingestion,
	#[serde(default)]
	pub retrieval: Retrieval,
	#[serde(default)]
	pub context: Context,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub chunking: ChunkingProviderConfig,
	pub chat: LlmProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Document conversion service that splits source files into page-tagged chunks.
#[derive(Debug, Deserialize)]
pub struct ChunkingProviderConfig {
	pub api_base: String,
	#[serde(default = "default_chunking_path")]
	pub path: String,
	/// Optional. docling-serve runs without auth by default.
	pub api_key: Option<String>,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Ingestion {
	#[serde(default = "default_documents_dir")]
	pub documents_dir: String,
	#[serde(default = "default_supported_extensions")]
	pub supported_extensions: Vec<String>,
}
impl Default for Ingestion {
	fn default() -> Self {
		Self {
			documents_dir: default_documents_dir(),
			supported_extensions: default_supported_extensions(),
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct Retrieval {
	#[serde(default = "default_max_results")]
	pub max_results: u32,
	#[serde(default = "default_min_score")]
	pub min_score: f32,
}
impl Default for Retrieval {
	fn default() -> Self {
		Self { max_results: default_max_results(), min_score: default_min_score() }
	}
}

#[derive(Debug, Deserialize)]
pub struct Context {
	/// Ordered allow-list of metadata keys rendered into each context block.
	#[serde(default = "default_metadata_keys")]
	pub metadata_keys: Vec<String>,
	/// Optional. Must contain both `{{userMessage}}` and `{{contents}}`.
	pub prompt_template: Option<String>,
}
impl Default for Context {
	fn default() -> Self {
		Self { metadata_keys: default_metadata_keys(), prompt_template: None }
	}
}

fn default_chunking_path() -> String {
	"/v1/chunk/hybrid/file".to_string()
}

fn default_documents_dir() -> String {
	"documents".to_string()
}

fn default_supported_extensions() -> Vec<String> {
	vec![".pdf".to_string(), ".docx".to_string(), ".html".to_string()]
}

fn default_max_results() -> u32 {
	5
}

fn default_min_score() -> f32 {
	0.7
}

fn default_metadata_keys() -> Vec<String> {
	MetadataKey::ALL.iter().map(|key| key.as_str().to_string()).collect()
}
