pub mod ask;
pub mod augment;
pub mod index;
pub mod ingest;
pub mod retrieve;

mod error;

pub use ask::{Answer, BLANK_QUESTION_MESSAGE};
pub use augment::{AugmentedPrompt, Grounding, SourceRef};
pub use error::{Error, Result};
pub use index::IndexReport;
pub use ingest::{IngestFailure, IngestOutcome, IngestReport};

use std::{future::Future, path::Path, pin::Pin, sync::Arc};

use serde_json::Value;

use regwise_config::{ChunkingProviderConfig, Config, EmbeddingProviderConfig, LlmProviderConfig};
use regwise_domain::{
	context::{ContextFormatter, MetadataKeys},
	page::{Chunk, PageUnit},
	prompt::PromptTemplate,
	provenance::RetrievalMatch,
};
use regwise_providers::{chat, chunking, embedding};
use regwise_storage::qdrant::QdrantStore;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait DocumentChunker
where
	Self: Send + Sync,
{
	fn chunk<'a>(
		&'a self,
		cfg: &'a ChunkingProviderConfig,
		path: &'a Path,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Chunk>>>;
}

pub trait ChatProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

/// Append-only store of embedded page units.
pub trait VectorStore
where
	Self: Send + Sync,
{
	fn add_entry<'a>(
		&'a self,
		vector: Vec<f32>,
		unit: &'a PageUnit,
	) -> BoxFuture<'a, regwise_storage::Result<()>>;

	/// Returns at most `max_results` matches scoring at least `min_score`, best first.
	fn search<'a>(
		&'a self,
		vector: Vec<f32>,
		max_results: u32,
		min_score: f32,
	) -> BoxFuture<'a, regwise_storage::Result<Vec<RetrievalMatch>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub chunker: Arc<dyn DocumentChunker>,
	pub chat: Arc<dyn ChatProvider>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		chunker: Arc<dyn DocumentChunker>,
		chat: Arc<dyn ChatProvider>,
	) -> Self {
		Self { embedding, chunker, chat }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), chunker: provider.clone(), chat: provider }
	}
}

pub struct RegService {
	pub cfg: Config,
	pub store: Arc<dyn VectorStore>,
	pub providers: Providers,
	formatter: ContextFormatter,
	template: PromptTemplate,
}
impl RegService {
	pub fn new(cfg: Config, store: Arc<dyn VectorStore>) -> Result<Self> {
		Self::with_providers(cfg, store, Providers::default())
	}

	pub fn with_providers(
		cfg: Config,
		store: Arc<dyn VectorStore>,
		providers: Providers,
	) -> Result<Self> {
		let keys = MetadataKeys::from_names(cfg.context.metadata_keys.as_slice())
			.map_err(|err| Error::Config { message: err.to_string() })?;
		let template = cfg
			.context
			.prompt_template
			.as_deref()
			.map(PromptTemplate::new)
			.unwrap_or_default();

		Ok(Self { cfg, store, providers, formatter: ContextFormatter::new(keys), template })
	}

	pub fn formatter(&self) -> &ContextFormatter {
		&self.formatter
	}

	pub fn template(&self) -> &PromptTemplate {
		&self.template
	}

	/// Embeds one text and checks the vector against the store's dimension.
	pub(crate) async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
		let embeddings =
			self.providers.embedding.embed(&self.cfg.providers.embedding, &[text.to_string()]).await?;
		let Some(vector) = embeddings.into_iter().next() else {
			return Err(Error::Provider {
				message: "Embedding provider returned no vectors.".to_string(),
			});
		};

		if vector.len() != self.cfg.storage.qdrant.vector_dim as usize {
			return Err(Error::Provider {
				message: format!(
					"Embedding vector dimension mismatch: expected {}, got {}.",
					self.cfg.storage.qdrant.vector_dim,
					vector.len()
				),
			});
		}

		Ok(vector)
	}
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl DocumentChunker for DefaultProviders {
	fn chunk<'a>(
		&'a self,
		cfg: &'a ChunkingProviderConfig,
		path: &'a Path,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Chunk>>> {
		Box::pin(chunking::chunk_file(cfg, path))
	}
}

impl ChatProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(chat::complete(cfg, messages))
	}
}

impl VectorStore for QdrantStore {
	fn add_entry<'a>(
		&'a self,
		vector: Vec<f32>,
		unit: &'a PageUnit,
	) -> BoxFuture<'a, regwise_storage::Result<()>> {
		Box::pin(QdrantStore::add_entry(self, vector, unit))
	}

	fn search<'a>(
		&'a self,
		vector: Vec<f32>,
		max_results: u32,
		min_score: f32,
	) -> BoxFuture<'a, regwise_storage::Result<Vec<RetrievalMatch>>> {
		Box::pin(QdrantStore::search(self, vector, max_results, min_score))
	}
}
