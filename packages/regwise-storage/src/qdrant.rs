pub const DENSE_VECTOR_NAME: &str = "dense";

use std::collections::HashMap;

use qdrant_client::{
	client::Payload,
	qdrant::{
		CreateCollectionBuilder, Distance, PointStruct, Query, QueryPointsBuilder,
		UpsertPointsBuilder, Vector, VectorParamsBuilder, VectorsConfigBuilder,
	},
};
use uuid::Uuid;

use crate::{Error, Result, payload};
use regwise_domain::{page::PageUnit, provenance::RetrievalMatch};

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &regwise_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Creates the collection with a single named cosine vector unless it already exists.
	pub async fn ensure_collection(&self) -> Result<()> {
		if self.client.collection_exists(self.collection.clone()).await? {
			return Ok(());
		}

		let mut vectors_config = VectorsConfigBuilder::default();

		vectors_config.add_named_vector_params(
			DENSE_VECTOR_NAME,
			VectorParamsBuilder::new(self.vector_dim.into(), Distance::Cosine),
		);

		let builder =
			CreateCollectionBuilder::new(self.collection.clone()).vectors_config(vectors_config);

		self.client.create_collection(builder).await?;

		tracing::info!(
			collection = %self.collection,
			vector_dim = self.vector_dim,
			"Created Qdrant collection."
		);

		Ok(())
	}

	/// Appends one page unit under a fresh point id. Existing entries are never replaced.
	pub async fn add_entry(&self, vector: Vec<f32>, unit: &PageUnit) -> Result<()> {
		self.check_dim(&vector)?;

		let mut vector_map = HashMap::new();

		vector_map.insert(DENSE_VECTOR_NAME.to_string(), Vector::from(vector));

		let point = PointStruct::new(
			Uuid::new_v4().to_string(),
			vector_map,
			Payload::from(payload::entry_payload(unit)),
		);
		let upsert = UpsertPointsBuilder::new(self.collection.clone(), vec![point]).wait(true);

		self.client.upsert_points(upsert).await?;

		Ok(())
	}

	/// Nearest-neighbour search capped at `max_results`, keeping only scores at or above
	/// `min_score`.
	pub async fn search(
		&self,
		vector: Vec<f32>,
		max_results: u32,
		min_score: f32,
	) -> Result<Vec<RetrievalMatch>> {
		self.check_dim(&vector)?;

		let search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector))
			.using(DENSE_VECTOR_NAME)
			.limit(max_results as u64)
			.score_threshold(min_score)
			.with_payload(true);
		let response = self.client.query(search).await?;

		Ok(response.result.iter().map(payload::decode_match).collect())
	}

	fn check_dim(&self, vector: &[f32]) -> Result<()> {
		if vector.len() != self.vector_dim as usize {
			return Err(Error::InvalidArgument(format!(
				"Vector dimension mismatch: expected {}, got {}.",
				self.vector_dim,
				vector.len()
			)));
		}

		Ok(())
	}
}
