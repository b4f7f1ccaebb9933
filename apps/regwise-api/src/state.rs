use std::{path::Path, sync::Arc};

use regwise_service::{IngestReport, RegService};
use regwise_storage::qdrant::QdrantStore;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<RegService>,
	/// Outcome of the startup load. `None` when the server started without ingesting.
	pub ingest_report: Option<Arc<IngestReport>>,
}
impl AppState {
	/// Connects to Qdrant, makes sure the collection exists and, when `ingest` is set, loads the
	/// documents directory once before returning.
	pub async fn new(config: regwise_config::Config, ingest: bool) -> color_eyre::Result<Self> {
		let store = QdrantStore::new(&config.storage.qdrant)?;

		store.ensure_collection().await?;

		let service = RegService::new(config, Arc::new(store))?;

		Ok(Self::from_service(service).bootstrap(ingest).await)
	}

	pub fn from_service(service: RegService) -> Self {
		Self { service: Arc::new(service), ingest_report: None }
	}

	/// Runs the startup load when `ingest` is set and keeps its report on the state.
	pub async fn bootstrap(mut self, ingest: bool) -> Self {
		if !ingest {
			tracing::info!("Skipping document ingestion at startup.");

			return self;
		}

		let report = self.ingest().await;

		for failure in &report.failures {
			tracing::warn!(
				file_name = %failure.file_name,
				error = %failure.message,
				"Serving without a document that failed to load."
			);
		}

		self.ingest_report = Some(Arc::new(report));

		self
	}

	pub async fn ingest(&self) -> IngestReport {
		let dir = Path::new(&self.service.cfg.ingestion.documents_dir);

		self.service.ingest_documents(dir).await
	}
}
