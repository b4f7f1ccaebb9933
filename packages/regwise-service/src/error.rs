pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Configuration error: {message}")]
	Config { message: String },
	#[error("Failed to ingest {file_name}: {message}")]
	Ingestion { file_name: String, message: String },
	#[error("Retrieval error: {message}")]
	Retrieval { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<regwise_storage::Error> for Error {
	fn from(err: regwise_storage::Error) -> Self {
		match err {
			regwise_storage::Error::InvalidArgument(message) => Self::Storage { message },
			regwise_storage::Error::Qdrant(inner) => Self::Storage { message: inner.to_string() },
		}
	}
}

impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
