mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	ChunkingProviderConfig, Config, Context, EmbeddingProviderConfig, Ingestion, LlmProviderConfig,
	Providers, Qdrant, Retrieval, Service, Storage,
};

use std::{collections::HashSet, fs, path::Path};

use regwise_domain::{
	context::MetadataKey,
	prompt::{CONTENTS_PLACEHOLDER, USER_MESSAGE_PLACEHOLDER},
};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}

	for (label, key) in
		[("embedding", &cfg.providers.embedding.api_key), ("chat", &cfg.providers.chat.api_key)]
	{
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	if cfg.retrieval.max_results == 0 {
		return Err(Error::Validation {
			message: "retrieval.max_results must be greater than zero.".to_string(),
		});
	}
	if !cfg.retrieval.min_score.is_finite() {
		return Err(Error::Validation {
			message: "retrieval.min_score must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.retrieval.min_score) {
		return Err(Error::Validation {
			message: "retrieval.min_score must be in the range 0.0-1.0.".to_string(),
		});
	}
	if cfg.ingestion.supported_extensions.is_empty() {
		return Err(Error::Validation {
			message: "ingestion.supported_extensions must be non-empty.".to_string(),
		});
	}

	let mut seen = HashSet::new();

	for key in &cfg.context.metadata_keys {
		if MetadataKey::parse(key).is_none() {
			return Err(Error::Validation {
				message: format!(
					"context.metadata_keys contains unknown key {key:?}; expected one of {}.",
					MetadataKey::ALL.map(MetadataKey::as_str).join(", ")
				),
			});
		}
		if !seen.insert(key.as_str()) {
			return Err(Error::Validation {
				message: format!("context.metadata_keys lists {key:?} more than once."),
			});
		}
	}

	if let Some(template) = cfg.context.prompt_template.as_deref()
		&& !(template.contains(USER_MESSAGE_PLACEHOLDER) && template.contains(CONTENTS_PLACEHOLDER))
	{
		return Err(Error::Validation {
			message: format!(
				"context.prompt_template must contain both {USER_MESSAGE_PLACEHOLDER} and {CONTENTS_PLACEHOLDER}."
			),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.providers.chunking.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false)
	{
		cfg.providers.chunking.api_key = None;
	}
	if cfg
		.context
		.prompt_template
		.as_deref()
		.map(|template| template.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.context.prompt_template = None;
	}

	cfg.ingestion.supported_extensions = cfg
		.ingestion
		.supported_extensions
		.iter()
		.map(|ext| ext.trim().to_ascii_lowercase())
		.filter(|ext| !ext.is_empty() && ext != ".")
		.map(|ext| if ext.starts_with('.') { ext } else { format!(".{ext}") })
		.collect();
}
