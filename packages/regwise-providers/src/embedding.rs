//! OpenAI-compatible embeddings client.
//!
//! The response must hold exactly one vector per input text, each at its own `index` and each
//! of the configured dimension. Anything else is rejected before a vector reaches the store.

use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

pub async fn embed(
	cfg: &regwise_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	if texts.is_empty() {
		return Ok(Vec::new());
	}

	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(format!("{}{}", cfg.api_base, cfg.path))
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_embedding_response(&json, texts.len(), cfg.dimensions)
}

/// Places every returned vector at its `index`, so the output lines up with the request input.
fn parse_embedding_response(
	json: &Value,
	inputs: usize,
	dimensions: u32,
) -> Result<Vec<Vec<f32>>> {
	let data = json
		.get("data")
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Embedding response is missing data array."))?;

	if data.len() != inputs {
		return Err(eyre::eyre!(
			"Embedding response holds {} vectors for {} inputs.",
			data.len(),
			inputs
		));
	}

	let mut slots: Vec<Option<Vec<f32>>> = vec![None; inputs];

	for item in data {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.and_then(|v| usize::try_from(v).ok())
			.ok_or_else(|| eyre::eyre!("Embedding item is missing a non-negative index."))?;
		let slot = slots.get_mut(index).ok_or_else(|| {
			eyre::eyre!("Embedding index {index} is out of range for {inputs} inputs.")
		})?;

		if slot.is_some() {
			return Err(eyre::eyre!("Embedding index {index} appears more than once."));
		}

		*slot = Some(parse_vector(item, index, dimensions)?);
	}

	slots
		.into_iter()
		.collect::<Option<Vec<_>>>()
		.ok_or_else(|| eyre::eyre!("Embedding response left an input without a vector."))
}

fn parse_vector(item: &Value, index: usize, dimensions: u32) -> Result<Vec<f32>> {
	let values = item
		.get("embedding")
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Embedding item {index} is missing its embedding array."))?;

	if values.len() != dimensions as usize {
		return Err(eyre::eyre!(
			"Embedding {index} has dimension {}, expected {dimensions}.",
			values.len()
		));
	}

	values
		.iter()
		.map(|value| {
			value
				.as_f64()
				.map(|number| number as f32)
				.ok_or_else(|| eyre::eyre!("Embedding {index} holds a non-numeric value."))
		})
		.collect()
}
