//! Client for docling-serve's hybrid chunker.
//!
//! The service converts a source file and returns its chunks, each tagged with the pages it was
//! extracted from when the format has pages.

use std::{path::Path, time::Duration};

use color_eyre::{Result, eyre};
use reqwest::{
	Client,
	header::AUTHORIZATION,
	multipart::{Form, Part},
};
use serde_json::Value;

use regwise_domain::page::Chunk;

pub async fn chunk_file(
	cfg: &regwise_config::ChunkingProviderConfig,
	path: &Path,
) -> Result<Vec<Chunk>> {
	let file_name = path
		.file_name()
		.and_then(|name| name.to_str())
		.ok_or_else(|| eyre::eyre!("Source path {path:?} has no usable file name."))?
		.to_string();
	let bytes = tokio::fs::read(path).await?;
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let form = Form::new()
		.part("files", Part::bytes(bytes).file_name(file_name))
		.text("convert_to_formats", "md");
	let mut headers = crate::default_header_map(&cfg.default_headers)?;

	if let Some(api_key) = cfg.api_key.as_deref() {
		headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);
	}

	let res = client.post(url).headers(headers).multipart(form).send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_chunk_response(json)
}

fn parse_chunk_response(json: Value) -> Result<Vec<Chunk>> {
	let chunks = json
		.get("chunks")
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Chunk response is missing chunks array."))?;

	chunks.iter().map(parse_chunk).collect()
}

fn parse_chunk(item: &Value) -> Result<Chunk> {
	let text = item
		.get("text")
		.and_then(|v| v.as_str())
		.ok_or_else(|| eyre::eyre!("Chunk item missing text."))?;
	let page_numbers = match item.get("page_numbers") {
		None | Some(Value::Null) => Vec::new(),
		Some(Value::Array(pages)) => pages
			.iter()
			.map(|page| {
				page.as_u64()
					.and_then(|page| u32::try_from(page).ok())
					.ok_or_else(|| eyre::eyre!("Chunk page numbers must be non-negative integers."))
			})
			.collect::<Result<Vec<_>>>()?,
		Some(_) => return Err(eyre::eyre!("Chunk page_numbers must be an array.")),
	};

	Ok(Chunk::new(text, page_numbers))
}
