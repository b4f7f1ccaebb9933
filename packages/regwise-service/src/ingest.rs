//! One-shot ingestion of a documents directory.
//!
//! Documents are processed one after another in file-name order. Each is chunked, aggregated into
//! page units and indexed before the next one starts, and a failing document never stops the run.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{Error, RegService, Result};
use regwise_domain::page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
	Indexed { pages: usize },
	/// The file's extension is not in the supported set.
	Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestFailure {
	pub file_name: String,
	pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
	pub succeeded: usize,
	pub failed: usize,
	pub skipped: usize,
	pub total_pages: usize,
	pub failures: Vec<IngestFailure>,
}

impl RegService {
	pub async fn ingest_documents(&self, dir: &Path) -> IngestReport {
		let mut report = IngestReport::default();
		let files = match list_files(dir).await {
			Ok(Some(files)) => files,
			Ok(None) => {
				tracing::warn!(dir = %dir.display(), "Documents directory not found.");

				return report;
			},
			Err(err) => {
				tracing::error!(dir = %dir.display(), error = %err, "Failed to list documents directory.");

				return report;
			},
		};

		for path in files {
			match self.ingest_file(&path).await {
				Ok(IngestOutcome::Indexed { pages }) => {
					report.succeeded += 1;
					report.total_pages += pages;
				},
				Ok(IngestOutcome::Skipped) => report.skipped += 1,
				Err(err) => {
					let (file_name, message) = match err {
						Error::Ingestion { file_name, message } => (file_name, message),
						other => (display_name(&path), other.to_string()),
					};

					tracing::error!(file_name = %file_name, error = %message, "Failed to process document.");

					report.failed += 1;
					report.failures.push(IngestFailure { file_name, message });
				},
			}
		}

		tracing::info!(
			succeeded = report.succeeded,
			failed = report.failed,
			skipped = report.skipped,
			total_pages = report.total_pages,
			"Document loading completed."
		);

		report
	}

	/// Chunks, aggregates and indexes one document.
	///
	/// Every page is attempted even after one fails; the document then counts as failed.
	pub async fn ingest_file(&self, path: &Path) -> Result<IngestOutcome> {
		let file_name = display_name(path);

		if !is_supported(&file_name, &self.cfg.ingestion.supported_extensions) {
			tracing::info!(file_name = %file_name, "Skipping unsupported file.");

			return Ok(IngestOutcome::Skipped);
		}

		tracing::info!(file_name = %file_name, "Processing document.");

		let chunks = self
			.providers
			.chunker
			.chunk(&self.cfg.providers.chunking, path)
			.await
			.map_err(|err| Error::Ingestion { file_name: file_name.clone(), message: err.to_string() })?;
		let units = page::aggregate_pages(&file_name, &chunks);
		let report = self.index_pages(&units).await;

		if report.failed > 0 {
			return Err(Error::Ingestion {
				file_name,
				message: format!("{} of {} pages failed to index.", report.failed, units.len()),
			});
		}

		tracing::info!(file_name = %file_name, pages = report.indexed, "Processed document.");

		Ok(IngestOutcome::Indexed { pages: report.indexed })
	}
}

/// Case-insensitive match of the text after the last dot. Names without a dot never match.
pub fn is_supported(file_name: &str, supported_extensions: &[String]) -> bool {
	let Some((_, extension)) = file_name.rsplit_once('.') else {
		return false;
	};
	let extension = format!(".{}", extension.to_ascii_lowercase());

	supported_extensions.iter().any(|supported| supported.eq_ignore_ascii_case(&extension))
}

/// Regular files directly under `dir`, sorted by file name. `None` when `dir` does not exist.
async fn list_files(dir: &Path) -> std::io::Result<Option<Vec<PathBuf>>> {
	if !tokio::fs::try_exists(dir).await? {
		return Ok(None);
	}

	let mut entries = tokio::fs::read_dir(dir).await?;
	let mut files = Vec::new();

	while let Some(entry) = entries.next_entry().await? {
		let path = entry.path();

		if tokio::fs::metadata(&path).await.map(|meta| meta.is_file()).unwrap_or(false) {
			files.push(path);
		}
	}

	files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

	Ok(Some(files))
}

fn display_name(path: &Path) -> String {
	path.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn supported() -> Vec<String> {
		vec![".pdf".to_string(), ".docx".to_string(), ".html".to_string()]
	}

	#[test]
	fn matches_extensions_case_insensitively() {
		assert!(is_supported("bulletin.PDF", &supported()));
		assert!(is_supported("notice.v2.Docx", &supported()));
		assert!(is_supported("circular.html", &supported()));
	}

	#[test]
	fn rejects_unknown_and_missing_extensions() {
		assert!(!is_supported("notes.txt", &supported()));
		assert!(!is_supported("README", &supported()));
		assert!(!is_supported("archive.pdf.zip", &supported()));
		assert!(!is_supported("page.htm", &supported()));
	}
}
