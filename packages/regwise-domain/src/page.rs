//! Per-page aggregation of extracted document chunks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{DocumentMetadata, DocumentType};

/// Page that receives every chunk carrying no usable page attribution.
pub const FALLBACK_PAGE: u32 = 1;

const CHUNK_SEPARATOR: &str = "\n\n";

/// Text fragment produced by the document conversion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
	pub text: String,
	#[serde(default)]
	pub page_numbers: Vec<u32>,
}
impl Chunk {
	pub fn new(text: impl Into<String>, page_numbers: Vec<u32>) -> Self {
		Self { text: text.into(), page_numbers }
	}
}

/// All text of one document page, ready to be embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageUnit {
	pub text: String,
	pub doc_id: String,
	pub file_name: String,
	pub document_type: DocumentType,
	pub page_number: u32,
}
impl PageUnit {
	pub fn metadata(&self) -> DocumentMetadata {
		DocumentMetadata::new(
			Some(self.doc_id.clone()),
			Some(self.file_name.clone()),
			Some(self.page_number),
			Some(self.document_type),
		)
	}
}

/// Groups chunks into one unit per page, in ascending page order.
///
/// A chunk tagged with several pages contributes its text to each of them. Chunks without page
/// numbers land on page 1, interleaved in original order with chunks explicitly tagged page 1
/// and with no marker between them. Page 0 is not a page; it folds into page 1 the same way, so
/// every emitted unit has a page number of at least 1.
pub fn aggregate_pages(file_name: &str, chunks: &[Chunk]) -> Vec<PageUnit> {
	let mut pages: BTreeMap<u32, String> = BTreeMap::new();

	for chunk in chunks {
		if chunk.page_numbers.is_empty() {
			append(&mut pages, FALLBACK_PAGE, &chunk.text);

			continue;
		}

		for page in &chunk.page_numbers {
			append(&mut pages, (*page).max(FALLBACK_PAGE), &chunk.text);
		}
	}

	let document_type = DocumentType::from_file_name(file_name);

	pages
		.into_iter()
		.map(|(page_number, buffer)| PageUnit {
			text: buffer.trim().to_string(),
			doc_id: file_name.to_string(),
			file_name: file_name.to_string(),
			document_type,
			page_number,
		})
		.collect()
}

fn append(pages: &mut BTreeMap<u32, String>, page: u32, text: &str) {
	let buffer = pages.entry(page).or_default();

	buffer.push_str(text);
	buffer.push_str(CHUNK_SEPARATOR);
}
