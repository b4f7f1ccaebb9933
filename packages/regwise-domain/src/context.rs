//! Renders enriched segments into numbered, citable context blocks.
//!
//! Each block carries a header with its 1-based position, an optional document-identity
//! section, the untouched segment text, and an optional retrieval-provenance section. Blocks are
//! joined by a blank-line-delimited rule of 80 `=` characters.

use std::fmt;

use crate::{
	document::DocumentMetadata,
	provenance::{EnrichedSegment, Provenance},
};

pub const BLOCK_SEPARATOR: &str =
	"\n\n================================================================================\n\n";

const DOCUMENT_KEYS: [MetadataKey; 4] =
	[MetadataKey::DocId, MetadataKey::FileName, MetadataKey::PageNumber, MetadataKey::DocumentType];
const RETRIEVAL_KEYS: [MetadataKey; 3] =
	[MetadataKey::RetrievalMethod, MetadataKey::SimilarityScore, MetadataKey::RetrievalTimestamp];

type BlockRenderer = fn(usize, &EnrichedSegment, MetadataKeys) -> String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataKey {
	DocId,
	PageNumber,
	DocumentType,
	FileName,
	RetrievalMethod,
	SimilarityScore,
	RetrievalTimestamp,
}
impl MetadataKey {
	pub const ALL: [Self; 7] = [
		Self::DocId,
		Self::PageNumber,
		Self::DocumentType,
		Self::FileName,
		Self::RetrievalMethod,
		Self::SimilarityScore,
		Self::RetrievalTimestamp,
	];

	pub fn parse(raw: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|key| key.as_str() == raw)
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::DocId => "doc_id",
			Self::PageNumber => "page_number",
			Self::DocumentType => "document_type",
			Self::FileName => "file_name",
			Self::RetrievalMethod => "retrieval_method",
			Self::SimilarityScore => "similarity_score",
			Self::RetrievalTimestamp => "retrieval_timestamp",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::DocId => "Document ID",
			Self::PageNumber => "Page",
			Self::DocumentType => "Type",
			Self::FileName => "File Name",
			Self::RetrievalMethod => "Method",
			Self::SimilarityScore => "Similarity Score",
			Self::RetrievalTimestamp => "Retrieved At",
		}
	}

	fn bit(self) -> u8 {
		1 << (self as u8)
	}
}

impl fmt::Display for MetadataKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMetadataKey(pub String);

impl fmt::Display for UnknownMetadataKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Unknown metadata key {:?}.", self.0)
	}
}

impl std::error::Error for UnknownMetadataKey {}

/// Allow-list of metadata keys surfaced by the formatter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetadataKeys {
	bits: u8,
}
impl MetadataKeys {
	pub fn all() -> Self {
		MetadataKey::ALL.into_iter().fold(Self::default(), Self::with)
	}

	pub fn from_names<S>(names: &[S]) -> Result<Self, UnknownMetadataKey>
	where
		S: AsRef<str>,
	{
		names.iter().try_fold(Self::default(), |keys, name| {
			let name = name.as_ref();

			MetadataKey::parse(name)
				.map(|key| keys.with(key))
				.ok_or_else(|| UnknownMetadataKey(name.to_string()))
		})
	}

	pub fn with(self, key: MetadataKey) -> Self {
		Self { bits: self.bits | key.bit() }
	}

	pub fn without(self, key: MetadataKey) -> Self {
		Self { bits: self.bits & !key.bit() }
	}

	pub fn contains(self, key: MetadataKey) -> bool {
		self.bits & key.bit() != 0
	}

	pub fn is_empty(self) -> bool {
		self.bits == 0
	}
}

/// Formatter assembled from the block renderer matching its allow-list.
#[derive(Clone, Copy)]
pub struct ContextFormatter {
	keys: MetadataKeys,
	render: BlockRenderer,
}
impl ContextFormatter {
	pub fn new(keys: MetadataKeys) -> Self {
		let render: BlockRenderer =
			if keys.is_empty() { render_plain_block } else { render_annotated_block };

		Self { keys, render }
	}

	/// Empty input renders as the empty string.
	pub fn format(&self, segments: &[EnrichedSegment]) -> String {
		segments
			.iter()
			.enumerate()
			.map(|(index, segment)| (self.render)(index + 1, segment, self.keys))
			.collect::<Vec<_>>()
			.join(BLOCK_SEPARATOR)
	}
}

impl fmt::Debug for ContextFormatter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContextFormatter").field("keys", &self.keys).finish_non_exhaustive()
	}
}

pub fn format_context(segments: &[EnrichedSegment], keys: MetadataKeys) -> String {
	ContextFormatter::new(keys).format(segments)
}

pub fn render_document_info(metadata: &DocumentMetadata, keys: MetadataKeys) -> Option<String> {
	let lines = DOCUMENT_KEYS
		.into_iter()
		.filter(|key| keys.contains(*key))
		.filter_map(|key| {
			let value = match key {
				MetadataKey::DocId => metadata.doc_id.clone(),
				MetadataKey::FileName => metadata.file_name.clone(),
				MetadataKey::PageNumber => metadata.page_number.map(|page| page.to_string()),
				MetadataKey::DocumentType => metadata.document_type.map(|ty| ty.to_string()),
				MetadataKey::RetrievalMethod
				| MetadataKey::SimilarityScore
				| MetadataKey::RetrievalTimestamp => None,
			}?;

			Some(labelled(key, &value))
		})
		.collect::<Vec<_>>();

	join_lines(lines)
}

pub fn render_retrieval_info(provenance: &Provenance, keys: MetadataKeys) -> Option<String> {
	let lines = RETRIEVAL_KEYS
		.into_iter()
		.filter(|key| keys.contains(*key))
		.filter_map(|key| {
			let value = match key {
				MetadataKey::RetrievalMethod => provenance.retrieval_method.as_str(),
				MetadataKey::SimilarityScore => provenance.similarity_score.as_str(),
				MetadataKey::RetrievalTimestamp => provenance.retrieval_timestamp.as_str(),
				MetadataKey::DocId
				| MetadataKey::PageNumber
				| MetadataKey::DocumentType
				| MetadataKey::FileName => return None,
			};

			Some(labelled(key, value))
		})
		.collect::<Vec<_>>();

	join_lines(lines)
}

pub fn render_annotated_block(
	sequence: usize,
	segment: &EnrichedSegment,
	keys: MetadataKeys,
) -> String {
	let mut block = header(sequence);

	block.push('\n');

	if let Some(document) = render_document_info(segment.metadata(), keys) {
		block.push_str("Document Information:\n");
		block.push_str(&document);
		block.push('\n');
	}

	block.push_str("\nContent:\n");
	block.push_str(segment.text());

	if let Some(retrieval) = render_retrieval_info(&segment.provenance, keys) {
		block.push_str("\n\nRetrieval Information:\n");
		block.push_str(&retrieval);
	}

	block
}

pub fn render_plain_block(
	sequence: usize,
	segment: &EnrichedSegment,
	_keys: MetadataKeys,
) -> String {
	format!("{}\n{}", header(sequence), segment.text())
}

fn header(sequence: usize) -> String {
	format!("--- Content Block {sequence} ---")
}

fn labelled(key: MetadataKey, value: &str) -> String {
	format!("  {}: {value}", key.label())
}

fn join_lines(lines: Vec<String>) -> Option<String> {
	if lines.is_empty() { None } else { Some(lines.join("\n")) }
}
