use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

use crate::document::DocumentMetadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMethod {
	VectorSearch,
}
impl RetrievalMethod {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::VectorSearch => "vector_search",
		}
	}
}

/// One stored entry returned by a similarity search, with its score in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalMatch {
	pub text: String,
	pub metadata: DocumentMetadata,
	pub score: f32,
}

/// How and when a segment was retrieved. Kept apart from the stored document metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
	pub retrieval_method: RetrievalMethod,
	pub similarity_score: String,
	pub retrieval_timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSegment {
	pub matched: RetrievalMatch,
	pub provenance: Provenance,
}
impl EnrichedSegment {
	pub fn text(&self) -> &str {
		&self.matched.text
	}

	pub fn metadata(&self) -> &DocumentMetadata {
		&self.matched.metadata
	}
}

/// Layers retrieval provenance over a match, stamped with `now`.
pub fn enrich(matched: RetrievalMatch, now: OffsetDateTime) -> EnrichedSegment {
	let provenance = Provenance {
		retrieval_method: RetrievalMethod::VectorSearch,
		similarity_score: matched.score.to_string(),
		retrieval_timestamp: format_timestamp(now),
	};

	EnrichedSegment { matched, provenance }
}

fn format_timestamp(at: OffsetDateTime) -> String {
	let utc = at.to_offset(UtcOffset::UTC);

	utc.format(&Rfc3339).unwrap_or_else(|_| utc.to_string())
}
