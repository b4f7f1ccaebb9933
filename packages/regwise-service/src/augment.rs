use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{RegService, Result};
use regwise_domain::provenance::{self, EnrichedSegment};

/// Outcome of grounding a query against the store.
///
/// `Empty` means nothing cleared the score threshold. Failures to reach the store are errors
/// instead, so callers can tell "no relevant information" apart from "could not look".
#[derive(Debug, Clone, PartialEq)]
pub enum Grounding {
	Empty,
	Found(Vec<EnrichedSegment>),
}
impl Grounding {
	pub fn segments(&self) -> &[EnrichedSegment] {
		match self {
			Self::Empty => &[],
			Self::Found(segments) => segments,
		}
	}

	pub fn is_grounded(&self) -> bool {
		matches!(self, Self::Found(segments) if !segments.is_empty())
	}

	pub fn sources(&self) -> Vec<SourceRef> {
		self.segments().iter().map(SourceRef::from).collect()
	}
}

/// Citation handle for one grounding segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
	pub doc_id: Option<String>,
	pub page_number: Option<u32>,
	pub score: f32,
}
impl From<&EnrichedSegment> for SourceRef {
	fn from(segment: &EnrichedSegment) -> Self {
		let metadata = segment.metadata();

		Self {
			doc_id: metadata.doc_id.clone(),
			page_number: metadata.page_number,
			score: segment.matched.score,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedPrompt {
	pub prompt: String,
	pub context: String,
	pub grounding: Grounding,
}

impl RegService {
	/// Retrieves matches for `query` and stamps each one with retrieval provenance.
	pub async fn ground(&self, query: &str) -> Result<Grounding> {
		let matches = self.retrieve(query).await?;

		if matches.is_empty() {
			return Ok(Grounding::Empty);
		}

		let segments = matches
			.into_iter()
			.map(|matched| provenance::enrich(matched, OffsetDateTime::now_utc()))
			.collect();

		Ok(Grounding::Found(segments))
	}

	/// Grounds the question and renders it into the prompt template.
	pub async fn augment(&self, question: &str) -> Result<AugmentedPrompt> {
		let grounding = self.ground(question).await?;
		let context = self.formatter().format(grounding.segments());
		let prompt = self.template().render(question, &context);

		Ok(AugmentedPrompt { prompt, context, grounding })
	}
}
