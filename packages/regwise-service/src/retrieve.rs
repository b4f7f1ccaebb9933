use std::cmp::Ordering;

use crate::{Error, RegService, Result};
use regwise_domain::provenance::RetrievalMatch;

impl RegService {
	/// Embeds the query and returns the best stored matches, most similar first.
	///
	/// Blank queries must be rejected by the caller. An empty result means nothing cleared the
	/// score threshold and is not an error.
	pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievalMatch>> {
		let cfg = &self.cfg.retrieval;
		let vector = self
			.embed_one(query)
			.await
			.map_err(|err| Error::Retrieval { message: err.to_string() })?;
		let matches = self
			.store
			.search(vector, cfg.max_results, cfg.min_score)
			.await
			.map_err(|err| Error::Retrieval { message: err.to_string() })?;
		let matches = rank_matches(matches, cfg.max_results, cfg.min_score);

		tracing::debug!(matches = matches.len(), "Retrieved matches.");

		Ok(matches)
	}
}

/// Drops matches below `min_score`, orders the rest by descending score and keeps at most
/// `max_results`. Equal scores keep their store order.
pub fn rank_matches(
	mut matches: Vec<RetrievalMatch>,
	max_results: u32,
	min_score: f32,
) -> Vec<RetrievalMatch> {
	matches.retain(|matched| matched.score >= min_score);
	matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
	matches.truncate(max_results as usize);

	matches
}

#[cfg(test)]
mod tests {
	use super::*;
	use regwise_domain::document::DocumentMetadata;

	fn matched(text: &str, score: f32) -> RetrievalMatch {
		RetrievalMatch { text: text.to_string(), metadata: DocumentMetadata::default(), score }
	}

	fn texts(matches: &[RetrievalMatch]) -> Vec<&str> {
		matches.iter().map(|matched| matched.text.as_str()).collect()
	}

	#[test]
	fn filters_sorts_and_truncates() {
		let ranked = rank_matches(
			vec![matched("c", 0.65), matched("b", 0.72), matched("a", 0.91), matched("d", 0.80)],
			2,
			0.70,
		);

		assert_eq!(texts(&ranked), vec!["a", "d"]);
	}

	#[test]
	fn keeps_score_equal_to_threshold() {
		let ranked = rank_matches(vec![matched("edge", 0.70)], 5, 0.70);

		assert_eq!(texts(&ranked), vec!["edge"]);
	}

	#[test]
	fn ties_keep_store_order() {
		let ranked =
			rank_matches(vec![matched("first", 0.8), matched("second", 0.8), matched("top", 0.9)], 5, 0.0);

		assert_eq!(texts(&ranked), vec!["top", "first", "second"]);
	}

	#[test]
	fn nan_scores_never_pass_the_threshold() {
		let ranked = rank_matches(vec![matched("nan", f32::NAN), matched("ok", 0.75)], 5, 0.70);

		assert_eq!(texts(&ranked), vec!["ok"]);
	}
}
