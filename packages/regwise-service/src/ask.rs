use serde::{Deserialize, Serialize};

use crate::{Error, RegService, Result, SourceRef};
use regwise_domain::prompt::SYSTEM_PROMPT;
use regwise_providers::chat;

pub const BLANK_QUESTION_MESSAGE: &str = "Please provide a question about regulatory changes.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
	pub answer: String,
	pub grounded: bool,
	pub sources: Vec<SourceRef>,
}

impl RegService {
	pub async fn ask(&self, question: &str) -> Result<Answer> {
		if question.trim().is_empty() {
			return Err(Error::InvalidRequest { message: BLANK_QUESTION_MESSAGE.to_string() });
		}

		let augmented = self.augment(question).await?;
		let messages =
			[chat::message("system", SYSTEM_PROMPT), chat::message("user", &augmented.prompt)];
		let answer = self
			.providers
			.chat
			.complete(&self.cfg.providers.chat, &messages)
			.await
			.map_err(|err| Error::Provider { message: err.to_string() })?;

		tracing::info!(
			grounded = augmented.grounding.is_grounded(),
			sources = augmented.grounding.segments().len(),
			"Answered question."
		);

		Ok(Answer {
			answer,
			grounded: augmented.grounding.is_grounded(),
			sources: augmented.grounding.sources(),
		})
	}
}
