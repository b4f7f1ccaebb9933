use serde::Serialize;

use crate::{RegService, Result};
use regwise_domain::page::PageUnit;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexReport {
	pub indexed: usize,
	pub failed: usize,
}

impl RegService {
	/// Embeds and stores each unit in turn. A unit that fails is logged and counted; the remaining
	/// units are still attempted.
	pub async fn index_pages(&self, units: &[PageUnit]) -> IndexReport {
		let mut report = IndexReport::default();

		for unit in units {
			match self.index_unit(unit).await {
				Ok(()) => report.indexed += 1,
				Err(err) => {
					tracing::warn!(
						file_name = %unit.file_name,
						page = unit.page_number,
						error = %err,
						"Failed to index page."
					);

					report.failed += 1;
				},
			}
		}

		report
	}

	async fn index_unit(&self, unit: &PageUnit) -> Result<()> {
		let vector = self.embed_one(&unit.text).await?;

		self.store.add_entry(vector, unit).await?;

		Ok(())
	}
}
