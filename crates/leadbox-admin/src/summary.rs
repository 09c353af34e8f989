//! Dashboard aggregates

use indexmap::IndexMap;
use leadbox_core::StoredLead;
use serde::Serialize;

/// Lead counts, overall and per service tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSummary {
	pub total: usize,
	/// Keyed by service tag in order of first appearance.
	pub by_service: IndexMap<String, usize>,
}

impl LeadSummary {
	pub fn from_leads(leads: &[StoredLead]) -> Self {
		let mut by_service = IndexMap::new();
		for lead in leads {
			*by_service.entry(lead.service.clone()).or_insert(0) += 1;
		}
		Self {
			total: leads.len(),
			by_service,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::Utc;
	use leadbox_core::NewLead;
	use rstest::*;
	use serde_json::json;

	#[fixture]
	fn leads() -> Vec<StoredLead> {
		[
			(1, "Waitlist"),
			(2, "Toolkit Download"),
			(3, "Waitlist"),
			(4, "Guide Request"),
		]
		.into_iter()
		.map(|(id, service)| {
			StoredLead::from_new(id, Utc::now(), NewLead::new("Jo", "jo@example.com", service))
		})
		.collect()
	}

	#[rstest]
	fn test_summary_counts(leads: Vec<StoredLead>) {
		let summary = LeadSummary::from_leads(&leads);

		assert_eq!(summary.total, 4);
		assert_eq!(
			serde_json::to_value(&summary).unwrap(),
			json!({"total": 4, "byService": {"Waitlist": 2, "Toolkit Download": 1, "Guide Request": 1}})
		);
		assert_eq!(summary.by_service.keys().next().map(String::as_str), Some("Waitlist"));
	}

	#[rstest]
	fn test_empty_summary() {
		assert_eq!(LeadSummary::from_leads(&[]), LeadSummary::default());
	}
}
