//! Channel filtering for the dashboard tabs

use crate::types::CampaignRecord;

/// Normalize a channel name for comparison (trim + lowercase).
/// Feeds are inconsistent about casing ("Facebook" vs "facebook").
pub fn normalize_source(source: &str) -> String {
    source.trim().to_lowercase()
}

/// Selects the active subset of records for a channel tab
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceFilter {
    /// All channels (the consolidated view)
    #[default]
    All,
    /// A single channel, held in normalized form
    Only(String),
}

impl SourceFilter {
    pub fn only(source: &str) -> Self {
        Self::Only(normalize_source(source))
    }

    pub fn matches(&self, record: &CampaignRecord) -> bool {
        match self {
            Self::All => true,
            Self::Only(name) => normalize_source(&record.source) == *name,
        }
    }

    /// Filtered copy of the records, preserving input order
    pub fn apply(&self, records: &[CampaignRecord]) -> Vec<CampaignRecord> {
        match self {
            Self::All => records.to_vec(),
            Self::Only(_) => records
                .iter()
                .filter(|r| self.matches(r))
                .cloned()
                .collect(),
        }
    }
}
