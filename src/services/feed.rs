//! Campaign record feeds
//!
//! The mock feed stands in for the ad-platform reporting backend. In a real
//! deployment it would be replaced by an API-backed implementation of
//! `RecordFeed` (e.g. reading the agency's Google Sheets export).

use crate::types::{CampaignRecord, DateRange, Result};
use chrono::Datelike;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Channels the mock feed reports on
const SOURCES: &[&str] = &["Facebook", "Instagram", "Google"];

/// Placements reported by Meta channels; Google rows carry none
const META_PLACEMENTS: &[&str] = &["Feed", "Stories", "Reels"];

/// Campaign names as they appear in the client's account
const CAMPAIGNS: &[&str] = &[
    "Campanha de Verão",
    "Promoção de Inverno",
    "Leads Qualificados",
];

/// A source of campaign performance records for a date range.
/// Both range endpoints are inclusive.
pub trait RecordFeed {
    /// Feed name for diagnostics
    fn name(&self) -> &str;

    /// Fetch all records dated within the range
    fn fetch(&self, range: &DateRange) -> Result<Vec<CampaignRecord>>;
}

/// Mock feed generating plausible campaign data for any range
pub struct MockFeed {
    seed: u64,
}

impl MockFeed {
    pub fn new() -> Self {
        Self {
            seed: rand::random(),
        }
    }

    /// Fixed-seed feed: identical ranges yield identical records
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    fn generate_day(&self, rng: &mut StdRng, date: chrono::NaiveDate) -> Vec<CampaignRecord> {
        let rows = rng.gen_range(1..=3);
        (0..rows)
            .map(|_| {
                let source = SOURCES[rng.gen_range(0..SOURCES.len())];
                let campaign = CAMPAIGNS[rng.gen_range(0..CAMPAIGNS.len())];
                let contacts: u64 = rng.gen_range(10..60);
                // 40-80% of contacts qualify; the rest are disqualified, so
                // qualified + disqualified == contacts always holds here
                let qualified = (contacts as f64 * rng.gen_range(0.4..0.8)).floor() as u64;
                let disqualified = contacts - qualified;
                let cost: f64 = rng.gen_range(50.0..150.0);
                let placement = if source == "Google" {
                    None
                } else {
                    Some(META_PLACEMENTS[rng.gen_range(0..META_PLACEMENTS.len())].to_string())
                };

                CampaignRecord {
                    date,
                    campaign: campaign.to_string(),
                    source: source.to_string(),
                    placement,
                    contacts,
                    qualified,
                    disqualified,
                    cost,
                    cpl: cost / contacts as f64,
                }
            })
            .collect()
    }
}

impl RecordFeed for MockFeed {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch(&self, range: &DateRange) -> Result<Vec<CampaignRecord>> {
        // Seed combines the feed seed with the range start so different
        // ranges don't replay the same sequence
        let day_seed = self
            .seed
            .wrapping_add(range.start.num_days_from_ce() as u64);
        let mut rng = StdRng::seed_from_u64(day_seed);

        let mut records = Vec::new();
        for date in range.iter_days() {
            records.extend(self.generate_day(&mut rng, date));
        }
        Ok(records)
    }
}

impl Default for MockFeed {
    fn default() -> Self {
        Self::new()
    }
}
