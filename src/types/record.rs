//! Campaign performance data types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of campaign performance data: a single channel's results for one
/// calendar day. Records are produced by a feed and consumed read-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignRecord {
    pub date: NaiveDate,
    pub campaign: String,
    pub source: String,
    /// Sub-channel placement (e.g. "Feed", "Stories"); only present for
    /// channels that report it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<String>,
    #[serde(default)]
    pub contacts: u64,
    #[serde(default)]
    pub qualified: u64,
    #[serde(default)]
    pub disqualified: u64,
    #[serde(default)]
    pub cost: f64,
    /// Cost per lead as reported by the feed
    #[serde(default)]
    pub cpl: f64,
}

impl CampaignRecord {
    /// Cost per lead derived from this record's own cost and contacts.
    /// Returns 0 when the record has no contacts.
    pub fn cost_per_lead(&self) -> f64 {
        if self.contacts > 0 {
            self.cost / self.contacts as f64
        } else {
            0.0
        }
    }

    /// Whether `qualified + disqualified <= contacts` holds. Feeds are
    /// expected to satisfy this but nothing downstream depends on it.
    pub fn lead_counts_consistent(&self) -> bool {
        self.qualified.saturating_add(self.disqualified) <= self.contacts
    }
}

/// Inclusive calendar date range for fetching and reporting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range covering the `days` days ending at `end` (inclusive)
    pub fn last_days(end: NaiveDate, days: i64) -> Self {
        Self {
            start: end - chrono::Duration::days(days.saturating_sub(1).max(0)),
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered (1 for a single-day range)
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Iterate every date in the range, ascending
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }
}

/// Time bucketing level for the period roll-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationLevel {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl AggregationLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }

    pub fn period_column_label(self) -> &'static str {
        match self {
            Self::Daily => "Date",
            Self::Weekly => "Week",
            Self::Monthly => "Month",
        }
    }

    /// Default level for a range of the given span: long ranges coarsen
    /// so the timeline stays readable (>180 days monthly, >60 weekly).
    pub fn for_span_days(days: i64) -> Self {
        if days > 180 {
            Self::Monthly
        } else if days > 60 {
            Self::Weekly
        } else {
            Self::Daily
        }
    }
}

/// Sums of the numeric record fields for all records sharing a period key.
/// Ephemeral: rebuilt on every aggregation pass, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodBucket {
    pub period: NaiveDate,
    pub contacts: u64,
    pub qualified: u64,
    pub disqualified: u64,
    pub cost: f64,
}

impl PeriodBucket {
    pub fn new(period: NaiveDate) -> Self {
        Self {
            period,
            contacts: 0,
            qualified: 0,
            disqualified: 0,
            cost: 0.0,
        }
    }

    /// Add a record's numeric fields into this bucket
    pub fn add(&mut self, record: &CampaignRecord) {
        self.contacts = self.contacts.saturating_add(record.contacts);
        self.qualified = self.qualified.saturating_add(record.qualified);
        self.disqualified = self.disqualified.saturating_add(record.disqualified);
        self.cost += record.cost;
    }

    /// Cost per lead for the bucket as a whole (0 when empty of contacts)
    pub fn cost_per_lead(&self) -> f64 {
        if self.contacts > 0 {
            self.cost / self.contacts as f64
        } else {
            0.0
        }
    }
}

/// One slice of a categorical breakdown (e.g. contacts per source)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreakdownSlice {
    pub name: String,
    pub value: u64,
}

/// Scalar metrics derived from a (filtered) record set
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct SummaryMetrics {
    pub total_contacts: u64,
    pub total_qualified: u64,
    pub total_disqualified: u64,
    /// Contacts on the evaluation date only; time-sensitive, so live views
    /// recompute it whenever they rebuild
    pub contacts_today: u64,
    pub total_cost: f64,
    /// Cost-weighted: total cost over total contacts, not the mean of
    /// per-record CPL values
    pub avg_cpl: f64,
    /// Percentage of contacts marked qualified (0-100)
    pub qualification_rate: f64,
}
