//! Aggregation engine for time-bucketed roll-ups and summary metrics

use crate::types::{AggregationLevel, CampaignRecord, PeriodBucket, SummaryMetrics};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashMap;

/// Aggregator for campaign record roll-ups
pub struct Aggregator;

impl Aggregator {
    /// Compute the bucket key for a date at the given level.
    ///
    /// Weekly buckets start on Sunday. The key is derived from the record's
    /// own date, so a week spanning two months keys to its Sunday even when
    /// that Sunday falls in the prior month.
    pub fn period_key(date: NaiveDate, level: AggregationLevel) -> NaiveDate {
        match level {
            AggregationLevel::Daily => date,
            AggregationLevel::Weekly => {
                date - Duration::days(date.weekday().num_days_from_sunday() as i64)
            }
            AggregationLevel::Monthly => date.with_day(1).expect("day 1 exists in every month"),
        }
    }

    /// Group records into period buckets, summing the numeric fields
    /// (sorted by period ascending)
    pub fn bucketize(records: &[CampaignRecord], level: AggregationLevel) -> Vec<PeriodBucket> {
        if records.is_empty() {
            return Vec::new();
        }

        let mut buckets: HashMap<NaiveDate, PeriodBucket> = HashMap::new();

        for record in records {
            let period = Self::period_key(record.date, level);
            buckets
                .entry(period)
                .or_insert_with(|| PeriodBucket::new(period))
                .add(record);
        }

        // Sort by period ascending (NaiveDate ordering, never lexicographic)
        let mut result: Vec<PeriodBucket> = buckets.into_values().collect();
        result.sort_by_key(|b| b.period);
        result
    }

    /// Compute summary metrics over the full (already filtered) record set.
    ///
    /// `today` scopes `contacts_today`; callers rendering live views must
    /// re-evaluate with the current date whenever they rebuild.
    pub fn summarize(records: &[CampaignRecord], today: NaiveDate) -> SummaryMetrics {
        let mut metrics = SummaryMetrics::default();

        for record in records {
            metrics.total_contacts = metrics.total_contacts.saturating_add(record.contacts);
            metrics.total_qualified = metrics.total_qualified.saturating_add(record.qualified);
            metrics.total_disqualified = metrics
                .total_disqualified
                .saturating_add(record.disqualified);
            metrics.total_cost += record.cost;
            if record.date == today {
                metrics.contacts_today = metrics.contacts_today.saturating_add(record.contacts);
            }
        }

        // Guard both ratios so empty input yields 0, never NaN or infinity
        if metrics.total_contacts > 0 {
            metrics.avg_cpl = metrics.total_cost / metrics.total_contacts as f64;
            metrics.qualification_rate =
                (metrics.total_qualified as f64 / metrics.total_contacts as f64) * 100.0;
        }

        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(
        date: &str,
        contacts: u64,
        qualified: u64,
        disqualified: u64,
        cost: f64,
    ) -> CampaignRecord {
        CampaignRecord {
            date: date.parse().unwrap(),
            campaign: "Campanha de Verão".into(),
            source: "Facebook".into(),
            placement: None,
            contacts,
            qualified,
            disqualified,
            cost,
            cpl: if contacts > 0 { cost / contacts as f64 } else { 0.0 },
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    // ========== period_key tests ==========

    #[test]
    fn test_period_key_daily_is_identity() {
        let d = date("2024-01-31");
        assert_eq!(Aggregator::period_key(d, AggregationLevel::Daily), d);
    }

    #[test]
    fn test_period_key_weekly_is_sunday_on_or_before() {
        // 2024-01-31 is a Wednesday; the preceding Sunday is 2024-01-28
        assert_eq!(
            Aggregator::period_key(date("2024-01-31"), AggregationLevel::Weekly),
            date("2024-01-28")
        );
        // A Sunday keys to itself
        assert_eq!(
            Aggregator::period_key(date("2024-01-28"), AggregationLevel::Weekly),
            date("2024-01-28")
        );
    }

    #[test]
    fn test_period_key_weekly_crosses_month_boundary() {
        // 2024-02-01 (Thursday) belongs to the week of Sunday 2024-01-28
        assert_eq!(
            Aggregator::period_key(date("2024-02-01"), AggregationLevel::Weekly),
            date("2024-01-28")
        );
    }

    #[test]
    fn test_period_key_weekly_crosses_year_boundary() {
        // 2024-01-02 (Tuesday) belongs to the week of Sunday 2023-12-31
        assert_eq!(
            Aggregator::period_key(date("2024-01-02"), AggregationLevel::Weekly),
            date("2023-12-31")
        );
    }

    #[test]
    fn test_period_key_monthly_is_first_of_month() {
        assert_eq!(
            Aggregator::period_key(date("2024-01-31"), AggregationLevel::Monthly),
            date("2024-01-01")
        );
        assert_eq!(
            Aggregator::period_key(date("2024-02-29"), AggregationLevel::Monthly),
            date("2024-02-01")
        );
    }

    // ========== bucketize tests ==========

    #[test]
    fn test_bucketize_empty_records() {
        let result = Aggregator::bucketize(&[], AggregationLevel::Daily);
        assert!(result.is_empty());
    }

    #[test]
    fn test_bucketize_daily_one_bucket_per_distinct_date() {
        let records = vec![
            make_record("2024-01-01", 10, 6, 4, 50.0),
            make_record("2024-01-02", 20, 8, 12, 100.0),
            make_record("2024-01-02", 5, 3, 2, 25.0),
        ];

        let result = Aggregator::bucketize(&records, AggregationLevel::Daily);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].period, date("2024-01-01"));
        assert_eq!(result[1].period, date("2024-01-02"));
        assert_eq!(result[1].contacts, 25);
    }

    #[test]
    fn test_bucketize_sorted_ascending() {
        let records = vec![
            make_record("2024-01-20", 1, 0, 0, 1.0),
            make_record("2024-01-10", 1, 0, 0, 1.0),
            make_record("2024-01-15", 1, 0, 0, 1.0),
        ];

        let result = Aggregator::bucketize(&records, AggregationLevel::Daily);

        assert_eq!(result[0].period, date("2024-01-10"));
        assert_eq!(result[1].period, date("2024-01-15"));
        assert_eq!(result[2].period, date("2024-01-20"));
    }

    #[test]
    fn test_bucketize_weekly_merges_same_week() {
        // 2024-01-01 (Mon) and 2024-01-02 (Tue) fall in the week of Sunday
        // 2023-12-31
        let records = vec![
            make_record("2024-01-01", 10, 6, 4, 50.0),
            make_record("2024-01-02", 20, 8, 12, 100.0),
        ];

        let result = Aggregator::bucketize(&records, AggregationLevel::Weekly);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].period, date("2023-12-31"));
        assert_eq!(result[0].contacts, 30);
        assert_eq!(result[0].qualified, 14);
        assert_eq!(result[0].disqualified, 16);
        assert!((result[0].cost - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bucketize_weekly_same_date_same_bucket() {
        let records = vec![
            make_record("2024-03-06", 10, 5, 5, 40.0),
            make_record("2024-03-06", 7, 3, 4, 30.0),
        ];

        let result = Aggregator::bucketize(&records, AggregationLevel::Weekly);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].contacts, 17);
    }

    #[test]
    fn test_bucketize_monthly_keys_to_day_one() {
        let records = vec![
            make_record("2024-01-31", 10, 6, 4, 50.0),
            make_record("2024-01-03", 5, 2, 3, 20.0),
            make_record("2024-02-01", 8, 4, 4, 40.0),
        ];

        let result = Aggregator::bucketize(&records, AggregationLevel::Monthly);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].period, date("2024-01-01"));
        assert_eq!(result[0].contacts, 15);
        assert_eq!(result[1].period, date("2024-02-01"));
    }

    #[test]
    fn test_bucketize_conserves_totals_across_levels() {
        let records = vec![
            make_record("2024-01-05", 10, 6, 4, 50.0),
            make_record("2024-01-12", 20, 8, 12, 100.0),
            make_record("2024-02-03", 15, 9, 6, 75.0),
            make_record("2024-03-28", 12, 5, 7, 60.0),
        ];
        let qualified_in: u64 = records.iter().map(|r| r.qualified).sum();

        for level in [
            AggregationLevel::Daily,
            AggregationLevel::Weekly,
            AggregationLevel::Monthly,
        ] {
            let buckets = Aggregator::bucketize(&records, level);
            let qualified_out: u64 = buckets.iter().map(|b| b.qualified).sum();
            assert_eq!(qualified_out, qualified_in);
        }
    }

    // ========== summarize tests ==========

    #[test]
    fn test_summarize_empty_is_all_zero() {
        let metrics = Aggregator::summarize(&[], date("2024-01-15"));

        assert_eq!(metrics.total_contacts, 0);
        assert_eq!(metrics.contacts_today, 0);
        // Must be exactly 0, never NaN or infinity
        assert_eq!(metrics.avg_cpl, 0.0);
        assert_eq!(metrics.qualification_rate, 0.0);
    }

    #[test]
    fn test_summarize_two_day_totals() {
        let records = vec![
            make_record("2024-01-01", 10, 6, 4, 50.0),
            make_record("2024-01-02", 20, 8, 12, 100.0),
        ];

        let metrics = Aggregator::summarize(&records, date("2024-01-02"));

        assert_eq!(metrics.total_contacts, 30);
        assert_eq!(metrics.total_qualified, 14);
        assert_eq!(metrics.total_disqualified, 16);
        assert!((metrics.total_cost - 150.0).abs() < f64::EPSILON);
        assert!((metrics.avg_cpl - 5.0).abs() < f64::EPSILON);
        assert!((metrics.qualification_rate - 46.666666666666664).abs() < 0.001);
    }

    #[test]
    fn test_summarize_contacts_today_matches_only_today() {
        let records = vec![
            make_record("2024-01-01", 10, 6, 4, 50.0),
            make_record("2024-01-02", 20, 8, 12, 100.0),
            make_record("2024-01-02", 7, 4, 3, 35.0),
        ];

        let metrics = Aggregator::summarize(&records, date("2024-01-02"));
        assert_eq!(metrics.contacts_today, 27);

        // A different "today" shifts the count without touching the totals
        let other = Aggregator::summarize(&records, date("2024-01-01"));
        assert_eq!(other.contacts_today, 10);
        assert_eq!(other.total_contacts, metrics.total_contacts);
    }

    #[test]
    fn test_summarize_avg_cpl_is_cost_weighted() {
        // Per-record CPLs are 1.0 and 10.0 (mean 5.5); the aggregate
        // cost-weighted CPL is 110 / 101
        let records = vec![
            make_record("2024-01-01", 100, 50, 50, 100.0),
            make_record("2024-01-02", 1, 1, 0, 10.0),
        ];

        let metrics = Aggregator::summarize(&records, date("2024-01-01"));

        assert!((metrics.avg_cpl - 110.0 / 101.0).abs() < f64::EPSILON);
        assert!((metrics.avg_cpl - 5.5).abs() > 4.0);
    }
}
