//! Categorical breakdowns for proportional charts

use crate::types::{BreakdownSlice, CampaignRecord};
use std::collections::HashMap;

/// Group records by a key and sum `contacts` per group.
///
/// Records for which the selector returns `None` are skipped entirely, never
/// bucketed under an "unknown" key. Slices keep first-seen input order:
/// downstream chart colors are assigned positionally, so the order must be
/// deterministic for a given input order.
pub fn breakdown_by<F>(records: &[CampaignRecord], key: F) -> Vec<BreakdownSlice>
where
    F: Fn(&CampaignRecord) -> Option<&str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut slices: Vec<BreakdownSlice> = Vec::new();

    for record in records {
        let Some(name) = key(record) else {
            continue;
        };
        match index.get(name) {
            Some(&i) => {
                slices[i].value = slices[i].value.saturating_add(record.contacts);
            }
            None => {
                index.insert(name.to_string(), slices.len());
                slices.push(BreakdownSlice {
                    name: name.to_string(),
                    value: record.contacts,
                });
            }
        }
    }

    slices
}

/// Contacts per channel
pub fn by_source(records: &[CampaignRecord]) -> Vec<BreakdownSlice> {
    breakdown_by(records, |r| Some(r.source.as_str()))
}

/// Contacts per placement; records without a placement are excluded
pub fn by_placement(records: &[CampaignRecord]) -> Vec<BreakdownSlice> {
    breakdown_by(records, |r| r.placement.as_deref())
}

/// Qualified-lead totals per campaign, sorted ascending by value
/// (the horizontal bar chart renders smallest first)
pub fn qualified_by_campaign(records: &[CampaignRecord]) -> Vec<BreakdownSlice> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut slices: Vec<BreakdownSlice> = Vec::new();

    for record in records {
        match index.get(record.campaign.as_str()) {
            Some(&i) => {
                slices[i].value = slices[i].value.saturating_add(record.qualified);
            }
            None => {
                index.insert(record.campaign.clone(), slices.len());
                slices.push(BreakdownSlice {
                    name: record.campaign.clone(),
                    value: record.qualified,
                });
            }
        }
    }

    slices.sort_by_key(|s| s.value);
    slices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(source: &str, placement: Option<&str>, contacts: u64) -> CampaignRecord {
        CampaignRecord {
            date: "2024-01-15".parse().unwrap(),
            campaign: "Campanha de Verão".into(),
            source: source.into(),
            placement: placement.map(String::from),
            contacts,
            qualified: 0,
            disqualified: 0,
            cost: 0.0,
            cpl: 0.0,
        }
    }

    // ========== breakdown_by tests ==========

    #[test]
    fn test_breakdown_empty_records() {
        let result = by_source(&[]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_breakdown_sums_contacts_per_key() {
        let records = vec![
            make_record("Facebook", None, 10),
            make_record("Instagram", None, 5),
            make_record("Facebook", None, 7),
        ];

        let result = by_source(&records);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Facebook");
        assert_eq!(result[0].value, 17);
        assert_eq!(result[1].name, "Instagram");
        assert_eq!(result[1].value, 5);
    }

    #[test]
    fn test_breakdown_keeps_first_seen_order() {
        let records = vec![
            make_record("Google", None, 1),
            make_record("Facebook", None, 1),
            make_record("Instagram", None, 1),
            make_record("Facebook", None, 1),
        ];

        let result = by_source(&records);

        let names: Vec<&str> = result.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Google", "Facebook", "Instagram"]);
    }

    #[test]
    fn test_breakdown_by_placement_excludes_missing() {
        let records = vec![
            make_record("Facebook", Some("Feed"), 10),
            make_record("Google", None, 99),
            make_record("Facebook", Some("Stories"), 5),
        ];

        let result = by_placement(&records);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Feed");
        assert_eq!(result[1].name, "Stories");
        // The placement-less record contributes nothing
        let total: u64 = result.iter().map(|s| s.value).sum();
        assert_eq!(total, 15);
    }

    #[test]
    fn test_breakdown_keys_are_exact() {
        // Keys are not normalized; "facebook" and "Facebook" are distinct
        let records = vec![
            make_record("Facebook", None, 1),
            make_record("facebook", None, 1),
        ];
        let result = by_source(&records);
        assert_eq!(result.len(), 2);
    }

    // ========== qualified_by_campaign tests ==========

    #[test]
    fn test_qualified_by_campaign_sorted_ascending() {
        let mut a = make_record("Facebook", None, 10);
        a.campaign = "Promoção de Inverno".into();
        a.qualified = 8;
        let mut b = make_record("Instagram", None, 10);
        b.campaign = "Leads Qualificados".into();
        b.qualified = 3;
        let mut c = make_record("Google", None, 10);
        c.campaign = "Promoção de Inverno".into();
        c.qualified = 4;

        let result = qualified_by_campaign(&[a, b, c]);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Leads Qualificados");
        assert_eq!(result[0].value, 3);
        assert_eq!(result[1].name, "Promoção de Inverno");
        assert_eq!(result[1].value, 12);
    }

    #[test]
    fn test_qualified_by_campaign_empty() {
        assert!(qualified_by_campaign(&[]).is_empty());
    }
}
