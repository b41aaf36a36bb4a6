//! Text and JSON rendering for the CLI report commands

use serde::Serialize;

use crate::tui::widgets::cards::{format_brl, format_count};
use crate::types::{AggregationLevel, BreakdownSlice, DateRange, PeriodBucket, SummaryMetrics};

/// One timeline row for JSON output, with the derived CPL included
#[derive(Serialize)]
struct TimelineRow<'a> {
    period: &'a chrono::NaiveDate,
    contacts: u64,
    qualified: u64,
    disqualified: u64,
    cost: f64,
    cpl: f64,
}

/// Render the summary metrics as an aligned text block
pub fn summary_text(metrics: &SummaryMetrics, range: &DateRange) -> String {
    let mut out = String::new();
    out.push_str(&format!("Period: {} to {}\n\n", range.start, range.end));
    out.push_str(&format!(
        "{:<22}{}\n",
        "Contacts:",
        format_count(metrics.total_contacts)
    ));
    out.push_str(&format!(
        "{:<22}{}\n",
        "Qualified:",
        format_count(metrics.total_qualified)
    ));
    out.push_str(&format!(
        "{:<22}{}\n",
        "Disqualified:",
        format_count(metrics.total_disqualified)
    ));
    out.push_str(&format!(
        "{:<22}{}\n",
        "Contacts today:",
        format_count(metrics.contacts_today)
    ));
    out.push_str(&format!(
        "{:<22}R$ {}\n",
        "Total spend:",
        format_brl(metrics.total_cost)
    ));
    out.push_str(&format!(
        "{:<22}R$ {}\n",
        "Cost per lead:",
        format_brl(metrics.avg_cpl)
    ));
    out.push_str(&format!(
        "{:<22}{:.1}%\n",
        "Qualification rate:", metrics.qualification_rate
    ));
    out
}

pub fn summary_json(metrics: &SummaryMetrics) -> String {
    serde_json::to_string_pretty(metrics).unwrap_or_else(|_| "{}".into())
}

/// Render the bucketed timeline as an aligned table
pub fn timeline_text(buckets: &[PeriodBucket], level: AggregationLevel) -> String {
    if buckets.is_empty() {
        return "No data for this period.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<12}{:>10}{:>11}{:>14}{:>14}{:>11}\n",
        level.period_column_label(),
        "Contacts",
        "Qualified",
        "Disqualified",
        "Spend",
        "CPL"
    ));

    for bucket in buckets {
        let period = match level {
            AggregationLevel::Monthly => bucket.period.format("%Y-%m").to_string(),
            _ => bucket.period.format("%Y-%m-%d").to_string(),
        };
        out.push_str(&format!(
            "{:<12}{:>10}{:>11}{:>14}{:>14}{:>11}\n",
            period,
            format_count(bucket.contacts),
            format_count(bucket.qualified),
            format_count(bucket.disqualified),
            format!("R$ {}", format_brl(bucket.cost)),
            format!("R$ {}", format_brl(bucket.cost_per_lead())),
        ));
    }

    out
}

pub fn timeline_json(buckets: &[PeriodBucket]) -> String {
    let rows: Vec<TimelineRow> = buckets
        .iter()
        .map(|b| TimelineRow {
            period: &b.period,
            contacts: b.contacts,
            qualified: b.qualified,
            disqualified: b.disqualified,
            cost: b.cost,
            cpl: b.cost_per_lead(),
        })
        .collect();
    serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".into())
}

/// Render a categorical breakdown as a labelled list
pub fn breakdown_text(slices: &[BreakdownSlice], title: &str) -> String {
    if slices.is_empty() {
        return format!("{}: no data for this period.\n", title);
    }

    let name_width = slices
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(8)
        + 2;

    let mut out = format!("{}\n", title);
    for slice in slices {
        out.push_str(&format!(
            "{:<width$}{}\n",
            slice.name,
            format_count(slice.value),
            width = name_width
        ));
    }
    out
}

pub fn breakdown_json(slices: &[BreakdownSlice]) -> String {
    serde_json::to_string_pretty(slices).unwrap_or_else(|_| "[]".into())
}
