//! Timeline table - period roll-ups with stacked lead bars

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use super::cards::{format_brl, format_count};
use crate::tui::theme::Theme;
use crate::types::{AggregationLevel, PeriodBucket};

/// Visible data rows (excluding the header)
pub const VISIBLE_ROWS: usize = 12;

/// Width of the stacked qualified/disqualified bar
const BAR_WIDTH: usize = 20;

/// Column widths: period, contacts, qualified, disqualified, spend, CPL
const COL_WIDTHS: [usize; 6] = [12, 10, 11, 13, 13, 10];

/// Maximum scroll offset for a bucket count
pub fn max_scroll_offset(count: usize) -> usize {
    count.saturating_sub(VISIBLE_ROWS)
}

/// Format a period key for display at the given level
fn format_period(bucket: &PeriodBucket, level: AggregationLevel) -> String {
    match level {
        AggregationLevel::Daily | AggregationLevel::Weekly => {
            bucket.period.format("%Y-%m-%d").to_string()
        }
        AggregationLevel::Monthly => bucket.period.format("%Y-%m").to_string(),
    }
}

/// Stacked bar: qualified share filled, disqualified share shaded, scaled
/// against the busiest bucket so rows are comparable
fn stacked_bar(bucket: &PeriodBucket, max_contacts: u64) -> (usize, usize, usize) {
    if max_contacts == 0 || bucket.contacts == 0 {
        return (0, 0, BAR_WIDTH);
    }
    let total = ((bucket.contacts as f64 / max_contacts as f64) * BAR_WIDTH as f64).round()
        as usize;
    let total = total.clamp(1, BAR_WIDTH);
    let qualified = ((bucket.qualified as f64 / bucket.contacts as f64) * total as f64).round()
        as usize;
    let qualified = qualified.min(total);
    (qualified, total - qualified, BAR_WIDTH - total)
}

/// Timeline table widget
pub struct TimelineView<'a> {
    buckets: &'a [PeriodBucket],
    level: AggregationLevel,
    scroll_offset: usize,
    theme: Theme,
}

impl<'a> TimelineView<'a> {
    pub fn new(
        buckets: &'a [PeriodBucket],
        level: AggregationLevel,
        scroll_offset: usize,
        theme: Theme,
    ) -> Self {
        Self {
            buckets,
            level,
            scroll_offset,
            theme,
        }
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let labels = [
            self.level.period_column_label(),
            "Contacts",
            "Qualified",
            "Disqualified",
            "Spend",
            "CPL",
        ];

        let mut header = String::new();
        for (label, width) in labels.iter().zip(COL_WIDTHS) {
            header.push_str(&format!("{:<width$}", label, width = width));
        }
        header.push_str("Leads");

        buf.set_string(
            area.x,
            area.y,
            &header,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );
    }

    fn render_row(&self, area: Rect, buf: &mut Buffer, y: u16, bucket: &PeriodBucket, max: u64) {
        let (q, d, empty) = stacked_bar(bucket, max);

        let spans = vec![
            Span::styled(
                format!("{:<w$}", format_period(bucket, self.level), w = COL_WIDTHS[0]),
                Style::default().fg(self.theme.date()),
            ),
            Span::styled(
                format!("{:<w$}", format_count(bucket.contacts), w = COL_WIDTHS[1]),
                Style::default().fg(self.theme.text()),
            ),
            Span::styled(
                format!("{:<w$}", format_count(bucket.qualified), w = COL_WIDTHS[2]),
                Style::default().fg(self.theme.qualified()),
            ),
            Span::styled(
                format!("{:<w$}", format_count(bucket.disqualified), w = COL_WIDTHS[3]),
                Style::default().fg(self.theme.error()),
            ),
            Span::styled(
                format!("{:<w$}", format!("R$ {}", format_brl(bucket.cost)), w = COL_WIDTHS[4]),
                Style::default().fg(self.theme.cost()),
            ),
            Span::styled(
                format!(
                    "{:<w$}",
                    format!("R$ {}", format_brl(bucket.cost_per_lead())),
                    w = COL_WIDTHS[5]
                ),
                Style::default().fg(self.theme.cost()),
            ),
            Span::styled("█".repeat(q), Style::default().fg(self.theme.qualified())),
            Span::styled("█".repeat(d), Style::default().fg(self.theme.error())),
            Span::styled("░".repeat(empty), Style::default().fg(self.theme.muted())),
        ];

        buf.set_line(area.x, y, &Line::from(spans), area.width);
    }
}

impl Widget for TimelineView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 2 {
            return;
        }

        let title = format!("{} Performance", self.level.label());
        buf.set_string(
            area.x,
            area.y,
            &title,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );

        if self.buckets.is_empty() {
            buf.set_string(
                area.x,
                area.y + 2,
                "No data for this period.",
                Style::default().fg(self.theme.muted()),
            );
            return;
        }

        self.render_header(
            Rect {
                y: area.y + 2,
                height: 1,
                ..area
            },
            buf,
        );

        let max_contacts = self.buckets.iter().map(|b| b.contacts).max().unwrap_or(0);
        let visible = (area.height.saturating_sub(3) as usize).min(VISIBLE_ROWS);

        for (i, bucket) in self
            .buckets
            .iter()
            .skip(self.scroll_offset)
            .take(visible)
            .enumerate()
        {
            let y = area.y + 3 + i as u16;
            self.render_row(area, buf, y, bucket, max_contacts);
        }
    }
}
