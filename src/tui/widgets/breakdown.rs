//! Breakdown panel - proportional bars for sources/placements and campaigns

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use super::cards::format_count;
use crate::tui::theme::Theme;
use crate::types::BreakdownSlice;

/// Bar rendering config
const NAME_WIDTH: usize = 20;
const BAR_WIDTH: usize = 16;

/// Rows shown per section
const MAX_ROWS: usize = 6;

/// Breakdown panel widget: one titled bar list per section
pub struct BreakdownView<'a> {
    /// Contact sources (consolidated) or placements (channel tabs)
    slices: &'a [BreakdownSlice],
    slices_title: &'a str,
    /// Qualified leads per campaign, smallest first
    campaigns: &'a [BreakdownSlice],
    theme: Theme,
}

impl<'a> BreakdownView<'a> {
    pub fn new(
        slices: &'a [BreakdownSlice],
        slices_title: &'a str,
        campaigns: &'a [BreakdownSlice],
        theme: Theme,
    ) -> Self {
        Self {
            slices,
            slices_title,
            campaigns,
            theme,
        }
    }

    /// Height needed to render both sections in full
    pub fn required_height(&self) -> u16 {
        let section = |len: usize| 2 + len.min(MAX_ROWS) as u16;
        section(self.slices.len()) + 1 + section(self.campaigns.len())
    }

    fn render_section(
        &self,
        area: Rect,
        buf: &mut Buffer,
        title: &str,
        slices: &[BreakdownSlice],
        colored: bool,
    ) -> u16 {
        buf.set_string(
            area.x,
            area.y,
            title,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );

        if slices.is_empty() {
            buf.set_string(
                area.x,
                area.y + 1,
                "No data to display.",
                Style::default().fg(self.theme.muted()),
            );
            return 2;
        }

        let max_value = slices.iter().map(|s| s.value).max().unwrap_or(1).max(1);
        let mut rows = 0u16;

        for (i, slice) in slices.iter().take(MAX_ROWS).enumerate() {
            let y = area.y + 1 + i as u16;
            if y >= area.y + area.height {
                break;
            }

            // Truncate long names with an ellipsis
            let name = if slice.name.chars().count() > NAME_WIDTH - 1 {
                format!(
                    "{}…",
                    slice.name.chars().take(NAME_WIDTH - 2).collect::<String>()
                )
            } else {
                slice.name.clone()
            };

            let ratio = slice.value as f64 / max_value as f64;
            let filled = ((ratio * BAR_WIDTH as f64).round() as usize).max(1).min(BAR_WIDTH);
            let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));

            // Bars are colored positionally, matching slice order
            let bar_color = if colored {
                self.theme.slice_color(i)
            } else {
                self.theme.qualified()
            };

            let line = Line::from(vec![
                Span::styled(
                    format!("{:<width$}", name, width = NAME_WIDTH),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(bar, Style::default().fg(bar_color)),
                Span::raw("  "),
                Span::styled(
                    format_count(slice.value),
                    Style::default().fg(self.theme.text()),
                ),
            ]);
            buf.set_line(area.x, y, &line, area.width);
            rows += 1;
        }

        rows + 2
    }
}

impl Widget for BreakdownView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 2 {
            return;
        }

        let used = self.render_section(area, buf, self.slices_title, self.slices, true);

        let remaining = Rect {
            x: area.x,
            y: area.y + used,
            width: area.width,
            height: area.height.saturating_sub(used),
        };
        if remaining.height >= 2 {
            self.render_section(
                remaining,
                buf,
                "Qualified by Campaign",
                self.campaigns,
                false,
            );
        }
    }
}
