//! Metric card grid - the dashboard's headline numbers

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use crate::tui::theme::Theme;
use crate::types::SummaryMetrics;

/// Format a number with a grouping separator every three digits
fn format_grouped(n: u64, separator: char) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    // Digits are ASCII, so byte indexing is safe
    for (i, ch) in s.bytes().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(separator);
        }
        result.push(ch as char);
    }

    result
}

/// Format a count with thousand separators (e.g. 1234567 -> "1,234,567")
pub fn format_count(n: u64) -> String {
    format_grouped(n, ',')
}

/// Format a non-negative amount in Brazilian currency style
/// (e.g. 1234.5 -> "1.234,50"); the caller supplies the R$ prefix
pub fn format_brl(value: f64) -> String {
    let cents = (value.max(0.0) * 100.0).round() as u64;
    format!("{},{:02}", format_grouped(cents / 100, '.'), cents % 100)
}

/// Card dimensions
const CARD_WIDTH: u16 = 28;
const CARD_HEIGHT: u16 = 5;

/// Fixed number of columns for a balanced 2x3 grid
const FIXED_COLS: usize = 3;

/// Calculate number of cards per row based on available width
fn cards_per_row(width: u16) -> usize {
    let usable_width = width.saturating_sub(4); // padding
    let cards = (usable_width / (CARD_WIDTH + 2)) as usize; // +2 for spacing
    cards.clamp(1, FIXED_COLS)
}

/// Height the grid needs for a given width
pub fn grid_height(width: u16) -> u16 {
    let cols = cards_per_row(width);
    let rows = 6_usize.div_ceil(cols);
    (rows as u16) * (CARD_HEIGHT + 1)
}

/// Internal card representation
struct MetricCard {
    title: String,
    value: String,
    value_color: Color,
    border_color: Color,
}

/// Metric card grid widget
pub struct CardGrid<'a> {
    metrics: &'a SummaryMetrics,
    theme: Theme,
}

impl<'a> CardGrid<'a> {
    pub fn new(metrics: &'a SummaryMetrics, theme: Theme) -> Self {
        Self { metrics, theme }
    }

    fn build_cards(&self) -> Vec<MetricCard> {
        vec![
            MetricCard {
                title: "Contacts Today".to_string(),
                value: format_count(self.metrics.contacts_today),
                value_color: self.theme.accent(),
                border_color: self.theme.accent(),
            },
            MetricCard {
                title: "Qualified".to_string(),
                value: format_count(self.metrics.total_qualified),
                value_color: self.theme.qualified(),
                border_color: self.theme.qualified(),
            },
            MetricCard {
                title: "Disqualified".to_string(),
                value: format_count(self.metrics.total_disqualified),
                value_color: self.theme.error(),
                border_color: self.theme.error(),
            },
            MetricCard {
                title: "Total Spend".to_string(),
                value: format!("R$ {}", format_brl(self.metrics.total_cost)),
                value_color: self.theme.stat_warm(),
                border_color: self.theme.stat_warm(),
            },
            MetricCard {
                title: "Cost per Lead".to_string(),
                value: format!("R$ {}", format_brl(self.metrics.avg_cpl)),
                value_color: self.theme.cost(),
                border_color: self.theme.cost(),
            },
            MetricCard {
                title: "Qualification Rate".to_string(),
                value: format!("{:.1}%", self.metrics.qualification_rate),
                value_color: self.theme.stat_blue(),
                border_color: self.theme.stat_blue(),
            },
        ]
    }

    fn render_card(&self, area: Rect, buf: &mut Buffer, card: &MetricCard) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(card.border_color));
        block.render(area, buf);

        // Title (centered, line 1 inside border)
        if area.height > 2 {
            let title_y = area.y + 1;
            let title_x = area.x + (area.width.saturating_sub(card.title.len() as u16)) / 2;
            buf.set_string(
                title_x,
                title_y,
                &card.title,
                Style::default().fg(card.border_color),
            );
        }

        // Value (centered, line 3 inside border)
        if area.height > 3 {
            let value_y = area.y + 3;
            let value_x = area.x + (area.width.saturating_sub(card.value.len() as u16)) / 2;
            buf.set_string(
                value_x,
                value_y,
                &card.value,
                Style::default()
                    .fg(card.value_color)
                    .add_modifier(Modifier::BOLD),
            );
        }
    }
}

impl Widget for CardGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cards = self.build_cards();
        let cols = cards_per_row(area.width);

        let total_cards_width = (cols as u16) * CARD_WIDTH + ((cols - 1) as u16) * 2;
        let start_x = area.x + (area.width.saturating_sub(total_cards_width)) / 2;

        for (i, card) in cards.iter().enumerate() {
            let row = i / cols;
            let col = i % cols;

            let card_x = start_x + (col as u16) * (CARD_WIDTH + 2);
            let card_y = area.y + (row as u16) * (CARD_HEIGHT + 1);

            // Skip cards that fall outside the area
            if card_y + CARD_HEIGHT > area.y + area.height {
                continue;
            }

            let card_area = Rect {
                x: card_x,
                y: card_y,
                width: CARD_WIDTH,
                height: CARD_HEIGHT,
            };

            self.render_card(card_area, buf, card);
        }
    }
}
