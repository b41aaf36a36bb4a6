//! AI analysis popup - narrative overlay with loading and error states

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use super::spinner::Spinner;
use crate::tui::theme::Theme;

/// Popup body states; the app owns which one is active
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightsState {
    /// Popup not displayed
    Hidden,
    /// Waiting on the API, spinner animating
    Loading { frame: usize },
    /// Narrative ready, scrollable
    Ready { text: String, scroll: u16 },
    /// Generation failed; the message comes from the tagged error
    Failed { message: String },
}

impl InsightsState {
    /// Whether the popup overlay is currently displayed
    pub fn shows_overlay(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// AI analysis popup widget
pub struct InsightsPopup<'a> {
    state: &'a InsightsState,
    theme: Theme,
}

impl<'a> InsightsPopup<'a> {
    pub fn new(state: &'a InsightsState, theme: Theme) -> Self {
        Self { state, theme }
    }

    /// Popup area: centered, roughly three quarters of the screen
    pub fn centered_area(area: Rect) -> Rect {
        let width = (area.width * 3 / 4).clamp(20, 90);
        let height = (area.height * 3 / 4).max(8).min(area.height);
        Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 2,
            width: width.min(area.width),
            height,
        }
    }
}

impl Widget for InsightsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Clear the area first (for overlay effect)
        Clear.render(area, buf);

        let block = Block::default()
            .title(" Campaign Analysis ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));

        let inner = block.inner(area);
        block.render(area, buf);

        match self.state {
            InsightsState::Hidden => {}
            InsightsState::Loading { frame } => {
                let spinner = Spinner::new(*frame, super::spinner::LoadingStage::Aggregating);
                let text = format!("{} Generating analysis...", spinner.current_char());
                let y = inner.y + inner.height / 2;
                let x = inner.x + (inner.width.saturating_sub(text.len() as u16)) / 2;
                buf.set_string(x, y, &text, Style::default().fg(self.theme.accent()));
            }
            InsightsState::Ready { text, scroll } => {
                let lines: Vec<Line> = text.lines().map(style_markdown_line).collect();
                Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .scroll((*scroll, 0))
                    .render(inner, buf);

                // Scroll hint in the bottom border
                let hint = " ↑↓ scroll · Esc close ";
                if area.width as usize > hint.len() + 2 {
                    let x = area.x + area.width - hint.len() as u16 - 2;
                    buf.set_string(
                        x,
                        area.y + area.height - 1,
                        hint,
                        Style::default().fg(self.theme.muted()),
                    );
                }
            }
            InsightsState::Failed { message } => {
                let lines = vec![
                    Line::from(Span::styled(
                        "Analysis failed",
                        Style::default()
                            .fg(self.theme.error())
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::raw(""),
                    Line::from(Span::styled(
                        message.clone(),
                        Style::default().fg(self.theme.text()),
                    )),
                ];
                Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .alignment(Alignment::Center)
                    .render(inner, buf);
            }
        }
    }
}

/// Light markdown styling: headings bold-accent, list items accent-bulleted
fn style_markdown_line(line: &str) -> Line<'static> {
    // Longest heading marker first so "###" never half-matches "##"
    if let Some(heading) = line
        .strip_prefix("### ")
        .or_else(|| line.strip_prefix("## "))
        .or_else(|| line.strip_prefix("# "))
    {
        Line::from(Span::styled(
            heading.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
    } else if let Some(item) = line.strip_prefix("* ").or_else(|| line.strip_prefix("- ")) {
        Line::from(vec![Span::raw("  • "), Span::raw(item.to_string())])
    } else {
        Line::raw(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shows_overlay() {
        assert!(!InsightsState::Hidden.shows_overlay());
        assert!(InsightsState::Loading { frame: 0 }.shows_overlay());
        assert!(InsightsState::Ready {
            text: "ok".into(),
            scroll: 0
        }
        .shows_overlay());
        assert!(InsightsState::Failed {
            message: "boom".into()
        }
        .shows_overlay());
    }

    #[test]
    fn test_centered_area_is_centered() {
        let area = Rect::new(0, 0, 120, 40);
        let popup = InsightsPopup::centered_area(area);
        assert_eq!(popup.width, 90);
        assert_eq!(popup.height, 30);
        assert_eq!(popup.x, 15);
        assert_eq!(popup.y, 5);
    }

    #[test]
    fn test_centered_area_small_terminal() {
        let area = Rect::new(0, 0, 30, 10);
        let popup = InsightsPopup::centered_area(area);
        assert!(popup.width <= 30);
        assert!(popup.height <= 10);
    }

    #[test]
    fn test_style_markdown_heading_strips_marker() {
        let line = style_markdown_line("## Resumo");
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "Resumo");
    }

    #[test]
    fn test_style_markdown_bullet() {
        let line = style_markdown_line("* ponto");
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "  • ponto");
    }
}
