use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::themes::Theme;

/// A bordered KPI card showing one headline metric.
pub struct MetricCard<'a> {
    /// Card title, e.g. `"Total Rides"`.
    pub title: &'a str,
    /// Pre-formatted metric value, e.g. `"1,204"` or `"33.3%"`.
    pub value: String,
    /// Style applied to the value line (severity colouring for rates).
    pub value_style: Style,
}

impl<'a> MetricCard<'a> {
    /// Card with the theme's default value styling.
    pub fn new(title: &'a str, value: String, theme: &Theme) -> Self {
        Self {
            title,
            value,
            value_style: theme.card_value,
        }
    }

    /// Card with an explicit value style.
    pub fn styled(title: &'a str, value: String, value_style: Style) -> Self {
        Self {
            title,
            value,
            value_style,
        }
    }

    /// Render the card into `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let text = Text::from(vec![Line::from(Span::styled(
            self.value.clone(),
            self.value_style,
        ))]);

        let card = Paragraph::new(text).centered().block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", self.title))
                .title_style(theme.card_title),
        );
        frame.render_widget(card, area);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_metric_card_render_does_not_panic() {
        let backend = TestBackend::new(24, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let card = MetricCard::new("Total Rides", "1,204".to_string(), &theme);

        terminal
            .draw(|frame| {
                let area = frame.area();
                card.render(frame, area, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_metric_card_styled_value() {
        let theme = Theme::dark();
        let card = MetricCard::styled("Cancellation Rate", "33.3%".to_string(), theme.rate_high);
        assert_eq!(card.value_style, theme.rate_high);
        assert_eq!(card.value, "33.3%");
    }

    #[test]
    fn test_metric_card_render_tiny_area() {
        // Degenerate areas must not panic.
        let backend = TestBackend::new(3, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let card = MetricCard::new("Avg Rating", "N/A".to_string(), &theme);

        terminal
            .draw(|frame| {
                let area = frame.area();
                card.render(frame, area, &theme);
            })
            .unwrap();
    }
}
