use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decorative marks placed either side of the application title.
pub const ACCENTS: &str = "· • ·";

/// Dashboard header rendering four lines:
///
/// 1. Application title with accent decorations (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Dataset information in `[ rows | date span ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Number of records in the loaded dataset.
    pub total_rows: usize,
    /// Human-readable date span string, e.g. `"2024-07-01 .. 2024-07-31"`.
    pub date_span: &'a str,
    /// Theme providing colour styles for each part of the header.
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    /// Construct a new header.
    pub fn new(total_rows: usize, date_span: &'a str, theme: &'a Theme) -> Self {
        Self {
            total_rows,
            date_span,
            theme,
        }
    }

    /// Render the header as a `Vec<Line>` containing exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(ACCENTS, self.theme.header_accent),
                Span::styled(" RIDE INSIGHTS DASHBOARD ", self.theme.header),
                Span::styled(ACCENTS, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(format!("{} rides", self.total_rows), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.date_span.to_string(), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
