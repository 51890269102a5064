//! Filtered-data table for the Ride Insights TUI.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per ride,
//! capped to a preview count the way the dashboard's data table shows only
//! the head of the filtered frame.

use insights_core::formatting::format_revenue;
use insights_core::models::RideRecord;
use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::themes::Theme;

/// Render the first `preview_rows` records of the filtered view into `area`.
pub fn render_table_view(
    frame: &mut Frame,
    area: Rect,
    records: &[RideRecord],
    preview_rows: usize,
    theme: &Theme,
) {
    let header_cells = [
        "Booking ID",
        "Date",
        "Vehicle",
        "Status",
        "Payment",
        "Value",
        "Distance",
        "Rating",
    ]
    .iter()
    .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let shown = records.len().min(preview_rows);
    let data_rows: Vec<Row> = records
        .iter()
        .take(preview_rows)
        .enumerate()
        .map(|(i, record)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(record.booking_id.clone()),
                Cell::from(record.date.to_string()),
                Cell::from(record.vehicle_type.clone()),
                Cell::from(record.booking_status.clone()),
                Cell::from(record.payment_method.clone()),
                Cell::from(format_revenue(record.booking_value)),
                Cell::from(format!("{:.2}", record.ride_distance)),
                Cell::from(
                    record
                        .customer_rating
                        .map(|r| format!("{r:.1}"))
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(22),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(8),
    ];

    let title = format!(" Filtered Rides (showing {} of {}) ", shown, records.len());
    let table = Table::new(data_rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a placeholder when the current filters match no rides.
pub fn render_no_rows(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No rides match the current filters", theme.warning)),
        Line::from(""),
        Line::from(Span::styled("Press 'r' to reset filters", theme.dim)),
        Line::from(Span::styled("Press 't' to return to the dashboard", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Filtered Rides "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
