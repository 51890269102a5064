//! The main dashboard view: KPI cards, charts, and filter state.
//!
//! All widgets are rendered from an [`AnalysisReport`] computed by the data
//! layer; nothing here aggregates. Charts are drawn as labelled bar lines in
//! the style of the terminal, not canvas widgets, so they degrade cleanly on
//! narrow terminals.

use insights_core::formatting::{format_mean, format_number, format_percent, format_revenue};
use insights_data::analysis::AnalysisReport;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::components::header::Header;
use crate::components::metric_card::MetricCard;
use crate::themes::Theme;

/// Sparkline glyphs from lowest to highest.
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Maximum label width in bar charts before truncation.
const LABEL_WIDTH: usize = 16;

/// Everything the dashboard needs beyond the analysis report itself.
pub struct DashboardContext<'a> {
    /// Rows in the full (unfiltered) dataset.
    pub dataset_rows: usize,
    /// Date span label of the full dataset.
    pub date_span: &'a str,
    /// `(dimension, value, active)` triples describing the filter state.
    pub filters: &'a [(String, String, bool)],
}

/// Render the full dashboard into `area`.
pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    report: &AnalysisReport,
    ctx: &DashboardContext,
    theme: &Theme,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Length(1), // filter line
            Constraint::Length(3), // KPI cards
            Constraint::Min(8),    // charts
            Constraint::Length(1), // key hints
        ])
        .split(area);

    render_header(frame, rows[0], ctx, theme);
    render_filter_line(frame, rows[1], ctx, theme);
    render_kpi_cards(frame, rows[2], report, theme);
    render_charts(frame, rows[3], report, theme);
    render_key_hints(frame, rows[4], theme);
}

/// Render a placeholder when the dataset itself is empty.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No ride data loaded", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Provide a trip-log CSV via --data or place ola_rides.csv in the working directory.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Ride Insights "),
        ),
        area,
    );
}

// ── Sections ──────────────────────────────────────────────────────────────────

fn render_header(frame: &mut Frame, area: Rect, ctx: &DashboardContext, theme: &Theme) {
    let header = Header::new(ctx.dataset_rows, ctx.date_span, theme);
    frame.render_widget(Paragraph::new(Text::from(header.to_lines())), area);
}

fn render_filter_line(frame: &mut Frame, area: Rect, ctx: &DashboardContext, theme: &Theme) {
    let mut spans: Vec<Span> = vec![Span::styled("Filters: ", theme.label)];
    for (i, (dimension, value, active)) in ctx.filters.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", theme.separator));
        }
        let style = if *active {
            theme.filter_active
        } else {
            theme.filter_inactive
        };
        spans.push(Span::styled(format!("{dimension}={value}"), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_kpi_cards(frame: &mut Frame, area: Rect, report: &AnalysisReport, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    let summary = &report.summary;
    let cards = [
        MetricCard::new(
            "Total Rides",
            format_number(summary.total_rides as f64, 0),
            theme,
        ),
        MetricCard::new("Total Revenue", format_revenue(summary.total_revenue), theme),
        MetricCard::new("Avg Distance", format_mean(summary.avg_ride_distance), theme),
        MetricCard::new(
            "Avg Rating",
            format_mean(summary.avg_customer_rating),
            theme,
        ),
        MetricCard::styled(
            "Cancellation Rate",
            format_percent(summary.cancellation_rate_pct),
            theme.rate_style(summary.cancellation_rate_pct),
        ),
    ];

    for (card, column) in cards.iter().zip(columns.iter()) {
        card.render(frame, *column, theme);
    }
}

fn render_charts(frame: &mut Frame, area: Rect, report: &AnalysisReport, theme: &Theme) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(halves[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(halves[1]);

    render_rides_over_time(frame, left[0], report, theme);
    render_top_vehicles(frame, left[1], report, theme);
    render_payment_share(frame, right[0], report, theme);
    render_status_breakdown(frame, right[1], report, theme);
}

fn render_rides_over_time(frame: &mut Frame, area: Rect, report: &AnalysisReport, theme: &Theme) {
    let series = &report.rides_over_time;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(" Rides Over Time ");

    if series.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("no rides in view", theme.dim)).block(block),
            area,
        );
        return;
    }

    // The spark string spans the inner width of the block.
    let width = area.width.saturating_sub(2).max(1) as usize;
    let spark = sparkline_string(series.iter().map(|(_, n)| *n), width);

    let peak = series.iter().map(|(_, n)| *n).max().unwrap_or(0);
    let first = series.first().map(|(d, _)| d.to_string()).unwrap_or_default();
    let last = series.last().map(|(d, _)| d.to_string()).unwrap_or_default();

    let lines = vec![
        Line::from(Span::styled(spark, theme.chart_trend)),
        Line::from(vec![
            Span::styled(format!("{first} .. {last}"), theme.dim),
            Span::styled(format!("  peak {peak}/day"), theme.label),
        ]),
    ];
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn render_top_vehicles(frame: &mut Frame, area: Rect, report: &AnalysisReport, theme: &Theme) {
    let items: Vec<(String, String, f64)> = report
        .top_vehicle_types
        .iter()
        .map(|(vehicle, mean)| (vehicle.clone(), format_mean(*mean), *mean))
        .collect();
    render_bar_panel(frame, area, " Top Vehicle Types by Avg Distance ", &items, theme);
}

fn render_payment_share(frame: &mut Frame, area: Rect, report: &AnalysisReport, theme: &Theme) {
    let items: Vec<(String, String, f64)> = report
        .payment_share
        .iter()
        .map(|(method, count)| {
            (
                method.clone(),
                format_number(*count as f64, 0),
                *count as f64,
            )
        })
        .collect();
    render_bar_panel(frame, area, " Payment Method Share ", &items, theme);
}

fn render_status_breakdown(frame: &mut Frame, area: Rect, report: &AnalysisReport, theme: &Theme) {
    let items: Vec<(String, String, f64)> = report
        .status_breakdown
        .iter()
        .map(|(status, count)| {
            (
                status.clone(),
                format_number(*count as f64, 0),
                *count as f64,
            )
        })
        .collect();
    render_bar_panel(frame, area, " Booking Status Breakdown ", &items, theme);
}

fn render_key_hints(frame: &mut Frame, area: Rect, theme: &Theme) {
    let hints =
        "[v] vehicle  [s] status  [p] payment  [w] 7d  [m] 30d  [a] all dates  [r] reset  \
[t] table  [q] quit";
    frame.render_widget(Paragraph::new(Span::styled(hints, theme.dim)), area);
}

// ── Chart primitives ──────────────────────────────────────────────────────────

/// Render one bordered panel of labelled horizontal bars.
///
/// `items` carries `(label, formatted_value, raw_value)`; bars scale against
/// the maximum raw value in the panel.
fn render_bar_panel(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: &[(String, String, f64)],
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(title.to_string());

    if items.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("no rides in view", theme.dim)).block(block),
            area,
        );
        return;
    }

    let max = items
        .iter()
        .map(|(_, _, v)| *v)
        .fold(0.0_f64, f64::max)
        .max(f64::MIN_POSITIVE);

    // label + space + bar + space + value must fit the inner width.
    let inner_width = area.width.saturating_sub(2) as usize;
    let value_width = items.iter().map(|(_, v, _)| v.width()).max().unwrap_or(0);
    let bar_width = inner_width
        .saturating_sub(LABEL_WIDTH + value_width + 2)
        .max(1);

    let lines: Vec<Line> = items
        .iter()
        .map(|(label, value, raw)| {
            let filled = ((raw / max) * bar_width as f64).round() as usize;
            let filled = filled.min(bar_width);
            Line::from(vec![
                Span::styled(pad_label(label, LABEL_WIDTH), theme.label),
                Span::styled("█".repeat(filled), theme.chart_bar),
                Span::styled("░".repeat(bar_width - filled), theme.chart_empty),
                Span::styled(format!(" {value}"), theme.value),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

/// Build a fixed-width sparkline string from a count series.
///
/// When the series is longer than `width`, consecutive dates are bucketed
/// and each glyph shows the bucket's peak.
fn sparkline_string(counts: impl Iterator<Item = u64>, width: usize) -> String {
    let counts: Vec<u64> = counts.collect();
    if counts.is_empty() || width == 0 {
        return String::new();
    }

    let bucket_size = counts.len().div_ceil(width);
    let buckets: Vec<u64> = counts
        .chunks(bucket_size)
        .map(|chunk| chunk.iter().copied().max().unwrap_or(0))
        .collect();

    let max = buckets.iter().copied().max().unwrap_or(0).max(1);
    buckets
        .iter()
        .map(|&n| {
            let level = ((n as f64 / max as f64) * (SPARK_LEVELS.len() - 1) as f64).round();
            SPARK_LEVELS[level as usize]
        })
        .collect()
}

/// Truncate or pad `label` to exactly `width` display columns.
fn pad_label(label: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in label.chars() {
        let w = UnicodeWidthStr::width(ch.to_string().as_str());
        if used + w > width.saturating_sub(1) {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
