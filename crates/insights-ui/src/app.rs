//! Application state and TUI event loop for Ride Insights.
//!
//! [`App`] owns the immutable dataset and the interactive filter state.
//! Every filter change re-runs the pure analysis pipeline; the UI never
//! aggregates on its own.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

use insights_core::error::Result;
use insights_core::models::{Dataset, DateRange, FilterCriteria};
use insights_data::analysis::{analyze, AnalysisReport};

use crate::dashboard::{self, DashboardContext};
use crate::table_view;
use crate::themes::Theme;

// ── Screen / date presets ─────────────────────────────────────────────────────

/// Which screen the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// KPI cards and charts.
    Dashboard,
    /// Filtered-data table preview.
    Table,
}

/// Date-range presets anchored at the dataset's most recent ride date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatePreset {
    /// No date constraint.
    #[default]
    All,
    /// The 7 days up to and including the latest ride date.
    LastSevenDays,
    /// The 30 days up to and including the latest ride date.
    LastThirtyDays,
}

impl DatePreset {
    /// Short label shown on the filter line.
    pub fn label(&self) -> &'static str {
        match self {
            DatePreset::All => "all",
            DatePreset::LastSevenDays => "last 7d",
            DatePreset::LastThirtyDays => "last 30d",
        }
    }

    /// Resolve the preset against the dataset's date bounds.
    pub fn range(&self, dataset: &Dataset) -> Option<DateRange> {
        let (_, max) = dataset.date_bounds()?;
        let days = match self {
            DatePreset::All => return None,
            DatePreset::LastSevenDays => 7,
            DatePreset::LastThirtyDays => 30,
        };
        Some(DateRange::new(max - chrono::Duration::days(days - 1), max))
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the Ride Insights TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// The immutable, normalized dataset for this session.
    dataset: Dataset,
    /// Distinct vehicle types in encounter order.
    vehicle_options: Vec<String>,
    /// Distinct booking statuses in encounter order.
    status_options: Vec<String>,
    /// Distinct payment methods in encounter order.
    payment_options: Vec<String>,
    /// Cycle positions: 0 is the unconstrained "All" slot, `i` selects
    /// `options[i - 1]`.
    vehicle_index: usize,
    status_index: usize,
    payment_index: usize,
    /// Active date-range preset.
    date_preset: DatePreset,
    /// Which screen is showing.
    pub screen: Screen,
    /// Rows shown in the table preview.
    preview_rows: usize,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    /// Construct the application around a loaded dataset.
    pub fn new(theme_name: &str, dataset: Dataset, preview_rows: usize) -> Self {
        let vehicle_options = dataset.distinct_values(|r| &r.vehicle_type);
        let status_options = dataset.distinct_values(|r| &r.booking_status);
        let payment_options = dataset.distinct_values(|r| &r.payment_method);

        Self {
            theme: Theme::from_name(theme_name),
            dataset,
            vehicle_options,
            status_options,
            payment_options,
            vehicle_index: 0,
            status_index: 0,
            payment_index: 0,
            date_preset: DatePreset::All,
            screen: Screen::Dashboard,
            preview_rows,
            should_quit: false,
        }
    }

    // ── Filter state ──────────────────────────────────────────────────────────

    /// The criteria implied by the current cycle positions.
    ///
    /// Index 0 of each cycle is the unconstrained slot, mapped to `None`
    /// rather than any sentinel string.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            date_range: self.date_preset.range(&self.dataset),
            vehicle_type: selected(&self.vehicle_options, self.vehicle_index),
            booking_status: selected(&self.status_options, self.status_index),
            payment_method: selected(&self.payment_options, self.payment_index),
        }
    }

    /// Recompute the analysis report for the current criteria.
    pub fn compute_report(&self) -> Result<AnalysisReport> {
        analyze(&self.dataset, &self.criteria())
    }

    /// `(dimension, value, active)` triples for the filter line.
    pub fn filter_labels(&self) -> Vec<(String, String, bool)> {
        let slot = |options: &[String], index: usize| -> (String, bool) {
            match selected(options, index) {
                Some(value) => (value, true),
                None => ("All".to_string(), false),
            }
        };
        let (vehicle, vehicle_active) = slot(&self.vehicle_options, self.vehicle_index);
        let (status, status_active) = slot(&self.status_options, self.status_index);
        let (payment, payment_active) = slot(&self.payment_options, self.payment_index);

        vec![
            ("Vehicle".to_string(), vehicle, vehicle_active),
            ("Status".to_string(), status, status_active),
            ("Payment".to_string(), payment, payment_active),
            (
                "Dates".to_string(),
                self.date_preset.label().to_string(),
                self.date_preset != DatePreset::All,
            ),
        ]
    }

    /// Apply one key press to the filter / screen state.
    ///
    /// Returns `true` when the analysis must be recomputed.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                false
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                false
            }
            KeyCode::Char('v') => {
                self.vehicle_index = cycle(self.vehicle_index, self.vehicle_options.len());
                true
            }
            KeyCode::Char('s') => {
                self.status_index = cycle(self.status_index, self.status_options.len());
                true
            }
            KeyCode::Char('p') => {
                self.payment_index = cycle(self.payment_index, self.payment_options.len());
                true
            }
            KeyCode::Char('w') => {
                self.date_preset = DatePreset::LastSevenDays;
                true
            }
            KeyCode::Char('m') => {
                self.date_preset = DatePreset::LastThirtyDays;
                true
            }
            KeyCode::Char('a') => {
                self.date_preset = DatePreset::All;
                true
            }
            KeyCode::Char('r') => {
                self.vehicle_index = 0;
                self.status_index = 0;
                self.payment_index = 0;
                self.date_preset = DatePreset::All;
                true
            }
            KeyCode::Char('t') => {
                self.screen = match self.screen {
                    Screen::Dashboard => Screen::Table,
                    Screen::Table => Screen::Dashboard,
                };
                false
            }
            _ => false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the interactive dashboard until `q` / `Ctrl+C`.
    pub fn run(mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);
        let mut report = self.compute_report()?;

        let result = loop {
            terminal.draw(|frame| self.render(frame, &report))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key(key.code, key.modifiers) {
                        match self.compute_report() {
                            Ok(next) => report = next,
                            Err(e) => break Err(e),
                        }
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    /// Render the current screen into `frame`.
    fn render(&self, frame: &mut Frame, report: &AnalysisReport) {
        let area = frame.area();

        if self.dataset.is_empty() {
            dashboard::render_no_data(frame, area, &self.theme);
            return;
        }

        match self.screen {
            Screen::Dashboard => {
                let date_span = match self.dataset.date_bounds() {
                    Some((min, max)) => format!("{min} .. {max}"),
                    None => "no data".to_string(),
                };
                let filters = self.filter_labels();
                let ctx = DashboardContext {
                    dataset_rows: self.dataset.len(),
                    date_span: &date_span,
                    filters: &filters,
                };
                dashboard::render_dashboard(frame, area, report, &ctx, &self.theme);
            }
            Screen::Table => {
                if report.view.is_empty() {
                    table_view::render_no_rows(frame, area, &self.theme);
                } else {
                    table_view::render_table_view(
                        frame,
                        area,
                        report.view.records(),
                        self.preview_rows,
                        &self.theme,
                    );
                }
            }
        }
    }
}

/// Advance a cycle position through `0 ..= option_count`.
fn cycle(index: usize, option_count: usize) -> usize {
    (index + 1) % (option_count + 1)
}

/// Map a cycle position to its constraint; position 0 is unconstrained.
fn selected(options: &[String], index: usize) -> Option<String> {
    if index == 0 {
        None
    } else {
        options.get(index - 1).cloned()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
