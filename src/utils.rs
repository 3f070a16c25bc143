use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::types::{MeasurementRecord, MeasurementTableRow};

/// Starts a steady-ticking spinner with `message`. indicatif draws on
/// stderr, so stdout stays clean for JSON output.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

pub fn measurement_table(records: &[MeasurementRecord]) -> Table {
    let rows: Vec<MeasurementTableRow> = records.iter().map(MeasurementTableRow::from).collect();
    Table::new(rows)
}
