pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use colored::{Color, Colorize};
use fincalc_core::settings::{Settings, Theme};

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value, settings: &Settings) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value, settings),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Heading colour for table sections, chosen to stay legible on the
/// configured terminal background.
pub(crate) fn heading(text: &str, theme: Theme) -> String {
    let color = match theme {
        Theme::Dark => Color::BrightYellow,
        Theme::Light => Color::Blue,
        Theme::System => Color::Yellow,
    };
    text.color(color).bold().to_string()
}
