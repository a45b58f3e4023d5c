use colored::{ColoredString, Colorize};
use humansize::{format_size, BINARY};

use crate::core::pressure::PressureTier;

/// Format a byte count in human-readable binary units (KiB, MiB, GiB)
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, BINARY)
}

/// Format a percentage value with one decimal place
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Colored label for a pressure tier
pub fn tier_label(tier: PressureTier) -> ColoredString {
    match tier {
        PressureTier::Green => "green".green(),
        PressureTier::Yellow => "yellow".yellow(),
        PressureTier::Red => "red".red().bold(),
    }
}
