//! Formatting utilities for CLI output.

use crate::services::waveform::PlaybackSnapshot;

use super::script::StepReport;

/// ANSI color codes for terminal output
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";
    /// Red color
    pub const RED: &'static str = "\x1b[31m";
    /// Cyan color
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Formats error messages with styling
pub fn format_error(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::RED, text, Colors::RESET)
}

/// Formats a snapshot as one human-readable line.
pub fn format_snapshot(snapshot: &PlaybackSnapshot) -> String {
    let Some(player) = snapshot.player else {
        return format!(
            "{}no player{} vol {:.0}%",
            Colors::DIM,
            Colors::RESET,
            *snapshot.volume
        );
    };

    let state = if snapshot.playing { "playing" } else { "paused" };
    format!(
        "{} {} {:.3}/{:.3}s x{} vol {:.0}% regions {}",
        player,
        state,
        snapshot.current_time,
        snapshot.duration,
        snapshot.rate,
        *snapshot.volume,
        snapshot.regions
    )
}

/// Formats a step report with a styled step header.
pub fn format_report(report: &StepReport) -> String {
    let outcome = report
        .outcome
        .map(|outcome| format!(" ({outcome:?})"))
        .unwrap_or_default();

    format!(
        "{}{}{:>3} {:<10}{}{} {}",
        Colors::BOLD,
        Colors::CYAN,
        report.step,
        report.action,
        Colors::RESET,
        outcome,
        format_snapshot(&report.snapshot)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::waveform::VolumePercent;

    fn snapshot() -> PlaybackSnapshot {
        PlaybackSnapshot {
            player: None,
            playing: false,
            current_time: 0.0,
            duration: 0.0,
            rate: 1.0,
            volume: VolumePercent::new(80.0),
            regions: 0,
        }
    }

    #[test]
    fn uninitialized_snapshot_mentions_volume() {
        let line = format_snapshot(&snapshot());
        assert!(line.contains("no player"));
        assert!(line.contains("80%"));
    }
}
