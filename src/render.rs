//! TUI rendering traits for shiftsync types.
//!
//! Extension traits adding colored terminal output to shiftsync-core types
//! using owo_colors.

use owo_colors::OwoColorize;
use shiftsync_core::{Outcome, SyncReport, TimeEntry};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for TimeEntry {
    fn render(&self) -> String {
        format!(
            "{} {}",
            self,
            format!("({:.2}h)", self.hours()).dimmed()
        )
    }
}

impl Render for Outcome {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        match self {
            Outcome::Created { entry, event, replaced } => {
                for old in replaced {
                    let line = format!("- Deleted {} on {}", old.summary, entry.date());
                    lines.push(format!("   {}", line.red()));
                }

                let line = format!("+ Created {} {}", event.summary, entry);
                match &event.html_link {
                    Some(link) => lines.push(format!("   {} {}", line.green(), link.dimmed())),
                    None => lines.push(format!("   {}", line.green())),
                }
            }
            Outcome::Skipped { entry, existing } => {
                let description = existing
                    .first()
                    .and_then(|event| event.description.as_deref())
                    .unwrap_or_default();
                let line = format!("= Skipped existing event on {}: '{}'", entry.date(), description);
                lines.push(format!("   {}", line.dimmed()));
            }
        }

        lines.join("\n")
    }
}

impl Render for SyncReport {
    fn render(&self) -> String {
        if self.is_empty() {
            return "Nothing to sync.".to_string();
        }

        format!("Synced: {}", summary(self))
    }
}

fn summary(report: &SyncReport) -> String {
    format!(
        "{} created, {} deleted, {} skipped",
        report.created, report.deleted, report.skipped
    )
}
