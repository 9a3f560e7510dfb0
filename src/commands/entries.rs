use anyhow::Result;
use owo_colors::OwoColorize;
use shiftsync_core::{ColumnOutcome, EntryParser, SyncConfig};

use crate::commands::{open_workbook, today};
use crate::render::Render;

/// Parse the workbook and print what a sync would work on.
pub fn run(config: &SyncConfig, verbose: bool) -> Result<()> {
    let workbook = open_workbook(config)?;
    let parser = EntryParser::new(today(config), config.days_back)
        .with_labels(config.row_labels.clone());

    if let Some(cutoff) = parser.cutoff() {
        println!("{}", format!("Only days from {cutoff} on").dimmed());
    }

    let mut total = 0;

    for sheet in &workbook.sheets {
        println!("{}", sheet.name.bold());

        let Some(outcomes) = parser.parse_sheet_outcomes(sheet)? else {
            println!(
                "   {}",
                format!("(no '{}' row, not a timesheet)", config.row_labels.date).dimmed()
            );
            continue;
        };

        let mut count = 0;
        for (column, outcome) in outcomes {
            match outcome {
                ColumnOutcome::Entry(entry) => {
                    count += 1;
                    println!("   {}", entry.render());
                }
                ColumnOutcome::Skipped(reason) if verbose => {
                    println!("   {}", format!("~ {}: {}", column.id, reason).dimmed());
                }
                ColumnOutcome::Skipped(_) => {}
            }
        }

        if count == 0 {
            println!("   {}", "(no entries)".dimmed());
        }
        total += count;
    }

    println!("\n{} {}", total, if total == 1 { "entry" } else { "entries" });

    Ok(())
}
