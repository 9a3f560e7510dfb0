//! One full run: workbook in, calendar updated, report out.

use chrono::NaiveDate;
use tracing::info;

use crate::backend::CalendarBackend;
use crate::config::SyncConfig;
use crate::error::SyncResult;
use crate::parse::EntryParser;
use crate::reconcile::{Outcome, Reconciler, SyncReport};
use crate::sheet::Workbook;

/// Parse `workbook` and reconcile every entry, strictly in order.
///
/// `on_outcome` sees each result as soon as it is known. The first error
/// aborts the run; entries reconciled before it stay applied.
pub async fn run<B, F>(
    config: &SyncConfig,
    workbook: &Workbook,
    backend: &B,
    today: NaiveDate,
    mut on_outcome: F,
) -> SyncResult<SyncReport>
where
    B: CalendarBackend,
    F: FnMut(&Outcome),
{
    let entries = EntryParser::new(today, config.days_back)
        .with_labels(config.row_labels.clone())
        .parse_workbook(workbook)?;
    info!(count = entries.len(), "Parsed time entries");

    let reconciler = Reconciler::new(backend, config);
    let mut report = SyncReport::default();

    for entry in &entries {
        let outcome = reconciler.reconcile(entry).await?;
        report.record(&outcome);
        on_outcome(&outcome);
    }

    Ok(report)
}
