//! The calendar operations the reconciler needs.

use crate::error::SyncResult;
use crate::event::{DayWindow, NewEvent, RemoteEvent};

/// A calendar that can be listed, inserted into and deleted from.
///
/// Calls are awaited one at a time; implementations need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait CalendarBackend {
    /// Events overlapping `window`, ordered by start time.
    async fn list_events(&self, calendar_id: &str, window: &DayWindow) -> SyncResult<Vec<RemoteEvent>>;

    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> SyncResult<RemoteEvent>;

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> SyncResult<()>;
}
