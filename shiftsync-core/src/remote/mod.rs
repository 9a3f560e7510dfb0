pub mod protocol;
pub mod provider;

use crate::backend::CalendarBackend;
use crate::error::SyncResult;
use crate::event::{DayWindow, NewEvent, RemoteEvent};
use crate::remote::protocol::{CreateEvent, DeleteEvent, ListEvents};
use crate::remote::provider::Provider;

/// A calendar reached through a provider binary.
#[derive(Debug, Clone)]
pub struct Remote {
    pub provider: Provider,
    /// Provider account to act as; `None` lets the provider pick its only session
    pub account: Option<String>,
}

impl Remote {
    pub fn new(provider: Provider, account: Option<String>) -> Self {
        Remote { provider, account }
    }
}

impl CalendarBackend for Remote {
    async fn list_events(&self, calendar_id: &str, window: &DayWindow) -> SyncResult<Vec<RemoteEvent>> {
        self.provider
            .call(ListEvents {
                account: self.account.clone(),
                calendar_id: calendar_id.to_string(),
                from: window.start_rfc3339(),
                to: window.end_rfc3339(),
            })
            .await
    }

    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> SyncResult<RemoteEvent> {
        self.provider
            .call(CreateEvent {
                account: self.account.clone(),
                calendar_id: calendar_id.to_string(),
                event: event.clone(),
            })
            .await
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> SyncResult<()> {
        self.provider
            .call(DeleteEvent {
                account: self.account.clone(),
                calendar_id: calendar_id.to_string(),
                event_id: event_id.to_string(),
            })
            .await
    }
}
