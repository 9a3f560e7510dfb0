use anyhow::{Context, Result};
use google_calendar::types::OrderBy;
use shiftsync_core::event::RemoteEvent;
use shiftsync_core::remote::protocol::ListEvents;

use crate::convert::FromGoogle;
use crate::session::Session;

pub async fn handle(cmd: ListEvents) -> Result<Vec<RemoteEvent>> {
    let client = Session::load_valid(cmd.account.as_deref()).await?.client()?;

    let response = client
        .events()
        .list_all(
            &cmd.calendar_id,
            "",
            0,
            OrderBy::StartTime,
            &[],
            "", // search query
            &[],
            false,
            false,
            true, // expand recurring events, required for StartTime ordering
            &cmd.to,
            &cmd.from,
            "",
            "",
        )
        .await
        .context("Failed to fetch events")?;

    response
        .body
        .into_iter()
        .map(RemoteEvent::from_google)
        .collect()
}
