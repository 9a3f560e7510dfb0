use anyhow::{Context, Result};
use google_calendar::types::SendUpdates;
use shiftsync_core::event::RemoteEvent;
use shiftsync_core::remote::protocol::CreateEvent;

use crate::convert::{FromGoogle, ToGoogle};
use crate::session::Session;

pub async fn handle(cmd: CreateEvent) -> Result<RemoteEvent> {
    let client = Session::load_valid(cmd.account.as_deref()).await?.client()?;

    let google_event: google_calendar::types::Event = cmd.event.to_google()?;

    let response = client
        .events()
        .insert(
            &cmd.calendar_id,
            0,
            0,
            false,
            SendUpdates::None,
            false,
            &google_event,
        )
        .await
        .with_context(|| format!("Failed to create event: {}", &google_event.summary))?;

    RemoteEvent::from_google(response.body)
}
