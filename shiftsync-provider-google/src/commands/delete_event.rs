use anyhow::{Context, Result};
use google_calendar::types::SendUpdates;
use shiftsync_core::remote::protocol::DeleteEvent;

use crate::session::Session;

pub async fn handle(cmd: DeleteEvent) -> Result<()> {
    let client = Session::load_valid(cmd.account.as_deref()).await?.client()?;

    let result = client
        .events()
        .delete(&cmd.calendar_id, &cmd.event_id, false, SendUpdates::None)
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(e) => {
            // Already deleted
            let error_str = e.to_string();
            if error_str.contains("410") || error_str.contains("Gone") {
                Ok(())
            } else {
                Err(e).with_context(|| format!("Failed to delete event: {}", cmd.event_id))
            }
        }
    }
}
