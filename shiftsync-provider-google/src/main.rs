//! shiftsync-provider-google - Google Calendar provider for shiftsync
//!
//! This binary implements the shiftsync provider protocol, communicating
//! with the CLI via JSON over stdin/stdout.
//!
//! The provider manages its own credentials and tokens:
//!   ~/.config/shiftsync/providers/google/credentials.json
//!   ~/.config/shiftsync/providers/google/session/{account}.toml

mod app_config;
mod commands;
mod convert;
mod session;

use std::future::Future;

use anyhow::Result;
use serde::de::DeserializeOwned;
use shiftsync_core::remote::protocol::{Command, ProviderCommand, Request, Response};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle_request(request).await?,
            Err(e) => Response::error(&format!("Failed to parse request: {}", e))?,
        };

        stdout.write_all(format!("{response}\n").as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}

async fn handle_request(request: Request) -> serde_json::Result<String> {
    tracing::debug!(command = ?request.command, "Handling request");

    match request.command {
        Command::Authenticate => respond(request.params, commands::authenticate::handle).await,
        Command::ListEvents => respond(request.params, commands::list_events::handle).await,
        Command::CreateEvent => respond(request.params, commands::create_event::handle).await,
        Command::DeleteEvent => respond(request.params, commands::delete_event::handle).await,
    }
}

/// Decode the params as `C`, run the handler and encode its result.
async fn respond<C, F, Fut>(params: serde_json::Value, handler: F) -> serde_json::Result<String>
where
    C: ProviderCommand + DeserializeOwned,
    F: FnOnce(C) -> Fut,
    Fut: Future<Output = Result<C::Response>>,
{
    let cmd: C = match serde_json::from_value(params) {
        Ok(cmd) => cmd,
        Err(e) => return Response::error(&format!("Invalid params: {}", e)),
    };

    match handler(cmd).await {
        Ok(data) => Response::success(data),
        Err(e) => {
            tracing::debug!(error = %e, "Command failed");
            Response::error(&format!("{:#}", e))
        }
    }
}
