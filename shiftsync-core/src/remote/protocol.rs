//! Defines the JSON protocol used for communication between shiftsync
//! and provider binaries over stdin/stdout.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::event::{NewEvent, RemoteEvent};

pub trait ProviderCommand: Serialize {
    type Response: Serialize + DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Authenticate,
    ListEvents,
    CreateEvent,
    DeleteEvent,
}

/// Request sent from the CLI to a provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent from a provider to the CLI.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> serde_json::Result<String> {
        serde_json::to_string(&Response::Success { data })
    }
}

impl Response<()> {
    pub fn error(msg: &str) -> serde_json::Result<String> {
        serde_json::to_string(&Response::<()>::Error {
            error: msg.to_string(),
        })
    }
}

/// Run the provider's interactive sign-in.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Authenticate {}

impl ProviderCommand for Authenticate {
    type Response = String; // Account identifier (e.g., email)
    fn command() -> Command {
        Command::Authenticate
    }
}

/// List events within a time range.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListEvents {
    pub account: Option<String>,
    pub calendar_id: String,
    /// RFC 3339, inclusive
    pub from: String,
    /// RFC 3339, exclusive
    pub to: String,
}

impl ProviderCommand for ListEvents {
    type Response = Vec<RemoteEvent>;
    fn command() -> Command {
        Command::ListEvents
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateEvent {
    pub account: Option<String>,
    pub calendar_id: String,
    pub event: NewEvent,
}

impl ProviderCommand for CreateEvent {
    type Response = RemoteEvent;
    fn command() -> Command {
        Command::CreateEvent
    }
}

/// Delete an event by ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteEvent {
    pub account: Option<String>,
    pub calendar_id: String,
    pub event_id: String,
}

impl ProviderCommand for DeleteEvent {
    type Response = ();
    fn command() -> Command {
        Command::DeleteEvent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let params = serde_json::to_value(DeleteEvent {
            account: Some("me@example.com".into()),
            calendar_id: "primary".into(),
            event_id: "evt1".into(),
        })
        .unwrap();
        let request = Request {
            command: DeleteEvent::command(),
            params,
        };

        let json: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert_eq!(json["command"], "delete_event");
        assert_eq!(json["params"]["event_id"], "evt1");
        assert_eq!(json["params"]["calendar_id"], "primary");
    }

    #[test]
    fn test_response_wire_format() {
        let ok = Response::success("me@example.com").unwrap();
        assert_eq!(ok, r#"{"status":"success","data":"me@example.com"}"#);

        let err = Response::error("Token expired").unwrap();
        assert_eq!(err, r#"{"status":"error","error":"Token expired"}"#);

        let parsed: Response<()> = serde_json::from_str(r#"{"status":"success","data":null}"#).unwrap();
        assert!(matches!(parsed, Response::Success { .. }));
    }
}
