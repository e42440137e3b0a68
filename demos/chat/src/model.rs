//! Wire types shared with the chat server.

use serde::{Deserialize, Serialize};

/// Reason the server sends when the requested display name is already connected.
pub const NAME_TAKEN: &str = "name_taken";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub name: String,
    pub message: String,
    /// Seconds since the Unix epoch.
    pub ts: i64,
}

/// A message typed by the user, before the server assigned it an id and time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub name: String,
    pub message: String,
}

/// Frames the server pushes to every client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventPayload {
    Presence { count: u32 },
    Chat { payload: ChatMessage },
    Error { reason: String },
}

/// Frames the client sends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientFrame {
    Join { name: String },
    Chat { payload: NewMessage },
}

/// Parses one inbound frame. Anything that is not a known payload is dropped.
pub fn parse_frame(text: &str) -> Option<EventPayload> {
    match serde_json::from_str(text) {
        Ok(payload) => Some(payload),
        Err(err) => {
            log::debug!("ignoring frame {text:?}: {err}");
            None
        }
    }
}

pub fn encode_frame(frame: &ClientFrame) -> sprout_core::Result<String> {
    serde_json::to_string(frame).map_err(|err| sprout_core::Error::component(err.to_string()))
}

/// `HH:MM:SS` of `ts` shifted by `utc_offset` seconds.
///
/// There is no timezone database here, so the wall clock is whatever offset the
/// host passes in through [`crate::ChatConfig::utc_offset`]; `0` prints UTC.
pub fn format_time(ts: i64, utc_offset: i64) -> String {
    let secs = (ts + utc_offset).rem_euclid(86_400);
    format!("{:02}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
}
