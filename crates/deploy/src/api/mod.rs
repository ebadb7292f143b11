pub mod client;
pub mod v4;

use serde::{Deserialize, Serialize};

/// Response envelope wrapped around every platform payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    pub result: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Error code the platform attaches to a rejected or missing API token.
pub const AUTH_ERROR_CODE: i64 = 10000;

/// Whether an error list reports an authentication failure.
pub fn has_auth_error(messages: &[ApiMessage]) -> bool {
    messages.iter().any(|m| m.code == AUTH_ERROR_CODE)
}

/// Join the messages of an error list the way the platform's dashboard shows them.
pub fn join_messages(messages: &[ApiMessage]) -> Option<String> {
    let joined = messages
        .iter()
        .map(|m| {
            if m.message.is_empty() {
                "Unknown error"
            } else {
                m.message.as_str()
            }
        })
        .collect::<Vec<_>>()
        .join("; ");

    (!joined.is_empty()).then_some(joined)
}
