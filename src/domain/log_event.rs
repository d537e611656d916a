use super::LogLevel;
use serde::Serialize;
use tracing::warn;

/// Structured data attached to an event: null, number, string, boolean,
/// sequence or mapping.
pub type Payload = serde_json::Value;

/// Convert any serializable value into a [`Payload`].
///
/// Never fails visibly: a value that cannot be represented becomes `Null`.
pub fn to_payload<T: Serialize + ?Sized>(value: &T) -> Payload {
    match serde_json::to_value(value) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Failed to convert log payload, sending null instead: {e}");
            Payload::Null
        }
    }
}

/// A single emitted log call, shared read-only by every backend.
///
/// Carries no timestamp; each backend stamps the event when it handles it.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub level: LogLevel,
    pub group: String,
    pub message: String,
    pub payload: Payload,
}

impl LogEvent {
    pub fn new(
        level: LogLevel,
        group: impl Into<String>,
        message: impl Into<String>,
        payload: impl Into<Payload>,
    ) -> Self {
        Self {
            level,
            group: group.into(),
            message: message.into(),
            payload: payload.into(),
        }
    }

    pub fn has_payload(&self) -> bool {
        !self.payload.is_null()
    }
}
