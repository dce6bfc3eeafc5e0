//! Host lifecycle events.
//!
//! The host delivers events as JSON objects tagged by `type`. Only
//! `message.updated` and `session.idle` carry meaning here; every other
//! event type deserializes to [`HostEvent::Other`].

use serde::Deserialize;

use crate::COPILOT_PROVIDER_PREFIX;
use crate::error::CoreError;

/// An event delivered by the host's event bus.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum HostEvent {
    /// A chat message was created or updated.
    #[serde(rename = "message.updated")]
    MessageUpdated {
        /// Event payload.
        properties: MessageUpdated,
    },
    /// A session finished processing and is waiting for input.
    #[serde(rename = "session.idle")]
    SessionIdle {
        /// Event payload.
        properties: SessionIdle,
    },
    /// Any event type this plugin does not react to.
    #[serde(other)]
    Other,
}

/// Payload of `message.updated`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageUpdated {
    /// The message metadata.
    pub info: MessageInfo,
}

/// Payload of `session.idle`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionIdle {
    /// The session that went idle.
    #[serde(rename = "sessionID")]
    pub session_id: String,
}

/// Message metadata, tagged by author role.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum MessageInfo {
    /// A message authored by the model.
    Assistant {
        /// Provider that served the message (e.g. `github-copilot`).
        #[serde(rename = "providerID")]
        provider_id: String,
        /// Model that produced the message.
        #[serde(rename = "modelID", default)]
        model_id: String,
    },
    /// A message authored by the user.
    User,
    /// Any other role.
    #[serde(other)]
    Other,
}

impl HostEvent {
    /// Parses a single JSON-encoded event.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Serialization` if the JSON is malformed or a
    /// known event type is missing required fields.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds a `message.updated` event for an assistant message.
    pub fn assistant_message(provider_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self::MessageUpdated {
            properties: MessageUpdated {
                info: MessageInfo::Assistant {
                    provider_id: provider_id.into(),
                    model_id: model_id.into(),
                },
            },
        }
    }

    /// Builds a `message.updated` event for a user message.
    pub fn user_message() -> Self {
        Self::MessageUpdated {
            properties: MessageUpdated {
                info: MessageInfo::User,
            },
        }
    }

    /// Builds a `session.idle` event.
    pub fn session_idle(session_id: impl Into<String>) -> Self {
        Self::SessionIdle {
            properties: SessionIdle {
                session_id: session_id.into(),
            },
        }
    }

    /// Returns the event's wire name, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MessageUpdated { .. } => "message.updated",
            Self::SessionIdle { .. } => "session.idle",
            Self::Other => "other",
        }
    }
}

impl MessageInfo {
    /// Returns the provider id for assistant messages.
    pub fn assistant_provider(&self) -> Option<&str> {
        match self {
            Self::Assistant { provider_id, .. } => Some(provider_id.as_str()),
            Self::User | Self::Other => None,
        }
    }
}

/// Returns true if a provider id belongs to the Copilot provider family.
pub fn is_copilot_provider(provider_id: &str) -> bool {
    provider_id.starts_with(COPILOT_PROVIDER_PREFIX)
}
