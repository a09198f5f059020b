//! Typed `postMessage` envelopes exchanged with the host desktop.
//!
//! Every frame is a JSON object discriminated by its `type` field. Inbound
//! frames are validated here before any handler runs; an unknown
//! discriminant and a shape failure surface as distinct [`WireError`]
//! variants because the session treats them differently when logging.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::context::CustomerContext;

/// Inbound `type` discriminants the console understands.
pub const HOST_MESSAGE_TYPES: [&str; 6] = [
    "host.ping",
    "health.ping",
    "host.state",
    "intent.changed",
    "context.updated",
    "host.ack",
];

/// Outbound `type` discriminants the console emits.
pub const CONSOLE_MESSAGE_TYPES: [&str; 5] = [
    "embed.ready",
    "health.pong",
    "resize",
    "kms.open",
    "intent.selected",
];

/// Older hosts announced readiness as `app.ready`; still accepted on
/// decode so captured traffic from them parses.
pub const READY_LEGACY_ALIAS: &str = "app.ready";

/// Failure to decode or encode a single frame.
#[derive(Debug, Error)]
pub enum WireError {
    /// The frame was not a JSON object carrying a string `type` field.
    #[error("frame is not a tagged JSON object: {detail}")]
    NotAnEnvelope { detail: String },
    /// The discriminant is not part of the protocol. Hosts ship features
    /// ahead of the console; these frames are ignored, never fatal.
    #[error("unrecognized message type `{message_type}`")]
    UnrecognizedType { message_type: String },
    /// The discriminant was known but the payload failed validation.
    #[error("malformed `{message_type}` payload: {detail}")]
    MalformedPayload { message_type: String, detail: String },
    #[error("failed to encode `{message_type}` frame: {detail}")]
    Encode { message_type: String, detail: String },
}

/// Frames the host page sends to the embedded console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum HostMessage {
    /// Presence probe. Answered with exactly one readiness frame echoing
    /// the probe's `tabId`.
    #[serde(rename = "host.ping")]
    HostPing {
        #[serde(skip_serializing_if = "Option::is_none")]
        tab_id: Option<String>,
    },
    /// Liveness probe, answered with `health.pong`.
    #[serde(rename = "health.ping")]
    HealthPing,
    /// Full session state push. Replaces the console's context record.
    #[serde(rename = "host.state")]
    HostState { context: CustomerContext },
    /// The agent switched intents mid-session.
    #[serde(rename = "intent.changed")]
    IntentChanged {
        intent: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        context: Option<CustomerContext>,
    },
    /// Incremental context update, merged shallowly.
    #[serde(rename = "context.updated")]
    ContextUpdated { context: CustomerContext },
    /// Host saw a readiness announcement; stops the announce schedule.
    #[serde(rename = "host.ack")]
    HostAck {
        #[serde(skip_serializing_if = "Option::is_none")]
        tab_id: Option<String>,
    },
}

impl HostMessage {
    /// Decode one inbound frame, classifying failures per [`WireError`].
    pub fn from_json(raw: &str) -> Result<Self, WireError> {
        decode_tagged(raw, |tag| HOST_MESSAGE_TYPES.contains(&tag))
    }

    pub fn to_json(&self) -> Result<String, WireError> {
        encode_tagged(self, self.message_type())
    }

    /// The wire discriminant for this frame.
    pub fn message_type(&self) -> &'static str {
        match self {
            HostMessage::HostPing { .. } => "host.ping",
            HostMessage::HealthPing => "health.ping",
            HostMessage::HostState { .. } => "host.state",
            HostMessage::IntentChanged { .. } => "intent.changed",
            HostMessage::ContextUpdated { .. } => "context.updated",
            HostMessage::HostAck { .. } => "host.ack",
        }
    }
}

/// Frames the embedded console sends to the host page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ConsoleMessage {
    /// Readiness announcement, sent on a schedule until acknowledged and
    /// in reply to every `host.ping`.
    #[serde(rename = "embed.ready", alias = "app.ready")]
    Ready {
        #[serde(skip_serializing_if = "Option::is_none")]
        tab_id: Option<String>,
        ready: bool,
        /// Unix milliseconds at construction.
        timestamp: i64,
    },
    #[serde(rename = "health.pong")]
    HealthPong,
    /// Content height report so the host can size the iframe.
    #[serde(rename = "resize")]
    Resize { height: u32 },
    /// Ask the host to open a knowledge-base article.
    #[serde(rename = "kms.open")]
    KmsOpen { article_id: String },
    /// The agent picked a service from the launcher.
    #[serde(rename = "intent.selected")]
    IntentSelected { intent: String },
}

impl ConsoleMessage {
    /// Build a readiness announcement stamped with the current wall clock.
    pub fn ready(tab_id: Option<String>) -> Self {
        ConsoleMessage::Ready {
            tab_id,
            ready: true,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, WireError> {
        decode_tagged(raw, |tag| {
            CONSOLE_MESSAGE_TYPES.contains(&tag) || tag == READY_LEGACY_ALIAS
        })
    }

    pub fn to_json(&self) -> Result<String, WireError> {
        encode_tagged(self, self.message_type())
    }

    /// The wire discriminant for this frame.
    pub fn message_type(&self) -> &'static str {
        match self {
            ConsoleMessage::Ready { .. } => "embed.ready",
            ConsoleMessage::HealthPong => "health.pong",
            ConsoleMessage::Resize { .. } => "resize",
            ConsoleMessage::KmsOpen { .. } => "kms.open",
            ConsoleMessage::IntentSelected { .. } => "intent.selected",
        }
    }
}

fn decode_tagged<T, F>(raw: &str, recognizes: F) -> Result<T, WireError>
where
    T: serde::de::DeserializeOwned,
    F: Fn(&str) -> bool,
{
    let value: Value = serde_json::from_str(raw).map_err(|err| WireError::NotAnEnvelope {
        detail: err.to_string(),
    })?;
    let Some(message_type) = value.get("type").and_then(Value::as_str) else {
        return Err(WireError::NotAnEnvelope {
            detail: "missing string `type` field".to_string(),
        });
    };
    if !recognizes(message_type) {
        return Err(WireError::UnrecognizedType {
            message_type: message_type.to_string(),
        });
    }
    let message_type = message_type.to_string();
    serde_json::from_value(value).map_err(|err| WireError::MalformedPayload {
        message_type,
        detail: err.to_string(),
    })
}

fn encode_tagged<T: Serialize>(frame: &T, message_type: &str) -> Result<String, WireError> {
    serde_json::to_string(frame).map_err(|err| WireError::Encode {
        message_type: message_type.to_string(),
        detail: err.to_string(),
    })
}
