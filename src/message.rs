//! The CDP wire codec: (un)marshals the three frame shapes exchanged over
//! a target's WebSocket.
//!
//! Kept deliberately dumb — this module has no opinion on what a method or
//! event *means*, only on how the envelope around it is shaped. Domain
//! structs live in `cdp_types`.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::ids::SessionId;

/// `{"id", "method", "params"}` — a request this side is about to send.
#[derive(Debug, Clone, Serialize)]
pub struct MethodCall {
    pub id: u64,
    pub method: Cow<'static, str>,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

/// One incoming frame, before we know whether it's a response or an event.
///
/// CDP doesn't tag frames with a discriminant field; the receiver tells
/// them apart structurally — envelope has `id` vs. envelope has `method`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEnvelope {
    pub id: Option<u64>,
    pub method: Option<String>,
    #[serde(default)]
    pub params: serde_json::Value,
    pub result: Option<serde_json::Value>,
    pub error: Option<ProtocolError>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<SessionId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProtocolError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// A decoded incoming frame, tagged by shape.
#[derive(Debug, Clone)]
pub enum Envelope {
    Response {
        id: u64,
        result: Option<serde_json::Value>,
        error: Option<ProtocolError>,
    },
    Event {
        method: String,
        params: serde_json::Value,
        session_id: Option<SessionId>,
    },
}

impl Envelope {
    pub fn decode(text: &str) -> serde_json::Result<Self> {
        let raw: RawEnvelope = serde_json::from_str(text)?;
        Ok(raw.into())
    }
}

impl From<RawEnvelope> for Envelope {
    fn from(raw: RawEnvelope) -> Self {
        match raw.id {
            Some(id) => Envelope::Response {
                id,
                result: raw.result,
                error: raw.error,
            },
            None => Envelope::Event {
                method: raw.method.unwrap_or_default(),
                params: raw.params,
                session_id: raw.session_id,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_response_envelope() {
        let env = Envelope::decode(r#"{"id":7,"result":{"value":4}}"#).unwrap();
        match env {
            Envelope::Response { id, result, error } => {
                assert_eq!(id, 7);
                assert_eq!(result.unwrap()["value"], 4);
                assert!(error.is_none());
            }
            _ => panic!("expected response"),
        }
    }

    #[test]
    fn decodes_error_response_envelope() {
        let env =
            Envelope::decode(r#"{"id":1,"error":{"code":-32000,"message":"boom"}}"#).unwrap();
        match env {
            Envelope::Response { error: Some(e), .. } => {
                assert_eq!(e.code, -32000);
                assert_eq!(e.message, "boom");
            }
            _ => panic!("expected error response"),
        }
    }

    #[test]
    fn decodes_event_envelope() {
        let env = Envelope::decode(
            r#"{"method":"Page.frameStartedLoading","params":{"frameId":"F1"}}"#,
        )
        .unwrap();
        match env {
            Envelope::Event {
                method, params, ..
            } => {
                assert_eq!(method, "Page.frameStartedLoading");
                assert_eq!(params["frameId"], "F1");
            }
            _ => panic!("expected event"),
        }
    }

    #[test]
    fn serializes_method_call_without_session_or_params() {
        let call = MethodCall {
            id: 1,
            method: "Runtime.enable".into(),
            session_id: None,
            params: serde_json::Value::Null,
        };
        let v = serde_json::to_value(&call).unwrap();
        assert!(v.get("sessionId").is_none());
        assert!(v.get("params").is_none());
    }
}
