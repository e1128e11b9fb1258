//! Error taxonomy for the engine: transport, protocol, evaluation, state and
//! configuration failures.
//!
//! One root `thiserror` enum, with a `ChannelError` sub-enum for
//! oneshot-channel failures, plus evaluation/state/config variants for this
//! crate's wider surface.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CdpError>;

#[derive(Debug, Error)]
pub enum CdpError {
    /// WebSocket transport failure or unexpected close.
    #[error("websocket transport error: {0}")]
    Ws(#[from] tokio_tungstenite::tungstenite::Error),

    /// The discovery HTTP endpoint (`/json/list`) could not be reached or
    /// returned something unparsable.
    #[error("devtools http discovery error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Channel(#[from] ChannelError),

    /// The connection was detached (or the remote socket closed) while a
    /// call was still waiting for its response.
    #[error("connection lost")]
    ConnectionLost,

    /// A CDP `{error}` envelope that didn't match any known substring in the
    /// protocol-error table; carries enough to diagnose without inspecting
    /// connection internals.
    #[error("protocol error calling {method}: {message} (code {code})")]
    Protocol {
        method: String,
        params: serde_json::Value,
        code: i64,
        message: String,
    },

    #[error("target crashed")]
    TargetCrashed,
    #[error("could not find node with given id")]
    NodeNotFound,
    #[error("root node no longer exists")]
    RootNodeGone,
    #[error("could not compute content quads")]
    ContentQuadsUnavailable,
    #[error("no dialog is showing")]
    NoDialogShowing,
    #[error("no target with given id found")]
    TargetNotFound,
    #[error("no script with given id found")]
    ScriptNotFound,
    #[error("unique context id not found")]
    UniqueContextIdNotFound,
    #[error("locale override already in effect")]
    LocaleOverrideActive,
    #[error("font families can only be set once")]
    FontFamiliesAlreadySet,

    /// `Runtime.evaluate` returned `exceptionDetails`.
    #[error("evaluation failed at {line}:{column}: {text}")]
    Evaluate {
        text: String,
        line: u32,
        column: u32,
    },

    /// An `eval_promise` script's promise rejected instead of resolving.
    #[error("promise evaluation failed: {text}")]
    PromiseEvaluate { text: String },

    /// Caller violated a documented precondition (e.g. `build_script`
    /// without Runtime-watch enabled, `resolve` on an undescribed node).
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// A configuration value required by the caller-facing surface is
    /// missing (e.g. a zero discovery port).
    #[error("missing configuration value: {flag}")]
    MissingConfigValue { flag: &'static str },
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("receiver dropped before a response arrived")]
    Canceled(#[from] tokio::sync::oneshot::error::RecvError),
    #[error("could not deliver message: channel closed")]
    SendFailed,
}

impl From<tokio::sync::oneshot::error::RecvError> for CdpError {
    fn from(err: tokio::sync::oneshot::error::RecvError) -> Self {
        ChannelError::from(err).into()
    }
}

/// Maps a raw CDP `{error}` envelope to a typed variant via the known
/// substring table, falling back to the generic `Protocol` wrapper for
/// anything unrecognized.
pub(crate) fn classify_protocol_error(
    method: &str,
    params: &serde_json::Value,
    code: i64,
    message: &str,
) -> CdpError {
    if message.contains("Target crashed") {
        return CdpError::TargetCrashed;
    }
    if message.contains("Could not find node with given id")
        || message.contains("No node with given id found")
    {
        return CdpError::NodeNotFound;
    }
    if message.contains("Could not compute content quads") {
        return CdpError::ContentQuadsUnavailable;
    }
    if message.contains("No dialog is showing") {
        return CdpError::NoDialogShowing;
    }
    if message.contains("No target with given id found") {
        return CdpError::TargetNotFound;
    }
    if message.contains("No script with given id found") {
        return CdpError::ScriptNotFound;
    }
    if message.contains("uniqueContextId not found") {
        return CdpError::UniqueContextIdNotFound;
    }
    if message.contains("Locale override is already in effect") {
        return CdpError::LocaleOverrideActive;
    }
    if message.contains("Font families can only be set once") {
        return CdpError::FontFamiliesAlreadySet;
    }

    CdpError::Protocol {
        method: method.to_string(),
        params: params.clone(),
        code,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_substrings() {
        let err = classify_protocol_error(
            "DOM.describeNode",
            &serde_json::Value::Null,
            -32000,
            "Could not find node with given id (node id 7)",
        );
        assert!(matches!(err, CdpError::NodeNotFound));
    }

    #[test]
    fn wraps_unknown_errors_with_context() {
        let err = classify_protocol_error(
            "Foo.bar",
            &serde_json::json!({"x": 1}),
            -1,
            "something the table has never heard of",
        );
        match err {
            CdpError::Protocol {
                method, code, message, ..
            } => {
                assert_eq!(method, "Foo.bar");
                assert_eq!(code, -1);
                assert_eq!(message, "something the table has never heard of");
            }
            _ => panic!("expected Protocol variant"),
        }
    }
}
