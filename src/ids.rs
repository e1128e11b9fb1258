//! Newtype wrappers around the string/int identifiers CDP hands back
//! (`TargetId`, `SessionId`, ...) instead of passing bare `String`s around.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifies one inspectable target (page, worker, iframe, ...).
    TargetId
);
string_id!(
    /// Identifies a CDP session attached to a target ("flat" mode).
    SessionId
);
string_id!(
    /// Identifies a frame within a page's frame tree.
    FrameId
);
string_id!(
    /// Identifies an in-flight network request under `Fetch`/`Network`.
    RequestId
);
string_id!(
    /// Identifies a document loader, used to tell navigations apart.
    LoaderId
);
string_id!(
    /// Opaque handle to a JS value living in the renderer.
    RemoteObjectId
);
string_id!(
    /// The stable identifier CDP assigns a backend DOM node.
    BackendNodeId
);

/// `DOM.NodeId`: a session-local integer handle to a DOM node.
///
/// Unlike the other ids this is numeric on the wire, so it gets its own
/// newtype instead of using the `string_id!` macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

/// `Runtime.ExecutionContextId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionContextId(pub i64);

/// `Runtime.UniqueContextId`: required to evaluate inside a specific
/// isolated world / frame after navigations invalidate `ExecutionContextId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniqueContextId(pub String);
