//! Execution-context manager: tracks CDP execution contexts per
//! connection, keyed so a caller can find "the default context for this
//! frame" after navigations reshuffle ids. Kept standalone rather than
//! folded into a frame manager, since nothing else in this crate tracks
//! frame state.

use serde::Deserialize;
use tokio::sync::RwLock;

use crate::ids::{ExecutionContextId, FrameId, UniqueContextId};

/// `Runtime.ExecutionContextDescription.auxData`, the subset this crate
/// reads: whether the context is the frame's default, its declared type,
/// and the owning frame id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutionContextAux {
    #[serde(rename = "isDefault", default)]
    pub is_default: bool,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(rename = "frameId")]
    pub frame_id: Option<FrameId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionContextDescription {
    pub id: ExecutionContextId,
    #[serde(rename = "uniqueId")]
    pub unique_id: UniqueContextId,
    pub origin: String,
    pub name: String,
    #[serde(rename = "auxData", default)]
    pub aux_data: ExecutionContextAux,
}

#[derive(Debug, Deserialize)]
struct ExecutionContextCreatedEvent {
    context: ExecutionContextDescription,
}

#[derive(Debug, Deserialize)]
struct ExecutionContextDestroyedEvent {
    #[serde(rename = "executionContextId")]
    execution_context_id: ExecutionContextId,
}

#[derive(Default)]
pub struct ExecutionContextManager {
    contexts: RwLock<Vec<ExecutionContextDescription>>,
}

impl ExecutionContextManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one `Runtime.*` event's raw params through here; unrelated
    /// methods are ignored so callers can pass every event through
    /// unconditionally.
    pub async fn on_event(&self, method: &str, params: &serde_json::Value) {
        match method {
            "Runtime.executionContextCreated" => {
                if let Ok(ev) =
                    serde_json::from_value::<ExecutionContextCreatedEvent>(params.clone())
                {
                    self.contexts.write().await.push(ev.context);
                }
            }
            "Runtime.executionContextDestroyed" => {
                if let Ok(ev) =
                    serde_json::from_value::<ExecutionContextDestroyedEvent>(params.clone())
                {
                    self.contexts
                        .write()
                        .await
                        .retain(|c| c.id != ev.execution_context_id);
                }
            }
            "Runtime.executionContextsCleared" => {
                self.contexts.write().await.clear();
            }
            _ => {}
        }
    }

    /// Returns the default execution context for a frame, if tracked.
    pub async fn default_for(&self, frame_id: &FrameId) -> Option<ExecutionContextDescription> {
        self.contexts
            .read()
            .await
            .iter()
            .find(|c| c.aux_data.is_default && c.aux_data.frame_id.as_ref() == Some(frame_id))
            .cloned()
    }

    pub async fn all(&self) -> Vec<ExecutionContextDescription> {
        self.contexts.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn created(id: i64, frame: &str, is_default: bool) -> serde_json::Value {
        serde_json::json!({
            "context": {
                "id": id,
                "uniqueId": format!("uid-{id}"),
                "origin": "https://example.test",
                "name": "",
                "auxData": {"isDefault": is_default, "type": "default", "frameId": frame}
            }
        })
    }

    #[tokio::test]
    async fn tracks_created_and_finds_default_for_frame() {
        let mgr = ExecutionContextManager::new();
        mgr.on_event("Runtime.executionContextCreated", &created(1, "F1", true))
            .await;

        let ctx = mgr.default_for(&FrameId::new("F1")).await.unwrap();
        assert_eq!(ctx.id.0, 1);
    }

    #[tokio::test]
    async fn destroyed_removes_by_id() {
        let mgr = ExecutionContextManager::new();
        mgr.on_event("Runtime.executionContextCreated", &created(1, "F1", true))
            .await;
        mgr.on_event(
            "Runtime.executionContextDestroyed",
            &serde_json::json!({"executionContextId": 1}),
        )
        .await;

        assert!(mgr.default_for(&FrameId::new("F1")).await.is_none());
    }

    #[tokio::test]
    async fn cleared_empties_the_set() {
        let mgr = ExecutionContextManager::new();
        mgr.on_event("Runtime.executionContextCreated", &created(1, "F1", true))
            .await;
        mgr.on_event("Runtime.executionContextsCleared", &serde_json::Value::Null)
            .await;

        assert!(mgr.all().await.is_empty());
    }

    #[tokio::test]
    async fn non_default_context_is_not_returned_as_default() {
        let mgr = ExecutionContextManager::new();
        mgr.on_event("Runtime.executionContextCreated", &created(1, "F1", false))
            .await;
        assert!(mgr.default_for(&FrameId::new("F1")).await.is_none());
    }
}
