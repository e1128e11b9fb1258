//! Promise channel bridge: injects a `.then(...)` tail that reports its
//! result back over `console.info`, and resolves a one-shot channel keyed
//! by a hash of the expression text once that report arrives.
//!
//! Two concurrent callers with byte-identical expression text collide on
//! the same `channel_id` and therefore the same channel — deliberately not
//! fixed; see DESIGN.md for the reasoning. Callers that can't accept that
//! should give each call syntactically distinct text.

use fnv::FnvHasher;
use std::hash::{Hash, Hasher};
use tokio::sync::oneshot;
use tokio::sync::RwLock;

use crate::error::{CdpError, Result};
use std::collections::HashMap;

/// Computes the channel id for an `eval_promise` expression: a hash of the
/// expression text, stringified. Two concurrent callers with byte-identical
/// expressions collide on purpose (see module docs); callers that can't
/// accept that should give each call syntactically distinct text.
pub fn channel_id_for(expression: &str) -> String {
    let mut hasher = FnvHasher::default();
    expression.hash(&mut hasher);
    hasher.finish().to_string()
}

/// Rewrites an `eval_promise` expression's mandatory `.then(result)` tail
/// into the console.info-reporting form. Returns an error if the
/// expression doesn't end with the required tail.
pub fn rewrite_promise_tail(expression: &str, channel_id: &str) -> Result<String> {
    let trimmed = expression.trim_end();
    let trimmed = trimmed.strip_suffix(';').unwrap_or(trimmed);
    let Some(prefix) = trimmed.strip_suffix(".then(result)") else {
        return Err(CdpError::InvalidState(
            "eval_promise expression must end with \".then(result)\"",
        ));
    };
    Ok(format!(
        "{prefix}.then(result => console.info(JSON.stringify({{channel_id: '{channel_id}', result: result}})))"
    ))
}

#[derive(Default)]
pub struct PromiseChannels {
    pending: RwLock<HashMap<String, oneshot::Sender<serde_json::Value>>>,
}

impl PromiseChannels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fresh one-shot channel for `channel_id`; must be called
    /// before the rewritten expression is sent, for the same reason the
    /// connection pre-inserts response slots before sending a call.
    pub async fn register(&self, channel_id: String) -> oneshot::Receiver<serde_json::Value> {
        let (tx, rx) = oneshot::channel();
        self.pending.write().await.insert(channel_id, tx);
        rx
    }

    /// Delivers a result to the channel waiting on `channel_id`, if any.
    /// Channels are single-use: once popped they're gone and never reused.
    pub async fn deliver(&self, channel_id: &str, result: serde_json::Value) -> bool {
        if let Some(tx) = self.pending.write().await.remove(channel_id) {
            tx.send(result).is_ok()
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_then_result_tail() {
        let rewritten = rewrite_promise_tail("fetch('x').then(result)", "42").unwrap();
        assert!(rewritten.starts_with("fetch('x').then(result => console.info("));
        assert!(rewritten.contains("channel_id: '42'"));
    }

    #[test]
    fn rejects_expression_without_required_tail() {
        let err = rewrite_promise_tail("fetch('x').then(r => r.json())", "1").unwrap_err();
        assert!(matches!(err, CdpError::InvalidState(_)));
    }

    #[test]
    fn channel_id_is_deterministic_for_same_text() {
        assert_eq!(channel_id_for("a.then(result)"), channel_id_for("a.then(result)"));
    }

    #[tokio::test]
    async fn deliver_resolves_registered_receiver_once() {
        let channels = PromiseChannels::new();
        let rx = channels.register("c1".into()).await;

        assert!(channels.deliver("c1", serde_json::json!(200)).await);
        assert_eq!(rx.await.unwrap(), serde_json::json!(200));

        // second delivery to the same (now-consumed) id is a no-op
        assert!(!channels.deliver("c1", serde_json::json!(0)).await);
    }
}
