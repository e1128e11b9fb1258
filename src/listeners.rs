//! Listener registry: two maps — event-name → ordered handlers, and
//! JS-callback-name → single handler.
//!
//! Handlers are type-erased async closures with no inherent identity by
//! name, so "registering the same handler" is expressed as `Arc` pointer
//! equality on the boxed closure, and "callback name" is an explicit string
//! the caller supplies at registration — the same string a page-side
//! bootstrap script embeds as `func_name` when it reports back over
//! `console.info`.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::RwLock;

pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A handler bound to a CDP event name; receives the event's `params`.
pub type EventHandler = Arc<dyn Fn(serde_json::Value) -> BoxFuture + Send + Sync>;

/// A handler bound to a JS-callback name; receives the decoded `args` list
/// from `console.info(JSON.stringify({func_name, args}))`.
pub type JsCallbackHandler = Arc<dyn Fn(Vec<serde_json::Value>) -> BoxFuture + Send + Sync>;

#[derive(Default)]
pub struct ListenerRegistry {
    events: RwLock<HashMap<String, Vec<EventHandler>>>,
    callbacks: RwLock<HashMap<String, JsCallbackHandler>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers under the given event name. Idempotent on handler identity
    /// (`Arc` pointer equality) — re-registering the exact same handler for
    /// the same event is a no-op.
    pub async fn add_event_listener(&self, event: impl Into<String>, handler: EventHandler) {
        let event = event.into();
        let mut map = self.events.write().await;
        let entries = map.entry(event).or_default();
        if !entries.iter().any(|h| Arc::ptr_eq(h, &handler)) {
            entries.push(handler);
        }
    }

    pub async fn remove_event_listener(&self, event: &str, handler: &EventHandler) {
        let mut map = self.events.write().await;
        if let Some(entries) = map.get_mut(event) {
            entries.retain(|h| !Arc::ptr_eq(h, handler));
        }
    }

    pub async fn remove_all_for_event(&self, event: &str) {
        self.events.write().await.remove(event);
    }

    /// Snapshots the handler list for one event before fan-out, so that
    /// listener-map mutations racing with dispatch can't corrupt iteration.
    pub async fn snapshot_for_event(&self, event: &str) -> Vec<EventHandler> {
        self.events
            .read()
            .await
            .get(event)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn has_any_event_listener(&self) -> bool {
        self.events.read().await.values().any(|v| !v.is_empty())
    }

    /// Registers a JS-callback listener by name. Last registration wins on
    /// a name collision.
    pub async fn add_listener(&self, name: impl Into<String>, handler: JsCallbackHandler) {
        self.callbacks.write().await.insert(name.into(), handler);
    }

    pub async fn remove_listener(&self, name: &str) {
        self.callbacks.write().await.remove(name);
    }

    pub async fn callback(&self, name: &str) -> Option<JsCallbackHandler> {
        self.callbacks.read().await.get(name).cloned()
    }

    pub async fn has_any_callback(&self) -> bool {
        !self.callbacks.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_handler(counter: Arc<AtomicUsize>) -> EventHandler {
        Arc::new(move |_params| {
            let counter = counter.clone();
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        })
    }

    #[tokio::test]
    async fn register_unregister_round_trips() {
        let registry = ListenerRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let handler = counting_handler(counter.clone());

        registry.add_event_listener("Page.frameNavigated", handler.clone()).await;
        assert_eq!(registry.snapshot_for_event("Page.frameNavigated").await.len(), 1);

        registry
            .remove_event_listener("Page.frameNavigated", &handler)
            .await;
        assert_eq!(registry.snapshot_for_event("Page.frameNavigated").await.len(), 0);
    }

    #[tokio::test]
    async fn reregistering_same_handler_is_idempotent() {
        let registry = ListenerRegistry::new();
        let handler = counting_handler(Arc::new(AtomicUsize::new(0)));

        registry.add_event_listener("X", handler.clone()).await;
        registry.add_event_listener("X", handler.clone()).await;

        assert_eq!(registry.snapshot_for_event("X").await.len(), 1);
    }

    #[tokio::test]
    async fn js_callback_last_registration_wins() {
        let registry = ListenerRegistry::new();
        let first_fired = Arc::new(AtomicUsize::new(0));
        let second_fired = Arc::new(AtomicUsize::new(0));

        let first = first_fired.clone();
        registry
            .add_listener(
                "test_func",
                Arc::new(move |_args| {
                    let first = first.clone();
                    Box::pin(async move {
                        first.fetch_add(1, Ordering::SeqCst);
                    })
                }),
            )
            .await;

        let second = second_fired.clone();
        registry
            .add_listener(
                "test_func",
                Arc::new(move |_args| {
                    let second = second.clone();
                    Box::pin(async move {
                        second.fetch_add(1, Ordering::SeqCst);
                    })
                }),
            )
            .await;

        let cb = registry.callback("test_func").await.unwrap();
        cb(vec![]).await;

        assert_eq!(first_fired.load(Ordering::SeqCst), 0);
        assert_eq!(second_fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unregistered_event_has_empty_snapshot() {
        let registry = ListenerRegistry::new();
        assert!(registry.snapshot_for_event("Nothing.here").await.is_empty());
    }
}
