//! Page-domain lifecycle watcher and navigation wrapper. The loading-state
//! projection itself lives on `Connection` (it must run inside the
//! receiver loop, since only the receiver may mutate it); this module is
//! the `Page.navigate` wrapper plus `loading_state`/`wait_for_stop`
//! convenience built on top of it.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::cdp_types::{NavigateParams, ReloadParams};
use crate::connection::Connection;
use crate::error::Result;
use crate::ids::FrameId;
use crate::types::LoadingState;

/// Payload passed to [`navigate`]; distinguishes "a page address" from "an
/// inline document body" supplied as raw bytes.
pub enum NavigationTarget {
    /// A page address or inline markup: `http(s)://…`, `<browser>://…`,
    /// and `about:blank` pass through unchanged; any other string is
    /// rendered as `data:text/html,<percent-encoded payload>`.
    Url(String),
    /// Rendered as `data:text/html;Base64,<payload>`.
    InlineBytes(Vec<u8>),
}

impl NavigationTarget {
    fn is_passthrough(url: &str) -> bool {
        url.starts_with("http://")
            || url.starts_with("https://")
            || url.contains("://")
            || url == "about:blank"
    }

    /// Builds the exact string handed to `Page.navigate`, percent-encoding
    /// inline string payloads with `percent_encoding::NON_ALPHANUMERIC`.
    fn into_wire_url(self) -> String {
        match self {
            NavigationTarget::Url(url) if Self::is_passthrough(&url) => url,
            NavigationTarget::Url(other) => {
                let encoded = utf8_percent_encode(&other, NON_ALPHANUMERIC).to_string();
                format!("data:text/html,{encoded}")
            }
            NavigationTarget::InlineBytes(bytes) => {
                use base64::engine::general_purpose::STANDARD as BASE64;
                use base64::Engine as _;
                format!("data:text/html;Base64,{}", BASE64.encode(bytes))
            }
        }
    }
}

/// Navigation and loading-state convenience wrapper over a `Connection`.
/// Holds no state: `loading_state()` reads the projection the connection's
/// receiver loop maintains.
pub struct PageLifecycle<'a> {
    conn: &'a Connection,
}

impl<'a> PageLifecycle<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Rewrites `target` into a wire URL and issues `Page.navigate`.
    ///
    /// Moves `loading_state` to `NavigateRequested` before sending, so a
    /// concurrent `wait_for_stop` can't observe the *previous* load's
    /// `Stopped` and return as if this navigation had already finished.
    pub async fn navigate(&self, target: NavigationTarget) -> Result<FrameId> {
        self.conn.mark_loading(LoadingState::NavigateRequested).await;
        let url = target.into_wire_url();
        let result = self.conn.call(NavigateParams { url }).await?;
        Ok(result.frame_id)
    }

    /// Reloads the current document via `Page.reload`, optionally bypassing
    /// the cache and/or injecting a script into every frame on reload (the
    /// script is ignored when reloading a `data:` URL).
    ///
    /// Moves `loading_state` to `ReloadRequested` before sending, for the
    /// same reason `navigate` moves it to `NavigateRequested`.
    pub async fn reload(
        &self,
        ignore_cache: bool,
        script_to_evaluate_on_load: Option<String>,
    ) -> Result<()> {
        self.conn.mark_loading(LoadingState::ReloadRequested).await;
        self.conn
            .call(ReloadParams {
                ignore_cache: ignore_cache.then_some(true),
                script_to_evaluate_on_load,
            })
            .await?;
        Ok(())
    }

    /// The connection's own top-frame loading-state projection.
    pub async fn loading_state(&self) -> LoadingState {
        self.conn.loading_state().await
    }

    /// Suspends until the top frame reports `Stopped`. Callers that need
    /// "page fully loaded" should additionally poll
    /// `document.readyState == "complete"` via `Connection::eval`.
    pub async fn wait_for_stop(&self, poll_interval: std::time::Duration) {
        loop {
            if self.loading_state().await == LoadingState::Stopped {
                return;
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_urls_pass_through_unencoded() {
        let wire = NavigationTarget::Url("https://example.test/path?q=1".into()).into_wire_url();
        assert_eq!(wire, "https://example.test/path?q=1");
    }

    #[test]
    fn about_blank_passes_through() {
        let wire = NavigationTarget::Url("about:blank".into()).into_wire_url();
        assert_eq!(wire, "about:blank");
    }

    #[test]
    fn custom_scheme_passes_through() {
        let wire = NavigationTarget::Url("chrome://version".into()).into_wire_url();
        assert_eq!(wire, "chrome://version");
    }

    #[test]
    fn plain_string_becomes_percent_encoded_data_url() {
        let wire = NavigationTarget::Url("<h1>hi there</h1>".into()).into_wire_url();
        assert!(wire.starts_with("data:text/html,"));
        assert!(wire.contains("%3C") || wire.contains("<"));
        assert!(!wire.contains(' '));
    }

    #[test]
    fn bytes_become_base64_data_url() {
        let wire = NavigationTarget::InlineBytes(b"<h1>hi</h1>".to_vec()).into_wire_url();
        assert!(wire.starts_with("data:text/html;Base64,"));
    }

    #[tokio::test]
    async fn navigate_clears_a_stale_stopped_state_before_the_call_resolves() {
        let (conn, mut handle) = crate::connection::test_connection();
        conn.mark_loading(LoadingState::Stopped).await;

        let page = PageLifecycle::new(&conn);
        let call_conn = conn.clone();
        let fut = tokio::spawn(async move {
            let page = PageLifecycle::new(&call_conn);
            page.navigate(NavigationTarget::Url("https://example.test".into()))
                .await
        });

        let req: serde_json::Value =
            serde_json::from_str(&handle.outbound.recv().await.unwrap()).unwrap();
        assert_eq!(req["method"], "Page.navigate");

        // The state flips synchronously, before the response is even sent.
        assert_eq!(page.loading_state().await, LoadingState::NavigateRequested);

        handle
            .inbound
            .send(format!(
                r#"{{"id":{},"result":{{"frameId":"F1"}}}}"#,
                req["id"]
            ))
            .unwrap();
        fut.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn reload_clears_a_stale_stopped_state_before_the_call_resolves() {
        let (conn, mut handle) = crate::connection::test_connection();
        conn.mark_loading(LoadingState::Stopped).await;

        let page = PageLifecycle::new(&conn);
        let call_conn = conn.clone();
        let fut = tokio::spawn(async move {
            let page = PageLifecycle::new(&call_conn);
            page.reload(false, None).await
        });

        let req: serde_json::Value =
            serde_json::from_str(&handle.outbound.recv().await.unwrap()).unwrap();
        assert_eq!(req["method"], "Page.reload");

        assert_eq!(page.loading_state().await, LoadingState::ReloadRequested);

        handle
            .inbound
            .send(format!(r#"{{"id":{},"result":{{}}}}"#, req["id"]))
            .unwrap();
        fut.await.unwrap().unwrap();
    }
}
