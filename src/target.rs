//! Target registry: discovers targets over the debug port's HTTP surface
//! and constructs activated `Connection`s for them.
//!
//! Carries no per-target state beyond the debug-port config — every
//! lookup re-reads `/json/list`, so the registry never drifts out of sync
//! with the running browser.

use std::time::Duration;

use serde::Deserialize;

use crate::cdp_types::{self, CloseTargetParams, CreateTargetParams};
use crate::connection::{Connection, ConnectionConfig, ConnectionParams, GenericCallback};
use crate::error::{CdpError, Result};
use crate::ids::TargetId;
use crate::types::BrowserFamily;

/// One entry from `/json/list`: at least `id, type, title, url,
/// webSocketDebuggerUrl, devtoolsFrontendUrl`; may include `parentId,
/// faviconUrl, description`.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetDescriptor {
    pub id: TargetId,
    #[serde(rename = "type")]
    pub target_type: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub ws_url: String,
    #[serde(rename = "devtoolsFrontendUrl")]
    pub frontend_url: String,
    #[serde(rename = "parentId")]
    pub parent_id: Option<TargetId>,
    #[serde(rename = "openerId")]
    pub opener_id: Option<TargetId>,
    #[serde(rename = "faviconUrl")]
    pub favicon_url: Option<String>,
    pub description: Option<String>,
}

/// Lookup key for [`TargetRegistry::get_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey {
    Id,
    Title,
    Url,
    Type,
}

/// String-comparison mode for [`TargetRegistry::get_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Exact,
    Contains,
    StartsWith,
}

fn matches(mode: MatchMode, haystack: &str, needle: &str) -> bool {
    let haystack = haystack.to_lowercase();
    let needle = needle.to_lowercase();
    match mode {
        MatchMode::Exact => haystack == needle,
        MatchMode::Contains => haystack.contains(&needle),
        MatchMode::StartsWith => haystack.starts_with(&needle),
    }
}

#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub host: String,
    pub port: u16,
    pub http_timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9222,
            http_timeout: Duration::from_secs(10),
        }
    }
}

pub struct TargetRegistry {
    config: DiscoveryConfig,
    browser_family: BrowserFamily,
    http: reqwest::Client,
}

impl TargetRegistry {
    pub fn new(config: DiscoveryConfig) -> Result<Self> {
        if config.port == 0 {
            return Err(CdpError::MissingConfigValue { flag: "port" });
        }
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self {
            config,
            browser_family: BrowserFamily::Unknown,
            http,
        })
    }

    fn base_url(&self) -> String {
        format!("http://{}:{}", self.config.host, self.config.port)
    }

    /// `GET /json/list`.
    pub async fn list(&self) -> Result<Vec<TargetDescriptor>> {
        let url = format!("{}/json/list", self.base_url());
        let resp = self.http.get(&url).send().await?;
        let targets = resp.json::<Vec<TargetDescriptor>>().await?;
        Ok(targets)
    }

    fn descriptor_field<'a>(key: LookupKey, d: &'a TargetDescriptor) -> &'a str {
        match key {
            LookupKey::Id => d.id.as_str(),
            LookupKey::Title => &d.title,
            LookupKey::Url => &d.url,
            LookupKey::Type => &d.target_type,
        }
    }

    fn connection_params_for(
        &self,
        d: &TargetDescriptor,
        on_event: Option<GenericCallback>,
        verbose: bool,
    ) -> ConnectionParams {
        let browser_family = if d.ws_url.starts_with("wss://") {
            BrowserFamily::Unknown
        } else {
            self.browser_family
        };
        ConnectionParams {
            ws_url: d.ws_url.clone(),
            target_id: d.id.clone(),
            frontend_url: d.frontend_url.clone(),
            is_headless: d.title.to_lowercase().contains("headless"),
            verbose,
            browser_family,
            on_event,
            config: ConnectionConfig::default(),
        }
    }

    /// Scans `list()` in order, counting string matches, and activates a
    /// `Connection` for the `index`-th hit.
    pub async fn get_by(
        &self,
        key: LookupKey,
        value: &str,
        mode: MatchMode,
        index: usize,
        on_event: Option<GenericCallback>,
    ) -> Result<Option<Connection>> {
        let targets = self.list().await?;
        let mut seen = 0usize;
        for d in &targets {
            if matches(mode, Self::descriptor_field(key, d), value) {
                if seen == index {
                    let conn = Connection::new(self.connection_params_for(d, on_event, false));
                    conn.activate().await?;
                    return Ok(Some(conn));
                }
                seen += 1;
            }
        }
        Ok(None)
    }

    pub async fn get_connection_by_id(
        &self,
        id: &str,
        on_event: Option<GenericCallback>,
    ) -> Result<Option<Connection>> {
        self.get_by(LookupKey::Id, id, MatchMode::Exact, 0, on_event).await
    }

    pub async fn get_connection_by_title(
        &self,
        title: &str,
        mode: MatchMode,
        index: usize,
        on_event: Option<GenericCallback>,
    ) -> Result<Option<Connection>> {
        self.get_by(LookupKey::Title, title, mode, index, on_event).await
    }

    pub async fn get_connection_by_url(
        &self,
        url: &str,
        mode: MatchMode,
        index: usize,
        on_event: Option<GenericCallback>,
    ) -> Result<Option<Connection>> {
        self.get_by(LookupKey::Url, url, mode, index, on_event).await
    }

    pub async fn get_connection_by_type(
        &self,
        target_type: &str,
        index: usize,
        on_event: Option<GenericCallback>,
    ) -> Result<Option<Connection>> {
        self.get_by(LookupKey::Type, target_type, MatchMode::Exact, index, on_event)
            .await
    }

    /// Issues `Target.createTarget` over any current page Connection, then
    /// polls `list()` until the new id appears.
    pub async fn create_tab(
        &self,
        url: impl Into<String>,
        new_window: Option<bool>,
        background: Option<bool>,
        wait_for_create: bool,
        on_event: Option<GenericCallback>,
    ) -> Result<Connection> {
        let any_page = self
            .get_connection_by_type("page", 0, None)
            .await?
            .ok_or(CdpError::TargetNotFound)?;

        let result = any_page
            .call(CreateTargetParams {
                url: url.into(),
                new_window,
                background,
            })
            .await?;
        any_page.detach().await;

        if !wait_for_create {
            let targets = self.list().await?;
            let descriptor = targets
                .into_iter()
                .find(|d| d.id == result.target_id)
                .ok_or(CdpError::TargetNotFound)?;
            let conn = Connection::new(self.connection_params_for(&descriptor, on_event, false));
            conn.activate().await?;
            return Ok(conn);
        }

        for _ in 0..50 {
            let targets = self.list().await?;
            if let Some(descriptor) = targets.into_iter().find(|d| d.id == result.target_id) {
                let conn =
                    Connection::new(self.connection_params_for(&descriptor, on_event, false));
                conn.activate().await?;
                return Ok(conn);
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        Err(CdpError::TargetNotFound)
    }

    /// Targets whose `openerId` matches `parent_conn`'s id.
    pub async fn connection_by_opener(
        &self,
        parent_conn: &Connection,
    ) -> Result<Option<Connection>> {
        let targets = self.list().await?;
        let descriptor = targets
            .into_iter()
            .find(|d| d.opener_id.as_ref() == Some(parent_conn.target_id()));
        match descriptor {
            Some(d) => {
                let conn = Connection::new(self.connection_params_for(&d, None, false));
                conn.activate().await?;
                Ok(Some(conn))
            }
            None => Ok(None),
        }
    }

    /// Iframe targets whose `parentId` matches `parent_conn`'s id.
    pub async fn children_frames(&self, parent_conn: &Connection) -> Result<Vec<Connection>> {
        let targets = self.list().await?;
        let mut out = Vec::new();
        for d in targets
            .into_iter()
            .filter(|d| d.target_type == "iframe")
            .filter(|d| d.parent_id.as_ref() == Some(parent_conn.target_id()))
        {
            let conn = Connection::new(self.connection_params_for(&d, None, false));
            conn.activate().await?;
            out.push(conn);
        }
        Ok(out)
    }

    /// Retries `get_connection_by_type("page")` tolerating HTTP connection
    /// refused until success or `timeout`.
    pub async fn wait_first_tab(&self, timeout: Duration) -> Result<Connection> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match self.get_connection_by_type("page", 0, None).await {
                Ok(Some(conn)) => return Ok(conn),
                Ok(None) => {}
                Err(CdpError::Http(err)) if err.is_connect() => {}
                Err(other) => return Err(other),
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(CdpError::TargetNotFound);
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// Closes every "page" descriptor not present in `exempt`, tolerating
    /// "no target with given id found".
    pub async fn close_all_except(&self, exempt: &[&Connection]) -> Result<()> {
        let targets = self.list().await?;
        let any_page = self.get_connection_by_type("page", 0, None).await?;
        let Some(controller) = any_page else {
            return Ok(());
        };

        for d in targets.into_iter().filter(|d| d.target_type == "page") {
            if exempt.iter().any(|c| c.target_id() == &d.id) {
                continue;
            }
            let result = controller
                .call(CloseTargetParams {
                    target_id: d.id.clone(),
                })
                .await;
            if let Err(CdpError::TargetNotFound) = result {
                continue;
            }
            result?;
        }
        controller.detach().await;
        Ok(())
    }

    /// Issues `Browser.close` over any Connection.
    pub async fn close_browser(&self) -> Result<()> {
        let any = self
            .get_connection_by_type("page", 0, None)
            .await?
            .ok_or(CdpError::TargetNotFound)?;
        let _: cdp_types::Empty = any.call(cdp_types::BrowserClose {}).await?;
        any.detach().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str, title: &str, target_type: &str) -> TargetDescriptor {
        TargetDescriptor {
            id: TargetId::new(id),
            target_type: target_type.to_string(),
            title: title.to_string(),
            url: "https://example.test".to_string(),
            ws_url: format!("ws://127.0.0.1:9222/devtools/page/{id}"),
            frontend_url: "/devtools/inspector.html".to_string(),
            parent_id: None,
            opener_id: None,
            favicon_url: None,
            description: None,
        }
    }

    #[test]
    fn match_modes_are_case_insensitive() {
        assert!(matches(MatchMode::Exact, "Page Title", "page title"));
        assert!(matches(MatchMode::Contains, "Page Title", "TITLE"));
        assert!(matches(MatchMode::StartsWith, "Page Title", "page"));
        assert!(!matches(MatchMode::StartsWith, "Page Title", "title"));
    }

    #[test]
    fn descriptor_field_selects_by_key() {
        let d = descriptor("T1", "Hello", "page");
        assert_eq!(TargetRegistry::descriptor_field(LookupKey::Id, &d), "T1");
        assert_eq!(TargetRegistry::descriptor_field(LookupKey::Title, &d), "Hello");
        assert_eq!(TargetRegistry::descriptor_field(LookupKey::Type, &d), "page");
    }

    #[test]
    fn rejects_zero_port() {
        let config = DiscoveryConfig {
            port: 0,
            ..DiscoveryConfig::default()
        };
        assert!(matches!(
            TargetRegistry::new(config).unwrap_err(),
            CdpError::MissingConfigValue { flag: "port" }
        ));
    }
}
