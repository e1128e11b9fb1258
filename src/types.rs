//! Small shared enums that don't belong to any one component.

use serde::{Deserialize, Serialize};

/// Annotates `Connection` state only; CDP itself is identical across the
/// family, so nothing in the engine branches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrowserFamily {
    Chrome,
    Chromium,
    Edge,
    Unknown,
}

impl BrowserFamily {
    /// Derives a family tag from a `Target.getBrowserInfo`-style product
    /// string (e.g. `"Chrome/124.0.0.0"`, `"HeadlessChrome/124.0.0.0"`,
    /// `"Edg/124.0.0.0"`).
    pub fn from_product_string(product: &str) -> Self {
        let lower = product.to_ascii_lowercase();
        if lower.contains("edg") {
            BrowserFamily::Edge
        } else if lower.contains("chromium") {
            BrowserFamily::Chromium
        } else if lower.contains("chrome") {
            BrowserFamily::Chrome
        } else {
            BrowserFamily::Unknown
        }
    }
}

/// Three-state (plus transitional requests) projection of top-frame loading
/// derived from `Page.frameStartedLoading` / `frameNavigated` /
/// `frameStoppedLoading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    NavigateRequested,
    Started,
    Navigated,
    Stopped,
    ReloadRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    Page,
    Iframe,
    BackgroundPage,
    ServiceWorker,
    Worker,
    Other,
}

impl TargetType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "page" => TargetType::Page,
            "iframe" => TargetType::Iframe,
            "background_page" => TargetType::BackgroundPage,
            "service_worker" => TargetType::ServiceWorker,
            "worker" => TargetType::Worker,
            _ => TargetType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Page => "page",
            TargetType::Iframe => "iframe",
            TargetType::BackgroundPage => "background_page",
            TargetType::ServiceWorker => "service_worker",
            TargetType::Worker => "worker",
            TargetType::Other => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_detection() {
        assert_eq!(
            BrowserFamily::from_product_string("HeadlessChrome/124.0.0.0"),
            BrowserFamily::Chrome
        );
        assert_eq!(
            BrowserFamily::from_product_string("Edg/124.0.0.0"),
            BrowserFamily::Edge
        );
        assert_eq!(
            BrowserFamily::from_product_string("Something/1.0"),
            BrowserFamily::Unknown
        );
    }

    #[test]
    fn target_type_roundtrip() {
        for raw in ["page", "iframe", "background_page", "service_worker", "worker"] {
            assert_eq!(TargetType::parse(raw).as_str(), raw);
        }
        assert_eq!(TargetType::parse("weird"), TargetType::Other);
    }
}
