//! Fetch interception engine: configures URL patterns, listens for
//! `Fetch.requestPaused`, and issues the terminal dispositions (fulfill /
//! continue / continue-with-auth / fail), driven through
//! `Connection::add_event_listener` rather than a hand-rolled dispatch
//! table.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::cdp_types::{
    AuthChallengeResponse, AuthChallengeResponseKind, ContinueRequestParams,
    ContinueWithAuthParams, ErrorReason, FailRequestParams, FetchEnableParams,
    FulfillRequestParams, GetResponseBodyParams, GetResponseBodyResult, HeaderEntry,
    RequestPattern, RequestPausedEvent,
};
use crate::connection::Connection;
use crate::error::Result;
use crate::ids::RequestId;
use crate::listeners::EventHandler;

/// One URL/stage filter.
#[derive(Debug, Clone, Default)]
pub struct InterceptPattern {
    pub url_pattern: Option<String>,
    pub resource_type: Option<String>,
    pub request_stage: Option<RequestStage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Request,
    Response,
}

impl RequestStage {
    fn as_wire(self) -> &'static str {
        match self {
            RequestStage::Request => "Request",
            RequestStage::Response => "Response",
        }
    }
}

impl From<InterceptPattern> for RequestPattern {
    fn from(p: InterceptPattern) -> Self {
        RequestPattern {
            url_pattern: p.url_pattern,
            resource_type: p.resource_type,
            request_stage: p.request_stage.map(RequestStage::as_wire).map(String::from),
        }
    }
}

pub use crate::cdp_types::PausedRequest;

/// `Fetch.requestPaused`, decoded.
#[derive(Debug, Clone)]
pub struct PausedEvent {
    pub request_id: RequestId,
    pub request: PausedRequest,
    pub frame_id: crate::ids::FrameId,
    pub resource_type: String,
    pub response_status_code: Option<i32>,
    pub response_headers: Vec<HeaderEntry>,
}

impl From<RequestPausedEvent> for PausedEvent {
    fn from(e: RequestPausedEvent) -> Self {
        Self {
            request_id: e.request_id,
            request: e.request,
            frame_id: e.frame_id,
            resource_type: e.resource_type,
            response_status_code: e.response_status_code,
            response_headers: e.response_headers,
        }
    }
}

#[derive(Debug, Clone)]
pub enum AuthDisposition {
    Default,
    CancelAuth,
    ProvideCredentials { username: String, password: String },
}

/// Thin wrapper over a `Connection` exposing the fetch-interception
/// surface. Holds no state of its own beyond the borrowed connection — the
/// pattern list and pause callback live where the caller registered them,
/// the connection's listener registry.
pub struct FetchInterceptor<'a> {
    conn: &'a Connection,
}

impl<'a> FetchInterceptor<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Installs `patterns`, registers `on_pause` against
    /// `Fetch.requestPaused`, and registers `on_auth` against
    /// `Fetch.authRequired` when `handle_auth` is set. `on_auth` must be
    /// `Some` whenever `handle_auth` is true: with auth handling on, the
    /// browser pauses on every auth challenge and nothing but a registered
    /// handler calling `continue_with_auth` can unblock it.
    pub async fn enable(
        &self,
        patterns: Vec<InterceptPattern>,
        handle_auth: bool,
        on_pause: EventHandler,
        on_auth: Option<EventHandler>,
    ) -> Result<()> {
        self.conn
            .call(FetchEnableParams {
                patterns: patterns.into_iter().map(Into::into).collect(),
                handle_auth_requests: handle_auth,
            })
            .await?;

        self.conn
            .add_event_listener("Fetch.requestPaused", on_pause)
            .await?;

        if handle_auth {
            let on_auth = on_auth.ok_or(crate::error::CdpError::InvalidState(
                "handle_auth requires an on_auth handler",
            ))?;
            self.conn
                .add_event_listener("Fetch.authRequired", on_auth)
                .await?;
        }
        Ok(())
    }

    /// Completes a paused request with a synthesised response.
    pub async fn fulfill(
        &self,
        request_id: RequestId,
        status: i32,
        headers: Vec<HeaderEntry>,
        body: Option<&[u8]>,
        phrase: Option<String>,
    ) -> Result<()> {
        self.conn
            .call(FulfillRequestParams {
                request_id,
                response_code: status,
                response_headers: headers,
                response_phrase: phrase,
                body: body.map(|b| BASE64.encode(b)),
            })
            .await?;
        Ok(())
    }

    /// Lets the request proceed, optionally rewriting it; named
    /// `continue_request` since `continue` is reserved.
    pub async fn continue_request(
        &self,
        request_id: RequestId,
        url: Option<String>,
        method: Option<String>,
        post_data: Option<String>,
        headers: Option<Vec<HeaderEntry>>,
    ) -> Result<()> {
        self.conn
            .call(ContinueRequestParams {
                request_id,
                url,
                method,
                post_data,
                headers,
            })
            .await?;
        Ok(())
    }

    /// Completes an auth challenge.
    pub async fn continue_with_auth(
        &self,
        request_id: RequestId,
        disposition: AuthDisposition,
    ) -> Result<()> {
        let response = match disposition {
            AuthDisposition::Default => AuthChallengeResponse {
                response: AuthChallengeResponseKind::Default,
                username: None,
                password: None,
            },
            AuthDisposition::CancelAuth => AuthChallengeResponse {
                response: AuthChallengeResponseKind::CancelAuth,
                username: None,
                password: None,
            },
            AuthDisposition::ProvideCredentials { username, password } => AuthChallengeResponse {
                response: AuthChallengeResponseKind::ProvideCredentials,
                username: Some(username),
                password: Some(password),
            },
        };
        self.conn
            .call(ContinueWithAuthParams {
                request_id,
                auth_challenge_response: response,
            })
            .await?;
        Ok(())
    }

    /// Aborts the request with a network-style reason.
    pub async fn fail(&self, request_id: RequestId, reason: ErrorReason) -> Result<()> {
        self.conn
            .call(FailRequestParams {
                request_id,
                error_reason: reason,
            })
            .await?;
        Ok(())
    }

    /// Only meaningful at the `Response` stage.
    pub async fn get_response_body(&self, request_id: RequestId) -> Result<GetResponseBodyResult> {
        self.conn
            .call(GetResponseBodyParams { request_id })
            .await
    }

    /// Stops intercepting.
    pub async fn disable(&self) -> Result<()> {
        self.conn.call(crate::cdp_types::FetchDisable {}).await?;
        self.conn.remove_all_for_event("Fetch.requestPaused").await;
        self.conn.remove_all_for_event("Fetch.authRequired").await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_conversion_carries_stage_as_wire_string() {
        let pattern = InterceptPattern {
            url_pattern: Some("*.png".into()),
            resource_type: Some("Image".into()),
            request_stage: Some(RequestStage::Response),
        };
        let wire: RequestPattern = pattern.into();
        assert_eq!(wire.url_pattern.as_deref(), Some("*.png"));
        assert_eq!(wire.request_stage.as_deref(), Some("Response"));
    }

    #[test]
    fn body_is_base64_encoded_before_fulfill() {
        let encoded = BASE64.encode(b"<html></html>");
        assert_eq!(encoded, "PGh0bWw+PC9odG1sPg==");
    }
}
