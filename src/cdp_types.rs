//! A hand-rolled subset of CDP domain structs: only the params/results the
//! engine itself constructs or reads directly (Target, Fetch, Page, DOM,
//! Input, Inspector). The closed catalogue of *every* CDP command is out of
//! scope — that's a job for a separately generated crate built from the
//! protocol's `.pdl` files. Callers who need a command this crate doesn't
//! model call [`crate::connection::Connection::call_raw`] directly with a
//! method name and a `Value`.
//!
//! `Method::identifier` gives the wire method name; `Command` pins the
//! expected response shape so `Connection::call` can deserialize without
//! the caller repeating the type.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::borrow::Cow;

use crate::ids::{BackendNodeId, FrameId, NodeId, RemoteObjectId, RequestId, TargetId};

pub trait Method {
    fn identifier(&self) -> Cow<'static, str>;
}

pub trait Command: Method + Serialize {
    type Response: DeserializeOwned;
}

macro_rules! simple_command {
    ($name:ident, $method:literal, $resp:ty) => {
        #[derive(Debug, Clone, Default, Serialize)]
        pub struct $name {}

        impl Method for $name {
            fn identifier(&self) -> Cow<'static, str> {
                Cow::Borrowed($method)
            }
        }

        impl Command for $name {
            type Response = $resp;
        }
    };
}

#[derive(Debug, Clone, Deserialize)]
pub struct Empty {}

simple_command!(RuntimeEnable, "Runtime.enable", Empty);
simple_command!(PageEnable, "Page.enable", Empty);
simple_command!(SetDiscoverTargets, "Target.setDiscoverTargets", Empty);

// --- Target -----------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CreateTargetParams {
    pub url: String,
    #[serde(rename = "newWindow", skip_serializing_if = "Option::is_none")]
    pub new_window: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<bool>,
}

impl Method for CreateTargetParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("Target.createTarget")
    }
}
impl Command for CreateTargetParams {
    type Response = CreateTargetResult;
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTargetResult {
    #[serde(rename = "targetId")]
    pub target_id: TargetId,
}

#[derive(Debug, Clone, Serialize)]
pub struct CloseTargetParams {
    #[serde(rename = "targetId")]
    pub target_id: TargetId,
}
impl Method for CloseTargetParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("Target.closeTarget")
    }
}
impl Command for CloseTargetParams {
    type Response = Empty;
}

simple_command!(BrowserClose, "Browser.close", Empty);

// --- Page ---------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct NavigateParams {
    pub url: String,
}
impl Method for NavigateParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("Page.navigate")
    }
}
impl Command for NavigateParams {
    type Response = NavigateResult;
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavigateResult {
    #[serde(rename = "frameId")]
    pub frame_id: FrameId,
    #[serde(rename = "loaderId")]
    pub loader_id: Option<String>,
    #[serde(rename = "errorText")]
    pub error_text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReloadParams {
    #[serde(rename = "ignoreCache", skip_serializing_if = "Option::is_none")]
    pub ignore_cache: Option<bool>,
    #[serde(
        rename = "scriptToEvaluateOnLoad",
        skip_serializing_if = "Option::is_none"
    )]
    pub script_to_evaluate_on_load: Option<String>,
}
impl Method for ReloadParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("Page.reload")
    }
}
impl Command for ReloadParams {
    type Response = Empty;
}

// --- DOM ------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct QuerySelectorParams {
    #[serde(rename = "nodeId")]
    pub node_id: NodeId,
    pub selector: String,
}
impl Method for QuerySelectorParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("DOM.querySelector")
    }
}
impl Command for QuerySelectorParams {
    type Response = QuerySelectorResult;
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuerySelectorResult {
    #[serde(rename = "nodeId")]
    pub node_id: NodeId,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuerySelectorAllParams {
    #[serde(rename = "nodeId")]
    pub node_id: NodeId,
    pub selector: String,
}
impl Method for QuerySelectorAllParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("DOM.querySelectorAll")
    }
}
impl Command for QuerySelectorAllParams {
    type Response = QuerySelectorAllResult;
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuerySelectorAllResult {
    #[serde(rename = "nodeIds")]
    pub node_ids: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DescribeNodeParams {
    #[serde(rename = "nodeId")]
    pub node_id: NodeId,
    pub depth: i32,
}
impl Method for DescribeNodeParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("DOM.describeNode")
    }
}
impl Command for DescribeNodeParams {
    type Response = DescribeNodeResult;
}

#[derive(Debug, Clone, Deserialize)]
pub struct DescribeNodeResult {
    pub node: NodeDescription,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeDescription {
    #[serde(rename = "nodeId")]
    pub node_id: NodeId,
    #[serde(rename = "backendNodeId")]
    pub backend_node_id: BackendNodeId,
    #[serde(rename = "frameId")]
    pub frame_id: Option<FrameId>,
    #[serde(rename = "nodeName")]
    pub node_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveNodeParams {
    #[serde(rename = "backendNodeId")]
    pub backend_node_id: BackendNodeId,
}
impl Method for ResolveNodeParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("DOM.resolveNode")
    }
}
impl Command for ResolveNodeParams {
    type Response = ResolveNodeResult;
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveNodeResult {
    pub object: RemoteObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteObject {
    #[serde(rename = "objectId")]
    pub object_id: Option<RemoteObjectId>,
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestNodeParams {
    #[serde(rename = "objectId")]
    pub object_id: RemoteObjectId,
}
impl Method for RequestNodeParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("DOM.requestNode")
    }
}
impl Command for RequestNodeParams {
    type Response = QuerySelectorResult;
}

#[derive(Debug, Clone, Serialize)]
pub struct SetOuterHtmlParams {
    #[serde(rename = "nodeId")]
    pub node_id: NodeId,
    #[serde(rename = "outerHTML")]
    pub outer_html: String,
}
impl Method for SetOuterHtmlParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("DOM.setOuterHTML")
    }
}
impl Command for SetOuterHtmlParams {
    type Response = Empty;
}

#[derive(Debug, Clone, Serialize)]
pub struct SetNodeNameParams {
    #[serde(rename = "nodeId")]
    pub node_id: NodeId,
    pub name: String,
}
impl Method for SetNodeNameParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("DOM.setNodeName")
    }
}
impl Command for SetNodeNameParams {
    type Response = QuerySelectorResult;
}

#[derive(Debug, Clone, Serialize)]
pub struct MoveToParams {
    #[serde(rename = "nodeId")]
    pub node_id: NodeId,
    #[serde(rename = "targetNodeId")]
    pub target_node_id: NodeId,
}
impl Method for MoveToParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("DOM.moveTo")
    }
}
impl Command for MoveToParams {
    type Response = QuerySelectorResult;
}

// --- Fetch ------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Default)]
pub struct RequestPattern {
    #[serde(rename = "urlPattern", skip_serializing_if = "Option::is_none")]
    pub url_pattern: Option<String>,
    #[serde(rename = "resourceType", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(rename = "requestStage", skip_serializing_if = "Option::is_none")]
    pub request_stage: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchEnableParams {
    pub patterns: Vec<RequestPattern>,
    #[serde(rename = "handleAuthRequests")]
    pub handle_auth_requests: bool,
}
impl Method for FetchEnableParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("Fetch.enable")
    }
}
impl Command for FetchEnableParams {
    type Response = Empty;
}

simple_command!(FetchDisable, "Fetch.disable", Empty);

#[derive(Debug, Clone, Serialize)]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FulfillRequestParams {
    #[serde(rename = "requestId")]
    pub request_id: RequestId,
    #[serde(rename = "responseCode")]
    pub response_code: i32,
    #[serde(rename = "responseHeaders", skip_serializing_if = "Vec::is_empty")]
    pub response_headers: Vec<HeaderEntry>,
    #[serde(rename = "responsePhrase", skip_serializing_if = "Option::is_none")]
    pub response_phrase: Option<String>,
    #[serde(rename = "body", skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}
impl Method for FulfillRequestParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("Fetch.fulfillRequest")
    }
}
impl Command for FulfillRequestParams {
    type Response = Empty;
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ContinueRequestParams {
    #[serde(rename = "requestId")]
    pub request_id: RequestId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(rename = "postData", skip_serializing_if = "Option::is_none")]
    pub post_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<HeaderEntry>>,
}
impl Method for ContinueRequestParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("Fetch.continueRequest")
    }
}
impl Command for ContinueRequestParams {
    type Response = Empty;
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthChallengeResponse {
    pub response: AuthChallengeResponseKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub enum AuthChallengeResponseKind {
    Default,
    CancelAuth,
    ProvideCredentials,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContinueWithAuthParams {
    #[serde(rename = "requestId")]
    pub request_id: RequestId,
    #[serde(rename = "authChallengeResponse")]
    pub auth_challenge_response: AuthChallengeResponse,
}
impl Method for ContinueWithAuthParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("Fetch.continueWithAuth")
    }
}
impl Command for ContinueWithAuthParams {
    type Response = Empty;
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum ErrorReason {
    Failed,
    Aborted,
    TimedOut,
    AccessDenied,
    ConnectionClosed,
    ConnectionReset,
    ConnectionRefused,
    ConnectionFailed,
    NameNotResolved,
    InternetDisconnected,
    AddressUnreachable,
    BlockedByClient,
    BlockedByResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailRequestParams {
    #[serde(rename = "requestId")]
    pub request_id: RequestId,
    #[serde(rename = "errorReason")]
    pub error_reason: ErrorReason,
}
impl Method for FailRequestParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("Fetch.failRequest")
    }
}
impl Command for FailRequestParams {
    type Response = Empty;
}

#[derive(Debug, Clone, Serialize)]
pub struct GetResponseBodyParams {
    #[serde(rename = "requestId")]
    pub request_id: RequestId,
}
impl Method for GetResponseBodyParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("Fetch.getResponseBody")
    }
}
impl Command for GetResponseBodyParams {
    type Response = GetResponseBodyResult;
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetResponseBodyResult {
    pub body: String,
    #[serde(rename = "base64Encoded")]
    pub base64_encoded: bool,
}

/// `Fetch.requestPaused` event payload: one intercepted request awaiting a
/// disposition.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestPausedEvent {
    #[serde(rename = "requestId")]
    pub request_id: RequestId,
    pub request: PausedRequest,
    #[serde(rename = "frameId")]
    pub frame_id: FrameId,
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    #[serde(rename = "responseStatusCode")]
    pub response_status_code: Option<i32>,
    #[serde(rename = "responseHeaders", default)]
    pub response_headers: Vec<HeaderEntry>,
    #[serde(rename = "responseErrorReason")]
    pub response_error_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PausedRequest {
    pub url: String,
    pub method: String,
    #[serde(default)]
    pub headers: serde_json::Value,
    #[serde(rename = "postData")]
    pub post_data: Option<String>,
}

// --- Input ----------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct DispatchMouseEventParams {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<String>,
    #[serde(rename = "clickCount", skip_serializing_if = "Option::is_none")]
    pub click_count: Option<i32>,
    #[serde(rename = "deltaX", skip_serializing_if = "Option::is_none")]
    pub delta_x: Option<f64>,
    #[serde(rename = "deltaY", skip_serializing_if = "Option::is_none")]
    pub delta_y: Option<f64>,
}
impl Method for DispatchMouseEventParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("Input.dispatchMouseEvent")
    }
}
impl Command for DispatchMouseEventParams {
    type Response = Empty;
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchKeyEventParams {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub code: String,
}
impl Method for DispatchKeyEventParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("Input.dispatchKeyEvent")
    }
}
impl Command for DispatchKeyEventParams {
    type Response = Empty;
}

#[derive(Debug, Clone, Serialize)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchTouchEventParams {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "touchPoints")]
    pub touch_points: Vec<TouchPoint>,
}
impl Method for DispatchTouchEventParams {
    fn identifier(&self) -> Cow<'static, str> {
        Cow::Borrowed("Input.dispatchTouchEvent")
    }
}
impl Command for DispatchTouchEventParams {
    type Response = Empty;
}

// --- Inspector --------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct InspectorDetachedEvent {
    pub reason: String,
}
