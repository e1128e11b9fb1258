//! Connection core: owns one target's channel, issues monotonic request
//! ids, correlates responses, demultiplexes events, and runs the
//! background receiver loop.
//!
//! One `next_id` counter feeds every outgoing call, matching the wire
//! protocol's single namespace of correlation ids per connection. Each
//! connection owns its own background receiver task rather than exposing a
//! `Stream` the caller has to poll — call-sending and event-receiving need
//! independent, concurrent ownership of the socket halves, so the split is
//! structural rather than a `Stream` combinator away.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{oneshot, watch, Mutex, RwLock};
use tracing::{debug, warn};

use crate::cdp_types::{Command, Method};
use crate::context::ExecutionContextManager;
use crate::error::{classify_protocol_error, CdpError, Result};
use crate::ids::TargetId;
use crate::listeners::{BoxFuture, EventHandler, JsCallbackHandler, ListenerRegistry};
use crate::message::{Envelope, MethodCall, ProtocolError};
use crate::promise::{self, PromiseChannels};
use crate::types::{BrowserFamily, LoadingState};
use crate::ws::{self, TransportSink, TransportStream};

/// Handler invoked for every raw envelope received, when the caller wants
/// to see everything rather than registering per-event listeners.
/// Registering one causes `activate()` to also request `Runtime.enable`.
pub type GenericCallback = Arc<dyn Fn(serde_json::Value) -> BoxFuture + Send + Sync>;

/// An async callback with no arguments beyond what the closure already
/// captured, used for `on_detach`. Bound state is captured by the closure
/// itself rather than passed positionally.
pub type DetachHook = Arc<dyn Fn() -> BoxFuture + Send + Sync>;

#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Auto-enable `Runtime` the first time any listener is registered.
    /// Default `true`; exposed so a caller can opt out of the protocol
    /// side effect explicitly instead of it being silent.
    pub runtime_enable_on_listener: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            runtime_enable_on_listener: true,
        }
    }
}

pub struct ConnectionParams {
    pub ws_url: String,
    pub target_id: TargetId,
    pub frontend_url: String,
    pub is_headless: bool,
    pub verbose: bool,
    pub browser_family: BrowserFamily,
    pub on_event: Option<GenericCallback>,
    pub config: ConnectionConfig,
}

enum CallOutcome {
    Result(serde_json::Value),
    Error(ProtocolError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnState {
    Fresh,
    Connected,
    Detached,
}

struct Inner {
    ws_url: String,
    target_id: TargetId,
    frontend_url: String,
    is_headless: bool,
    verbose: bool,
    browser_family: BrowserFamily,
    config: ConnectionConfig,
    on_event: Option<GenericCallback>,

    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, oneshot::Sender<CallOutcome>>>,
    listeners: ListenerRegistry,
    promises: PromiseChannels,
    contexts: ExecutionContextManager,

    runtime_enabled: std::sync::atomic::AtomicBool,
    state: Mutex<ConnState>,
    sink: Mutex<Option<Box<dyn TransportSink>>>,
    receiver_task: Mutex<Option<tokio::task::JoinHandle<()>>>,
    on_detach: RwLock<Option<DetachHook>>,
    close_tx: watch::Sender<bool>,
    loading_state: RwLock<LoadingState>,
}

/// One live WebSocket session to one target, with its correlator and
/// dispatcher. Cheaply cloneable — clones share the same underlying state
/// via the inner `Arc`.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<Inner>,
}

impl Connection {
    pub fn new(params: ConnectionParams) -> Self {
        let (close_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                ws_url: params.ws_url,
                target_id: params.target_id,
                frontend_url: params.frontend_url,
                is_headless: params.is_headless,
                verbose: params.verbose,
                browser_family: params.browser_family,
                config: params.config,
                on_event: params.on_event,
                next_id: AtomicU64::new(0),
                pending: Mutex::new(HashMap::new()),
                listeners: ListenerRegistry::new(),
                promises: PromiseChannels::new(),
                contexts: ExecutionContextManager::new(),
                runtime_enabled: std::sync::atomic::AtomicBool::new(false),
                state: Mutex::new(ConnState::Fresh),
                sink: Mutex::new(None),
                receiver_task: Mutex::new(None),
                on_detach: RwLock::new(None),
                close_tx,
                loading_state: RwLock::new(LoadingState::Idle),
            }),
        }
    }

    pub fn target_id(&self) -> &TargetId {
        &self.inner.target_id
    }

    pub fn ws_url(&self) -> &str {
        &self.inner.ws_url
    }

    pub fn frontend_url(&self) -> &str {
        &self.inner.frontend_url
    }

    pub fn is_headless(&self) -> bool {
        self.inner.is_headless
    }

    pub fn browser_family(&self) -> BrowserFamily {
        self.inner.browser_family
    }

    pub async fn connected(&self) -> bool {
        *self.inner.state.lock().await == ConnState::Connected
    }

    pub async fn loading_state(&self) -> LoadingState {
        *self.inner.loading_state.read().await
    }

    /// Sets the loading-state projection directly, ahead of any Page-domain
    /// event. Used by the navigate/reload wrappers to move off a prior
    /// `Stopped` before issuing the command that will eventually produce a
    /// fresh one, so a waiter can't observe the previous load's terminal
    /// state as if it were the new one.
    pub async fn mark_loading(&self, state: LoadingState) {
        *self.inner.loading_state.write().await = state;
    }

    pub fn contexts(&self) -> &ExecutionContextManager {
        &self.inner.contexts
    }

    /// Opens the WebSocket, marks the connection connected, and spawns the
    /// background receiver. Idempotent while already connected;
    /// re-activating a detached connection is an error.
    pub async fn activate(&self) -> Result<()> {
        {
            let mut state = self.inner.state.lock().await;
            match *state {
                ConnState::Connected => return Ok(()),
                ConnState::Detached => {
                    return Err(CdpError::InvalidState(
                        "cannot re-activate a detached connection",
                    ))
                }
                ConnState::Fresh => *state = ConnState::Connected,
            }
        }

        let connected = ws::connect(&self.inner.ws_url).await;
        let (sink, stream) = match connected {
            Ok(pair) => pair,
            Err(err) => {
                // The socket never opened: roll back to Fresh so a
                // subsequent activate() retries instead of observing
                // connected() == true with no receiver running.
                *self.inner.state.lock().await = ConnState::Fresh;
                return Err(err);
            }
        };
        *self.inner.sink.lock().await = Some(Box::new(sink));

        let receiver_conn = self.clone();
        let boxed_stream: Box<dyn TransportStream> = Box::new(stream);
        let handle = tokio::spawn(async move {
            receiver_conn.run_receiver(boxed_stream).await;
        });
        *self.inner.receiver_task.lock().await = Some(handle);

        if self.inner.on_event.is_some() {
            self.call_raw("Runtime.enable", serde_json::json!({}), true)
                .await?;
            self.inner
                .runtime_enabled
                .store(true, Ordering::SeqCst);
        }

        Ok(())
    }

    fn next_id(&self) -> u64 {
        self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Low-level call: assigns an id, pre-registers a response slot
    /// *before* sending so a response that arrives while the frame is still
    /// in flight can never race ahead of the waiter, sends, and awaits the
    /// slot.
    pub async fn call_raw(
        &self,
        method: impl Into<Cow<'static, str>>,
        params: serde_json::Value,
        wait_for_response: bool,
    ) -> Result<Option<serde_json::Value>> {
        if !self.connected().await {
            return Err(CdpError::ConnectionLost);
        }

        let id = self.next_id();
        let method = method.into();

        let rx = if wait_for_response {
            let (tx, rx) = oneshot::channel();
            self.inner.pending.lock().await.insert(id, tx);
            Some(rx)
        } else {
            None
        };

        let call = MethodCall {
            id,
            method: method.clone(),
            session_id: None,
            params: params.clone(),
        };
        let text = serde_json::to_string(&call)?;

        debug!(target_id = %self.inner.target_id, %id, %method, "send");
        let send_result = {
            let mut guard = self.inner.sink.lock().await;
            match guard.as_mut() {
                Some(sink) => sink.send_text(text).await,
                None => Err(CdpError::ConnectionLost),
            }
        };

        if let Err(err) = send_result {
            if wait_for_response {
                self.inner.pending.lock().await.remove(&id);
            }
            return Err(err);
        }

        match rx {
            None => Ok(None),
            Some(rx) => match rx.await.map_err(|_| CdpError::ConnectionLost)? {
                CallOutcome::Result(v) => Ok(Some(v)),
                CallOutcome::Error(err) => {
                    Err(classify_protocol_error(&method, &params, err.code, &err.message))
                }
            },
        }
    }

    /// Typed convenience over [`Connection::call_raw`] for the engine's own
    /// hand-rolled command structs.
    pub async fn call<C: Command>(&self, cmd: C) -> Result<C::Response> {
        let method = cmd.identifier();
        let params = serde_json::to_value(&cmd)?;
        let result = self
            .call_raw(method, params, true)
            .await?
            .unwrap_or(serde_json::Value::Null);
        Ok(serde_json::from_value(result)?)
    }

    /// Wraps `Runtime.evaluate`, surfacing `exceptionDetails` as a typed
    /// [`CdpError::Evaluate`] with the protocol's row/column pointer.
    pub async fn eval(
        &self,
        expression: impl Into<String>,
        return_by_value: bool,
        await_promise: bool,
    ) -> Result<serde_json::Value> {
        let params = serde_json::json!({
            "expression": expression.into(),
            "returnByValue": return_by_value,
            "awaitPromise": await_promise,
        });
        let result = self
            .call_raw("Runtime.evaluate", params, true)
            .await?
            .unwrap_or(serde_json::Value::Null);

        if let Some(exc) = result.get("exceptionDetails") {
            let text = exc
                .get("exception")
                .and_then(|e| e.get("description"))
                .or_else(|| exc.get("text"))
                .and_then(|v| v.as_str())
                .unwrap_or("evaluation error")
                .to_string();
            let line = exc.get("lineNumber").and_then(|n| n.as_u64()).unwrap_or(0) as u32;
            let column = exc
                .get("columnNumber")
                .and_then(|n| n.as_u64())
                .unwrap_or(0) as u32;
            return Err(CdpError::Evaluate { text, line, column });
        }

        Ok(result.get("result").cloned().unwrap_or(serde_json::Value::Null))
    }

    /// Awaits a JS Promise's result. The expression must end with
    /// `.then(result)`; see `promise::rewrite_promise_tail` for the
    /// bit-exact rewrite.
    pub async fn eval_promise(&self, expression: &str) -> Result<serde_json::Value> {
        let channel_id = promise::channel_id_for(expression);
        let rewritten = promise::rewrite_promise_tail(expression, &channel_id)?;
        let rx = self.inner.promises.register(channel_id).await;
        self.eval(rewritten, false, false).await?;
        rx.await.map_err(|_| CdpError::ConnectionLost)
    }

    async fn ensure_runtime_enabled(&self) -> Result<()> {
        if !self.inner.config.runtime_enable_on_listener {
            return Ok(());
        }
        if !self.inner.runtime_enabled.load(Ordering::SeqCst) {
            self.call_raw("Runtime.enable", serde_json::json!({}), true)
                .await?;
            self.inner.runtime_enabled.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    /// Registers a JS-callback listener by name.
    pub async fn add_listener(
        &self,
        name: impl Into<String>,
        handler: JsCallbackHandler,
    ) -> Result<()> {
        self.inner.listeners.add_listener(name, handler).await;
        self.ensure_runtime_enabled().await
    }

    pub async fn remove_listener(&self, name: &str) {
        self.inner.listeners.remove_listener(name).await;
    }

    /// Registers a CDP event listener.
    pub async fn add_event_listener(
        &self,
        event: impl Into<String>,
        handler: EventHandler,
    ) -> Result<()> {
        self.inner.listeners.add_event_listener(event, handler).await;
        self.ensure_runtime_enabled().await
    }

    pub async fn remove_event_listener(&self, event: &str, handler: &EventHandler) {
        self.inner.listeners.remove_event_listener(event, handler).await;
    }

    pub async fn remove_all_for_event(&self, event: &str) {
        self.inner.listeners.remove_all_for_event(event).await;
    }

    pub async fn set_on_detach(&self, hook: DetachHook) {
        *self.inner.on_detach.write().await = Some(hook);
    }

    pub async fn remove_on_detach(&self) {
        *self.inner.on_detach.write().await = None;
    }

    /// Suspends until `Inspector.detached (reason=target_closed)` arrives.
    pub async fn wait_for_close(&self) {
        let mut rx = self.inner.close_tx.subscribe();
        if *rx.borrow() {
            return;
        }
        let _ = rx.changed().await;
    }

    /// Cancels the receiver, marks disconnected, and awaits the on-detach
    /// hook if one is set. Does NOT close the remote target — detaching is
    /// a purely local teardown of this connection's resources.
    /// Idempotent: detaching twice is observationally equivalent to once.
    pub async fn detach(&self) {
        {
            let mut state = self.inner.state.lock().await;
            if *state != ConnState::Connected {
                return;
            }
            *state = ConnState::Detached;
        }

        if let Some(handle) = self.inner.receiver_task.lock().await.take() {
            handle.abort();
        }
        *self.inner.sink.lock().await = None;

        for (_, tx) in self.inner.pending.lock().await.drain() {
            let _ = tx.send(CallOutcome::Error(ProtocolError {
                code: -1,
                message: "connection lost".to_string(),
                data: None,
            }));
        }

        if self.inner.verbose {
            debug!(target_id = %self.inner.target_id, "detach");
        }

        let hook = self.inner.on_detach.read().await.clone();
        if let Some(hook) = hook {
            hook().await;
        }
    }

    async fn run_receiver(self, mut stream: Box<dyn TransportStream>) {
        loop {
            let frame = match stream.recv_text().await {
                Ok(Some(text)) => text,
                Ok(None) => {
                    self.detach().await;
                    return;
                }
                Err(err) => {
                    warn!(target_id = %self.inner.target_id, %err, "transport error, detaching");
                    self.detach().await;
                    return;
                }
            };

            let envelope = match Envelope::decode(&frame) {
                Ok(env) => env,
                Err(err) => {
                    // Swallowed rather than propagated: raising here would
                    // deadlock every pending call on this connection.
                    warn!(target_id = %self.inner.target_id, %err, "unparsable frame, ignoring");
                    continue;
                }
            };

            if let Some(cb) = self.inner.on_event.clone() {
                let raw: serde_json::Value =
                    serde_json::from_str(&frame).unwrap_or(serde_json::Value::Null);
                tokio::spawn(cb(raw));
            }

            match envelope {
                Envelope::Response { id, result, error } => {
                    self.dispatch_response(id, result, error).await;
                }
                Envelope::Event {
                    method,
                    params,
                    session_id: _,
                } => {
                    self.dispatch_event(method, params).await;
                }
            }
        }
    }

    async fn dispatch_response(
        &self,
        id: u64,
        result: Option<serde_json::Value>,
        error: Option<ProtocolError>,
    ) {
        let sender = self.inner.pending.lock().await.remove(&id);
        if let Some(tx) = sender {
            let outcome = match error {
                Some(err) => CallOutcome::Error(err),
                None => CallOutcome::Result(result.unwrap_or(serde_json::Value::Null)),
            };
            let _ = tx.send(outcome);
        }
    }

    async fn dispatch_event(&self, method: String, params: serde_json::Value) {
        if method == "Inspector.detached" {
            if params.get("reason").and_then(|r| r.as_str()) == Some("target_closed") {
                let _ = self.inner.close_tx.send(true);
                self.detach().await;
                return;
            }
        }

        self.inner.contexts.on_event(&method, &params).await;
        self.update_loading_state(&method, &params).await;

        if method == "Runtime.consoleAPICalled" {
            if params.get("type").and_then(|t| t.as_str()) == Some("info") {
                self.dispatch_console_control_frame(&params).await;
            }
        }

        let handlers = self.inner.listeners.snapshot_for_event(&method).await;
        for handler in handlers {
            let p = params.clone();
            tokio::spawn(handler(p));
        }
    }

    async fn dispatch_console_control_frame(&self, params: &serde_json::Value) {
        let Some(arg0) = params
            .get("args")
            .and_then(|a| a.as_array())
            .and_then(|a| a.first())
        else {
            return;
        };
        let Some(str_value) = arg0.get("value").and_then(|v| v.as_str()) else {
            return;
        };
        let Ok(decoded) = serde_json::from_str::<serde_json::Value>(str_value) else {
            if self.inner.verbose {
                warn!(raw = %str_value, "console.info payload is not JSON, treating as ordinary output");
            }
            return;
        };

        if let Some(func_name) = decoded.get("func_name").and_then(|v| v.as_str()) {
            if let Some(handler) = self.inner.listeners.callback(func_name).await {
                let args = decoded
                    .get("args")
                    .and_then(|a| a.as_array())
                    .cloned()
                    .unwrap_or_default();
                tokio::spawn(handler(args));
            }
            return;
        }

        if let Some(channel_id) = decoded.get("channel_id").and_then(|v| v.as_str()) {
            let result = decoded.get("result").cloned().unwrap_or(serde_json::Value::Null);
            self.inner.promises.deliver(channel_id, result).await;
        }
    }

    async fn update_loading_state(&self, method: &str, params: &serde_json::Value) {
        let frame_id = params.get("frameId").and_then(|f| f.as_str());
        let is_own_frame = frame_id == Some(self.inner.target_id.as_str());

        let mut state = self.inner.loading_state.write().await;
        match method {
            "Page.frameStartedLoading" if is_own_frame => *state = LoadingState::Started,
            "Page.frameNavigated" => {
                let navigated_own = params
                    .get("frame")
                    .and_then(|f| f.get("id"))
                    .and_then(|id| id.as_str())
                    == Some(self.inner.target_id.as_str());
                if navigated_own {
                    *state = LoadingState::Navigated;
                }
            }
            "Page.frameStoppedLoading" if is_own_frame => *state = LoadingState::Stopped,
            _ => {}
        }
    }
}

/// Wires a `Connection` directly to an in-process mock transport, bypassing
/// `activate()`'s real `ws::connect`. Shared by this module's tests and by
/// other modules' tests that need a live-looking `Connection` (e.g.
/// `page.rs`).
#[cfg(test)]
pub(crate) fn test_connection() -> (Connection, ws::mock::MockHandle) {
    let ((sink, stream), handle) = ws::mock::pair();
    let conn = Connection::new(ConnectionParams {
        ws_url: "ws://127.0.0.1:9222/devtools/page/ABC".into(),
        target_id: TargetId::new("ABC"),
        frontend_url: "/devtools/inspector.html".into(),
        is_headless: true,
        verbose: false,
        browser_family: BrowserFamily::Chrome,
        on_event: None,
        config: ConnectionConfig::default(),
    });
    conn.inner
        .state
        .try_lock()
        .map(|mut s| *s = ConnState::Connected)
        .ok();
    *conn.inner.sink.try_lock().unwrap() = Some(Box::new(sink));
    let receiver_conn = conn.clone();
    let jh = tokio::spawn(async move {
        receiver_conn.run_receiver(Box::new(stream)).await;
    });
    *conn.inner.receiver_task.try_lock().unwrap() = Some(jh);
    (conn, handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn correlates_concurrent_calls_by_id() {
        let (conn, mut handle) = test_connection();

        let c1 = conn.clone();
        let fut1 = tokio::spawn(async move {
            c1.call_raw("Runtime.evaluate", serde_json::json!({"expression": "1+1"}), true)
                .await
        });
        let c2 = conn.clone();
        let fut2 = tokio::spawn(async move {
            c2.call_raw("Runtime.evaluate", serde_json::json!({"expression": "2+2"}), true)
                .await
        });

        // Drain both outgoing requests before answering, to exercise
        // out-of-order delivery.
        let req_a: serde_json::Value =
            serde_json::from_str(&handle.outbound.recv().await.unwrap()).unwrap();
        let req_b: serde_json::Value =
            serde_json::from_str(&handle.outbound.recv().await.unwrap()).unwrap();

        // Answer the second request first.
        handle
            .inbound
            .send(format!(r#"{{"id":{},"result":{{"value":4}}}}"#, req_b["id"]))
            .unwrap();
        handle
            .inbound
            .send(format!(r#"{{"id":{},"result":{{"value":2}}}}"#, req_a["id"]))
            .unwrap();

        let r1 = fut1.await.unwrap().unwrap().unwrap();
        let r2 = fut2.await.unwrap().unwrap().unwrap();
        assert_eq!(r1["value"], 2);
        assert_eq!(r2["value"], 4);
    }

    #[tokio::test]
    async fn response_arriving_before_waiter_is_still_delivered() {
        // The pre-insert-before-send rule means there's no observable
        // window where a response can outrun its waiter from the caller's
        // perspective; this exercises the ordinary path end-to-end.
        let (conn, mut handle) = test_connection();

        let c1 = conn.clone();
        let fut = tokio::spawn(async move {
            c1.call_raw("Target.getTargetInfo", serde_json::json!({}), true)
                .await
        });

        let req: serde_json::Value =
            serde_json::from_str(&handle.outbound.recv().await.unwrap()).unwrap();
        handle
            .inbound
            .send(format!(
                r#"{{"id":{},"result":{{"targetInfo":{{"targetId":"ABC123"}}}}}}"#,
                req["id"]
            ))
            .unwrap();

        let result = fut.await.unwrap().unwrap().unwrap();
        assert_eq!(result["targetInfo"]["targetId"], "ABC123");
    }

    #[tokio::test]
    async fn js_callback_bridge_invokes_registered_listener_once() {
        use std::sync::atomic::{AtomicUsize, Ordering as AOrdering};

        let (conn, handle) = test_connection();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen_args = Arc::new(Mutex::new(Vec::new()));

        let calls2 = calls.clone();
        let seen2 = seen_args.clone();
        conn.add_listener(
            "test_func",
            Arc::new(move |args| {
                let calls = calls2.clone();
                let seen = seen2.clone();
                Box::pin(async move {
                    calls.fetch_add(1, AOrdering::SeqCst);
                    *seen.lock().await = args;
                })
            }),
        )
        .await
        .unwrap();

        let payload = serde_json::json!({"func_name": "test_func", "args": [1, "x"]}).to_string();
        let frame = serde_json::json!({
            "method": "Runtime.consoleAPICalled",
            "params": {"type": "info", "args": [{"value": payload}]}
        });
        handle.inbound.send(frame.to_string()).unwrap();

        // give the spawned handler a turn
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(calls.load(AOrdering::SeqCst), 1);
        assert_eq!(*seen_args.lock().await, vec![serde_json::json!(1), serde_json::json!("x")]);
    }

    #[tokio::test]
    async fn non_json_console_info_is_ignored_not_fatal() {
        let (conn, handle) = test_connection();
        let frame = serde_json::json!({
            "method": "Runtime.consoleAPICalled",
            "params": {"type": "info", "args": [{"value": "not json at all"}]}
        });
        handle.inbound.send(frame.to_string()).unwrap();

        // connection must still be usable afterwards
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert!(conn.connected().await);
    }

    #[tokio::test]
    async fn detach_is_idempotent() {
        let (conn, _handle) = test_connection();
        conn.detach().await;
        assert!(!conn.connected().await);
        conn.detach().await;
        assert!(!conn.connected().await);
    }

    #[tokio::test]
    async fn wait_for_close_resolves_on_target_closed() {
        let (conn, handle) = test_connection();
        let waiter = conn.clone();
        let join = tokio::spawn(async move {
            waiter.wait_for_close().await;
        });

        handle
            .inbound
            .send(r#"{"method":"Inspector.detached","params":{"reason":"target_closed"}}"#.into())
            .unwrap();

        tokio::time::timeout(std::time::Duration::from_millis(500), join)
            .await
            .expect("wait_for_close should resolve")
            .unwrap();
        assert!(!conn.connected().await);
    }

    #[tokio::test]
    async fn unknown_event_with_no_listener_is_dropped_silently() {
        let (conn, handle) = test_connection();
        handle
            .inbound
            .send(r#"{"method":"Network.loadingFinished","params":{}}"#.into())
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert!(conn.connected().await);
    }
}
