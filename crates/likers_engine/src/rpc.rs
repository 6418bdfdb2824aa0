//! JSON-RPC client for the on-device automation agent.
//!
//! The agent listens on HTTP and answers JSON-RPC 2.0 calls posted to
//! `{endpoint}/jsonrpc/0`. Calls block the current thread: the client owns a
//! single-threaded tokio runtime and drives each request to completion.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use campaign_logging::{campaign_trace, campaign_warn};
use likers_core::{InteractionRecord, SessionState};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::device::{Direction, Selector};
use crate::policy::{InteractionContext, InteractionOutcome, InteractionPolicy};
use crate::{Device, DeviceError};

/// JSON-RPC error code the agent uses when a selector matches nothing.
const UI_OBJECT_NOT_FOUND: i64 = -32002;

#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    /// Must exceed the longest element wait requested through the agent.
    pub request_timeout: Duration,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:9008".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Cheaply cloneable handle to the agent.
#[derive(Clone)]
pub struct AgentClient {
    inner: Arc<AgentInner>,
}

struct AgentInner {
    runtime: tokio::runtime::Runtime,
    http: reqwest::Client,
    url: reqwest::Url,
    next_id: AtomicU64,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl AgentClient {
    /// Build the client. No request is made until the first call.
    pub fn new(settings: &AgentSettings) -> Result<Self, DeviceError> {
        let base = reqwest::Url::parse(&settings.endpoint)
            .map_err(|err| DeviceError::Protocol(format!("bad agent endpoint: {err}")))?;
        let url = base
            .join("jsonrpc/0")
            .map_err(|err| DeviceError::Protocol(format!("bad agent endpoint: {err}")))?;
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| DeviceError::Disconnected(err.to_string()))?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| DeviceError::Disconnected(err.to_string()))?;

        Ok(Self {
            inner: Arc::new(AgentInner {
                runtime,
                http,
                url,
                next_id: AtomicU64::new(1),
            }),
        })
    }

    /// Call `method` and decode its result.
    pub fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, DeviceError> {
        let value = self.call_value(method, params)?;
        serde_json::from_value(value)
            .map_err(|err| DeviceError::Protocol(format!("{method}: {err}")))
    }

    /// Call `method` and return the raw result (`null` when absent).
    pub fn call_value(&self, method: &str, params: Value) -> Result<Value, DeviceError> {
        let inner = &self.inner;
        let id = inner.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::to_vec(&RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        })
        .map_err(|err| DeviceError::Protocol(err.to_string()))?;
        campaign_trace!("rpc #{} {}", id, method);

        inner.runtime.block_on(async {
            let response = inner
                .http
                .post(inner.url.clone())
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status();
            if !status.is_success() {
                return Err(DeviceError::Protocol(format!("{method}: http status {status}")));
            }
            let bytes = response.bytes().await.map_err(map_reqwest_error)?;
            let decoded: RpcResponse = serde_json::from_slice(&bytes)
                .map_err(|err| DeviceError::Protocol(format!("{method}: {err}")))?;

            match decoded.error {
                Some(error) => Err(map_rpc_error(error)),
                None => Ok(decoded.result.unwrap_or(Value::Null)),
            }
        })
    }
}

fn map_rpc_error(error: RpcError) -> DeviceError {
    if error.code == UI_OBJECT_NOT_FOUND {
        return DeviceError::ElementNotFound(error.message);
    }
    if error.message.to_ascii_lowercase().contains("crash") {
        return DeviceError::AppCrashed(error.message);
    }
    DeviceError::Agent {
        code: error.code,
        message: error.message,
    }
}

fn map_reqwest_error(err: reqwest::Error) -> DeviceError {
    if err.is_timeout() {
        return DeviceError::Timeout;
    }
    DeviceError::Disconnected(err.to_string())
}

/// [`Device`] backed by the agent.
#[derive(Clone)]
pub struct RpcDevice {
    client: AgentClient,
}

impl RpcDevice {
    pub fn new(client: AgentClient) -> Self {
        Self { client }
    }
}

impl Device for RpcDevice {
    fn open_url(&mut self, url: &str) -> Result<bool, DeviceError> {
        self.client.call("openUrl", json!([url]))
    }

    fn swipe(&mut self, direction: Direction, scale: f32) -> Result<(), DeviceError> {
        self.client
            .call_value("swipe", json!({ "direction": direction, "scale": scale }))
            .map(drop)
    }

    fn fling(&mut self, direction: Direction) -> Result<(), DeviceError> {
        self.client
            .call_value("fling", json!({ "direction": direction }))
            .map(drop)
    }

    fn wait_exists(
        &mut self,
        selector: &Selector,
        timeout: Duration,
    ) -> Result<bool, DeviceError> {
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.client
            .call("waitForExists", json!([selector, timeout_ms]))
    }

    fn click(&mut self, selector: &Selector) -> Result<(), DeviceError> {
        self.client.call_value("click", json!([selector])).map(drop)
    }

    fn visible_entries(&mut self) -> Result<Vec<String>, DeviceError> {
        self.client.call("visibleEntries", json!([]))
    }

    fn restart_app(&mut self) -> Result<(), DeviceError> {
        self.client.call_value("appRestart", json!([])).map(drop)
    }

    fn dump_hierarchy(&mut self) -> Result<String, DeviceError> {
        self.client.call("dumpHierarchy", json!([]))
    }

    fn start_recording(&mut self) -> Result<(), DeviceError> {
        self.client.call_value("screenrecordStart", json!([])).map(drop)
    }

    fn stop_recording(&mut self, keep: bool) -> Result<Option<String>, DeviceError> {
        self.client.call("screenrecordStop", json!({ "keep": keep }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum AgentVerdict {
    Acted,
    Skipped,
    Failed,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AgentInteraction {
    outcome: AgentVerdict,
    #[serde(default)]
    likes: u32,
    #[serde(default)]
    followed: bool,
    #[serde(default)]
    watched_stories: u32,
    #[serde(default)]
    commented: bool,
    #[serde(default)]
    messaged: bool,
}

/// [`InteractionPolicy`] that lets the agent decide and perform the actions,
/// then books them in the session.
pub struct RpcInteraction {
    client: AgentClient,
}

impl RpcInteraction {
    pub fn new(client: AgentClient) -> Self {
        Self { client }
    }
}

impl InteractionPolicy for RpcInteraction {
    fn interact(
        &mut self,
        _device: &mut dyn Device,
        username: &str,
        ctx: &InteractionContext<'_>,
        session: &mut SessionState,
    ) -> Result<InteractionOutcome, DeviceError> {
        let reply: AgentInteraction = self.client.call(
            "interactWithUser",
            json!({
                "username": username,
                "source": ctx.source,
                "percentages": ctx.percentages,
                "likesCount": ctx.likes_count,
                "canFollow": ctx.can_follow,
            }),
        )?;

        if reply.followed && !ctx.can_follow {
            campaign_warn!(
                "Agent followed {} although the follow limit for this source is reached",
                username
            );
        }
        let record = InteractionRecord {
            succeeded: matches!(reply.outcome, AgentVerdict::Acted),
            likes: reply.likes,
            followed: reply.followed,
            watched_stories: reply.watched_stories,
            commented: reply.commented,
            messaged: reply.messaged,
        };
        Ok(match reply.outcome {
            AgentVerdict::Skipped => InteractionOutcome::Skipped,
            AgentVerdict::Acted => {
                session.record_interaction(ctx.source, record);
                InteractionOutcome::Acted(record)
            }
            AgentVerdict::Failed => {
                session.record_interaction(ctx.source, record);
                InteractionOutcome::Failed
            }
        })
    }
}
