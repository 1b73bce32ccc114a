//! Test utilities for chatdeck-core
//!
//! A scripted [`RequestClient`] that records every call, for driving panels
//! in tests without a gateway.

use crate::client::RequestClient;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub params: Value,
}

#[derive(Debug, Clone)]
enum ScriptedResponse {
    Reply(Value),
    Fail(String),
}

/// Replies per method as scripted; unscripted methods answer `{"ok": true}`.
#[derive(Debug, Default)]
pub struct MockRequestClient {
    responses: Mutex<HashMap<String, ScriptedResponse>>,
    calls: Mutex<Vec<RecordedRequest>>,
}

impl MockRequestClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, method: &str, response: Value) -> Self {
        self.responses
            .get_mut()
            .insert(method.to_string(), ScriptedResponse::Reply(response));
        self
    }

    pub fn fail(mut self, method: &str, message: &str) -> Self {
        self.responses
            .get_mut()
            .insert(method.to_string(), ScriptedResponse::Fail(message.to_string()));
        self
    }

    pub async fn calls(&self) -> Vec<RecordedRequest> {
        self.calls.lock().await.clone()
    }

    /// Params of every call to `method`, in call order.
    pub async fn calls_to(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| call.method == method)
            .map(|call| call.params.clone())
            .collect()
    }
}

#[async_trait]
impl RequestClient for MockRequestClient {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        self.calls.lock().await.push(RecordedRequest {
            method: method.to_string(),
            params,
        });

        match self.responses.lock().await.get(method) {
            Some(ScriptedResponse::Reply(value)) => Ok(value.clone()),
            Some(ScriptedResponse::Fail(message)) => Err(Error::request(method, message.clone())),
            None => Ok(json!({ "ok": true })),
        }
    }
}
