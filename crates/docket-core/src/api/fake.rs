//! Scripted in-memory backend for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::backend::Backend;
use crate::api::errors::ApiError;
use crate::imports::ImportRequest;

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

/// Returns queued responses in order; an empty queue yields a network error.
#[derive(Default)]
pub struct FakeBackend {
    responses: Mutex<VecDeque<Result<serde_json::Value, ApiError>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, value: serde_json::Value) {
        self.responses.lock().unwrap().push_back(Ok(value));
    }

    pub fn push_err(&self, error: ApiError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<serde_json::Value, ApiError> {
        self.calls.lock().unwrap().push(call);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ApiError::Network {
                    message: "no scripted response".to_string(),
                })
            })
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn get_json(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<serde_json::Value, ApiError> {
        self.record(Call {
            method: "GET",
            path: path.to_string(),
            query: query.to_vec(),
            body: None,
        })
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.record(Call {
            method: "POST",
            path: path.to_string(),
            query: Vec::new(),
            body: Some(body.clone()),
        })
    }

    async fn upload_import(
        &self,
        path: &str,
        request: &ImportRequest,
    ) -> Result<serde_json::Value, ApiError> {
        self.record(Call {
            method: "MULTIPART",
            path: path.to_string(),
            query: Vec::new(),
            body: Some(request.form_fields_json()),
        })
    }
}
