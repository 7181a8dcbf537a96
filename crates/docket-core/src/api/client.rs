use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::api::backend::Backend;
use crate::api::errors::ApiError;
use crate::config::DocketConfig;
use crate::imports::ImportRequest;

const CSRF_HEADER: &str = "X-CSRF-TOKEN";
const REQUESTED_WITH_HEADER: &str = "X-Requested-With";

/// Body of a 422 response.
#[derive(Debug, Deserialize)]
struct ValidationBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: BTreeMap<String, Vec<String>>,
}

/// reqwest-backed [`Backend`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    csrf_token: Option<String>,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl {
            url: base_url.clone(),
            message: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            REQUESTED_WITH_HEADER,
            HeaderValue::from_static("XMLHttpRequest"),
        );

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Network {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url,
            csrf_token: None,
            timeout,
        })
    }

    pub fn from_config(config: &DocketConfig) -> Result<Self, ApiError> {
        let client = Self::new(config.base_url(), config.request_timeout())?;
        Ok(match &config.server.csrf_token {
            Some(token) => client.with_csrf_token(token.clone()),
            None => client,
        })
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve an endpoint against the base URL. Absolute URLs (as found in
    /// pagination links) are used as-is.
    pub fn url(&self, path: &str) -> Result<reqwest::Url, ApiError> {
        let raw = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        };
        reqwest::Url::parse(&raw).map_err(|e| ApiError::InvalidUrl {
            url: raw,
            message: e.to_string(),
        })
    }

    fn mutating(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.csrf_token {
            Some(token) => builder.header(CSRF_HEADER, token),
            None => builder,
        }
    }

    async fn send(&self, path: &str, builder: RequestBuilder) -> Result<serde_json::Value, ApiError> {
        let response = builder
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error(path, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(path, e))?;

        debug!(
            event = "core.api.response_received",
            path = path,
            status = status.as_u16(),
            bytes = body.len()
        );

        interpret(status, &body)
    }
}

fn transport_error(path: &str, error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        warn!(event = "core.api.request_timed_out", path = path);
        ApiError::Timeout {
            path: path.to_string(),
        }
    } else if error.is_decode() {
        ApiError::Decode {
            message: error.to_string(),
        }
    } else {
        ApiError::Network {
            message: error.to_string(),
        }
    }
}

fn interpret(status: StatusCode, body: &str) -> Result<serde_json::Value, ApiError> {
    if status == StatusCode::UNPROCESSABLE_ENTITY {
        let parsed: ValidationBody =
            serde_json::from_str(body).unwrap_or(ValidationBody {
                message: None,
                errors: BTreeMap::new(),
            });
        return Err(ApiError::Validation {
            message: parsed
                .message
                .unwrap_or_else(|| "The given data was invalid".to_string()),
            fields: parsed.errors,
        });
    }

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }

    serde_json::from_str(body).map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })
}

#[async_trait]
impl Backend for ApiClient {
    async fn get_json(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.url(path)?;
        self.send(path, self.http.get(url).query(query)).await
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.url(path)?;
        let builder = self.mutating(self.http.post(url).json(body));
        self.send(path, builder).await
    }

    async fn upload_import(
        &self,
        path: &str,
        request: &ImportRequest,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.url(path)?;
        let bytes = tokio::fs::read(&request.file).await?;

        let mut form = Form::new();
        for (key, value) in request.text_fields() {
            form = form.text(key, value);
        }
        form = form
            .text("configuracion", request.config_json())
            .part("archivo", Part::bytes(bytes).file_name(request.file_name()));

        let builder = self.mutating(self.http.post(url).multipart(form));
        self.send(path, builder).await
    }
}
