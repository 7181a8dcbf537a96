use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::api::errors::ApiError;
use crate::api::types::ActionOutcome;
use crate::filters::FilterState;
use crate::imports::ImportRequest;
use crate::pagination::{Page, PagePayload};
use crate::workflow::WorkflowDraft;

/// Transport to the console backend.
///
/// Kept object-safe and untyped (raw JSON) so tests can script responses;
/// decoding into domain types happens in the free functions below.
#[async_trait]
pub trait Backend: Send + Sync {
    /// GET `path` with query parameters and return the JSON body.
    async fn get_json(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<serde_json::Value, ApiError>;

    /// POST a JSON body to an action endpoint.
    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError>;

    /// POST an import as a multipart form.
    async fn upload_import(
        &self,
        path: &str,
        request: &ImportRequest,
    ) -> Result<serde_json::Value, ApiError>;
}

fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })
}

/// Fetch a status snapshot from `path`.
pub async fn fetch_snapshot<T, B>(backend: &B, path: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    B: Backend + ?Sized,
{
    decode(backend.get_json(path, &[]).await?)
}

/// Fetch one page of a filtered list endpoint.
pub async fn fetch_page<T, B>(
    backend: &B,
    path: &str,
    filters: &FilterState,
    page: u64,
) -> Result<Page<T>, ApiError>
where
    T: DeserializeOwned,
    B: Backend + ?Sized,
{
    let query = filters.to_query_pairs(page);
    let payload: PagePayload<T> = decode(backend.get_json(path, &query).await?)?;
    Ok(payload.into())
}

/// Decode an action response, turning `success: false` into an error.
pub fn into_outcome(value: serde_json::Value, path: &str) -> Result<ActionOutcome, ApiError> {
    // 204 responses decode to null
    let outcome: ActionOutcome = if value.is_null() {
        ActionOutcome {
            success: true,
            message: None,
            extra: serde_json::Map::new(),
        }
    } else {
        decode(value)?
    };

    if !outcome.success {
        warn!(
            event = "core.api.action_rejected",
            path = path,
            message = outcome.display_message()
        );
        return Err(ApiError::ActionRejected {
            message: outcome.display_message().to_string(),
        });
    }

    info!(event = "core.api.action_completed", path = path);
    Ok(outcome)
}

/// POST to an action endpoint (process, cancel, delete, create, clear cache).
pub async fn run_action<B>(
    backend: &B,
    path: &str,
    body: &serde_json::Value,
) -> Result<ActionOutcome, ApiError>
where
    B: Backend + ?Sized,
{
    into_outcome(backend.post_json(path, body).await?, path)
}

/// Upload an import and decode the creation response.
pub async fn upload_import<B>(
    backend: &B,
    path: &str,
    request: &ImportRequest,
) -> Result<ActionOutcome, ApiError>
where
    B: Backend + ?Sized,
{
    into_outcome(backend.upload_import(path, request).await?, path)
}

/// Persist a whole workflow draft in one request.
pub async fn save_draft<B>(
    backend: &B,
    path: &str,
    draft: &WorkflowDraft,
) -> Result<ActionOutcome, ApiError>
where
    B: Backend + ?Sized,
{
    run_action(backend, path, &draft.to_payload()).await
}
