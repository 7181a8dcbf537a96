use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::api::{ApiError, Backend, fetch_page};
use crate::config::defaults::DEFAULT_PER_PAGE;
use crate::filters::state::FilterState;
use crate::pagination::Page;

/// The filtered list shown for one endpoint.
///
/// Filters and page only change once the server has answered: a failed
/// request leaves the previously displayed data and selection in place.
#[derive(Debug, Clone)]
pub struct FilterSession<T> {
    path: String,
    applied: FilterState,
    page: Page<T>,
    last_error: Option<String>,
}

impl<T: DeserializeOwned> FilterSession<T> {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            applied: FilterState::new(),
            page: Page::empty(DEFAULT_PER_PAGE),
            last_error: None,
        }
    }

    /// Page size assumed until the first response arrives.
    pub fn with_per_page(mut self, per_page: u64) -> Self {
        self.page = Page::empty(per_page);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Filters of the data currently displayed.
    pub fn filters(&self) -> &FilterState {
        &self.applied
    }

    pub fn page(&self) -> &Page<T> {
        &self.page
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Re-fetch the current page with the current filters.
    pub async fn reload<B>(&mut self, backend: &B) -> Result<&Page<T>, ApiError>
    where
        B: Backend + ?Sized,
    {
        let filters = self.applied.clone();
        let page = self.page.current_page;
        self.load(backend, filters, page).await
    }

    /// Apply a new filter selection. Always lands on page 1.
    pub async fn apply<B>(&mut self, backend: &B, filters: FilterState) -> Result<&Page<T>, ApiError>
    where
        B: Backend + ?Sized,
    {
        self.load(backend, filters, 1).await
    }

    pub async fn go_to_page<B>(&mut self, backend: &B, page: u64) -> Result<&Page<T>, ApiError>
    where
        B: Backend + ?Sized,
    {
        let filters = self.applied.clone();
        self.load(backend, filters, page).await
    }

    /// Fetch `page` of the list under `filters`, committing both on success.
    pub async fn load<B>(
        &mut self,
        backend: &B,
        filters: FilterState,
        page: u64,
    ) -> Result<&Page<T>, ApiError>
    where
        B: Backend + ?Sized,
    {
        let page = page.max(1);
        info!(
            event = "core.filters.apply_started",
            path = %self.path,
            page = page,
            filter_count = filters.normalized().len()
        );

        match fetch_page(backend, &self.path, &filters, page).await {
            Ok(fetched) => {
                info!(
                    event = "core.filters.apply_completed",
                    path = %self.path,
                    page = fetched.current_page,
                    total = fetched.total
                );
                self.applied = filters;
                self.page = fetched;
                self.last_error = None;
                Ok(&self.page)
            }
            Err(e) => {
                warn!(
                    event = "core.filters.apply_failed",
                    path = %self.path,
                    error = %e
                );
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
