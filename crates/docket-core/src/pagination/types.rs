use serde::{Deserialize, Serialize};

use super::errors::PageError;
use super::links::{NEXT_LABEL, PREVIOUS_LABEL, build_links};

/// Neighbouring pages shown on each side of the current one.
const LINKS_ON_EACH_SIDE: u64 = 2;

/// One entry of a pagination link list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub url: Option<String>,
    pub label: String,
    #[serde(default)]
    pub active: bool,
}

/// A normalized page of results.
///
/// Invariants:
/// - `current_page` and `last_page` are at least 1, even for an empty collection.
/// - `current_page <= last_page`.
/// - `from`/`to` are 1-based positions of the first/last item on this page,
///   `None` when the page is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: u64,
    pub last_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub links: Vec<PageLink>,
}

impl<T> Page<T> {
    /// An empty first page.
    pub fn empty(per_page: u64) -> Self {
        Self {
            data: Vec::new(),
            current_page: 1,
            last_page: 1,
            per_page: per_page.max(1),
            total: 0,
            from: None,
            to: None,
            links: Vec::new(),
        }
    }

    /// Paginate a local collection.
    ///
    /// Pages beyond the end are clamped to the last page, so requesting
    /// page 1 of nothing yields an empty page 1 of 1.
    pub fn paginate(items: Vec<T>, page: u64, per_page: u64) -> Result<Self, PageError> {
        if per_page == 0 {
            return Err(PageError::InvalidPageSize);
        }
        if page == 0 {
            return Err(PageError::InvalidPageNumber);
        }

        let total = items.len() as u64;
        let last_page = last_page_for(total, per_page);
        let current_page = page.min(last_page);

        let skip = (current_page - 1).saturating_mul(per_page) as usize;
        let data: Vec<T> = items
            .into_iter()
            .skip(skip)
            .take(per_page as usize)
            .collect();

        let (from, to) = bounds(skip as u64, data.len() as u64);
        let links = build_links(current_page, last_page, LINKS_ON_EACH_SIDE, |_| None);

        Ok(Self {
            data,
            current_page,
            last_page,
            per_page,
            total,
            from,
            to,
            links,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    /// URL of the Next link, when the server supplied one.
    pub fn next_url(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.label == NEXT_LABEL)
            .and_then(|l| l.url.as_deref())
    }

    /// Numbered links around the current page, with gaps, for display.
    /// Numbers carry no URL; callers navigate by page number.
    pub fn link_window(&self, on_each_side: u64) -> Vec<PageLink> {
        build_links(self.current_page, self.last_page, on_each_side, |_| None)
    }

    /// Transform the items while keeping the pagination metadata.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            current_page: self.current_page,
            last_page: self.last_page,
            per_page: self.per_page,
            total: self.total,
            from: self.from,
            to: self.to,
            links: self.links,
        }
    }

    /// "Showing 16 to 30 of 42 results" style summary.
    pub fn summary(&self) -> String {
        match (self.from, self.to) {
            (Some(from), Some(to)) => {
                format!("Showing {} to {} of {} results", from, to, self.total)
            }
            _ => "No results".to_string(),
        }
    }
}

fn last_page_for(total: u64, per_page: u64) -> u64 {
    total.div_ceil(per_page).max(1)
}

fn bounds(skip: u64, len: u64) -> (Option<u64>, Option<u64>) {
    if len == 0 {
        (None, None)
    } else {
        (Some(skip.saturating_add(1)), Some(skip.saturating_add(len)))
    }
}

/// Resource-style `meta` object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeta {
    pub current_page: Option<u64>,
    pub last_page: Option<u64>,
    pub per_page: Option<u64>,
    pub total: Option<u64>,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub links: Option<Vec<PageLink>>,
}

/// Resource-style `links` map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLinkMap {
    pub first: Option<String>,
    pub last: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLinks {
    List(Vec<PageLink>),
    Map(RawLinkMap),
}

/// A paginated payload exactly as the backend sent it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPage<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    pub current_page: Option<u64>,
    pub last_page: Option<u64>,
    pub per_page: Option<u64>,
    pub total: Option<u64>,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub meta: Option<RawMeta>,
    pub links: Option<RawLinks>,
}

/// Anything a list endpoint may return: a paginated object or a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PagePayload<T> {
    Plain(Vec<T>),
    Paginated(RawPage<T>),
}

impl<T> From<PagePayload<T>> for Page<T> {
    fn from(payload: PagePayload<T>) -> Self {
        match payload {
            PagePayload::Plain(items) => {
                let per_page = (items.len() as u64).max(1);
                let total = items.len() as u64;
                let (from, to) = bounds(0, total);
                Page {
                    data: items,
                    current_page: 1,
                    last_page: 1,
                    per_page,
                    total,
                    from,
                    to,
                    links: Vec::new(),
                }
            }
            PagePayload::Paginated(raw) => raw.into(),
        }
    }
}

impl<T> From<RawPage<T>> for Page<T> {
    fn from(raw: RawPage<T>) -> Self {
        let meta = raw.meta.unwrap_or_default();
        let len = raw.data.len() as u64;

        let total = raw.total.or(meta.total).unwrap_or(len);
        let per_page = raw.per_page.or(meta.per_page).unwrap_or(len).max(1);
        let last_page = raw
            .last_page
            .or(meta.last_page)
            .unwrap_or_else(|| last_page_for(total, per_page))
            .max(1);
        let current_page = raw
            .current_page
            .or(meta.current_page)
            .unwrap_or(1)
            .clamp(1, last_page);

        let (computed_from, computed_to) =
            bounds((current_page - 1).saturating_mul(per_page), len);
        let (from, to) = if len == 0 {
            (None, None)
        } else {
            (
                raw.from.or(meta.from).or(computed_from),
                raw.to.or(meta.to).or(computed_to),
            )
        };

        let links = match (raw.links, meta.links) {
            (Some(RawLinks::List(list)), _) => list,
            (_, Some(list)) => list,
            (Some(RawLinks::Map(map)), None) => vec![
                PageLink {
                    url: map.prev,
                    label: PREVIOUS_LABEL.to_string(),
                    active: false,
                },
                PageLink {
                    url: map.next,
                    label: NEXT_LABEL.to_string(),
                    active: false,
                },
            ],
            (None, None) => Vec::new(),
        };

        Page {
            data: raw.data,
            current_page,
            last_page,
            per_page,
            total,
            from,
            to,
            links,
        }
    }
}
