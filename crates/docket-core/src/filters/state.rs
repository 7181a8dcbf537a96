use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::filters::errors::FilterError;

/// Query key of the free-text search box.
pub const SEARCH_KEY: &str = "search";

/// Query key carrying the page number.
pub const PAGE_KEY: &str = "page";

/// Value meaning "no restriction" in select filters.
const ALL_VALUE: &str = "all";

/// A set of list filters.
///
/// Keys are kept sorted so the query string for a given selection is always
/// the same.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    values: BTreeMap<String, String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.set(SEARCH_KEY, text);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Parse and set a `key=value` pair.
    pub fn set_pair(&mut self, pair: &str) -> Result<(), FilterError> {
        let (key, value) = parse_pair(pair)?;
        self.set(key, value);
        Ok(())
    }

    /// Filters that actually restrict the list: empty values and `all` are
    /// dropped, values are trimmed.
    pub fn normalized(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .filter_map(|(key, value)| {
                let value = value.trim();
                if value.is_empty() || value.eq_ignore_ascii_case(ALL_VALUE) {
                    None
                } else {
                    Some((key.clone(), value.to_string()))
                }
            })
            .collect()
    }

    /// True when no filter restricts the list.
    pub fn is_unrestricted(&self) -> bool {
        self.normalized().is_empty()
    }

    /// Query parameters for a list request. Page 1 is implicit.
    pub fn to_query_pairs(&self, page: u64) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self.normalized().into_iter().collect();
        if page > 1 {
            pairs.push((PAGE_KEY.to_string(), page.to_string()));
        }
        pairs
    }
}

/// Split `key=value`. The value may be empty; the key may not.
pub fn parse_pair(pair: &str) -> Result<(String, String), FilterError> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| FilterError::InvalidPair {
            value: pair.to_string(),
        })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(FilterError::InvalidPair {
            value: pair.to_string(),
        });
    }
    if key == PAGE_KEY {
        return Err(FilterError::ReservedKey {
            key: key.to_string(),
        });
    }
    Ok((key.to_string(), value.trim().to_string()))
}
