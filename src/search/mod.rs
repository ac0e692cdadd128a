mod executor;

pub use crate::brave::{Freshness, SafeSearch};
pub use executor::BraveSearchExecutor;

use crate::error::SearchFailure;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

pub const DEFAULT_COUNT: u32 = 10;
pub const MAX_COUNT: u32 = 20;

/// A normalized search request, built fresh for each tool invocation.
///
/// `count` is always within `1..=MAX_COUNT`; constructors outside the
/// argument parser are expected to keep it there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub count: u32,
    pub offset: u32,
    pub safe_search: SafeSearch,
    pub freshness: Option<Freshness>,
    pub spellcheck: bool,
    pub country: Option<String>,
    pub search_lang: Option<String>,
    pub ui_lang: Option<String>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            count: DEFAULT_COUNT,
            offset: 0,
            safe_search: SafeSearch::default(),
            freshness: None,
            spellcheck: false,
            country: None,
            search_lang: None,
            ui_lang: None,
        }
    }
}

/// One web result, passed through from upstream untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResultItem {
    pub title: String,
    pub url: String,
    pub description: String,
    pub page_age: String,
    pub language: String,
    pub family_friendly: bool,
}

/// Results in upstream ranking order.
pub type SearchResultList = Vec<SearchResultItem>;

/// Runs a single search against the remote API.
///
/// The query text must already be non-empty. Implementations make one
/// outbound call per invocation and never retry on their own.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SearchExecutor: Send + Sync {
    async fn execute(&self, query: &SearchQuery) -> Result<SearchResultList, SearchFailure>;
}
