//! Thin client for the Brave Search web API.

mod client;
mod types;

pub use client::BraveClient;
pub use types::{Freshness, SafeSearch, WebResult, WebSearchParams};
