//! Argument handling for the `web_search` tool.
//!
//! Hosts deliver arguments as an untyped JSON object. Each field is read by
//! its own parser and falls back to its default independently, so a bad
//! `count` never affects `offset` and wrong-typed values are never a fault.
//! Only a missing or empty `query` rejects the call.

use crate::search::{Freshness, SafeSearch, SearchExecutor, SearchQuery, DEFAULT_COUNT, MAX_COUNT};
use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use thiserror::Error;
use tracing::{debug, error, info, Span};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("query is required")]
    QueryRequired,
}

/// Raw `web_search` arguments as received from the host.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct WebSearchArgs(pub Map<String, Value>);

impl JsonSchema for WebSearchArgs {
    fn schema_name() -> Cow<'static, str> {
        "WebSearchArgs".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                },
                "count": {
                    "type": "number",
                    "description": "Number of results (default: 10, max: 20)"
                },
                "offset": {
                    "type": "number",
                    "description": "Pagination offset (default: 0)"
                },
                "safe_search": {
                    "type": "string",
                    "enum": ["off", "moderate", "strict"],
                    "description": "Safe search mode (off, moderate, strict)"
                },
                "freshness": {
                    "type": "string",
                    "enum": ["pd", "pw", "pm", "py"],
                    "description": "Freshness filter (pd: past day, pw: past week, pm: past month, py: past year)"
                },
                "spellcheck": {
                    "type": "boolean",
                    "description": "Enable spellcheck"
                },
                "country": {
                    "type": "string",
                    "description": "Country code (e.g., US, JP)"
                },
                "search_lang": {
                    "type": "string",
                    "description": "Search language (e.g., en, jp)"
                },
                "ui_lang": {
                    "type": "string",
                    "description": "UI language (e.g., en-US, ja-JP)"
                }
            },
            "required": ["query"]
        })
    }
}

impl WebSearchArgs {
    pub fn to_query(&self) -> Result<SearchQuery, ArgsError> {
        let args = &self.0;
        let query = parse_query(args).ok_or(ArgsError::QueryRequired)?;

        Ok(SearchQuery {
            count: normalize_count(integer_arg(args, "count")),
            offset: normalize_offset(integer_arg(args, "offset")),
            safe_search: parse_safe_search(args),
            freshness: parse_freshness(args),
            spellcheck: parse_spellcheck(args),
            country: string_arg(args, "country"),
            search_lang: string_arg(args, "search_lang"),
            ui_lang: string_arg(args, "ui_lang"),
            ..SearchQuery::new(query)
        })
    }
}

fn parse_query(args: &Map<String, Value>) -> Option<String> {
    string_arg(args, "query")
}

fn normalize_count(requested: Option<i64>) -> u32 {
    match requested {
        Some(c) if c > i64::from(MAX_COUNT) => MAX_COUNT,
        Some(c) if c > 0 => c as u32,
        _ => DEFAULT_COUNT,
    }
}

fn normalize_offset(requested: Option<i64>) -> u32 {
    match requested {
        Some(o) if o >= 0 => u32::try_from(o).unwrap_or(u32::MAX),
        _ => 0,
    }
}

fn parse_safe_search(args: &Map<String, Value>) -> SafeSearch {
    match args.get("safe_search").and_then(Value::as_str) {
        Some("off") => SafeSearch::Off,
        Some("strict") => SafeSearch::Strict,
        _ => SafeSearch::Moderate,
    }
}

fn parse_freshness(args: &Map<String, Value>) -> Option<Freshness> {
    match args.get("freshness").and_then(Value::as_str)? {
        "pd" => Some(Freshness::PastDay),
        "pw" => Some(Freshness::PastWeek),
        "pm" => Some(Freshness::PastMonth),
        "py" => Some(Freshness::PastYear),
        _ => None,
    }
}

fn parse_spellcheck(args: &Map<String, Value>) -> bool {
    args.get("spellcheck").and_then(Value::as_bool).unwrap_or(false)
}

/// Integral JSON numbers; fractional values are truncated toward zero.
fn integer_arg(args: &Map<String, Value>, key: &str) -> Option<i64> {
    let Value::Number(n) = args.get(key)? else { return None };
    n.as_i64()
        .or_else(|| n.as_u64().map(|_| i64::MAX))
        .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
}

fn string_arg(args: &Map<String, Value>, key: &str) -> Option<String> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Host-independent result of one `web_search` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    Success(String),
    Error(String),
}

pub async fn run_web_search(executor: &dyn SearchExecutor, args: &WebSearchArgs, span: &Span) -> ToolOutcome {
    let query = match args.to_query() {
        Ok(query) => query,
        Err(e) => {
            info!(parent: span, "rejected web_search call: {e}");
            return ToolOutcome::Error(e.to_string());
        }
    };

    debug!(parent: span, params = ?query, "executing web_search");

    let results = match executor.execute(&query).await {
        Ok(results) => results,
        Err(e) => {
            error!(parent: span, query = %query.query, params = ?query, error = %e, "failed to execute search");
            return ToolOutcome::Error(e.to_string());
        }
    };

    match serde_json::to_string(&results) {
        Ok(text) => ToolOutcome::Success(text),
        Err(e) => ToolOutcome::Error(format!("failed to serialize search results: {e}")),
    }
}
