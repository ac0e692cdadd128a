use crate::search::SearchExecutor;
use crate::tools::{run_web_search, ToolOutcome, WebSearchArgs};

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use tracing::Span;

impl From<ToolOutcome> for CallToolResult {
    fn from(outcome: ToolOutcome) -> Self {
        match outcome {
            ToolOutcome::Success(text) => CallToolResult::success(vec![Content::text(text)]),
            ToolOutcome::Error(message) => CallToolResult::error(vec![Content::text(message)]),
        }
    }
}

#[derive(Clone)]
pub struct BraveSearchServer {
    executor: Arc<dyn SearchExecutor>,
    span: Span,
}

impl BraveSearchServer {
    pub fn new(executor: Arc<dyn SearchExecutor>, span: Span) -> Self {
        Self { executor, span }
    }
}

#[tool_router]
impl BraveSearchServer {
    #[tool(description = r#"
    Performs a web search using the Brave Search API. Use this for broad information gathering,
    recent events, or when you need diverse web sources. Supports pagination, content filtering,
    and freshness controls. Maximum 20 results per request, with offset for pagination.

    Returns a JSON array of results, each with `title`, `url`, `description`, `page_age`,
    `language` and `family_friendly`, in the order ranked by Brave.
    "#)]
    pub async fn web_search(&self, Parameters(args): Parameters<WebSearchArgs>) -> Result<CallToolResult, McpError> {
        Ok(run_web_search(self.executor.as_ref(), &args, &self.span).await.into())
    }
}

#[tool_handler(router = Self::tool_router())]
impl ServerHandler for BraveSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "brave-search".into(),
                title: None,
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{MockSearchExecutor, SearchResultItem};

    fn server_with(executor: MockSearchExecutor) -> BraveSearchServer {
        BraveSearchServer::new(Arc::new(executor), Span::none())
    }

    fn params(value: serde_json::Value) -> Parameters<WebSearchArgs> {
        Parameters(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn registers_single_web_search_tool() {
        let tools = BraveSearchServer::tool_router().list_all();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "web_search");

        let required = tools[0].input_schema.get("required").cloned();
        assert_eq!(required, Some(serde_json::json!(["query"])));
    }

    #[tokio::test]
    async fn missing_query_is_tool_error_not_fault() {
        let mut executor = MockSearchExecutor::new();
        executor.expect_execute().never();

        let result = server_with(executor).web_search(params(serde_json::json!({}))).await.unwrap();
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn successful_search_is_not_error() {
        let mut executor = MockSearchExecutor::new();
        executor.expect_execute().times(1).returning(|_| {
            Ok(vec![SearchResultItem {
                title: "Rust".into(),
                url: "https://www.rust-lang.org".into(),
                description: "A language".into(),
                page_age: String::new(),
                language: "en".into(),
                family_friendly: true,
            }])
        });

        let result = server_with(executor)
            .web_search(params(serde_json::json!({"query": "rust", "count": 50})))
            .await
            .unwrap();
        assert_ne!(result.is_error, Some(true));
        assert_eq!(result.content.len(), 1);
    }

    #[test]
    fn advertises_tools_capability() {
        let info = server_with(MockSearchExecutor::new()).get_info();
        assert_eq!(info.server_info.name, "brave-search");
        assert!(info.capabilities.tools.is_some());
    }
}
