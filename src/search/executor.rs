use super::{SearchExecutor, SearchQuery, SearchResultItem, SearchResultList};
use crate::brave::{BraveClient, WebResult, WebSearchParams};
use crate::error::SearchFailure;
use async_trait::async_trait;
use std::time::Instant;
use tracing::{error, info, Span};

/// [`SearchExecutor`] backed by the Brave web search endpoint.
///
/// Events are recorded under the span handed in at construction.
#[derive(Debug, Clone)]
pub struct BraveSearchExecutor {
    client: BraveClient,
    span: Span,
}

impl BraveSearchExecutor {
    pub fn new(client: BraveClient, span: Span) -> Self {
        Self { client, span }
    }
}

#[async_trait]
impl SearchExecutor for BraveSearchExecutor {
    async fn execute(&self, query: &SearchQuery) -> Result<SearchResultList, SearchFailure> {
        let params = to_web_params(query);
        info!(
            parent: &self.span,
            query = %query.query,
            count = params.count,
            offset = params.offset,
            safe_search = params.safe_search.as_param(),
            freshness = params.freshness.map(|f| f.as_param()),
            spellcheck = params.spellcheck,
            country = params.country.as_deref(),
            search_lang = params.search_lang.as_deref(),
            ui_lang = params.ui_lang.as_deref(),
            "executing search"
        );

        let start = Instant::now();
        match self.client.web_search(&query.query, &params).await {
            Ok(resp) => {
                let results: SearchResultList = resp.into_web_results().into_iter().map(to_item).collect();
                info!(
                    parent: &self.span,
                    query = %query.query,
                    result_count = results.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "search completed"
                );
                Ok(results)
            }
            Err(e) => {
                error!(parent: &self.span, query = %query.query, error = %e, "search failed");
                Err(SearchFailure::from(e))
            }
        }
    }
}

fn to_web_params(query: &SearchQuery) -> WebSearchParams {
    WebSearchParams {
        count: query.count,
        offset: query.offset,
        safe_search: query.safe_search,
        freshness: query.freshness,
        spellcheck: query.spellcheck,
        country: query.country.clone(),
        search_lang: query.search_lang.clone(),
        ui_lang: query.ui_lang.clone(),
    }
}

fn to_item(r: WebResult) -> SearchResultItem {
    SearchResultItem {
        title: r.title,
        url: r.url,
        description: r.description,
        page_age: r.page_age,
        language: r.language,
        family_friendly: r.family_friendly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::SearchError;
    use crate::search::Freshness;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn executor_for(server: &MockServer) -> BraveSearchExecutor {
        let config = Config {
            api_key: "k".into(),
            api_url: server.uri(),
            timeout_secs: 5,
            max_retries: 0,
            default_country: "US".into(),
            default_search_lang: "en".into(),
            default_ui_lang: "en-US".into(),
        };
        BraveSearchExecutor::new(BraveClient::new(&config).unwrap(), Span::none())
    }

    #[tokio::test]
    async fn preserves_upstream_order_and_fields() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "web": {"results": [
                {"title": "third", "url": "https://c.example", "description": "c",
                 "page_age": "2023-01-01", "language": "en", "family_friendly": false},
                {"title": "first", "url": "https://a.example", "description": "a",
                 "page_age": "2024-01-01", "language": "ja", "family_friendly": true},
                {"title": "second", "url": "https://b.example", "description": "b",
                 "page_age": "", "language": "de", "family_friendly": true}
            ]}
        });
        Mock::given(method("GET"))
            .and(path("/web/search"))
            .and(query_param("freshness", "pd"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let mut query = SearchQuery::new("news");
        query.freshness = Some(Freshness::PastDay);
        let results = executor_for(&server).execute(&query).await.unwrap();

        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["third", "first", "second"]);
        assert_eq!(
            results[1],
            SearchResultItem {
                title: "first".into(),
                url: "https://a.example".into(),
                description: "a".into(),
                page_age: "2024-01-01".into(),
                language: "ja".into(),
                family_friendly: true,
            }
        );
    }

    #[tokio::test]
    async fn empty_web_section_yields_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"type": "search"})))
            .mount(&server)
            .await;

        let results = executor_for(&server).execute(&SearchQuery::new("nothing")).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn upstream_error_becomes_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(422).set_body_string("bad country"))
            .mount(&server)
            .await;

        let failure = executor_for(&server).execute(&SearchQuery::new("x")).await.unwrap_err();
        assert!(matches!(failure.cause, SearchError::Api { status: 422, .. }));
        assert!(failure.to_string().contains("bad country"));
    }
}
