use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SafeSearch {
    Off,
    #[default]
    Moderate,
    Strict,
}

impl SafeSearch {
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Moderate => "moderate",
            Self::Strict => "strict",
        }
    }
}

/// How recently a result must have been discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    PastDay,
    PastWeek,
    PastMonth,
    PastYear,
}

impl Freshness {
    pub fn as_param(self) -> &'static str {
        match self {
            Self::PastDay => "pd",
            Self::PastWeek => "pw",
            Self::PastMonth => "pm",
            Self::PastYear => "py",
        }
    }
}

/// Request parameters for `GET /web/search`. Unset locale fields fall back
/// to the defaults the client was built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebSearchParams {
    pub count: u32,
    pub offset: u32,
    pub safe_search: SafeSearch,
    pub freshness: Option<Freshness>,
    pub spellcheck: bool,
    pub country: Option<String>,
    pub search_lang: Option<String>,
    pub ui_lang: Option<String>,
}

impl Default for WebSearchParams {
    fn default() -> Self {
        Self {
            count: 10,
            offset: 0,
            safe_search: SafeSearch::Moderate,
            freshness: None,
            spellcheck: false,
            country: None,
            search_lang: None,
            ui_lang: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebSearchResponse {
    #[serde(default)]
    pub web: Option<WebResults>,
}

impl WebSearchResponse {
    pub fn into_web_results(self) -> Vec<WebResult> {
        self.web.map(|w| w.results).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebResults {
    #[serde(default)]
    pub results: Vec<WebResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebResult {
    pub title: String,
    pub url: String,
    pub description: String,
    pub page_age: String,
    pub language: String,
    pub family_friendly: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_partial_results() {
        let raw = r#"{
            "type": "search",
            "web": {
                "type": "search",
                "results": [
                    {"title": "A", "url": "https://a.example", "description": "first",
                     "page_age": "2024-01-02T00:00:00", "language": "en", "family_friendly": true,
                     "profile": {"name": "a"}},
                    {"title": "B", "url": "https://b.example"}
                ]
            }
        }"#;
        let resp: WebSearchResponse = serde_json::from_str(raw).unwrap();
        let results = resp.into_web_results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].page_age, "2024-01-02T00:00:00");
        assert!(results[0].family_friendly);
        assert_eq!(results[1].title, "B");
        assert_eq!(results[1].description, "");
        assert!(!results[1].family_friendly);
    }

    #[test]
    fn missing_web_section_is_empty() {
        let resp: WebSearchResponse = serde_json::from_str(r#"{"type": "search"}"#).unwrap();
        assert!(resp.into_web_results().is_empty());
    }
}
