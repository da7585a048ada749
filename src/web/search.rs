//! Web search through the Google Custom Search JSON API

use serde::Deserialize;
use tracing::warn;

use super::error::WebError;

/// Snippets requested per query
pub const RESULT_COUNT: usize = 3;

const CUSTOM_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Outcome of a collapsed search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Ordered snippets, never empty
    Snippets(Vec<String>),
    /// No results, or the lookup failed
    NoResults,
}

/// Something that can answer a free-text query with snippets
pub trait WebSearch: Send {
    fn search(&self, query: &str) -> SearchOutcome;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Option<Vec<SearchItem>>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    snippet: String,
}

impl SearchResponse {
    fn into_snippets(self, query: &str, limit: usize) -> Result<Vec<String>, WebError> {
        let snippets: Vec<String> = self
            .items
            .unwrap_or_default()
            .into_iter()
            .take(limit)
            .map(|item| item.snippet)
            .collect();

        if snippets.is_empty() {
            return Err(WebError::Empty(query.to_string()));
        }
        Ok(snippets)
    }
}

/// Custom Search client
#[derive(Debug, Clone)]
pub struct CustomSearchClient {
    endpoint: String,
    api_key: Option<String>,
    engine_id: Option<String>,
    result_count: usize,
    client: reqwest::blocking::Client,
}

impl CustomSearchClient {
    pub fn new(api_key: Option<String>, engine_id: Option<String>) -> Self {
        Self {
            endpoint: CUSTOM_SEARCH_URL.to_string(),
            api_key,
            engine_id,
            result_count: RESULT_COUNT,
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Run a search, reporting exactly what went wrong on failure
    pub fn try_search(&self, query: &str) -> Result<Vec<String>, WebError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(WebError::MissingCredential("GOOGLE_API_KEY"))?;
        let engine = self
            .engine_id
            .as_deref()
            .ok_or(WebError::MissingCredential("GOOGLE_CSE_ID"))?;

        let response: SearchResponse = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", key),
                ("cx", engine),
                ("q", query),
                ("num", self.result_count.to_string().as_str()),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        response.into_snippets(query, self.result_count)
    }
}

impl WebSearch for CustomSearchClient {
    fn search(&self, query: &str) -> SearchOutcome {
        match self.try_search(query) {
            Ok(snippets) => SearchOutcome::Snippets(snippets),
            Err(e) => {
                warn!(query, error = %e, "web search failed");
                SearchOutcome::NoResults
            }
        }
    }
}
