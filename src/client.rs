use log::debug;
use serde::de::DeserializeOwned;

use crate::error::SourceError;
use crate::meal::{MealSummary, RawMeal};
use crate::source::{FilterOptions, MealSource, SearchQuery};

/// [`MealSource`] backed by the proxy's HTTP API. No timeouts and no retries.
#[derive(Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    /// `base_url` is the proxy's API root, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {url} {query:?}");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))
    }
}

impl MealSource for ProxyClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<MealSummary>, SourceError> {
        self.get_json("search", &query.params()).await
    }

    async fn filter_by_category(&self, category: &str) -> Result<Vec<RawMeal>, SourceError> {
        self.get_json("filter", &[("category", category.to_string())])
            .await
    }

    async fn filter_by_area(&self, area: &str) -> Result<Vec<RawMeal>, SourceError> {
        self.get_json("filter", &[("area", area.to_string())]).await
    }

    async fn options(&self) -> Result<FilterOptions, SourceError> {
        self.get_json("options", &[]).await
    }
}
