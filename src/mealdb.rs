//! Client for the public recipe source the proxy forwards to (TheMealDB v1 layout).

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::meal::SourceMeal;

pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Every endpoint wraps its records in `{"meals": [...]}`; no match is `{"meals": null}`.
#[derive(Deserialize)]
struct MealsEnvelope<T> {
    meals: Option<Vec<T>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterBy {
    Category(String),
    Area(String),
}

#[derive(Clone)]
pub struct MealDb {
    http: reqwest::Client,
    base_url: String,
}

impl MealDb {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get_meals<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, reqwest::Error> {
        let url = format!("{}/{}", self.base_url, path);
        let envelope: MealsEnvelope<T> = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(envelope.meals.unwrap_or_default())
    }

    pub async fn search(&self, term: &str) -> Result<Vec<SourceMeal>, reqwest::Error> {
        self.get_meals(&format!("search.php?s={}", urlencoding::encode(term)))
            .await
    }

    /// Raw filter records, passed through unchanged.
    pub async fn filter(&self, by: &FilterBy) -> Result<Vec<Value>, reqwest::Error> {
        let param = match by {
            FilterBy::Category(category) => format!("c={}", urlencoding::encode(category)),
            FilterBy::Area(area) => format!("a={}", urlencoding::encode(area)),
        };
        self.get_meals(&format!("filter.php?{param}")).await
    }

    pub async fn list_categories(&self) -> Result<Vec<Value>, reqwest::Error> {
        self.get_meals("list.php?c=list").await
    }

    pub async fn list_areas(&self) -> Result<Vec<Value>, reqwest::Error> {
        self.get_meals("list.php?a=list").await
    }
}
