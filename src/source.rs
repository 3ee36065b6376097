//! The seam between client-side logic and the proxy service.
//!
//! Everything that fetches meals takes a [`MealSource`]. The HTTP implementation lives in
//! `client`; tests substitute an in-memory fake.

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::error::SourceError;
use crate::meal::{MealSummary, RawMeal};

/// Free-text search plus the active filters, as sent to `/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub categories: Vec<String>,
    pub areas: Vec<String>,
}

impl SearchQuery {
    /// Query-string pairs. Filter lists are comma-joined and omitted when empty.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("term", self.term.clone())];
        if !self.categories.is_empty() {
            params.push(("categories", self.categories.join(",")));
        }
        if !self.areas.is_empty() {
            params.push(("areas", self.areas.join(",")));
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOption {
    #[serde(rename = "strCategory")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaOption {
    #[serde(rename = "strArea")]
    pub name: String,
}

/// Raw `/options` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub categories: Vec<CategoryOption>,
    #[serde(default)]
    pub areas: Vec<AreaOption>,
}

pub trait MealSource {
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<MealSummary>, SourceError>> + Send;

    fn filter_by_category(
        &self,
        category: &str,
    ) -> impl Future<Output = Result<Vec<RawMeal>, SourceError>> + Send;

    fn filter_by_area(
        &self,
        area: &str,
    ) -> impl Future<Output = Result<Vec<RawMeal>, SourceError>> + Send;

    fn options(&self) -> impl Future<Output = Result<FilterOptions, SourceError>> + Send;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Search(SearchQuery),
        Category(String),
        Area(String),
        Options,
    }

    /// Canned responses plus a log of every call made.
    #[derive(Default)]
    pub struct FakeSource {
        pub results: Vec<MealSummary>,
        pub by_category: HashMap<String, Vec<RawMeal>>,
        pub by_area: HashMap<String, Vec<RawMeal>>,
        pub options: FilterOptions,
        pub failing: bool,
        pub calls: Mutex<Vec<Call>>,
    }

    impl FakeSource {
        pub fn failing() -> Self {
            FakeSource {
                failing: true,
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) -> Result<(), SourceError> {
            self.calls.lock().unwrap().push(call);
            if self.failing {
                Err(SourceError::Status(500))
            } else {
                Ok(())
            }
        }
    }

    pub fn summary(id: &str, category: &str, area: &str) -> MealSummary {
        MealSummary {
            id: id.to_string(),
            title: format!("Meal {id}"),
            category: category.to_string(),
            area: area.to_string(),
            image: format!("https://img.example/{id}.jpg"),
        }
    }

    pub fn raw(id: &str) -> RawMeal {
        RawMeal {
            id: id.to_string(),
            name: format!("Meal {id}"),
            thumbnail: None,
        }
    }

    impl MealSource for FakeSource {
        async fn search(&self, query: &SearchQuery) -> Result<Vec<MealSummary>, SourceError> {
            self.record(Call::Search(query.clone()))?;
            Ok(self.results.clone())
        }

        async fn filter_by_category(&self, category: &str) -> Result<Vec<RawMeal>, SourceError> {
            self.record(Call::Category(category.to_string()))?;
            Ok(self.by_category.get(category).cloned().unwrap_or_default())
        }

        async fn filter_by_area(&self, area: &str) -> Result<Vec<RawMeal>, SourceError> {
            self.record(Call::Area(area.to_string()))?;
            Ok(self.by_area.get(area).cloned().unwrap_or_default())
        }

        async fn options(&self) -> Result<FilterOptions, SourceError> {
            self.record(Call::Options)?;
            Ok(self.options.clone())
        }
    }
}
