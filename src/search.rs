//! Search orchestration.
//!
//! Combines the search term with the active filters, queries a [`MealSource`], caps the
//! results for the current form factor and attaches freshly generated display metadata.
//!
//! A search is split in three steps so several can be in flight at once:
//! [`SearchOrchestrator::set_term`] (or any other trigger) issues a [`SearchRequest`],
//! [`SearchOrchestrator::fetch`] runs it without borrowing the orchestrator, and
//! [`SearchOrchestrator::complete`] applies the outcome. Every request carries a sequence
//! number; a completion for anything but the latest issued request is dropped, so a slow
//! response to an old term never overwrites newer results.
//!
//! Metadata is regenerated on every completed search, so repeating the same term shows
//! different ratings and chefs.

use log::{debug, error, warn};
use std::collections::HashMap;
use std::sync::mpsc::Receiver;

use crate::error::SourceError;
use crate::filters::FilterSelection;
use crate::layout::FormFactor;
use crate::meal::{DisplayMeta, MealSummary, RatingBand, generate_metadata};
use crate::prefs::{PreferenceStore, StorageEvent};
use crate::source::{MealSource, SearchQuery};

/// Number of filter labels shown in the active-filter bar.
pub const FILTER_SUMMARY_LIMIT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    seq: u64,
    pub query: SearchQuery,
    pub cap: usize,
}

impl SearchRequest {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub meals: Vec<MealSummary>,
    pub meta: HashMap<String, DisplayMeta>,
}

impl SearchResults {
    pub fn len(&self) -> usize {
        self.meals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MealSummary, Option<&DisplayMeta>)> {
        self.meals.iter().map(|meal| (meal, self.meta.get(&meal.id)))
    }
}

pub struct SearchOrchestrator {
    form_factor: FormFactor,
    term: String,
    filters: FilterSelection,
    issued: u64,
    loading: bool,
    results: SearchResults,
    events: Option<Receiver<StorageEvent>>,
}

impl SearchOrchestrator {
    pub fn new(form_factor: FormFactor) -> Self {
        SearchOrchestrator {
            form_factor,
            term: String::new(),
            filters: FilterSelection::new(),
            issued: 0,
            loading: false,
            results: SearchResults::default(),
            events: None,
        }
    }

    /// Seeds the active filters from the store. With `watch`, later filter writes made
    /// through the same store are picked up by [`Self::sync_from_storage`].
    pub fn mount<S: PreferenceStore + ?Sized>(
        store: &mut S,
        form_factor: FormFactor,
        watch: bool,
    ) -> Self {
        let mut orchestrator = Self::new(form_factor);
        orchestrator.filters = FilterSelection::initialize(store);
        if watch {
            orchestrator.events = Some(store.subscribe());
        }
        orchestrator
    }

    pub fn form_factor(&self) -> FormFactor {
        self.form_factor
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn results(&self) -> &SearchResults {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn filter_summary(&self) -> String {
        self.filters.summary(FILTER_SUMMARY_LIMIT)
    }

    /// Issues a request for the current term and filters, or nothing for a blank term.
    ///
    /// Either way the sequence advances, so anything still in flight is dropped when it
    /// lands.
    pub fn request(&mut self) -> Option<SearchRequest> {
        self.issued += 1;

        let term = self.term.trim();
        if term.is_empty() {
            self.loading = false;
            return None;
        }
        self.loading = true;

        Some(SearchRequest {
            seq: self.issued,
            query: SearchQuery {
                term: term.to_string(),
                categories: self.filters.categories.clone(),
                areas: self.filters.areas.clone(),
            },
            cap: self.form_factor.result_cap(),
        })
    }

    /// Updates the term; searches again when it changed and is not blank.
    pub fn set_term(&mut self, term: &str) -> Option<SearchRequest> {
        if self.term == term {
            return None;
        }
        self.term = term.to_string();
        self.request()
    }

    /// Explicit search (Enter): runs again even when the term is unchanged.
    pub fn submit(&mut self, term: &str) -> Option<SearchRequest> {
        self.term = term.to_string();
        self.request()
    }

    /// Replaces the active filters; searches again when they changed.
    pub fn set_filters(&mut self, filters: FilterSelection) -> Option<SearchRequest> {
        if self.filters == filters {
            return None;
        }
        self.filters = filters;
        self.request()
    }

    /// Re-reads the applied filters, e.g. after a filter editor closed, and searches again.
    pub fn reload_filters<S: PreferenceStore + ?Sized>(
        &mut self,
        store: &S,
    ) -> Option<SearchRequest> {
        self.filters = FilterSelection::initialize(store);
        self.request()
    }

    /// Clears the applied filters in memory and in the store.
    pub fn reset_filters<S: PreferenceStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Option<SearchRequest> {
        let mut filters = self.filters.clone();
        if let Err(e) = filters.reset_all(store) {
            warn!("Failed to clear stored filters: {e}");
        }
        self.set_filters(filters)
    }

    /// Drains pending storage events and reloads the filters if any filter key changed.
    pub fn sync_from_storage<S: PreferenceStore + ?Sized>(
        &mut self,
        store: &S,
    ) -> Option<SearchRequest> {
        let changed = match &self.events {
            Some(events) => events.try_iter().fold(false, |acc, e| acc | e.touches_filters()),
            None => false,
        };

        if !changed {
            return None;
        }
        debug!("Filter keys changed in storage, reloading");
        self.set_filters(FilterSelection::initialize(store))
    }

    pub async fn fetch<M: MealSource>(
        source: &M,
        request: &SearchRequest,
    ) -> Result<Vec<MealSummary>, SourceError> {
        source.search(&request.query).await
    }

    /// Applies a finished request. Returns false when a newer request superseded it.
    pub fn complete(
        &mut self,
        request: &SearchRequest,
        outcome: Result<Vec<MealSummary>, SourceError>,
    ) -> bool {
        if request.seq != self.issued {
            debug!(
                "Discarding results of search #{} ({:?}), latest is #{}",
                request.seq, request.query.term, self.issued
            );
            return false;
        }
        self.loading = false;

        match outcome {
            Ok(mut meals) => {
                meals.truncate(request.cap);
                let meta = generate_metadata(
                    meals.iter().map(|m| m.id.as_str()),
                    RatingBand::SEARCH,
                    &mut rand::thread_rng(),
                );
                self.results = SearchResults { meals, meta };
            }
            Err(e) => {
                error!("Search failed: {e}");
                self.results = SearchResults::default();
            }
        }
        true
    }

    /// Fetches and applies `request`.
    pub async fn run<M: MealSource>(&mut self, source: &M, request: SearchRequest) -> bool {
        let outcome = Self::fetch(source, &request).await;
        self.complete(&request, outcome)
    }

    /// Runs the request a trigger produced, if any.
    pub async fn run_pending<M: MealSource>(
        &mut self,
        source: &M,
        request: Option<SearchRequest>,
    ) -> bool {
        match request {
            Some(request) => self.run(source, request).await,
            None => false,
        }
    }

    /// Submits the term and runs the resulting search.
    pub async fn search<M: MealSource>(&mut self, source: &M, term: &str) -> &SearchResults {
        let request = self.submit(term);
        self.run_pending(source, request).await;
        &self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterKind;
    use crate::meal::CHEF_NAMES;
    use crate::prefs::{self, MemoryStore};
    use crate::source::testing::{Call, FakeSource, summary};

    fn many(count: usize) -> Vec<MealSummary> {
        (0..count)
            .map(|i| summary(&i.to_string(), "Chicken", "British"))
            .collect()
    }

    #[tokio::test]
    async fn blank_terms_never_hit_the_network() {
        let source = FakeSource {
            results: many(3),
            ..Default::default()
        };
        let mut search = SearchOrchestrator::new(FormFactor::Wide);

        for term in ["", "   ", "\t\n"] {
            search.search(&source, term).await;
        }
        assert!(search.set_filters(FilterSelection {
            categories: vec!["Beef".to_string()],
            areas: Vec::new(),
        })
        .is_none());

        assert!(source.calls().is_empty());
        assert!(search.results().is_empty());
    }

    #[tokio::test]
    async fn results_are_capped_per_form_factor() {
        let source = FakeSource {
            results: many(50),
            ..Default::default()
        };

        let mut wide = SearchOrchestrator::new(FormFactor::Wide);
        assert_eq!(wide.search(&source, "chicken").await.len(), 12);

        let mut compact = SearchOrchestrator::new(FormFactor::Compact);
        assert_eq!(compact.search(&source, "chicken").await.len(), 8);

        let few = FakeSource {
            results: many(3),
            ..Default::default()
        };
        assert_eq!(wide.search(&few, "pie").await.len(), 3);
    }

    #[tokio::test]
    async fn chicken_search_gets_fresh_metadata() {
        let source = FakeSource {
            results: many(20),
            ..Default::default()
        };
        let mut search = SearchOrchestrator::new(FormFactor::Wide);
        let results = search.search(&source, "chicken").await;

        assert!(results.len() <= 12);
        for (meal, meta) in results.iter() {
            let meta = meta.unwrap_or_else(|| panic!("no metadata for {}", meal.id));
            assert!(RatingBand::SEARCH.contains(meta.rating));
            assert!(CHEF_NAMES.contains(&meta.chef.as_str()));
        }
        assert_eq!(
            source.calls(),
            vec![Call::Search(SearchQuery {
                term: "chicken".to_string(),
                ..Default::default()
            })]
        );
    }

    #[tokio::test]
    async fn repeating_a_search_fetches_again_with_new_metadata() {
        let source = FakeSource {
            results: many(12),
            ..Default::default()
        };
        let mut search = SearchOrchestrator::new(FormFactor::Wide);

        let first = search.search(&source, "chicken").await.meta.clone();
        let second = search.search(&source, "chicken").await.meta.clone();

        let query = Call::Search(SearchQuery {
            term: "chicken".to_string(),
            ..Default::default()
        });
        assert_eq!(source.calls(), vec![query.clone(), query]);
        assert_eq!(first.len(), 12);
        assert_eq!(second.len(), 12);
        assert_ne!(first, second);
    }

    #[test]
    fn typing_the_same_term_does_not_reissue() {
        let mut search = SearchOrchestrator::new(FormFactor::Wide);
        assert!(search.set_term("soup").is_some());
        assert!(search.set_term("soup").is_none());
        assert!(search.submit("soup").is_some());
    }

    #[test]
    fn clearing_the_term_drops_in_flight_results() {
        let mut search = SearchOrchestrator::new(FormFactor::Wide);
        let pending = search.set_term("chicken").unwrap();

        assert!(search.set_term("").is_none());
        assert!(!search.is_loading());
        assert!(!search.complete(&pending, Ok(many(1))));
        assert!(search.results().is_empty());
    }

    #[tokio::test]
    async fn term_is_trimmed_and_filters_attached() {
        let source = FakeSource::default();
        let mut store = MemoryStore::new();
        let mut selection = FilterSelection::new();
        selection.toggle(FilterKind::Category, "Seafood");
        selection.toggle(FilterKind::Area, "Thai");
        selection.apply(&mut store).unwrap();

        let mut search = SearchOrchestrator::mount(&mut store, FormFactor::Compact, false);
        search.search(&source, "  curry ").await;

        assert_eq!(
            source.calls(),
            vec![Call::Search(SearchQuery {
                term: "curry".to_string(),
                categories: vec!["Seafood".to_string()],
                areas: vec!["Thai".to_string()],
            })]
        );
    }

    #[tokio::test]
    async fn filter_change_retriggers_with_term() {
        let source = FakeSource {
            results: many(2),
            ..Default::default()
        };
        let mut search = SearchOrchestrator::new(FormFactor::Wide);
        search.search(&source, "soup").await;

        let mut filters = FilterSelection::new();
        filters.toggle(FilterKind::Area, "French");
        let request = search.set_filters(filters.clone()).expect("filters changed");
        assert_eq!(request.query.areas, vec!["French".to_string()]);

        // unchanged filters do not search again
        assert!(search.set_filters(filters).is_none());
    }

    #[test]
    fn stale_completions_are_discarded() {
        let mut search = SearchOrchestrator::new(FormFactor::Wide);
        let first = search.set_term("chick").unwrap();
        let second = search.set_term("chicken").unwrap();
        assert!(second.seq() > first.seq());

        assert!(search.complete(&second, Ok(many(2))));
        assert!(!search.complete(&first, Ok(many(5))));

        assert_eq!(search.results().len(), 2);
        assert!(!search.is_loading());
    }

    #[tokio::test]
    async fn failures_degrade_to_empty_results() {
        let ok = FakeSource {
            results: many(4),
            ..Default::default()
        };
        let mut search = SearchOrchestrator::new(FormFactor::Wide);
        search.search(&ok, "beef").await;
        assert_eq!(search.results().len(), 4);

        let failing = FakeSource::failing();
        search.search(&failing, "beef stew").await;
        assert!(search.results().is_empty());
        assert!(!search.is_loading());
    }

    #[test]
    fn watched_storage_changes_reload_filters() {
        let mut store = MemoryStore::new();
        let mut search = SearchOrchestrator::mount(&mut store, FormFactor::Wide, true);
        search.set_term("rice");

        // unrelated keys are ignored
        store.set(prefs::USER_NAME, "Ada").unwrap();
        assert!(search.sync_from_storage(&store).is_none());

        let mut elsewhere = FilterSelection::initialize(&store);
        elsewhere.toggle(FilterKind::Category, "Vegan");
        elsewhere.apply(&mut store).unwrap();

        let request = search.sync_from_storage(&store).expect("filters reloaded");
        assert_eq!(request.query.categories, vec!["Vegan".to_string()]);
        assert_eq!(search.filters(), &elsewhere);
    }

    #[test]
    fn unwatched_orchestrator_reads_filters_only_at_mount() {
        let mut store = MemoryStore::new();
        let mut search = SearchOrchestrator::mount(&mut store, FormFactor::Compact, false);

        let mut elsewhere = FilterSelection::new();
        elsewhere.toggle(FilterKind::Area, "Thai");
        elsewhere.apply(&mut store).unwrap();

        assert!(search.sync_from_storage(&store).is_none());
        assert!(search.filters().is_empty());
    }

    #[test]
    fn reset_filters_clears_store_and_researches() {
        let mut store = MemoryStore::new();
        let mut selection = FilterSelection::new();
        selection.toggle(FilterKind::Category, "Beef");
        selection.apply(&mut store).unwrap();

        let mut search = SearchOrchestrator::mount(&mut store, FormFactor::Wide, false);
        search.set_term("pie");
        let request = search.reset_filters(&mut store).expect("filters changed");

        assert!(request.query.categories.is_empty());
        assert_eq!(store.get(prefs::SELECTED_CATEGORIES), None);
    }
}
