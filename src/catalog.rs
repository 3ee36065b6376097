use log::{error, info, warn};

use crate::error::{PrefsError, SourceError};
use crate::filters::{FilterKind, display_order};
use crate::prefs::{self, PreferenceStore};
use crate::source::{FilterOptions, MealSource};

/// Area name the recipe source uses for meals without an origin.
pub const UNKNOWN_AREA: &str = "Unknown";

pub const FALLBACK_CATEGORIES: [&str; 14] = [
    "Beef",
    "Breakfast",
    "Chicken",
    "Dessert",
    "Goat",
    "Lamb",
    "Pasta",
    "Pork",
    "Seafood",
    "Side",
    "Starter",
    "Vegan",
    "Vegetarian",
    "Misc.",
];

pub const FALLBACK_AREAS: [&str; 28] = [
    "American",
    "British",
    "Canadian",
    "Chinese",
    "Croatian",
    "Dutch",
    "Egyptian",
    "Filipino",
    "French",
    "Greek",
    "Indian",
    "Irish",
    "Italian",
    "Jamaican",
    "Japanese",
    "Kenyan",
    "Malaysian",
    "Mexican",
    "Moroccan",
    "Polish",
    "Portuguese",
    "Russian",
    "Spanish",
    "Thai",
    "Tunisian",
    "Turkish",
    "Ukrainian",
    "Vietnamese",
];

/// Read-only list of filterable categories and areas, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCatalog {
    pub categories: Vec<String>,
    pub areas: Vec<String>,
}

impl FilterCatalog {
    pub fn from_options(options: FilterOptions) -> Self {
        FilterCatalog {
            categories: options.categories.into_iter().map(|c| c.name).collect(),
            areas: options
                .areas
                .into_iter()
                .map(|a| a.name)
                .filter(|name| name != UNKNOWN_AREA)
                .collect(),
        }
    }

    pub fn fallback() -> Self {
        FilterCatalog {
            categories: FALLBACK_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            areas: FALLBACK_AREAS.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.areas.is_empty()
    }

    pub fn values(&self, kind: FilterKind) -> &[String] {
        match kind {
            FilterKind::Category => &self.categories,
            FilterKind::Area => &self.areas,
        }
    }

    pub async fn fetch<M: MealSource>(source: &M) -> Result<Self, SourceError> {
        let options = source.options().await?;
        Ok(Self::from_options(options))
    }

    /// Fetches the catalog for a filter screen. Failure yields an empty catalog; filter
    /// toggling and apply/reset keep working without one.
    pub async fn load<M: MealSource>(source: &M) -> Self {
        Self::fetch(source).await.unwrap_or_else(|e| {
            error!("Failed to fetch filters: {e}");
            Self::default()
        })
    }

    pub fn cache<S: PreferenceStore + ?Sized>(&self, store: &mut S) -> Result<(), PrefsError> {
        store.set_list(prefs::AVAILABLE_CATEGORIES, &self.categories)?;
        store.set_list(prefs::AVAILABLE_AREAS, &self.areas)
    }

    pub fn cached<S: PreferenceStore + ?Sized>(store: &S) -> Self {
        FilterCatalog {
            categories: store.get_list(prefs::AVAILABLE_CATEGORIES),
            areas: store
                .get_list(prefs::AVAILABLE_AREAS)
                .into_iter()
                .filter(|name| name != UNKNOWN_AREA)
                .collect(),
        }
    }

    /// Cached catalog, or the built-in lists when nothing has been cached yet.
    pub fn cached_or_fallback<S: PreferenceStore + ?Sized>(store: &S) -> Self {
        let cached = Self::cached(store);
        if cached.is_empty() {
            info!("No cached catalog, using built-in options");
            Self::fallback()
        } else {
            cached
        }
    }

    /// Fetches and caches the catalog. On failure the existing cache is left alone.
    pub async fn refresh<M, S>(source: &M, store: &mut S) -> Option<Self>
    where
        M: MealSource,
        S: PreferenceStore + ?Sized,
    {
        match Self::fetch(source).await {
            Ok(catalog) => {
                if let Err(e) = catalog.cache(store) {
                    warn!("Failed to cache filter options: {e}");
                }
                Some(catalog)
            }
            Err(e) => {
                error!("Failed to fetch filter options: {e}");
                None
            }
        }
    }

    /// Values for `kind` with the stored favorite pinned first, the rest sorted.
    pub fn ordered<S: PreferenceStore + ?Sized>(&self, store: &S, kind: FilterKind) -> Vec<String> {
        display_order(store, kind, self.values(kind))
    }
}
