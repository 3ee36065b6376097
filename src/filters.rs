//! Working set of category/area toggles for a filter-editing session.
//!
//! The selection is seeded from the preference store, edited in memory and only written
//! back on [`FilterSelection::apply`]. It is independent of the user's favorites; those
//! only influence display order.

use log::warn;
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::PrefsError;
use crate::prefs::{self, PreferenceStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Category,
    Area,
}

impl FilterKind {
    pub fn selection_key(self) -> &'static str {
        match self {
            FilterKind::Category => prefs::SELECTED_CATEGORIES,
            FilterKind::Area => prefs::SELECTED_AREAS,
        }
    }

    pub fn favorite_key(self) -> &'static str {
        match self {
            FilterKind::Category => prefs::FAVORITE_CATEGORY,
            FilterKind::Area => prefs::FAVORITE_AREA,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "category" | "categories" => Some(FilterKind::Category),
            "area" | "areas" => Some(FilterKind::Area),
            _ => None,
        }
    }
}

/// Toggled categories and areas. Insertion order is kept so an applied selection
/// round-trips exactly; it carries no other meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub categories: Vec<String>,
    pub areas: Vec<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the applied selection. Absent or malformed keys read as empty.
    pub fn initialize<S: PreferenceStore + ?Sized>(store: &S) -> Self {
        FilterSelection {
            categories: unique(store.get_list(prefs::SELECTED_CATEGORIES)),
            areas: unique(store.get_list(prefs::SELECTED_AREAS)),
        }
    }

    pub fn values(&self, kind: FilterKind) -> &[String] {
        match kind {
            FilterKind::Category => &self.categories,
            FilterKind::Area => &self.areas,
        }
    }

    fn values_mut(&mut self, kind: FilterKind) -> &mut Vec<String> {
        match kind {
            FilterKind::Category => &mut self.categories,
            FilterKind::Area => &mut self.areas,
        }
    }

    pub fn contains(&self, kind: FilterKind, value: &str) -> bool {
        self.values(kind).iter().any(|v| v == value)
    }

    /// Removes `value` if selected, otherwise adds it. Returns whether it is now selected.
    pub fn toggle(&mut self, kind: FilterKind, value: &str) -> bool {
        let values = self.values_mut(kind);
        if let Some(pos) = values.iter().position(|v| v == value) {
            values.remove(pos);
            false
        } else {
            values.push(value.to_string());
            true
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.areas.is_empty()
    }

    /// Persists both lists. The two writes are independent.
    pub fn apply<S: PreferenceStore + ?Sized>(&self, store: &mut S) -> Result<(), PrefsError> {
        store.set_list(prefs::SELECTED_CATEGORIES, &self.categories)?;
        store.set_list(prefs::SELECTED_AREAS, &self.areas)
    }

    /// Empties the selection and removes both keys from the store.
    ///
    /// The in-memory reset always happens; a store failure is returned after it.
    pub fn reset_all<S: PreferenceStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<(), PrefsError> {
        self.categories.clear();
        self.areas.clear();
        store.clear(&prefs::FILTER_KEYS)
    }

    /// Short label for an active-filter bar: at most `limit` values, categories first,
    /// with a trailing `...` when some were left out.
    pub fn summary(&self, limit: usize) -> String {
        let all: Vec<&str> = self
            .categories
            .iter()
            .chain(self.areas.iter())
            .map(String::as_str)
            .collect();

        let mut label = all.iter().take(limit).copied().collect::<Vec<_>>().join(", ");
        if all.len() > limit {
            label.push_str("...");
        }
        label
    }
}

/// First occurrence wins; a hand-edited list may repeat values.
fn unique(mut values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values.retain(|value| seen.insert(value.clone()));
    values
}

/// Case-insensitive ordering with a case-sensitive tie-break, so `"apple"` and `"Apple"`
/// sit together the way a locale collator would place them.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sorts `items` lexicographically with `favorite` pinned first.
pub fn sort_with_favorite_first(items: &mut [String], favorite: Option<&str>) {
    let favorite = favorite.filter(|f| !f.is_empty());

    items.sort_by(|a, b| match favorite {
        Some(fav) if a == fav && b != fav => Ordering::Less,
        Some(fav) if b == fav && a != fav => Ordering::Greater,
        _ => locale_cmp(a, b),
    });
}

/// Catalog values for `kind`, ordered for display using the stored favorite.
pub fn display_order<S: PreferenceStore + ?Sized>(
    store: &S,
    kind: FilterKind,
    options: &[String],
) -> Vec<String> {
    let favorite = store.get_non_empty(kind.favorite_key());
    if let Some(fav) = &favorite {
        if !options.contains(fav) {
            warn!("Favorite {fav:?} is not in the {kind:?} catalog");
        }
    }

    let mut ordered = options.to_vec();
    sort_with_favorite_first(&mut ordered, favorite.as_deref());
    ordered
}
