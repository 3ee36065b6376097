//! Home screen feed: category chips, the per-category meal strip and a featured meal
//! from the user's favorite area.

use log::{error, warn};
use rand::Rng;

use crate::catalog::FilterCatalog;
use crate::layout::FormFactor;
use crate::meal::{DisplayMeta, MealCard, RatingBand, RawMeal, random_chef};
use crate::prefs::{self, PreferenceStore};
use crate::source::MealSource;

/// Pseudo-category backed by the favorite category.
pub const FOR_YOU: &str = "For You";

/// "For You" first, then the favorite, then the remaining catalog in catalog order.
pub fn ordered_categories(favorite: Option<&str>, catalog: &[String]) -> Vec<String> {
    let mut ordered = vec![FOR_YOU.to_string()];

    match favorite.filter(|f| !f.is_empty() && *f != FOR_YOU) {
        Some(fav) => {
            ordered.push(fav.to_string());
            ordered.extend(catalog.iter().filter(|c| c.as_str() != fav).cloned());
        }
        None => ordered.extend(catalog.iter().cloned()),
    }
    ordered
}

/// The category actually fetched for a chip. "For You" maps to the favorite category
/// and never to the active search filters.
pub fn resolve_category<S: PreferenceStore + ?Sized>(store: &S, category: &str) -> Option<String> {
    if category == FOR_YOU {
        store.get_non_empty(prefs::FAVORITE_CATEGORY)
    } else {
        Some(category.to_string())
    }
}

/// "For You" shows the last `size` meals, a named category the first `size`.
pub fn feed_slice<T: Clone>(category: &str, meals: &[T], size: usize) -> Vec<T> {
    if category == FOR_YOU {
        meals[meals.len().saturating_sub(size)..].to_vec()
    } else {
        meals.iter().take(size).cloned().collect()
    }
}

fn with_meta<R: Rng + ?Sized>(meals: Vec<RawMeal>, band: RatingBand, rng: &mut R) -> Vec<MealCard> {
    meals
        .into_iter()
        .map(|meal| MealCard {
            meal,
            meta: DisplayMeta::generate(rng, band),
        })
        .collect()
}

pub struct HomeFeed {
    form_factor: FormFactor,
    categories: Vec<String>,
    selected: String,
    meals: Vec<MealCard>,
    featured: Option<MealCard>,
    featured_chef: &'static str,
}

impl HomeFeed {
    /// Builds the chip list from the cached catalog and the stored favorite.
    pub fn load<S: PreferenceStore + ?Sized>(store: &S, form_factor: FormFactor) -> Self {
        let catalog = FilterCatalog::cached(store);
        let favorite = store.get_non_empty(prefs::FAVORITE_CATEGORY);

        HomeFeed {
            form_factor,
            categories: ordered_categories(favorite.as_deref(), &catalog.categories),
            selected: FOR_YOU.to_string(),
            meals: Vec::new(),
            featured: None,
            featured_chef: random_chef(&mut rand::thread_rng()),
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn meals(&self) -> &[MealCard] {
        &self.meals
    }

    pub fn featured(&self) -> Option<&MealCard> {
        self.featured.as_ref()
    }

    /// Chef credited on the featured card; fixed for the lifetime of the feed.
    pub fn featured_chef(&self) -> &'static str {
        self.featured_chef
    }

    /// Selects a chip and fetches its meals. Failures leave an empty strip.
    pub async fn select_category<M, S>(
        &mut self,
        source: &M,
        store: &S,
        category: &str,
    ) -> &[MealCard]
    where
        M: MealSource,
        S: PreferenceStore + ?Sized,
    {
        self.selected = category.to_string();
        self.meals.clear();

        let Some(to_fetch) = resolve_category(store, category) else {
            warn!("No favorite category stored, nothing to show for {FOR_YOU}");
            return &self.meals;
        };

        match source.filter_by_category(&to_fetch).await {
            Ok(meals) => {
                let cards = with_meta(meals, RatingBand::FEED, &mut rand::thread_rng());
                self.meals = feed_slice(category, &cards, self.form_factor.feed_size());
            }
            Err(e) => error!("Failed to fetch meals: {e}"),
        }
        &self.meals
    }

    /// Picks a random meal from the favorite area.
    pub async fn load_featured<M, S>(&mut self, source: &M, store: &S) -> Option<&MealCard>
    where
        M: MealSource,
        S: PreferenceStore + ?Sized,
    {
        self.featured = None;

        let Some(area) = store.get_non_empty(prefs::FAVORITE_AREA) else {
            warn!("No favorite area stored, skipping featured meal");
            return None;
        };

        match source.filter_by_area(&area).await {
            Ok(meals) if meals.is_empty() => warn!("No meals found for area {area}"),
            Ok(meals) => {
                let mut rng = rand::thread_rng();
                let meal = meals[rng.gen_range(0..meals.len())].clone();
                self.featured = Some(MealCard {
                    meal,
                    meta: DisplayMeta::generate(&mut rng, RatingBand::FEATURED),
                });
            }
            Err(e) => error!("Failed to fetch area meal: {e}"),
        }
        self.featured.as_ref()
    }
}
