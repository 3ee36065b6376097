use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Chef names attached to results for display. Not tied to any real data.
pub const CHEF_NAMES: [&str; 10] = [
    "Chef Isabella Chen",
    "Chef Marcus Thompson",
    "Chef Sofia Rodriguez",
    "Chef James Kim",
    "Chef Olivia Bennett",
    "Chef Lucas Patel",
    "Chef Emma Martinez",
    "Chef Daniel Lee",
    "Chef Sarah Johnson",
    "Chef Michael Wong",
];

/// Prep times are drawn from `[MIN_PREP_MINUTES, MAX_PREP_MINUTES]`.
pub const MIN_PREP_MINUTES: u32 = 10;
pub const MAX_PREP_MINUTES: u32 = 39;

/// Reshaped search result returned by the proxy's `/search` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealSummary {
    pub id: String,
    pub title: String,
    pub category: String,
    pub area: String,
    pub image: String,
}

/// Meal record as the recipe source returns it from its filter endpoint.
///
/// Filter records only carry id, name and thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMeal {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
}

/// Full meal record from the recipe source's search endpoint.
///
/// Only the fields the proxy reshapes are kept; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceMeal {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strCategory", default)]
    pub category: Option<String>,
    #[serde(rename = "strArea", default)]
    pub area: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
}

impl From<SourceMeal> for MealSummary {
    fn from(meal: SourceMeal) -> Self {
        MealSummary {
            id: meal.id,
            title: meal.name,
            category: meal.category.unwrap_or_default(),
            area: meal.area.unwrap_or_default(),
            image: meal.thumbnail.unwrap_or_default(),
        }
    }
}

/// Inclusive rating range, in tenths of a star.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingBand {
    pub min_tenths: u32,
    pub max_tenths: u32,
}

impl RatingBand {
    /// Search results.
    pub const SEARCH: RatingBand = RatingBand {
        min_tenths: 36,
        max_tenths: 49,
    };
    /// Home category feed.
    pub const FEED: RatingBand = RatingBand {
        min_tenths: 30,
        max_tenths: 50,
    };
    /// Featured meal on the home screen.
    pub const FEATURED: RatingBand = RatingBand {
        min_tenths: 45,
        max_tenths: 49,
    };

    pub fn contains(&self, rating: f32) -> bool {
        let tenths = (rating * 10.0).round() as u32;
        (self.min_tenths..=self.max_tenths).contains(&tenths)
    }
}

/// Display-only metadata. Regenerated on every fetch, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayMeta {
    pub rating: f32,
    pub prep_minutes: u32,
    pub chef: String,
}

impl DisplayMeta {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, band: RatingBand) -> Self {
        let tenths = rng.gen_range(band.min_tenths..=band.max_tenths);

        DisplayMeta {
            rating: tenths as f32 / 10.0,
            prep_minutes: rng.gen_range(MIN_PREP_MINUTES..=MAX_PREP_MINUTES),
            chef: random_chef(rng).to_string(),
        }
    }

    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.rating)
    }

    pub fn prep_label(&self) -> String {
        format!("{} Mins", self.prep_minutes)
    }
}

pub fn random_chef<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    CHEF_NAMES[rng.gen_range(0..CHEF_NAMES.len())]
}

/// Fresh metadata for each id. Duplicate ids share the last generated entry.
pub fn generate_metadata<'a, R, I>(
    ids: I,
    band: RatingBand,
    rng: &mut R,
) -> HashMap<String, DisplayMeta>
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter()
        .map(|id| (id.to_string(), DisplayMeta::generate(rng, band)))
        .collect()
}

/// Filter-endpoint meal paired with its generated metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealCard {
    pub meal: RawMeal,
    pub meta: DisplayMeta,
}
