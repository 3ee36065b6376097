/*!
# Recipeasy

Recipe discovery backed by the public MealDB API.

## Overview

The crate has two halves. A thin proxy service forwards search, filter and option
listing calls to the recipe source and reshapes the JSON it gets back. The client side
keeps user preferences in a durable key/value store, tracks which categories and areas
are toggled on as search filters, and turns a search term plus those filters into a
short, display-ready result list.

## Architecture

### Proxy Service (`web` feature)
- **Technologies**: Rust, axum, reqwest
- `GET /api/search?term=&categories=&areas=` - reshaped meals, filtered by category/area
- `GET /api/filter?category=` or `?area=` - raw meal records for one category or area
- `GET /api/options` - raw category and area lists
- Stateless: no caching, no retries, upstream failures become a 500 with a static message

### Client Layer
- **Preference Store** - all persisted state behind one trait, file- or memory-backed
- **Filter Selection** - working set of toggles, written back only on apply
- **Search Orchestrator** - term + filters to capped results with generated ratings,
  prep times and chef names; stale responses are dropped by sequence number
- **Home Feed** - "For You" and per-category strips, featured meal from the favorite area
- **Profile** - onboarding, settings and first-run storage bootstrap

Everything on the client side is written against the [`source::MealSource`] trait, so the
same logic drives the terminal client and the tests.

## Persisted keys

`userName`, `userPfp`, `favoriteCategory`, `favoriteArea`, `availableCategories`,
`availableAreas`, `selectedCategories`, `selectedAreas`, `onboardingComplete`, `isMobile`.
Lists are stored as JSON arrays, flags as `"true"`/`"false"`.

## Modules

- **prefs**: preference store trait, storage keys, memory and file stores
- **filters**: filter selection and favorite-first ordering
- **catalog**: category/area option catalog, caching and built-in fallback
- **search**: search orchestration
- **home**: home screen feed
- **profile**: user profile, onboarding, settings
- **meal**: meal records and display metadata
- **layout**: compact/wide form factor
- **source**: the client's view of the proxy
- **client**, **mealdb**, **app**, **config**: HTTP client, upstream client, proxy server, settings
*/

pub mod catalog;
pub mod error;
pub mod filters;
pub mod home;
pub mod layout;
pub mod meal;
pub mod prefs;
pub mod profile;
pub mod search;
pub mod source;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod client;
#[cfg(feature = "web")]
pub mod config;
#[cfg(feature = "web")]
pub mod mealdb;

pub use catalog::FilterCatalog;
pub use error::{PrefsError, SourceError};
pub use filters::{FilterKind, FilterSelection};
pub use home::HomeFeed;
pub use layout::FormFactor;
pub use meal::{DisplayMeta, MealSummary, RawMeal};
pub use prefs::{FileStore, MemoryStore, PreferenceStore};
pub use profile::{Avatar, Onboarding, Settings, UserProfile};
pub use search::SearchOrchestrator;
pub use source::{MealSource, SearchQuery};
