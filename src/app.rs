use axum::{
    Json, Router,
    extract::{Query, State},
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};
use log::{error, info};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::error::AppError;
use crate::meal::MealSummary;
use crate::mealdb::{FilterBy, MealDb};

pub struct AppState {
    pub mealdb: MealDb,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    term: String,
    categories: Option<String>,
    areas: Option<String>,
}

#[derive(Deserialize)]
pub struct FilterParams {
    category: Option<String>,
    area: Option<String>,
}

/// Proxy routes, mounted under `/api`.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .route("/search", get(search_handler))
        .route("/filter", get(filter_handler))
        .route("/options", get(options_handler));

    Router::new()
        .nest("/api", api)
        .layer(cors)
        .with_state(state)
}

pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Forwarding to {}", config.mealdb_base_url);
    let state = Arc::new(AppState {
        mealdb: MealDb::new(config.mealdb_base_url.clone()),
    });

    let app = router(state);

    let address = config.address();
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Comma-separated list, trimmed, with empty entries dropped.
pub fn split_csv(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// A meal passes when its category is listed (if any are) and its area is listed (if any are).
pub fn matches_filters(meal: &MealSummary, categories: &[String], areas: &[String]) -> bool {
    let category_ok = categories.is_empty() || categories.contains(&meal.category);
    let area_ok = areas.is_empty() || areas.contains(&meal.area);
    category_ok && area_ok
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<MealSummary>>, AppError> {
    let meals = state.mealdb.search(&params.term).await.map_err(|e| {
        error!("Search for {:?} failed: {e}", params.term);
        AppError::Recipes(e)
    })?;

    let categories = split_csv(params.categories.as_deref());
    let areas = split_csv(params.areas.as_deref());

    let results: Vec<MealSummary> = meals
        .into_iter()
        .map(MealSummary::from)
        .filter(|meal| matches_filters(meal, &categories, &areas))
        .collect();

    Ok(Json(results))
}

async fn filter_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<Value>>, AppError> {
    let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

    // category wins when both are given
    let by = match (non_empty(params.category), non_empty(params.area)) {
        (Some(category), _) => FilterBy::Category(category),
        (None, Some(area)) => FilterBy::Area(area),
        (None, None) => return Err(AppError::MissingFilter),
    };

    let meals = state.mealdb.filter(&by).await.map_err(|e| {
        error!("Filter by {by:?} failed: {e}");
        AppError::Recipes(e)
    })?;

    Ok(Json(meals))
}

async fn options_handler(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let (categories, areas) =
        tokio::try_join!(state.mealdb.list_categories(), state.mealdb.list_areas()).map_err(|e| {
            error!("Listing options failed: {e}");
            AppError::Options(e)
        })?;

    Ok(Json(json!({
        "categories": categories,
        "areas": areas,
    })))
}
