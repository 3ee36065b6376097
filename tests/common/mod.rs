#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use tokio::net::TcpListener;

pub const CHICKEN_MEALS: usize = 15;

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{address}")
}

fn full_meal(index: usize) -> Value {
    let (category, area) = if index % 2 == 0 {
        ("Chicken", "Japanese")
    } else {
        ("Side", "British")
    };
    json!({
        "idMeal": format!("{}", 52700 + index),
        "strMeal": format!("Chicken dish {index}"),
        "strCategory": category,
        "strArea": area,
        "strMealThumb": format!("https://img.example/{index}.jpg"),
        "strInstructions": "Cook it.",
    })
}

fn filter_record(prefix: &str, index: usize) -> Value {
    json!({
        "idMeal": format!("{prefix}{index}"),
        "strMeal": format!("{prefix} meal {index}"),
        "strMealThumb": format!("https://img.example/{prefix}{index}.jpg"),
    })
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("s").map(String::as_str) {
        Some("chicken") => {
            let meals: Vec<Value> = (0..CHICKEN_MEALS).map(full_meal).collect();
            Json(json!({ "meals": meals })).into_response()
        }
        Some("boom") => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => Json(json!({ "meals": null })).into_response(),
    }
}

async fn filter(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let meals: Vec<Value> = match (params.get("c"), params.get("a")) {
        (Some(category), _) if category == "Seafood" => {
            (1..=6).map(|i| filter_record("sea", i)).collect()
        }
        (None, Some(area)) if area == "Thai" => (1..=3).map(|i| filter_record("thai", i)).collect(),
        _ => return Json(json!({ "meals": null })),
    };
    Json(json!({ "meals": meals }))
}

async fn list(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    if params.contains_key("c") {
        Json(json!({ "meals": [
            { "strCategory": "Seafood" },
            { "strCategory": "Beef" },
            { "strCategory": "Vegan" },
        ]}))
    } else {
        Json(json!({ "meals": [
            { "strArea": "Thai" },
            { "strArea": "Unknown" },
            { "strArea": "British" },
        ]}))
    }
}

/// Stand-in for the public recipe source.
pub fn fake_mealdb() -> Router {
    Router::new()
        .route("/search.php", get(search))
        .route("/filter.php", get(filter))
        .route("/list.php", get(list))
}
