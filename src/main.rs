#![cfg(not(tarpaulin_include))]

use recipeasy::app;
use recipeasy::config::Config;

/// Proxy server entry point.
///
/// Reads `RECIPEASY_HOST`, `PORT` and `MEALDB_BASE_URL` from the environment and
/// serves the recipe API until Ctrl+C or SIGTERM.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    app::run(config).await
}
