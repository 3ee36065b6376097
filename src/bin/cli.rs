#![cfg(not(tarpaulin_include))]

use recipeasy::catalog::FilterCatalog;
use recipeasy::client::ProxyClient;
use recipeasy::config::ClientConfig;
use recipeasy::filters::{FilterKind, FilterSelection};
use recipeasy::home::{FOR_YOU, HomeFeed};
use recipeasy::layout::FormFactor;
use recipeasy::prefs::{FileStore, PreferenceStore};
use recipeasy::profile::{self, Avatar, Onboarding, OnboardingStep, Progress, Settings};
use recipeasy::search::{SearchOrchestrator, SearchRequest};
use std::env;
use std::io::{self, Write};

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_help() {
    println!("Commands:");
    println!("  q: Quit");
    println!("  onboard: Set name, avatar and favorites");
    println!("  home [category]: Show the home feed (default \"{FOR_YOU}\")");
    println!("  search <term>: Search recipes with the applied filters");
    println!("  filters: Show filter options and the working selection");
    println!("  toggle category|area <value>: Toggle a filter in the working selection");
    println!("  apply: Save the working selection as the active filters");
    println!("  reset: Clear all filters");
    println!("  settings [name|avatar|category|area <value>]: Show or edit the profile");
    println!("  layout mobile|desktop: Switch form factor");
}

fn print_results(search: &SearchOrchestrator) {
    let results = search.results();
    if results.is_empty() {
        println!("No recipes found");
        return;
    }

    println!("{} recipes", results.len());
    for (meal, meta) in results.iter() {
        match meta {
            Some(meta) => println!(
                "  {} [{} / {}] {} - {} by {}",
                meal.title,
                meal.category,
                meal.area,
                meta.rating_label(),
                meta.prep_label(),
                meta.chef
            ),
            None => println!("  {} [{} / {}]", meal.title, meal.category, meal.area),
        }
    }
}

/// Mobile screens re-read filters when coming back from the filter editor; the desktop
/// search listens for storage changes instead.
fn refresh_filters(search: &mut SearchOrchestrator, store: &FileStore) -> Option<SearchRequest> {
    match search.form_factor() {
        FormFactor::Wide => search.sync_from_storage(store),
        FormFactor::Compact => search.reload_filters(store),
    }
}

fn run_onboarding(store: &mut FileStore) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = FilterCatalog::cached_or_fallback(store);
    let mut onboarding = Onboarding::new();

    loop {
        match onboarding.step() {
            OnboardingStep::Welcome => {
                println!("Welcome to Recipeasy! Discover recipes from around the world.");
            }
            OnboardingStep::Identity => {
                onboarding.profile.name = prompt("Your name")?;
                let ids: Vec<&str> = Avatar::ALL.iter().map(|a| a.as_str()).collect();
                let choice = prompt(&format!("Avatar ({})", ids.join(", ")))?;
                onboarding.profile.avatar = Avatar::parse(&choice).unwrap_or_default();
            }
            OnboardingStep::Preferences => {
                println!("Categories: {}", catalog.categories.join(", "));
                onboarding.profile.favorite_category = prompt("Favorite category")?;
                println!("Areas: {}", catalog.areas.join(", "));
                onboarding.profile.favorite_area = prompt("Favorite area")?;
            }
        }

        if let Progress::Complete = onboarding.next(store)? {
            println!("All set, {}!", onboarding.profile.name);
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let config = ClientConfig::from_env();
    let source = ProxyClient::new(config.proxy_url.clone());
    let mut store = FileStore::open(&config.prefs_path)?;

    profile::initialize_storage(&source, &mut store).await;

    let mut form_factor = FormFactor::from_store(&store);
    if args.iter().any(|a| a == "--mobile") {
        form_factor = FormFactor::Compact;
    } else if args.iter().any(|a| a == "--desktop") {
        form_factor = FormFactor::Wide;
    }

    if !profile::onboarding_complete(&store) {
        println!("Onboarding required.");
        run_onboarding(&mut store)?;
    }

    let mut search =
        SearchOrchestrator::mount(&mut store, form_factor, form_factor == FormFactor::Wide);
    let mut selection = FilterSelection::initialize(&store);
    let mut catalog: Option<FilterCatalog> = None;

    print_help();
    loop {
        print!("({form_factor:?}) > ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        // another client may share the preference file
        store.reload();
        if let Some(request) = search.sync_from_storage(&store) {
            search.run(&source, request).await;
        }

        let command = line.trim();
        let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
        let rest = rest.trim();

        match name {
            "" => continue,
            "q" => break,
            "help" => print_help(),
            "onboard" => run_onboarding(&mut store)?,
            "home" => {
                let category = if rest.is_empty() { FOR_YOU } else { rest };
                let mut feed = HomeFeed::load(&store, form_factor);
                println!("{}", feed.categories().join(" | "));

                for card in feed.select_category(&source, &store, category).await {
                    println!(
                        "  {} {} - {}",
                        card.meal.name,
                        card.meta.rating_label(),
                        card.meta.prep_label()
                    );
                }
                let chef = feed.featured_chef();
                if let Some(card) = feed.load_featured(&source, &store).await {
                    println!(
                        "Featured: {} by {} ({}, {})",
                        card.meal.name,
                        chef,
                        card.meta.rating_label(),
                        card.meta.prep_label()
                    );
                }
            }
            "search" => {
                let request = search.submit(rest);
                search.run_pending(&source, request).await;
                print_results(&search);
            }
            "filters" => {
                if catalog.is_none() {
                    catalog = Some(FilterCatalog::load(&source).await);
                }
                if let Some(catalog) = &catalog {
                    for kind in [FilterKind::Category, FilterKind::Area] {
                        println!("{kind:?}:");
                        for value in catalog.ordered(&store, kind) {
                            let mark = if selection.contains(kind, &value) { "x" } else { " " };
                            println!("  [{mark}] {value}");
                        }
                    }
                }
                if !search.filters().is_empty() {
                    println!("Active: {}", search.filter_summary());
                }
            }
            "toggle" => {
                let (kind, value) = rest.split_once(' ').unwrap_or((rest, ""));
                match FilterKind::parse(kind) {
                    Some(kind) if !value.trim().is_empty() => {
                        let on = selection.toggle(kind, value.trim());
                        println!("{} {}", value.trim(), if on { "on" } else { "off" });
                    }
                    _ => println!("Usage: toggle category|area <value>"),
                }
            }
            "apply" => {
                if let Err(e) = selection.apply(&mut store) {
                    eprintln!("Failed to save filters: {e}");
                }
                let request = refresh_filters(&mut search, &store);
                if search.run_pending(&source, request).await {
                    print_results(&search);
                }
            }
            "reset" => {
                if let Err(e) = selection.reset_all(&mut store) {
                    eprintln!("Failed to clear filters: {e}");
                }
                let request = refresh_filters(&mut search, &store);
                if search.run_pending(&source, request).await {
                    print_results(&search);
                }
            }
            "settings" => {
                let mut settings = Settings::open(&store);
                let (field, value) = rest.split_once(' ').unwrap_or((rest, ""));
                let value = value.trim().to_string();
                match field {
                    "" => {}
                    "name" => settings.profile.name = value,
                    "avatar" => match Avatar::parse(&value) {
                        Some(avatar) => settings.profile.avatar = avatar,
                        None => println!("Unknown avatar {value}"),
                    },
                    "category" => settings.profile.favorite_category = value,
                    "area" => settings.profile.favorite_area = value,
                    other => println!("Unknown setting {other}"),
                }
                if !field.is_empty() {
                    settings.save(&mut store)?;
                }
                let p = &settings.profile;
                println!(
                    "{} ({}) likes {} food from {}",
                    p.name, p.avatar, p.favorite_category, p.favorite_area
                );
            }
            "layout" => match FormFactor::parse(rest) {
                Some(next) => {
                    Settings::switch_layout(&mut store, next)?;
                    form_factor = next;
                    search = SearchOrchestrator::mount(
                        &mut store,
                        form_factor,
                        form_factor == FormFactor::Wide,
                    );
                    println!("Switched to {form_factor:?}");
                }
                None => println!("Usage: layout mobile|desktop"),
            },
            _ => println!("Invalid command, type help"),
        }
    }

    Ok(())
}
