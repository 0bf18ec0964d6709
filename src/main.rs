use log::{error, info};
use std::env;
use std::fs;

use menu_kit::{
    AppConfig, DisplayMenu, FeedQuery, FeedView, HttpFeedSource, MenuError, MenuKit,
    RawMenuRecord,
};

const USAGE: &str = "Usage: menu-kit <command> [--grouped]

Commands:
  file <path>        Normalize raw records from a JSON file
  featured           Fetch the featured feed
  category <slug>    Fetch menus for one dietary category
  store <slug>       Fetch a restaurant's own menu list";

enum Source {
    File(String),
    Remote(FeedQuery),
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        error!("{}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), MenuError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let grouped = args.iter().any(|a| a == "--grouped");
    let positional: Vec<&str> = args
        .iter()
        .filter(|a| !a.starts_with("--"))
        .map(String::as_str)
        .collect();

    let config = AppConfig::load()?;
    let kit = MenuKit::from_config(&config);

    let source = match positional.as_slice() {
        ["file", path] => Source::File(path.to_string()),
        ["featured"] => Source::Remote(FeedQuery::Featured),
        ["category", slug] => Source::Remote(kit.category_query(slug)?),
        ["store", slug] => Source::Remote(FeedQuery::MyStore {
            restaurant_slug: slug.to_string(),
        }),
        _ => return Err(MenuError::InvalidArguments(USAGE.to_string())),
    };

    let menus = match source {
        Source::File(path) => {
            let body = fs::read_to_string(&path)?;
            let values: Vec<serde_json::Value> = serde_json::from_str(&body)?;
            let records: Vec<RawMenuRecord> =
                values.into_iter().map(RawMenuRecord::from_value).collect();
            info!("Read {} records from {}", records.len(), path);
            kit.normalizer().normalize_all(&records, None)
        }
        Source::Remote(query) => {
            let feed = HttpFeedSource::new(&config.api)?;
            // A one-shot CLI never unmounts, so the response is always current
            FeedView::new()
                .load(&feed, &query, kit.normalizer())
                .await?
                .unwrap_or_default()
        }
    };

    print_menus(&kit, &menus, grouped)
}

fn print_menus(kit: &MenuKit, menus: &[DisplayMenu], grouped: bool) -> Result<(), MenuError> {
    let output = if grouped {
        serde_json::to_string_pretty(&kit.group(menus))?
    } else {
        let cards: Vec<_> = menus.iter().map(|menu| kit.card(menu)).collect();
        serde_json::to_string_pretty(&cards)?
    };
    println!("{output}");
    Ok(())
}
