use std::sync::Arc;

use gosub_fetcher::storage::{InMemoryLocalStore, LocalStore, StorageArea};
use gosub_fetcher::Fetcher;

// Usage: fetch_json <url> [token]
//
// Set RUST_LOG=debug to see the requests being made.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let url = args
        .next()
        .unwrap_or_else(|| "https://jsonplaceholder.typicode.com/todos/1".to_string());
    let target = url::Url::parse(&url)?;

    let store = InMemoryLocalStore::new();
    let area: Arc<dyn StorageArea> = store.area(&target.origin())?;
    if let Some(token) = args.next() {
        area.set_item("token", &token)?;
    }

    let fetcher = Fetcher::builder().local_storage(area).build()?;

    match fetcher.get(target.as_str()).await {
        Ok(body) => println!("{}", serde_json::to_string_pretty(&body)?),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
