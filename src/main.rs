// Small demonstration: scan a SQLite row into a record, then publish it as JSON.
//
// Usage: tagmap [settings.toml]
// The settings file may name `tag`, `fallbacks` and `flatten`; `TAGMAP_TAG`
// and friends override it.

use std::env;
use std::error::Error;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tagmap::{Mapper, Raw, Settings, json::to_json, record, scan_row};

#[derive(Debug, Default, Clone)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub price: Option<f64>,
    pub listed: DateTime<Utc>,
    pub extra: Raw,
}

record!(Listing {
    id { db: "id", json: "id" },
    title { db: "title", json: "title,omitempty" },
    price { db: "price", json: "price" },
    listed { db: "listed", json: "listed" },
    extra { db: "extra", json: "extra" },
});

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let settings = match env::args().nth(1) {
        Some(path) => Settings::from_file(path)?,
        None => Settings {
            tag: "json".into(),
            ..Default::default()
        },
    };
    info!(?settings, "using settings");

    let connection = Connection::open_in_memory()?;
    connection.execute_batch(
        "CREATE TABLE listing (id INTEGER NOT NULL, title TEXT NOT NULL, price REAL, listed TEXT NOT NULL, extra);
         INSERT INTO listing VALUES (7, 'Bicycle', NULL, '2024-05-01T10:00:00+02:00', 'as is');",
    )?;

    let mut listing = Listing::default();
    let scanned = connection.query_row(
        "SELECT id, title, price, listed, extra FROM listing",
        [],
        |row| Ok(scan_row(row, &mut listing, "db", &["*"])),
    )?;
    scanned?;
    info!(id = listing.id, title = %listing.title, "scanned listing");

    let mapper = Mapper::new(settings);
    let snapshot = mapper.map(&listing);
    println!("{}", serde_json::to_string_pretty(&to_json(&snapshot))?);
    Ok(())
}
