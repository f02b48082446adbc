extern crate log;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use hondana::domain::services::library::LibraryService;
use hondana::domain::services::search::{DEFAULT_LIMIT, SearchService};
use hondana::infrastructure::config::Config;
use hondana::infrastructure::repositories::library::LibraryRepositoryImpl;
use hondana_catalog::{AniList, Catalog, Jikan, Kitsu, MangaDex, MyAnimeList, priority_for};
use hondana_lib::prelude::{MangaType, ReadingStatus};

#[derive(Parser)]
#[clap(version, about = "Personal manga catalog with multi-source search")]
struct Opts {
    /// Path to config file
    #[clap(long)]
    config: Option<String>,
    #[clap(subcommand)]
    subcmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the external catalogs, first hit wins
    Search {
        query: String,
        #[clap(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: i64,
        /// Try the catalogs that carry this format first
        #[clap(short, long)]
        kind: Option<MangaType>,
    },
    /// Most followed titles right now
    Popular {
        #[clap(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: i64,
    },
    /// Manage the local collection
    #[clap(subcommand)]
    Library(LibraryCommand),
}

#[derive(Subcommand)]
enum LibraryCommand {
    /// Print every entry in the collection
    List,
    /// Search the catalogs and store one of the results
    Add {
        query: String,
        /// Which search result to store, counting from 1
        #[clap(short, long, default_value_t = 1)]
        pick: usize,
    },
    /// Drop an entry from the collection
    Remove { id: String },
    /// Drop every entry from the collection
    Clear,
    /// Print the collection as JSON
    Export,
    /// Replace the collection with entries from a JSON file
    Import { path: String },
    /// Set the reading status of an entry
    Status { id: String, status: ReadingStatus },
    /// Set the last read chapter of an entry
    Progress { id: String, chapter: i64 },
    /// Rate an entry 1 to 5 stars, or 0 to clear the rating
    Rate { id: String, stars: u8 },
}

fn init_logger() {
    let mut builder = env_logger::Builder::new();
    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            let level = std::env::var("HONDANA_LOG").unwrap_or_else(|_| "error".to_string());
            builder.parse_filters(&format!("hondana={level},hondana_catalog={level}"));
        }
    }
    builder.init();
}

/// Put the catalogs that usually carry `kind` in front, keep the rest behind
/// them as a last resort.
fn order_for(kind: Option<MangaType>, catalogs: Vec<Arc<dyn Catalog>>) -> Vec<Arc<dyn Catalog>> {
    let Some(kind) = kind else {
        return catalogs;
    };

    let priority = priority_for(kind);
    let mut ordered: Vec<Arc<dyn Catalog>> = priority
        .iter()
        .filter_map(|name| {
            catalogs
                .iter()
                .find(|catalog| catalog.name() == *name)
                .cloned()
        })
        .collect();
    for catalog in catalogs {
        if !ordered.iter().any(|seen| seen.name() == catalog.name()) {
            ordered.push(catalog);
        }
    }

    ordered
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();

    let opts: Opts = Opts::parse();

    let config = Config::open(opts.config)?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.fetch_timeout))
        .build()?;

    let jikan = Arc::new(Jikan::new(client.clone()));

    let mut catalogs: Vec<Arc<dyn Catalog>> = vec![
        Arc::new(Kitsu::new(client.clone())),
        jikan.clone(),
        Arc::new(MangaDex::new(client.clone())),
        Arc::new(AniList::new(client.clone())),
    ];
    if let Some(mal) = config.myanimelist.as_ref() {
        catalogs.push(Arc::new(MyAnimeList::new(
            client.clone(),
            mal.client_id.clone(),
        )));
    }

    match opts.subcmd {
        Command::Search { query, limit, kind } => {
            let service = SearchService::new(order_for(kind, catalogs), jikan);
            let res = service.search(&query, limit).await;
            println!("{}", serde_json::to_string_pretty(&res)?);
        }
        Command::Popular { limit } => {
            let service = SearchService::new(catalogs, jikan);
            let data = service.popular(limit).await;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Command::Library(cmd) => {
            let library = LibraryService::new(LibraryRepositoryImpl::new(&config.library_path));
            match cmd {
                LibraryCommand::List => {
                    let entries = library.entries()?;
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                }
                LibraryCommand::Add { query, pick } => {
                    let service = SearchService::new(catalogs, jikan);
                    let res = service.search(&query, DEFAULT_LIMIT).await;
                    if let Some(error) = res.error {
                        return Err(error.into());
                    }
                    let manga = res
                        .data
                        .into_iter()
                        .nth(pick.saturating_sub(1))
                        .ok_or_else(|| {
                            format!("the search did not return a result number {pick}")
                        })?;
                    let entry = library.add(manga)?;
                    println!("added {} ({})", entry.manga.title, entry.manga.id);
                }
                LibraryCommand::Remove { id } => {
                    library.remove(&id)?;
                    println!("removed {id}");
                }
                LibraryCommand::Clear => {
                    library.clear()?;
                    println!("collection cleared");
                }
                LibraryCommand::Export => {
                    println!("{}", library.export_json()?);
                }
                LibraryCommand::Import { path } => {
                    let json = std::fs::read_to_string(&path)?;
                    let count = library.import_json(&json)?;
                    println!("imported {count} entries");
                }
                LibraryCommand::Status { id, status } => {
                    let entry = library.update_reading_status(&id, status)?;
                    println!("{} is now {}", entry.manga.title, entry.reading_status);
                }
                LibraryCommand::Progress { id, chapter } => {
                    let entry = library.update_progress(&id, chapter)?;
                    println!(
                        "{} at chapter {} ({}%)",
                        entry.manga.title,
                        entry.last_read_chapter,
                        entry.progress_percent()
                    );
                }
                LibraryCommand::Rate { id, stars } => {
                    let rating = if stars == 0 { None } else { Some(stars) };
                    let entry = library.update_rating(&id, rating)?;
                    match entry.rating {
                        Some(stars) => println!("{} rated {stars}/5", entry.manga.title),
                        None => println!("rating cleared for {}", entry.manga.title),
                    }
                }
            }
        }
    }

    Ok(())
}
