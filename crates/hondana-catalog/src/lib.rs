#[macro_use]
extern crate log;

pub mod kitsu;
pub use kitsu::Kitsu;

pub mod jikan;
pub use jikan::Jikan;

pub mod mangadex;
pub use mangadex::MangaDex;

pub mod anilist;
pub use anilist::AniList;

pub mod myanimelist;
pub use myanimelist::MyAnimeList;

pub mod normalize;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use hondana_lib::models::{Manga, MangaType};

#[derive(Debug, Error)]
pub enum Error {
    #[error("{catalog} responded with status {status}")]
    Status {
        catalog: &'static str,
        status: StatusCode,
    },
    #[error("no results from {0}")]
    NoResults(&'static str),
    #[error("request to {catalog} failed: {source}")]
    Request {
        catalog: &'static str,
        source: reqwest::Error,
    },
}

/// A remote manga catalog that can be searched by title.
///
/// Every implementation maps its own wire format into [`Manga`], so callers
/// only ever see the canonical record regardless of which catalog answered.
#[async_trait]
pub trait Catalog: Send + Sync {
    fn name(&self) -> &'static str;

    /// Search the catalog by title. Returns an error when the catalog is
    /// unreachable, answers with a non-success status or has no match for
    /// the query.
    async fn search(&self, query: &str, limit: i64) -> Result<Vec<Manga>, Error>;

    /// Fetch the catalog's most popular titles. An empty list is not an
    /// error here, there is nothing to fall back to.
    async fn popular(&self, limit: i64) -> Result<Vec<Manga>, Error>;
}

/// Catalogs most likely to carry good records for a given format, best first.
/// Korean and webtoon titles are spotty on the MyAnimeList-backed catalogs,
/// so those formats lead with MangaDex.
pub fn priority_for(kind: MangaType) -> &'static [&'static str] {
    match kind {
        MangaType::Manga => &[kitsu::NAME, jikan::NAME, mangadex::NAME, anilist::NAME],
        MangaType::Manhwa => &[mangadex::NAME, kitsu::NAME, anilist::NAME],
        MangaType::Webtoon => &[mangadex::NAME, anilist::NAME],
    }
}
