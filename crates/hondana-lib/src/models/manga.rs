use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Placeholder title used when a catalog provides no usable title field.
pub const UNTITLED: &str = "Sem título";

/// Sentinel for credits (author, artist, publisher) a catalog does not provide.
pub const UNKNOWN_CREDIT: &str = "Desconhecido";

/// Publication status, normalized across catalogs into a closed vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum MangaStatus {
    #[default]
    #[serde(rename = "em_andamento")]
    InProgress,
    #[serde(rename = "completo")]
    Completed,
    #[serde(rename = "hiato")]
    Hiatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MangaType {
    #[default]
    Manga,
    Manhwa,
    Webtoon,
}

impl FromStr for MangaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manga" => Ok(Self::Manga),
            "manhwa" => Ok(Self::Manhwa),
            "webtoon" => Ok(Self::Webtoon),
            _ => Err(Error::InvalidKind),
        }
    }
}

impl fmt::Display for MangaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Manga => "manga",
            Self::Manhwa => "manhwa",
            Self::Webtoon => "webtoon",
        };
        f.write_str(s)
    }
}

/// A type represent manga details, normalized across catalogs.
///
/// Every field carries a well-typed value: credits fall back to
/// [`UNKNOWN_CREDIT`], the title to [`UNTITLED`], the publish year to the
/// current calendar year. `total_chapters` stays `None` when the catalog
/// does not know the count, which is distinct from a count of zero.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manga {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: MangaType,
    #[serde(default)]
    pub cover: String,
    #[serde(default = "unknown_credit")]
    pub author: String,
    #[serde(default = "unknown_credit")]
    pub artist: String,
    #[serde(default)]
    pub status: MangaStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub total_chapters: Option<i64>,
    #[serde(default = "current_year")]
    pub publish_year: i32,
    #[serde(default = "unknown_credit")]
    pub publisher: String,
}

fn unknown_credit() -> String {
    UNKNOWN_CREDIT.to_string()
}

pub fn current_year() -> i32 {
    Utc::now().year()
}
