use async_trait::async_trait;
use serde::Deserialize;

use hondana_lib::models::{Manga, MangaStatus, MangaType, UNKNOWN_CREDIT, UNTITLED};

use crate::normalize::{clean_description, parse_year};
use crate::{Catalog, Error};

pub const NAME: &'static str = "mal";

const BASE_URL: &str = "https://api.myanimelist.net/v2";

const MANGA_FIELDS: &str =
    "id,title,alternative_titles,main_picture,synopsis,status,genres,num_chapters,start_date";

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AlternativeTitles {
    pub en: String,
    pub ja: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct MainPicture {
    pub medium: String,
    pub large: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct MalGenre {
    pub name: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct MalManga {
    pub id: i64,
    pub title: String,
    pub alternative_titles: AlternativeTitles,
    pub main_picture: MainPicture,
    pub synopsis: String,
    pub status: String,
    pub genres: Vec<MalGenre>,
    pub num_chapters: Option<i64>,
    pub start_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Node<T> {
    pub node: T,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
struct GetMangaListResponse {
    data: Option<Vec<Node<MalManga>>>,
}

impl Into<Manga> for MalManga {
    fn into(self) -> Manga {
        let title = if !self.title.is_empty() {
            self.title
        } else if !self.alternative_titles.en.is_empty() {
            self.alternative_titles.en
        } else {
            UNTITLED.to_string()
        };

        let status = match self.status.as_str() {
            "finished" => MangaStatus::Completed,
            "publishing" | "currently_publishing" => MangaStatus::InProgress,
            _ => MangaStatus::Hiatus,
        };

        let cover = if !self.main_picture.large.is_empty() {
            self.main_picture.large
        } else {
            self.main_picture.medium
        };

        Manga {
            id: format!("{NAME}-{}", self.id),
            title,
            kind: MangaType::Manga,
            cover,
            author: UNKNOWN_CREDIT.to_string(),
            artist: UNKNOWN_CREDIT.to_string(),
            status,
            description: clean_description(&self.synopsis),
            genres: self.genres.into_iter().map(|genre| genre.name).collect(),
            // zero is how the API spells "still counting"
            total_chapters: self.num_chapters.filter(|count| *count > 0),
            publish_year: parse_year(self.start_date.as_deref()),
            publisher: UNKNOWN_CREDIT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MyAnimeList {
    client: reqwest::Client,
    client_id: String,
    base_url: String,
}

#[async_trait]
impl Catalog for MyAnimeList {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn search(&self, query: &str, limit: i64) -> Result<Vec<Manga>, Error> {
        info!("searching {NAME} for {query:?}");

        let data = self
            .get_manga_list(
                "/manga",
                &[
                    ("q", query.to_string()),
                    ("limit", format!("{limit}")),
                    ("fields", MANGA_FIELDS.to_string()),
                ],
            )
            .await?;

        if data.is_empty() {
            return Err(Error::NoResults(NAME));
        }

        Ok(data.into_iter().map(|m| m.into()).collect())
    }

    async fn popular(&self, limit: i64) -> Result<Vec<Manga>, Error> {
        info!("fetching popular titles from {NAME}");

        let data = self
            .get_manga_list(
                "/manga/ranking",
                &[
                    ("ranking_type", "manga".to_string()),
                    ("limit", format!("{limit}")),
                    ("fields", MANGA_FIELDS.to_string()),
                ],
            )
            .await?;

        Ok(data.into_iter().map(|m| m.into()).collect())
    }
}

impl MyAnimeList {
    pub fn new(client: reqwest::Client, client_id: String) -> Self {
        Self::with_base_url(client, client_id, BASE_URL)
    }

    pub fn with_base_url(
        client: reqwest::Client,
        client_id: String,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            client_id,
            base_url: base_url.into(),
        }
    }

    async fn get_manga_list(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<MalManga>, Error> {
        let res = self
            .client
            .get(format!("{}{path}", self.base_url))
            .header("X-MAL-CLIENT-ID", &self.client_id)
            .query(params)
            .send()
            .await
            .map_err(|source| Error::Request {
                catalog: NAME,
                source,
            })?;

        if !res.status().is_success() {
            return Err(Error::Status {
                catalog: NAME,
                status: res.status(),
            });
        }

        let res: GetMangaListResponse = res.json().await.map_err(|source| Error::Request {
            catalog: NAME,
            source,
        })?;

        Ok(res
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|node| node.node)
            .collect())
    }
}
