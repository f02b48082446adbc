use async_trait::async_trait;
use serde::Deserialize;

use hondana_lib::models::{Manga, MangaStatus, MangaType, UNKNOWN_CREDIT, UNTITLED};

use crate::normalize::{clean_description, parse_year};
use crate::{Catalog, Error};

pub const NAME: &'static str = "jikan";

const BASE_URL: &str = "https://api.jikan.moe/v4";

#[derive(Debug, Default, Clone, Deserialize)]
pub struct JikanImageSet {
    pub image_url: Option<String>,
    pub large_image_url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct JikanImages {
    pub jpg: Option<JikanImageSet>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct JikanPublished {
    pub from: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct JikanNamed {
    pub name: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct JikanManga {
    pub mal_id: i64,
    pub title: String,
    pub title_english: Option<String>,
    pub synopsis: Option<String>,
    pub chapters: Option<i64>,
    pub status: Option<String>,
    pub published: JikanPublished,
    pub images: JikanImages,
    pub authors: Vec<JikanNamed>,
    pub genres: Vec<JikanNamed>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
struct SearchResponse {
    data: Option<Vec<JikanManga>>,
}

impl Into<Manga> for JikanManga {
    fn into(self) -> Manga {
        let title = self
            .title_english
            .filter(|title| !title.is_empty())
            .unwrap_or(self.title);
        let title = if title.is_empty() {
            UNTITLED.to_string()
        } else {
            title
        };

        let status = self.status.unwrap_or_default().to_lowercase();
        let status = if status.contains("finish") {
            MangaStatus::Completed
        } else if status.contains("publish") {
            MangaStatus::InProgress
        } else {
            MangaStatus::Hiatus
        };

        let author = self
            .authors
            .into_iter()
            .next()
            .map(|author| author.name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_CREDIT.to_string());

        Manga {
            id: format!("{NAME}-{}", self.mal_id),
            title,
            kind: MangaType::Manga,
            cover: self
                .images
                .jpg
                .and_then(|jpg| {
                    jpg.large_image_url
                        .filter(|url| !url.is_empty())
                        .or_else(|| jpg.image_url.filter(|url| !url.is_empty()))
                })
                .unwrap_or_default(),
            author,
            artist: UNKNOWN_CREDIT.to_string(),
            status,
            description: self
                .synopsis
                .as_deref()
                .map(clean_description)
                .unwrap_or_default(),
            genres: self.genres.into_iter().map(|genre| genre.name).collect(),
            total_chapters: self.chapters,
            publish_year: parse_year(self.published.from.as_deref()),
            publisher: UNKNOWN_CREDIT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Jikan {
    client: reqwest::Client,
    base_url: String,
}

#[async_trait]
impl Catalog for Jikan {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn search(&self, query: &str, limit: i64) -> Result<Vec<Manga>, Error> {
        info!("searching {NAME} for {query:?}");

        let data = self
            .get_list(
                "/manga",
                &[("q", query.to_string()), ("limit", format!("{limit}"))],
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
            .get_list("/top/manga", &[("limit", format!("{limit}"))])
            .await?;

        Ok(data.into_iter().map(|m| m.into()).collect())
    }
}

impl Jikan {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn get_list(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<JikanManga>, Error> {
        let res = self
            .client
            .get(format!("{}{path}", self.base_url))
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

        let res: SearchResponse = res.json().await.map_err(|source| Error::Request {
            catalog: NAME,
            source,
        })?;

        Ok(res.data.unwrap_or_default())
    }
}
