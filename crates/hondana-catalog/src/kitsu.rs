use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;

use hondana_lib::models::{Manga, MangaStatus, MangaType, UNKNOWN_CREDIT, UNTITLED};

use crate::normalize::{clean_description, parse_year};
use crate::{Catalog, Error};

pub const NAME: &'static str = "kitsu";

const BASE_URL: &str = "https://kitsu.io/api/edge";

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PosterImage {
    pub medium: Option<String>,
    pub large: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KitsuAttributes {
    pub canonical_title: Option<String>,
    pub titles: BTreeMap<String, Option<String>>,
    pub synopsis: Option<String>,
    pub status: Option<String>,
    pub poster_image: Option<PosterImage>,
    pub start_date: Option<String>,
    pub chapter_count: Option<i64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct KitsuManga {
    pub id: String,
    pub attributes: KitsuAttributes,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
struct SearchResponse {
    data: Option<Vec<KitsuManga>>,
}

fn preferred_title(titles: &BTreeMap<String, Option<String>>, lang: &str) -> Option<String> {
    titles
        .get(lang)
        .cloned()
        .flatten()
        .filter(|title| !title.is_empty())
}

impl Into<Manga> for KitsuManga {
    fn into(self) -> Manga {
        let attrs = self.attributes;

        let title = attrs
            .canonical_title
            .filter(|title| !title.is_empty())
            .or_else(|| preferred_title(&attrs.titles, "en_jp"))
            .or_else(|| preferred_title(&attrs.titles, "en"))
            .or_else(|| {
                attrs
                    .titles
                    .values()
                    .flatten()
                    .find(|title| !title.is_empty())
                    .cloned()
            })
            .unwrap_or_else(|| UNTITLED.to_string());

        let status = match attrs.status.as_deref() {
            Some("finished") => MangaStatus::Completed,
            Some("current") => MangaStatus::InProgress,
            _ => MangaStatus::Hiatus,
        };

        Manga {
            id: format!("{NAME}-{}", self.id),
            title,
            kind: MangaType::Manga,
            cover: attrs
                .poster_image
                .and_then(|poster| {
                    poster
                        .large
                        .filter(|url| !url.is_empty())
                        .or_else(|| poster.medium.filter(|url| !url.is_empty()))
                })
                .unwrap_or_default(),
            author: UNKNOWN_CREDIT.to_string(),
            artist: UNKNOWN_CREDIT.to_string(),
            status,
            description: attrs
                .synopsis
                .as_deref()
                .map(clean_description)
                .unwrap_or_default(),
            // categories come from a separate endpoint, skip them
            genres: vec![],
            total_chapters: attrs.chapter_count,
            publish_year: parse_year(attrs.start_date.as_deref()),
            publisher: UNKNOWN_CREDIT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Kitsu {
    client: reqwest::Client,
    base_url: String,
}

#[async_trait]
impl Catalog for Kitsu {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn search(&self, query: &str, limit: i64) -> Result<Vec<Manga>, Error> {
        info!("searching {NAME} for {query:?}");

        let data = self
            .get_manga(&[
                ("filter[text]", query.to_string()),
                ("page[limit]", format!("{limit}")),
            ])
            .await?;

        if data.is_empty() {
            return Err(Error::NoResults(NAME));
        }

        Ok(data.into_iter().map(|m| m.into()).collect())
    }

    async fn popular(&self, limit: i64) -> Result<Vec<Manga>, Error> {
        info!("fetching popular titles from {NAME}");

        let data = self
            .get_manga(&[
                ("page[limit]", format!("{limit}")),
                ("sort", "popularityRank".to_string()),
            ])
            .await?;

        Ok(data.into_iter().map(|m| m.into()).collect())
    }
}

impl Kitsu {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    /// Point the client at a different endpoint, mainly for tests.
    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn get_manga(&self, params: &[(&str, String)]) -> Result<Vec<KitsuManga>, Error> {
        let res = self
            .client
            .get(format!("{}/manga", self.base_url))
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
