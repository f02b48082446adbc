use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;

use hondana_lib::models::{Manga, MangaStatus, MangaType, UNKNOWN_CREDIT, UNTITLED, current_year};

use crate::normalize::clean_description;
use crate::{Catalog, Error};

pub const NAME: &'static str = "mangadex";

const BASE_URL: &str = "https://api.mangadex.org";

/// Cover art hangs off a separate endpoint, so records ship with a
/// placeholder until the real file name is resolved.
const COVER_PLACEHOLDER: &str = "https://via.placeholder.com/600x800?text=Capa+Não+Disponível";

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct MangaDexTagAttributes {
    pub name: BTreeMap<String, String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct MangaDexTag {
    pub attributes: MangaDexTagAttributes,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct MangaDexRelationshipAttributes {
    pub name: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct MangaDexRelationship {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: Option<MangaDexRelationshipAttributes>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct MangaDexAttributes {
    pub title: BTreeMap<String, String>,
    pub description: BTreeMap<String, String>,
    pub year: Option<i64>,
    pub status: Option<String>,
    pub tags: Vec<MangaDexTag>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct MangaDexManga {
    pub id: String,
    pub attributes: MangaDexAttributes,
    pub relationships: Vec<MangaDexRelationship>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
struct SearchResponse {
    data: Option<Vec<MangaDexManga>>,
}

/// Pick a localized string, Portuguese first, then English, then whatever
/// the record carries.
fn localized(map: &BTreeMap<String, String>) -> Option<String> {
    ["pt-br", "pt", "en"]
        .into_iter()
        .find_map(|lang| map.get(lang).filter(|text| !text.is_empty()))
        .cloned()
        .or_else(|| map.values().find(|text| !text.is_empty()).cloned())
}

fn credit(relationships: &[MangaDexRelationship], kind: &str) -> String {
    relationships
        .iter()
        .filter(|rel| rel.kind == kind)
        .find_map(|rel| {
            rel.attributes
                .as_ref()
                .and_then(|attrs| attrs.name.clone())
                .filter(|name| !name.is_empty())
        })
        .unwrap_or_else(|| UNKNOWN_CREDIT.to_string())
}

impl Into<Manga> for MangaDexManga {
    fn into(self) -> Manga {
        let attrs = self.attributes;

        let status = attrs.status.unwrap_or_default().to_lowercase();
        let status = if status.contains("completed") {
            MangaStatus::Completed
        } else if status.contains("hiatus") {
            MangaStatus::Hiatus
        } else {
            MangaStatus::InProgress
        };

        Manga {
            id: format!("{NAME}-{}", self.id),
            title: localized(&attrs.title).unwrap_or_else(|| UNTITLED.to_string()),
            kind: MangaType::Manga,
            cover: COVER_PLACEHOLDER.to_string(),
            author: credit(&self.relationships, "author"),
            artist: credit(&self.relationships, "artist"),
            status,
            description: localized(&attrs.description)
                .map(|text| clean_description(&text))
                .unwrap_or_default(),
            genres: attrs
                .tags
                .iter()
                .filter_map(|tag| {
                    let name = &tag.attributes.name;
                    name.get("pt").or_else(|| name.get("en")).cloned()
                })
                .filter(|name| !name.is_empty())
                .collect(),
            total_chapters: None,
            publish_year: attrs
                .year
                .map(|year| year as i32)
                .unwrap_or_else(current_year),
            publisher: UNKNOWN_CREDIT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MangaDex {
    client: reqwest::Client,
    base_url: String,
}

#[async_trait]
impl Catalog for MangaDex {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn search(&self, query: &str, limit: i64) -> Result<Vec<Manga>, Error> {
        info!("searching {NAME} for {query:?}");

        let data = self
            .get_manga(&[
                ("title", query.to_string()),
                ("limit", format!("{limit}")),
                ("includes[]", "author".to_string()),
                ("includes[]", "artist".to_string()),
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
                ("limit", format!("{limit}")),
                ("order[followedCount]", "desc".to_string()),
                ("includes[]", "author".to_string()),
                ("includes[]", "artist".to_string()),
            ])
            .await?;

        Ok(data.into_iter().map(|m| m.into()).collect())
    }
}

impl MangaDex {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn get_manga(&self, params: &[(&str, String)]) -> Result<Vec<MangaDexManga>, Error> {
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
