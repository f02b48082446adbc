use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use hondana_lib::models::{Manga, MangaStatus, MangaType, UNKNOWN_CREDIT, UNTITLED, current_year};

use crate::normalize::clean_description;
use crate::{Catalog, Error};

pub const NAME: &'static str = "anilist";

const BASE_URL: &str = "https://graphql.anilist.co";

#[derive(Debug, Default, Clone, Deserialize)]
pub struct MediaTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CoverImage {
    pub large: Option<String>,
    pub medium: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct StartDate {
    pub year: Option<i32>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct StaffName {
    pub full: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct StaffNode {
    pub name: Option<StaffName>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct StaffEdge {
    pub node: Option<StaffNode>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Staff {
    pub edges: Vec<StaffEdge>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Media {
    pub id: i64,
    pub title: Option<MediaTitle>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub cover_image: Option<CoverImage>,
    pub start_date: Option<StartDate>,
    pub chapters: Option<i64>,
    pub genres: Option<Vec<String>>,
    pub staff: Option<Staff>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
struct SearchResponse {
    data: Option<PageData>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
struct PageData {
    #[serde(rename = "Page")]
    page: Option<Page>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
struct Page {
    media: Option<Vec<Media>>,
}

impl Into<Manga> for Media {
    fn into(self) -> Manga {
        let title = self
            .title
            .and_then(|title| {
                title
                    .romaji
                    .filter(|text| !text.is_empty())
                    .or_else(|| title.english.filter(|text| !text.is_empty()))
                    .or_else(|| title.native.filter(|text| !text.is_empty()))
            })
            .unwrap_or_else(|| UNTITLED.to_string());

        let author = self
            .staff
            .map(|staff| staff.edges)
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|edge| edge.node)
            .and_then(|node| node.name)
            .and_then(|name| name.full)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_CREDIT.to_string());

        Manga {
            id: format!("{NAME}-{}", self.id),
            title,
            kind: MangaType::Manga,
            cover: self
                .cover_image
                .and_then(|cover| {
                    cover
                        .large
                        .filter(|url| !url.is_empty())
                        .or_else(|| cover.medium.filter(|url| !url.is_empty()))
                })
                .unwrap_or_default(),
            author,
            artist: UNKNOWN_CREDIT.to_string(),
            status: match self.status.as_deref() {
                Some("FINISHED") => MangaStatus::Completed,
                Some("RELEASING") => MangaStatus::InProgress,
                _ => MangaStatus::Hiatus,
            },
            description: self
                .description
                .as_deref()
                .map(clean_description)
                .unwrap_or_default(),
            genres: self.genres.unwrap_or_default(),
            total_chapters: self.chapters,
            publish_year: self
                .start_date
                .and_then(|date| date.year)
                .unwrap_or_else(current_year),
            publisher: UNKNOWN_CREDIT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AniList {
    client: reqwest::Client,
    base_url: String,
}

#[async_trait]
impl Catalog for AniList {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn search(&self, query: &str, limit: i64) -> Result<Vec<Manga>, Error> {
        const QUERY: &str = "
        query SearchManga($search: String, $limit: Int) {
            Page(perPage: $limit) {
                media(search: $search, type: MANGA) {
                    id
                    title {
                        romaji
                        english
                        native
                    }
                    description(asHtml: false)
                    status
                    coverImage {
                        large
                        medium
                    }
                    startDate {
                        year
                    }
                    chapters
                    genres
                    staff(perPage: 1) {
                        edges {
                            node {
                                name {
                                    full
                                }
                            }
                        }
                    }
                }
            }
        }
        ";

        info!("searching {NAME} for {query:?}");

        let media = self
            .post_graphql(&json!({
                "query": QUERY,
                "variables": {
                    "search": query,
                    "limit": limit
                }
            }))
            .await?;

        if media.is_empty() {
            return Err(Error::NoResults(NAME));
        }

        Ok(media.into_iter().map(|m| m.into()).collect())
    }

    async fn popular(&self, limit: i64) -> Result<Vec<Manga>, Error> {
        const QUERY: &str = "
        query PopularManga($limit: Int) {
            Page(perPage: $limit) {
                media(type: MANGA, sort: POPULARITY_DESC) {
                    id
                    title {
                        romaji
                        english
                        native
                    }
                    description(asHtml: false)
                    status
                    coverImage {
                        large
                        medium
                    }
                    startDate {
                        year
                    }
                    chapters
                    genres
                    staff(perPage: 1) {
                        edges {
                            node {
                                name {
                                    full
                                }
                            }
                        }
                    }
                }
            }
        }
        ";

        info!("fetching popular titles from {NAME}");

        let media = self
            .post_graphql(&json!({
                "query": QUERY,
                "variables": {
                    "limit": limit
                }
            }))
            .await?;

        Ok(media.into_iter().map(|m| m.into()).collect())
    }
}

impl AniList {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn post_graphql(&self, body: &serde_json::Value) -> Result<Vec<Media>, Error> {
        let res = self
            .client
            .post(&self.base_url)
            .json(body)
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

        Ok(res
            .data
            .and_then(|data| data.page)
            .and_then(|page| page.media)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_maps_media() {
        let media: Media = serde_json::from_value(json!({
            "id": 30002,
            "title": {"romaji": "Berserk", "english": null, "native": "ベルセルク"},
            "description": "His name is Guts.<br>The Black Swordsman.",
            "status": "RELEASING",
            "coverImage": {"large": "https://s4.anilist.co/media/manga/cover/b30002.jpg"},
            "startDate": {"year": 1989},
            "chapters": null,
            "genres": ["Action", "Horror"],
            "staff": {"edges": [{"node": {"name": {"full": "Kentarou Miura"}}}]}
        }))
        .unwrap();

        let manga: Manga = media.into();
        assert_eq!(manga.id, "anilist-30002");
        assert_eq!(manga.title, "Berserk");
        assert_eq!(
            manga.description,
            "His name is Guts.\nThe Black Swordsman."
        );
        assert_eq!(manga.status, MangaStatus::InProgress);
        assert_eq!(manga.author, "Kentarou Miura");
        assert_eq!(manga.genres, ["Action", "Horror"]);
        assert_eq!(manga.publish_year, 1989);
        assert_eq!(manga.total_chapters, None);
    }

    #[test]
    fn test_title_falls_back_to_native() {
        let media: Media = serde_json::from_value(json!({
            "id": 1,
            "title": {"romaji": null, "english": null, "native": "惡の華"}
        }))
        .unwrap();
        let manga: Manga = media.into();
        assert_eq!(manga.title, "惡の華");
    }

    #[test]
    fn test_bare_media_still_normalizes() {
        let media: Media = serde_json::from_value(json!({"id": 2})).unwrap();
        let manga: Manga = media.into();

        assert_eq!(manga.title, UNTITLED);
        assert_eq!(manga.status, MangaStatus::Hiatus);
        assert_eq!(manga.author, UNKNOWN_CREDIT);
        assert_eq!(manga.publish_year, current_year());
        assert_eq!(manga.cover, "");
    }

    #[tokio::test]
    async fn test_search_unwraps_page_envelope() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(
                json!({"data": {"Page": {"media": [{"id": 30002, "title": {"romaji": "Berserk"}}]}}})
                    .to_string(),
            )
            .create_async()
            .await;

        let anilist = AniList::with_base_url(reqwest::Client::new(), server.url());
        let results = anilist.search("berserk", 10).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "anilist-30002");
    }
}
