use std::sync::Arc;

use serde::Serialize;

use hondana_catalog::Catalog;
use hondana_lib::models::Manga;

/// Result limit applied when the caller does not pick one.
pub const DEFAULT_LIMIT: i64 = 10;

const EMPTY_QUERY: &str = "Consulta vazia.";
const ALL_SOURCES_FAILED: &str =
    "Não foi possível buscar mangás nas APIs externas. Tente novamente mais tarde.";

/// What a search always resolves to: records plus an optional user-facing
/// message. Failures never escape as errors.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub data: Vec<Manga>,
    pub error: Option<String>,
}

pub struct SearchService {
    catalogs: Vec<Arc<dyn Catalog>>,
    popular: Arc<dyn Catalog>,
}

impl SearchService {
    pub fn new(catalogs: Vec<Arc<dyn Catalog>>, popular: Arc<dyn Catalog>) -> Self {
        Self { catalogs, popular }
    }

    /// Ask each catalog in turn and keep the first non-empty batch. A
    /// failed attempt is logged and the next catalog gets its turn, so a
    /// single record always tells which catalog answered.
    pub async fn search(&self, query: &str, limit: i64) -> SearchResponse {
        if query.trim().is_empty() {
            return SearchResponse {
                data: vec![],
                error: Some(EMPTY_QUERY.to_string()),
            };
        }

        for catalog in &self.catalogs {
            match catalog.search(query, limit).await {
                Ok(data) if !data.is_empty() => {
                    info!("{} answered with {} records", catalog.name(), data.len());
                    return SearchResponse { data, error: None };
                }
                Ok(_) => {
                    error!("search on {} came back empty", catalog.name());
                }
                Err(e) => {
                    error!("search on {} failed: {e}", catalog.name());
                }
            }
        }

        SearchResponse {
            data: vec![],
            error: Some(ALL_SOURCES_FAILED.to_string()),
        }
    }

    /// Popular titles from the designated catalog. Any failure turns into
    /// an empty list, never an error.
    pub async fn popular(&self, limit: i64) -> Vec<Manga> {
        match self.popular.popular(limit).await {
            Ok(data) => data,
            Err(e) => {
                error!("popular on {} failed: {e}", self.popular.name());
                vec![]
            }
        }
    }
}
