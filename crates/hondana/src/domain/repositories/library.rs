use thiserror::Error;

use hondana_lib::models::LibraryEntry;

#[derive(Debug, Error)]
pub enum LibraryRepositoryError {
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("collection is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage boundary for the collection. The whole collection moves as one
/// unit, mirroring a single serialized document.
pub trait LibraryRepository {
    fn all(&self) -> Result<Vec<LibraryEntry>, LibraryRepositoryError>;

    fn save_all(&self, entries: &[LibraryEntry]) -> Result<(), LibraryRepositoryError>;
}
