use std::fs;
use std::path::{Path, PathBuf};

use hondana_lib::models::LibraryEntry;

use crate::domain::repositories::library::{LibraryRepository, LibraryRepositoryError};

/// Collection store backed by a single JSON document on disk.
pub struct LibraryRepositoryImpl {
    path: PathBuf,
}

impl LibraryRepositoryImpl {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LibraryRepository for LibraryRepositoryImpl {
    fn all(&self) -> Result<Vec<LibraryEntry>, LibraryRepositoryError> {
        if !self.path.exists() {
            return Ok(vec![]);
        }

        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(vec![]);
        }

        Ok(serde_json::from_str(&raw)?)
    }

    fn save_all(&self, entries: &[LibraryEntry]) -> Result<(), LibraryRepositoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use hondana_lib::models::{Manga, MangaStatus, MangaType, UNKNOWN_CREDIT};
    use tempfile::tempdir;

    use super::*;

    fn entry(id: &str) -> LibraryEntry {
        LibraryEntry::new(Manga {
            id: id.to_string(),
            title: "Vagabond".to_string(),
            kind: MangaType::Manga,
            cover: String::new(),
            author: "Takehiko Inoue".to_string(),
            artist: UNKNOWN_CREDIT.to_string(),
            status: MangaStatus::Hiatus,
            description: String::new(),
            genres: vec!["Seinen".to_string()],
            total_chapters: Some(327),
            publish_year: 1998,
            publisher: UNKNOWN_CREDIT.to_string(),
        })
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let repo = LibraryRepositoryImpl::new(dir.path().join("library.json"));

        assert!(repo.all().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library.json");

        let repo = LibraryRepositoryImpl::new(&path);
        repo.save_all(&[entry("kitsu-25"), entry("jikan-656")]).unwrap();

        let reopened = LibraryRepositoryImpl::new(&path);
        let entries = reopened.all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].manga.id, "kitsu-25");
        assert_eq!(entries[1].manga.title, "Vagabond");
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("library.json");

        let repo = LibraryRepositoryImpl::new(&path);
        repo.save_all(&[entry("kitsu-25")]).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_tolerates_minimal_documents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, r#"[{"id":"mal-1","title":"Monster"}]"#).unwrap();

        let repo = LibraryRepositoryImpl::new(&path);
        let entries = repo.all().unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].manga.title, "Monster");
        assert_eq!(entries[0].last_read_chapter, 0);
    }
}
