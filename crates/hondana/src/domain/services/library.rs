use thiserror::Error;

use hondana_lib::models::{LibraryEntry, Manga, ReadingStatus};

use crate::domain::repositories::library::{LibraryRepository, LibraryRepositoryError};

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("repository error: {0}")]
    RepositoryError(#[from] LibraryRepositoryError),
    #[error("no entry with id {0}")]
    NotFound(String),
    #[error("invalid update: {0}")]
    Invalid(#[from] hondana_lib::error::Error),
    #[error("collection is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct LibraryService<R>
where
    R: LibraryRepository,
{
    repo: R,
}

impl<R> LibraryService<R>
where
    R: LibraryRepository,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn entries(&self) -> Result<Vec<LibraryEntry>, LibraryError> {
        let entries = self.repo.all()?;

        Ok(entries)
    }

    pub fn save_all(&self, entries: &[LibraryEntry]) -> Result<(), LibraryError> {
        self.repo.save_all(entries)?;

        Ok(())
    }

    /// Put a record into the collection. Adding an id that is already
    /// there keeps the existing entry untouched.
    pub fn add(&self, manga: Manga) -> Result<LibraryEntry, LibraryError> {
        let mut entries = self.repo.all()?;

        if let Some(existing) = entries.iter().find(|entry| entry.manga.id == manga.id) {
            info!("{} is already in the library", manga.id);
            return Ok(existing.clone());
        }

        let entry = LibraryEntry::new(manga);
        entries.push(entry.clone());
        self.repo.save_all(&entries)?;

        Ok(entry)
    }

    pub fn remove(&self, id: &str) -> Result<(), LibraryError> {
        let mut entries = self.repo.all()?;
        entries.retain(|entry| entry.manga.id != id);
        self.repo.save_all(&entries)?;

        Ok(())
    }

    pub fn clear(&self) -> Result<(), LibraryError> {
        self.repo.save_all(&[])?;

        Ok(())
    }

    pub fn update_reading_status(
        &self,
        id: &str,
        status: ReadingStatus,
    ) -> Result<LibraryEntry, LibraryError> {
        self.update(id, |entry| {
            entry.set_reading_status(status);
            Ok(())
        })
    }

    pub fn update_progress(&self, id: &str, chapter: i64) -> Result<LibraryEntry, LibraryError> {
        self.update(id, |entry| entry.set_progress(chapter).map_err(Into::into))
    }

    pub fn update_rating(&self, id: &str, rating: Option<u8>) -> Result<LibraryEntry, LibraryError> {
        self.update(id, |entry| entry.set_rating(rating).map_err(Into::into))
    }

    /// Whole collection as pretty JSON, the interchange format.
    pub fn export_json(&self) -> Result<String, LibraryError> {
        let entries = self.repo.all()?;
        let json = serde_json::to_string_pretty(&entries)?;

        Ok(json)
    }

    /// Replace the collection with a previously exported document.
    pub fn import_json(&self, json: &str) -> Result<usize, LibraryError> {
        let entries: Vec<LibraryEntry> = serde_json::from_str(json)?;
        self.repo.save_all(&entries)?;

        Ok(entries.len())
    }

    fn update<F>(&self, id: &str, apply: F) -> Result<LibraryEntry, LibraryError>
    where
        F: FnOnce(&mut LibraryEntry) -> Result<(), LibraryError>,
    {
        let mut entries = self.repo.all()?;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.manga.id == id)
            .ok_or_else(|| LibraryError::NotFound(id.to_string()))?;

        apply(entry)?;
        let updated = entry.clone();
        self.repo.save_all(&entries)?;

        Ok(updated)
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;

    use hondana_lib::models::{MangaStatus, MangaType, UNKNOWN_CREDIT};

    use super::*;

    struct MemoryRepository {
        entries: RefCell<Vec<LibraryEntry>>,
    }

    impl MemoryRepository {
        fn new() -> Self {
            Self {
                entries: RefCell::new(vec![]),
            }
        }
    }

    impl LibraryRepository for MemoryRepository {
        fn all(&self) -> Result<Vec<LibraryEntry>, LibraryRepositoryError> {
            Ok(self.entries.borrow().clone())
        }

        fn save_all(&self, entries: &[LibraryEntry]) -> Result<(), LibraryRepositoryError> {
            *self.entries.borrow_mut() = entries.to_vec();
            Ok(())
        }
    }

    fn manga(id: &str) -> Manga {
        Manga {
            id: id.to_string(),
            title: "Berserk".to_string(),
            kind: MangaType::Manga,
            cover: String::new(),
            author: "Kentarou Miura".to_string(),
            artist: UNKNOWN_CREDIT.to_string(),
            status: MangaStatus::Hiatus,
            description: String::new(),
            genres: vec![],
            total_chapters: Some(364),
            publish_year: 1989,
            publisher: UNKNOWN_CREDIT.to_string(),
        }
    }

    #[test]
    fn test_add_dedupes_by_id() {
        let svc = LibraryService::new(MemoryRepository::new());

        svc.add(manga("kitsu-7936")).unwrap();
        svc.add(manga("kitsu-7936")).unwrap();
        svc.add(manga("jikan-2")).unwrap();

        assert_eq!(svc.entries().unwrap().len(), 2);
    }

    #[test]
    fn test_update_progress() {
        let svc = LibraryService::new(MemoryRepository::new());
        svc.add(manga("kitsu-7936")).unwrap();

        let updated = svc.update_progress("kitsu-7936", 100).unwrap();
        assert_eq!(updated.last_read_chapter, 100);
        assert_eq!(updated.progress_percent(), 27);

        let reloaded = svc.entries().unwrap();
        assert_eq!(reloaded[0].last_read_chapter, 100);
    }

    #[test]
    fn test_update_unknown_id() {
        let svc = LibraryService::new(MemoryRepository::new());

        let err = svc
            .update_reading_status("mangadex-nope", ReadingStatus::Reading)
            .unwrap_err();
        assert!(matches!(err, LibraryError::NotFound(_)));
    }

    #[test]
    fn test_invalid_rating_is_rejected_and_not_saved() {
        let svc = LibraryService::new(MemoryRepository::new());
        svc.add(manga("kitsu-7936")).unwrap();

        let err = svc.update_rating("kitsu-7936", Some(9)).unwrap_err();
        assert!(matches!(err, LibraryError::Invalid(_)));
        assert_eq!(svc.entries().unwrap()[0].rating, None);

        svc.update_rating("kitsu-7936", Some(5)).unwrap();
        assert_eq!(svc.entries().unwrap()[0].rating, Some(5));
    }

    #[test]
    fn test_remove_and_clear() {
        let svc = LibraryService::new(MemoryRepository::new());
        svc.add(manga("kitsu-1")).unwrap();
        svc.add(manga("kitsu-2")).unwrap();

        svc.remove("kitsu-1").unwrap();
        assert_eq!(svc.entries().unwrap().len(), 1);

        svc.clear().unwrap();
        assert!(svc.entries().unwrap().is_empty());
    }

    #[test]
    fn test_import_replaces_the_collection() {
        let svc = LibraryService::new(MemoryRepository::new());
        svc.add(manga("kitsu-1")).unwrap();

        let exported = {
            let other = LibraryService::new(MemoryRepository::new());
            other.add(manga("jikan-11")).unwrap();
            other.add(manga("jikan-42")).unwrap();
            other.export_json().unwrap()
        };

        let imported = svc.import_json(&exported).unwrap();
        assert_eq!(imported, 2);

        let entries = svc.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.manga.id.starts_with("jikan-")));
    }

    #[test]
    fn test_import_rejects_garbage() {
        let svc = LibraryService::new(MemoryRepository::new());
        assert!(matches!(
            svc.import_json("{\"not\": \"a list\"}"),
            Err(LibraryError::Json(_))
        ));
    }
}
