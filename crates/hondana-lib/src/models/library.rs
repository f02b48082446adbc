use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

use super::manga::Manga;

/// Reading state the user assigns to a collection entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ReadingStatus {
    #[serde(rename = "lendo")]
    Reading,
    #[default]
    #[serde(rename = "planejo_ler")]
    PlanToRead,
    #[serde(rename = "completo")]
    Completed,
    #[serde(rename = "abandonado")]
    Dropped,
}

impl FromStr for ReadingStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lendo" => Ok(Self::Reading),
            "planejo_ler" => Ok(Self::PlanToRead),
            "completo" => Ok(Self::Completed),
            "abandonado" => Ok(Self::Dropped),
            _ => Err(Error::InvalidReadingStatus),
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Reading => "Lendo",
            Self::PlanToRead => "Planeja Ler",
            Self::Completed => "Completo",
            Self::Dropped => "Abandonado",
        };
        f.write_str(label)
    }
}

/// A manga in the local collection together with the user's tracking state.
///
/// Serializes to the same JSON shape the collection store uses on disk, so
/// exported collections can be re-imported as-is. Missing fields fall back
/// to defaults on load rather than failing the whole collection.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    #[serde(flatten)]
    pub manga: Manga,
    #[serde(default)]
    pub reading_status: ReadingStatus,
    #[serde(default)]
    pub last_read_chapter: i64,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default = "Utc::now")]
    pub date_added: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}

impl LibraryEntry {
    pub fn new(manga: Manga) -> Self {
        let now = Utc::now();
        Self {
            manga,
            reading_status: ReadingStatus::default(),
            last_read_chapter: 0,
            rating: None,
            date_added: now,
            last_updated: now,
            notes: String::new(),
        }
    }

    /// Reading progress in percent. An unknown or zero chapter count reads
    /// as no measurable progress.
    pub fn progress_percent(&self) -> u8 {
        match self.manga.total_chapters {
            Some(total) if total > 0 => {
                let pct = self.last_read_chapter as f64 / total as f64 * 100.0;
                pct.round().clamp(0.0, 100.0) as u8
            }
            _ => 0,
        }
    }

    /// Set the last read chapter. Rejects negative chapters and, when the
    /// total is known, chapters past the end.
    pub fn set_progress(&mut self, chapter: i64) -> Result<(), Error> {
        if chapter < 0 {
            return Err(Error::InvalidChapter);
        }
        if let Some(total) = self.manga.total_chapters {
            if chapter > total {
                return Err(Error::InvalidChapter);
            }
        }
        self.last_read_chapter = chapter;
        self.touch();
        Ok(())
    }

    /// Rate the entry 1 to 5 stars, or clear the rating with `None`.
    pub fn set_rating(&mut self, rating: Option<u8>) -> Result<(), Error> {
        if let Some(stars) = rating {
            if !(1..=5).contains(&stars) {
                return Err(Error::InvalidRating);
            }
        }
        self.rating = rating;
        self.touch();
        Ok(())
    }

    pub fn set_reading_status(&mut self, status: ReadingStatus) {
        self.reading_status = status;
        self.touch();
    }

    fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::manga::{MangaStatus, UNKNOWN_CREDIT, current_year};

    fn entry(total_chapters: Option<i64>) -> LibraryEntry {
        LibraryEntry::new(Manga {
            id: "jikan-11".to_string(),
            title: "Naruto".to_string(),
            kind: Default::default(),
            cover: String::new(),
            author: UNKNOWN_CREDIT.to_string(),
            artist: UNKNOWN_CREDIT.to_string(),
            status: MangaStatus::Completed,
            description: String::new(),
            genres: vec![],
            total_chapters,
            publish_year: 1999,
            publisher: UNKNOWN_CREDIT.to_string(),
        })
    }

    #[test]
    fn test_progress_percent() {
        let mut entry = entry(Some(700));
        entry.set_progress(350).unwrap();
        assert_eq!(entry.progress_percent(), 50);

        entry.set_progress(700).unwrap();
        assert_eq!(entry.progress_percent(), 100);
    }

    #[test]
    fn test_progress_percent_unknown_total() {
        let mut entry = entry(None);
        entry.set_progress(42).unwrap();
        assert_eq!(entry.progress_percent(), 0);
    }

    #[test]
    fn test_set_progress_bounds() {
        let mut entry = entry(Some(700));
        assert_eq!(entry.set_progress(-1), Err(Error::InvalidChapter));
        assert_eq!(entry.set_progress(701), Err(Error::InvalidChapter));
        assert!(entry.set_progress(0).is_ok());
    }

    #[test]
    fn test_set_rating_bounds() {
        let mut entry = entry(None);
        assert_eq!(entry.set_rating(Some(0)), Err(Error::InvalidRating));
        assert_eq!(entry.set_rating(Some(6)), Err(Error::InvalidRating));
        assert!(entry.set_rating(Some(5)).is_ok());
        assert!(entry.set_rating(None).is_ok());
    }

    #[test]
    fn test_reading_status_from_str() {
        assert_eq!("lendo".parse(), Ok(ReadingStatus::Reading));
        assert_eq!("abandonado".parse(), Ok(ReadingStatus::Dropped));
        assert_eq!(
            "reading".parse::<ReadingStatus>(),
            Err(Error::InvalidReadingStatus)
        );
    }

    #[test]
    fn test_load_entry_with_missing_fields() {
        let entry: LibraryEntry =
            serde_json::from_str(r#"{"id":"kitsu-1","title":"Berserk"}"#).unwrap();

        assert_eq!(entry.reading_status, ReadingStatus::PlanToRead);
        assert_eq!(entry.last_read_chapter, 0);
        assert_eq!(entry.rating, None);
        assert_eq!(entry.notes, "");
        assert_eq!(entry.manga.publish_year, current_year());
        assert_eq!(entry.manga.status, MangaStatus::InProgress);
    }

    #[test]
    fn test_entry_round_trip() {
        let mut original = entry(Some(700));
        original.set_rating(Some(4)).unwrap();
        original.notes = "re-read".to_string();

        let json = serde_json::to_string(&original).unwrap();
        let loaded: LibraryEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded, original);
    }
}
