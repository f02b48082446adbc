use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("chapter is out of range for this manga")]
    InvalidChapter,
    #[error("rating must be between 1 and 5")]
    InvalidRating,
    #[error("unknown manga type, should be manga, manhwa or webtoon")]
    InvalidKind,
    #[error("unknown reading status, should be lendo, planejo_ler, completo or abandonado")]
    InvalidReadingStatus,
}
