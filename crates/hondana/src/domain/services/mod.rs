pub mod library;
pub mod search;
