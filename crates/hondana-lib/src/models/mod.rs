pub mod manga;
pub use manga::*;

pub mod library;
pub use library::*;
