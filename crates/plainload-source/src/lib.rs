pub mod error;
pub mod read;
pub mod resolve;

pub use error::SourceError;
pub use read::{read, strip_bom};
pub use resolve::{display_name, resolve, DEFAULT_EXTENSION};
