pub mod ambient;
pub mod config;
pub mod error;
pub mod exports;
pub mod runtime;
pub mod sandbox;

pub use ambient::AmbientSnapshot;
pub use config::LoaderConfig;
pub use error::{ErrorKind, LoadError};
pub use exports::Exports;
pub use runtime::Loader;

pub use mlua;
