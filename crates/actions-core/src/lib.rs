pub mod blob;
pub mod compile;
pub mod config;
pub mod error;
pub mod fetch;
pub mod io;
pub mod locale;
pub mod payload;

pub use compile::{compile, compile_to_file};
pub use config::CompileConfig;
pub use error::{CatalogError, Result};
pub use payload::{CompiledAction, CompiledArgument, CompiledDocument};
