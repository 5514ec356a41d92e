pub mod cli;
pub mod command;
mod error;
pub mod utils;

pub use command::RipplingOutput;
pub use error::{
    RipplingError, RipplingErrorCode, RipplingErrorMetadata, RipplingErrorSuggestion,
    RipplingResult,
};

pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
