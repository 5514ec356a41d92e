mod error;
mod fs;
mod style;
mod url;

pub mod print;
pub use error::RipplingStdError;
pub use fs::Fs;
pub use style::Style;
pub use url::hyperlink;
