mod metadata;

pub use metadata::{RipplingErrorCode, RipplingErrorMetadata, RipplingErrorSuggestion};

pub type RipplingResult<T> = std::result::Result<T, RipplingError>;

use calm_io::stderr;
use rippling_std::Style;

use std::borrow::BorrowMut;
use std::fmt::{self, Debug, Display};
use std::io;

/// A specialized `Error` type for the CLI that wraps `anyhow`
/// and provides some extra `Metadata` for end users depending
/// on the specific error they encountered.
#[derive(Debug)]
pub struct RipplingError {
    error: anyhow::Error,
    metadata: RipplingErrorMetadata,
}

impl RipplingError {
    pub fn new<E>(error: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        let mut error = error.into();
        let metadata = RipplingErrorMetadata::from(error.borrow_mut());

        Self { error, metadata }
    }

    pub fn set_suggestion(&mut self, suggestion: RipplingErrorSuggestion) {
        self.metadata.suggestion = Some(suggestion);
    }

    pub fn suggestion(&self) -> Option<RipplingErrorSuggestion> {
        self.metadata.suggestion.clone()
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub const fn code(&self) -> Option<RipplingErrorCode> {
        self.metadata.code
    }

    pub fn print(&self) -> io::Result<()> {
        stderr!("{}", self)?;
        Ok(())
    }
}

impl Display for RipplingError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let error_descriptor_message = if let Some(code) = &self.metadata.code {
            format!("error[{}]:", code)
        } else {
            "error:".to_string()
        };
        let error_descriptor = Style::ErrorPrefix.paint(&error_descriptor_message);

        // one line: prefix, message, then the suggestion if there is one
        write!(formatter, "{} {}", error_descriptor, &self.error)?;
        if let Some(suggestion) = &self.metadata.suggestion {
            write!(formatter, " {}", suggestion)?;
        }
        writeln!(formatter)
    }
}

impl<E: Into<anyhow::Error>> From<E> for RipplingError {
    fn from(error: E) -> Self {
        Self::new(error)
    }
}
