use std::fmt::{self, Display};

use strum_macros::{EnumIter, EnumString};

/// `RipplingErrorCode` contains the error codes associated with specific errors.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum RipplingErrorCode {
    E001,
    E002,
    E003,
    E004,
    E005,
    E006,
    E007,
    E008,
}

impl Display for RipplingErrorCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:?}", &self)
    }
}

impl RipplingErrorCode {
    const fn explanation(&self) -> &'static str {
        match self {
            Self::E001 => include_str!("./codes/E001.md"),
            Self::E002 => include_str!("./codes/E002.md"),
            Self::E003 => include_str!("./codes/E003.md"),
            Self::E004 => include_str!("./codes/E004.md"),
            Self::E005 => include_str!("./codes/E005.md"),
            Self::E006 => include_str!("./codes/E006.md"),
            Self::E007 => include_str!("./codes/E007.md"),
            Self::E008 => include_str!("./codes/E008.md"),
        }
    }

    /// For a given error code, returns a markdown string with a given error's
    /// explanation. Explanations are in ./codes
    pub fn explain(&self) -> String {
        format!("**{}**\n\n{}", &self, self.explanation().trim_end())
    }
}
