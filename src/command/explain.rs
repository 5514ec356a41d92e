use clap::Parser;

use crate::error::RipplingErrorCode;
use crate::{RipplingOutput, RipplingResult};

#[derive(Debug, Parser)]
pub struct Explain {
    /// The full error code. For example, E002
    #[arg(value_name = "CODE")]
    code: RipplingErrorCode,
}

impl Explain {
    pub fn run(&self) -> RipplingResult<RipplingOutput> {
        Ok(RipplingOutput::ErrorExplanation(self.code.explain()))
    }
}
