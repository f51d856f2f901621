//! Crate-wide error type. Each variant names the stage that failed so the UI
//! and tests can tell configuration, validation, generator and output
//! problems apart.

use crate::catalog::CatalogError;
use crate::constants::RENDER_FAILED_MESSAGE;
use crate::generator::GeneratorError;
use crate::params::ValidationError;
use crate::render::OutputError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] CatalogError),
    #[error("invalid settings: {0}")]
    Validation(#[from] ValidationError),
    #[error("generator error: {0}")]
    Generator(#[from] GeneratorError),
    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Generator(GeneratorError::Cancelled))
    }

    /// Short stage name for the status line
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration",
            Error::Validation(_) => "Settings",
            Error::Generator(_) => "Generator",
            Error::Output(_) => "Output",
        }
    }

    /// The underlying cause without the stage prefix
    pub fn detail(&self) -> String {
        match self {
            Error::Config(e) => e.to_string(),
            Error::Validation(e) => e.to_string(),
            Error::Generator(e) => e.to_string(),
            Error::Output(e) => e.to_string(),
        }
    }

    /// Headline shown in the output area for any failed render
    pub fn user_message(&self) -> &'static str {
        RENDER_FAILED_MESSAGE
    }
}
