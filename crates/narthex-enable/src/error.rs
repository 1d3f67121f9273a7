//! Error types for the narthex-enable crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnableError {
    #[error("SPARQL error: {0}")]
    Sparql(#[from] narthex_sparql::SparqlError),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] narthex_core::NarthexError),
}

pub type Result<T> = std::result::Result<T, EnableError>;
