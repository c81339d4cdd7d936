use crate::core::models::alignment::AlignmentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Taxon not found in tree: '{label}'")]
    TaxonNotFound { label: String },

    #[error("Invalid alignment: {source}")]
    Alignment {
        #[from]
        source: AlignmentError,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
