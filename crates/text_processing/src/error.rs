//! Error types for text processing
//!
//! Extraction itself never fails; these errors come from building
//! resolvers out of configuration.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TextProcessingError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextProcessingError {
    #[error("Alias '{alias}' points to unknown city '{target}'")]
    UnknownAliasTarget { alias: String, target: String },

    #[error("Alias must not be empty (target: {0})")]
    EmptyAlias(String),
}
