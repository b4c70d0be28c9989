//! Core error types.

use thiserror::Error;

/// Metamodel errors.
#[derive(Debug, Error)]
pub enum Error {
    /// No model has been installed in the provider yet.
    #[error("no model installed")]
    NoModel,

    /// Entity name not present in the model.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// Table name not mapped by any entity.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// Property name not present in the entity.
    #[error("unknown property: {entity}.{property}")]
    UnknownProperty {
        /// Entity that was searched.
        entity: String,
        /// Property name that was requested.
        property: String,
    },

    /// Column name not mapped by any property of the entity.
    #[error("unknown column: {entity}.{column}")]
    UnknownColumn {
        /// Entity that was searched.
        entity: String,
        /// Column name that was requested.
        column: String,
    },

    /// Two definitions claim the same name.
    #[error("duplicate definition: {0}")]
    Duplicate(String),

    /// Malformed or inconsistent dictionary input.
    #[error("dictionary error: {0}")]
    Dictionary(String),

    /// Dictionary document could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
