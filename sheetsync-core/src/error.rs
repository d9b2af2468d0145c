//! Error types for sheet reconciliation.

use thiserror::Error;

use crate::store::StoreError;

/// Errors raised while reconciling local payloads with remote rows.
#[derive(Error, Debug)]
pub enum SheetError {
    /// No remote row exists for the given key (or the row is unbound).
    #[error("No remote row for key '{0}'")]
    NotFound(String),

    /// More than one remote row shares the key. Run deduplication first.
    #[error("{count} remote rows share key '{key}'; deduplicate before syncing")]
    DuplicateEntries { key: String, count: usize },

    /// `create` was asked to insert a row that is already bound remotely.
    #[error("Remote row for key '{0}' already exists")]
    AlreadyExists(String),

    /// The converted payload has no value for the primary key column.
    #[error("Converted data has no value for primary key column '{0}'")]
    MissingPrimaryKey(String),

    /// The payload could not be converted.
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// The payload type does not support writing remote data back.
    #[error("Writing remote data back to this payload is not supported")]
    ConvertBackUnsupported,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, SheetError>;

impl SheetError {
    /// True when the error only signals a missing remote row.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SheetError::NotFound(_))
    }

    /// True when the remote sheet needs deduplication.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, SheetError::DuplicateEntries { .. })
    }
}
