//! Domain errors for generation, scoring and selection.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RfmError {
    #[error("Record count must be at least 1, got {0}")]
    InvalidCount(usize),

    #[error("Invalid generator config '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Cannot score an empty dataset")]
    EmptyDataset,

    #[error("Customer '{id}' is not in the current filtered set")]
    UnknownCustomer { id: String },

    #[error("Invalid grid cell '{key}': expected \"x-y\" with x, y in 1..=5")]
    InvalidCell { key: String },

    #[error("No customers selected")]
    EmptySelection,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type RfmResult<T> = std::result::Result<T, RfmError>;
