//! rfmgrid: synthetic customer generation and RFM grid segmentation
//!
//! Customers are scored 1-5 on Recency, Frequency and Monetary value by
//! percentile rank within their dataset, then placed on a 5x5 grid keyed by
//! (frequency score, monetary score). The pipeline is
//! `generate -> score -> filter / bucketize`, with [`Session`] holding the
//! current outputs and the analyst's selection.

pub mod cli;
pub mod data;
pub mod error;
pub mod grid;
pub mod model;
pub mod session;
pub mod submit;
pub mod viz;

// Re-export public items for easier access
pub use cli::Args;
pub use data::{generate, generate_seeded, sample_dataset, CustomerRecord, GeneratorConfig};
pub use error::{RfmError, RfmResult};
pub use grid::{bucketize, Grid, GridCell};
pub use model::{filter, score, FilterCriteria, ScoredCustomer};
pub use session::Session;
pub use submit::{EchoBackend, SubmissionRequest, SubmissionResponse, Submitter};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
