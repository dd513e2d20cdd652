//! The Batch Generator: LLM-proposed quiz candidates, deduped
//! and committed per sub-category.

mod error;
mod generator;

pub use error::BatchError;
pub use generator::{BatchGenerationReport, BatchGenerator, SubCategoryBatchResult};
