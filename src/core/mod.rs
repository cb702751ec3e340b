pub mod catalog;
pub mod engine;
pub mod loader;
pub mod normalizer;
pub mod query;

pub use crate::domain::model::{Course, Gender, RankedEntry, ResultRecord, Selection};
pub use crate::domain::ports::DocumentSource;
pub use crate::utils::error::Result;
