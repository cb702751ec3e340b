pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::presenter::{OutputFormat, ViewState};
pub use config::{AnySource, FileSource, HttpSource, TomlConfig};
pub use self::core::catalog::{Catalog, CatalogOrder};
pub use self::core::engine::{LoadOptions, Snapshot, TopTimesEngine};
pub use self::core::normalizer::Normalizer;
pub use domain::model::{Course, Gender, LeaderboardRow, ResultRecord, Selection};
pub use utils::error::{Result, TopTimesError};
