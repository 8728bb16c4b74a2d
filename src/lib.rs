pub mod adapters;
pub mod badge;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::yurplan::YurplanClient;
pub use config::{cli::LocalStorage, toml_config::BadgerConfig};
pub use core::{
    engine::BadgeEngine,
    pipeline::{BadgePipeline, BadgeRules},
};
pub use domain::model::{BadgeRecord, BadgeType};
pub use utils::error::{BadgerError, Result};
