pub mod adapters;
pub mod config;
pub mod core;
pub mod document;
pub mod domain;
pub mod schema;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LocalStorage;
pub use config::{SiteConfig, SiteProfile};
pub use core::{etl::EtlEngine, pipeline::SitePipeline};
pub use document::Document;
pub use utils::error::{Result, SchemaError};
