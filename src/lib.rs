pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, DashboardSettings};
pub use core::{engine::DashboardEngine, pipeline::DashboardPipeline};
pub use utils::error::{DashboardError, Result};
