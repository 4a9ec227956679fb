pub mod charts;
pub mod engine;
pub mod layout;
pub mod loader;
pub mod metrics;
pub mod pipeline;

pub use crate::domain::model::{RenderResult, YieldRecord, YieldTable};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
