pub mod config;
pub mod report;
pub mod squeeze;

pub use config::SqueezeConfig;
pub use report::SqueezeReport;
pub use squeeze::squeeze;

pub use shared_utils::errors::{Result, SqueezeError};
