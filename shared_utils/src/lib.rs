//! Shared Utilities for jpeg_squeeze tools
//!
//! - K-ary threshold search over the JPEG quality range
//! - Quality oracle backed by an external perceptual comparator
//! - Image decode / resize / encode pipeline
//! - Type-safe quality and file size wrappers
//! - Logging, progress ticker, concurrency sizing

pub mod errors;
pub mod image_pipeline;
pub mod kary_search;
pub mod logging;
pub mod quality_oracle;
pub mod thread_manager;
pub mod ticker;
pub mod types;

pub use errors::{Result, SqueezeError};

pub use image_pipeline::{
    encode_jpeg, jpeg_round_trip, load_image, resize, write_jpeg, write_png, ResizeTarget,
};

pub use kary_search::{kary_search, try_kary_search, Probe, SearchInterval};

pub use quality_oracle::{OracleConfig, QualityOracle, DEFAULT_COMPARATOR, DEFAULT_MAX_RATING};

pub use thread_manager::{default_concurrency, effective_concurrency};

pub use ticker::ProgressTicker;

pub use types::{FileSize, Quality, QualityError};
