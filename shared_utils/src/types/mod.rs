//! Type-Safe Wrappers Module
//!
//! - `quality`: JPEG quality level, validated to `[1, 100]`
//! - `file_size`: byte counts with report formatting

pub mod file_size;
pub mod quality;

pub use file_size::FileSize;
pub use quality::{Quality, QualityError};

// ============================================================================
// Property-Based Tests
// ============================================================================
