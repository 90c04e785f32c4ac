//! Run configuration, built once from the command line and never modified.

use shared_utils::{effective_concurrency, OracleConfig, ResizeTarget, SqueezeError};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SqueezeConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Deviation scores strictly below this pass
    pub max_rating: f64,
    pub resize: ResizeTarget,
    /// Probes per search level
    pub concurrency: usize,
    pub comparator: String,
    pub comparator_args: Vec<String>,
}

impl SqueezeConfig {
    /// Reject settings that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<(), SqueezeError> {
        if self.input.as_os_str().is_empty() || self.output.as_os_str().is_empty() {
            return Err(SqueezeError::InvalidConfig(
                "both an input and an output path are required".to_string(),
            ));
        }
        if self.input == self.output {
            return Err(SqueezeError::InvalidConfig(format!(
                "output would overwrite the input: {}",
                self.input.display()
            )));
        }
        if !self.max_rating.is_finite() || self.max_rating <= 0.0 {
            return Err(SqueezeError::InvalidConfig(format!(
                "maximum deviation must be a positive number, got {}",
                self.max_rating
            )));
        }
        if self.comparator.trim().is_empty() {
            return Err(SqueezeError::InvalidConfig(
                "comparator program must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Concurrency factor handed to the search, clamped to at least 2.
    pub fn search_concurrency(&self) -> usize {
        effective_concurrency(self.concurrency)
    }

    pub fn oracle_config(&self) -> OracleConfig {
        OracleConfig::default()
            .with_comparator(self.comparator.clone(), self.comparator_args.clone())
            .with_max_rating(self.max_rating)
    }
}
