//! Shared error types for the quality search and image pipeline.
//!
//! Every variant is fatal to a run; nothing here is retried.

use crate::types::QualityError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqueezeError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid quality: {0}")]
    InvalidQuality(#[from] QualityError),

    #[error("Failed to launch comparator `{program}`: {source}")]
    ComparatorSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Comparator `{program}` failed (exit code: {}): {stderr}", exit_code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    ComparatorFailed {
        program: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Comparator `{program}` produced an unparsable score: {output:?}")]
    UnparsableScore { program: String, output: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SqueezeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SqueezeError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SqueezeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparator_failed_message() {
        let err = SqueezeError::ComparatorFailed {
            program: "compare_pngs".to_string(),
            exit_code: Some(2),
            stderr: "bad header".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Comparator `compare_pngs` failed (exit code: 2): bad header"
        );

        let killed = SqueezeError::ComparatorFailed {
            program: "compare_pngs".to_string(),
            exit_code: None,
            stderr: String::new(),
        };
        assert!(killed.to_string().contains("exit code: none"));
    }

    #[test]
    fn test_io_message_names_path() {
        let err = SqueezeError::io(
            "/tmp/missing.png",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/tmp/missing.png"));
    }

    #[test]
    fn test_quality_error_converts() {
        let err: SqueezeError = crate::types::Quality::new(0).unwrap_err().into();
        assert!(matches!(err, SqueezeError::InvalidQuality(_)));
    }
}
