//! Quality Oracle
//!
//! Turns a candidate JPEG quality into a pass/fail verdict. The source image
//! is pushed through the JPEG codec at the candidate quality, stored as PNG,
//! and handed to an external comparator together with a reference rendered at
//! quality 100. The comparator prints a single deviation score; the candidate
//! passes when that score is below `max_rating`.
//!
//! The oracle only takes `&self` and owns no mutable state, so one instance
//! serves every concurrent probe of a search.

use crate::errors::{Result, SqueezeError};
use crate::image_pipeline::{jpeg_round_trip, write_png};
use crate::logging::execute_external_command;
use crate::types::Quality;
use image::DynamicImage;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempPath;
use tracing::{debug, info};

pub const DEFAULT_COMPARATOR: &str = "compare_pngs";

pub const DEFAULT_MAX_RATING: f64 = 1.1;

/// Prefix of every intermediate PNG, followed by the quality level.
const TEMP_PREFIX: &str = "_butter_";

#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Comparator program, looked up on `PATH`
    pub comparator: String,
    /// Arguments placed before the reference and candidate paths
    pub comparator_args: Vec<String>,
    /// Scores strictly below this pass
    pub max_rating: f64,
    /// Where intermediate PNGs are written
    pub temp_dir: PathBuf,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            comparator: DEFAULT_COMPARATOR.to_string(),
            comparator_args: Vec::new(),
            max_rating: DEFAULT_MAX_RATING,
            temp_dir: std::env::temp_dir(),
        }
    }
}

impl OracleConfig {
    pub fn with_comparator(mut self, program: impl Into<String>, args: Vec<String>) -> Self {
        self.comparator = program.into();
        self.comparator_args = args;
        self
    }

    pub fn with_max_rating(mut self, max_rating: f64) -> Self {
        self.max_rating = max_rating;
        self
    }

    pub fn with_temp_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.temp_dir = dir.as_ref().to_path_buf();
        self
    }
}

pub struct QualityOracle {
    config: OracleConfig,
    image: Arc<DynamicImage>,
    /// Quality 100 rendering, removed when the oracle is dropped
    reference: TempPath,
}

impl QualityOracle {
    /// Render the reference and get ready to score candidates.
    pub fn new(image: Arc<DynamicImage>, config: OracleConfig) -> Result<Self> {
        let reference = render_png(&image, Quality::MAX, &config.temp_dir)?;
        info!(
            reference = %reference.display(),
            comparator = %config.comparator,
            max_rating = config.max_rating,
            "Reference rendering ready"
        );
        Ok(Self {
            config,
            image,
            reference,
        })
    }

    pub fn max_rating(&self) -> f64 {
        self.config.max_rating
    }

    /// Deviation score of `quality` against the reference.
    ///
    /// The intermediate PNG is removed before returning, also when the
    /// comparator failed.
    pub fn score(&self, quality: Quality) -> Result<f64> {
        let candidate = render_png(&self.image, quality, &self.config.temp_dir)?;
        let candidate_path = candidate.to_path_buf();
        let score = self.compare(&candidate_path);

        let removed = candidate
            .close()
            .map_err(|e| SqueezeError::io(&candidate_path, e));
        let score = score?;
        removed?;

        debug!(quality = quality.value(), score, "Scored candidate");
        Ok(score)
    }

    /// `true` when `quality` stays below the deviation threshold.
    pub fn evaluate(&self, quality: Quality) -> Result<bool> {
        Ok(self.score(quality)? < self.max_rating())
    }

    /// Search predicate over raw levels.
    ///
    /// Levels below [`Quality::MIN`] fail without running the comparator.
    pub fn evaluate_level(&self, level: i32) -> Result<bool> {
        if level < i32::from(Quality::MIN.value()) {
            return Ok(false);
        }
        self.evaluate(Quality::try_from(level)?)
    }

    fn compare(&self, candidate: &Path) -> Result<f64> {
        let program = &self.config.comparator;
        let args = self
            .config
            .comparator_args
            .iter()
            .map(OsStr::new)
            .chain([self.reference.as_os_str(), candidate.as_os_str()]);

        let result = execute_external_command(program, args).map_err(|source| {
            SqueezeError::ComparatorSpawn {
                program: program.clone(),
                source,
            }
        })?;

        if !result.success() {
            return Err(SqueezeError::ComparatorFailed {
                program: program.clone(),
                exit_code: result.exit_code,
                stderr: result.stderr.trim().to_string(),
            });
        }

        parse_score(&result.stdout).ok_or_else(|| SqueezeError::UnparsableScore {
            program: program.clone(),
            output: result.stdout.clone(),
        })
    }
}

/// A finite, non-negative float surrounded by optional whitespace.
fn parse_score(output: &str) -> Option<f64> {
    output
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite() && *score >= 0.0)
}

/// JPEG round trip at `quality`, stored as a uniquely named PNG in `dir`.
fn render_png(img: &DynamicImage, quality: Quality, dir: &Path) -> Result<TempPath> {
    let decoded = jpeg_round_trip(img, quality)?;

    let mut temp = tempfile::Builder::new()
        .prefix(&format!("{}{}_", TEMP_PREFIX, quality))
        .suffix(".png")
        .tempfile_in(dir)
        .map_err(|e| SqueezeError::io(dir, e))?;
    let path = temp.path().to_path_buf();
    write_png(&decoded, temp.as_file_mut(), &path)?;

    Ok(temp.into_temp_path())
}
