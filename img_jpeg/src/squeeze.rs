//! One complete run: load, resize, search, write.

use crate::config::SqueezeConfig;
use crate::report::SqueezeReport;
use anyhow::{Context, Result};
use shared_utils::{
    load_image, resize, try_kary_search, write_jpeg, ProgressTicker, Quality, QualityOracle,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Search for the lowest passing quality and write the output at it.
///
/// With `progress` set, a dot is printed every second until the output has
/// been written.
pub fn squeeze(config: &SqueezeConfig, progress: bool) -> Result<SqueezeReport> {
    config.validate()?;
    let started = Instant::now();

    let (img, input_size) = load_image(&config.input)
        .with_context(|| format!("Failed to load {}", config.input.display()))?;
    let img = Arc::new(resize(img, config.resize));

    let oracle = QualityOracle::new(Arc::clone(&img), config.oracle_config())
        .context("Failed to render the reference image")?;

    let ticker = progress.then(|| ProgressTicker::start(TICK_INTERVAL));

    let concurrency = config.search_concurrency();
    let level = try_kary_search(i32::from(Quality::MAX.value()), concurrency, |level| {
        oracle.evaluate_level(level)
    })
    .context("Quality search failed")?;
    let quality = Quality::try_from(level)?;

    let output_size = write_jpeg(&config.output, &img, quality)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    if let Some(ticker) = ticker {
        ticker.stop();
    }

    let elapsed = started.elapsed();
    info!(
        quality = quality.value(),
        concurrency,
        input_size = input_size.bytes(),
        output_size = output_size.bytes(),
        elapsed_secs = elapsed.as_secs_f64(),
        "Quality search complete"
    );

    Ok(SqueezeReport {
        elapsed,
        quality,
        input: config.input.clone(),
        input_size,
        output: config.output.clone(),
        output_size,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use shared_utils::{ResizeTarget, DEFAULT_MAX_RATING};
    use std::fs;
    use std::path::Path;

    /// Scores 0.2 above `boundary` and 4.0 at or below it, reading the
    /// quality from the candidate file name.
    fn boundary_script(boundary: u8) -> String {
        format!(
            r#"q=${{2##*_butter_}}; q=${{q%%_*}}; if [ "$q" -gt {} ]; then echo 0.2; else echo 4.0; fi"#,
            boundary
        )
    }

    fn write_input(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("input.jpg");
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(64, 48, |x, y| {
            Rgb([(x * 4) as u8, (y * 5) as u8, ((x + y) * 2) as u8])
        }));
        write_jpeg(&path, &img, Quality::new(95).unwrap()).unwrap();
        path
    }

    fn config(dir: &Path, script: String) -> SqueezeConfig {
        SqueezeConfig {
            input: write_input(dir),
            output: dir.join("output.jpg"),
            max_rating: DEFAULT_MAX_RATING,
            resize: ResizeTarget::default(),
            concurrency: 4,
            comparator: "sh".to_string(),
            comparator_args: vec!["-c".to_string(), script, "sh".to_string()],
        }
    }

    #[test]
    fn test_squeeze_finds_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), boundary_script(37));

        let report = squeeze(&config, false).unwrap();
        assert_eq!(report.quality.value(), 38);
        assert_eq!(report.output_size.bytes(), fs::metadata(&config.output).unwrap().len());
        assert_eq!(report.input_size.bytes(), fs::metadata(&config.input).unwrap().len());
    }

    #[test]
    fn test_squeeze_with_resize() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), boundary_script(80));
        config.resize = ResizeTarget::new(32, 0);

        let report = squeeze(&config, false).unwrap();
        assert_eq!(report.quality.value(), 81);

        let (written, _) = load_image(&config.output).unwrap();
        assert_eq!((written.width(), written.height()), (32, 24));
    }

    #[test]
    fn test_squeeze_everything_fails_uses_max_quality() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), "echo 50.0".to_string());
        assert_eq!(squeeze(&config, false).unwrap().quality, Quality::MAX);
    }

    #[test]
    fn test_squeeze_everything_passes_uses_min_quality() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), "echo 0.0".to_string());
        assert_eq!(squeeze(&config, false).unwrap().quality, Quality::MIN);
    }

    #[test]
    fn test_comparator_failure_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), "exit 1".to_string());

        let err = squeeze(&config, false).unwrap_err();
        assert!(format!("{:#}", err).contains("Quality search failed"));
        assert!(!config.output.exists());
    }

    #[test]
    fn test_invalid_config_fails_before_work() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), "echo 0.0".to_string());
        config.max_rating = -1.0;

        assert!(squeeze(&config, false).is_err());
        assert!(!config.output.exists());
    }
}
