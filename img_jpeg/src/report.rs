//! Final run report, human or JSON.

use serde::Serialize;
use shared_utils::{FileSize, Quality};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SqueezeReport {
    pub elapsed: Duration,
    pub quality: Quality,
    pub input: PathBuf,
    pub input_size: FileSize,
    pub output: PathBuf,
    pub output_size: FileSize,
}

#[derive(Serialize)]
struct JsonReport {
    elapsed_secs: f64,
    quality: u8,
    input: String,
    input_size: u64,
    input_size_human: String,
    output: String,
    output_size: u64,
    output_size_human: String,
    compression_ratio: Option<f64>,
}

impl SqueezeReport {
    /// Report lines, starting on a fresh line after the progress dots.
    pub fn render_human(&self) -> String {
        format!(
            "\nCompleted in {:?}\nBest JPG quality: {}\n{}: {}\n{}: {}",
            self.elapsed,
            self.quality,
            self.input.display(),
            self.input_size,
            self.output.display(),
            self.output_size,
        )
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        let report = JsonReport {
            elapsed_secs: self.elapsed.as_secs_f64(),
            quality: self.quality.value(),
            input: self.input.display().to_string(),
            input_size: self.input_size.bytes(),
            input_size_human: self.input_size.display(),
            output: self.output.display().to_string(),
            output_size: self.output_size.bytes(),
            output_size_human: self.output_size.display(),
            compression_ratio: self.output_size.compression_ratio(self.input_size),
        };
        serde_json::to_string_pretty(&report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SqueezeReport {
        SqueezeReport {
            elapsed: Duration::from_millis(1500),
            quality: Quality::new(38).unwrap(),
            input: PathBuf::from("photo.png"),
            input_size: FileSize::new(3 * 1024 * 1024),
            output: PathBuf::from("photo.jpg"),
            output_size: FileSize::new(512 * 1024),
        }
    }

    #[test]
    fn test_render_human() {
        assert_eq!(
            report().render_human(),
            "\nCompleted in 1.5s\nBest JPG quality: 38\nphoto.png: 3.0MB\nphoto.jpg: 512.0KB"
        );
    }

    #[test]
    fn test_render_json() {
        let json: serde_json::Value = serde_json::from_str(&report().render_json().unwrap()).unwrap();
        assert_eq!(json["quality"], 38);
        assert_eq!(json["input"], "photo.png");
        assert_eq!(json["input_size"], 3 * 1024 * 1024);
        assert_eq!(json["output_size_human"], "512.0KB");
        assert_eq!(json["elapsed_secs"], 1.5);
        let ratio = json["compression_ratio"].as_f64().unwrap();
        assert!((ratio - 1.0 / 6.0).abs() < 1e-9);
    }
}
