use clap::{CommandFactory, Parser, ValueEnum};
use img_jpeg::{squeeze, SqueezeConfig};
use shared_utils::logging::{init_logging, LogConfig};
use shared_utils::{default_concurrency, ResizeTarget, DEFAULT_COMPARATOR, DEFAULT_MAX_RATING};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "img-jpeg")]
#[command(
    version,
    about = "Find the lowest JPEG quality that stays visually indistinguishable from the source",
    long_about = None
)]
struct Cli {
    /// File to process
    #[arg(long = "if", value_name = "PATH")]
    input: PathBuf,

    /// Output file
    #[arg(long = "of", value_name = "PATH")]
    output: PathBuf,

    /// Maximum deviation detected
    #[arg(long = "max", default_value_t = DEFAULT_MAX_RATING)]
    max_rating: f64,

    /// Width to resize to. Omitting either width or height will maintain proportion
    #[arg(long, default_value_t = 0)]
    width: u32,

    /// Height to resize to. Omitting either width or height will maintain proportion
    #[arg(long, default_value_t = 0)]
    height: u32,

    /// How many cores to use
    #[arg(long, default_value_t = default_concurrency())]
    cores: usize,

    /// Perceptual comparator, called as `<comparator> [args] <reference> <candidate>`
    #[arg(long, default_value = DEFAULT_COMPARATOR)]
    comparator: String,

    /// Extra argument for the comparator, placed before the two image paths
    #[arg(long = "comparator-arg", value_name = "ARG", allow_hyphen_values = true)]
    comparator_args: Vec<String>,

    #[arg(short, long, value_enum, default_value = "human")]
    output_format: OutputFormat,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

impl From<&Cli> for SqueezeConfig {
    fn from(cli: &Cli) -> Self {
        SqueezeConfig {
            input: cli.input.clone(),
            output: cli.output.clone(),
            max_rating: cli.max_rating,
            resize: ResizeTarget::new(cli.width, cli.height),
            concurrency: cli.cores,
            comparator: cli.comparator.clone(),
            comparator_args: cli.comparator_args.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let _ = init_logging("img_jpeg", LogConfig::new().with_level(level));

    let config = SqueezeConfig::from(&cli);
    if let Err(e) = config.validate() {
        eprintln!("{}", config_error_message(&e));
        std::process::exit(1);
    }

    // dots would corrupt the JSON document on stdout
    let progress = cli.output_format == OutputFormat::Human;
    let report = squeeze(&config, progress)?;

    match cli.output_format {
        OutputFormat::Human => println!("{}", report.render_human()),
        OutputFormat::Json => println!("{}", report.render_json()?),
    }

    Ok(())
}

/// Validation failure followed by the usage line, the way clap reports
/// argument errors.
fn config_error_message(err: &impl std::fmt::Display) -> String {
    format!(
        "❌ {}\n\n{}\n\nFor more information, try '--help'.",
        err,
        Cli::command().render_usage()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["img-jpeg", "--if", "a.png", "--of", "b.jpg"]).unwrap();
        let config = SqueezeConfig::from(&cli);
        assert_eq!(config.max_rating, DEFAULT_MAX_RATING);
        assert_eq!(config.resize, ResizeTarget::default());
        assert_eq!(config.concurrency, default_concurrency());
        assert_eq!(config.comparator, DEFAULT_COMPARATOR);
        assert!(config.comparator_args.is_empty());
        assert!(cli.output_format == OutputFormat::Human);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "img-jpeg", "--if", "a.png", "--of", "b.jpg", "--max", "0.9", "--width", "640",
            "--cores", "6", "--comparator", "butteraugli", "--comparator-arg", "--pnorm",
            "--output-format", "json",
        ])
        .unwrap();
        let config = SqueezeConfig::from(&cli);
        assert_eq!(config.max_rating, 0.9);
        assert_eq!(config.resize, ResizeTarget::new(640, 0));
        assert_eq!(config.concurrency, 6);
        assert_eq!(config.comparator, "butteraugli");
        assert_eq!(config.comparator_args, vec!["--pnorm".to_string()]);
        assert!(cli.output_format == OutputFormat::Json);
    }

    #[test]
    fn test_missing_paths_rejected() {
        assert!(Cli::try_parse_from(["img-jpeg", "--if", "a.png"]).is_err());
        assert!(Cli::try_parse_from(["img-jpeg", "--of", "b.jpg"]).is_err());
    }

    #[test]
    fn test_config_error_includes_usage() {
        let cli = Cli::try_parse_from(["img-jpeg", "--if", "a.png", "--of", "a.png"]).unwrap();
        let err = SqueezeConfig::from(&cli).validate().unwrap_err();

        let message = config_error_message(&err);
        assert!(message.starts_with("❌ "));
        assert!(message.contains(&err.to_string()));
        assert!(message.contains("Usage:"));
        assert!(message.contains("--if <PATH>"));
        assert!(message.contains("--of <PATH>"));
    }
}
