use clap::Parser;
use std::path::PathBuf;

/// Terminal tour of optimistic updates, tabbed demo viewers and error boundaries
#[derive(Parser, Debug)]
#[command(name = "featuretour", version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Starting theme (dark or light)
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Seed for reproducible simulated failures
    #[arg(long)]
    pub seed: Option<u64>,

    /// Failure probability applied to every simulated request
    #[arg(long, value_name = "RATE")]
    pub failure_rate: Option<f64>,

    /// Latency applied to every simulated request, in milliseconds
    #[arg(long, value_name = "MS")]
    pub latency_ms: Option<u64>,

    /// Write logs here instead of the cache directory
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["featuretour"]).expect("parse");
        assert!(cli.config.is_none());
        assert!(cli.seed.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "featuretour",
            "--theme",
            "light",
            "--seed",
            "42",
            "--failure-rate",
            "0.5",
            "--latency-ms",
            "200",
            "-v",
        ])
        .expect("parse");
        assert_eq!(cli.theme.as_deref(), Some("light"));
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.failure_rate, Some(0.5));
        assert_eq!(cli.latency_ms, Some(200));
        assert!(cli.verbose);
    }

    #[test]
    fn test_rejects_non_numeric_seed() {
        assert!(Cli::try_parse_from(["featuretour", "--seed", "abc"]).is_err());
    }
}
