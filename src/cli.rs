use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use springlayout::config::ConfigResult;
use springlayout::LayoutConfig;

/// Anchored force-directed layout for graphs.
#[derive(Parser, Debug)]
#[command(name = "springlayout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lay out a graph file (.json, .yaml, .yml)
    Layout {
        /// Input graph with `nodes` and `edges`
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        tuning: TuningArgs,
    },
    /// Lay out the bundled district sample with its preset parameters
    Sample {
        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        tuning: TuningArgs,
    },
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output file; positions go to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format; required when the output file has no .json/.yaml/.yml extension,
    /// json when writing to stdout
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

/// Simulation settings; flags override values from `--config`
#[derive(Args, Debug, Default)]
pub struct TuningArgs {
    /// Configuration file (.yaml, .yml, .json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of simulation steps
    #[arg(short = 'n', long)]
    pub iterations: Option<usize>,

    /// Edge spring coefficient
    #[arg(long)]
    pub attraction: Option<f64>,

    /// Pairwise repulsion coefficient
    #[arg(long)]
    pub repulsion: Option<f64>,

    /// Pull toward each node's starting position
    #[arg(long)]
    pub gravity: Option<f64>,

    /// Velocity decay per step, within [0, 1]
    #[arg(long)]
    pub damping: Option<f64>,

    /// Log progress every N steps (0 disables)
    #[arg(long)]
    pub progress_every: Option<usize>,
}

impl TuningArgs {
    /// Layer the config file and flag overrides on top of `base`
    ///
    /// Keys missing from the file keep their `base` value.
    pub fn resolve(&self, base: LayoutConfig) -> ConfigResult<LayoutConfig> {
        let mut config = match &self.config {
            Some(path) => LayoutConfig::from_path_over(path, base)?,
            None => base,
        };

        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(attraction) = self.attraction {
            config.params.attraction = attraction;
        }
        if let Some(repulsion) = self.repulsion {
            config.params.repulsion = repulsion;
        }
        if let Some(gravity) = self.gravity {
            config.params.gravity = gravity;
        }
        if let Some(damping) = self.damping {
            config.params.damping = damping;
        }
        if let Some(interval) = self.progress_every {
            config.progress_interval = interval;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_layout_subcommand() {
        let cli = Cli::try_parse_from([
            "springlayout",
            "layout",
            "--input",
            "graph.json",
            "--output",
            "out.yaml",
        ])
        .unwrap();
        match cli.command {
            Commands::Layout { input, output, .. } => {
                assert_eq!(input, PathBuf::from("graph.json"));
                assert_eq!(output.output, Some(PathBuf::from("out.yaml")));
                assert_eq!(output.format, None);
            }
            _ => panic!("Expected Layout command"),
        }
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "springlayout",
            "sample",
            "-n",
            "10",
            "--gravity",
            "0.5",
            "--format",
            "yaml",
        ])
        .unwrap();
        match cli.command {
            Commands::Sample { output, tuning } => {
                assert_eq!(output.format, Some(OutputFormat::Yaml));
                assert_eq!(tuning.iterations, Some(10));
                assert_eq!(tuning.gravity, Some(0.5));
                assert_eq!(tuning.attraction, None);
            }
            _ => panic!("Expected Sample command"),
        }
    }

    #[test]
    fn layout_requires_input() {
        assert!(Cli::try_parse_from(["springlayout", "layout"]).is_err());
    }

    #[test]
    fn resolve_applies_flags_over_base() {
        let tuning = TuningArgs {
            iterations: Some(7),
            damping: Some(0.5),
            ..Default::default()
        };
        let config = tuning.resolve(LayoutConfig::sample()).unwrap();

        assert_eq!(config.iterations, 7);
        assert_eq!(config.params.damping, 0.5);
        assert_eq!(config.params.gravity, 0.015);
    }

    #[test]
    fn resolve_layers_config_file_over_base() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuning.yaml");
        std::fs::write(&path, "iterations: 300\n").unwrap();

        let tuning = TuningArgs {
            config: Some(path),
            ..Default::default()
        };
        let config = tuning.resolve(LayoutConfig::sample()).unwrap();
        assert_eq!(config, LayoutConfig::sample());
    }

    #[test]
    fn resolve_flags_win_over_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuning.json");
        std::fs::write(&path, r#"{"gravity": 0.3, "iterations": 5}"#).unwrap();

        let tuning = TuningArgs {
            config: Some(path),
            gravity: Some(0.4),
            ..Default::default()
        };
        let config = tuning.resolve(LayoutConfig::sample()).unwrap();
        assert_eq!(config.iterations, 5);
        assert_eq!(config.params.gravity, 0.4);
        assert_eq!(config.params.repulsion, 0.06);
    }

    #[test]
    fn resolve_rejects_invalid_override() {
        let tuning = TuningArgs {
            damping: Some(1.5),
            ..Default::default()
        };
        assert!(tuning.resolve(LayoutConfig::default()).is_err());
    }
}
