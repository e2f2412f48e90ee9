//! CLI commands and argument parsing

use crate::types::TimestampStyle;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Synthetic user-activity log generator
#[derive(Parser, Debug)]
#[command(name = "activity-elt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for result messages
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an activity log file
    Generate {
        /// Number of events (default 1000)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Upload destination (local dir or cloud URL)
        /// Supports: /path, s3://bucket/path, r2://bucket/path, gs://bucket/path, az://container/path
        #[arg(short, long)]
        upload: Option<String>,

        /// Upload under dt=YYYY-MM-DD/
        #[arg(long)]
        partition_by_date: bool,

        /// Seed the random source for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Timestamp rendering
        #[arg(long)]
        timestamp_style: Option<TimestampStyle>,
    },

    /// Validate an activity log file
    Validate {
        /// File to check
        path: PathBuf,

        /// Timestamp rendering the file was generated with
        #[arg(long, default_value = "naive")]
        timestamp_style: TimestampStyle,
    },

    /// Print the event schema
    Schema {
        /// Infer the schema from this file instead
        #[arg(long)]
        infer: Option<PathBuf>,

        /// Lines to sample when inferring (0 = all)
        #[arg(long, default_value = "100")]
        sample: usize,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "activity-elt",
            "generate",
            "-n",
            "50",
            "--seed",
            "7",
            "--timestamp-style",
            "utc",
            "--upload",
            "s3://bucket/raw/",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate {
                count,
                seed,
                timestamp_style,
                upload,
                partition_by_date,
                ..
            } => {
                assert_eq!(count, Some(50));
                assert_eq!(seed, Some(7));
                assert_eq!(timestamp_style, Some(TimestampStyle::Utc));
                assert_eq!(upload.as_deref(), Some("s3://bucket/raw/"));
                assert!(!partition_by_date);
            }
            other => panic!("Expected generate, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_count_rejected() {
        assert!(Cli::try_parse_from(["activity-elt", "generate", "-n", "-3"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["activity-elt", "validate", "logs.json", "-f", "pretty", "-v"])
                .unwrap();
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(cli.verbose);
    }

    #[test]
    fn test_schema_defaults() {
        let cli = Cli::try_parse_from(["activity-elt", "schema"]).unwrap();
        match cli.command {
            Commands::Schema { infer, sample } => {
                assert!(infer.is_none());
                assert_eq!(sample, 100);
            }
            other => panic!("Expected schema, got {other:?}"),
        }
    }
}
