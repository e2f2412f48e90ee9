//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{ConfigOverrides, GeneratorConfig};
use crate::error::{Error, Result, ResultExt};
use crate::generator::{GenerationReport, LogGenerator};
use crate::output::CloudDestination;
use crate::schema::{activity_event_schema, validate_file, SchemaInferrer};
use crate::types::TimestampStyle;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Generate {
                count,
                output,
                upload,
                partition_by_date,
                seed,
                timestamp_style,
            } => {
                let overrides = ConfigOverrides {
                    count: *count,
                    output: output.clone(),
                    upload: upload.clone(),
                    partition_by_date: *partition_by_date,
                    seed: *seed,
                    timestamp_style: *timestamp_style,
                };
                self.generate(overrides).await
            }
            Commands::Validate {
                path,
                timestamp_style,
            } => self.validate(path, *timestamp_style),
            Commands::Schema { infer, sample } => self.schema(infer.as_deref(), *sample),
        }
    }

    /// Load configuration from `--config`, or defaults
    fn load_config(&self) -> Result<GeneratorConfig> {
        match &self.cli.config {
            Some(path) => GeneratorConfig::from_file(path),
            None => Ok(GeneratorConfig::default()),
        }
    }

    /// Generate a file and optionally upload it
    async fn generate(&self, overrides: ConfigOverrides) -> Result<()> {
        let config = self.load_config()?.with_overrides(overrides);
        config.validate()?;

        if config.timestamp_style == TimestampStyle::Utc {
            warn!(
                "Timestamps carry a trailing 'Z'; the external table schema must declare \
                 them as zoned timestamps"
            );
        }

        // Resolve the destination before writing anything
        let destination = config
            .upload
            .as_deref()
            .map(CloudDestination::parse)
            .transpose()?;

        info!(
            count = config.count,
            output = %config.output.display(),
            seeded = config.seed.is_some(),
            "Generating activity log"
        );
        let report = run_generator(&config)?;

        let uploaded = match &destination {
            Some(dest) => Some(
                dest.upload_file(&config.output, config.partition_by_date)
                    .await
                    .with_context(|| {
                        format!("Generated {} but upload failed", config.output.display())
                    })?,
            ),
            None => None,
        };

        self.output_message(&json!({
            "type": "REPORT",
            "report": {
                "records": report.records,
                "bytes": report.bytes,
                "path": config.output.display().to_string(),
                "uploaded": uploaded,
            }
        }));

        Ok(())
    }

    /// Validate a generated file
    fn validate(&self, path: &Path, style: TimestampStyle) -> Result<()> {
        let report = validate_file(path, style)?;
        let ok = report.is_ok();

        self.output_message(&json!({
            "type": "REPORT",
            "report": report,
            "status": if ok { "SUCCEEDED" } else { "FAILED" },
        }));

        if ok {
            info!(path = %path.display(), lines = report.total, "Activity file is valid");
            Ok(())
        } else {
            Err(Error::Validation {
                invalid: report.invalid,
                total: report.total,
                reason: report.failures().join("; "),
            })
        }
    }

    /// Print the strict schema or infer one from a file
    fn schema(&self, infer: Option<&Path>, sample: usize) -> Result<()> {
        let schema = match infer {
            Some(path) => {
                let records = read_sample(path, sample)?;
                info!(
                    path = %path.display(),
                    records = records.len(),
                    "Inferring schema"
                );
                SchemaInferrer::new().infer_from_records(&records)
            }
            None => activity_event_schema(self.load_config()?.timestamp_style),
        };

        self.output_message(&json!({
            "type": "SCHEMA",
            "schema": schema.to_json(),
        }));
        Ok(())
    }

    /// Output a message in the selected format
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Build the generator a config asks for and run it to the output path
fn run_generator(config: &GeneratorConfig) -> Result<GenerationReport> {
    match config.seed {
        Some(seed) => LogGenerator::seeded(seed)
            .with_timestamp_style(config.timestamp_style)
            .generate_to_path(config.count, &config.output),
        None => LogGenerator::new()
            .with_timestamp_style(config.timestamp_style)
            .generate_to_path(config.count, &config.output),
    }
}

/// Parse the first `sample` lines of an NDJSON file (0 = all)
fn read_sample(path: &Path, sample: usize) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::FileNotFound {
            path: path.display().to_string(),
        },
        _ => Error::Io(e),
    })?;

    let limit = if sample == 0 { usize::MAX } else { sample };
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(limit)
        .map(|line| serde_json::from_str(line).map_err(Error::from))
        .collect()
}
