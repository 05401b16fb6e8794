//! JSON Schema to model generator CLI
//!
//! Usage:
//!   jsonschema2model --schemas-dir ./schemas --package-name models
//!   jsonschema2model --language rust --check

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use schema_models::{FieldOrder, GeneratorConfig, Language, ModelGenerator, ParseErrorPolicy};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jsonschema2model")]
#[command(about = "Generate typed models from a directory of JSON schemas")]
#[command(version)]
struct Cli {
    /// Directory containing json schemas
    #[arg(short, long)]
    schemas_dir: Option<PathBuf>,

    /// Package for generated sources
    #[arg(short, long)]
    package_name: Option<String>,

    /// Output directory (defaults to the package name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target language
    #[arg(short, long, value_enum)]
    language: Option<Language>,

    /// Field order inside generated types
    #[arg(long, value_enum)]
    field_order: Option<FieldOrder>,

    /// What to do with schema files that are not valid JSON
    #[arg(long, value_enum)]
    on_parse_error: Option<ParseErrorPolicy>,

    /// Do not run gofmt/rustfmt over generated sources
    #[arg(long)]
    no_format: bool,

    /// Compare with existing files instead of writing; fail if they differ
    #[arg(long)]
    check: bool,

    /// Additional config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the run completed without fatal errors
fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = GeneratorConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;

    if let Some(dir) = cli.schemas_dir {
        config.input.schemas_dir = dir;
    }
    if let Some(package_name) = cli.package_name {
        config.output.package_name = package_name;
    }
    if let Some(dir) = cli.output {
        config.output.dir = Some(dir);
    }
    if let Some(language) = cli.language {
        config.output.language = language;
    }
    if let Some(order) = cli.field_order {
        config.output.field_order = order;
    }
    if let Some(policy) = cli.on_parse_error {
        config.input.on_parse_error = policy;
    }
    if cli.no_format {
        config.output.format = false;
    }

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(true);
    }

    tracing::info!("Generating...");
    let generator = ModelGenerator::new(config);

    let summary = if cli.check {
        let summary = generator.check()?;
        for drift in &summary.drifts {
            println!("{}", drift.diff);
        }
        summary
    } else {
        generator.generate()?
    };

    for err in &summary.errors {
        if err.is_fatal() {
            eprintln!("error: {}", err);
        } else {
            eprintln!("warning: {}", err);
        }
    }

    Ok(!summary.has_fatal())
}
