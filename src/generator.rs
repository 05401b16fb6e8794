//! Model Generator
//!
//! Drives one generation run: load the schema directory, ingest every file
//! into a fresh [`Registry`], render all models, format them, and write them
//! out (or compare them with what is on disk).
//!
//! Ingestion is fail-fast except for parse errors under
//! [`ParseErrorPolicy::Skip`]. Rendering errors are per model: a model with an
//! unresolved reference is not written, every other model still is.

use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::checksum::Checksum;
use crate::codegen::{GeneratedUnit, ModelEmitter, RenderReport};
use crate::config::{GeneratorConfig, ParseErrorPolicy};
use crate::error::{GenError, Result};
use crate::format::{format_unit, ExternalFormatter, Passthrough, SourceFormatter};
use crate::loader::{self, SchemaFile};
use crate::output::{self, Drift};
use crate::registry::Registry;

/// What a run did
#[derive(Debug, Default)]
pub struct GenerationSummary {
    pub input_files: usize,
    /// Files left out under the skip policy
    pub skipped_files: Vec<String>,
    /// Files written, or in check mode, files that are out of date
    pub written: Vec<PathBuf>,
    /// Errors that did not stop the run
    pub errors: Vec<GenError>,
    /// Check mode: differences between disk and generated output
    pub drifts: Vec<Drift>,
    pub input_checksum: Option<Checksum>,
}

impl GenerationSummary {
    /// Whether the run should exit unsuccessfully
    pub fn has_fatal(&self) -> bool {
        self.errors.iter().any(GenError::is_fatal)
    }
}

/// Generates models from a schema directory
pub struct ModelGenerator {
    config: GeneratorConfig,
    formatter: Box<dyn SourceFormatter>,
}

impl ModelGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let formatter: Box<dyn SourceFormatter> = if config.output.format {
            Box::new(ExternalFormatter::for_language(config.output.language))
        } else {
            Box::new(Passthrough)
        };
        Self { config, formatter }
    }

    /// Replace the formatter collaborator
    pub fn with_formatter(mut self, formatter: Box<dyn SourceFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build a registry from already loaded files.
    ///
    /// Returns the registry and the names of files skipped under the skip
    /// policy.
    pub fn ingest_files(&self, files: &[SchemaFile]) -> Result<(Registry, Vec<String>)> {
        let mut registry = Registry::new();
        let mut skipped = Vec::new();

        for file in files {
            info!(file = file.name.as_str(), "processing schema");
            match registry.ingest(&file.contents, &file.name) {
                Ok(_) => {}
                Err(err @ (GenError::Parse { .. } | GenError::NotAnObject { .. }))
                    if self.config.input.on_parse_error == ParseErrorPolicy::Skip =>
                {
                    warn!(file = file.name.as_str(), "skipping schema: {}", err);
                    skipped.push(file.name.clone());
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            models = registry.model_count(),
            objects = registry.object_count(),
            "collected models"
        );
        Ok((registry, skipped))
    }

    /// Render and format every model of a registry
    pub fn render(&self, registry: &Registry) -> RenderReport {
        let emitter = ModelEmitter::new(registry, self.config.render_profile());
        let mut report = emitter.render_all();
        for unit in &mut report.units {
            if let Some(err) = format_unit(self.formatter.as_ref(), unit) {
                report.errors.push(err);
            }
        }
        report
    }

    /// Render units from in-memory files
    pub fn generate_units(&self, files: &[SchemaFile]) -> Result<(Vec<GeneratedUnit>, GenerationSummary)> {
        let (registry, skipped_files) = self.ingest_files(files)?;
        let report = self.render(&registry);

        let summary = GenerationSummary {
            input_files: files.len(),
            skipped_files,
            written: Vec::new(),
            errors: report.errors,
            drifts: Vec::new(),
            input_checksum: Some(Checksum::of_bundle(
                files.iter().map(|f| (f.name.as_str(), f.contents.as_slice())),
            )),
        };
        Ok((report.units, summary))
    }

    /// Generate and write every model
    pub fn generate(&self) -> Result<GenerationSummary> {
        let files = loader::load_directory(&self.config.input.schemas_dir)?;
        let (units, mut summary) = self.generate_units(&files)?;

        let out_dir = self.config.output_dir();
        output::ensure_dir(&out_dir)?;

        for unit in &units {
            match output::write_unit(&out_dir, unit) {
                Ok(path) => {
                    info!(model = unit.model_name.as_str(), file = %path.display(), "generated model");
                    summary.written.push(path);
                }
                Err(err) => {
                    error!(model = unit.model_name.as_str(), "{}", err);
                    summary.errors.push(err);
                }
            }
        }

        log_summary(&summary);
        Ok(summary)
    }

    /// Render every model and compare with the files on disk without writing.
    ///
    /// Out-of-date files are listed in `written` and reported as a
    /// [`GenError::Drift`] in `errors`.
    pub fn check(&self) -> Result<GenerationSummary> {
        let files = loader::load_directory(&self.config.input.schemas_dir)?;
        let (units, mut summary) = self.generate_units(&files)?;
        let out_dir = self.config.output_dir();

        for unit in &units {
            if let Some(drift) = output::check_unit(&out_dir, unit)? {
                warn!(file = %drift.path.display(), "generated output differs");
                summary.written.push(drift.path.clone());
                summary.drifts.push(drift);
            }
        }

        if !summary.written.is_empty() {
            let files = summary
                .written
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            summary.errors.push(GenError::Drift { files });
        }

        log_summary(&summary);
        Ok(summary)
    }
}

fn log_summary(summary: &GenerationSummary) {
    info!(
        inputs = summary.input_files,
        skipped = summary.skipped_files.len(),
        files = summary.written.len(),
        errors = summary.errors.len(),
        checksum = summary.input_checksum.as_ref().map(Checksum::as_str).unwrap_or(""),
        "generation finished"
    );
}
