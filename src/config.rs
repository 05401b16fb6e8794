//! Configuration management for the model generator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schemas.toml)
//! - Environment variables (JSONSCHEMA2MODEL_*)
//!
//! Command line flags are applied on top by the binary.
//!
//! ## Example config file (schemas.toml):
//! ```toml
//! [input]
//! schemas_dir = "./schemas"
//! on_parse_error = "skip"
//!
//! [output]
//! package_name = "models"
//! language = "go"
//! format = true
//! field_order = "declaration"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::codegen::{FieldOrder, Language, RenderProfile};

/// What to do with a schema file that is not valid JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    /// Abort the run before anything is written
    #[default]
    Fail,
    /// Log a warning and leave the file out
    Skip,
}

/// Main configuration for one generation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Schema input settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory containing json schemas
    #[serde(default = "default_schemas_dir")]
    pub schemas_dir: PathBuf,

    #[serde(default)]
    pub on_parse_error: ParseErrorPolicy,
}

/// Generated source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Package for generated sources; also the output directory unless `dir` is set
    #[serde(default)]
    pub package_name: String,

    #[serde(default)]
    pub dir: Option<PathBuf>,

    #[serde(default)]
    pub language: Language,

    /// Run the language's formatter over generated sources
    #[serde(default = "default_true")]
    pub format: bool,

    #[serde(default)]
    pub field_order: FieldOrder,
}

fn default_schemas_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            schemas_dir: default_schemas_dir(),
            on_parse_error: ParseErrorPolicy::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            package_name: String::new(),
            dir: None,
            language: Language::default(),
            format: true,
            field_order: FieldOrder::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        for location in ["schemas.toml", ".schemas.toml"] {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(dirs) = directories::ProjectDirs::from("", "", "jsonschema2model") {
            let xdg_config = dirs.config_dir().join("schemas.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("JSONSCHEMA2MODEL")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Directory generated files are written to
    pub fn output_dir(&self) -> PathBuf {
        match &self.output.dir {
            Some(dir) => dir.clone(),
            None if !self.output.package_name.is_empty() => PathBuf::from(&self.output.package_name),
            None => PathBuf::from("."),
        }
    }

    /// Render profile for the configured language
    pub fn render_profile(&self) -> RenderProfile {
        RenderProfile::new(self.output.language, Some(&self.output.package_name))
            .with_field_order(self.output.field_order)
    }
}
