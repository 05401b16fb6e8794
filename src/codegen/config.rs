//! Render Profiles
//!
//! Per-language rendering configuration. Type resolution in
//! [`super::ModelEmitter`] is language-agnostic; only the scalar spellings,
//! the file layout and the package header come from the profile.

use serde::{Deserialize, Serialize};

/// Supported target languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Go,
    Rust,
}

impl Language {
    /// File extension of generated sources
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::Rust => "rs",
        }
    }

    /// Package name used when none is configured
    pub fn default_package(&self) -> &'static str {
        match self {
            Language::Go => "main",
            Language::Rust => "models",
        }
    }
}

/// Order of fields inside a generated type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FieldOrder {
    /// Order the properties appear in the schema document
    #[default]
    Declaration,
    /// Sorted by property name
    Alphabetical,
}

/// Scalar type spellings for a language
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeMappings {
    pub text: String,
    pub boolean: String,
    pub int64: String,
    pub uint64: String,
    /// Placeholder for values whose type could not be resolved
    pub any: String,
}

impl TypeMappings {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Go => Self {
                text: "string".to_string(),
                boolean: "bool".to_string(),
                int64: "int64".to_string(),
                uint64: "uint64".to_string(),
                any: "interface{}".to_string(),
            },
            Language::Rust => Self {
                text: "String".to_string(),
                boolean: "bool".to_string(),
                int64: "i64".to_string(),
                uint64: "u64".to_string(),
                any: "serde_json::Value".to_string(),
            },
        }
    }
}

/// Language-specific rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderProfile {
    pub language: Language,
    /// Package (Go) or module (Rust) the generated files belong to
    pub package_name: String,
    pub field_order: FieldOrder,
    pub types: TypeMappings,
}

impl RenderProfile {
    pub fn new(language: Language, package_name: Option<&str>) -> Self {
        let package_name = package_name
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| language.default_package())
            .to_string();
        Self {
            language,
            package_name,
            field_order: FieldOrder::default(),
            types: TypeMappings::for_language(language),
        }
    }

    pub fn go(package_name: Option<&str>) -> Self {
        Self::new(Language::Go, package_name)
    }

    pub fn rust(package_name: Option<&str>) -> Self {
        Self::new(Language::Rust, package_name)
    }

    pub fn with_field_order(mut self, field_order: FieldOrder) -> Self {
        self.field_order = field_order;
        self
    }

    /// Output file name for a model.
    ///
    /// `module` is the model's module identifier in Rust and is ignored for
    /// Go, where each file is named after its type.
    pub fn file_name(&self, model_name: &str, module: &str) -> String {
        match self.language {
            Language::Go => format!("{}.{}", model_name, self.language.extension()),
            Language::Rust => format!(
                "{}.{}",
                super::names::module_file_stem(module),
                self.language.extension()
            ),
        }
    }
}
