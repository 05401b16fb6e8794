//! Error types for model generation

use std::path::PathBuf;

use thiserror::Error;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GenError>;

/// Model generation errors
#[derive(Error, Debug)]
pub enum GenError {
    #[error("invalid JSON in {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("schema document {file} is not a JSON object")]
    NotAnObject { file: String },

    #[error("no type for property '{property}' in {object}")]
    MissingType { property: String, object: String },

    #[error("referenced model not found: '{reference}' (property '{property}' of model {model})")]
    Reference {
        model: String,
        property: String,
        reference: String,
    },

    #[error("model {model} is registered but its object is missing")]
    Consistency { model: String },

    #[error("duplicate identifier '{id}': first declared in {first}, again in {second}")]
    DuplicateId {
        id: String,
        first: String,
        second: String,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("{formatter} failed: {message}")]
    Format { formatter: String, message: String },

    #[error("generated output is out of date: {}", files.join(", "))]
    Drift { files: Vec<String> },
}

impl GenError {
    /// Attach a path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error should make the run exit unsuccessfully.
    ///
    /// Bookkeeping mismatches and formatter failures are reported but the run
    /// still completes with whatever output could be produced.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Consistency { .. } | Self::Format { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(!GenError::Consistency { model: "Person".into() }.is_fatal());
        assert!(!GenError::Format {
            formatter: "gofmt".into(),
            message: "exit status 2".into(),
        }
        .is_fatal());
        assert!(GenError::MissingType {
            property: "age".into(),
            object: "Person.json".into(),
        }
        .is_fatal());
        assert!(GenError::Reference {
            model: "Person".into(),
            property: "pets".into(),
            reference: "Pet".into(),
        }
        .is_fatal());
    }

    #[test]
    fn test_messages_carry_context() {
        let err = GenError::MissingType {
            property: "age".into(),
            object: "Person.json".into(),
        };
        assert_eq!(err.to_string(), "no type for property 'age' in Person.json");

        let err = GenError::DuplicateId {
            id: "Shared".into(),
            first: "a.json".into(),
            second: "b.json".into(),
        };
        assert!(err.to_string().contains("a.json"));
        assert!(err.to_string().contains("b.json"));
    }
}
