//! Source formatting
//!
//! Generated units are drafts. They are piped through the target language's
//! canonical formatter before being written. A formatter that is missing or
//! rejects the draft never aborts the run: the unformatted text is kept so
//! there is still something to inspect.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::warn;

use crate::codegen::{GeneratedUnit, Language};
use crate::error::{GenError, Result};

/// Canonical source formatter
pub trait SourceFormatter {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    fn format(&self, source: &str) -> Result<String>;
}

/// Formatter run as a child process reading stdin and writing stdout
#[derive(Debug, Clone)]
pub struct ExternalFormatter {
    program: String,
    args: Vec<String>,
}

impl ExternalFormatter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `gofmt` for Go, `rustfmt` for Rust
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Go => Self::new("gofmt", Vec::new()),
            Language::Rust => Self::new(
                "rustfmt",
                vec!["--edition".to_string(), "2021".to_string()],
            ),
        }
    }
}

impl SourceFormatter for ExternalFormatter {
    fn name(&self) -> &str {
        &self.program
    }

    fn format(&self, source: &str) -> Result<String> {
        let failed = |message: String| GenError::Format {
            formatter: self.program.clone(),
            message,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| failed(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .map_err(|e| failed(e.to_string()))?;
        }

        let output = child.wait_with_output().map_err(|e| failed(e.to_string()))?;
        if !output.status.success() {
            return Err(failed(String::from_utf8_lossy(&output.stderr).trim().to_string()));
        }
        String::from_utf8(output.stdout).map_err(|e| failed(e.to_string()))
    }
}

/// Leaves sources untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl SourceFormatter for Passthrough {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn format(&self, source: &str) -> Result<String> {
        Ok(source.to_string())
    }
}

/// Format a unit in place, keeping the draft if the formatter fails.
///
/// Returns the formatter error so the caller can report it.
pub fn format_unit(formatter: &dyn SourceFormatter, unit: &mut GeneratedUnit) -> Option<GenError> {
    match formatter.format(&unit.source) {
        Ok(formatted) => {
            unit.source = formatted;
            None
        }
        Err(err) => {
            warn!(
                model = unit.model_name.as_str(),
                formatter = formatter.name(),
                "internal error: invalid source generated, keeping unformatted output: {}",
                err
            );
            Some(err)
        }
    }
}
