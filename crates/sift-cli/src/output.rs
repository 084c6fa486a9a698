//! Shared output layer for human/JSON parity across CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: readable text for humans, stable JSON for machines.

use serde::Serialize;
use std::io::{self, Write};

/// The two output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text.
    Human,
    /// Machine-readable JSON.
    Json,
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. "E1001").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create an error with a suggestion and error code.
    pub fn with_details(
        message: impl Into<String>,
        suggestion: Option<String>,
        error_code: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            suggestion,
            error_code: Some(error_code.into()),
        }
    }
}

impl From<&sift_core::ProviderError> for CliError {
    fn from(err: &sift_core::ProviderError) -> Self {
        let code = err.error_code();
        Self::with_details(
            err.to_string(),
            code.hint().map(ToString::to_string),
            code.code(),
        )
    }
}

/// Render a serializable value to stdout in the requested format.
///
/// In JSON mode, the value is serialized with `serde_json`. In human mode,
/// the provided closure produces the text output.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Human => human_fn(value, &mut out)?,
    }
    Ok(())
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "error": error });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Human => {
            writeln!(out, "error: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::ProviderError;

    #[test]
    fn cli_error_from_provider_error_carries_code_and_hint() {
        let err = ProviderError::Config("no token".into());
        let cli_err = CliError::from(&err);
        assert!(cli_err.message.contains("no token"));
        assert_eq!(cli_err.error_code.as_deref(), Some("E1001"));
        assert!(cli_err.suggestion.is_some());
    }

    #[test]
    fn render_json_does_not_panic() {
        #[derive(Serialize)]
        struct Payload {
            count: u32,
        }
        let value = Payload { count: 3 };
        assert!(render(OutputMode::Json, &value, |_, _| Ok(())).is_ok());
    }

    #[test]
    fn render_human_calls_the_closure() {
        #[derive(Serialize)]
        struct Payload {
            count: u32,
        }
        let value = Payload { count: 3 };
        let mut called = false;
        render(OutputMode::Human, &value, |v, w| {
            called = true;
            writeln!(w, "count={}", v.count)
        })
        .expect("render");
        assert!(called);
    }

    #[test]
    fn render_error_both_modes() {
        let err = CliError::with_details("bad", Some("try again".into()), "E9001");
        assert!(render_error(OutputMode::Human, &err).is_ok());
        assert!(render_error(OutputMode::Json, &err).is_ok());
    }
}
