//! Output layer shared by every command.
//!
//! Results go to stdout, either as human text or as one pretty-printed JSON
//! document. Errors go to stderr as `error[E####]: message` followed by a
//! hint, or as an `{"error": {...}}` object in JSON mode.

use std::io::{self, Write};

use conncomp_core::ErrorCode;
use conncomp_core::emit::EmitError;
use conncomp_core::ingest::IngestError;
use serde::Serialize;

use crate::cmd::gather::GatherError;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    #[must_use]
    pub const fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Human }
    }

    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<14} {}", format!("{key}:"), value.as_ref())
}

/// Render a serializable value to stdout in the requested format.
///
/// In JSON mode the value is serialized with `serde_json`; otherwise
/// `human_fn` writes the text form.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if mode.is_json() {
        serde_json::to_writer_pretty(&mut out, value)?;
        writeln!(out)?;
    } else {
        human_fn(value, &mut out)?;
    }
    Ok(())
}

/// A failure as shown to the operator.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub error_code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl From<&anyhow::Error> for CliError {
    fn from(err: &anyhow::Error) -> Self {
        let code = classify(err);
        Self {
            error_code: code.code(),
            message: format!("{err:#}"),
            hint: code.hint(),
        }
    }
}

/// Map an error chain to its [`ErrorCode`], innermost known cause first.
#[must_use]
pub fn classify(err: &anyhow::Error) -> ErrorCode {
    for cause in err.chain() {
        if let Some(ingest) = cause.downcast_ref::<IngestError>() {
            return ingest.code();
        }
        if let Some(emit) = cause.downcast_ref::<EmitError>() {
            return emit.code();
        }
        if let Some(gather) = cause.downcast_ref::<GatherError>() {
            return gather.code();
        }
        if cause.downcast_ref::<toml::de::Error>().is_some() {
            return ErrorCode::ConfigParseError;
        }
    }
    ErrorCode::InternalUnexpected
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> io::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    if mode.is_json() {
        let wrapper = serde_json::json!({ "error": error });
        serde_json::to_writer_pretty(&mut out, &wrapper)?;
        return writeln!(out);
    }

    writeln!(out, "error[{}]: {}", error.error_code, error.message)?;
    if let Some(hint) = error.hint {
        writeln!(out, "  hint: {hint}")?;
    }
    Ok(())
}
