//! Reading definition documents from files or stdin.

use std::io::Read;
use std::path::Path;
use std::process;

use metatest_core::{yaml_to_json, DefinitionError};
use tracing::debug;

use crate::{report_error, InputFormat, OutputFormat};

/// Raw document text tagged with its format.
pub(crate) enum Source {
    Json(String),
    Yaml(String),
}

impl Source {
    /// The document as JSON text, converting YAML first.
    pub(crate) fn into_json(self) -> Result<String, DefinitionError> {
        match self {
            Source::Json(text) => Ok(text),
            Source::Yaml(text) => yaml_to_json(&text),
        }
    }
}

/// Read `path` (or stdin for `-`), exiting on I/O failure.
pub(crate) fn read_text(path: &Path, output: OutputFormat, quiet: bool) -> String {
    let result = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        std::fs::read_to_string(path)
    };
    match result {
        Ok(text) => text,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

/// Read a document, choosing its format from `--input` or the extension.
pub(crate) fn read_source(
    path: &Path,
    input: Option<InputFormat>,
    output: OutputFormat,
    quiet: bool,
) -> Source {
    let format = input.unwrap_or_else(|| infer_format(path));
    debug!(path = %path.display(), ?format, "reading definition");
    let text = read_text(path, output, quiet);
    match format {
        InputFormat::Json => Source::Json(text),
        InputFormat::Yaml => Source::Yaml(text),
    }
}

/// Like [`read_source`], but exits if YAML conversion fails.
pub(crate) fn read_json(
    path: &Path,
    input: Option<InputFormat>,
    output: OutputFormat,
    quiet: bool,
) -> String {
    match read_source(path, input, output, quiet).into_json() {
        Ok(json) => json,
        Err(e) => {
            let msg = format!("error parsing YAML in '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

fn infer_format(path: &Path) -> InputFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => InputFormat::Yaml,
        _ => InputFormat::Json,
    }
}
