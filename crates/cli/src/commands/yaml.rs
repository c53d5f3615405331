use std::path::Path;
use std::process;

use metatest_core::{json_to_yaml, yaml_to_json};

use crate::input::read_text;
use crate::{report_error, OutputFormat};

/// YAML to JSON, or JSON to YAML when `reverse` is set.
pub(crate) fn cmd_yaml(path: &Path, reverse: bool, output: OutputFormat, quiet: bool) {
    let text = read_text(path, output, quiet);
    let converted = if reverse {
        json_to_yaml(&text)
    } else {
        yaml_to_json(&text)
    };
    match converted {
        Ok(doc) => print!("{}", terminated(doc)),
        Err(e) => {
            let msg = format!("error converting '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

fn terminated(mut doc: String) -> String {
    if !doc.ends_with('\n') {
        doc.push('\n');
    }
    doc
}
