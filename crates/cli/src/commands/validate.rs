use std::path::Path;
use std::process;

use metatest_core::validate::PARSE_FAILURE_MESSAGE;
use metatest_core::{validate, TestValidationResult};
use tracing::debug;

use crate::input::read_source;
use crate::{report_error, InputFormat, OutputFormat};

static DEFINITION_SCHEMA_STR: &str = include_str!("../../../../schema/test-definition-schema.json");

pub(crate) fn cmd_validate(
    path: &Path,
    input: Option<InputFormat>,
    deep: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let json = match read_source(path, input, output, quiet).into_json() {
        Ok(json) => json,
        Err(e) => {
            debug!(error = %e, "could not convert YAML input");
            let result = TestValidationResult::invalid(PARSE_FAILURE_MESSAGE);
            report_invalid(&result, &[], output, quiet);
            process::exit(1);
        }
    };

    let result = validate(&json);
    if !result.is_valid {
        report_invalid(&result, &[], output, quiet);
        process::exit(1);
    }

    if deep {
        let errors = schema_errors(&json, output, quiet);
        if !errors.is_empty() {
            report_invalid(&result, &errors, output, quiet);
            process::exit(1);
        }
    }

    if !quiet {
        match output {
            OutputFormat::Text => println!("valid"),
            OutputFormat::Json => println!("{{\"valid\": true}}"),
        }
    }
}

/// Validate against the canonical schema. The document is known to parse.
fn schema_errors(json: &str, output: OutputFormat, quiet: bool) -> Vec<String> {
    let schema: serde_json::Value = match serde_json::from_str(DEFINITION_SCHEMA_STR) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("internal error: failed to parse embedded schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("internal error: failed to compile schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    let doc: serde_json::Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            report_error(&format!("error parsing JSON: {}", e), output, quiet);
            process::exit(1);
        }
    };

    validator
        .iter_errors(&doc)
        .map(|e| format!("{}", e))
        .collect()
}

fn report_invalid(
    result: &TestValidationResult,
    schema_errors: &[String],
    output: OutputFormat,
    quiet: bool,
) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => {
            match &result.message {
                Some(message) => eprintln!("invalid: {}", message),
                None => eprintln!("invalid: does not match the canonical schema"),
            }
            for err in schema_errors {
                eprintln!("  - {}", err);
            }
        }
        OutputFormat::Json => {
            let mut json = serde_json::json!({
                "valid": false,
                "message": result.message,
            });
            if !schema_errors.is_empty() {
                json["errors"] = serde_json::json!(schema_errors);
            }
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
    }
}
