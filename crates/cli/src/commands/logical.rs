//! Conversions between stored predicates and the builder's logical form.

use std::path::Path;
use std::process;

use metatest_core::{deserialize, to_logical, to_test, LogicalOperand, TestPredicate};

use crate::input::read_json;
use crate::{report_error, Block, InputFormat, OutputFormat};

pub(crate) fn cmd_logical(
    path: &Path,
    input: Option<InputFormat>,
    block: Block,
    output: OutputFormat,
    quiet: bool,
) {
    let json = read_json(path, input, output, quiet);
    let definition = deserialize(&json);

    let predicate = match block {
        Block::Rules => definition.rules,
        Block::Conditions => definition.on.conditions.unwrap_or_default(),
    };
    let operand = to_logical(&predicate);

    match output {
        OutputFormat::Text => {
            let mut lines = Vec::new();
            render_tree(&operand, 0, &mut lines);
            println!("{}", lines.join("\n"));
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&operand.to_value()).unwrap_or_default()
            );
        }
    }
}

pub(crate) fn cmd_compose(
    path: &Path,
    input: Option<InputFormat>,
    output: OutputFormat,
    quiet: bool,
) {
    let json = read_json(path, input, output, quiet);
    let value: serde_json::Value = match serde_json::from_str(&json) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    let operand = match LogicalOperand::from_value(&value) {
        Ok(o) => o,
        Err(e) => {
            let msg = format!("invalid builder predicate in '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let stored: TestPredicate = to_test(&operand);
    println!("{}", stored.to_value());
}

/// One line per node, children indented under their operator.
fn render_tree(operand: &LogicalOperand, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    match operand {
        LogicalOperand::Logical(node) => {
            lines.push(format!("{}{}", indent, node.operator.display_name()));
            for child in &node.operands {
                render_tree(child, depth + 1, lines);
            }
        }
        LogicalOperand::Property(p) => {
            let mut line = format!("{}{}", indent, p.property);
            match &p.operator {
                Some(op) => {
                    line.push(' ');
                    line.push_str(op);
                }
                None => line.push_str(" (draft)"),
            }
            if let Some(values) = &p.values {
                line.push_str(&format!(" [{}]", values.join(", ")));
            }
            lines.push(line);
        }
        LogicalOperand::Unparseable(raw) => {
            lines.push(format!("{}? {}", indent, raw));
        }
    }
}
