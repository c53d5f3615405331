use std::path::Path;
use std::process;

use metatest_catalog::{Catalog, Property};

use crate::{report_error, OutputFormat};

pub(crate) fn cmd_properties(
    types: &[String],
    catalog_path: Option<&Path>,
    output: OutputFormat,
    quiet: bool,
) {
    let loaded = match catalog_path {
        Some(path) => Catalog::from_path(path),
        None => Catalog::builtin(),
    };
    let catalog = match loaded {
        Ok(c) => c,
        Err(e) => {
            report_error(&format!("error loading catalog: {}", e), output, quiet);
            process::exit(1);
        }
    };

    for t in types {
        if !catalog.entity_types().any(|known| known == t.as_str()) {
            tracing::warn!(entity_type = %t, "entity type has no properties in the catalog");
        }
    }

    let properties = catalog.properties_for_types(types);

    match output {
        OutputFormat::Text => {
            if properties.is_empty() {
                if !quiet {
                    eprintln!("no properties are shared by: {}", types.join(", "));
                }
                return;
            }
            for property in &properties {
                print_property(&catalog, property, 0);
            }
        }
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = properties
                .iter()
                .map(|p| property_json(&catalog, p))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&entries).unwrap_or_default()
            );
        }
    }
}

fn operator_ids<'a>(catalog: &'a Catalog, property: &Property) -> Vec<&'a str> {
    catalog
        .value_type(&property.value_type)
        .map(|v| v.operators.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

fn print_property(catalog: &Catalog, property: &Property, depth: usize) {
    println!(
        "{}{}\t{}\t{}\t{}",
        "  ".repeat(depth),
        property.id,
        property.display_name,
        property.value_type,
        operator_ids(catalog, property).join(",")
    );
    for child in &property.children {
        print_property(catalog, child, depth + 1);
    }
}

fn property_json(catalog: &Catalog, property: &Property) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    obj.insert("id".to_string(), serde_json::json!(property.id));
    obj.insert(
        "display_name".to_string(),
        serde_json::json!(property.display_name),
    );
    if let Some(description) = &property.description {
        obj.insert("description".to_string(), serde_json::json!(description));
    }
    obj.insert(
        "value_type".to_string(),
        serde_json::json!(property.value_type),
    );
    obj.insert(
        "operators".to_string(),
        serde_json::json!(operator_ids(catalog, property)),
    );
    if let Some(options) = &property.value_options {
        obj.insert("value_options".to_string(), serde_json::json!(options));
    }
    if !property.children.is_empty() {
        let children: Vec<serde_json::Value> = property
            .children
            .iter()
            .map(|c| property_json(catalog, c))
            .collect();
        obj.insert("children".to_string(), serde_json::Value::Array(children));
    }
    serde_json::Value::Object(obj)
}
