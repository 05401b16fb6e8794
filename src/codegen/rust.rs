//! Rust Code Emitter
//!
//! Prints a [`ResolvedModel`] as a Rust module with one serde struct. Models
//! live in sibling modules re-exported by a generated `mod.rs`, so each file
//! imports the types it references from `super`.
//!
//! Integers carried as JSON strings use `serde_with::DisplayFromStr`, so the
//! consuming crate needs `serde`, `serde_json` and `serde_with`.

use std::collections::BTreeSet;

use super::names;
use super::{FieldDecl, FieldType, GeneratedUnit, IntegerWidth, RenderProfile, ResolvedModel};

/// Emit the Rust source for one model
pub fn emit_model(model: &ResolvedModel, profile: &RenderProfile) -> String {
    let mut output = String::new();

    output.push_str("//! THIS IS A GENERATED FILE. DO NOT EDIT\n");
    output.push_str(&format!("//! Module {}\n", profile.package_name));
    output.push('\n');
    output.push_str("use serde::{Deserialize, Serialize};\n");

    let imports: BTreeSet<&str> = model
        .fields
        .iter()
        .filter_map(|f| named_type(&f.field_type))
        .filter(|name| *name != model.name)
        .collect();
    if !imports.is_empty() {
        let list: Vec<&str> = imports.into_iter().collect();
        output.push_str(&format!("\nuse super::{{{}}};\n", list.join(", ")));
    }
    output.push('\n');

    output.push_str(&format!("/// {} model structure\n", model.name));
    if model.fields.iter().any(|f| f.string_encoded) {
        output.push_str("#[serde_with::serde_as]\n");
    }
    output.push_str("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
    output.push_str(&format!("pub struct {} {{\n", model.name));

    let field_names = names::dedupe(model.fields.iter().map(|f| names::rust_field_name(&f.wire_name)));
    for (field, name) in model.fields.iter().zip(field_names) {
        emit_field(&mut output, &name, field, profile);
    }

    output.push_str("}\n");
    output
}

fn emit_field(output: &mut String, name: &str, field: &FieldDecl, profile: &RenderProfile) {
    let mut serde_args = Vec::new();
    if name.trim_start_matches("r#") != field.wire_name {
        serde_args.push(format!("rename = {:?}", field.wire_name));
    }
    if field.indirect {
        serde_args.push("default".to_string());
        serde_args.push("skip_serializing_if = \"Option::is_none\"".to_string());
    }
    if !serde_args.is_empty() {
        output.push_str(&format!("    #[serde({})]\n", serde_args.join(", ")));
    }
    if field.string_encoded {
        output.push_str("    #[serde_as(as = \"serde_with::DisplayFromStr\")]\n");
    }

    let rust_type = rust_type(&field.field_type, profile);
    let full_type = if field.indirect {
        format!("Option<Box<{}>>", rust_type)
    } else {
        rust_type
    };
    output.push_str(&format!("    pub {}: {},\n", name, full_type));
}

/// Rust spelling of a resolved field type
pub fn rust_type(field_type: &FieldType, profile: &RenderProfile) -> String {
    let types = &profile.types;
    match field_type {
        FieldType::Text => types.text.clone(),
        FieldType::Integer(IntegerWidth::Int64) => types.int64.clone(),
        FieldType::Integer(IntegerWidth::Uint64) => types.uint64.clone(),
        FieldType::Boolean => types.boolean.clone(),
        FieldType::Sequence(inner) => format!("Vec<{}>", rust_type(inner, profile)),
        FieldType::Named(name) => name.clone(),
        FieldType::Unresolved => types.any.clone(),
    }
}

fn named_type(field_type: &FieldType) -> Option<&str> {
    match field_type {
        FieldType::Named(name) => Some(name.as_str()),
        FieldType::Sequence(inner) => named_type(inner),
        _ => None,
    }
}

/// Emit the `mod.rs` that declares and re-exports every generated model.
///
/// `entries` pairs each model's module identifier with its type name.
pub fn emit_module_index(entries: &[(&str, &str)], profile: &RenderProfile) -> GeneratedUnit {
    let mut output = String::new();
    output.push_str("//! THIS IS A GENERATED FILE. DO NOT EDIT\n");
    output.push_str(&format!("//! Module {}\n", profile.package_name));
    output.push('\n');
    for (module, _) in entries {
        output.push_str(&format!("mod {};\n", module));
    }
    output.push('\n');
    for (module, name) in entries {
        output.push_str(&format!("pub use {}::{};\n", module, name));
    }
    GeneratedUnit {
        model_name: "mod".to_string(),
        file_name: "mod.rs".to_string(),
        source: output,
    }
}
