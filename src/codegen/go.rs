//! Go Code Emitter
//!
//! Prints a [`ResolvedModel`] as a Go source file: a package clause and one
//! struct with `encoding/json` tags. The text is a draft for `gofmt`; field
//! columns are not aligned here.

use super::names;
use super::{FieldDecl, FieldType, IntegerWidth, RenderProfile, ResolvedModel};

/// Emit the Go source for one model
pub fn emit_model(model: &ResolvedModel, profile: &RenderProfile) -> String {
    let mut output = String::new();

    output.push_str("// THIS IS A GENERATED FILE. DO NOT EDIT\n");
    output.push_str(&format!("// Package {}\n", profile.package_name));
    output.push_str(&format!("package {}\n", profile.package_name));
    output.push('\n');

    output.push_str(&format!("// {} model structure\n", model.name));
    output.push_str(&format!("type {} struct {{\n", model.name));

    let field_names =
        names::dedupe(model.fields.iter().map(|f| names::exported_field_name(&f.wire_name)));
    for (field, name) in model.fields.iter().zip(field_names) {
        emit_field(&mut output, &name, field, profile);
    }

    output.push_str("}\n");
    output
}

fn emit_field(output: &mut String, name: &str, field: &FieldDecl, profile: &RenderProfile) {
    let mut tag = field.wire_name.clone();
    if field.string_encoded {
        tag.push_str(",string");
    }
    let mut field_type = go_type(&field.field_type, profile);
    if field.indirect {
        field_type.insert(0, '*');
    }
    output.push_str(&format!("\t{} {} `json:\"{}\"`\n", name, field_type, escape_tag(&tag)));
}

/// Go spelling of a resolved field type
pub fn go_type(field_type: &FieldType, profile: &RenderProfile) -> String {
    let types = &profile.types;
    match field_type {
        FieldType::Text => types.text.clone(),
        FieldType::Integer(IntegerWidth::Int64) => types.int64.clone(),
        FieldType::Integer(IntegerWidth::Uint64) => types.uint64.clone(),
        FieldType::Boolean => types.boolean.clone(),
        FieldType::Sequence(inner) => format!("[]{}", go_type(inner, profile)),
        FieldType::Named(name) => name.clone(),
        FieldType::Unresolved => types.any.clone(),
    }
}

/// Struct tags are raw strings; a backquote or quote would end them early
fn escape_tag(tag: &str) -> String {
    tag.replace('`', "").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(wire: &str, field_type: FieldType) -> FieldDecl {
        FieldDecl {
            wire_name: wire.to_string(),
            field_type,
            string_encoded: false,
            indirect: false,
        }
    }

    fn person() -> ResolvedModel {
        let mut age = field("age", FieldType::Integer(IntegerWidth::Int64));
        age.string_encoded = true;
        ResolvedModel {
            name: "Person".to_string(),
            origin: "Person.json".to_string(),
            fields: vec![
                field("name", FieldType::Text),
                age,
                field("pets", FieldType::Sequence(Box::new(FieldType::Named("PetsItem".into())))),
                field("active", FieldType::Boolean),
            ],
        }
    }

    #[test]
    fn test_emit_person() {
        let source = emit_model(&person(), &RenderProfile::go(Some("models")));

        assert!(source.starts_with("// THIS IS A GENERATED FILE. DO NOT EDIT\n"));
        assert!(source.contains("package models\n"));
        assert!(source.contains("type Person struct {\n"));
        assert!(source.contains("\tName string `json:\"name\"`\n"));
        assert!(source.contains("\tAge int64 `json:\"age,string\"`\n"));
        assert!(source.contains("\tPets []PetsItem `json:\"pets\"`\n"));
        assert!(source.contains("\tActive bool `json:\"active\"`\n"));
    }

    #[test]
    fn test_unresolved_and_indirect_types() {
        let mut next = field("next", FieldType::Named("Node".into()));
        next.indirect = true;
        let model = ResolvedModel {
            name: "Node".to_string(),
            origin: "Node.json".to_string(),
            fields: vec![
                next,
                field("extra", FieldType::Unresolved),
                field("tags", FieldType::Sequence(Box::new(FieldType::Unresolved))),
            ],
        };
        let source = emit_model(&model, &RenderProfile::go(None));
        assert!(source.contains("package main\n"));
        assert!(source.contains("\tNext *Node `json:\"next\"`\n"));
        assert!(source.contains("\tExtra interface{} `json:\"extra\"`\n"));
        assert!(source.contains("\tTags []interface{} `json:\"tags\"`\n"));
    }

    #[test]
    fn test_colliding_field_names_are_suffixed() {
        let model = ResolvedModel {
            name: "User".to_string(),
            origin: "User.json".to_string(),
            fields: vec![field("first-name", FieldType::Text), field("firstName", FieldType::Text)],
        };
        let source = emit_model(&model, &RenderProfile::go(None));
        assert!(source.contains("\tFirstName string `json:\"first-name\"`\n"));
        assert!(source.contains("\tFirstName2 string `json:\"firstName\"`\n"));
    }
}
