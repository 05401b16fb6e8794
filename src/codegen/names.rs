//! Identifier conversion
//!
//! Maps schema names (file names, property names, synthesized `<prop>Item`
//! hints) onto identifiers that are legal and exported in the target
//! language. The wire name is never derived from these; it is always the
//! original property key.

use std::collections::HashSet;
use std::path::Path;

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "gen", "macro", "override",
    "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Keywords that cannot be written as raw identifiers
const RUST_RESERVED: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Strip the file extension from a name hint.
///
/// `Person.json` and `Person.schema.json` both become `Person`; names
/// without an extension are returned unchanged.
pub fn strip_extension(name: &str) -> &str {
    if let Some(stem) = name.strip_suffix(".schema.json") {
        return stem;
    }
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|_| Path::new(name).extension().is_some())
        .unwrap_or(name)
}

/// Convert to PascalCase, keeping existing inner capitals (`petsItem` -> `PetsItem`)
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if !c.is_alphanumeric() {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, 'X');
    }
    result
}

/// Convert to snake_case
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_lower {
                result.push('_');
            }
            result.extend(c.to_lowercase());
            prev_lower = false;
        } else if c.is_alphanumeric() {
            result.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        } else {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            prev_lower = false;
        }
    }

    let trimmed = result.trim_end_matches('_');
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Type name for a model derived from its name hint
pub fn type_name(hint: &str) -> String {
    to_pascal_case(strip_extension(hint))
}

/// Exported field identifier (Go: leading capital)
pub fn exported_field_name(property: &str) -> String {
    let name = to_pascal_case(property);
    if name.is_empty() {
        "Field".to_string()
    } else {
        name
    }
}

/// Rust field identifier, escaped when it collides with a keyword
pub fn rust_field_name(property: &str) -> String {
    let name = to_snake_case(property);
    if name.is_empty() {
        return "field".to_string();
    }
    if RUST_RESERVED.contains(&name.as_str()) {
        format!("{}_", name)
    } else if RUST_KEYWORDS.contains(&name.as_str()) {
        format!("r#{}", name)
    } else {
        name
    }
}

/// Rust module identifier for a model.
///
/// `mod` is kept free for the generated index, so a model named `Mod` lives
/// in `mod_`. Other keywords become raw identifiers (`r#type`, file `type.rs`).
pub fn rust_module_name(model_name: &str) -> String {
    let name = to_snake_case(model_name);
    if name.is_empty() {
        return "model".to_string();
    }
    if name == "mod" || RUST_RESERVED.contains(&name.as_str()) {
        format!("{}_", name)
    } else if RUST_KEYWORDS.contains(&name.as_str()) {
        format!("r#{}", name)
    } else {
        name
    }
}

/// File stem of a module identifier (`r#type` -> `type`)
pub fn module_file_stem(module: &str) -> &str {
    module.strip_prefix("r#").unwrap_or(module)
}

/// Make identifiers unique within one type by suffixing repeats (`Name`, `Name2`)
pub fn dedupe(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .map(|name| {
            let mut candidate = name.clone();
            let mut n = 2;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{}{}", name, n);
                n += 1;
            }
            candidate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("Person.json"), "Person");
        assert_eq!(strip_extension("Person.schema.json"), "Person");
        assert_eq!(strip_extension("petsItem"), "petsItem");
    }

    #[test]
    fn test_type_name() {
        assert_eq!(type_name("Person.json"), "Person");
        assert_eq!(type_name("petsItem"), "PetsItem");
        assert_eq!(type_name("user-profile.json"), "UserProfile");
        assert_eq!(type_name("order_line"), "OrderLine");
    }

    #[test]
    fn test_exported_field_name() {
        assert_eq!(exported_field_name("name"), "Name");
        assert_eq!(exported_field_name("firstName"), "FirstName");
        assert_eq!(exported_field_name("first-name"), "FirstName");
        assert_eq!(exported_field_name("3d"), "X3d");
    }

    #[test]
    fn test_rust_field_name() {
        assert_eq!(rust_field_name("firstName"), "first_name");
        assert_eq!(rust_field_name("type"), "r#type");
        assert_eq!(rust_field_name("self"), "self_");
        assert_eq!(rust_field_name("content-type"), "content_type");
        assert_eq!(rust_field_name("age"), "age");
    }

    #[test]
    fn test_rust_module_name() {
        assert_eq!(rust_module_name("PetsItem"), "pets_item");
        assert_eq!(rust_module_name("Type"), "r#type");
        assert_eq!(rust_module_name("Mod"), "mod_");
        assert_eq!(rust_module_name("Super"), "super_");
        assert_eq!(module_file_stem("r#type"), "type");
        assert_eq!(module_file_stem("mod_"), "mod_");
    }

    #[test]
    fn test_dedupe() {
        let names = dedupe(vec!["Name".to_string(), "Name".to_string(), "Age".to_string()]);
        assert_eq!(names, vec!["Name", "Name2", "Age"]);
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("PetsItem"), "pets_item");
        assert_eq!(to_snake_case("TenantId"), "tenant_id");
        assert_eq!(to_snake_case("API"), "api");
    }
}
