//! Schema object graph types
//!
//! An [`Object`] is one schema node (a whole file, a nested `object`, or an
//! array's `items`). Objects point at each other through reference ids held
//! by their [`Property`] entries, never by ownership, so cyclic schemas are
//! represented without recursion.

use indexmap::IndexMap;

/// Declared JSON type of a property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    String,
    Array,
    Object,
    Boolean,
    /// Any other primitive (`integer`, `number`, `null`, ...), kept verbatim
    Other(String),
}

impl PropertyKind {
    /// Classify a declared `type` value
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "string" => Self::String,
            "array" => Self::Array,
            "object" => Self::Object,
            "boolean" => Self::Boolean,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
            Self::Boolean => "boolean",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One property entry of an object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub kind: PropertyKind,
    /// `format` refinement, only captured for strings
    pub format: Option<String>,
    /// Reference id of the object describing this value's shape
    pub referenced_object: Option<String>,
}

impl Property {
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            format: None,
            referenced_object: None,
        }
    }

    pub fn string(format: Option<String>) -> Self {
        Self {
            kind: PropertyKind::String,
            format,
            referenced_object: None,
        }
    }

    pub fn referencing(kind: PropertyKind, reference: Option<String>) -> Self {
        Self {
            kind,
            format: None,
            referenced_object: reference,
        }
    }
}

/// A schema object registered during ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    /// Identity other schemas use to point at this object
    pub reference_id: String,
    /// Type name to emit; `None` only for objects that never received a name hint
    pub generated_name: Option<String>,
    /// Schema file this object was read from
    pub origin: String,
    /// Properties in declaration order
    pub properties: IndexMap<String, Property>,
}

impl Object {
    pub fn new(reference_id: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            reference_id: reference_id.into(),
            generated_name: None,
            origin: origin.into(),
            properties: IndexMap::new(),
        }
    }

    /// Name of the type this object generates, if it is a model
    pub fn model_name(&self) -> Option<&str> {
        self.generated_name.as_deref().filter(|name| !name.is_empty())
    }
}

/// Handle returned by ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub reference_id: String,
    /// `true` when the schema was only a `$ref` pointer
    pub stub: bool,
}

impl ObjectRef {
    pub fn registered(reference_id: impl Into<String>) -> Self {
        Self {
            reference_id: reference_id.into(),
            stub: false,
        }
    }

    pub fn stub(reference_id: impl Into<String>) -> Self {
        Self {
            reference_id: reference_id.into(),
            stub: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(PropertyKind::from_type_name("string"), PropertyKind::String);
        assert_eq!(PropertyKind::from_type_name("boolean"), PropertyKind::Boolean);
        assert_eq!(
            PropertyKind::from_type_name("integer"),
            PropertyKind::Other("integer".to_string())
        );
        assert_eq!(PropertyKind::Other("number".into()).to_string(), "number");
    }

    #[test]
    fn test_empty_generated_name_is_not_a_model() {
        let mut obj = Object::new("x", "x.json");
        assert_eq!(obj.model_name(), None);
        obj.generated_name = Some(String::new());
        assert_eq!(obj.model_name(), None);
        obj.generated_name = Some("X".into());
        assert_eq!(obj.model_name(), Some("X"));
    }
}
