//! Schema Object Registry
//!
//! Builds the object graph from parsed schema documents. One `Registry` is
//! created per generation run, filled by [`Registry::ingest`] for every input
//! file, then handed by reference to the emitter.
//!
//! Every object is keyed by its reference id. Generated names and origin file
//! names are recorded as aliases so that `$ref` pointers written either way
//! resolve to the same node. Rebinding any of these keys to a different
//! object is rejected with [`GenError::DuplicateId`].

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::codegen::names;
use crate::error::{GenError, Result};
use crate::schema::{Object, ObjectRef, Property, PropertyKind};

/// Reference prefixes stripped when normalizing a `$ref`
const REF_PREFIXES: &[&str] = &["#/definitions/", "#/$defs/", "./", "#"];

/// Process-wide state of one generation run
#[derive(Debug, Default)]
pub struct Registry {
    /// reference id -> object
    objects: HashMap<String, Object>,
    /// generated name / origin file -> reference id
    aliases: HashMap<String, String>,
    /// generated name -> origin file
    models: BTreeMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one schema document and register every object it declares.
    ///
    /// `origin` is the file's base name (`Person.json`); it names the root
    /// model and is the fallback reference id when the root has no `id`.
    pub fn ingest(&mut self, document: &[u8], origin: &str) -> Result<ObjectRef> {
        debug!(file = origin, "ingesting schema");
        let value: Value = serde_json::from_slice(document).map_err(|source| GenError::Parse {
            file: origin.to_string(),
            source,
        })?;
        let data = value.as_object().ok_or_else(|| GenError::NotAnObject {
            file: origin.to_string(),
        })?;
        self.ingest_object(data, origin, Some(origin), true)
    }

    fn ingest_object(
        &mut self,
        data: &Map<String, Value>,
        origin: &str,
        name_hint: Option<&str>,
        top_level: bool,
    ) -> Result<ObjectRef> {
        if let Some(reference) = data.get("$ref").and_then(Value::as_str) {
            info!(file = origin, reference, "found reference object");
            return Ok(ObjectRef::stub(reference));
        }

        let explicit_id = data.get("id").and_then(Value::as_str);
        // Only a file name carries an extension; nested hints are property names.
        let generated_name = name_hint
            .map(|hint| {
                if top_level {
                    names::type_name(hint)
                } else {
                    names::to_pascal_case(hint)
                }
            })
            .filter(|n| !n.is_empty());

        let reference_id = match (explicit_id, &generated_name) {
            (Some(id), _) => id.to_string(),
            (None, _) if top_level => origin.to_string(),
            (None, Some(name)) => name.clone(),
            (None, None) => name_hint.unwrap_or(origin).to_string(),
        };

        let mut object = Object::new(reference_id.clone(), origin);
        object.generated_name = generated_name.clone();

        // Registered before walking properties so nested schemas can point back here.
        self.bind_object(object)?;
        if let Some(name) = &generated_name {
            self.bind_alias(name, &reference_id, origin)?;
            self.models.insert(name.clone(), origin.to_string());
        }
        if top_level {
            self.bind_alias(origin, &reference_id, origin)?;
        }

        let mut properties = IndexMap::new();
        if let Some(declared) = data.get("properties").and_then(Value::as_object) {
            for (prop_name, prop_data) in declared {
                let property = self.ingest_property(prop_name, prop_data, origin)?;
                properties.insert(prop_name.clone(), property);
            }
        }

        if let Some(object) = self.objects.get_mut(&reference_id) {
            object.properties = properties;
        }
        Ok(ObjectRef::registered(reference_id))
    }

    fn ingest_property(&mut self, name: &str, data: &Value, origin: &str) -> Result<Property> {
        let missing_type = || GenError::MissingType {
            property: name.to_string(),
            object: origin.to_string(),
        };
        let data = data.as_object().ok_or_else(missing_type)?;

        let Some(type_name) = data.get("type").and_then(Value::as_str) else {
            // A bare `$ref` property points at another object.
            if let Some(reference) = data.get("$ref").and_then(Value::as_str) {
                return Ok(Property::referencing(
                    PropertyKind::Object,
                    Some(reference.to_string()),
                ));
            }
            return Err(missing_type());
        };

        let property = match PropertyKind::from_type_name(type_name) {
            PropertyKind::String => {
                let format = data.get("format").and_then(Value::as_str).map(str::to_string);
                Property::string(format)
            }
            PropertyKind::Object => {
                let nested = self.ingest_object(data, origin, Some(name), false)?;
                Property::referencing(PropertyKind::Object, Some(nested.reference_id))
            }
            PropertyKind::Array => {
                let items = match data.get("items").and_then(Value::as_object) {
                    Some(items) => {
                        let hint = format!("{}Item", name);
                        Some(self.ingest_object(items, origin, Some(&hint), false)?.reference_id)
                    }
                    None => None,
                };
                Property::referencing(PropertyKind::Array, items)
            }
            kind => Property::new(kind),
        };
        Ok(property)
    }

    fn bind_object(&mut self, object: Object) -> Result<()> {
        if let Some(existing) = self.objects.get(&object.reference_id) {
            return Err(GenError::DuplicateId {
                id: object.reference_id.clone(),
                first: existing.origin.clone(),
                second: object.origin,
            });
        }
        if let Some(target) = self.aliases.get(&object.reference_id) {
            return Err(GenError::DuplicateId {
                id: object.reference_id.clone(),
                first: self.origin_of(target),
                second: object.origin,
            });
        }
        self.objects.insert(object.reference_id.clone(), object);
        Ok(())
    }

    fn bind_alias(&mut self, alias: &str, reference_id: &str, origin: &str) -> Result<()> {
        if alias == reference_id {
            return Ok(());
        }
        let conflict = match self.aliases.get(alias) {
            Some(bound) => bound != reference_id,
            None => self.objects.contains_key(alias),
        };
        if conflict {
            let first = self
                .aliases
                .get(alias)
                .map(|bound| self.origin_of(bound))
                .unwrap_or_else(|| self.origin_of(alias));
            return Err(GenError::DuplicateId {
                id: alias.to_string(),
                first,
                second: origin.to_string(),
            });
        }
        self.aliases.insert(alias.to_string(), reference_id.to_string());
        Ok(())
    }

    fn origin_of(&self, reference_id: &str) -> String {
        self.objects
            .get(reference_id)
            .map(|o| o.origin.clone())
            .unwrap_or_default()
    }

    /// Look up an object by reference id, generated name, or origin file.
    ///
    /// Falls back to a normalized form of `key` with `#/definitions/`, `./`
    /// and `.json` stripped.
    pub fn resolve(&self, key: &str) -> Option<&Object> {
        self.lookup(key).or_else(|| {
            let mut normalized = key;
            for prefix in REF_PREFIXES {
                normalized = normalized.strip_prefix(prefix).unwrap_or(normalized);
            }
            let normalized = names::strip_extension(normalized);
            self.lookup(normalized)
                .or_else(|| self.lookup(&format!("{}.json", normalized)))
                .or_else(|| self.lookup(&names::type_name(normalized)))
        })
    }

    fn lookup(&self, key: &str) -> Option<&Object> {
        self.objects.get(key).or_else(|| {
            self.aliases
                .get(key)
                .and_then(|reference_id| self.objects.get(reference_id))
        })
    }

    /// Named models in generated-name order, with their origin file
    pub fn models(&self) -> impl Iterator<Item = (&str, &str)> {
        self.models.iter().map(|(name, origin)| (name.as_str(), origin.as_str()))
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Register a model name without an object behind it.
    #[cfg(test)]
    pub(crate) fn insert_dangling_model(&mut self, name: &str, origin: &str) {
        self.models.insert(name.to_string(), origin.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERSON: &str = r#"{
        "id": "Person",
        "properties": {
            "name": {"type": "string"},
            "age": {"type": "string", "format": "int64"},
            "pets": {
                "type": "array",
                "items": {"type": "object", "properties": {"name": {"type": "string"}}}
            }
        }
    }"#;

    #[test]
    fn test_ingest_registers_root_and_nested_models() {
        let mut registry = Registry::new();
        let root = registry.ingest(PERSON.as_bytes(), "Person.json").unwrap();
        assert_eq!(root, ObjectRef::registered("Person"));

        let models: Vec<_> = registry.models().map(|(name, _)| name).collect();
        assert_eq!(models, vec!["Person", "PetsItem"]);

        let person = registry.resolve("Person").unwrap();
        let keys: Vec<_> = person.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "age", "pets"]);
        assert_eq!(person.properties["age"].format.as_deref(), Some("int64"));

        let pets = &person.properties["pets"];
        assert_eq!(pets.kind, PropertyKind::Array);
        let item = registry.resolve(pets.referenced_object.as_deref().unwrap()).unwrap();
        assert_eq!(item.model_name(), Some("PetsItem"));
        assert_eq!(item.origin, "Person.json");
    }

    #[test]
    fn test_file_name_is_fallback_reference_id() {
        let mut registry = Registry::new();
        let root = registry
            .ingest(br#"{"properties": {"ok": {"type": "boolean"}}}"#, "status.json")
            .unwrap();
        assert_eq!(root.reference_id, "status.json");
        assert!(registry.resolve("Status").is_some());
        assert!(registry.resolve("status.json").is_some());
        assert!(registry.resolve("status").is_some());
    }

    #[test]
    fn test_ref_is_stub_and_not_a_model() {
        let mut registry = Registry::new();
        let root = registry.ingest(br#"{"$ref": "Person"}"#, "alias.json").unwrap();
        assert!(root.stub);
        assert_eq!(root.reference_id, "Person");
        assert_eq!(registry.model_count(), 0);
        assert_eq!(registry.object_count(), 0);
    }

    #[test]
    fn test_array_items_ref_points_at_other_file() {
        let mut registry = Registry::new();
        registry
            .ingest(
                br#"{"properties": {"owners": {"type": "array", "items": {"$ref": "Person"}}}}"#,
                "Pet.json",
            )
            .unwrap();
        registry.ingest(PERSON.as_bytes(), "Person.json").unwrap();

        let pet = registry.resolve("Pet").unwrap();
        assert_eq!(
            pet.properties["owners"].referenced_object.as_deref(),
            Some("Person")
        );
        assert!(registry.resolve("Person").is_some());
        // the stub itself never became a model
        assert!(!registry.models().any(|(name, _)| name == "OwnersItem"));
    }

    #[test]
    fn test_missing_type_fails() {
        let mut registry = Registry::new();
        let err = registry
            .ingest(br#"{"properties": {"age": {"format": "int64"}}}"#, "Bad.json")
            .unwrap_err();
        match err {
            GenError::MissingType { property, object } => {
                assert_eq!(property, "age");
                assert_eq!(object, "Bad.json");
            }
            other => panic!("expected MissingType, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let mut registry = Registry::new();
        let err = registry.ingest(b"{not json", "Broken.json").unwrap_err();
        assert!(matches!(err, GenError::Parse { ref file, .. } if file == "Broken.json"));

        let err = registry.ingest(b"[1, 2]", "List.json").unwrap_err();
        assert!(matches!(err, GenError::NotAnObject { .. }));
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut registry = Registry::new();
        registry
            .ingest(br#"{"id": "Shared", "properties": {}}"#, "a.json")
            .unwrap();
        let err = registry
            .ingest(br#"{"id": "Shared", "properties": {}}"#, "b.json")
            .unwrap_err();
        match err {
            GenError::DuplicateId { id, first, second } => {
                assert_eq!(id, "Shared");
                assert_eq!(first, "a.json");
                assert_eq!(second, "b.json");
            }
            other => panic!("expected DuplicateId, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_generated_name_is_rejected() {
        let mut registry = Registry::new();
        let address = br#"{"properties": {"address": {"type": "object", "properties": {}}}}"#;
        registry.ingest(address, "Home.json").unwrap();
        let err = registry.ingest(address, "Office.json").unwrap_err();
        assert!(matches!(err, GenError::DuplicateId { ref id, .. } if id == "Address"));
    }

    #[test]
    fn test_resolve_normalizes_refs() {
        let mut registry = Registry::new();
        registry.ingest(PERSON.as_bytes(), "Person.json").unwrap();
        assert!(registry.resolve("#/definitions/Person").is_some());
        assert!(registry.resolve("./Person.json").is_some());
        assert!(registry.resolve("Nobody").is_none());
    }

    #[test]
    fn test_dotted_property_names_keep_full_name() {
        let mut registry = Registry::new();
        registry
            .ingest(
                br#"{"properties": {
                    "address.home": {"type": "object", "properties": {}},
                    "address.work": {"type": "object", "properties": {}},
                    "tags.v2": {"type": "array", "items": {"type": "object", "properties": {}}}
                }}"#,
                "Contact.json",
            )
            .unwrap();

        let models: Vec<_> = registry.models().map(|(name, _)| name).collect();
        assert_eq!(models, vec!["AddressHome", "AddressWork", "Contact", "TagsV2Item"]);

        let contact = registry.resolve("Contact").unwrap();
        assert_eq!(
            contact.properties["tags.v2"].referenced_object.as_deref(),
            Some("TagsV2Item")
        );
    }
}
