//! Model Emitter
//!
//! Turns a fully populated [`Registry`] into one source unit per named model.
//!
//! Architecture:
//! - `ModelEmitter`: resolves every property of a model to a [`FieldType`]
//!   (language-agnostic) and collects them into a [`ResolvedModel`]
//! - Language renderers (`go`, `rust`): print a `ResolvedModel`, never the
//!   registry or raw schema JSON
//!
//! Neighbouring models are referred to by generated name only; nothing is
//! inlined, so cyclic schemas render like any other.

pub mod analysis;
pub mod config;
pub mod go;
pub mod names;
pub mod rust;

pub use analysis::{analyze_cycles, CycleAnalysis, CycleGroup};
pub use config::{FieldOrder, Language, RenderProfile, TypeMappings};

use std::collections::HashMap;

use tracing::{debug, error, warn};

use crate::error::{GenError, Result};
use crate::registry::Registry;
use crate::schema::{Property, PropertyKind};

/// Width of an integer carried as a JSON string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerWidth {
    Int64,
    Uint64,
}

/// Resolved type of a generated field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer(IntegerWidth),
    Boolean,
    /// Sequence of the inner type
    Sequence(Box<FieldType>),
    /// Another generated model, by name
    Named(String),
    /// No mapping exists; rendered with the profile's placeholder type
    Unresolved,
}

/// One field declaration of a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Original property name, used as the key on the wire
    pub wire_name: String,
    pub field_type: FieldType,
    /// Value travels as a quoted string
    pub string_encoded: bool,
    /// Rendered through a pointer to break a by-value cycle
    pub indirect: bool,
}

/// A model with all fields resolved, ready for a language renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModel {
    pub name: String,
    pub origin: String,
    pub fields: Vec<FieldDecl>,
}

/// Unformatted output for one model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub model_name: String,
    pub file_name: String,
    pub source: String,
}

/// Outcome of rendering every model
#[derive(Debug, Default)]
pub struct RenderReport {
    pub units: Vec<GeneratedUnit>,
    pub errors: Vec<GenError>,
}

impl RenderReport {
    pub fn has_fatal(&self) -> bool {
        self.errors.iter().any(GenError::is_fatal)
    }
}

/// Renders models out of a registry
pub struct ModelEmitter<'a> {
    registry: &'a Registry,
    profile: RenderProfile,
    cycles: CycleAnalysis,
    /// model name -> Rust module identifier, unique across the run
    modules: HashMap<String, String>,
}

impl<'a> ModelEmitter<'a> {
    pub fn new(registry: &'a Registry, profile: RenderProfile) -> Self {
        let cycles = analyze_cycles(registry);
        if !cycles.groups.is_empty() {
            debug!(
                groups = cycles.groups.len(),
                indirect_fields = cycles.indirect_field_count(),
                "models reference each other by value"
            );
        }
        let model_names: Vec<&str> = registry.models().map(|(name, _)| name).collect();
        let module_names = names::dedupe(model_names.iter().map(|name| names::rust_module_name(name)));
        let modules = model_names
            .into_iter()
            .map(str::to_string)
            .zip(module_names)
            .collect();
        Self {
            registry,
            profile,
            cycles,
            modules,
        }
    }

    pub fn profile(&self) -> &RenderProfile {
        &self.profile
    }

    /// Render every named model.
    ///
    /// A model whose object is missing or whose references do not resolve is
    /// left out of `units` and its error recorded; the other models still
    /// render.
    pub fn render_all(&self) -> RenderReport {
        let mut report = RenderReport::default();
        for (name, origin) in self.registry.models() {
            debug!(model = name, file = origin, "rendering model");
            match self.render_model(name) {
                Ok(unit) => report.units.push(unit),
                Err(err @ GenError::Consistency { .. }) => {
                    warn!(model = name, "{}", err);
                    report.errors.push(err);
                }
                Err(err) => {
                    error!(model = name, file = origin, "{}", err);
                    report.errors.push(err);
                }
            }
        }
        if self.profile.language == Language::Rust && !report.units.is_empty() {
            let entries: Vec<(&str, &str)> = report
                .units
                .iter()
                .map(|u| (self.module_of(&u.model_name), u.model_name.as_str()))
                .collect();
            let index = rust::emit_module_index(&entries, &self.profile);
            report.units.push(index);
        }
        report
    }

    /// Render a single model by generated name
    pub fn render_model(&self, name: &str) -> Result<GeneratedUnit> {
        let model = self.resolve_model(name)?;
        let source = match self.profile.language {
            Language::Go => go::emit_model(&model, &self.profile),
            Language::Rust => rust::emit_model(&model, &self.profile),
        };
        Ok(GeneratedUnit {
            model_name: model.name,
            file_name: self.profile.file_name(name, self.module_of(name)),
            source,
        })
    }

    /// Resolve every field of a model without rendering it
    pub fn resolve_model(&self, name: &str) -> Result<ResolvedModel> {
        let object = self
            .registry
            .resolve(name)
            .filter(|object| object.model_name() == Some(name))
            .ok_or_else(|| GenError::Consistency {
                model: name.to_string(),
            })?;

        let mut properties: Vec<_> = object.properties.iter().collect();
        if self.profile.field_order == FieldOrder::Alphabetical {
            properties.sort_by(|a, b| a.0.cmp(b.0));
        }

        let fields = properties
            .into_iter()
            .map(|(prop_name, property)| self.render_field(name, prop_name, property))
            .collect::<Result<Vec<_>>>()?;

        Ok(ResolvedModel {
            name: name.to_string(),
            origin: object.origin.clone(),
            fields,
        })
    }

    /// Map one property onto a field declaration
    pub fn render_field(&self, model: &str, prop_name: &str, property: &Property) -> Result<FieldDecl> {
        let mut string_encoded = false;
        let field_type = match &property.kind {
            PropertyKind::String => match property.format.as_deref() {
                Some("int64") => {
                    string_encoded = true;
                    FieldType::Integer(IntegerWidth::Int64)
                }
                Some("uint64") => {
                    string_encoded = true;
                    FieldType::Integer(IntegerWidth::Uint64)
                }
                _ => FieldType::Text,
            },
            PropertyKind::Boolean => FieldType::Boolean,
            PropertyKind::Array => match property.referenced_object.as_deref() {
                Some(reference) => {
                    let element = self.referenced_model(model, prop_name, reference)?;
                    FieldType::Sequence(Box::new(FieldType::Named(element)))
                }
                None => {
                    warn!(model, property = prop_name, "array has no items, element type unresolved");
                    FieldType::Sequence(Box::new(FieldType::Unresolved))
                }
            },
            PropertyKind::Object => match property.referenced_object.as_deref() {
                Some(reference) => {
                    FieldType::Named(self.referenced_model(model, prop_name, reference)?)
                }
                None => {
                    warn!(model, property = prop_name, "object property has no reference");
                    FieldType::Unresolved
                }
            },
            PropertyKind::Other(kind) => {
                warn!(model, property = prop_name, kind = kind.as_str(), "no type mapping, left unresolved");
                FieldType::Unresolved
            }
        };

        let indirect = matches!(field_type, FieldType::Named(_))
            && self.cycles.needs_indirection(model, prop_name);

        debug!(
            model,
            property = prop_name,
            kind = %property.kind,
            reference = property.referenced_object.as_deref().unwrap_or(""),
            "resolved field"
        );

        Ok(FieldDecl {
            wire_name: prop_name.to_string(),
            field_type,
            string_encoded,
            indirect,
        })
    }

    /// Rust module identifier of a model
    pub fn module_of<'m>(&'m self, model: &'m str) -> &'m str {
        self.modules.get(model).map(String::as_str).unwrap_or(model)
    }

    fn referenced_model(&self, model: &str, prop_name: &str, reference: &str) -> Result<String> {
        self.registry
            .resolve(reference)
            .and_then(|object| object.model_name())
            .map(str::to_string)
            .ok_or_else(|| GenError::Reference {
                model: model.to_string(),
                property: prop_name.to_string(),
                reference: reference.to_string(),
            })
    }
}
