//! Model Cycle Analysis
//!
//! Finds strongly connected components among models linked by direct
//! (non-array) object fields. A struct that contains itself by value, directly
//! or through other structs, has no finite size, so the fields closing such a
//! cycle are rendered through a pointer (`*T` in Go, `Box<T>` in Rust).
//! Sequence fields already live behind an allocation and never need it.

use std::collections::{HashMap, HashSet};

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::registry::Registry;
use crate::schema::PropertyKind;

/// A group of models that reference each other by value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleGroup {
    pub id: usize,
    /// Members sorted by name
    pub members: Vec<String>,
    pub is_self_referential: bool,
}

/// Result of the cycle analysis over all models
#[derive(Debug, Clone, Default)]
pub struct CycleAnalysis {
    pub groups: Vec<CycleGroup>,
    /// (model, property) pairs that must be rendered indirectly
    indirect_fields: HashSet<(String, String)>,
}

impl CycleAnalysis {
    /// Whether a field of a model closes a by-value cycle
    pub fn needs_indirection(&self, model: &str, property: &str) -> bool {
        self.indirect_fields
            .contains(&(model.to_string(), property.to_string()))
    }

    pub fn indirect_field_count(&self) -> usize {
        self.indirect_fields.len()
    }
}

/// Compute cycle groups for every model in the registry
pub fn analyze_cycles(registry: &Registry) -> CycleAnalysis {
    let mut graph: DiGraph<String, String> = DiGraph::new();
    let mut nodes: HashMap<String, NodeIndex> = HashMap::new();

    for (name, _) in registry.models() {
        nodes.insert(name.to_string(), graph.add_node(name.to_string()));
    }

    for (name, _) in registry.models() {
        let Some(object) = registry.resolve(name) else {
            continue;
        };
        for (prop_name, property) in &object.properties {
            if property.kind != PropertyKind::Object {
                continue;
            }
            let target = property
                .referenced_object
                .as_deref()
                .and_then(|reference| registry.resolve(reference))
                .and_then(|target| target.model_name());
            if let (Some(&from), Some(&to)) = (nodes.get(name), target.and_then(|t| nodes.get(t))) {
                graph.add_edge(from, to, prop_name.clone());
            }
        }
    }

    let mut component: HashMap<NodeIndex, usize> = HashMap::new();
    let mut groups = Vec::new();

    for scc in kosaraju_scc(&graph) {
        let is_self_referential =
            scc.len() == 1 && graph.edges(scc[0]).any(|e| e.target() == scc[0]);
        if scc.len() < 2 && !is_self_referential {
            continue;
        }
        let id = groups.len();
        let mut members: Vec<String> = scc.iter().map(|idx| graph[*idx].clone()).collect();
        members.sort();
        for idx in &scc {
            component.insert(*idx, id);
        }
        groups.push(CycleGroup {
            id,
            members,
            is_self_referential,
        });
    }

    let indirect_fields = graph
        .edge_references()
        .filter(|edge| {
            matches!(
                (component.get(&edge.source()), component.get(&edge.target())),
                (Some(a), Some(b)) if a == b
            )
        })
        .map(|edge| (graph[edge.source()].clone(), edge.weight().clone()))
        .collect();

    CycleAnalysis {
        groups,
        indirect_fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(docs: &[(&str, &str)]) -> Registry {
        let mut registry = Registry::new();
        for (file, doc) in docs {
            registry.ingest(doc.as_bytes(), file).unwrap();
        }
        registry
    }

    #[test]
    fn test_mutual_object_references_form_a_group() {
        let registry = registry(&[
            ("A.json", r#"{"id": "A", "properties": {"b": {"$ref": "B"}}}"#),
            ("B.json", r#"{"id": "B", "properties": {"a": {"$ref": "A"}, "n": {"type": "string"}}}"#),
        ]);
        let analysis = analyze_cycles(&registry);

        assert_eq!(analysis.groups.len(), 1);
        assert_eq!(analysis.groups[0].members, vec!["A", "B"]);
        assert!(analysis.needs_indirection("A", "b"));
        assert!(analysis.needs_indirection("B", "a"));
        assert!(!analysis.needs_indirection("B", "n"));
    }

    #[test]
    fn test_self_reference() {
        let registry = registry(&[(
            "Node.json",
            r#"{"id": "Node", "properties": {"next": {"$ref": "Node"}}}"#,
        )]);
        let analysis = analyze_cycles(&registry);
        assert_eq!(analysis.groups.len(), 1);
        assert!(analysis.groups[0].is_self_referential);
        assert!(analysis.needs_indirection("Node", "next"));
    }

    #[test]
    fn test_array_cycles_need_no_indirection() {
        let registry = registry(&[
            ("A.json", r#"{"id": "A", "properties": {"bs": {"type": "array", "items": {"$ref": "B"}}}}"#),
            ("B.json", r#"{"id": "B", "properties": {"a": {"$ref": "A"}}}"#),
        ]);
        let analysis = analyze_cycles(&registry);
        assert!(analysis.groups.is_empty());
        assert_eq!(analysis.indirect_field_count(), 0);
    }
}
