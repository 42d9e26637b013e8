// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 fmilink contributors

//! Depth-first flattening of struct definitions.
//!
//! Struct members reference other structs by generated name, so the catalog
//! is a name-indexed graph that may (for externally supplied catalogs)
//! contain cycles. The flattener walks it with an explicit three-state visit
//! marker instead of relying on call-stack depth, memoizing each result in a
//! side cache so the member maps themselves are never touched.

use crate::interface::{DiagnosticSink, LogSink, StructCatalog};
use crate::type_descriptor::TypeDescriptor;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Flattening failure modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlattenError {
    /// The requested struct name is not in the catalog.
    UnknownStruct(String),
    /// A struct transitively references itself by name.
    Cycle(String),
}

impl fmt::Display for FlattenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownStruct(name) => write!(f, "unknown struct definition '{}'", name),
            Self::Cycle(name) => {
                write!(f, "reference cycle detected while flattening '{}'", name)
            }
        }
    }
}

impl std::error::Error for FlattenError {}

/// One qualified leaf member of a flattened struct.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlattenedMember {
    /// Member name prefixed with its containing member names, `.`-joined.
    pub qualified_name: String,
    /// Scalar or list type string.
    pub type_name: String,
}

/// Visit marker per struct name (absent = unvisited).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Done,
}

/// Flattens catalog structs into their qualified leaf members, memoized.
///
/// The catalog is borrowed; only the flattener's private cache mutates. Not
/// safe for concurrent first-time computation of the same struct.
pub struct StructFlattener<'a> {
    catalog: &'a StructCatalog,
    cache: HashMap<String, Arc<[FlattenedMember]>>,
    state: HashMap<String, VisitState>,
}

impl<'a> StructFlattener<'a> {
    pub fn new(catalog: &'a StructCatalog) -> Self {
        Self {
            catalog,
            cache: HashMap::new(),
            state: HashMap::new(),
        }
    }

    /// Flatten a struct, sending diagnostics to `log::debug!`.
    pub fn flatten(&mut self, name: &str) -> Result<Arc<[FlattenedMember]>, FlattenError> {
        let mut sink = LogSink;
        self.flatten_with(name, &mut sink)
    }

    /// Flatten a struct with an explicit diagnostic sink.
    ///
    /// Repeated calls return the identical cached sequence.
    pub fn flatten_with(
        &mut self,
        name: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Arc<[FlattenedMember]>, FlattenError> {
        if !self.catalog.contains_key(name) {
            return Err(FlattenError::UnknownStruct(name.to_string()));
        }
        self.flatten_inner(name, sink)
    }

    fn flatten_inner(
        &mut self,
        name: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Arc<[FlattenedMember]>, FlattenError> {
        if let Some(cached) = self.cache.get(name) {
            return Ok(cached.clone());
        }
        if self.state.get(name) == Some(&VisitState::InProgress) {
            return Err(FlattenError::Cycle(name.to_string()));
        }
        self.state.insert(name.to_string(), VisitState::InProgress);

        let catalog = self.catalog;
        let Some(definition) = catalog.get(name) else {
            return Err(FlattenError::UnknownStruct(name.to_string()));
        };

        let mut members = Vec::new();
        for (member, type_name) in definition.members() {
            if catalog.contains_key(type_name) {
                let nested = self.flatten_inner(type_name, sink)?;
                for leaf in nested.iter() {
                    members.push(FlattenedMember {
                        qualified_name: format!("{}.{}", member, leaf.qualified_name),
                        type_name: leaf.type_name.clone(),
                    });
                }
            } else {
                // Leaf member. An unresolved custom name passes through as a
                // scalar; surface it so upstream configuration errors stay
                // visible.
                if let Ok(descriptor) = TypeDescriptor::parse(type_name) {
                    if let Some(custom) = descriptor.custom_name() {
                        sink.report(&format!(
                            "member '{}' of '{}': unresolved type name '{}' treated as scalar",
                            member, name, custom
                        ));
                    }
                }
                members.push(FlattenedMember {
                    qualified_name: member.to_string(),
                    type_name: type_name.to_string(),
                });
            }
        }

        self.state.insert(name.to_string(), VisitState::Done);
        let flattened: Arc<[FlattenedMember]> = members.into();
        self.cache.insert(name.to_string(), flattened.clone());
        Ok(flattened)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::StructDefinition;

    fn catalog(defs: Vec<StructDefinition>) -> StructCatalog {
        defs.into_iter()
            .map(|def| (def.name().to_string(), def))
            .collect()
    }

    fn def(name: &str, members: &[(&str, &str)]) -> StructDefinition {
        let mut definition = StructDefinition::new(name);
        for (member, type_name) in members {
            definition.insert_member(*member, *type_name);
        }
        definition
    }

    #[test]
    fn test_flat_struct_members_unchanged() {
        let catalog = catalog(vec![def("aT", &[("b", "float64"), ("c", "bool")])]);
        let mut flattener = StructFlattener::new(&catalog);
        let flat = flattener.flatten("aT").expect("flatten");
        let pairs: Vec<(&str, &str)> = flat
            .iter()
            .map(|m| (m.qualified_name.as_str(), m.type_name.as_str()))
            .collect();
        assert_eq!(pairs, [("b", "float64"), ("c", "bool")]);
    }

    #[test]
    fn test_nested_struct_qualified_names() {
        let catalog = catalog(vec![
            def("vehicleT", &[("engine", "vehicle.engineT"), ("brake", "bool")]),
            def("vehicle.engineT", &[("rpm", "float64"), ("temp", "float32")]),
        ]);
        let mut flattener = StructFlattener::new(&catalog);
        let flat = flattener.flatten("vehicleT").expect("flatten");
        let names: Vec<&str> = flat.iter().map(|m| m.qualified_name.as_str()).collect();
        assert_eq!(names, ["engine.rpm", "engine.temp", "brake"]);
    }

    #[test]
    fn test_deeply_nested_prefixing() {
        let catalog = catalog(vec![
            def("aT", &[("b", "a.bT")]),
            def("a.bT", &[("c", "a.b.cT")]),
            def("a.b.cT", &[("leaf", "int32")]),
        ]);
        let mut flattener = StructFlattener::new(&catalog);
        let flat = flattener.flatten("aT").expect("flatten");
        assert_eq!(flat[0].qualified_name, "b.c.leaf");
        assert_eq!(flat[0].type_name, "int32");
    }

    #[test]
    fn test_memoized_result_is_identical() {
        let catalog = catalog(vec![def("aT", &[("b", "float64")])]);
        let mut flattener = StructFlattener::new(&catalog);
        let first = flattener.flatten("aT").expect("flatten");
        let second = flattener.flatten("aT").expect("flatten");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_shared_nested_struct_reused() {
        let catalog = catalog(vec![
            def("outerT", &[("left", "pointT"), ("right", "pointT")]),
            def("pointT", &[("x", "float64"), ("y", "float64")]),
        ]);
        let mut flattener = StructFlattener::new(&catalog);
        let flat = flattener.flatten("outerT").expect("flatten");
        let names: Vec<&str> = flat.iter().map(|m| m.qualified_name.as_str()).collect();
        assert_eq!(names, ["left.x", "left.y", "right.x", "right.y"]);
    }

    #[test]
    fn test_unknown_struct() {
        let catalog = StructCatalog::new();
        let mut flattener = StructFlattener::new(&catalog);
        assert_eq!(
            flattener.flatten("missingT"),
            Err(FlattenError::UnknownStruct("missingT".to_string()))
        );
    }

    #[test]
    fn test_self_cycle_detected() {
        let catalog = catalog(vec![def("aT", &[("again", "aT")])]);
        let mut flattener = StructFlattener::new(&catalog);
        assert_eq!(
            flattener.flatten("aT"),
            Err(FlattenError::Cycle("aT".to_string()))
        );
    }

    #[test]
    fn test_transitive_cycle_detected() {
        let catalog = catalog(vec![
            def("aT", &[("b", "bT")]),
            def("bT", &[("a", "aT")]),
        ]);
        let mut flattener = StructFlattener::new(&catalog);
        assert!(matches!(
            flattener.flatten("aT"),
            Err(FlattenError::Cycle(_))
        ));
    }

    #[test]
    fn test_unresolved_reference_passes_through() {
        let catalog = catalog(vec![def("aT", &[("g", "GearEnum"), ("x", "float64")])]);
        let mut flattener = StructFlattener::new(&catalog);
        let mut diagnostics: Vec<String> = Vec::new();
        let flat = flattener.flatten_with("aT", &mut diagnostics).expect("flatten");
        assert_eq!(flat[0].type_name, "GearEnum");
        // The passthrough is reported, the primitive leaf is not.
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].contains("GearEnum"));
    }
}
