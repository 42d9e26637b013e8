// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 fmilink contributors

//! Synthesized interface description: topics, struct catalog, document.
//!
//! The document is the in-memory output contract consumed by an external
//! renderer. Every section preserves first-encounter order from the input
//! variable list; empty sections are skipped when serialized.

pub mod builder;
pub mod flatten;

use crate::model::{Causality, EnumDefinition};
use crate::type_descriptor::{TypeDescriptor, TypeParseError};
use indexmap::IndexMap;
use std::fmt;

pub use builder::{BuildError, BuilderConfig, InterfaceBuilder};
pub use flatten::{FlattenError, FlattenedMember, StructFlattener};

/// Version marker written into every produced document.
pub const FORMAT_VERSION: u32 = 1;

/// Receives diagnostic messages from building and flattening.
///
/// Diagnostics flow through an explicit sink parameter instead of ambient
/// state; [`LogSink`] adapts the sink onto the `log` facade.
pub trait DiagnosticSink {
    fn report(&mut self, message: &str);
}

/// Default sink forwarding diagnostics to `log::debug!`.
#[derive(Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, message: &str) {
        log::debug!("[fmilink] {}", message);
    }
}

/// Collecting sink, mainly for tests and callers that surface diagnostics.
impl DiagnosticSink for Vec<String> {
    fn report(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

/// Topic direction as seen from the simulation component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Publish,
    Subscribe,
}

impl Direction {
    /// Destination list for a causality: inputs are subscribed, everything
    /// else synthesized is published.
    pub fn for_causality(causality: Causality) -> Self {
        match causality {
            Causality::Input => Self::Subscribe,
            _ => Self::Publish,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Publish => write!(f, "publish"),
            Self::Subscribe => write!(f, "subscribe"),
        }
    }
}

/// A named publish or subscribe endpoint.
///
/// Created once per distinct root name per direction, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Topic {
    /// Root name, the first path segment.
    pub name: String,
    pub direction: Direction,
    /// Primitive surface form, `List<...>` form, or a generated struct name.
    pub type_name: String,
}

impl Topic {
    pub fn new(name: impl Into<String>, direction: Direction, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction,
            type_name: type_name.into(),
        }
    }

    /// Parse the topic's type string through the type-descriptor grammar.
    ///
    /// Generated struct names come back as `DescriptorKind::Custom` and are
    /// resolved against the document's struct catalog.
    pub fn descriptor(&self) -> Result<TypeDescriptor, TypeParseError> {
        TypeDescriptor::parse(&self.type_name)
    }
}

/// Generated record type for one level of the name hierarchy.
///
/// Members are insertion-ordered; a member name is written at most once
/// (first write wins).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructDefinition {
    name: String,
    members: IndexMap<String, String>,
}

impl StructDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: IndexMap::new(),
        }
    }

    /// Generated name of this struct.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a member unless the name is already taken.
    ///
    /// Returns false when the member already existed (the insert is ignored).
    pub fn insert_member(&mut self, member: impl Into<String>, type_name: impl Into<String>) -> bool {
        match self.members.entry(member.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(type_name.into());
                true
            }
        }
    }

    /// Member type string by member name.
    pub fn member(&self, name: &str) -> Option<&str> {
        self.members.get(name).map(String::as_str)
    }

    /// Members in insertion order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &str)> {
        self.members
            .iter()
            .map(|(name, type_name)| (name.as_str(), type_name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Name-indexed, insertion-ordered struct catalog shared between the builder
/// output and the flattener.
pub type StructCatalog = IndexMap<String, StructDefinition>;

/// Complete synthesized interface description.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterfaceDocument {
    pub version: u32,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub enums: Vec<EnumDefinition>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "IndexMap::is_empty")
    )]
    pub structs: StructCatalog,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub publishers: Vec<Topic>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub subscribers: Vec<Topic>,
}

impl InterfaceDocument {
    /// Empty document with the given format version marker.
    pub fn new(version: u32) -> Self {
        Self {
            version,
            enums: Vec::new(),
            structs: StructCatalog::new(),
            publishers: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    /// Look up a struct definition by generated name.
    pub fn struct_definition(&self, name: &str) -> Option<&StructDefinition> {
        self.structs.get(name)
    }

    /// Flattener over this document's struct catalog.
    pub fn flattener(&self) -> StructFlattener<'_> {
        StructFlattener::new(&self.structs)
    }
}

impl Default for InterfaceDocument {
    fn default() -> Self {
        Self::new(FORMAT_VERSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_for_causality() {
        assert_eq!(
            Direction::for_causality(Causality::Input),
            Direction::Subscribe
        );
        assert_eq!(
            Direction::for_causality(Causality::Output),
            Direction::Publish
        );
        assert_eq!(
            Direction::for_causality(Causality::Parameter),
            Direction::Publish
        );
    }

    #[test]
    fn test_struct_definition_first_write_wins() {
        let mut def = StructDefinition::new("vehicleT");
        assert!(def.insert_member("speed", "float64"));
        assert!(!def.insert_member("speed", "int32"));
        assert_eq!(def.member("speed"), Some("float64"));
        assert_eq!(def.len(), 1);
    }

    #[test]
    fn test_struct_definition_member_order() {
        let mut def = StructDefinition::new("vehicleT");
        def.insert_member("b", "bool");
        def.insert_member("a", "bool");
        def.insert_member("c", "bool");
        let names: Vec<&str> = def.members().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_topic_descriptor_resolution() {
        let topic = Topic::new("axis", Direction::Publish, "List<float64>");
        let desc = topic.descriptor().expect("descriptor");
        assert!(desc.is_list());

        let topic = Topic::new("vehicle", Direction::Publish, "vehicleT");
        let desc = topic.descriptor().expect("descriptor");
        assert_eq!(desc.custom_name(), Some("vehicleT"));
    }
}
