// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 fmilink contributors

//! Interface synthesis from the ordered variable list.
//!
//! The builder walks each variable's structured name, emits one topic per
//! distinct root per direction, and grows the struct catalog one path level
//! at a time. All accumulators are builder-local; first-encounter order is
//! preserved everywhere and the result is fully deterministic.

use crate::interface::{
    DiagnosticSink, Direction, InterfaceDocument, LogSink, StructCatalog, StructDefinition, Topic,
    FORMAT_VERSION,
};
use crate::model::{EnumDefinition, ScalarKind, VariableDescriptor};
use crate::structured_name::{NameParseError, StructuredName};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// Tunables for interface synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuilderConfig {
    /// Marker appended to an accumulated dotted path to form the generated
    /// struct name (`vehicle.engine` -> `vehicle.engineT`).
    pub struct_marker: String,
    /// Format version stamped into the produced document.
    pub format_version: u32,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            struct_marker: "T".to_string(),
            format_version: FORMAT_VERSION,
        }
    }
}

/// Failure modes of interface synthesis. Any failure aborts the whole run;
/// no partial document is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A variable name violated the structured-name grammar.
    Name(NameParseError),
    /// A variable declared a kind with no interface representation.
    UnsupportedKind { variable: String, kind: ScalarKind },
    /// An enumeration variable without a resolvable enum definition.
    UndefinedEnum {
        variable: String,
        type_name: Option<String>,
    },
    /// A root used both as a depth-1 scalar topic and as a struct root
    /// within the same direction.
    ConflictingRoot { root: String, direction: Direction },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(err) => write!(f, "invalid variable name: {}", err),
            Self::UnsupportedKind { variable, kind } => {
                write!(f, "variable '{}' has unsupported kind '{}'", variable, kind)
            }
            Self::UndefinedEnum {
                variable,
                type_name,
            } => match type_name {
                Some(type_name) => write!(
                    f,
                    "variable '{}' references undefined enum type '{}'",
                    variable, type_name
                ),
                None => write!(
                    f,
                    "enumeration variable '{}' declares no enum type",
                    variable
                ),
            },
            Self::ConflictingRoot { root, direction } => write!(
                f,
                "root '{}' is used both as a scalar topic and as a struct root in the {} list",
                root, direction
            ),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Name(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NameParseError> for BuildError {
    fn from(err: NameParseError) -> Self {
        Self::Name(err)
    }
}

/// How a topic root has been seen so far within one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootKind {
    Scalar,
    Struct,
}

/// Synthesizes an [`InterfaceDocument`] from the ordered variable list.
pub struct InterfaceBuilder<'a> {
    config: BuilderConfig,
    enums: &'a [EnumDefinition],
    publishers: Vec<Topic>,
    subscribers: Vec<Topic>,
    structs: StructCatalog,
    roots: HashMap<(Direction, String), RootKind>,
    used_enums: IndexMap<String, EnumDefinition>,
}

impl<'a> InterfaceBuilder<'a> {
    /// Builder with the default configuration.
    pub fn new(enums: &'a [EnumDefinition]) -> Self {
        Self::with_config(enums, BuilderConfig::default())
    }

    pub fn with_config(enums: &'a [EnumDefinition], config: BuilderConfig) -> Self {
        Self {
            config,
            enums,
            publishers: Vec::new(),
            subscribers: Vec::new(),
            structs: StructCatalog::new(),
            roots: HashMap::new(),
            used_enums: IndexMap::new(),
        }
    }

    /// Run synthesis, sending diagnostics to `log::debug!`.
    pub fn build(
        self,
        variables: &[VariableDescriptor],
    ) -> Result<InterfaceDocument, BuildError> {
        let mut sink = LogSink;
        self.build_with(variables, &mut sink)
    }

    /// Run synthesis with an explicit diagnostic sink.
    pub fn build_with(
        mut self,
        variables: &[VariableDescriptor],
        sink: &mut dyn DiagnosticSink,
    ) -> Result<InterfaceDocument, BuildError> {
        for variable in variables {
            if !variable.causality.is_synthesized() {
                sink.report(&format!(
                    "skipping '{}' ({})",
                    variable.name, variable.causality
                ));
                continue;
            }
            self.add_variable(variable, sink)?;
        }

        let mut document = InterfaceDocument::new(self.config.format_version);
        document.enums = self.used_enums.into_values().collect();
        document.structs = self.structs;
        document.publishers = self.publishers;
        document.subscribers = self.subscribers;
        Ok(document)
    }

    fn add_variable(
        &mut self,
        variable: &VariableDescriptor,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), BuildError> {
        let path = StructuredName::parse(&variable.name)?;
        let type_name = self.surface_type(variable)?;
        let direction = Direction::for_causality(variable.causality);
        let root = path.root().to_string();

        if path.is_root_only() {
            self.add_scalar_topic(root, direction, type_name, sink)
        } else {
            self.add_struct_path(&path, root, direction, type_name, sink)
        }
    }

    /// Depth-1 path: the root itself is the topic, typed directly.
    fn add_scalar_topic(
        &mut self,
        root: String,
        direction: Direction,
        type_name: String,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), BuildError> {
        match self.roots.get(&(direction, root.clone())) {
            None => {
                self.roots
                    .insert((direction, root.clone()), RootKind::Scalar);
                self.topics_mut(direction)
                    .push(Topic::new(root, direction, type_name));
                Ok(())
            }
            Some(RootKind::Scalar) => {
                sink.report(&format!(
                    "duplicate scalar topic '{}' in {} list ignored (first write wins)",
                    root, direction
                ));
                Ok(())
            }
            Some(RootKind::Struct) => Err(BuildError::ConflictingRoot { root, direction }),
        }
    }

    /// Depth >= 2 path: one struct topic per root, then a struct chain keyed
    /// by the accumulated dotted path.
    fn add_struct_path(
        &mut self,
        path: &StructuredName,
        root: String,
        direction: Direction,
        type_name: String,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), BuildError> {
        let root_struct = self.generated_name(&root);
        match self.roots.get(&(direction, root.clone())) {
            None => {
                self.roots
                    .insert((direction, root.clone()), RootKind::Struct);
                self.topics_mut(direction)
                    .push(Topic::new(root.clone(), direction, root_struct.clone()));
            }
            Some(RootKind::Struct) => {} // topic already emitted for this root
            Some(RootKind::Scalar) => {
                return Err(BuildError::ConflictingRoot { root, direction });
            }
        }

        self.ensure_struct(&root_struct);

        let segments = path.segments();
        let mut key = root;
        let mut parent = root_struct;
        for segment in &segments[1..segments.len() - 1] {
            key.push('.');
            key.push_str(segment);
            let child = self.generated_name(&key);
            self.insert_member(&parent, segment, &child, sink);
            self.ensure_struct(&child);
            parent = child;
        }

        let leaf = &segments[segments.len() - 1];
        self.insert_member(&parent, leaf, &type_name, sink);
        Ok(())
    }

    /// Surface type string for a variable: the canonical primitive spelling
    /// (or declared enum name), list-wrapped for array-valued variables.
    fn surface_type(&mut self, variable: &VariableDescriptor) -> Result<String, BuildError> {
        let base = match variable.kind {
            ScalarKind::Enumeration => {
                let type_name = variable.declared_type.as_deref().ok_or_else(|| {
                    BuildError::UndefinedEnum {
                        variable: variable.name.clone(),
                        type_name: None,
                    }
                })?;
                let definition = self
                    .enums
                    .iter()
                    .find(|definition| definition.name == type_name)
                    .ok_or_else(|| BuildError::UndefinedEnum {
                        variable: variable.name.clone(),
                        type_name: Some(type_name.to_string()),
                    })?;
                if !self.used_enums.contains_key(type_name) {
                    self.used_enums
                        .insert(type_name.to_string(), definition.clone());
                }
                type_name.to_string()
            }
            kind => match kind.primitive() {
                Some(primitive) => primitive.surface_name().to_string(),
                None => {
                    return Err(BuildError::UnsupportedKind {
                        variable: variable.name.clone(),
                        kind,
                    })
                }
            },
        };

        Ok(if variable.is_scalar {
            base
        } else {
            format!("List<{}>", base)
        })
    }

    fn generated_name(&self, key: &str) -> String {
        format!("{}{}", key, self.config.struct_marker)
    }

    fn ensure_struct(&mut self, name: &str) {
        if !self.structs.contains_key(name) {
            self.structs
                .insert(name.to_string(), StructDefinition::new(name));
        }
    }

    fn insert_member(
        &mut self,
        parent: &str,
        member: &str,
        type_name: &str,
        sink: &mut dyn DiagnosticSink,
    ) {
        if let Some(definition) = self.structs.get_mut(parent) {
            if !definition.insert_member(member, type_name)
                && definition.member(member) != Some(type_name)
            {
                sink.report(&format!(
                    "member '{}' of '{}' already defined; keeping first type",
                    member, parent
                ));
            }
        }
    }

    fn topics_mut(&mut self, direction: Direction) -> &mut Vec<Topic> {
        match direction {
            Direction::Publish => &mut self.publishers,
            Direction::Subscribe => &mut self.subscribers,
        }
    }
}
