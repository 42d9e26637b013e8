// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 fmilink contributors

//! Input contract: the variable and enum records handed over by the external
//! model-description loader.
//!
//! These types are created once from the deserialized model description and
//! never mutated by interface synthesis.

use crate::type_descriptor::PrimitiveKind;
use std::fmt;

/// Declared data-flow role of a model variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Causality {
    Input,
    Output,
    Parameter,
    CalculatedParameter,
    Local,
    Independent,
    StructuralParameter,
}

impl Causality {
    /// Variables with `Local` or `CalculatedParameter` causality are neither
    /// published nor subscribed and are excluded from synthesis.
    pub fn is_synthesized(self) -> bool {
        !matches!(self, Self::Local | Self::CalculatedParameter)
    }
}

impl fmt::Display for Causality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Parameter => "parameter",
            Self::CalculatedParameter => "calculatedParameter",
            Self::Local => "local",
            Self::Independent => "independent",
            Self::StructuralParameter => "structuralParameter",
        };
        write!(f, "{}", label)
    }
}

/// Scalar value kind a model variable may declare.
///
/// `Binary` and `Clock` exist in the input contract but have no interface
/// representation; encountering one aborts synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalarKind {
    Boolean,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    String,
    Enumeration,
    Binary,
    Clock,
}

impl ScalarKind {
    /// Canonical primitive for this kind; `None` for `Enumeration` (resolved
    /// through the declared type name) and for the unsupported kinds.
    pub fn primitive(self) -> Option<PrimitiveKind> {
        match self {
            Self::Boolean => Some(PrimitiveKind::Bool),
            Self::Int8 => Some(PrimitiveKind::Int8),
            Self::UInt8 => Some(PrimitiveKind::UInt8),
            Self::Int16 => Some(PrimitiveKind::Int16),
            Self::UInt16 => Some(PrimitiveKind::UInt16),
            Self::Int32 => Some(PrimitiveKind::Int32),
            Self::UInt32 => Some(PrimitiveKind::UInt32),
            Self::Int64 => Some(PrimitiveKind::Int64),
            Self::UInt64 => Some(PrimitiveKind::UInt64),
            Self::Float32 => Some(PrimitiveKind::Float32),
            Self::Float64 => Some(PrimitiveKind::Float64),
            Self::String => Some(PrimitiveKind::Str),
            Self::Enumeration | Self::Binary | Self::Clock => None,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Enumeration => "enumeration",
            Self::Binary => "binary",
            Self::Clock => "clock",
            Self::Boolean => PrimitiveKind::Bool.surface_name(),
            Self::Int8 => PrimitiveKind::Int8.surface_name(),
            Self::UInt8 => PrimitiveKind::UInt8.surface_name(),
            Self::Int16 => PrimitiveKind::Int16.surface_name(),
            Self::UInt16 => PrimitiveKind::UInt16.surface_name(),
            Self::Int32 => PrimitiveKind::Int32.surface_name(),
            Self::UInt32 => PrimitiveKind::UInt32.surface_name(),
            Self::Int64 => PrimitiveKind::Int64.surface_name(),
            Self::UInt64 => PrimitiveKind::UInt64.surface_name(),
            Self::Float32 => PrimitiveKind::Float32.surface_name(),
            Self::Float64 => PrimitiveKind::Float64.surface_name(),
            Self::String => PrimitiveKind::Str.surface_name(),
        };
        write!(f, "{}", label)
    }
}

/// One typed I/O variable of the simulation component.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableDescriptor {
    /// Raw structured name, still unparsed.
    pub name: String,
    pub causality: Causality,
    pub kind: ScalarKind,
    /// False for array-valued variables, which surface as `List<...>`.
    pub is_scalar: bool,
    /// Custom (enum) type name; required when `kind` is `Enumeration`.
    pub declared_type: Option<String>,
}

impl VariableDescriptor {
    pub fn new(name: impl Into<String>, causality: Causality, kind: ScalarKind) -> Self {
        Self {
            name: name.into(),
            causality,
            kind,
            is_scalar: true,
            declared_type: None,
        }
    }

    /// Mark as array-valued.
    pub fn as_list(mut self) -> Self {
        self.is_scalar = false;
        self
    }

    /// Attach the declared custom type name.
    pub fn with_declared_type(mut self, type_name: impl Into<String>) -> Self {
        self.declared_type = Some(type_name.into());
        self
    }
}

/// One item of an enumeration definition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumItem {
    pub name: String,
    pub value: i64,
}

impl EnumItem {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Named enumeration with its ordered items.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumDefinition {
    pub name: String,
    pub items: Vec<EnumItem>,
}

impl EnumDefinition {
    pub fn new(name: impl Into<String>, items: Vec<EnumItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    /// Look up an item by name.
    pub fn item(&self, name: &str) -> Option<&EnumItem> {
        self.items.iter().find(|item| item.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_causality_synthesis_filter() {
        assert!(Causality::Input.is_synthesized());
        assert!(Causality::Output.is_synthesized());
        assert!(Causality::Parameter.is_synthesized());
        assert!(Causality::StructuralParameter.is_synthesized());
        assert!(!Causality::Local.is_synthesized());
        assert!(!Causality::CalculatedParameter.is_synthesized());
    }

    #[test]
    fn test_scalar_kind_primitive_mapping() {
        assert_eq!(ScalarKind::Float64.primitive(), Some(PrimitiveKind::Float64));
        assert_eq!(ScalarKind::Boolean.primitive(), Some(PrimitiveKind::Bool));
        assert_eq!(ScalarKind::Enumeration.primitive(), None);
        assert_eq!(ScalarKind::Binary.primitive(), None);
    }

    #[test]
    fn test_scalar_kind_display_matches_surface_names() {
        assert_eq!(ScalarKind::Boolean.to_string(), "bool");
        assert_eq!(ScalarKind::UInt8.to_string(), "uint8");
        assert_eq!(ScalarKind::Float64.to_string(), "float64");
        assert_eq!(ScalarKind::String.to_string(), "string");
        assert_eq!(ScalarKind::Enumeration.to_string(), "enumeration");
        assert_eq!(ScalarKind::Binary.to_string(), "binary");
        assert_eq!(ScalarKind::Clock.to_string(), "clock");
    }

    #[test]
    fn test_enum_definition_lookup() {
        let def = EnumDefinition::new(
            "Gear",
            vec![EnumItem::new("PARK", 0), EnumItem::new("DRIVE", 3)],
        );
        assert_eq!(def.item("DRIVE").map(|item| item.value), Some(3));
        assert!(def.item("REVERSE").is_none());
    }
}
