// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 fmilink contributors

//! Type-descriptor grammar for interface type strings.
//!
//! Type strings appearing in topics and struct members are either a primitive
//! (with case-insensitive surface aliases, e.g. `double` == `float64`), an
//! opaque custom type name resolved later against an enum/struct catalog, or
//! a `List<...>` wrapper over another full type expression. Either form may
//! carry a trailing `?` optionality marker.

use std::fmt;
use std::str::FromStr;

/// Canonical primitive kinds after alias folding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveKind {
    Bool,
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
    Str,
}

impl PrimitiveKind {
    /// Fold a surface alias onto its canonical kind (case-insensitive).
    pub fn from_alias(name: &str) -> Option<Self> {
        let lowered = name.to_ascii_lowercase();
        match lowered.as_str() {
            "bool" | "boolean" => Some(Self::Bool),
            "int8" | "sbyte" => Some(Self::Int8),
            "uint8" | "byte" | "octet" => Some(Self::UInt8),
            "int16" | "short" => Some(Self::Int16),
            "uint16" | "ushort" => Some(Self::UInt16),
            "int32" | "int" => Some(Self::Int32),
            "uint32" | "uint" => Some(Self::UInt32),
            "int64" | "long" => Some(Self::Int64),
            "uint64" | "ulong" => Some(Self::UInt64),
            "float" | "float32" => Some(Self::Float32),
            "double" | "float64" | "real" => Some(Self::Float64),
            "string" => Some(Self::Str),
            _ => None,
        }
    }

    /// Canonical surface spelling, itself a valid alias (folding is idempotent).
    pub fn surface_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Str => "string",
        }
    }
}

/// Errors for malformed type strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeParseError {
    /// The type string (or a list element) was empty.
    Empty,
    /// A `List<` wrapper without a closing `>` or with trailing characters.
    UnterminatedList(String),
    /// Angle brackets on a name that is not the list keyword.
    MalformedWrapper(String),
    /// Whitespace-separated multi-token input.
    MultiToken(String),
    /// More than one optionality marker, or a `?` embedded in a name.
    MalformedOptional(String),
}

impl fmt::Display for TypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty type string"),
            Self::UnterminatedList(raw) => write!(f, "malformed list wrapper: '{}'", raw),
            Self::MalformedWrapper(raw) => {
                write!(f, "angle brackets without list keyword: '{}'", raw)
            }
            Self::MultiToken(raw) => write!(f, "type string is not a single token: '{}'", raw),
            Self::MalformedOptional(raw) => {
                write!(f, "misplaced optionality marker in '{}'", raw)
            }
        }
    }
}

impl std::error::Error for TypeParseError {}

/// The resolved shape of a type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DescriptorKind {
    /// Canonical primitive.
    Primitive(PrimitiveKind),
    /// Unknown name kept opaque for later catalog resolution.
    Custom(String),
    /// `List<...>` over another full type expression (lists nest).
    List(Box<TypeDescriptor>),
}

/// Parsed type expression: a kind plus the optionality flag.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDescriptor {
    pub optional: bool,
    pub kind: DescriptorKind,
}

impl TypeDescriptor {
    /// Parse a type string such as `double`, `MyEnum?` or `List<float?>`.
    ///
    /// Surrounding whitespace on the whole input is trimmed; whitespace
    /// between tokens (inside the list wrapper, before the `?` marker) is a
    /// grammar error.
    pub fn parse(raw: &str) -> Result<Self, TypeParseError> {
        Self::parse_exact(raw.trim())
    }

    fn parse_exact(raw: &str) -> Result<Self, TypeParseError> {
        if raw.is_empty() {
            return Err(TypeParseError::Empty);
        }

        let (base, optional) = match raw.strip_suffix('?') {
            Some(inner) => (inner, true),
            None => (raw, false),
        };
        if base.is_empty() {
            return Err(TypeParseError::Empty);
        }

        let has_list_keyword = base
            .get(..5)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("list<"));
        if has_list_keyword {
            if !base.ends_with('>') {
                return Err(TypeParseError::UnterminatedList(raw.to_string()));
            }
            let element = Self::parse_exact(&base[5..base.len() - 1])?;
            return Ok(Self {
                optional,
                kind: DescriptorKind::List(Box::new(element)),
            });
        }

        if base.contains(['<', '>']) {
            return Err(TypeParseError::MalformedWrapper(raw.to_string()));
        }
        if base.chars().any(char::is_whitespace) {
            return Err(TypeParseError::MultiToken(raw.to_string()));
        }
        if base.contains('?') {
            return Err(TypeParseError::MalformedOptional(raw.to_string()));
        }

        let kind = match PrimitiveKind::from_alias(base) {
            Some(primitive) => DescriptorKind::Primitive(primitive),
            None => DescriptorKind::Custom(base.to_string()),
        };
        Ok(Self { optional, kind })
    }

    /// True for `DescriptorKind::Primitive`.
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, DescriptorKind::Primitive(_))
    }

    /// True for `DescriptorKind::List`.
    pub fn is_list(&self) -> bool {
        matches!(self.kind, DescriptorKind::List(_))
    }

    /// Opaque custom type name, if any.
    pub fn custom_name(&self) -> Option<&str> {
        match &self.kind {
            DescriptorKind::Custom(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    /// Canonical rendering; re-parsing the output yields an equal descriptor.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DescriptorKind::Primitive(primitive) => write!(f, "{}", primitive.surface_name())?,
            DescriptorKind::Custom(name) => write!(f, "{}", name)?,
            DescriptorKind::List(element) => write!(f, "List<{}>", element)?,
        }
        if self.optional {
            write!(f, "?")?;
        }
        Ok(())
    }
}

impl FromStr for TypeDescriptor {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
