// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 fmilink contributors

//! # fmilink - model-description to DDS interface synthesis
//!
//! Transforms the flat, namespaced variable list of an FMI-style simulation
//! component into a publish/subscribe interface description: topics plus
//! nested struct type definitions derived from the dotted (optionally
//! quoted) variable names.
//!
//! ## Quick Start
//!
//! ```rust
//! use fmilink::{Causality, InterfaceBuilder, ScalarKind, VariableDescriptor};
//!
//! let variables = [
//!     VariableDescriptor::new("vehicle.engine.rpm", Causality::Output, ScalarKind::Float64),
//!     VariableDescriptor::new("vehicle.brake", Causality::Output, ScalarKind::Boolean),
//!     VariableDescriptor::new("command.throttle", Causality::Input, ScalarKind::Float64),
//! ];
//!
//! let document = InterfaceBuilder::new(&[]).build(&variables)?;
//! assert_eq!(document.publishers[0].type_name, "vehicleT");
//! assert_eq!(document.subscribers[0].name, "command");
//!
//! let mut flattener = document.flattener();
//! let flat = flattener.flatten("vehicleT")?;
//! assert_eq!(flat[0].qualified_name, "engine.rpm");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! variable list -> InterfaceBuilder -> topics + struct catalog -> StructFlattener
//!                  (StructuredName + TypeDescriptor grammars)      (qualified leaves)
//! ```
//!
//! Loading the model description, rendering the produced document, and any
//! runtime transport are external collaborators; this crate is a pure,
//! deterministic transformation over one immutable input snapshot.

pub mod interface;
pub mod model;
pub mod structured_name;
pub mod type_descriptor;

pub use interface::{
    BuildError, BuilderConfig, DiagnosticSink, Direction, FlattenError, FlattenedMember,
    InterfaceBuilder, InterfaceDocument, LogSink, StructCatalog, StructDefinition,
    StructFlattener, Topic, FORMAT_VERSION,
};
pub use model::{Causality, EnumDefinition, EnumItem, ScalarKind, VariableDescriptor};
pub use structured_name::{NameParseError, StructuredName};
pub use type_descriptor::{DescriptorKind, PrimitiveKind, TypeDescriptor, TypeParseError};
