//! Patch descriptor model and introspection for the ponte bridge.
//!
//! A patch ships with a JSON description of everything it exposes:
//! numeric parameters, message ports, signal inlets/outlets, external data
//! references, and MIDI/transport capabilities. This crate parses that
//! document and compiles it into the classification tables the execution
//! bridge consumes.
//!
//! # Example
//!
//! ```ignore
//! use ponte_patch::{CompiledPatch, PatchDescriptor};
//!
//! let desc: PatchDescriptor = serde_json::from_str(&json)?;
//! let patch = CompiledPatch::compile(&desc)?;
//!
//! for param in patch.input_floats() {
//!     println!("{} starts at {}", param.name, param.initial_value);
//! }
//! ```

pub mod error;
pub use error::{Result, SchemaError};

mod descriptor;
pub use descriptor::{
    ExternalDataRefDesc, ParamMeta, ParameterDesc, PatchDescriptor, PatchMeta, PortDesc,
    SignalDesc, SignalMeta,
};

mod classify;
pub use classify::{is_bool_param, is_float_param, is_input_param, is_int_param, is_output_param};

mod compiled;
pub use compiled::{CompiledPatch, ExternalDataDesc, ParamInfo, ParamKind, PortInfo, SignalInfo};

mod tag;
pub use tag::MessageTag;

/// Stable index of a numeric parameter within a patch.
pub type ParameterIndex = usize;

/// Index of an external data slot within the engine.
pub type DataRefIndex = usize;
