//! # Ponte - patch-engine bridge
//!
//! Real-time bridge between a pull-based, block-oriented host audio-graph
//! node and an embedded, event-driven patch engine.
//!
//! ## Architecture
//!
//! Ponte is an umbrella crate coordinating:
//! - **ponte-patch** - descriptor introspection: parameter/port
//!   classification compiled once per patch type
//! - **ponte-engine** - the engine capability interface, timed events, and
//!   time-base conversion between engine milliseconds and host sample
//!   offsets
//! - **ponte-bridge** - the per-block execution bridge, the engine callback
//!   surface, and the asynchronous external-data loading pipeline
//!
//! ## Per-block data flow
//!
//! The host delivers input values and buffers; the bridge diffs and forwards
//! them into the engine, converts timed MIDI/transport events between clock
//! bases, invokes the engine's processing call, and captures the engine's
//! synchronous callbacks into host-visible outputs. Sample assets decode on
//! a background pipe and are installed into the engine between blocks.
//!
//! ## Quick start
//!
//! ```ignore
//! use ponte::prelude::*;
//!
//! let desc = PatchDescriptor::from_json(&descriptor_json)?;
//! let patch = Arc::new(CompiledPatch::compile(&desc)?);
//!
//! let pipe = Arc::new(DecodePipe::new());
//! let registry = Arc::new(DecoderRegistry::with_defaults());
//! let mut bridge = PatchBridge::new(patch, engine, 48000.0, 512, pipe, registry);
//!
//! // once per block:
//! bridge.set_float_input(0, cutoff);
//! bridge.process_block(&inputs, &mut outputs, 512);
//! ```

/// Re-export of ponte-patch for direct access
pub use ponte_patch as patch;

/// Re-export of ponte-engine for direct access
pub use ponte_engine as engine;

/// Re-export of ponte-bridge for direct access
pub use ponte_bridge as bridge;

// Descriptor introspection
pub use ponte_patch::{
    CompiledPatch, DataRefIndex, ExternalDataDesc, MessageTag, ParamInfo, ParamKind,
    ParameterDesc, ParameterIndex, PatchDescriptor, PortInfo, SchemaError, SignalInfo,
};

// Engine interface
pub use ponte_engine::{
    EngineEvent, EventTarget, ExternalData, MessagePayload, MidiBuffer, MidiBytes, MidiPacket,
    MillisecondTime, PatchEngine, SampleOffset, TimeConverter, TimeSignature, Transport,
    TriggerBuffer,
};

// Execution bridge and loading pipeline
pub use ponte_bridge::{
    AssetDecoder, AssetKey, AssetReader, AssetResource, AudioAsset, DecodeError, DecodePipe,
    DecodedAudio, DecoderRegistry, ExternalDataRef, OutputSink, PatchBridge, PipeConfig,
    SlotState, SymphoniaDecoder, TaskHandle, WavDecoder,
};

mod error;
pub use error::{Error, Result};

/// Common imports for bridge hosts.
pub mod prelude {
    pub use crate::{
        AudioAsset, CompiledPatch, DecodePipe, DecoderRegistry, Error, MessageTag, PatchBridge,
        PatchDescriptor, PatchEngine, Result, Transport,
    };
    pub use std::sync::Arc;
}
