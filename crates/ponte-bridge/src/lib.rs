//! Execution bridge between a block-oriented host node and an embedded
//! patch engine.
//!
//! [`PatchBridge`] is the per-block orchestrator: it diffs and forwards
//! control values, translates timed MIDI/transport events between clock
//! bases, stages audio buffers, invokes the engine's processing call, and
//! captures the engine's synchronous callbacks into host-visible outputs.
//!
//! External sample assets are decoded off the real-time thread by a shared
//! [`DecodePipe`] and installed into the engine between blocks by each
//! [`ExternalDataRef`]'s `update()`.
//!
//! # Example
//!
//! ```ignore
//! use ponte_bridge::{DecodePipe, DecoderRegistry, PatchBridge};
//!
//! let pipe = Arc::new(DecodePipe::new());
//! let registry = Arc::new(DecoderRegistry::with_defaults());
//! let mut bridge = PatchBridge::new(patch, engine, 48000.0, 512, pipe, registry);
//!
//! // each block:
//! bridge.set_float_input(0, cutoff);
//! bridge.process_block(&inputs, &mut outputs, 512);
//! let env = bridge.outputs().float(3);
//! ```

pub mod error;
pub use error::{DecodeError, Result};

mod asset;
pub use asset::{AssetKey, AssetReader, AssetResource, AudioAsset};

mod decode;
pub use decode::{AssetDecoder, DecodedAudio, DecoderRegistry, SymphoniaDecoder, WavDecoder};

mod pipe;
pub use pipe::{DecodePipe, PipeConfig, TaskHandle};

mod loader;
pub use loader::{ExternalDataRef, SlotState};

mod outputs;
pub use outputs::OutputSink;

mod bridge;
pub use bridge::PatchBridge;
