//! Engine-facing interface for the ponte bridge.
//!
//! The patch engine is an opaque collaborator: this crate defines the
//! capability trait the bridge calls ([`PatchEngine`]), the timed events that
//! cross in both directions, the engine→bridge upcall surface
//! ([`EventTarget`]), and the per-block time-base converter between the
//! engine's millisecond clock and the host's sample-offset clock.
//!
//! It also carries the small block-scoped containers the bridge owns on the
//! host side: [`MidiBuffer`], [`TriggerBuffer`] and the [`Transport`] value.

mod engine;
pub use engine::{ExternalData, PatchEngine};

mod events;
pub use events::{EngineEvent, EventTarget, MessagePayload, MidiBytes};

mod time;
pub use time::TimeConverter;

mod midi;
pub use midi::{MidiBuffer, MidiPacket};

mod transport;
pub use transport::{TimeSignature, Transport};

mod trigger;
pub use trigger::TriggerBuffer;

/// Engine-clock timestamp in milliseconds.
pub type MillisecondTime = f64;

/// Host-clock position in samples relative to the current block.
pub type SampleOffset = i64;
