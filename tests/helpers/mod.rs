//! Shared test doubles: a scriptable fake engine, in-memory assets, and
//! instrumented decoders.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ponte::{
    AssetDecoder, AssetKey, AssetResource, AudioAsset, CompiledPatch, DataRefIndex, DecodeError,
    DecodedAudio, EngineEvent, EventTarget, ExternalData, MessagePayload, MessageTag,
    MillisecondTime, ParameterIndex, PatchDescriptor, PatchEngine,
};

/// A callback the fake engine raises during its next processing call.
pub enum Upcall {
    Parameter {
        index: ParameterIndex,
        time: MillisecondTime,
        value: f64,
    },
    Message {
        tag: MessageTag,
        time: MillisecondTime,
        payload: MessagePayload,
    },
    Midi {
        time: MillisecondTime,
        bytes: Vec<u8>,
    },
}

/// Recording fake of the embedded patch engine.
///
/// Parameters start unset (`NaN`), so the first forwarded value always
/// differs from the cache, exactly like a freshly prepared engine.
/// `process` copies inputs to outputs, advances the millisecond clock by
/// one block, and raises any queued upcalls.
pub struct FakeEngine {
    sample_rate: f64,
    now_ms: f64,
    params: HashMap<ParameterIndex, f64>,

    pub events: Vec<EngineEvent>,
    pub messages: Vec<(MessageTag, MillisecondTime, MessagePayload)>,
    pub param_sets: Vec<(ParameterIndex, f64)>,
    pub external: HashMap<DataRefIndex, ExternalData>,
    pub upcalls: VecDeque<Upcall>,
    pub processed_blocks: usize,
}

impl FakeEngine {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            now_ms: 0.0,
            params: HashMap::new(),
            events: Vec::new(),
            messages: Vec::new(),
            param_sets: Vec::new(),
            external: HashMap::new(),
            upcalls: VecDeque::new(),
            processed_blocks: 0,
        }
    }

    pub fn with_time(sample_rate: f64, now_ms: f64) -> Self {
        let mut engine = Self::new(sample_rate);
        engine.now_ms = now_ms;
        engine
    }

    pub fn queue_upcall(&mut self, upcall: Upcall) {
        self.upcalls.push_back(upcall);
    }

    pub fn transport_events(&self) -> Vec<&EngineEvent> {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    EngineEvent::BeatTime { .. }
                        | EngineEvent::Tempo { .. }
                        | EngineEvent::TransportState { .. }
                        | EngineEvent::TimeSignature { .. }
                )
            })
            .collect()
    }
}

impl PatchEngine for FakeEngine {
    fn prepare(&mut self, sample_rate: f64, _block_size: usize) {
        self.sample_rate = sample_rate;
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn current_time(&self) -> MillisecondTime {
        self.now_ms
    }

    fn parameter_value(&self, index: ParameterIndex) -> f64 {
        self.params.get(&index).copied().unwrap_or(f64::NAN)
    }

    fn set_parameter_value(&mut self, index: ParameterIndex, value: f64) {
        self.params.insert(index, value);
        self.param_sets.push((index, value));
    }

    fn schedule_event(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    fn send_message(&mut self, tag: MessageTag, time: MillisecondTime, payload: MessagePayload) {
        self.messages.push((tag, time, payload));
    }

    fn set_external_data(&mut self, slot: DataRefIndex, data: ExternalData) {
        self.external.insert(slot, data);
    }

    fn process(
        &mut self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        frames: usize,
        events: &mut dyn EventTarget,
    ) {
        for (i, out) in outputs.iter_mut().enumerate() {
            if let Some(input) = inputs.get(i) {
                out[..frames].copy_from_slice(&input[..frames]);
            }
        }

        while let Some(upcall) = self.upcalls.pop_front() {
            match upcall {
                Upcall::Parameter { index, time, value } => {
                    events.handle_parameter_event(index, time, value)
                }
                Upcall::Message { tag, time, payload } => {
                    events.handle_message_event(tag, time, &payload)
                }
                Upcall::Midi { time, bytes } => events.handle_midi_event(time, &bytes),
            }
        }

        self.now_ms += frames as f64 * 1000.0 / self.sample_rate;
        self.processed_blocks += 1;
    }
}

/// In-memory asset handle with an explicit identity key.
pub struct TestAsset {
    pub key: u64,
    pub format: String,
    pub sample_rate: f64,
    pub channels: usize,
    pub bytes: Vec<u8>,
}

impl TestAsset {
    pub fn new(key: u64, format: &str) -> Arc<Self> {
        Arc::new(Self {
            key,
            format: format.to_string(),
            sample_rate: 48000.0,
            channels: 1,
            bytes: Vec::new(),
        })
    }
}

impl AudioAsset for TestAsset {
    fn key(&self) -> AssetKey {
        AssetKey(self.key)
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn format(&self) -> &str {
        &self.format
    }

    fn open(&self) -> std::io::Result<AssetResource> {
        Ok(AssetResource::Bytes(self.bytes.clone()))
    }
}

pub const TEST_PCM: [i16; 4] = [0, 8192, -8192, 16384];

/// Decoder returning a fixed PCM buffer and counting invocations.
pub struct CountingDecoder {
    pub calls: Arc<AtomicUsize>,
}

impl CountingDecoder {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl AssetDecoder for CountingDecoder {
    fn decode(&self, _resource: AssetResource) -> Result<DecodedAudio, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(DecodedAudio {
            pcm: TEST_PCM.to_vec(),
            channels: 1,
            sample_rate: 48000.0,
        })
    }
}

/// Decoder that parks on a gate channel until the test releases it.
pub struct BlockingDecoder {
    pub gate: crossbeam_channel::Receiver<()>,
    pub calls: Arc<AtomicUsize>,
}

impl BlockingDecoder {
    pub fn new() -> (Self, crossbeam_channel::Sender<()>, Arc<AtomicUsize>) {
        let (gate_tx, gate_rx) = crossbeam_channel::unbounded();
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                gate: gate_rx,
                calls: Arc::clone(&calls),
            },
            gate_tx,
            calls,
        )
    }
}

impl AssetDecoder for BlockingDecoder {
    fn decode(&self, _resource: AssetResource) -> Result<DecodedAudio, DecodeError> {
        let _ = self.gate.recv();
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(DecodedAudio {
            pcm: TEST_PCM.to_vec(),
            channels: 1,
            sample_rate: 48000.0,
        })
    }
}

/// Decoder that always fails.
pub struct FailingDecoder {
    pub calls: Arc<AtomicUsize>,
}

impl FailingDecoder {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl AssetDecoder for FailingDecoder {
    fn decode(&self, _resource: AssetResource) -> Result<DecodedAudio, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DecodeError::NoTrack)
    }
}

/// Compile a descriptor from JSON, panicking on malformed test input.
pub fn compile(json: &str) -> Arc<CompiledPatch> {
    let desc = PatchDescriptor::from_json(json).expect("test descriptor parses");
    Arc::new(CompiledPatch::compile(&desc).expect("test descriptor compiles"))
}

/// Poll `predicate` until it holds or ~2 s elapse.
pub fn wait_until(mut predicate: impl FnMut() -> bool) -> bool {
    for _ in 0..2000 {
        if predicate() {
            return true;
        }
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
    false
}
