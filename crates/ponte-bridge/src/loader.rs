//! Per-reference external data loading.
//!
//! Each declared external data reference owns one [`ExternalDataRef`]. Once
//! per block the bridge calls [`ExternalDataRef::update`], which is the only
//! place the engine's external-data slots are ever mutated; background tasks
//! just decode and stage. Change detection is identity-based: a reload is
//! launched only when the bound asset's key differs from the last-launched
//! one, so repeated updates with the same asset are free.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use ponte_engine::{ExternalData, PatchEngine};
use ponte_patch::DataRefIndex;

use crate::asset::{AssetKey, AudioAsset};
use crate::decode::{DecodedAudio, DecoderRegistry};
use crate::error::{DecodeError, Result};
use crate::pipe::{DecodePipe, TaskHandle};

/// Lifecycle state of one external-data slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Nothing installed yet.
    Idle,
    /// A decoded buffer is installed and current.
    Installed,
    /// A decode task is in flight or staged data awaits installation.
    Reloading,
}

/// Result of a finished decode, parked until the next `update()`.
struct StagedData {
    key: AssetKey,
    data: ExternalData,
}

/// One engine external-data slot and its loading pipeline.
pub struct ExternalDataRef {
    slot: DataRefIndex,
    id: Arc<str>,
    asset: Option<Arc<dyn AudioAsset>>,
    /// Identity of the last asset a decode was launched for.
    pending_key: Option<AssetKey>,
    /// Identity of the last asset actually installed into the engine.
    installed_key: Option<AssetKey>,
    staged: Arc<ArcSwapOption<StagedData>>,
    task: Option<TaskHandle>,
    /// Superseded tasks still draining; joined on drop. Completed entries are
    /// deliberately not pruned during normal operation.
    cleanup: Vec<TaskHandle>,
    pipe: Arc<DecodePipe>,
    registry: Arc<DecoderRegistry>,
}

impl ExternalDataRef {
    pub fn new(
        slot: DataRefIndex,
        id: &str,
        pipe: Arc<DecodePipe>,
        registry: Arc<DecoderRegistry>,
    ) -> Self {
        Self {
            slot,
            id: id.into(),
            asset: None,
            pending_key: None,
            installed_key: None,
            staged: Arc::new(ArcSwapOption::empty()),
            task: None,
            cleanup: Vec::new(),
            pipe,
            registry,
        }
    }

    pub fn slot(&self) -> DataRefIndex {
        self.slot
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Bind the host-side asset handle feeding this slot. `None` detaches.
    pub fn bind(&mut self, asset: Option<Arc<dyn AudioAsset>>) {
        self.asset = asset;
    }

    pub fn state(&self) -> SlotState {
        let reloading = self.staged.load().is_some()
            || self.task.as_ref().map(|t| !t.is_complete()).unwrap_or(false);
        if reloading {
            SlotState::Reloading
        } else if self.installed_key.is_some() {
            SlotState::Installed
        } else {
            SlotState::Idle
        }
    }

    /// Identity of the buffer currently installed in the engine, if any.
    pub fn installed_key(&self) -> Option<AssetKey> {
        self.installed_key
    }

    /// Superseded tasks awaiting teardown.
    pub fn cleanup_len(&self) -> usize {
        self.cleanup.len()
    }

    /// Per-block pump: install finished decodes, detect asset changes,
    /// launch reloads. Never blocks; all engine mutation happens here, on
    /// the calling thread.
    pub fn update<E: PatchEngine>(&mut self, engine: &mut E) {
        if let Some(staged) = self.staged.swap(None) {
            engine.set_external_data(self.slot, staged.data.clone());
            self.installed_key = Some(staged.key);
        }

        let Some(asset) = self.asset.as_ref() else {
            return;
        };
        let key = asset.key();
        if self.pending_key == Some(key) {
            return;
        }
        self.pending_key = Some(key);

        if let Some(task) = self.task.take() {
            if !task.is_complete() {
                self.cleanup.push(task);
            }
        }

        let asset = Arc::clone(asset);
        let registry = Arc::clone(&self.registry);
        let staged = Arc::clone(&self.staged);
        let id = Arc::clone(&self.id);
        self.task = Some(
            self.pipe
                .spawn(move || run_decode(&asset, &registry, &staged, &id, key)),
        );
    }
}

impl Drop for ExternalDataRef {
    fn drop(&mut self) {
        // Join every outstanding task before any captured buffer can be
        // released; a task must never outlive the reference that spawned it.
        if let Some(task) = self.task.take() {
            self.cleanup.push(task);
        }
        for task in &self.cleanup {
            if !task.is_complete() {
                task.wait();
            }
        }
    }
}

fn run_decode(
    asset: &Arc<dyn AudioAsset>,
    registry: &DecoderRegistry,
    staged: &ArcSwapOption<StagedData>,
    id: &str,
    key: AssetKey,
) {
    let decoded = match decode_asset(asset, registry) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::error!(slot = id, error = %e, "external data load failed; slot keeps its previous data");
            return;
        }
    };

    // Normalize 16-bit integer samples to floating point in [-1, 1].
    let div = f32::from(i16::MAX);
    let samples: Vec<f32> = decoded.pcm.iter().map(|&s| f32::from(s) / div).collect();

    tracing::debug!(
        slot = id,
        frames = decoded.frames(),
        channels = asset.channels(),
        "external data decoded"
    );

    staged.store(Some(Arc::new(StagedData {
        key,
        data: ExternalData {
            samples: samples.into(),
            channels: asset.channels(),
            sample_rate: asset.sample_rate(),
        },
    })));
}

fn decode_asset(asset: &Arc<dyn AudioAsset>, registry: &DecoderRegistry) -> Result<DecodedAudio> {
    let format = asset.format();
    let decoder = registry
        .find(format)
        .ok_or_else(|| DecodeError::UnknownFormat(format.to_string()))?;
    let resource = asset.open()?;
    decoder.decode(resource)
}
