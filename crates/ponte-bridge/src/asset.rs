//! Host asset handles consumed by the external-data loader.

use std::io::{Read, Seek};

/// Identity of one concrete asset revision.
///
/// Two handles with the same key are guaranteed to resolve to the same
/// decoded data; the loader uses equality on this key for cache-hit
/// detection, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetKey(pub u64);

/// Readable, seekable byte source for a streamed asset.
pub trait AssetReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> AssetReader for T {}

/// Raw encoded bytes of an asset, in one of its two delivery modes.
pub enum AssetResource {
    /// The whole encoded payload is resident in memory.
    Bytes(Vec<u8>),
    /// The payload is streamed from backing storage.
    Stream(Box<dyn AssetReader>),
}

/// A host-side handle to one audio sample asset.
///
/// Implementations wrap whatever proxy object the host uses for sample
/// content. Everything here may be called from a background decode task, so
/// implementations must tolerate concurrent `open` calls across revisions.
pub trait AudioAsset: Send + Sync {
    /// Identity key of this asset revision.
    fn key(&self) -> AssetKey;

    /// Native sample rate of the encoded audio.
    fn sample_rate(&self) -> f64;

    /// Native channel count of the encoded audio.
    fn channels(&self) -> usize;

    /// Encoding format name, used for decoder lookup (e.g. `"wav"`, `"mp3"`).
    fn format(&self) -> &str;

    /// Open the encoded payload for decoding.
    fn open(&self) -> std::io::Result<AssetResource>;
}
