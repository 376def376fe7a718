//! Asset decoders and the format-handler registry.
//!
//! Decoders turn an encoded asset payload into interleaved 16-bit PCM; the
//! loader normalizes that to floating point before handing it to the engine.
//! The bridge itself never names a codec; it looks handlers up by the
//! asset's format name.

use std::collections::HashMap;
use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::asset::{AssetReader, AssetResource};
use crate::error::{DecodeError, Result};

/// Interleaved 16-bit PCM produced by a decoder.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub pcm: Vec<i16>,
    pub channels: usize,
    pub sample_rate: f64,
}

impl DecodedAudio {
    /// Frames per channel.
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.pcm.len() / self.channels
        }
    }
}

/// Decodes one asset encoding into interleaved 16-bit PCM.
pub trait AssetDecoder: Send + Sync {
    fn decode(&self, resource: AssetResource) -> Result<DecodedAudio>;
}

/// Format-name → decoder lookup table.
///
/// A missing entry is not fatal: the loader logs it and leaves the slot at
/// its previous state.
#[derive(Default)]
pub struct DecoderRegistry {
    decoders: HashMap<String, Box<dyn AssetDecoder>>,
}

impl DecoderRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the stock decoders: hound for WAV, symphonia for the
    /// compressed formats.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("wav", WavDecoder);
        for format in ["mp3", "flac", "ogg"] {
            registry.register(format, SymphoniaDecoder);
        }
        registry
    }

    /// Register `decoder` for `format`, replacing any previous handler.
    pub fn register(&mut self, format: &str, decoder: impl AssetDecoder + 'static) {
        self.decoders.insert(format.to_string(), Box::new(decoder));
    }

    pub fn find(&self, format: &str) -> Option<&dyn AssetDecoder> {
        self.decoders.get(format).map(|d| d.as_ref())
    }
}

/// WAV/PCM decoder backed by hound.
pub struct WavDecoder;

impl WavDecoder {
    fn decode_reader<R: std::io::Read>(&self, reader: R) -> Result<DecodedAudio> {
        let reader = hound::WavReader::new(reader)?;
        let spec = reader.spec();
        let channels = spec.channels as usize;
        let sample_rate = f64::from(spec.sample_rate);

        let pcm: Vec<i16> = match spec.sample_format {
            hound::SampleFormat::Int if spec.bits_per_sample <= 16 => reader
                .into_samples::<i16>()
                .collect::<std::result::Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let shift = spec.bits_per_sample - 16;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| (v >> shift) as i16))
                    .collect::<std::result::Result<_, _>>()?
            }
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16))
                .collect::<std::result::Result<_, _>>()?,
        };

        Ok(DecodedAudio {
            pcm,
            channels,
            sample_rate,
        })
    }
}

impl AssetDecoder for WavDecoder {
    fn decode(&self, resource: AssetResource) -> Result<DecodedAudio> {
        match resource {
            AssetResource::Bytes(bytes) => self.decode_reader(Cursor::new(bytes)),
            AssetResource::Stream(reader) => self.decode_reader(reader),
        }
    }
}

/// Compressed-format decoder backed by symphonia.
pub struct SymphoniaDecoder;

impl AssetDecoder for SymphoniaDecoder {
    fn decode(&self, resource: AssetResource) -> Result<DecodedAudio> {
        let source: Box<dyn MediaSource> = match resource {
            AssetResource::Bytes(bytes) => Box::new(SourceAdapter(Cursor::new(bytes))),
            AssetResource::Stream(reader) => Box::new(SourceAdapter(reader)),
        };
        let stream = MediaSourceStream::new(source, Default::default());

        let probed = symphonia::default::get_probe().format(
            &Hint::new(),
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(DecodeError::NoTrack)?;
        let track_id = track.id;
        let channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(2);
        let sample_rate = f64::from(track.codec_params.sample_rate.unwrap_or(44100));

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())?;

        let mut pcm = Vec::new();
        let mut sample_buf: Option<SampleBuffer<i16>> = None;
        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => return Err(e.into()),
            };
            if packet.track_id() != track_id {
                continue;
            }
            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let buf = sample_buf.get_or_insert_with(|| {
                        SampleBuffer::new(decoded.capacity() as u64, *decoded.spec())
                    });
                    buf.copy_interleaved_ref(decoded);
                    pcm.extend_from_slice(buf.samples());
                }
                // Corrupt packets are skipped, not fatal.
                Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(DecodedAudio {
            pcm,
            channels,
            sample_rate,
        })
    }
}

/// Adapts any reader into a seekable symphonia media source.
struct SourceAdapter<R>(R);

impl<R: std::io::Read> std::io::Read for SourceAdapter<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R: std::io::Seek> std::io::Seek for SourceAdapter<R> {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        self.0.seek(pos)
    }
}

impl MediaSource for SourceAdapter<Cursor<Vec<u8>>> {
    fn is_seekable(&self) -> bool {
        true
    }

    fn byte_len(&self) -> Option<u64> {
        Some(self.0.get_ref().len() as u64)
    }
}

impl MediaSource for SourceAdapter<Box<dyn AssetReader>> {
    fn is_seekable(&self) -> bool {
        true
    }

    fn byte_len(&self) -> Option<u64> {
        None
    }
}
