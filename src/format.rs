//! Format negotiation between the buffer's planar f32 storage and external
//! representations.
//!
//! The buffer only ever stores planar 32-bit float channels. Everything a
//! caller can hand in or ask back out is described by a closed set of tagged
//! variants: a broadcast scalar, per-channel nested sequences, a flat
//! interleaved sequence, an interleaved quantized (PCM) sequence, or another
//! channel-major buffer. Each variant carries enough shape information to be
//! converted without guessing.
//!
//! Quantization maps float `[-1, 1]` linearly onto the integer width with a
//! scale of `(2^bits - 1) / 2`, truncating toward zero and saturating beyond
//! the unit range. Unsigned widths are offset so that 0.0 lands on the range
//! midpoint (`u8`: 0.0 → 127, 1.0 → 255, -1.0 → 0). Dequantization is the
//! inverse linear map.

use num_traits::{NumCast, PrimInt, ToPrimitive};

use crate::buffer::AudioBuffer;
use crate::error::{AudioEditError, AudioEditResult};

/// Numeric width of samples crossing the buffer boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dtype {
    /// Native 32-bit float, no quantization.
    #[default]
    F32,
    /// Unsigned 8-bit PCM, 0.0 at the range midpoint.
    U8,
    /// Signed 8-bit PCM.
    I8,
    /// Signed 16-bit PCM.
    I16,
    /// Signed 32-bit PCM.
    I32,
}

impl Dtype {
    /// Bit width of the representation.
    pub const fn bits(self) -> u32 {
        match self {
            Dtype::F32 | Dtype::I32 => 32,
            Dtype::U8 | Dtype::I8 => 8,
            Dtype::I16 => 16,
        }
    }
}

/// Shape of multi-channel output data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SampleFormat {
    /// One sequence per channel.
    #[default]
    Planar,
    /// One flat sequence with channels alternating per frame.
    Interleaved,
}

/// A quantized, interleaved PCM payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PcmSamples {
    /// Unsigned 8-bit samples.
    U8(Vec<u8>),
    /// Signed 8-bit samples.
    I8(Vec<i8>),
    /// Signed 16-bit samples.
    I16(Vec<i16>),
    /// Signed 32-bit samples.
    I32(Vec<i32>),
}

impl PcmSamples {
    /// Number of samples in the payload.
    pub fn len(&self) -> usize {
        match self {
            PcmSamples::U8(v) => v.len(),
            PcmSamples::I8(v) => v.len(),
            PcmSamples::I16(v) => v.len(),
            PcmSamples::I32(v) => v.len(),
        }
    }

    /// Returns true when the payload holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width of the stored samples.
    pub const fn dtype(&self) -> Dtype {
        match self {
            PcmSamples::U8(_) => Dtype::U8,
            PcmSamples::I8(_) => Dtype::I8,
            PcmSamples::I16(_) => Dtype::I16,
            PcmSamples::I32(_) => Dtype::I32,
        }
    }

    /// The payload viewed as raw little-endian-native bytes.
    pub fn bytes(&self) -> &[u8] {
        match self {
            PcmSamples::U8(v) => v.as_slice(),
            PcmSamples::I8(v) => bytemuck::cast_slice(v),
            PcmSamples::I16(v) => bytemuck::cast_slice(v),
            PcmSamples::I32(v) => bytemuck::cast_slice(v),
        }
    }

    /// Dequantizes every sample back to float.
    pub fn to_f32(&self) -> Vec<f32> {
        match self {
            PcmSamples::U8(v) => v.iter().map(|&q| dequantize(q)).collect(),
            PcmSamples::I8(v) => v.iter().map(|&q| dequantize(q)).collect(),
            PcmSamples::I16(v) => v.iter().map(|&q| dequantize(q)).collect(),
            PcmSamples::I32(v) => v.iter().map(|&q| dequantize(q)).collect(),
        }
    }
}

/// Quantizes a float sample onto the full representable range of `T`.
fn quantize<T: PrimInt + NumCast>(v: f32) -> T {
    let bits = std::mem::size_of::<T>() as u32 * 8;
    let scale = (((1u64 << bits) - 1) as f64) / 2.0;
    let signed = T::min_value() < T::zero();
    let x = <f64 as From<f32>>::from(v.clamp(-1.0, 1.0));
    let q = if signed {
        (x * scale).trunc()
    } else {
        ((x + 1.0) * scale).trunc()
    };
    NumCast::from(q).unwrap_or_else(|| {
        if q < 0.0 {
            T::min_value()
        } else {
            T::max_value()
        }
    })
}

/// Inverse of [`quantize`].
fn dequantize<T: PrimInt + ToPrimitive>(q: T) -> f32 {
    let bits = std::mem::size_of::<T>() as u32 * 8;
    let scale = (((1u64 << bits) - 1) as f64) / 2.0;
    let signed = T::min_value() < T::zero();
    let x = q.to_f64().unwrap_or(0.0);
    let v = if signed { x / scale } else { x / scale - 1.0 };
    v as f32
}

/// Quantizes a flat float sequence to the requested width.
pub(crate) fn quantize_samples(samples: &[f32], dtype: Dtype) -> AudioEditResult<PcmSamples> {
    match dtype {
        Dtype::U8 => Ok(PcmSamples::U8(samples.iter().map(|&v| quantize(v)).collect())),
        Dtype::I8 => Ok(PcmSamples::I8(samples.iter().map(|&v| quantize(v)).collect())),
        Dtype::I16 => Ok(PcmSamples::I16(samples.iter().map(|&v| quantize(v)).collect())),
        Dtype::I32 => Ok(PcmSamples::I32(samples.iter().map(|&v| quantize(v)).collect())),
        Dtype::F32 => Err(AudioEditError::InvalidParameter(
            "f32 is not a quantized width".to_string(),
        )),
    }
}

/// Interleaves equal-length channel sequences into one flat sequence.
pub(crate) fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    let frames = channels.first().map_or(0, Vec::len);
    let mut out = Vec::with_capacity(frames * channels.len());
    for frame in 0..frames {
        for channel in channels {
            out.push(channel[frame]);
        }
    }
    out
}

/// Splits a flat interleaved sequence into per-channel sequences.
pub(crate) fn deinterleave(samples: &[f32], channels: usize) -> AudioEditResult<Vec<Vec<f32>>> {
    if channels == 0 {
        return Err(AudioEditError::InvalidParameter(
            "Interleaved data requires a channel count of at least 1".to_string(),
        ));
    }
    if samples.len() % channels != 0 {
        return Err(AudioEditError::ShapeMismatch(format!(
            "Interleaved payload of {} samples is not a whole number of {}-channel frames",
            samples.len(),
            channels
        )));
    }
    let frames = samples.len() / channels;
    let mut out = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (ch, &v) in frame.iter().enumerate() {
            out[ch].push(v);
        }
    }
    Ok(out)
}

/// An external representation accepted by `write`, `insert` and buffer
/// construction.
///
/// The variants form a closed set; each carries its own channel count and
/// sample count so no dynamic inspection is needed. `From` conversions cover
/// the common hand-ins: a scalar, a flat mono sequence, nested per-channel
/// sequences, PCM byte/word vectors and other buffers.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// A scalar broadcast into every sample of the resolved range.
    Constant(f32),
    /// Per-channel nested sequences; the outer length is the channel count.
    /// Shorter channels are zero-extended to the longest one.
    Planar(Vec<Vec<f32>>),
    /// A flat sequence with channels alternating per frame.
    Interleaved {
        /// The interleaved payload.
        samples: Vec<f32>,
        /// Number of channels to de-interleave into.
        channels: usize,
    },
    /// An interleaved quantized payload, dequantized on conversion.
    Pcm {
        /// The quantized payload.
        samples: PcmSamples,
        /// Number of channels to de-interleave into.
        channels: usize,
    },
    /// Another channel-major buffer with its own channel count and length.
    Buffer(AudioBuffer),
}

impl Source {
    /// Number of frames this source spans, or `None` for a scalar (which
    /// adopts the span of the resolved range).
    pub fn frames(&self) -> Option<usize> {
        match self {
            Source::Constant(_) => None,
            Source::Planar(channels) => Some(channels.iter().map(Vec::len).max().unwrap_or(0)),
            Source::Interleaved { samples, channels } => {
                Some(samples.len() / (*channels).max(1))
            }
            Source::Pcm { samples, channels } => Some(samples.len() / (*channels).max(1)),
            Source::Buffer(buf) => Some(buf.len()),
        }
    }

    /// Number of channels this source carries, or `None` for a scalar.
    pub fn channels(&self) -> Option<usize> {
        match self {
            Source::Constant(_) => None,
            Source::Planar(channels) => Some(channels.len()),
            Source::Interleaved { channels, .. } | Source::Pcm { channels, .. } => Some(*channels),
            Source::Buffer(buf) => Some(buf.channels()),
        }
    }

    /// Normalizes the source to planar float channels of equal length.
    ///
    /// Fails with [`AudioEditError::UnsupportedSource`] for a scalar, which
    /// has no shape of its own.
    pub fn into_planar(self) -> AudioEditResult<Vec<Vec<f32>>> {
        match self {
            Source::Constant(_) => Err(AudioEditError::UnsupportedSource(
                "A bare scalar has no channel shape; it can only be broadcast by write"
                    .to_string(),
            )),
            Source::Planar(mut channels) => {
                let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
                for channel in &mut channels {
                    channel.resize(frames, 0.0);
                }
                Ok(channels)
            }
            Source::Interleaved { samples, channels } => deinterleave(&samples, channels),
            Source::Pcm { samples, channels } => deinterleave(&samples.to_f32(), channels),
            Source::Buffer(buf) => Ok(buf.to_planar()),
        }
    }
}

impl From<f32> for Source {
    fn from(value: f32) -> Self {
        Source::Constant(value)
    }
}

impl From<Vec<f32>> for Source {
    fn from(samples: Vec<f32>) -> Self {
        Source::Planar(vec![samples])
    }
}

impl From<&[f32]> for Source {
    fn from(samples: &[f32]) -> Self {
        Source::Planar(vec![samples.to_vec()])
    }
}

impl<const N: usize> From<[f32; N]> for Source {
    fn from(samples: [f32; N]) -> Self {
        Source::Planar(vec![samples.to_vec()])
    }
}

impl From<Vec<Vec<f32>>> for Source {
    fn from(channels: Vec<Vec<f32>>) -> Self {
        Source::Planar(channels)
    }
}

impl From<Vec<u8>> for Source {
    fn from(samples: Vec<u8>) -> Self {
        Source::Pcm {
            samples: PcmSamples::U8(samples),
            channels: 1,
        }
    }
}

impl From<Vec<i16>> for Source {
    fn from(samples: Vec<i16>) -> Self {
        Source::Pcm {
            samples: PcmSamples::I16(samples),
            channels: 1,
        }
    }
}

impl From<AudioBuffer> for Source {
    fn from(buffer: AudioBuffer) -> Self {
        Source::Buffer(buffer)
    }
}

impl From<&AudioBuffer> for Source {
    fn from(buffer: &AudioBuffer) -> Self {
        Source::Buffer(buffer.clone())
    }
}

/// Selects or maps a subset of a buffer's channels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChannelSel {
    /// Every channel, identity-mapped.
    #[default]
    All,
    /// A single channel; reads of one channel produce flat output.
    One(usize),
    /// An explicit list; for writes, source channel `i` maps to entry `i`.
    List(Vec<usize>),
}

impl ChannelSel {
    /// Resolves the selection against a concrete channel count, validating
    /// every index.
    pub fn resolve(&self, channels: usize) -> AudioEditResult<Vec<usize>> {
        let indices: Vec<usize> = match self {
            ChannelSel::All => (0..channels).collect(),
            ChannelSel::One(ch) => vec![*ch],
            ChannelSel::List(list) => list.clone(),
        };
        for &ch in &indices {
            if ch >= channels {
                return Err(AudioEditError::OutOfRange(format!(
                    "Channel {ch} does not exist in a {channels}-channel buffer"
                )));
            }
        }
        Ok(indices)
    }

    /// Returns true when the selection names exactly one channel.
    pub fn is_single(&self) -> bool {
        matches!(self, ChannelSel::One(_))
    }
}

/// Data handed back by `read`, shaped by the requested format and width.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutput {
    /// A single channel as a flat float sequence.
    Mono(Vec<f32>),
    /// One float sequence per selected channel.
    Planar(Vec<Vec<f32>>),
    /// Selected channels interleaved into one float sequence.
    Interleaved(Vec<f32>),
    /// Quantized output (single channel or interleaved).
    Pcm(PcmSamples),
}

impl ReadOutput {
    /// The flat single-channel payload, if this is `Mono`.
    pub fn into_mono(self) -> Option<Vec<f32>> {
        match self {
            ReadOutput::Mono(v) => Some(v),
            _ => None,
        }
    }

    /// The per-channel payload, if this is `Planar`.
    pub fn into_planar(self) -> Option<Vec<Vec<f32>>> {
        match self {
            ReadOutput::Planar(v) => Some(v),
            _ => None,
        }
    }

    /// The interleaved payload, if this is `Interleaved`.
    pub fn into_interleaved(self) -> Option<Vec<f32>> {
        match self {
            ReadOutput::Interleaved(v) => Some(v),
            _ => None,
        }
    }

    /// The quantized payload, if this is `Pcm`.
    pub fn into_pcm(self) -> Option<PcmSamples> {
        match self {
            ReadOutput::Pcm(v) => Some(v),
            _ => None,
        }
    }
}

/// Shapes gathered channel data into the caller-requested output form.
///
/// `single` marks a one-channel selection, which produces flat output.
/// Multi-channel planar data cannot be quantized into one flat payload, so a
/// non-f32 dtype there is a shape mismatch rather than a silent reshape.
pub(crate) fn shape_output(
    mut channels: Vec<Vec<f32>>,
    single: bool,
    format: SampleFormat,
    dtype: Dtype,
) -> AudioEditResult<ReadOutput> {
    if single {
        let flat = channels.pop().unwrap_or_default();
        return match dtype {
            Dtype::F32 => Ok(ReadOutput::Mono(flat)),
            other => Ok(ReadOutput::Pcm(quantize_samples(&flat, other)?)),
        };
    }
    match format {
        SampleFormat::Interleaved => {
            let flat = interleave(&channels);
            match dtype {
                Dtype::F32 => Ok(ReadOutput::Interleaved(flat)),
                other => Ok(ReadOutput::Pcm(quantize_samples(&flat, other)?)),
            }
        }
        SampleFormat::Planar => match dtype {
            Dtype::F32 => Ok(ReadOutput::Planar(channels)),
            other => Err(AudioEditError::ShapeMismatch(format!(
                "{other:?} output requires a single channel or an interleaved format; \
                 multi-channel planar data has no flat representation"
            ))),
        },
    }
}

/// A caller-supplied flat destination container for `read_into`.
///
/// The variant fixes both the numeric width and the capacity. A flat
/// destination only fits single-channel or interleaved output.
#[derive(Debug)]
pub enum DestBuffer<'a> {
    /// Unquantized float destination.
    F32(&'a mut [f32]),
    /// Unsigned 8-bit PCM destination.
    U8(&'a mut [u8]),
    /// Signed 8-bit PCM destination.
    I8(&'a mut [i8]),
    /// Signed 16-bit PCM destination.
    I16(&'a mut [i16]),
    /// Signed 32-bit PCM destination.
    I32(&'a mut [i32]),
}

impl DestBuffer<'_> {
    /// Numeric width of the destination.
    pub const fn dtype(&self) -> Dtype {
        match self {
            DestBuffer::F32(_) => Dtype::F32,
            DestBuffer::U8(_) => Dtype::U8,
            DestBuffer::I8(_) => Dtype::I8,
            DestBuffer::I16(_) => Dtype::I16,
            DestBuffer::I32(_) => Dtype::I32,
        }
    }

    /// Capacity of the destination in samples.
    pub fn len(&self) -> usize {
        match self {
            DestBuffer::F32(d) => d.len(),
            DestBuffer::U8(d) => d.len(),
            DestBuffer::I8(d) => d.len(),
            DestBuffer::I16(d) => d.len(),
            DestBuffer::I32(d) => d.len(),
        }
    }

    /// Returns true when the destination has no capacity.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Quantizes (if needed) and stores `samples`, returning the count
    /// written. The destination must be at least as long as the payload.
    pub(crate) fn store(&mut self, samples: &[f32]) -> AudioEditResult<usize> {
        if self.len() < samples.len() {
            return Err(AudioEditError::ShapeMismatch(format!(
                "Destination holds {} samples but {} were produced",
                self.len(),
                samples.len()
            )));
        }
        let n = samples.len();
        match self {
            DestBuffer::F32(d) => d[..n].copy_from_slice(samples),
            DestBuffer::U8(d) => {
                for (out, &v) in d[..n].iter_mut().zip(samples) {
                    *out = quantize(v);
                }
            }
            DestBuffer::I8(d) => {
                for (out, &v) in d[..n].iter_mut().zip(samples) {
                    *out = quantize(v);
                }
            }
            DestBuffer::I16(d) => {
                for (out, &v) in d[..n].iter_mut().zip(samples) {
                    *out = quantize(v);
                }
            }
            DestBuffer::I32(d) => {
                for (out, &v) in d[..n].iter_mut().zip(samples) {
                    *out = quantize(v);
                }
            }
        }
        Ok(n)
    }
}
