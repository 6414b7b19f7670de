//! Core buffer representation: planar 32-bit float channels plus a sample
//! rate.
//!
//! [`AudioBuffer`] is the single source of truth for sample contents. Storage
//! is a channel-major `ndarray::Array2<f32>` with shape
//! `(channels, samples)`, so every channel always has the same length and
//! per-channel operations are plain row slices. Length and channel data are
//! mutable as a side effect of the editing operations in [`crate::ops`];
//! sample values are never clamped and may exceed ±1.
//!
//! # Examples
//!
//! ```rust
//! use audio_edit::AudioBuffer;
//!
//! // 10 silent samples across 3 channels.
//! let buf = AudioBuffer::silent(10, 3, 44100).unwrap();
//! assert_eq!(buf.len(), 10);
//! assert_eq!(buf.channels(), 3);
//!
//! // Built from nested per-channel data.
//! let buf = AudioBuffer::from_source(vec![vec![0.0f32, 0.5], vec![0.0, -0.5]], 44100).unwrap();
//! assert_eq!(buf.channels(), 2);
//! ```

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis, s};

use crate::error::{AudioEditError, AudioEditResult};
use crate::format::Source;
use crate::math::{samples_to_seconds, seconds_to_samples};

/// A mutable, multi-channel, sample-accurate audio buffer.
///
/// Cloning produces a deep, independent copy; equality compares sample rate,
/// channel count, length and every sample value.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Channel-major sample storage, shape `(channels, samples)`.
    pub(crate) data: Array2<f32>,
    pub(crate) sample_rate: u32,
}

impl AudioBuffer {
    /// Creates a zero-filled buffer of `frames` samples per channel.
    ///
    /// Fails with [`AudioEditError::InvalidParameter`] for a zero channel
    /// count or sample rate. A zero `frames` count is valid.
    pub fn silent(frames: usize, channels: usize, sample_rate: u32) -> AudioEditResult<Self> {
        if channels == 0 {
            return Err(AudioEditError::InvalidParameter(
                "A buffer needs at least one channel".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(AudioEditError::InvalidParameter(
                "Sample rate must be positive".to_string(),
            ));
        }
        Ok(Self {
            data: Array2::zeros((channels, frames)),
            sample_rate,
        })
    }

    /// Creates a zero-filled buffer spanning `seconds`, rounded to the
    /// nearest sample.
    pub fn from_seconds(seconds: f64, channels: usize, sample_rate: u32) -> AudioEditResult<Self> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(AudioEditError::InvalidParameter(format!(
                "Duration must be a finite non-negative number of seconds, got {seconds}"
            )));
        }
        let frames = seconds_to_samples(seconds, sample_rate).max(0) as usize;
        Self::silent(frames, channels, sample_rate)
    }

    /// Creates a buffer by copying an external representation.
    ///
    /// Accepts anything convertible to [`Source`] except a bare scalar,
    /// which has no length of its own.
    pub fn from_source(source: impl Into<Source>, sample_rate: u32) -> AudioEditResult<Self> {
        if sample_rate == 0 {
            return Err(AudioEditError::InvalidParameter(
                "Sample rate must be positive".to_string(),
            ));
        }
        let planar = source.into().into_planar()?;
        if planar.is_empty() {
            return Err(AudioEditError::UnsupportedSource(
                "Source carries zero channels".to_string(),
            ));
        }
        let channels = planar.len();
        let frames = planar[0].len();
        let mut data = Array2::zeros((channels, frames));
        for (ch, samples) in planar.iter().enumerate() {
            for (i, &v) in samples.iter().enumerate() {
                data[[ch, i]] = v;
            }
        }
        Ok(Self { data, sample_rate })
    }

    /// Number of samples per channel.
    pub fn len(&self) -> usize {
        self.data.ncols()
    }

    /// Returns true when the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.data.nrows()
    }

    /// Samples per second.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Buffer duration in seconds, derived from length and sample rate.
    pub fn duration(&self) -> f64 {
        samples_to_seconds(self.len(), self.sample_rate)
    }

    /// A read-only view of one channel's samples.
    pub fn channel(&self, channel: usize) -> AudioEditResult<ArrayView1<'_, f32>> {
        if channel >= self.channels() {
            return Err(AudioEditError::OutOfRange(format!(
                "Channel {channel} does not exist in a {}-channel buffer",
                self.channels()
            )));
        }
        Ok(self.data.row(channel))
    }

    /// A mutable view of one channel's samples.
    pub fn channel_mut(&mut self, channel: usize) -> AudioEditResult<ArrayViewMut1<'_, f32>> {
        if channel >= self.channels() {
            return Err(AudioEditError::OutOfRange(format!(
                "Channel {channel} does not exist in a {}-channel buffer",
                self.channels()
            )));
        }
        Ok(self.data.row_mut(channel))
    }

    /// The raw channel-major storage, shape `(channels, samples)`.
    pub fn frames(&self) -> ArrayView2<'_, f32> {
        self.data.view()
    }

    /// Copies every channel out as nested sequences.
    pub fn to_planar(&self) -> Vec<Vec<f32>> {
        self.data
            .axis_iter(Axis(0))
            .map(|row| row.to_vec())
            .collect()
    }

    /// Grows storage to `frames` samples per channel, zero-filling the new
    /// tail. Shorter or equal targets are a no-op.
    pub(crate) fn grow_to(&mut self, frames: usize) {
        let current = self.len();
        if frames <= current {
            return;
        }
        tracing::debug!(from = current, to = frames, "reallocating buffer storage");
        let mut grown = Array2::zeros((self.channels(), frames));
        grown.slice_mut(s![.., ..current]).assign(&self.data);
        self.data = grown;
    }
}
