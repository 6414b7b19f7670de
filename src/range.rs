//! Time/index resolution for editing operations.
//!
//! Every operation takes its boundaries as a [`Window`]: an optional start
//! and an optional extent, each given either as a sample count or a time in
//! seconds. The resolver turns a window into a concrete half-open sample
//! range `[start, end)` under the out-of-range policy of the calling
//! operation:
//!
//! - [`RangePolicy::ZeroFill`] (read): the range may lie partly or entirely
//!   outside `[0, len)`; positions outside storage read as 0.0.
//! - [`RangePolicy::Extend`] (write, insert, pad): the end may exceed the
//!   current length, in which case the caller grows storage; a start before
//!   sample 0 is rejected.
//! - [`RangePolicy::Clamp`] (remove, slice, trim, reverse, invert, gain,
//!   fade, normalize): both endpoints are clamped into `[0, len]`.
//!
//! A zero or negative span resolves to an empty range, which every operation
//! treats as a no-op.

use crate::error::{AudioEditError, AudioEditResult};
use crate::math::seconds_to_samples;

/// A position or span given in samples or seconds.
///
/// Seconds are converted at the buffer's sample rate, rounded to the nearest
/// sample. Values may be negative: a negative start denotes a range before
/// the first sample (readable as silence), a negative span an empty range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeSpec {
    /// A count of samples.
    Samples(isize),
    /// A duration or position in seconds.
    Seconds(f64),
}

impl TimeSpec {
    /// Converts this value to a signed sample count at the given rate.
    pub fn to_samples(self, sample_rate: u32) -> isize {
        match self {
            TimeSpec::Samples(n) => n,
            TimeSpec::Seconds(s) => seconds_to_samples(s, sample_rate),
        }
    }
}

impl From<isize> for TimeSpec {
    fn from(samples: isize) -> Self {
        TimeSpec::Samples(samples)
    }
}

impl From<i32> for TimeSpec {
    fn from(samples: i32) -> Self {
        TimeSpec::Samples(samples as isize)
    }
}

impl From<usize> for TimeSpec {
    fn from(samples: usize) -> Self {
        TimeSpec::Samples(samples as isize)
    }
}

impl From<f64> for TimeSpec {
    fn from(seconds: f64) -> Self {
        TimeSpec::Seconds(seconds)
    }
}

/// The second boundary of a [`Window`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    /// A span counted from the window start.
    Span(TimeSpec),
    /// An absolute end position.
    Until(TimeSpec),
}

/// An unresolved `[start, start + span)` window over a buffer.
///
/// An omitted start defaults to sample 0. An omitted extent defaults to the
/// rest of the buffer, except that a negative start with no extent spans
/// exactly the region before sample 0 (`abs(start)` samples).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Window {
    /// Window start; `None` means sample 0.
    pub start: Option<TimeSpec>,
    /// Window extent; `None` means "until the end of the buffer".
    pub extent: Option<Extent>,
}

impl Window {
    /// The whole buffer.
    pub fn all() -> Self {
        Self::default()
    }

    /// From `start` to the end of the buffer.
    pub fn starting(start: impl Into<TimeSpec>) -> Self {
        Self {
            start: Some(start.into()),
            extent: None,
        }
    }

    /// `span` samples (or seconds) counted from `start`.
    pub fn span(start: impl Into<TimeSpec>, span: impl Into<TimeSpec>) -> Self {
        Self {
            start: Some(start.into()),
            extent: Some(Extent::Span(span.into())),
        }
    }

    /// An absolute `[from, to)` boundary.
    pub fn between(from: impl Into<TimeSpec>, to: impl Into<TimeSpec>) -> Self {
        Self {
            start: Some(from.into()),
            extent: Some(Extent::Until(to.into())),
        }
    }
}

/// Out-of-range policy applied when resolving a [`Window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePolicy {
    /// Positions outside `[0, len)` are permitted and read as zero.
    ZeroFill,
    /// The end may exceed the current length (the caller grows storage);
    /// a negative start is an error.
    Extend,
    /// Both endpoints are clamped into `[0, len]`.
    Clamp,
}

/// A resolved half-open `[start, end)` sample range, `end >= start`.
///
/// Under [`RangePolicy::ZeroFill`] the endpoints may be negative or exceed
/// the buffer length; under the other policies `start` is non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    /// First sample index of the range.
    pub start: isize,
    /// One past the last sample index of the range.
    pub end: isize,
}

impl ResolvedRange {
    /// Number of samples in the range.
    pub fn len(&self) -> usize {
        (self.end - self.start).max(0) as usize
    }

    /// Returns true when the range spans no samples.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Resolves a window to a concrete sample range over a buffer of `len`
/// samples per channel.
pub fn resolve(
    window: Window,
    sample_rate: u32,
    len: usize,
    policy: RangePolicy,
) -> AudioEditResult<ResolvedRange> {
    let start = window.start.map_or(0, |s| s.to_samples(sample_rate));
    let end = match window.extent {
        // Default extent: the rest of the buffer, or for a negative start
        // exactly the region before sample 0.
        None => {
            if start < 0 {
                0
            } else {
                len as isize
            }
        }
        Some(Extent::Span(span)) => start.saturating_add(span.to_samples(sample_rate)),
        Some(Extent::Until(to)) => to.to_samples(sample_rate),
    };
    let end = end.max(start);

    let resolved = match policy {
        RangePolicy::ZeroFill => ResolvedRange { start, end },
        RangePolicy::Extend => {
            if start < 0 {
                return Err(AudioEditError::InvalidParameter(format!(
                    "Range starting at sample {start} lies before the first sample; \
                     only reads may address the region before 0"
                )));
            }
            ResolvedRange { start, end }
        }
        RangePolicy::Clamp => {
            let start = start.clamp(0, len as isize);
            let end = end.clamp(start, len as isize);
            ResolvedRange { start, end }
        }
    };
    tracing::trace!(?window, ?policy, start = resolved.start, end = resolved.end, "resolved range");
    Ok(resolved)
}
