//! Structural edits: operations that write into, grow or shrink the buffer.
//!
//! Growth zero-fills, shrinkage reallocates; either way the invariant that
//! every channel has the same length is preserved, and validation of shapes
//! and ranges happens before the first sample is touched.

use ndarray::{Array2, Axis, concatenate, s};

use crate::buffer::AudioBuffer;
use crate::error::{AudioEditError, AudioEditResult};
use crate::format::{ChannelSel, Source};
use crate::ops::{PadOptions, ShiftOptions, WriteOptions};
use crate::range::{RangePolicy, TimeSpec, Window, resolve};

/// Maps source channels onto destination channels: source channel `i` lands
/// on the `i`-th selected channel. The default is identity over the shorter
/// of the two channel counts.
fn dest_channels(
    sel: &ChannelSel,
    source_channels: usize,
    buffer_channels: usize,
) -> AudioEditResult<Vec<usize>> {
    let mapped: Vec<usize> = match sel {
        ChannelSel::All => (0..source_channels.min(buffer_channels)).collect(),
        ChannelSel::One(ch) => vec![*ch],
        ChannelSel::List(list) => list.iter().copied().take(source_channels).collect(),
    };
    for &ch in &mapped {
        if ch >= buffer_channels {
            return Err(AudioEditError::OutOfRange(format!(
                "Channel {ch} does not exist in a {buffer_channels}-channel buffer"
            )));
        }
    }
    Ok(mapped)
}

impl AudioBuffer {
    /// Writes a source into the windowed range.
    ///
    /// A scalar source is broadcast into every sample of the resolved range
    /// on the selected channels. A data source is copied starting at the
    /// range start, bounded by the shorter of its own length and the
    /// resolved span; it is never looped. Storage grows (zero-filling any
    /// gap) when the written region extends past the current length. A
    /// start before sample 0 is an error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use audio_edit::{AudioBuffer, Window, WriteOptions};
    ///
    /// let mut buf = AudioBuffer::silent(10, 3, 44100).unwrap();
    /// buf.write(
    ///     vec![vec![0.0f32, 0.5, 1.0], vec![0.0, -0.5, -1.0]],
    ///     Window::all(),
    ///     &WriteOptions::default(),
    /// )
    /// .unwrap();
    /// assert_eq!(buf.channel(0).unwrap()[1], 0.5);
    /// assert_eq!(buf.channel(2).unwrap()[1], 0.0); // third channel untouched
    /// ```
    pub fn write(
        &mut self,
        source: impl Into<Source>,
        window: Window,
        opts: &WriteOptions,
    ) -> AudioEditResult<&mut Self> {
        let range = resolve(window, self.sample_rate, self.len(), RangePolicy::Extend)?;
        match source.into() {
            Source::Constant(value) => {
                let selected = opts.channels.resolve(self.channels())?;
                if range.is_empty() {
                    return Ok(self);
                }
                self.grow_to(range.end as usize);
                let (a, b) = (range.start as usize, range.end as usize);
                for &ch in &selected {
                    self.data.slice_mut(s![ch, a..b]).fill(value);
                }
            }
            source => {
                let planar = source.into_planar()?;
                let mapped = dest_channels(&opts.channels, planar.len(), self.channels())?;
                let span = planar.first().map_or(0, Vec::len).min(range.len());
                if span == 0 {
                    return Ok(self);
                }
                let start = range.start as usize;
                self.grow_to(start + span);
                for (samples, &ch) in planar.iter().zip(&mapped) {
                    for (i, &v) in samples.iter().take(span).enumerate() {
                        self.data[[ch, start + i]] = v;
                    }
                }
            }
        }
        Ok(self)
    }

    /// Applies a transform function to every selected sample in the
    /// windowed range, in increasing sample order per channel.
    ///
    /// The transform receives `(current_value, sample_index, channel_index)`
    /// and returns the replacement value. The range is clamped to the
    /// current length; there is nothing to transform beyond it.
    pub fn write_fn<F>(
        &mut self,
        mut transform: F,
        window: Window,
        opts: &WriteOptions,
    ) -> AudioEditResult<&mut Self>
    where
        F: FnMut(f32, usize, usize) -> f32,
    {
        let selected = opts.channels.resolve(self.channels())?;
        let range = resolve(window, self.sample_rate, self.len(), RangePolicy::Clamp)?;
        for &ch in &selected {
            for i in range.start as usize..range.end as usize {
                let v = self.data[[ch, i]];
                self.data[[ch, i]] = transform(v, i, ch);
            }
        }
        Ok(self)
    }

    /// Inserts a source at `at`, displacing everything from that position
    /// onward to the right by the source's span.
    ///
    /// Unlike [`write`](Self::write), insert never overwrites existing
    /// samples. An omitted `at` appends at the end of the buffer; a
    /// position beyond the end first grows the buffer with silence. The
    /// vacated region starts out zero-filled, so unmapped channels gain
    /// silence.
    pub fn insert(
        &mut self,
        source: impl Into<Source>,
        at: Option<TimeSpec>,
        opts: &WriteOptions,
    ) -> AudioEditResult<&mut Self> {
        let planar = source.into().into_planar()?;
        let mapped = dest_channels(&opts.channels, planar.len(), self.channels())?;
        let frames = planar.first().map_or(0, Vec::len);
        let at = at.map_or(self.len() as isize, |t| t.to_samples(self.sample_rate));
        if at < 0 {
            return Err(AudioEditError::InvalidParameter(format!(
                "Cannot insert at sample {at}, before the first sample"
            )));
        }
        let at = at as usize;
        if frames == 0 {
            return Ok(self);
        }
        self.grow_to(at);

        let old = self.len();
        tracing::debug!(at, frames, "inserting samples");
        let mut grown = Array2::zeros((self.channels(), old + frames));
        grown.slice_mut(s![.., ..at]).assign(&self.data.slice(s![.., ..at]));
        grown
            .slice_mut(s![.., at + frames..])
            .assign(&self.data.slice(s![.., at..]));
        self.data = grown;

        for (samples, &ch) in planar.iter().zip(&mapped) {
            for (i, &v) in samples.iter().enumerate() {
                self.data[[ch, at + i]] = v;
            }
        }
        Ok(self)
    }

    /// Removes the windowed range, closing the gap by shifting the tail
    /// left. The range is clamped to the current bounds; an empty range is
    /// a no-op.
    pub fn remove(&mut self, window: Window) -> AudioEditResult<&mut Self> {
        let range = resolve(window, self.sample_rate, self.len(), RangePolicy::Clamp)?;
        if range.is_empty() {
            return Ok(self);
        }
        let (a, b) = (range.start as usize, range.end as usize);
        let joined = concatenate(
            Axis(1),
            &[self.data.slice(s![.., ..a]), self.data.slice(s![.., b..])],
        )
        .map_err(|e| {
            AudioEditError::InvalidParameter(format!("Failed to rejoin storage after remove: {e}"))
        })?;
        self.data = joined;
        Ok(self)
    }

    /// Removes the windowed range and returns it as a new independent
    /// buffer. The original buffer is mutated exactly as by
    /// [`remove`](Self::remove).
    pub fn remove_keep(&mut self, window: Window) -> AudioEditResult<AudioBuffer> {
        let fragment = self.slice(window)?;
        self.remove(window)?;
        Ok(fragment)
    }

    /// Returns a new independent buffer holding a copy of the windowed
    /// range; the source buffer is unmodified. `slice(Window::all())` is
    /// the full-duplicate idiom (equivalent to `clone`).
    pub fn slice(&self, window: Window) -> AudioEditResult<AudioBuffer> {
        let range = resolve(window, self.sample_rate, self.len(), RangePolicy::Clamp)?;
        let data = self
            .data
            .slice(s![.., range.start as usize..range.end as usize])
            .to_owned();
        Ok(AudioBuffer {
            data,
            sample_rate: self.sample_rate,
        })
    }

    /// Truncates the buffer in place to the windowed range and returns the
    /// same reference (the non-copying spelling of slice).
    pub fn slice_in_place(&mut self, window: Window) -> AudioEditResult<&mut Self> {
        let range = resolve(window, self.sample_rate, self.len(), RangePolicy::Clamp)?;
        let kept = self
            .data
            .slice(s![.., range.start as usize..range.end as usize])
            .to_owned();
        self.data = kept;
        Ok(self)
    }

    /// Pads the buffer out to `target` duration with a fill value.
    ///
    /// A target not exceeding the current length is a no-op. By default the
    /// padding is appended; `left` prepends it instead.
    pub fn pad(
        &mut self,
        target: impl Into<TimeSpec>,
        opts: &PadOptions,
    ) -> AudioEditResult<&mut Self> {
        let target = target.into().to_samples(self.sample_rate);
        if target < 0 {
            return Err(AudioEditError::InvalidParameter(format!(
                "Target length must be non-negative, got {target} samples"
            )));
        }
        let target = target as usize;
        let current = self.len();
        if target <= current {
            return Ok(self);
        }
        tracing::debug!(from = current, to = target, left = opts.left, "padding buffer");
        let mut padded = Array2::from_elem((self.channels(), target), opts.value);
        let offset = if opts.left { target - current } else { 0 };
        padded
            .slice_mut(s![.., offset..offset + current])
            .assign(&self.data);
        self.data = padded;
        Ok(self)
    }

    /// Shifts content by `offset` samples: positive delays (toward higher
    /// indices), negative advances (toward index 0).
    ///
    /// By default, samples shifted outside the buffer are discarded and the
    /// vacated region is zero-filled; an offset magnitude of the buffer
    /// length or more silences everything. With `rotate`, samples wrap
    /// around to the opposite end instead and nothing is lost.
    pub fn shift(
        &mut self,
        offset: impl Into<TimeSpec>,
        opts: &ShiftOptions,
    ) -> AudioEditResult<&mut Self> {
        let len = self.len();
        if len == 0 {
            return Ok(self);
        }
        let offset = offset.into().to_samples(self.sample_rate);
        if opts.rotate {
            let k = offset.rem_euclid(len as isize) as usize;
            if k == 0 {
                return Ok(self);
            }
            for mut row in self.data.axis_iter_mut(Axis(0)) {
                let tmp = row.to_vec();
                for (i, &v) in tmp.iter().enumerate() {
                    row[(i + k) % len] = v;
                }
            }
        } else if offset.unsigned_abs() >= len {
            self.data.fill(0.0);
        } else if offset > 0 {
            let k = offset as usize;
            for mut row in self.data.axis_iter_mut(Axis(0)) {
                let tmp = row.to_vec();
                for i in 0..len {
                    row[i] = if i >= k { tmp[i - k] } else { 0.0 };
                }
            }
        } else if offset < 0 {
            let k = offset.unsigned_abs();
            for mut row in self.data.axis_iter_mut(Axis(0)) {
                let tmp = row.to_vec();
                for i in 0..len {
                    row[i] = if i + k < len { tmp[i + k] } else { 0.0 };
                }
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(buf: &AudioBuffer, idx: usize) -> Vec<f32> {
        buf.channel(idx).unwrap().to_vec()
    }

    #[test]
    fn test_write_planar_then_read_back() {
        let mut a = AudioBuffer::silent(10, 3, 44100).unwrap();
        a.write(
            vec![vec![0.0f32, 0.5, 1.0], vec![0.0, -0.5, -1.0]],
            Window::all(),
            &WriteOptions::default(),
        )
        .unwrap();
        assert_eq!(ch(&a, 0), vec![0.0, 0.5, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(ch(&a, 1), vec![0.0, -0.5, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(ch(&a, 2), vec![0.0; 10]);
    }

    #[test]
    fn test_write_mapped_channels_bounded_by_span() {
        let mut a = AudioBuffer::silent(10, 3, 44100).unwrap();
        a.write(
            vec![vec![0.0f32, 0.5, 1.0], vec![0.0, -0.5, -1.0]],
            Window::all(),
            &WriteOptions::default(),
        )
        .unwrap();
        // A 2-channel silent buffer written over one sample at index 1,
        // mapped onto channels 1 and 2.
        let silence = AudioBuffer::silent(4, 2, 44100).unwrap();
        a.write(
            &silence,
            Window::span(1, 1),
            &WriteOptions {
                channels: ChannelSel::List(vec![1, 2]),
            },
        )
        .unwrap();
        assert_eq!(ch(&a, 0), vec![0.0, 0.5, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(ch(&a, 1), vec![0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(ch(&a, 2), vec![0.0; 10]);
    }

    #[test]
    fn test_write_pcm_source_near_end() {
        let mut a = AudioBuffer::silent(10, 3, 44100).unwrap();
        // Three u8 samples of full scale, but only two fit the default span.
        a.write(
            vec![255u8, 255, 255],
            Window::starting(8),
            &WriteOptions {
                channels: ChannelSel::One(2),
            },
        )
        .unwrap();
        assert_eq!(a.len(), 10);
        assert_eq!(ch(&a, 2), vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_write_buffer_source_with_channel_map() {
        let mut a = AudioBuffer::silent(10, 3, 44100).unwrap();
        let src =
            AudioBuffer::from_source(vec![vec![-1.0f32, -1.0], vec![-1.0, -1.0]], 44100).unwrap();
        a.write(
            src,
            Window::starting(5),
            &WriteOptions {
                channels: ChannelSel::List(vec![0, 2]),
            },
        )
        .unwrap();
        assert_eq!(ch(&a, 0), vec![0.0, 0.0, 0.0, 0.0, 0.0, -1.0, -1.0, 0.0, 0.0, 0.0]);
        assert_eq!(ch(&a, 1), vec![0.0; 10]);
        assert_eq!(ch(&a, 2), vec![0.0, 0.0, 0.0, 0.0, 0.0, -1.0, -1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_write_scalar_over_span() {
        let mut a =
            AudioBuffer::from_source(vec![vec![0.0f32, 0.1, 0.2, 0.3, 0.4, 0.5]], 44100).unwrap();
        a.write(1.0f32, Window::span(2, 2), &WriteOptions::default())
            .unwrap();
        assert_eq!(ch(&a, 0), vec![0.0, 0.1, 1.0, 1.0, 0.4, 0.5]);
    }

    #[test]
    fn test_write_scalar_grows_storage() {
        let mut a = AudioBuffer::silent(10, 1, 44100).unwrap();
        a.write(1.0f32, Window::span(8, 5), &WriteOptions::default())
            .unwrap();
        assert_eq!(a.len(), 13);
        assert_eq!(ch(&a, 0)[7..], [0.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_write_before_start_rejected() {
        let mut a = AudioBuffer::silent(10, 1, 44100).unwrap();
        let err = a
            .write(1.0f32, Window::starting(-4), &WriteOptions::default())
            .unwrap_err();
        assert!(matches!(err, AudioEditError::InvalidParameter(_)));
    }

    #[test]
    fn test_write_fn_visits_in_order() {
        let mut a = AudioBuffer::silent(441, 1, 44100).unwrap();
        a.write(1.0f32, Window::all(), &WriteOptions::default())
            .unwrap();

        let mut expected_index = 0;
        a.write_fn(
            |v, i, _ch| {
                assert_eq!(i, expected_index);
                expected_index += 1;
                v * 0.5
            },
            Window::all(),
            &WriteOptions::default(),
        )
        .unwrap();
        assert_eq!(expected_index, 441);
        assert!(ch(&a, 0).iter().all(|&v| v == 0.5));
    }

    #[test]
    fn test_insert_displaces_instead_of_overwriting() {
        let mut a = AudioBuffer::silent(7, 3, 44100).unwrap();
        a.insert(
            vec![vec![0.0f32, 0.5, 1.0], vec![0.0, -0.5, -1.0]],
            Some(TimeSpec::Samples(0)),
            &WriteOptions::default(),
        )
        .unwrap();
        assert_eq!(a.len(), 10);
        assert_eq!(ch(&a, 0), vec![0.0, 0.5, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(ch(&a, 1), vec![0.0, -0.5, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);

        // Inserting a silent 2-channel fragment at index 1 shifts everything
        // right on every channel, including unmapped ones.
        let silence = AudioBuffer::silent(2, 2, 44100).unwrap();
        a.insert(
            silence,
            Some(TimeSpec::Samples(1)),
            &WriteOptions {
                channels: ChannelSel::List(vec![1, 2]),
            },
        )
        .unwrap();
        assert_eq!(a.len(), 12);
        assert_eq!(
            ch(&a, 0),
            vec![0.0, 0.0, 0.0, 0.5, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        );
        assert_eq!(
            ch(&a, 1),
            vec![0.0, 0.0, 0.0, -0.5, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_insert_appends_by_default() {
        let mut a = AudioBuffer::silent(12, 3, 44100).unwrap();
        a.insert(
            vec![255u8, 255, 255],
            None,
            &WriteOptions {
                channels: ChannelSel::One(2),
            },
        )
        .unwrap();
        assert_eq!(a.len(), 15);
        assert_eq!(ch(&a, 2)[12..], [1.0, 1.0, 1.0]);
        assert_eq!(ch(&a, 0)[12..], [0.0, 0.0, 0.0]);

        a.insert([-1.0f32, 1.0], None, &WriteOptions::default())
            .unwrap();
        assert_eq!(a.len(), 17);
        assert_eq!(ch(&a, 0)[15..], [-1.0, 1.0]);
        assert_eq!(ch(&a, 2)[15..], [0.0, 0.0]);
    }

    #[test]
    fn test_insert_scalar_rejected() {
        let mut a = AudioBuffer::silent(4, 1, 44100).unwrap();
        let err = a
            .insert(1.0f32, None, &WriteOptions::default())
            .unwrap_err();
        assert!(matches!(err, AudioEditError::UnsupportedSource(_)));
    }

    #[test]
    fn test_remove_keep_returns_fragment() {
        let mut a =
            AudioBuffer::from_source(vec![vec![0.0f32, 0.1, 0.2, 0.3, 0.4]], 44100).unwrap();
        let frag = a.remove_keep(Window::span(1, 1)).unwrap();
        assert_eq!(ch(&a, 0), vec![0.0, 0.2, 0.3, 0.4]);
        assert_eq!(ch(&frag, 0), vec![0.1]);

        a.remove(Window::span(2, 1)).unwrap();
        assert_eq!(ch(&a, 0), vec![0.0, 0.2, 0.4]);
    }

    #[test]
    fn test_remove_clamps_to_bounds() {
        let mut a = AudioBuffer::from_source(vec![vec![0.1f32, 0.2]], 44100).unwrap();
        a.remove(Window::span(1, 100)).unwrap();
        assert_eq!(ch(&a, 0), vec![0.1]);
        a.remove(Window::span(5, 2)).unwrap(); // fully out of bounds, no-op
        assert_eq!(ch(&a, 0), vec![0.1]);
    }

    #[test]
    fn test_slice_copy_and_in_place() {
        let mut a =
            AudioBuffer::from_source(vec![vec![0.0f32, 0.1, 0.2, 0.3, 0.4]], 44100).unwrap();

        a.slice_in_place(Window::span(1, 4)).unwrap();
        assert_eq!(ch(&a, 0), vec![0.1, 0.2, 0.3, 0.4]);

        let frag = a.slice(Window::span(0, 1)).unwrap();
        assert_eq!(ch(&a, 0), vec![0.1, 0.2, 0.3, 0.4]); // source untouched
        assert_eq!(ch(&frag, 0), vec![0.1]);

        let dup = a.slice(Window::all()).unwrap();
        assert_eq!(dup, a);
    }

    #[test]
    fn test_pad_appends_and_prepends() {
        let mut a = AudioBuffer::from_seconds(0.005, 2, 44100).unwrap();
        assert_eq!(a.len(), 221);

        a.pad(0.01, &PadOptions::default()).unwrap();
        assert_eq!(a.len(), 441);
        assert_eq!(a.duration(), 0.01);

        a.write(1.0f32, Window::all(), &WriteOptions::default())
            .unwrap();

        a.pad(
            0.015,
            &PadOptions {
                value: 0.5,
                left: false,
            },
        )
        .unwrap();
        assert_eq!(ch(&a, 0)[441..443], [0.5, 0.5]);

        a.pad(
            0.02,
            &PadOptions {
                value: 0.1,
                left: true,
            },
        )
        .unwrap();
        assert_eq!(ch(&a, 0)[..2], [0.1, 0.1]);
    }

    #[test]
    fn test_pad_not_exceeding_length_is_noop() {
        let mut a = AudioBuffer::silent(441, 1, 44100).unwrap();
        a.pad(0.005, &PadOptions::default()).unwrap();
        assert_eq!(a.len(), 441);
        let err = a.pad(-0.01, &PadOptions::default()).unwrap_err();
        assert!(matches!(err, AudioEditError::InvalidParameter(_)));
    }

    #[test]
    fn test_shift_truncating() {
        let mut a =
            AudioBuffer::from_source(vec![vec![0.0f32, 0.25, 0.5, 0.75, 1.0]], 44100).unwrap();

        a.shift(-2, &ShiftOptions::default()).unwrap();
        assert_eq!(ch(&a, 0), vec![0.5, 0.75, 1.0, 0.0, 0.0]);

        a.shift(3, &ShiftOptions::default()).unwrap();
        assert_eq!(ch(&a, 0), vec![0.0, 0.0, 0.0, 0.5, 0.75]);

        a.shift(10, &ShiftOptions::default()).unwrap();
        assert_eq!(ch(&a, 0), vec![0.0; 5]);
    }

    #[test]
    fn test_shift_rotating() {
        let mut a =
            AudioBuffer::from_source(vec![vec![0.0f32, 0.25, 0.5, 0.75, 1.0]], 44100).unwrap();

        a.shift(-2, &ShiftOptions { rotate: true }).unwrap();
        assert_eq!(ch(&a, 0), vec![0.5, 0.75, 1.0, 0.0, 0.25]);

        a.shift(3, &ShiftOptions { rotate: true }).unwrap();
        assert_eq!(ch(&a, 0), vec![1.0, 0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_shift_rotate_round_trip() {
        let original =
            AudioBuffer::from_source(vec![vec![0.0f32, 0.25, 0.5, 0.75, 1.0]], 44100).unwrap();
        let mut a = original.clone();
        a.shift(3, &ShiftOptions { rotate: true }).unwrap();
        a.shift(-3, &ShiftOptions { rotate: true }).unwrap();
        assert_eq!(a, original);
    }
}
