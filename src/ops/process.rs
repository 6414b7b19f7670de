//! Signal-level operations: trim, normalize, fade, gain, reverse, invert
//! and the windowed transform hook.

use ndarray::{ArrayViewMut2, s};

use crate::buffer::AudioBuffer;
use crate::error::AudioEditResult;
use crate::format::ChannelSel;
use crate::math::db_to_amplitude;
use crate::ops::{FadeOptions, NormalizeOptions, TrimOptions, WriteOptions};
use crate::range::{RangePolicy, TimeSpec, Window, resolve};

impl AudioBuffer {
    /// Removes silent regions from the buffer edges.
    ///
    /// A frame counts as silent when every channel's magnitude at that
    /// position is below the linear equivalent of `threshold_db`. With the
    /// default options both ends are trimmed; `left: Some(true)` trims only
    /// the head, `Some(false)` only the tail. An all-silent buffer trims to
    /// zero length.
    pub fn trim(&mut self, opts: &TrimOptions) -> AudioEditResult<&mut Self> {
        let floor = db_to_amplitude(opts.threshold_db) as f32;
        let len = self.len();
        let silent = |frame: usize| {
            self.data
                .column(frame)
                .iter()
                .all(|&v| v.abs() < floor)
        };

        let (trim_head, trim_tail) = match opts.left {
            None => (true, true),
            Some(left) => (left, !left),
        };
        let start = if trim_head {
            (0..len).find(|&i| !silent(i)).unwrap_or(len)
        } else {
            0
        };
        let end = if trim_tail {
            (start..len).rev().find(|&i| !silent(i)).map_or(start, |i| i + 1)
        } else {
            len
        };
        if start == 0 && end == len {
            return Ok(self);
        }
        tracing::debug!(start, end, len, "trimming silent edges");
        let kept = self.data.slice(s![.., start..end]).to_owned();
        self.data = kept;
        Ok(self)
    }

    /// Scales samples so the peak magnitude in the analyzed range becomes
    /// exactly 1.0.
    ///
    /// By default every channel is analyzed and scaled independently. An
    /// explicit channel selection forms one shared-peak group: all listed
    /// channels are scaled by the same factor (the group's peak), which
    /// preserves their relative levels. A zero peak is a no-op.
    ///
    /// The gain is applied only within the analyzed window; samples outside
    /// it are left untouched. This is the documented contract for partial
    /// normalization.
    pub fn normalize(
        &mut self,
        window: Window,
        opts: &NormalizeOptions,
    ) -> AudioEditResult<&mut Self> {
        let range = resolve(window, self.sample_rate, self.len(), RangePolicy::Clamp)?;
        let groups: Vec<Vec<usize>> = match &opts.channel {
            ChannelSel::All => (0..self.channels()).map(|ch| vec![ch]).collect(),
            sel => vec![sel.resolve(self.channels())?],
        };
        if range.is_empty() {
            return Ok(self);
        }
        let (a, b) = (range.start as usize, range.end as usize);
        for group in groups {
            let peak = group
                .iter()
                .flat_map(|&ch| self.data.slice(s![ch, a..b]).to_vec())
                .fold(0.0f32, |acc, v| acc.max(v.abs()));
            if peak == 0.0 {
                continue;
            }
            let scale = 1.0 / peak;
            for &ch in &group {
                self.data.slice_mut(s![ch, a..b]).mapv_inplace(|v| v * scale);
            }
        }
        Ok(self)
    }

    /// Applies a decibel ramp over `duration` samples.
    ///
    /// A positive duration fades in at the buffer head, ramping from
    /// `floor_db` up to 0 dB; a negative duration fades out at the tail
    /// with the mirrored curve. The decibel value is interpolated at each
    /// sample's half-sample-centered position `(i + 0.5) / n` and converted
    /// to linear gain.
    pub fn fade(&mut self, duration: impl Into<TimeSpec>, opts: &FadeOptions) -> AudioEditResult<&mut Self> {
        let duration = duration.into().to_samples(self.sample_rate);
        let len = self.len();
        let fade_in = duration >= 0;
        let n = duration.unsigned_abs().min(len);
        if n == 0 {
            return Ok(self);
        }
        let start = if fade_in { 0 } else { len - n };
        let db_range = -opts.floor_db;
        for i in 0..n {
            let position = (i as f64 + 0.5) / n as f64;
            let position = if fade_in { position } else { 1.0 - position };
            let gain = db_to_amplitude(position * db_range + opts.floor_db) as f32;
            for ch in 0..self.channels() {
                self.data[[ch, start + i]] *= gain;
            }
        }
        Ok(self)
    }

    /// Multiplies every sample in the windowed range by the linear
    /// equivalent of `db` decibels.
    pub fn gain(&mut self, db: f64, window: Window) -> AudioEditResult<&mut Self> {
        let range = resolve(window, self.sample_rate, self.len(), RangePolicy::Clamp)?;
        if range.is_empty() {
            return Ok(self);
        }
        let amplitude = db_to_amplitude(db) as f32;
        self.data
            .slice_mut(s![.., range.start as usize..range.end as usize])
            .mapv_inplace(|v| v * amplitude);
        Ok(self)
    }

    /// Reverses sample order within the windowed range, independently per
    /// selected channel.
    pub fn reverse(&mut self, window: Window, opts: &WriteOptions) -> AudioEditResult<&mut Self> {
        let selected = opts.channels.resolve(self.channels())?;
        let range = resolve(window, self.sample_rate, self.len(), RangePolicy::Clamp)?;
        for &ch in &selected {
            let mut i = range.start as usize;
            let mut j = range.end as usize;
            while i + 1 < j {
                self.data.swap([ch, i], [ch, j - 1]);
                i += 1;
                j -= 1;
            }
        }
        Ok(self)
    }

    /// Negates every sample in the windowed range on all channels.
    pub fn invert(&mut self, window: Window) -> AudioEditResult<&mut Self> {
        let range = resolve(window, self.sample_rate, self.len(), RangePolicy::Clamp)?;
        self.data
            .slice_mut(s![.., range.start as usize..range.end as usize])
            .mapv_inplace(|v| -v);
        Ok(self)
    }

    /// Hands a mutable view over the windowed storage to `transform`,
    /// invoked once, synchronously.
    ///
    /// The view has shape `(channels, window_samples)`; any mutation lands
    /// directly in the buffer with no copy-back step. This is the hook for
    /// arbitrary user-supplied processing.
    pub fn through<F>(&mut self, transform: F, window: Window) -> AudioEditResult<&mut Self>
    where
        F: FnOnce(ArrayViewMut2<'_, f32>),
    {
        let range = resolve(window, self.sample_rate, self.len(), RangePolicy::Clamp)?;
        transform(
            self.data
                .slice_mut(s![.., range.start as usize..range.end as usize]),
        );
        Ok(self)
    }
}
