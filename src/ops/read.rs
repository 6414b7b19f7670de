//! Range reads: gathering samples into caller-requested formats and
//! destinations.

use crate::buffer::AudioBuffer;
use crate::error::{AudioEditError, AudioEditResult};
use crate::format::{DestBuffer, Dtype, ReadOutput, SampleFormat, interleave, shape_output};
use crate::ops::ReadOptions;
use crate::range::{RangePolicy, ResolvedRange, Window, resolve};

impl AudioBuffer {
    /// Reads the windowed range into the requested output form.
    ///
    /// Positions outside `[0, len)` read as 0.0; the buffer is never
    /// mutated. A single-channel selection yields [`ReadOutput::Mono`]
    /// (flat), anything else planar or interleaved data per the options.
    /// Quantized (non-f32) output requires a flat shape, so multi-channel
    /// planar requests with a quantized width fail with a shape mismatch.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use audio_edit::{AudioBuffer, ChannelSel, ReadOptions, Window};
    ///
    /// let buf = AudioBuffer::from_source(vec![vec![0.0f32, 0.5, 1.0]], 44100).unwrap();
    /// let data = buf
    ///     .read(Window::all(), &ReadOptions { channel: ChannelSel::One(0), ..Default::default() })
    ///     .unwrap();
    /// assert_eq!(data.into_mono().unwrap(), vec![0.0, 0.5, 1.0]);
    /// ```
    pub fn read(&self, window: Window, opts: &ReadOptions) -> AudioEditResult<ReadOutput> {
        let selected = opts.channel.resolve(self.channels())?;
        let range = resolve(window, self.sample_rate, self.len(), RangePolicy::ZeroFill)?;
        let channels: Vec<Vec<f32>> = selected.iter().map(|&ch| self.gather(ch, range)).collect();
        shape_output(channels, opts.channel.is_single(), opts.format, opts.dtype)
    }

    /// Reads the windowed range into a caller-supplied flat destination.
    ///
    /// The destination's numeric width wins; an explicit non-f32
    /// `opts.dtype` that disagrees with it is a shape mismatch, as is a
    /// destination shorter than the produced data or a multi-channel planar
    /// read into a flat container. Returns the number of samples stored.
    pub fn read_into(
        &self,
        window: Window,
        opts: &ReadOptions,
        dest: &mut DestBuffer<'_>,
    ) -> AudioEditResult<usize> {
        if opts.dtype != Dtype::F32 && opts.dtype != dest.dtype() {
            return Err(AudioEditError::ShapeMismatch(format!(
                "Requested {:?} output but the destination holds {:?}",
                opts.dtype,
                dest.dtype()
            )));
        }
        let selected = opts.channel.resolve(self.channels())?;
        let range = resolve(window, self.sample_rate, self.len(), RangePolicy::ZeroFill)?;
        let channels: Vec<Vec<f32>> = selected.iter().map(|&ch| self.gather(ch, range)).collect();

        let flat = if channels.len() == 1 {
            channels.into_iter().next().unwrap_or_default()
        } else if opts.format == SampleFormat::Interleaved {
            interleave(&channels)
        } else {
            return Err(AudioEditError::ShapeMismatch(
                "A flat destination requires a single channel or an interleaved format"
                    .to_string(),
            ));
        };
        dest.store(&flat)
    }

    /// Collects one channel over a resolved range, zero-filling positions
    /// outside storage.
    fn gather(&self, channel: usize, range: ResolvedRange) -> Vec<f32> {
        let len = self.len() as isize;
        (range.start..range.end)
            .map(|i| {
                if (0..len).contains(&i) {
                    self.data[[channel, i as usize]]
                } else {
                    0.0
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{ChannelSel, PcmSamples};

    fn saw_three_channels() -> AudioBuffer {
        let saw: Vec<f32> = (0..10).map(|i| i as f32 / 10.0).collect();
        AudioBuffer::from_source(vec![saw.clone(), saw.clone(), saw], 44100).unwrap()
    }

    #[test]
    fn test_read_single_channel() {
        let buf = saw_three_channels();
        let data = buf
            .read(
                Window::all(),
                &ReadOptions {
                    channel: ChannelSel::One(1),
                    ..Default::default()
                },
            )
            .unwrap()
            .into_mono()
            .unwrap();
        assert_eq!(data, vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]);
    }

    #[test]
    fn test_read_all_channels_planar() {
        let buf = AudioBuffer::from_source(
            vec![vec![0.0f32, 0.1], vec![0.0, 0.2], vec![0.0, 0.3]],
            44100,
        )
        .unwrap();
        let data = buf.read(Window::all(), &ReadOptions::default()).unwrap();
        assert_eq!(
            data.into_planar().unwrap(),
            vec![vec![0.0, 0.1], vec![0.0, 0.2], vec![0.0, 0.3]]
        );
    }

    #[test]
    fn test_read_range_with_span() {
        let buf = saw_three_channels();
        let data = buf
            .read(Window::span(2.0 / 44100.0, 8.0 / 44100.0), &ReadOptions::default())
            .unwrap()
            .into_planar()
            .unwrap();
        assert_eq!(data[0].len(), 8);
        assert_eq!(data[0], vec![0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]);
    }

    #[test]
    fn test_read_quantized_channel() {
        let buf = saw_three_channels();
        let data = buf
            .read(
                Window::all(),
                &ReadOptions {
                    channel: ChannelSel::One(0),
                    dtype: Dtype::U8,
                    ..Default::default()
                },
            )
            .unwrap()
            .into_pcm()
            .unwrap();
        assert_eq!(
            data,
            PcmSamples::U8(vec![127, 140, 153, 165, 178, 191, 204, 216, 229, 242])
        );
    }

    #[test]
    fn test_read_interleaved_subset() {
        let buf = saw_three_channels();
        let data = buf
            .read(
                Window::span(6, 2),
                &ReadOptions {
                    channel: ChannelSel::List(vec![1, 2]),
                    format: SampleFormat::Interleaved,
                    ..Default::default()
                },
            )
            .unwrap()
            .into_interleaved()
            .unwrap();
        assert_eq!(data, vec![0.6, 0.6, 0.7, 0.7]);
    }

    #[test]
    fn test_read_beyond_end_zero_fills() {
        let buf = AudioBuffer::from_source(vec![vec![0.5f32, 0.6]], 44100).unwrap();
        let data = buf
            .read(
                Window::span(1, 3),
                &ReadOptions {
                    channel: ChannelSel::One(0),
                    ..Default::default()
                },
            )
            .unwrap()
            .into_mono()
            .unwrap();
        assert_eq!(data, vec![0.6, 0.0, 0.0]);
    }

    #[test]
    fn test_read_before_start_is_silent() {
        let buf = AudioBuffer::silent(10, 2, 44100).unwrap();
        let data = buf
            .read(Window::starting(-100), &ReadOptions::default())
            .unwrap()
            .into_planar()
            .unwrap();
        assert_eq!(data[0].len(), 100);
        assert!(data.iter().all(|ch| ch.iter().all(|&v| v == 0.0)));
    }

    #[test]
    fn test_read_missing_channel_fails() {
        let silence = AudioBuffer::silent(10, 1, 44100).unwrap();
        let err = silence
            .read(
                Window::all(),
                &ReadOptions {
                    channel: ChannelSel::One(1),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, AudioEditError::OutOfRange(_)));
    }

    #[test]
    fn test_read_into_quantized_dest() {
        let buf = saw_three_channels();
        let mut dest = [0u8; 10];
        let n = buf
            .read_into(
                Window::all(),
                &ReadOptions {
                    channel: ChannelSel::One(0),
                    ..Default::default()
                },
                &mut DestBuffer::U8(&mut dest),
            )
            .unwrap();
        assert_eq!(n, 10);
        assert_eq!(dest, [127, 140, 153, 165, 178, 191, 204, 216, 229, 242]);
    }

    #[test]
    fn test_read_into_interleaved_i8() {
        let buf = saw_three_channels();
        let mut dest = [0i8; 3];
        let n = buf
            .read_into(
                Window::span(5, 1),
                &ReadOptions {
                    format: SampleFormat::Interleaved,
                    ..Default::default()
                },
                &mut DestBuffer::I8(&mut dest),
            )
            .unwrap();
        assert_eq!(n, 3);
        assert_eq!(dest, [63, 63, 63]);
    }

    #[test]
    fn test_read_into_planar_multichannel_rejected() {
        let buf = saw_three_channels();
        let mut dest = [0.0f32; 30];
        let err = buf
            .read_into(Window::all(), &ReadOptions::default(), &mut DestBuffer::F32(&mut dest))
            .unwrap_err();
        assert!(matches!(err, AudioEditError::ShapeMismatch(_)));
    }

    #[test]
    fn test_read_into_dtype_disagreement_rejected() {
        let buf = saw_three_channels();
        let mut dest = [0u8; 10];
        let err = buf
            .read_into(
                Window::all(),
                &ReadOptions {
                    channel: ChannelSel::One(0),
                    dtype: Dtype::I16,
                    ..Default::default()
                },
                &mut DestBuffer::U8(&mut dest),
            )
            .unwrap_err();
        assert!(matches!(err, AudioEditError::ShapeMismatch(_)));
    }
}
