//! Amplitude/decibel conversions and time/sample mapping helpers.
//!
//! These are the scalar conversions the operation engine is built on: gain,
//! fade and trim all express their levels in decibels and convert to linear
//! amplitude at the sample loop, and every time-valued argument is mapped to
//! a sample index through the buffer's sample rate.
//!
//! # Examples
//!
//! ```rust
//! use audio_edit::math::{amplitude_to_db, db_to_amplitude};
//!
//! let db = amplitude_to_db(0.1); // -20.0 dB
//! let amp = db_to_amplitude(-20.0); // 0.1
//! assert!((amp - 0.1).abs() < 1e-12);
//! ```

/// Floor returned by [`amplitude_to_db`] for non-positive amplitudes.
pub const DB_FLOOR: f64 = -80.0;

/// Converts linear amplitude to decibels.
///
/// Uses the formula `dB = 20 * log10(amplitude)` for amplitude ratios.
/// Non-positive amplitudes are floored at [`DB_FLOOR`] instead of producing
/// negative infinity.
///
/// # Examples
///
/// ```rust
/// use audio_edit::math::amplitude_to_db;
///
/// let db = amplitude_to_db(1.0); // 0.0 dB
/// let db_half = amplitude_to_db(0.5); // ≈ -6.02 dB
/// ```
pub fn amplitude_to_db(amplitude: f64) -> f64 {
    if amplitude > 0.0 {
        20.0 * amplitude.log10()
    } else {
        DB_FLOOR
    }
}

/// Converts decibels to linear amplitude.
///
/// Uses the formula `amplitude = 10^(dB / 20)` for amplitude ratios.
///
/// # Examples
///
/// ```rust
/// use audio_edit::math::db_to_amplitude;
///
/// let amp = db_to_amplitude(0.0); // 1.0
/// let amp_neg6 = db_to_amplitude(-6.0); // ≈ 0.501
/// ```
pub fn db_to_amplitude(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Converts a time in seconds to a sample index, rounding to the nearest
/// sample. Negative times yield negative indices.
pub fn seconds_to_samples(seconds: f64, sample_rate: u32) -> isize {
    (seconds * f64::from(sample_rate)).round() as isize
}

/// Converts a sample count to a duration in seconds.
pub fn samples_to_seconds(samples: usize, sample_rate: u32) -> f64 {
    samples as f64 / f64::from(sample_rate)
}
