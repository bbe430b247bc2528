//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components stay focused on the signal-processing math so graph
//! combinators can layer on orchestration and modulation. Apart from the drive
//! curve (rebuilt for every voice) and the noise buffer, nothing here
//! allocates while rendering.

/// Parameter automation: values and linear ramps at absolute times.
pub mod automation;
/// Waveshaping curves and the lookup-table shaper.
pub mod distortion;
/// Scheduled attack/decay/sustain/release envelopes.
pub mod envelope;
/// State-variable filter with lowpass and bandpass responses.
pub mod filter;
/// Block-rate modulation helpers.
pub mod modulate;
/// Oscillator waveforms and noise sources.
pub mod oscillator;

