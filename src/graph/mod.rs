//! Composable building blocks for constructing step voices.
//!
//! Graph nodes wrap the low-level DSP primitives with the ergonomics a voice
//! needs: clock-aware rendering, modulation, and block-based processing. The
//! `extensions` module adds fluent helpers so a voice reads as a chain.

/// Lookup-table drive stage.
pub mod distortion;
/// Fluent combinators (`.through()`, `.modulate()`, `.boxed()`).
pub mod extensions;
/// Topology-preserving filter node with lowpass and bandpass responses.
pub mod filter;
/// Automated gain, the home of the envelope.
pub mod gain;
/// Low frequency oscillators for parameter modulation.
pub mod lfo;
/// Connect modulation sources to node parameters.
pub mod modulate;
/// Core traits shared by all graph nodes.
pub mod node;
/// Oscillator and noise buffer sources.
pub mod oscillator;
/// Serial chaining of two nodes (source -> effect).
pub mod through;
