#[cfg(feature = "serde")]
pub mod config; // Session configuration (RON)
pub mod dsp;
pub mod engine; // Audio context, voice arena
pub mod error;
pub mod graph; // Composable render graph nodes
pub mod io;
pub mod sequencing; // Pattern store, transport, editor session
pub mod voice; // Notes and per-step voice construction

pub use error::SequencerError;

pub const MAX_BLOCK_SIZE: usize = 2048;
/// Chunk size the audio context renders voices in. Block-rate modulation is
/// averaged over one quantum.
pub const RENDER_QUANTUM: usize = 128;
pub const DEFAULT_SAMPLE_RATE: f32 = 48_000.0;
