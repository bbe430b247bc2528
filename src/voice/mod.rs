//! Step notes and the voices built from them.

/// Note, waveform, LFO target and ADSR records.
pub mod note;
/// Resolved per-note voice descriptions.
pub mod plan;
/// Render graphs with a fixed lifetime on the audio clock.
#[allow(clippy::module_inception)]
pub mod voice;

pub use note::{Adsr, LfoTarget, Note, Waveform, DEFAULT_DRIVE};
pub use plan::{LfoRoute, ModTarget, SourcePlan, VoicePlan};
pub use voice::ScheduledVoice;
