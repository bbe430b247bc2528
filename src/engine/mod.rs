pub mod arena;
pub mod context;

pub use arena::VoiceArena;
pub use context::{AudioContext, ContextState};
