//! Real-world scenario benchmarks.
//!
//! Single step voices as the context schedules them, and whole sessions
//! rendering a busy pattern.

mod session;
mod voices;

pub use session::bench_session;
pub use voices::bench_voices;
