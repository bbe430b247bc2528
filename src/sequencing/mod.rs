pub mod pattern;
pub mod session;
pub mod transport;

pub use pattern::{Pattern, PatternStore};
pub use session::{EditorControls, Selection, Session, StepParam};
pub use transport::{StepTick, Transport, TransportState};
