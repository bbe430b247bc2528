// Purpose - the audio output boundary

pub mod device;

pub use device::{OfflineDevice, OutputDevice, Resume, ResumeResult, ResumeSignal};
