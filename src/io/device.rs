use rtrb::{Consumer, Producer, RingBuffer};

use crate::SequencerError;

pub type ResumeResult = Result<(), SequencerError>;

/*
Device Resume
=============

Starting an output device can take a while (a platform permission prompt, a
driver waking up), and the editor must not block on it. `OutputDevice::resume`
therefore hands back a one-shot `Resume` instead of a result:

  editor thread                     device / backend thread
  -------------                     -----------------------
  let resume = device.resume();     ...
  session.toggle_playback(..)       signal.complete(Ok(()))
  ...                                        │
  audio callback: poll_resume() ◀────────────┘  (single-slot rtrb ring)

A `Resume` is read at most once. If it never completes, the transport just
stays stopped.
*/

/// One-shot completion of a device resume.
pub struct Resume {
    rx: Consumer<ResumeResult>,
}

/// Completing half of a pending `Resume`.
pub struct ResumeSignal {
    tx: Producer<ResumeResult>,
}

impl Resume {
    /// A resume that has already finished with `result`.
    pub fn ready(result: ResumeResult) -> Self {
        let (resume, signal) = Self::pending();
        signal.complete(result);
        resume
    }

    /// A resume that finishes when the returned signal is completed.
    pub fn pending() -> (Self, ResumeSignal) {
        let (tx, rx) = RingBuffer::new(1);
        (Self { rx }, ResumeSignal { tx })
    }

    /// Take the result if the resume has finished.
    pub fn poll(&mut self) -> Option<ResumeResult> {
        self.rx.pop().ok()
    }

    /// True once the signal has been dropped without completing.
    pub fn is_abandoned(&self) -> bool {
        self.rx.is_abandoned() && self.rx.is_empty()
    }
}

impl ResumeSignal {
    pub fn complete(mut self, result: ResumeResult) {
        // The slot is only ever written once, so the push cannot find it full
        let _ = self.tx.push(result);
    }
}

/// An audio output that can be asked to start.
pub trait OutputDevice {
    fn resume(&mut self) -> Resume;
}

/// Output with nothing behind it: resumes immediately. Used for offline
/// rendering and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineDevice;

impl OutputDevice for OfflineDevice {
    fn resume(&mut self) -> Resume {
        Resume::ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_resume_yields_once() {
        let mut resume = Resume::ready(Ok(()));
        assert_eq!(resume.poll(), Some(Ok(())));
        assert_eq!(resume.poll(), None);
    }

    #[test]
    fn pending_resume_waits_for_signal() {
        let (mut resume, signal) = Resume::pending();
        assert_eq!(resume.poll(), None);
        assert!(!resume.is_abandoned());

        signal.complete(Err(SequencerError::DeviceUnavailable("no device".into())));
        assert!(matches!(
            resume.poll(),
            Some(Err(SequencerError::DeviceUnavailable(_)))
        ));
    }

    #[test]
    fn dropped_signal_abandons_resume() {
        let (mut resume, signal) = Resume::pending();
        drop(signal);
        assert!(resume.is_abandoned());
        assert_eq!(resume.poll(), None);
    }
}
