use std::fmt;

/// Which grid axis an index was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexAxis {
    Pattern,
    Track,
    Step,
}

impl fmt::Display for IndexAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndexAxis::Pattern => "pattern",
            IndexAxis::Track => "track",
            IndexAxis::Step => "step",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by the sequencer core.
///
/// Out-of-range note values (negative volume, zero cutoff, ...) are not an
/// error: the editor owns range-constraining its inputs and the signal result
/// is simply undefined.
#[derive(Debug, Clone, PartialEq)]
pub enum SequencerError {
    /// A pattern, track or step index outside the grid
    IndexOutOfRange { axis: IndexAxis, index: usize, len: usize },
    /// The audio context is closed or the output device failed to start
    DeviceUnavailable(String),
    /// A configuration value was rejected
    InvalidConfig(String),
}

impl SequencerError {
    pub(crate) fn check_index(axis: IndexAxis, index: usize, len: usize) -> Result<(), Self> {
        if index < len {
            Ok(())
        } else {
            Err(SequencerError::IndexOutOfRange { axis, index, len })
        }
    }
}

impl fmt::Display for SequencerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequencerError::IndexOutOfRange { axis, index, len } => {
                write!(f, "{} index {} out of range (0..{})", axis, index, len)
            }
            SequencerError::DeviceUnavailable(reason) => {
                write!(f, "audio device unavailable: {}", reason)
            }
            SequencerError::InvalidConfig(reason) => {
                write!(f, "invalid configuration: {}", reason)
            }
        }
    }
}

impl std::error::Error for SequencerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_index_accepts_last_slot() {
        assert!(SequencerError::check_index(IndexAxis::Step, 15, 16).is_ok());
    }

    #[test]
    fn check_index_rejects_len() {
        let err = SequencerError::check_index(IndexAxis::Track, 4, 4).unwrap_err();
        assert_eq!(
            err,
            SequencerError::IndexOutOfRange {
                axis: IndexAxis::Track,
                index: 4,
                len: 4
            }
        );
        assert_eq!(err.to_string(), "track index 4 out of range (0..4)");
    }
}
