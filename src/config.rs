use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    sequencing::{
        pattern::{PatternStore, DEFAULT_PATTERNS, DEFAULT_STEPS, DEFAULT_TRACKS},
        session::{Session, DEFAULT_BASE_DURATION},
        transport::DEFAULT_TEMPO,
    },
    SequencerError, DEFAULT_SAMPLE_RATE,
};

/// Startup settings for a session, read from RON:
///
/// ```ron
/// (
///     tracks: 6,
///     tempo: 96.0,
///     seed: Some(7),
/// )
/// ```
///
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub tracks: usize,
    pub steps: usize,
    pub patterns: usize,
    /// Beats per minute
    pub tempo: f32,
    /// Gate time of each step in seconds, before the release
    pub base_duration: f32,
    /// Used when no output device dictates a rate
    pub sample_rate: f32,
    /// Seed for the noise generator; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tracks: DEFAULT_TRACKS,
            steps: DEFAULT_STEPS,
            patterns: DEFAULT_PATTERNS,
            tempo: DEFAULT_TEMPO,
            base_duration: DEFAULT_BASE_DURATION,
            sample_rate: DEFAULT_SAMPLE_RATE,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, SequencerError> {
        let config: Self =
            ron::from_str(source).map_err(|e| SequencerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SequencerError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            SequencerError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_ron_str(&source)
    }

    pub fn validate(&self) -> Result<(), SequencerError> {
        let counts = [
            ("tracks", self.tracks),
            ("steps", self.steps),
            ("patterns", self.patterns),
        ];
        if let Some((name, _)) = counts.iter().find(|(_, n)| *n == 0) {
            return Err(SequencerError::InvalidConfig(format!("{name} must be at least 1")));
        }

        let positive = [
            ("tempo", self.tempo),
            ("base_duration", self.base_duration),
            ("sample_rate", self.sample_rate),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, v)| !(v.is_finite() && *v > 0.0)) {
            return Err(SequencerError::InvalidConfig(format!(
                "{name} must be a positive number, got {value}"
            )));
        }

        Ok(())
    }

    /// A fresh session with an empty pattern store of the configured size.
    pub fn session(&self) -> Session {
        Session::new(
            PatternStore::new(self.patterns, self.tracks, self.steps),
            self.tempo,
            self.base_duration,
        )
    }
}
