//! Resolved description of one step voice.
//!
//! A `VoicePlan` is everything `play_once` decides about a note before any
//! node exists: when the voice starts and stops, what the source is, the
//! filter settings, the envelope automation, where the LFO goes and how hard
//! the drive is. Building voices from plans keeps routing decisions testable
//! without rendering audio.

use crate::{
    dsp::{
        automation::ParamTimeline, envelope::EnvelopeShape, filter::q_from_db,
        oscillator::OscillatorWaveform,
    },
    voice::note::{LfoTarget, Note, Waveform},
};

/// Linear Q of the noise tone bandpass.
pub const NOISE_TONE_Q: f32 = 1.0;

/// Centre frequency of the noise tone filter for a tone in [0, 1].
#[inline]
pub fn noise_tone_hz(tone: f32) -> f32 {
    200.0 + tone * 8000.0
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourcePlan {
    Oscillator { waveform: OscillatorWaveform, freq: f32 },
    /// White noise buffer through a bandpass centred on `tone_hz`
    Noise { buffer_len: usize, tone_hz: f32 },
}

/// Parameter an LFO adds to once the note is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModTarget {
    Pitch,
    Gain,
    Cutoff,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LfoRoute {
    pub rate: f32,
    pub depth: f32,
    pub target: ModTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoicePlan {
    /// Clock time the source and envelope start
    pub start: f64,
    /// Clock time the source stops: start + base duration + release
    pub stop: f64,
    pub source: SourcePlan,
    pub cutoff: f32,
    /// Linear Q of the lowpass
    pub q: f32,
    pub envelope: EnvelopeShape,
    pub gain: ParamTimeline,
    pub lfo: Option<LfoRoute>,
    pub drive: f32,
}

impl VoicePlan {
    pub fn new(note: &Note, base_duration: f32, start: f64, sample_rate: f32) -> Self {
        let drive = note.adsr.drive();
        let hold_until = start + base_duration as f64;
        let lifetime = base_duration + note.adsr.release;
        let stop = start + lifetime as f64;

        let source = match note.osc.oscillator() {
            Some(waveform) => SourcePlan::Oscillator {
                waveform,
                freq: note.freq,
            },
            None => SourcePlan::Noise {
                buffer_len: (sample_rate * lifetime * 2.0).max(0.0) as usize,
                tone_hz: noise_tone_hz(note.noise_tone),
            },
        };

        let envelope = EnvelopeShape::new(
            note.adsr.attack,
            note.adsr.decay,
            note.adsr.sustain,
            note.adsr.release,
            note.vol * drive,
        );
        let mut gain = ParamTimeline::new(0.0);
        envelope.schedule(&mut gain, start, hold_until);

        Self {
            start,
            stop,
            source,
            cutoff: note.filter_cutoff,
            q: q_from_db(note.filter_res),
            envelope,
            gain,
            lfo: lfo_route(note),
            drive,
        }
    }

    pub fn is_noise(&self) -> bool {
        matches!(self.source, SourcePlan::Noise { .. })
    }
}

fn lfo_route(note: &Note) -> Option<LfoRoute> {
    if !note.lfo_enabled() {
        return None;
    }

    let target = match (note.lfo_target, note.osc) {
        // Noise has no pitch to modulate
        (LfoTarget::Freq, Waveform::Noise) => return None,
        (LfoTarget::Freq, _) => ModTarget::Pitch,
        (LfoTarget::Vol, _) => ModTarget::Gain,
        (LfoTarget::Filter, _) => ModTarget::Cutoff,
        (LfoTarget::None, _) => return None,
    };

    Some(LfoRoute {
        rate: note.lfo_rate,
        depth: note.lfo_depth,
        target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::note::Adsr;

    fn lfo_note(osc: Waveform, target: LfoTarget) -> Note {
        Note {
            osc,
            lfo_rate: 4.0,
            lfo_depth: 50.0,
            lfo_target: target,
            ..Note::default()
        }
    }

    #[test]
    fn envelope_peaks_at_vol_times_drive() {
        let note = Note {
            vol: 0.8,
            adsr: Adsr {
                attack: 0.01,
                decay: 0.1,
                sustain: 0.7,
                release: 0.2,
                drive: Some(0.5),
            },
            ..Note::default()
        };
        let t0 = 1.0;
        let plan = VoicePlan::new(&note, 0.12, t0, 48_000.0);

        assert!((plan.gain.value_at(t0 + 0.01) - 0.4).abs() < 1e-4);
        assert!((plan.gain.value_at(t0 + 0.11) - 0.28).abs() < 1e-4);
        assert!((plan.stop - (t0 + 0.32)).abs() < 1e-6);
        assert!(plan.gain.value_at(plan.stop + 0.001).abs() < 1e-6);
    }

    #[test]
    fn missing_drive_defaults_to_half() {
        let plan = VoicePlan::new(&Note::default(), 0.12, 0.0, 48_000.0);
        assert_eq!(plan.drive, 0.5);
        assert!((plan.envelope.peak - 0.2).abs() < 1e-6);
    }

    #[test]
    fn noise_source_sizes_buffer_and_tone() {
        let note = Note {
            osc: Waveform::Noise,
            noise_tone: 0.5,
            adsr: Adsr {
                release: 0.2,
                ..Adsr::default()
            },
            ..Note::default()
        };
        let plan = VoicePlan::new(&note, 0.1, 0.0, 1_000.0);

        match plan.source {
            SourcePlan::Noise { buffer_len, tone_hz } => {
                // 1000 * (0.1 + 0.2) * 2
                assert!((599..=600).contains(&buffer_len), "got {buffer_len}");
                assert_eq!(tone_hz, 4_200.0);
            }
            other => panic!("expected noise source, got {other:?}"),
        }
    }

    #[test]
    fn lowpass_resonance_is_read_in_db() {
        let note = Note {
            filter_res: 20.0,
            ..Note::default()
        };
        let plan = VoicePlan::new(&note, 0.12, 0.0, 48_000.0);
        assert!((plan.q - 10.0).abs() < 1e-3);
    }

    #[test]
    fn noise_skips_pitch_lfo() {
        let plan = VoicePlan::new(&lfo_note(Waveform::Noise, LfoTarget::Freq), 0.12, 0.0, 48_000.0);
        assert_eq!(plan.lfo, None);
    }

    #[test]
    fn noise_honours_vol_and_filter_lfo() {
        let vol = VoicePlan::new(&lfo_note(Waveform::Noise, LfoTarget::Vol), 0.12, 0.0, 48_000.0);
        assert_eq!(vol.lfo.map(|route| route.target), Some(ModTarget::Gain));

        let filter = VoicePlan::new(&lfo_note(Waveform::Noise, LfoTarget::Filter), 0.12, 0.0, 48_000.0);
        assert_eq!(filter.lfo.map(|route| route.target), Some(ModTarget::Cutoff));
    }

    #[test]
    fn oscillator_routes_pitch_lfo() {
        let plan = VoicePlan::new(&lfo_note(Waveform::Sawtooth, LfoTarget::Freq), 0.12, 0.0, 48_000.0);
        assert_eq!(
            plan.lfo,
            Some(LfoRoute {
                rate: 4.0,
                depth: 50.0,
                target: ModTarget::Pitch
            })
        );
    }
}
