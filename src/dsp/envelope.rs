use super::automation::ParamTimeline;

/*
Scheduled ADSR Envelope
=======================

A step sequencer knows the whole life of a note the moment it triggers it:
when it starts, how long the gate stays open, and how long the release is.
So instead of a gate-driven state machine advancing sample by sample, the
envelope here is written up front as automation on a gain parameter.

Vocabulary
----------

  peak        The level the attack ramps to. For a step voice this is
              `vol * drive`, so louder notes and harder drive both push the
              waveshaper further.

  sustain     Fraction of the peak held after the decay (0.0 to 1.0).

  hold_until  Absolute time the gate closes. The release starts here.


The Shape
---------

  Level
   peak ┐     ╱╲
        │    ╱  ╲___________
   peak │   ╱               ╲
   *S   │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        t0  +A   +A+D   hold_until  +R

Written as automation events, in order:

  1. cancel everything from t0 on
  2. set 0 at t0
  3. ramp to peak at t0 + A
  4. ramp to peak * S at t0 + A + D
  5. cancel and hold at hold_until
  6. ramp to 0 at hold_until + R

Step 5 matters for short gates. If the gate closes during the attack or the
decay, the ramps that have not finished yet are cut off and the release
starts from the level actually reached, so the envelope never jumps.

  Level         gate closes mid-attack
   peak ┐
        │    ╱│
        │   ╱ │╲
        │  ╱  │ ╲
    0.0 └─╱───┴──╲──→ Time
        t0  hold  +R
*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeShape {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
    pub peak: f32,
}

impl EnvelopeShape {
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32, peak: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
            peak,
        }
    }

    /// Write the envelope into `timeline` for a gate open from `start` to
    /// `hold_until`.
    pub fn schedule(&self, timeline: &mut ParamTimeline, start: f64, hold_until: f64) {
        let attack_end = start + self.attack as f64;
        let decay_end = attack_end + self.decay as f64;

        timeline
            .cancel_scheduled_values(start)
            .set_value_at_time(0.0, start)
            .linear_ramp_to_value_at_time(self.peak, attack_end)
            .linear_ramp_to_value_at_time(self.peak * self.sustain, decay_end)
            .cancel_and_hold_at_time(hold_until)
            .linear_ramp_to_value_at_time(0.0, self.end_time(hold_until));
    }

    /// Time the release reaches zero for a gate closing at `hold_until`.
    pub fn end_time(&self, hold_until: f64) -> f64 {
        hold_until + self.release as f64
    }
}
