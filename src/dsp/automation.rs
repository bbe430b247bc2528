//! Parameter automation timeline.
//!
//! A `ParamTimeline` holds a time-ordered list of automation events for one
//! parameter and answers "what is the value at time t". It follows the usual
//! audio-param rules:
//!
//! - a `SetValue` event jumps to its value at its time and holds it
//! - a `LinearRamp` event interpolates linearly from the previous event's
//!   time and value to its own time and value
//! - before the first event the parameter sits at its default value
//!
//! Times are absolute seconds on the audio clock (`f64`), values are `f32`.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutomationEvent {
    SetValue { value: f32, time: f64 },
    LinearRamp { value: f32, time: f64 },
}

impl AutomationEvent {
    #[inline]
    pub fn time(&self) -> f64 {
        match *self {
            AutomationEvent::SetValue { time, .. } | AutomationEvent::LinearRamp { time, .. } => time,
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        match *self {
            AutomationEvent::SetValue { value, .. }
            | AutomationEvent::LinearRamp { value, .. } => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamTimeline {
    default_value: f32,
    events: Vec<AutomationEvent>,
}

impl ParamTimeline {
    pub fn new(default_value: f32) -> Self {
        Self {
            default_value,
            events: Vec::with_capacity(8),
        }
    }

    pub fn events(&self) -> &[AutomationEvent] {
        &self.events
    }

    /// Time of the last scheduled event, if any.
    pub fn end_time(&self) -> Option<f64> {
        self.events.last().map(AutomationEvent::time)
    }

    pub fn set_value_at_time(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(AutomationEvent::SetValue { value, time });
        self
    }

    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(AutomationEvent::LinearRamp { value, time });
        self
    }

    /// Drop every event at or after `time`.
    pub fn cancel_scheduled_values(&mut self, time: f64) -> &mut Self {
        self.events.retain(|event| event.time() < time);
        self
    }

    /// Drop every event at or after `time`, keeping the value the timeline
    /// had reached at `time` as a held value from then on.
    pub fn cancel_and_hold_at_time(&mut self, time: f64) -> &mut Self {
        let held = self.value_at(time);
        self.cancel_scheduled_values(time);

        // A ramp ending at (time, held) lies on the same line as whatever
        // segment was in progress, so the values before `time` are unchanged.
        if self.events.is_empty() {
            self.events.push(AutomationEvent::SetValue { value: held, time });
        } else {
            self.events.push(AutomationEvent::LinearRamp { value: held, time });
        }
        self
    }

    /// Value of the parameter at absolute time `t`.
    pub fn value_at(&self, t: f64) -> f32 {
        // Index of the first event strictly after t
        let next = self.events.partition_point(|event| event.time() <= t);

        let (prev_time, prev_value) = match next.checked_sub(1) {
            Some(index) => {
                let event = &self.events[index];
                (Some(event.time()), event.value())
            }
            None => (None, self.default_value),
        };

        match self.events.get(next) {
            Some(&AutomationEvent::LinearRamp { value, time }) => {
                // Ramps with no earlier event start from the default at t = 0
                let start = prev_time.unwrap_or(0.0);
                let span = time - start;
                if span <= 0.0 {
                    return value;
                }
                let progress = ((t - start) / span).clamp(0.0, 1.0) as f32;
                prev_value + (value - prev_value) * progress
            }
            _ => prev_value,
        }
    }

    /// Render per-sample values starting at `start_time`.
    pub fn render(&self, out: &mut [f32], start_time: f64, sample_rate: f32) {
        let dt = 1.0 / sample_rate as f64;
        for (i, sample) in out.iter_mut().enumerate() {
            *sample = self.value_at(start_time + i as f64 * dt);
        }
    }

    fn insert(&mut self, event: AutomationEvent) {
        // Events at the same time keep insertion order
        let index = self.events.partition_point(|e| e.time() <= event.time());
        self.events.insert(index, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn default_before_any_event() {
        let mut timeline = ParamTimeline::new(1.0);
        timeline.set_value_at_time(0.5, 2.0);

        assert!(approx(timeline.value_at(0.0), 1.0));
        assert!(approx(timeline.value_at(1.99), 1.0));
        assert!(approx(timeline.value_at(2.0), 0.5));
        assert!(approx(timeline.value_at(10.0), 0.5));
    }

    #[test]
    fn ramp_interpolates_from_previous_event() {
        let mut timeline = ParamTimeline::new(0.0);
        timeline
            .set_value_at_time(0.0, 1.0)
            .linear_ramp_to_value_at_time(1.0, 2.0);

        assert!(approx(timeline.value_at(1.0), 0.0));
        assert!(approx(timeline.value_at(1.5), 0.5));
        assert!(approx(timeline.value_at(1.75), 0.75));
        assert!(approx(timeline.value_at(2.0), 1.0));
        assert!(approx(timeline.value_at(3.0), 1.0));
    }

    #[test]
    fn events_are_kept_in_time_order() {
        let mut timeline = ParamTimeline::new(0.0);
        timeline
            .linear_ramp_to_value_at_time(1.0, 2.0)
            .set_value_at_time(0.0, 1.0);

        let times: Vec<f64> = timeline.events().iter().map(AutomationEvent::time).collect();
        assert_eq!(times, vec![1.0, 2.0]);
        assert!(approx(timeline.value_at(1.5), 0.5));
    }

    #[test]
    fn cancel_removes_later_events() {
        let mut timeline = ParamTimeline::new(0.0);
        timeline
            .set_value_at_time(0.2, 0.0)
            .set_value_at_time(0.8, 1.0)
            .cancel_scheduled_values(1.0);

        assert_eq!(timeline.events().len(), 1);
        assert!(approx(timeline.value_at(5.0), 0.2));
    }

    #[test]
    fn cancel_and_hold_freezes_mid_ramp() {
        let mut timeline = ParamTimeline::new(0.0);
        timeline
            .set_value_at_time(0.0, 0.0)
            .linear_ramp_to_value_at_time(1.0, 1.0)
            .cancel_and_hold_at_time(0.25);

        assert!(approx(timeline.value_at(0.1), 0.1));
        assert!(approx(timeline.value_at(0.25), 0.25));
        assert!(approx(timeline.value_at(0.9), 0.25));
    }

    #[test]
    fn render_walks_sample_times() {
        let mut timeline = ParamTimeline::new(0.0);
        timeline
            .set_value_at_time(0.0, 0.0)
            .linear_ramp_to_value_at_time(1.0, 0.004);

        let mut out = [0.0f32; 5];
        timeline.render(&mut out, 0.0, 1_000.0);

        for (i, value) in out.iter().enumerate() {
            assert!(approx(*value, i as f32 * 0.25), "sample {i} = {value}");
        }
    }
}
