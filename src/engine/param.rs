//! Scheduled parameter timelines
//!
//! A `ScheduledParam` holds a value that evolves along a timeline of
//! scheduled events: step changes and linear ramps, each anchored to the
//! engine clock. Readers sample the instantaneous value; writers schedule
//! ahead or cancel everything from a point in time forward.

/// A single scheduled event on a parameter timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ParamEvent {
    /// Step to `value` at `time` and hold.
    Set { time: f64, value: f64 },
    /// Linear ramp ending at `time` with `value`, starting from the
    /// previous event's value and time.
    Ramp { time: f64, value: f64 },
}

impl ParamEvent {
    fn time(&self) -> f64 {
        match *self {
            ParamEvent::Set { time, .. } | ParamEvent::Ramp { time, .. } => time,
        }
    }

    fn value(&self) -> f64 {
        match *self {
            ParamEvent::Set { value, .. } | ParamEvent::Ramp { value, .. } => value,
        }
    }
}

/// A parameter with a scheduled-value timeline.
pub struct ScheduledParam {
    /// Value before any event applies.
    initial: f64,
    /// Events sorted by time (insertion order breaks ties).
    events: Vec<ParamEvent>,
}

impl ScheduledParam {
    /// Create a parameter holding `initial` until the first event.
    pub fn new(initial: f64) -> Self {
        Self {
            initial,
            events: Vec::new(),
        }
    }

    /// Schedule a step to `value` at `time`.
    pub fn set_value_at_time(&mut self, value: f64, time: f64) {
        self.insert(ParamEvent::Set { time, value });
    }

    /// Schedule a linear ramp ending at `time` with `value`.
    ///
    /// The ramp starts from the previous event on the timeline. With no
    /// prior event it anchors at the initial value at time zero.
    pub fn linear_ramp_to_value_at_time(&mut self, value: f64, time: f64) {
        self.insert(ParamEvent::Ramp { time, value });
    }

    /// Drop every event scheduled at or after `time`. Events strictly
    /// before `time` keep shaping the value.
    pub fn cancel_scheduled_values(&mut self, time: f64) {
        self.events.retain(|e| e.time() < time);
    }

    /// Sample the instantaneous value at `time`.
    pub fn value_at(&self, time: f64) -> f64 {
        // Index of the first event strictly after `time`.
        let next = self.events.partition_point(|e| e.time() <= time);

        let (anchor_time, anchor_value) = if next == 0 {
            (0.0, self.initial)
        } else {
            let e = &self.events[next - 1];
            (e.time(), e.value())
        };

        if let Some(ParamEvent::Ramp {
            time: ramp_end,
            value: ramp_value,
        }) = self.events.get(next)
        {
            let span = ramp_end - anchor_time;
            if span > 0.0 {
                let frac = ((time - anchor_time) / span).clamp(0.0, 1.0);
                return anchor_value + (ramp_value - anchor_value) * frac;
            }
            return *ramp_value;
        }

        anchor_value
    }

    /// Drop history that can no longer affect samples at or after `time`.
    ///
    /// The clock is monotonic, so once a later event fully covers a query
    /// point the events before it are dead weight.
    pub fn prune_before(&mut self, time: f64) {
        while self.events.len() >= 2 && self.events[1].time() <= time {
            self.events.remove(0);
        }
    }

    /// Number of pending and historical events on the timeline.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    fn insert(&mut self, event: ParamEvent) {
        let pos = self.events.partition_point(|e| e.time() <= event.time());
        self.events.insert(pos, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_value() {
        let param = ScheduledParam::new(0.25);
        assert_eq!(param.value_at(0.0), 0.25);
        assert_eq!(param.value_at(100.0), 0.25);
    }

    #[test]
    fn test_set_value_holds() {
        let mut param = ScheduledParam::new(0.0);
        param.set_value_at_time(0.5, 1.0);

        assert_eq!(param.value_at(0.5), 0.0);
        assert_eq!(param.value_at(1.0), 0.5);
        assert_eq!(param.value_at(10.0), 0.5);
    }

    #[test]
    fn test_linear_ramp_interpolates() {
        let mut param = ScheduledParam::new(0.0);
        param.set_value_at_time(0.0, 0.0);
        param.linear_ramp_to_value_at_time(1.0, 4.0);

        assert_eq!(param.value_at(0.0), 0.0);
        assert!((param.value_at(1.0) - 0.25).abs() < 1e-9);
        assert!((param.value_at(2.0) - 0.5).abs() < 1e-9);
        assert_eq!(param.value_at(4.0), 1.0);
        // Completed ramp holds its end value
        assert_eq!(param.value_at(8.0), 1.0);
    }

    #[test]
    fn test_attack_release_shape() {
        // The envelope shape the scheduler issues: 0 at t, peak at t+4, 0 at t+8
        let mut param = ScheduledParam::new(0.0);
        param.set_value_at_time(0.0, 2.0);
        param.linear_ramp_to_value_at_time(0.0625, 6.0);
        param.linear_ramp_to_value_at_time(0.0, 10.0);

        assert_eq!(param.value_at(2.0), 0.0);
        assert!((param.value_at(6.0) - 0.0625).abs() < 1e-9);
        assert!((param.value_at(8.0) - 0.03125).abs() < 1e-9);
        assert_eq!(param.value_at(10.0), 0.0);
        assert_eq!(param.value_at(20.0), 0.0);
    }

    #[test]
    fn test_cancel_drops_future_keeps_past() {
        let mut param = ScheduledParam::new(0.0);
        param.set_value_at_time(0.1, 1.0);
        param.set_value_at_time(0.9, 5.0);

        param.cancel_scheduled_values(3.0);

        // Past event survives, future event is gone
        assert_eq!(param.value_at(2.0), 0.1);
        assert_eq!(param.value_at(6.0), 0.1);
        assert_eq!(param.event_count(), 1);
    }

    #[test]
    fn test_cancel_mid_ramp() {
        let mut param = ScheduledParam::new(0.0);
        param.set_value_at_time(0.0, 0.0);
        param.linear_ramp_to_value_at_time(1.0, 4.0);

        // Cancelling at t=2 removes the ramp entirely; value falls back
        // to the last surviving event
        param.cancel_scheduled_values(2.0);
        assert_eq!(param.value_at(2.0), 0.0);
        assert_eq!(param.value_at(4.0), 0.0);
    }

    #[test]
    fn test_reschedule_after_cancel() {
        let mut param = ScheduledParam::new(0.0);
        param.set_value_at_time(0.0, 0.0);
        param.linear_ramp_to_value_at_time(0.0625, 4.0);
        param.linear_ramp_to_value_at_time(0.0, 8.0);

        // Retrigger at t=2: cancel and lay down a fresh cycle
        param.cancel_scheduled_values(2.0);
        param.set_value_at_time(0.0, 2.0);
        param.linear_ramp_to_value_at_time(0.05, 6.0);
        param.linear_ramp_to_value_at_time(0.0, 10.0);

        assert_eq!(param.value_at(2.0), 0.0);
        assert!((param.value_at(6.0) - 0.05).abs() < 1e-9);
        assert_eq!(param.value_at(10.0), 0.0);
    }

    #[test]
    fn test_ramp_without_anchor() {
        let mut param = ScheduledParam::new(0.5);
        param.linear_ramp_to_value_at_time(1.0, 2.0);

        // Anchors at the initial value at time zero
        assert!((param.value_at(1.0) - 0.75).abs() < 1e-9);
        assert_eq!(param.value_at(2.0), 1.0);
    }

    #[test]
    fn test_prune_keeps_current_value() {
        let mut param = ScheduledParam::new(0.0);
        param.set_value_at_time(0.1, 1.0);
        param.set_value_at_time(0.2, 2.0);
        param.set_value_at_time(0.3, 3.0);

        param.prune_before(5.0);

        assert_eq!(param.event_count(), 1);
        assert_eq!(param.value_at(5.0), 0.3);
    }

    #[test]
    fn test_prune_preserves_active_ramp() {
        let mut param = ScheduledParam::new(0.0);
        param.set_value_at_time(0.0, 0.0);
        param.linear_ramp_to_value_at_time(1.0, 10.0);

        param.prune_before(5.0);

        // The anchor for the in-flight ramp must survive
        assert!((param.value_at(5.0) - 0.5).abs() < 1e-9);
    }
}
