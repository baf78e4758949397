//! Debounced redraw deadlines
//!
//! Filter and resize triggers each hold at most one pending deadline; a newer
//! trigger of the same kind pushes it back. The frame loop asks [`due`] each
//! frame and sleeps until [`next_deadline`] otherwise.
//!
//! [`due`]: RedrawScheduler::due
//! [`next_deadline`]: RedrawScheduler::next_deadline

use std::time::{Duration, Instant};

use crate::constants::timing::{FILTER_DEBOUNCE, GEOMETRY_RETRY, RESIZE_DEBOUNCE};

/// What caused a redraw request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Filter,
    Resize,
}

impl Trigger {
    fn delay(self) -> Duration {
        match self {
            Trigger::Filter => FILTER_DEBOUNCE,
            Trigger::Resize => RESIZE_DEBOUNCE,
        }
    }
}

/// Work that became due this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Due {
    /// Recompute the active chart
    pub redraw: bool,
    /// Re-measure the chart container
    pub geometry: bool,
}

#[derive(Debug, Default)]
pub struct RedrawScheduler {
    filter: Option<Instant>,
    resize: Option<Instant>,
    geometry: Option<Instant>,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or push back) the deadline for `trigger`
    pub fn schedule(&mut self, trigger: Trigger, now: Instant) {
        let deadline = now + trigger.delay();
        match trigger {
            Trigger::Filter => self.filter = Some(deadline),
            Trigger::Resize => self.resize = Some(deadline),
        }
    }

    /// Retry measuring on the fixed interval; an armed retry is kept
    pub fn retry_geometry(&mut self, now: Instant) {
        self.geometry.get_or_insert(now + GEOMETRY_RETRY);
    }

    /// Take every deadline that has passed
    pub fn due(&mut self, now: Instant) -> Due {
        let filter = take_due(&mut self.filter, now);
        let resize = take_due(&mut self.resize, now);
        let geometry = take_due(&mut self.geometry, now);
        Due {
            redraw: filter || resize,
            geometry,
        }
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.filter, self.resize, self.geometry]
            .into_iter()
            .flatten()
            .min()
    }

    /// Drop pending redraws, e.g. when the chart they were for is gone
    pub fn cancel(&mut self) {
        *self = Self::default();
    }
}

fn take_due(slot: &mut Option<Instant>, now: Instant) -> bool {
    if slot.is_some_and(|deadline| deadline <= now) {
        *slot = None;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_debounce() {
        let start = Instant::now();
        let mut s = RedrawScheduler::new();
        s.schedule(Trigger::Filter, start);

        assert_eq!(s.due(start + Duration::from_millis(59)), Due::default());
        assert!(s.due(start + FILTER_DEBOUNCE).redraw);
        assert!(s.next_deadline().is_none());
    }

    #[test]
    fn test_newer_trigger_overwrites_deadline() {
        let start = Instant::now();
        let mut s = RedrawScheduler::new();
        s.schedule(Trigger::Resize, start);
        s.schedule(Trigger::Resize, start + Duration::from_millis(200));

        assert!(!s.due(start + RESIZE_DEBOUNCE).redraw);
        assert_eq!(s.next_deadline(), Some(start + Duration::from_millis(450)));
        assert!(s.due(start + Duration::from_millis(450)).redraw);
    }

    #[test]
    fn test_triggers_are_independent() {
        let start = Instant::now();
        let mut s = RedrawScheduler::new();
        s.schedule(Trigger::Resize, start);
        s.schedule(Trigger::Filter, start);

        assert!(s.due(start + FILTER_DEBOUNCE).redraw);
        assert!(s.next_deadline().is_some());
        assert!(s.due(start + RESIZE_DEBOUNCE).redraw);
    }

    #[test]
    fn test_geometry_retry_interval() {
        let start = Instant::now();
        let mut s = RedrawScheduler::new();
        s.retry_geometry(start);
        s.retry_geometry(start + Duration::from_millis(50));

        assert_eq!(s.next_deadline(), Some(start + GEOMETRY_RETRY));
        let due = s.due(start + GEOMETRY_RETRY);
        assert!(due.geometry && !due.redraw);
    }
}
