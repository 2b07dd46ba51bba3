//! Proportional scroll mirroring between the two panes
//!
//! Panes reflow differently, so positions are matched by relative ratio,
//! not by absolute offset. A mirrored write opens a short guard on the
//! receiving pane; scroll events from that pane while the guard is open are
//! echoes of our own write and are not mirrored back.

use crate::anchor::Side;
use crate::schedule::{Generation, Millis, Scheduler, TaskId};
use tracing::trace;

pub const DEFAULT_GUARD_WINDOW_MS: Millis = 50;

/// Scroll geometry of one pane, in any consistent unit
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaneMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl PaneMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Largest valid scroll offset
    pub fn scroll_range(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Relative position in `[0, 1]`; content that fits yields 0
    pub fn ratio(&self) -> f64 {
        let range = self.scroll_range();
        if range <= 0.0 || !range.is_finite() || !self.scroll_top.is_finite() {
            return 0.0;
        }
        (self.scroll_top / range).clamp(0.0, 1.0)
    }

    pub fn offset_for_ratio(&self, ratio: f64) -> f64 {
        self.scroll_range() * ratio.clamp(0.0, 1.0)
    }
}

/// A synthetic write the front end must apply to a pane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollWrite {
    pub side: Side,
    pub scroll_top: f64,
}

/// Live listener state, present only while syncing is enabled
#[derive(Debug)]
struct Subscription {
    generation: Generation,
    guards: [Option<TaskId>; 2],
    timers: Scheduler<Side>,
}

#[derive(Debug)]
pub struct ScrollSync {
    guard_window: Millis,
    generation: Generation,
    subscription: Option<Subscription>,
}

impl ScrollSync {
    /// Starts disabled
    pub fn new(guard_window: Millis) -> Self {
        Self {
            guard_window,
            generation: Generation::default(),
            subscription: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.enable();
        } else {
            self.disable();
        }
    }

    pub fn enable(&mut self) {
        if self.subscription.is_some() {
            return;
        }
        self.generation = self.generation.next();
        self.subscription = Some(Subscription {
            generation: self.generation,
            guards: [None, None],
            timers: Scheduler::new(),
        });
    }

    /// Detach completely: pending guard releases are discarded with the
    /// subscription so nothing can fire after this returns.
    pub fn disable(&mut self) {
        if self.subscription.take().is_some() {
            self.generation = self.generation.next();
        }
    }

    /// True while writes into `side` are treated as synthetic
    pub fn is_guarded(&self, side: Side) -> bool {
        self.subscription
            .as_ref()
            .map(|sub| sub.guards[side.index()].is_some())
            .unwrap_or(false)
    }

    /// React to a scroll event on `side`.
    ///
    /// `source` is the scrolled pane, `other` the pane to mirror into.
    /// Returns the write to apply, or `None` when disabled or when the event
    /// is the echo of a previous mirrored write.
    pub fn on_scroll(
        &mut self,
        now: Millis,
        side: Side,
        source: &PaneMetrics,
        other: &PaneMetrics,
    ) -> Option<ScrollWrite> {
        let window = self.guard_window;
        let sub = self.subscription.as_mut()?;
        if sub.guards[side.index()].is_some() {
            trace!(?side, "scroll echo suppressed");
            return None;
        }

        let target = side.opposite();
        let scroll_top = other.offset_for_ratio(source.ratio());

        if let Some(previous) = sub.guards[target.index()].take() {
            sub.timers.cancel(previous);
        }
        let release = sub.timers.schedule(now, window, sub.generation, target);
        sub.guards[target.index()] = Some(release);

        Some(ScrollWrite {
            side: target,
            scroll_top,
        })
    }

    /// Release guards whose window has elapsed
    pub fn tick(&mut self, now: Millis) {
        let Some(sub) = self.subscription.as_mut() else {
            return;
        };
        for due in sub.timers.poll(now) {
            if due.generation != sub.generation {
                trace!("stale scroll guard dropped");
                continue;
            }
            let slot = &mut sub.guards[due.task.index()];
            if *slot == Some(due.id) {
                *slot = None;
            }
        }
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.subscription.as_ref().and_then(|sub| sub.timers.next_due())
    }
}

impl Default for ScrollSync {
    fn default() -> Self {
        Self::new(DEFAULT_GUARD_WINDOW_MS)
    }
}
