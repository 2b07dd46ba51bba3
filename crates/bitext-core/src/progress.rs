//! Translation progress state machine
//!
//! A run starts the moment a load is accepted and climbs through a fixed
//! checkpoint schedule that never passes 90. Only the completion signal for
//! the live run takes it to 100. Every run has its own generation; timers
//! and completion signals from a superseded run are dropped.

use crate::schedule::{Generation, Millis, Scheduler};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Highest percentage reachable before completion
pub const MAX_PENDING_PERCENT: u8 = 90;
pub const DEFAULT_SETTLE_DELAY_MS: Millis = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressState {
    #[default]
    Idle,
    InProgress,
    Complete,
}

/// Percent reached `at_ms` after the run starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub at_ms: Millis,
    pub percent: u8,
}

impl Checkpoint {
    pub const fn new(at_ms: Millis, percent: u8) -> Self {
        Self { at_ms, percent }
    }
}

/// Sorted, non-decreasing checkpoint list capped at [`MAX_PENDING_PERCENT`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSchedule {
    checkpoints: Vec<Checkpoint>,
}

impl ProgressSchedule {
    /// Normalize arbitrary checkpoints into a valid schedule
    pub fn new(mut checkpoints: Vec<Checkpoint>) -> Self {
        checkpoints.sort_by_key(|c| c.at_ms);
        let mut floor = 0;
        for cp in &mut checkpoints {
            let percent = cp.percent.min(MAX_PENDING_PERCENT).max(floor);
            cp.percent = percent;
            floor = percent;
        }
        Self { checkpoints }
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }
}

impl Default for ProgressSchedule {
    fn default() -> Self {
        Self::new(vec![
            Checkpoint::new(0, 5),
            Checkpoint::new(200, 40),
            Checkpoint::new(700, 70),
            Checkpoint::new(1_200, 90),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TranslationProgress {
    pub state: ProgressState,
    pub percent: u8,
}

impl TranslationProgress {
    pub fn is_in_progress(&self) -> bool {
        self.state == ProgressState::InProgress
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProgressTask {
    Checkpoint(u8),
    Settle,
}

#[derive(Debug)]
pub struct ProgressTracker {
    schedule: ProgressSchedule,
    settle_delay: Millis,
    generation: Generation,
    progress: TranslationProgress,
    timers: Scheduler<ProgressTask>,
}

impl ProgressTracker {
    pub fn new(schedule: ProgressSchedule, settle_delay: Millis) -> Self {
        Self {
            schedule,
            settle_delay,
            generation: Generation::default(),
            progress: TranslationProgress::default(),
            timers: Scheduler::new(),
        }
    }

    pub fn snapshot(&self) -> TranslationProgress {
        self.progress
    }

    pub fn state(&self) -> ProgressState {
        self.progress.state
    }

    pub fn percent(&self) -> u8 {
        self.progress.percent
    }

    pub fn is_in_progress(&self) -> bool {
        self.progress.is_in_progress()
    }

    /// Generation of the live run
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Begin a new run, superseding any run in flight.
    ///
    /// Checkpoints at offset 0 apply immediately; the rest are scheduled.
    pub fn start(&mut self, now: Millis) -> Generation {
        self.generation = self.generation.next();
        self.timers.clear();
        self.progress = TranslationProgress {
            state: ProgressState::InProgress,
            percent: 0,
        };
        for cp in self.schedule.checkpoints() {
            if cp.at_ms == 0 {
                self.progress.percent = self.progress.percent.max(cp.percent);
            } else {
                self.timers
                    .schedule(now, cp.at_ms, self.generation, ProgressTask::Checkpoint(cp.percent));
            }
        }
        debug!(generation = self.generation.value(), "translation started");
        self.generation
    }

    /// Apply due checkpoints. Returns true if the snapshot changed.
    pub fn tick(&mut self, now: Millis) -> bool {
        let before = self.progress;
        for due in self.timers.poll(now) {
            if due.generation != self.generation {
                trace!("stale progress task dropped");
                continue;
            }
            match due.task {
                ProgressTask::Checkpoint(percent) if self.progress.is_in_progress() => {
                    self.progress.percent = self.progress.percent.max(percent);
                }
                ProgressTask::Settle if self.progress.state == ProgressState::Complete => {
                    self.progress = TranslationProgress::default();
                }
                _ => {}
            }
        }
        self.progress != before
    }

    /// Completion signal from the producer of run `generation`.
    ///
    /// Returns false for a superseded run or when no run is in progress.
    /// On success the percent is 100 and a settle back to idle is scheduled.
    pub fn complete(&mut self, now: Millis, generation: Generation) -> bool {
        if generation != self.generation || !self.progress.is_in_progress() {
            trace!(generation = generation.value(), "stale completion dropped");
            return false;
        }
        self.timers.clear();
        self.progress = TranslationProgress {
            state: ProgressState::Complete,
            percent: 100,
        };
        self.timers
            .schedule(now, self.settle_delay, self.generation, ProgressTask::Settle);
        debug!(generation = generation.value(), "translation complete");
        true
    }

    /// Return a completed run to the idle baseline now
    pub fn settle(&mut self) {
        if self.progress.state == ProgressState::Complete {
            self.timers.clear();
            self.progress = TranslationProgress::default();
        }
    }

    /// Abandon the live run without completing it
    pub fn cancel(&mut self) {
        self.generation = self.generation.next();
        self.timers.clear();
        self.progress = TranslationProgress::default();
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.timers.next_due()
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(ProgressSchedule::default(), DEFAULT_SETTLE_DELAY_MS)
    }
}
