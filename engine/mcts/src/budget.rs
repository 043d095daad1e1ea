//! Per-decision search budget.
//!
//! Checked once at the top of every iteration. An iteration that has started
//! always runs through backup, so the wall clock can overrun by at most one
//! playout.

use std::time::{Duration, Instant};

use engine_core::{InterruptFlag, SearchLimits};
use serde::Serialize;

/// Why a search loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    IterationCap,
    Deadline,
    Interrupted,
}

#[derive(Debug, Clone)]
pub struct Budget {
    started: Instant,
    deadline: Option<Instant>,
    iteration_cap: Option<u64>,
    interrupt: InterruptFlag,
}

impl Budget {
    /// Start the clock now.
    pub fn start(limits: &SearchLimits, interrupt: InterruptFlag) -> Self {
        let started = Instant::now();
        Self {
            started,
            deadline: limits.time_limit().map(|limit| started + limit),
            iteration_cap: limits.iteration_cap(),
            interrupt,
        }
    }

    /// `Some(reason)` once the loop must stop after `completed` iterations.
    pub fn exhausted(&self, completed: u64) -> Option<StopReason> {
        if self.interrupt.is_raised() {
            return Some(StopReason::Interrupted);
        }
        if self.iteration_cap.is_some_and(|cap| completed >= cap) {
            return Some(StopReason::IterationCap);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Some(StopReason::Deadline);
        }
        None
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
