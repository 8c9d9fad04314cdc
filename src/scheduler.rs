// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Deferred tasks owned by the component that scheduled them.
//!
//! Nothing here runs on its own: the owner polls [`TaskList::take_due`] once per
//! frame with the current instant and acts on what comes back. Dropping or
//! calling [`TaskList::cancel_all`] on teardown guarantees no task outlives its
//! owner.

use std::time::{Duration, Instant};

/// Handle returned by [`TaskList::schedule`], used to cancel a pending task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct Scheduled<T> {
    handle: TaskHandle,
    due: Instant,
    task: T,
}

/// Cancellable list of tasks waiting for a deadline.
#[derive(Debug)]
pub struct TaskList<T> {
    pending: Vec<Scheduled<T>>,
    next_handle: u64,
}

impl<T> Default for TaskList<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_handle: 0,
        }
    }
}

impl<T> TaskList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to become due `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(Scheduled {
            handle,
            due: now + delay,
            task,
        });
        handle
    }

    /// Cancel a pending task. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.handle != handle);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Remove and return every task due at or before `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending)
                .into_iter()
                .partition(|s| s.due <= now);
        self.pending = pending;
        due.sort_by_key(|s| (s.due, s.handle.0));
        due.into_iter().map(|s| s.task).collect()
    }

    /// Time until the earliest pending deadline, for repaint scheduling.
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.pending
            .iter()
            .map(|s| s.due.saturating_duration_since(now))
            .min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
