//! One-shot timed tasks
//!
//! Replaces ad hoc timers with an explicit queue polled from the frame tick.
//! Every task records the session generation it was scheduled in; bumping
//! the generation (on restart) makes all session-scoped tasks stale, and
//! stale tasks are discarded instead of returned.

use serde::{Deserialize, Serialize};

/// Lifetime of a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    /// Dropped when the session generation advances
    Session,
    /// Survives session changes (e.g. toast dismissal)
    Global,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    due_ms: f64,
    seq: u64,
    session: Option<u64>,
    task: T,
}

/// Time-ordered queue of pending tasks
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    entries: Vec<Entry<T>>,
    session: u64,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            session: 0,
            next_seq: 0,
        }
    }

    /// Current session generation
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Start a new session; pending session-scoped tasks will never run
    pub fn advance_session(&mut self) -> u64 {
        self.session += 1;
        let current = self.session;
        self.entries
            .retain(|e| e.session.is_none_or(|s| s == current));
        current
    }

    /// Queue `task` to run once the clock reaches `due_ms`
    pub fn schedule(&mut self, due_ms: f64, scope: Scope, task: T) {
        let session = match scope {
            Scope::Session => Some(self.session),
            Scope::Global => None,
        };
        self.entries.push(Entry {
            due_ms,
            seq: self.next_seq,
            session,
            task,
        });
        self.next_seq += 1;
    }

    /// Remove and return the earliest task due at `now_ms`.
    ///
    /// Ties run in scheduling order. Tasks from an older session are
    /// discarded.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<T> {
        loop {
            let index = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.due_ms <= now_ms)
                .min_by(|(_, a), (_, b)| {
                    a.due_ms
                        .total_cmp(&b.due_ms)
                        .then(a.seq.cmp(&b.seq))
                })
                .map(|(i, _)| i)?;
            let entry = self.entries.swap_remove(index);
            if entry.session.is_none_or(|s| s == self.session) {
                return Some(entry.task);
            }
            log::debug!("Discarding task from stale session");
        }
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
