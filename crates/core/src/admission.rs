// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission bookkeeping for the shared page pool
//!
//! Tracks how many page slots are held and who is waiting for one. A request
//! is granted immediately only when a slot is free *and* nobody is queued;
//! otherwise it joins the FIFO queue, so a late request can never overtake an
//! earlier one. Releasing a slot while requests are queued hands it straight
//! to the queue head without it ever becoming free.

use std::collections::VecDeque;
use std::fmt;

/// Identifies one admission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TicketId(pub u64);

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ticket-{}", self.0)
    }
}

/// A queued admission request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: TicketId,
    /// Store that asked for the slot
    pub holder: String,
}

/// Result of asking for a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Granted,
    /// Waiting; `position` is 0 for the queue head
    Queued { position: usize },
}

/// FIFO admission state for a fixed number of slots
#[derive(Debug, Clone)]
pub struct AdmissionQueue {
    capacity: usize,
    in_use: usize,
    waiting: VecDeque<Ticket>,
    next_id: u64,
}

impl AdmissionQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            in_use: 0,
            waiting: VecDeque::new(),
            next_id: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_use(&self) -> usize {
        self.in_use
    }

    pub fn waiting(&self) -> usize {
        self.waiting.len()
    }

    /// Holders in the order they will be admitted
    pub fn queued_holders(&self) -> impl Iterator<Item = &str> {
        self.waiting.iter().map(|t| t.holder.as_str())
    }

    /// Ask for a slot on behalf of `holder`
    pub fn request(&mut self, holder: impl Into<String>) -> (TicketId, Admission) {
        let id = TicketId(self.next_id);
        self.next_id += 1;

        // Anyone already queued means congestion, even if a slot looks free.
        if self.in_use < self.capacity && self.waiting.is_empty() {
            self.in_use += 1;
            return (id, Admission::Granted);
        }

        self.waiting.push_back(Ticket {
            id,
            holder: holder.into(),
        });
        (
            id,
            Admission::Queued {
                position: self.waiting.len() - 1,
            },
        )
    }

    /// Give back one slot.
    ///
    /// Returns the ticket that now owns the slot when someone was waiting. If
    /// that ticket's owner has gone away the caller must call `release` again
    /// on its behalf.
    pub fn release(&mut self) -> Option<Ticket> {
        match self.waiting.pop_front() {
            Some(next) => Some(next),
            None => {
                self.in_use = self.in_use.saturating_sub(1);
                None
            }
        }
    }

    /// Withdraw a request that is still queued
    pub fn cancel(&mut self, id: TicketId) -> bool {
        let before = self.waiting.len();
        self.waiting.retain(|t| t.id != id);
        self.waiting.len() != before
    }
}

#[cfg(test)]
#[path = "admission_tests.rs"]
mod tests;
