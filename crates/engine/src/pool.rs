// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared tab pool
//!
//! Bounds how many pages are open at once across every watch. Waiters are
//! admitted strictly in arrival order: a released slot is handed directly to
//! the queue head, and new requests queue behind existing waiters even when a
//! slot looks free. The mutex only guards bookkeeping and is never held
//! across an await.

use crate::error::RuntimeError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use sw_core::{Admission, AdmissionQueue, TicketId};
use tokio::sync::oneshot;

/// Point-in-time pool occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub capacity: usize,
    pub in_use: usize,
    pub waiting: usize,
}

struct PoolState {
    queue: AdmissionQueue,
    waiters: HashMap<TicketId, oneshot::Sender<()>>,
}

impl PoolState {
    /// Free one slot, handing it to the first waiter that is still listening
    fn release(&mut self) {
        while let Some(ticket) = self.queue.release() {
            if let Some(tx) = self.waiters.remove(&ticket.id) {
                if tx.send(()).is_ok() {
                    tracing::debug!(holder = %ticket.holder, "tab slot handed over");
                    return;
                }
            }
            // Waiter went away; the slot is ours to pass on again.
        }
    }
}

/// FIFO-fair gate on concurrently open pages
#[derive(Clone)]
pub struct TabPool {
    state: Arc<Mutex<PoolState>>,
}

impl TabPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(PoolState {
                queue: AdmissionQueue::new(capacity),
                waiters: HashMap::new(),
            })),
        }
    }

    pub fn stats(&self) -> PoolStats {
        let state = self.lock();
        PoolStats {
            capacity: state.queue.capacity(),
            in_use: state.queue.in_use(),
            waiting: state.queue.waiting(),
        }
    }

    /// Wait for a slot on behalf of `holder`.
    ///
    /// Dropping the returned [`Slot`] gives it back. Dropping this future while
    /// it is still queued withdraws the request.
    pub async fn acquire(&self, holder: &str) -> Result<Slot, RuntimeError> {
        let (id, rx, position) = {
            let mut state = self.lock();
            let (id, admission) = state.queue.request(holder);
            match admission {
                Admission::Granted => return Ok(Slot { pool: self.clone() }),
                Admission::Queued { position } => {
                    let (tx, rx) = oneshot::channel();
                    state.waiters.insert(id, tx);
                    (id, rx, position)
                }
            }
        };

        let stats = self.stats();
        tracing::info!(
            holder,
            position,
            in_use = stats.in_use,
            capacity = stats.capacity,
            waiting = stats.waiting,
            "waiting for a tab slot"
        );

        let mut waiting = Waiting {
            pool: self,
            id,
            rx: Some(rx),
        };
        if waiting.wait().await {
            Ok(Slot { pool: self.clone() })
        } else {
            Err(RuntimeError::PoolClosed {
                store: holder.to_string(),
            })
        }
    }

    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn release(&self) {
        self.lock().release();
    }
}

/// A queued request; withdraws itself if dropped before being admitted
struct Waiting<'a> {
    pool: &'a TabPool,
    id: TicketId,
    rx: Option<oneshot::Receiver<()>>,
}

impl Waiting<'_> {
    async fn wait(&mut self) -> bool {
        let granted = match self.rx.as_mut() {
            Some(rx) => rx.await.is_ok(),
            None => false,
        };
        // Settled either way; nothing left for Drop to undo.
        self.rx = None;
        granted
    }
}

impl Drop for Waiting<'_> {
    fn drop(&mut self) {
        if self.rx.is_none() {
            return;
        }
        let mut state = self.pool.lock();
        if state.queue.cancel(self.id) {
            state.waiters.remove(&self.id);
        } else {
            // Already handed a slot we will never use.
            state.release();
        }
    }
}

/// A held tab slot; released on drop
pub struct Slot {
    pool: TabPool,
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot").finish_non_exhaustive()
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        self.pool.release();
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
