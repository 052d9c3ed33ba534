#![forbid(unsafe_code)]

//! Backlog of spawns refused because the dialog cap was reached.
//!
//! Entries are served first in, first out. A delegate has at most one
//! pending entry; a second request while it waits is dropped and the first
//! payload is kept.

use std::collections::VecDeque;
use std::rc::Rc;

use crate::delegate::Delegate;
use crate::payload::Payload;

/// One deferred spawn.
#[derive(Debug, Clone)]
pub struct QueuedSpawn {
    pub delegate: Rc<Delegate>,
    pub data: Payload,
}

#[derive(Debug, Default)]
pub struct SpawnQueue {
    pending: VecDeque<QueuedSpawn>,
}

impl SpawnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request unless the delegate already has one pending.
    ///
    /// Returns whether the request was added.
    pub fn enqueue(&mut self, delegate: Rc<Delegate>, data: Payload) -> bool {
        if self.contains(&delegate) {
            ftui_core::debug!(pending = self.pending.len(), "spawn already queued, dropped");
            return false;
        }
        self.pending.push_back(QueuedSpawn { delegate, data });
        ftui_core::debug!(pending = self.pending.len(), "spawn queued");
        true
    }

    /// Take the oldest request.
    pub fn pop(&mut self) -> Option<QueuedSpawn> {
        self.pending.pop_front()
    }

    /// Withdraw the delegate's pending request, if it has one.
    pub fn remove(&mut self, delegate: &Rc<Delegate>) -> Option<QueuedSpawn> {
        let position = self
            .pending
            .iter()
            .position(|q| Rc::ptr_eq(&q.delegate, delegate))?;
        self.pending.remove(position)
    }

    pub fn contains(&self, delegate: &Rc<Delegate>) -> bool {
        self.pending.iter().any(|q| Rc::ptr_eq(&q.delegate, delegate))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedSpawn> {
        self.pending.iter()
    }
}
