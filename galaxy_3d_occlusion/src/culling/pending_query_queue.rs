/// PendingQueryQueue - FIFO of in-flight occlusion queries.
///
/// Queries are issued front-to-back and drained in the same order, so a
/// node's answer is consumed only after every node issued before it.

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};
use crate::graphics_device::OcclusionQuery;
use super::octree::NodeId;

/// Resolved answer of a pending query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryAnswer {
    /// Number of samples that passed the depth test
    Fragments(u64),
    /// The answer did not arrive within the timeout
    TimedOut,
}

/// An issued query and the octree node it tests.
pub struct PendingQuery {
    pub node: NodeId,
    pub query: Box<dyn OcclusionQuery>,
}

impl PendingQuery {
    pub fn new(node: NodeId, query: Box<dyn OcclusionQuery>) -> Self {
        Self { node, query }
    }

    /// Block until the answer is ready, or until `timeout` elapses.
    ///
    /// Returns the answer and the time spent waiting. `None` waits
    /// without limit.
    pub fn wait(&self, timeout: Option<Duration>) -> (QueryAnswer, Duration) {
        let start = Instant::now();
        loop {
            if self.query.is_answer_ready() {
                return (QueryAnswer::Fragments(self.query.fragment_count()), start.elapsed());
            }
            let waited = start.elapsed();
            if let Some(limit) = timeout {
                if waited >= limit {
                    return (QueryAnswer::TimedOut, waited);
                }
            }
            thread::yield_now();
        }
    }
}

/// FIFO of pending queries.
#[derive(Default)]
pub struct PendingQueryQueue {
    queries: VecDeque<PendingQuery>,
}

impl PendingQueryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pending: PendingQuery) {
        self.queries.push_back(pending);
    }

    /// Oldest pending query.
    pub fn pop(&mut self) -> Option<PendingQuery> {
        self.queries.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

#[cfg(test)]
#[path = "pending_query_queue_tests.rs"]
mod tests;
