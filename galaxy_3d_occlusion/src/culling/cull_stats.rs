/// Per-frame culling statistics

use std::time::Duration;

/// Counters collected by a culling bin over one frame.
///
/// Reset by `clear()`. Build-time fields are filled by `add_object` and
/// `finish_cull`, the rest by `draw`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CullStats {
    /// Objects accepted by `add_object`
    pub objects_added: u32,
    /// Objects rejected for missing or degenerate bounds
    pub objects_dropped: u32,
    /// Octree nodes built by `finish_cull`
    pub octree_nodes: u32,
    /// Deepest octree level (root = 0)
    pub octree_depth: u32,
    /// Occlusion queries submitted to the device
    pub queries_issued: u32,
    /// Nodes whose query reported visible fragments
    pub nodes_passed: u32,
    /// Nodes whose query reported zero fragments
    pub nodes_failed: u32,
    /// Nodes accepted without a query (near plane, no query support)
    pub nodes_untested: u32,
    /// Object references skipped inside failed nodes (duplicates included)
    pub objects_occluded: u32,
    /// Objects drawn by the previous-frame replay
    pub temporal_draws: u32,
    /// Objects submitted to the device in total
    pub draw_calls: u32,
    /// Queries that did not answer within the configured timeout
    pub query_timeouts: u32,
    /// Time spent blocked on query answers
    pub wait_time: Duration,
    /// Wall time of the whole `draw` call
    pub draw_time: Duration,
}

impl CullStats {
    /// Time `draw` spent working rather than waiting on the GPU.
    pub fn compute_time(&self) -> Duration {
        self.draw_time.saturating_sub(self.wait_time)
    }
}
