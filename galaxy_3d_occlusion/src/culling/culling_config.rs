/// Culling configuration

use std::time::Duration;

/// Tunables of the occlusion culling bin.
///
/// The near-plane distance is not configured here: it comes from the
/// camera lens passed to `finish_cull`.
#[derive(Debug, Clone, PartialEq)]
pub struct CullingConfig {
    /// An octree node subdivides only when it holds more objects than this
    pub max_objects_per_octree_node: usize,
    /// Depth (root = 0) at which subdivision stops regardless of object count
    pub max_octree_depth: u32,
    /// Draw tested octree nodes as wireframe cubes after the traversal
    pub show_octree: bool,
    /// Longest wait for a single query answer before assuming the node is
    /// visible. `None` blocks until the driver answers.
    pub query_timeout: Option<Duration>,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            max_objects_per_octree_node: 10,
            max_octree_depth: 10,
            show_octree: false,
            query_timeout: Some(Duration::from_millis(100)),
        }
    }
}
