/// Culling module - per-frame culling bins
///
/// The occlusion bin builds an octree over the frame's objects and walks it
/// front-to-back with GPU occlusion queries, seeded with the objects that
/// were visible in the previous frame.

// Module declarations
pub mod cull_bin;
pub mod cull_stats;
pub mod culling_config;
pub mod octree;
pub mod pending_query_queue;
pub mod visibility_cache;
pub mod occlusion_culling_bin;

// Re-exports
pub use cull_bin::CullBin;
pub use cull_stats::CullStats;
pub use culling_config::CullingConfig;
pub use octree::{NodeId, NodeVisibility, Octree, OctreeNode, CORNER_DIRECTIONS, ROOT};
pub use pending_query_queue::{PendingQuery, PendingQueryQueue, QueryAnswer};
pub use visibility_cache::{VisibilityCache, VisibleGeom, VisibleSet};
pub use occlusion_culling_bin::{
    OcclusionCullingBin, OVERLAY_OCCLUDED_COLOR, OVERLAY_VISIBLE_COLOR,
};
