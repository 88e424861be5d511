/// OcclusionCullingBin - hierarchical occlusion culling with temporal coherence.
///
/// Per frame:
/// - `add_object` records each candidate with its world-space bounding sphere
/// - `finish_cull` builds the octree and orders it for the camera
/// - `draw` replays last frame's visible objects, then walks the octree
///   front-to-back, testing each node's cube with an occlusion query and
///   drawing the objects of nodes that pass
///
/// The objects found visible are stored in a `VisibilityCache` shared with
/// the next bin generation (`make_next`). Every failure mode (no query
/// support, lost or late answers) falls back to treating the node as
/// visible: the bin may draw too much, never too little.

use std::time::{Duration, Instant};
use glam::Mat4;
use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, OcclusionQuery, WriteMask,
    PUSH_CONSTANT_COLOR_OFFSET, PUSH_CONSTANT_MODEL_OFFSET, PUSH_CONSTANT_MVP_OFFSET,
};
use crate::scene::{BoundingSphere, CullObject};
use crate::{engine_bail_state, engine_debug, engine_trace, engine_warn};
use super::cull_bin::CullBin;
use super::cull_stats::CullStats;
use super::culling_config::CullingConfig;
use super::octree::{NodeId, NodeVisibility, Octree, ROOT};
use super::pending_query_queue::{PendingQuery, PendingQueryQueue, QueryAnswer};
use super::visibility_cache::{VisibilityCache, VisibleGeom, VisibleSet};

const LOG_SOURCE: &str = "galaxy3d::OcclusionCullingBin";

/// Debug overlay color of nodes that passed (RGBA)
pub const OVERLAY_VISIBLE_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
/// Debug overlay color of occluded nodes (RGBA)
pub const OVERLAY_OCCLUDED_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

// ===== PER-FRAME STATE =====

/// An object accepted for this frame.
#[derive(Debug, Clone)]
struct BinObject {
    object: CullObject,
    bounds: BoundingSphere,
    /// Set on the first submission this frame
    already_drawn: bool,
}

/// Where the bin is in its per-frame call sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameState {
    /// Accepting `add_object`
    Collecting,
    /// Octree built, waiting for `draw`
    Culled,
    /// `draw` done, waiting for `clear`
    Drawn,
}

// ===== OCCLUSION CULLING BIN =====

pub struct OcclusionCullingBin {
    config: CullingConfig,
    objects: Vec<BinObject>,
    octree: Octree,
    cache: VisibilityCache,
    state: FrameState,
    /// Camera data captured by `finish_cull`
    view_projection: Mat4,
    near_distance: f32,
    stats: CullStats,
}

impl OcclusionCullingBin {
    /// Create a bin with its own, empty visibility cache.
    pub fn new(config: CullingConfig) -> Self {
        Self::with_cache(config, VisibilityCache::new())
    }

    /// Create a bin reading and writing an existing visibility cache.
    pub fn with_cache(config: CullingConfig, cache: VisibilityCache) -> Self {
        let octree = Octree::new(config.max_objects_per_octree_node, config.max_octree_depth);
        Self {
            config,
            objects: Vec::new(),
            octree,
            cache,
            state: FrameState::Collecting,
            view_projection: Mat4::IDENTITY,
            near_distance: 0.0,
            stats: CullStats::default(),
        }
    }

    /// Fresh bin for the next frame, sharing this bin's visibility cache
    /// and configuration.
    pub fn make_next(&self) -> OcclusionCullingBin {
        Self::with_cache(self.config.clone(), self.cache.clone())
    }

    // ===== ACCESSORS =====

    pub fn config(&self) -> &CullingConfig {
        &self.config
    }

    pub fn octree(&self) -> &Octree {
        &self.octree
    }

    pub fn stats(&self) -> &CullStats {
        &self.stats
    }

    pub fn visibility_cache(&self) -> &VisibilityCache {
        &self.cache
    }

    /// Number of objects accepted this frame.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Object accepted at `index` (indices are the ones stored in octree nodes).
    pub fn object(&self, index: usize) -> Option<&CullObject> {
        self.objects.get(index).map(|entry| &entry.object)
    }

    /// Whether the object at `index` was submitted during this frame's draw.
    pub fn was_drawn(&self, index: usize) -> bool {
        self.objects.get(index).is_some_and(|entry| entry.already_drawn)
    }

    // ===== TEMPORAL FAST PATH =====

    /// Draw the objects that were visible last frame. Returns how many
    /// were submitted.
    fn draw_previous_visible(&mut self, device: &mut dyn GraphicsDevice, force: bool) -> Result<u32> {
        let selected = self.cache.select_visible(
            self.objects.iter().enumerate().map(|(index, entry)| (index, &entry.object)),
        )?;

        let mut drawn = 0;
        for index in selected {
            let entry = &mut self.objects[index];
            if entry.already_drawn {
                continue;
            }
            entry.already_drawn = true;
            device.draw_object(&entry.object, force)?;
            drawn += 1;
        }
        Ok(drawn)
    }

    // ===== BOOKKEEPING =====

    /// Identities of all objects held by visible nodes.
    fn collect_visible(&self) -> VisibleSet {
        self.octree.visible_objects()
            .map(|index| VisibleGeom::of(&self.objects[index].object))
            .collect()
    }
}

impl CullBin for OcclusionCullingBin {
    fn add_object(&mut self, object: CullObject, world_transform: &Mat4) {
        if self.state != FrameState::Collecting {
            engine_warn!(LOG_SOURCE, "add_object called after finish_cull, object ignored");
            return;
        }

        let Some(bounds) = object.world_bounds(world_transform) else {
            engine_trace!(LOG_SOURCE, "Dropping object {:?} with empty bounds", object.geometry());
            self.stats.objects_dropped += 1;
            return;
        };

        self.objects.push(BinObject {
            object,
            bounds,
            already_drawn: false,
        });
        self.stats.objects_added += 1;
    }

    fn finish_cull(&mut self, camera: &Camera) -> Result<()> {
        if self.state != FrameState::Collecting {
            engine_bail_state!(LOG_SOURCE, "finish_cull called outside the collecting phase");
        }

        let spheres: Vec<BoundingSphere> = self.objects.iter().map(|entry| entry.bounds).collect();
        self.octree.build(&spheres);
        self.octree.compute_ordering(camera);

        self.view_projection = camera.view_projection_matrix();
        self.near_distance = camera.near_distance();
        self.stats.octree_nodes = self.octree.node_count() as u32;
        self.stats.octree_depth = self.octree.depth();
        self.state = FrameState::Culled;

        engine_debug!(
            LOG_SOURCE,
            "Octree built: {} objects, {} nodes, depth {}",
            self.objects.len(), self.stats.octree_nodes, self.stats.octree_depth
        );
        Ok(())
    }

    fn draw(&mut self, device: &mut dyn GraphicsDevice, force: bool) -> Result<()> {
        match self.state {
            FrameState::Collecting => engine_bail_state!(LOG_SOURCE, "draw called before finish_cull"),
            FrameState::Drawn => engine_bail_state!(LOG_SOURCE, "draw called twice in one frame"),
            FrameState::Culled => {}
        }
        self.state = FrameState::Drawn;

        let start = Instant::now();

        let temporal_draws = self.draw_previous_visible(device, force)?;
        self.stats.temporal_draws = temporal_draws;
        self.stats.draw_calls = temporal_draws;

        let mut traversal = Traversal {
            octree: &mut self.octree,
            objects: &mut self.objects,
            stats: &mut self.stats,
            device,
            pending: PendingQueryQueue::new(),
            view_projection: self.view_projection,
            near_distance: self.near_distance,
            query_timeout: self.config.query_timeout,
            force,
        };
        traversal.run()?;
        if self.config.show_octree {
            traversal.draw_overlay()?;
        }

        let visible = self.collect_visible();
        let visible_count = visible.len();
        self.cache.replace(visible)?;

        self.stats.draw_time = start.elapsed();
        engine_debug!(
            LOG_SOURCE,
            "Frame drawn: {} draw calls ({} from last frame), {} queries, {} passed, {} failed, {} untested, {} visible for next frame, wait {:?} / total {:?}",
            self.stats.draw_calls, self.stats.temporal_draws,
            self.stats.queries_issued, self.stats.nodes_passed,
            self.stats.nodes_failed, self.stats.nodes_untested,
            visible_count, self.stats.wait_time, self.stats.draw_time
        );
        Ok(())
    }

    fn clear(&mut self) {
        self.objects.clear();
        self.octree.clear();
        self.stats = CullStats::default();
        self.state = FrameState::Collecting;
    }
}

// ===== TRAVERSAL =====

/// Front-to-back walk of the octree for one `draw`.
///
/// Borrows the bin's per-frame state. Nodes are addressed by id so the
/// octree can be updated while the walk is in progress.
struct Traversal<'a, 'd> {
    octree: &'a mut Octree,
    objects: &'a mut [BinObject],
    stats: &'a mut CullStats,
    device: &'a mut (dyn GraphicsDevice + 'd),
    pending: PendingQueryQueue,
    view_projection: Mat4,
    near_distance: f32,
    query_timeout: Option<Duration>,
    force: bool,
}

impl Traversal<'_, '_> {
    /// Draw the root, test its children in octant order, then drain the
    /// query queue until no node is left pending.
    fn run(&mut self) -> Result<()> {
        self.draw_node_objects(ROOT)?;
        self.octree.node_mut(ROOT).set_visibility(NodeVisibility::Visible);

        let children = self.octree.root().children();
        for child in children.into_iter().flatten() {
            self.test_node(child)?;
        }

        self.drain()?;
        debug_assert!(self.pending.is_empty());
        Ok(())
    }

    fn drain(&mut self) -> Result<()> {
        while let Some(pending) = self.pending.pop() {
            let (answer, waited) = pending.wait(self.query_timeout);
            self.stats.wait_time += waited;

            match answer {
                QueryAnswer::Fragments(0) => {
                    let node = self.octree.node_mut(pending.node);
                    node.set_visibility(NodeVisibility::Occluded);
                    self.stats.nodes_failed += 1;
                    self.stats.objects_occluded += node.total_object_count() as u32;
                }
                QueryAnswer::Fragments(_) => {
                    self.stats.nodes_passed += 1;
                    self.pass_node(pending.node)?;
                }
                QueryAnswer::TimedOut => {
                    engine_warn!(
                        LOG_SOURCE,
                        "Occlusion query for node {} timed out after {:?}, assuming visible",
                        pending.node, waited
                    );
                    self.stats.query_timeouts += 1;
                    self.pass_node(pending.node)?;
                }
            }
        }
        Ok(())
    }

    /// Queue an occlusion query for a node, or pass it right away when no
    /// query can be used.
    fn test_node(&mut self, node_id: NodeId) -> Result<()> {
        // A cube crossing the near plane would be clipped and could report
        // zero fragments while the camera is inside it
        if self.octree.node(node_id).distance_to_camera() < self.near_distance
            || !self.device.supports_occlusion_queries()
        {
            self.stats.nodes_untested += 1;
            return self.pass_node(node_id);
        }

        match self.issue_query(node_id) {
            Ok(Some(query)) => {
                self.stats.queries_issued += 1;
                self.pending.push(PendingQuery::new(node_id, query));
                Ok(())
            }
            Ok(None) => {
                self.stats.nodes_untested += 1;
                self.pass_node(node_id)
            }
            Err(err @ Error::QueryFailed(_)) => {
                engine_warn!(LOG_SOURCE, "Node {}: {}, assuming visible", node_id, err);
                self.stats.nodes_untested += 1;
                self.pass_node(node_id)
            }
            Err(err) => Err(err),
        }
    }

    /// Render the node's cube with writes disabled inside a query bracket.
    ///
    /// Writes are re-enabled on every exit. A failure inside the bracket
    /// comes back as `Error::QueryFailed`; only a failure to re-enable
    /// writes is returned as is.
    fn issue_query(&mut self, node_id: NodeId) -> Result<Option<Box<dyn OcclusionQuery>>> {
        let model = self.octree.node(node_id).cube_transform();
        let mvp = self.view_projection * model;

        let bracket = Self::query_bracket(&mut *self.device, &mvp, &model);
        self.device.set_write_mask(WriteMask::all())?;

        bracket.map_err(|err| Error::QueryFailed(err.to_string()))
    }

    fn query_bracket(
        device: &mut dyn GraphicsDevice,
        mvp: &Mat4,
        model: &Mat4,
    ) -> Result<Option<Box<dyn OcclusionQuery>>> {
        device.set_write_mask(WriteMask::empty())?;
        device.begin_occlusion_query()?;

        let proxy = Self::draw_proxy(device, mvp, model);
        // Close the bracket even when the proxy draw failed
        let query = device.end_occlusion_query();
        proxy?;
        query
    }

    fn draw_proxy(device: &mut dyn GraphicsDevice, mvp: &Mat4, model: &Mat4) -> Result<()> {
        device.push_constants(PUSH_CONSTANT_MVP_OFFSET, bytemuck::bytes_of(mvp))?;
        device.push_constants(PUSH_CONSTANT_MODEL_OFFSET, bytemuck::bytes_of(model))?;
        device.draw_unit_cube(false)
    }

    /// Mark a node visible, draw its objects and test its children nearest first.
    fn pass_node(&mut self, node_id: NodeId) -> Result<()> {
        self.octree.node_mut(node_id).set_visibility(NodeVisibility::Visible);
        self.draw_node_objects(node_id)?;

        for child in self.octree.children_front_to_back(node_id).into_iter().flatten() {
            self.test_node(child)?;
        }
        Ok(())
    }

    fn draw_node_objects(&mut self, node_id: NodeId) -> Result<()> {
        for slot in 0..self.octree.node(node_id).objects().len() {
            let index = self.octree.node(node_id).objects()[slot];
            let entry = &mut self.objects[index];
            if entry.already_drawn {
                continue;
            }
            entry.already_drawn = true;
            self.device.draw_object(&entry.object, self.force)?;
            self.stats.draw_calls += 1;
        }
        Ok(())
    }

    /// Draw every tested node as a colored wireframe cube.
    fn draw_overlay(&mut self) -> Result<()> {
        for (_, node) in self.octree.nodes() {
            let color = match node.visibility() {
                NodeVisibility::Visible => OVERLAY_VISIBLE_COLOR,
                NodeVisibility::Occluded => OVERLAY_OCCLUDED_COLOR,
                NodeVisibility::Untested => continue,
            };
            let model = node.cube_transform();
            let mvp = self.view_projection * model;

            self.device.push_constants(PUSH_CONSTANT_MVP_OFFSET, bytemuck::bytes_of(&mvp))?;
            self.device.push_constants(PUSH_CONSTANT_MODEL_OFFSET, bytemuck::bytes_of(&model))?;
            self.device.push_constants(PUSH_CONSTANT_COLOR_OFFSET, bytemuck::bytes_of(&color))?;
            self.device.draw_unit_cube(true)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "occlusion_culling_bin_tests.rs"]
mod tests;
