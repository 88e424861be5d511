/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Records every command, and answers occlusion queries through a
/// user-provided function of the proxy cube's model matrix. Query
/// consumption order is recorded so tests can check FIFO draining.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::engine_bail;
use crate::scene::{CullObject, GeometryKey, TransformKey};
use super::{
    GraphicsDevice, OcclusionQuery, WriteMask,
    PUSH_CONSTANT_MODEL_OFFSET,
};

// ============================================================================
// Mock commands
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum MockCommand {
    SetWriteMask(WriteMask),
    BeginQuery(u32),
    EndQuery(u32),
    PushConstants { offset: u32, size: usize },
    DrawUnitCube { wireframe: bool },
    DrawObject { geometry: GeometryKey, transform: TransformKey, force: bool },
}

/// Decides the fragment count of a query from the model matrix of the
/// proxy cube drawn inside it.
pub type FragmentFn = Box<dyn Fn(&Mat4) -> u64 + Send + Sync>;

// ============================================================================
// Mock OcclusionQuery
// ============================================================================

#[derive(Debug)]
pub struct MockOcclusionQuery {
    pub id: u32,
    pub fragments: u64,
    /// Polls of `is_answer_ready` that still return false
    polls_remaining: AtomicU32,
    never_ready: bool,
    consumed: Arc<Mutex<Vec<u32>>>,
}

impl OcclusionQuery for MockOcclusionQuery {
    fn is_answer_ready(&self) -> bool {
        if self.never_ready {
            return false;
        }
        let remaining = self.polls_remaining.load(Ordering::Relaxed);
        if remaining == 0 {
            return true;
        }
        self.polls_remaining.store(remaining - 1, Ordering::Relaxed);
        false
    }

    fn fragment_count(&self) -> u64 {
        self.consumed.lock().unwrap().push(self.id);
        self.fragments
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

pub struct MockGraphicsDevice {
    pub commands: Vec<MockCommand>,
    pub supports_queries: bool,
    /// `end_occlusion_query` returns `None` (allocation failure)
    pub query_allocation_fails: bool,
    /// `begin_occlusion_query` returns an error (query pool exhausted)
    pub query_begin_fails: bool,
    /// `draw_unit_cube` returns an error for solid cubes
    pub proxy_draw_fails: bool,
    /// Polls before each query reports ready
    pub ready_after_polls: u32,
    /// Queries never become ready
    pub never_ready: bool,
    /// `draw_object` reports failure (resource not resident)
    pub draw_object_fails: bool,
    fragment_fn: FragmentFn,
    /// Query ids in the order their results were read
    pub consumed: Arc<Mutex<Vec<u32>>>,
    /// Proxy model matrix of each issued query, by id
    pub query_models: FxHashMap<u32, Mat4>,
    next_query_id: u32,
    active_query: Option<u32>,
    pushed_model: Option<Mat4>,
    query_model: Option<Mat4>,
}

impl MockGraphicsDevice {
    /// Device whose queries always report `fragments_per_query` fragments.
    pub fn new(fragments_per_query: u64) -> Self {
        Self::with_fragment_fn(Box::new(move |_| fragments_per_query))
    }

    /// Device whose query results are computed from the proxy cube.
    pub fn with_fragment_fn(fragment_fn: FragmentFn) -> Self {
        Self {
            commands: Vec::new(),
            supports_queries: true,
            query_allocation_fails: false,
            query_begin_fails: false,
            proxy_draw_fails: false,
            ready_after_polls: 0,
            never_ready: false,
            draw_object_fails: false,
            fragment_fn,
            consumed: Arc::new(Mutex::new(Vec::new())),
            query_models: FxHashMap::default(),
            next_query_id: 0,
            active_query: None,
            pushed_model: None,
            query_model: None,
        }
    }

    /// Geometry keys passed to `draw_object`, in submission order.
    pub fn drawn_geometries(&self) -> Vec<GeometryKey> {
        self.commands.iter()
            .filter_map(|c| match c {
                MockCommand::DrawObject { geometry, .. } => Some(*geometry),
                _ => None,
            })
            .collect()
    }

    /// Number of `draw_object` calls for one geometry.
    pub fn draw_count(&self, geometry: GeometryKey) -> usize {
        self.drawn_geometries().iter().filter(|&&g| g == geometry).count()
    }

    /// Query ids in issuance order.
    pub fn issued_queries(&self) -> Vec<u32> {
        self.commands.iter()
            .filter_map(|c| match c {
                MockCommand::BeginQuery(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Centers of the proxy cubes tested by queries, in issuance order.
    pub fn queried_centers(&self) -> Vec<Vec3> {
        self.issued_queries().iter()
            .filter_map(|id| self.query_models.get(id))
            .map(|m| m.w_axis.truncate())
            .collect()
    }

    /// Query ids in the order their results were read.
    pub fn consumed_queries(&self) -> Vec<u32> {
        self.consumed.lock().unwrap().clone()
    }

    /// Last write mask set, if any.
    pub fn last_write_mask(&self) -> Option<WriteMask> {
        self.commands.iter().rev().find_map(|c| match c {
            MockCommand::SetWriteMask(mask) => Some(*mask),
            _ => None,
        })
    }

    /// Number of wireframe cubes drawn (debug overlay).
    pub fn wireframe_count(&self) -> usize {
        self.commands.iter()
            .filter(|c| matches!(c, MockCommand::DrawUnitCube { wireframe: true }))
            .count()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn supports_occlusion_queries(&self) -> bool {
        self.supports_queries
    }

    fn begin_occlusion_query(&mut self) -> Result<()> {
        if self.query_begin_fails {
            engine_bail!("galaxy3d::mock", "begin_occlusion_query: query pool exhausted");
        }
        if self.active_query.is_some() {
            engine_bail!("galaxy3d::mock", "begin_occlusion_query: a query is already active");
        }
        let id = self.next_query_id;
        self.next_query_id += 1;
        self.active_query = Some(id);
        self.query_model = None;
        self.commands.push(MockCommand::BeginQuery(id));
        Ok(())
    }

    fn end_occlusion_query(&mut self) -> Result<Option<Box<dyn OcclusionQuery>>> {
        let id = match self.active_query.take() {
            Some(id) => id,
            None => engine_bail!("galaxy3d::mock", "end_occlusion_query: no active query"),
        };
        self.commands.push(MockCommand::EndQuery(id));

        if self.query_allocation_fails {
            return Ok(None);
        }

        // Nothing drawn inside the bracket means zero fragments
        let fragments = match self.query_model.take() {
            Some(model) => {
                self.query_models.insert(id, model);
                (self.fragment_fn)(&model)
            }
            None => 0,
        };

        Ok(Some(Box::new(MockOcclusionQuery {
            id,
            fragments,
            polls_remaining: AtomicU32::new(self.ready_after_polls),
            never_ready: self.never_ready,
            consumed: Arc::clone(&self.consumed),
        })))
    }

    fn set_write_mask(&mut self, mask: WriteMask) -> Result<()> {
        self.commands.push(MockCommand::SetWriteMask(mask));
        Ok(())
    }

    fn push_constants(&mut self, offset: u32, data: &[u8]) -> Result<()> {
        if offset == PUSH_CONSTANT_MODEL_OFFSET && data.len() == std::mem::size_of::<Mat4>() {
            self.pushed_model = Some(bytemuck::pod_read_unaligned::<Mat4>(data));
        }
        self.commands.push(MockCommand::PushConstants { offset, size: data.len() });
        Ok(())
    }

    fn draw_unit_cube(&mut self, wireframe: bool) -> Result<()> {
        if self.proxy_draw_fails && !wireframe {
            engine_bail!("galaxy3d::mock", "draw_unit_cube: device lost");
        }
        if self.active_query.is_some() {
            self.query_model = self.pushed_model;
        }
        self.commands.push(MockCommand::DrawUnitCube { wireframe });
        Ok(())
    }

    fn draw_object(&mut self, object: &CullObject, force: bool) -> Result<bool> {
        self.commands.push(MockCommand::DrawObject {
            geometry: object.geometry(),
            transform: object.transform(),
            force,
        });
        Ok(!self.draw_object_fails)
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
