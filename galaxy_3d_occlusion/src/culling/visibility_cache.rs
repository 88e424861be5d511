/// VisibilityCache - objects found visible in the previous frame.
///
/// The cache is the only state that survives across frames. It is shared
/// by every generation of a culling bin (see `OcclusionCullingBin::make_next`)
/// and may be read by the draw of one frame while another thread holds a
/// clone, so all access goes through a mutex.
///
/// Identity is the (geometry, transform) pair: the same geometry drawn
/// twice with different transforms is two entries.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};
use crate::engine_err;
use crate::error::Result;
use crate::scene::{CullObject, GeometryKey, TransformKey};

/// Identity of a drawn object across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VisibleGeom {
    pub geometry: GeometryKey,
    pub transform: TransformKey,
}

impl VisibleGeom {
    pub fn new(geometry: GeometryKey, transform: TransformKey) -> Self {
        Self { geometry, transform }
    }

    pub fn of(object: &CullObject) -> Self {
        Self::new(object.geometry(), object.transform())
    }
}

/// Ordered set of visible identities.
pub type VisibleSet = BTreeSet<VisibleGeom>;

/// Shared, lock-protected previous-frame visible set.
#[derive(Debug, Clone, Default)]
pub struct VisibilityCache {
    inner: Arc<Mutex<VisibleSet>>,
}

impl VisibilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, VisibleSet>> {
        self.inner.lock()
            .map_err(|_| engine_err!("galaxy3d::VisibilityCache", "Visibility cache lock poisoned"))
    }

    /// Indices of the `candidates` whose identity is in the cache.
    ///
    /// The lock is held only while matching; callers draw afterwards.
    pub fn select_visible<'a, I>(&self, candidates: I) -> Result<Vec<usize>>
    where
        I: IntoIterator<Item = (usize, &'a CullObject)>,
    {
        let set = self.lock()?;
        if set.is_empty() {
            return Ok(Vec::new());
        }
        Ok(candidates.into_iter()
            .filter(|(_, object)| set.contains(&VisibleGeom::of(object)))
            .map(|(index, _)| index)
            .collect())
    }

    /// Replace the whole cached set.
    pub fn replace(&self, visible: VisibleSet) -> Result<()> {
        *self.lock()? = visible;
        Ok(())
    }

    pub fn contains(&self, geom: &VisibleGeom) -> Result<bool> {
        Ok(self.lock()?.contains(geom))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Copy of the cached set.
    pub fn snapshot(&self) -> Result<VisibleSet> {
        Ok(self.lock()?.clone())
    }

    /// Whether two handles point to the same cache.
    pub fn shares_with(&self, other: &VisibilityCache) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
#[path = "visibility_cache_tests.rs"]
mod tests;
