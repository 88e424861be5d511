/// Unit tests for VisibilityCache.

use std::thread;
use slotmap::SlotMap;
use super::*;

struct Keys {
    geometries: SlotMap<GeometryKey, ()>,
    transforms: SlotMap<TransformKey, ()>,
}

impl Keys {
    fn new() -> Self {
        Self {
            geometries: SlotMap::with_key(),
            transforms: SlotMap::with_key(),
        }
    }

    fn object(&mut self) -> CullObject {
        CullObject::new(self.geometries.insert(()), self.transforms.insert(()), None)
    }
}

#[test]
fn test_new_cache_is_empty() {
    let cache = VisibilityCache::new();
    assert!(cache.is_empty().unwrap());
    assert_eq!(cache.len().unwrap(), 0);
}

#[test]
fn test_replace_and_select() {
    let mut keys = Keys::new();
    let a = keys.object();
    let b = keys.object();
    let c = keys.object();

    let cache = VisibilityCache::new();
    cache.replace([VisibleGeom::of(&a), VisibleGeom::of(&c)].into_iter().collect()).unwrap();

    let objects = [a, b, c];
    let selected = cache.select_visible(objects.iter().enumerate()).unwrap();
    assert_eq!(selected, vec![0, 2]);
}

#[test]
fn test_replace_overwrites_previous_set() {
    let mut keys = Keys::new();
    let a = keys.object();
    let b = keys.object();

    let cache = VisibilityCache::new();
    cache.replace([VisibleGeom::of(&a)].into_iter().collect()).unwrap();
    cache.replace([VisibleGeom::of(&b)].into_iter().collect()).unwrap();

    assert!(!cache.contains(&VisibleGeom::of(&a)).unwrap());
    assert!(cache.contains(&VisibleGeom::of(&b)).unwrap());
    assert_eq!(cache.len().unwrap(), 1);
}

#[test]
fn test_identity_includes_transform() {
    let mut keys = Keys::new();
    let geometry = keys.geometries.insert(());
    let first = CullObject::new(geometry, keys.transforms.insert(()), None);
    let second = CullObject::new(geometry, keys.transforms.insert(()), None);

    let cache = VisibilityCache::new();
    cache.replace([VisibleGeom::of(&first)].into_iter().collect()).unwrap();

    let objects = [first, second];
    assert_eq!(cache.select_visible(objects.iter().enumerate()).unwrap(), vec![0]);
}

#[test]
fn test_clones_share_state() {
    let mut keys = Keys::new();
    let a = keys.object();

    let cache = VisibilityCache::new();
    let other = cache.clone();
    other.replace([VisibleGeom::of(&a)].into_iter().collect()).unwrap();

    assert!(cache.shares_with(&other));
    assert!(!cache.shares_with(&VisibilityCache::new()));
    assert!(cache.contains(&VisibleGeom::of(&a)).unwrap());
    assert_eq!(cache.snapshot().unwrap().len(), 1);
}

#[test]
fn test_cross_thread_replace() {
    let mut keys = Keys::new();
    let objects: Vec<CullObject> = (0..16).map(|_| keys.object()).collect();

    let cache = VisibilityCache::new();
    let handles: Vec<_> = objects.chunks(4)
        .map(|chunk| {
            let cache = cache.clone();
            let set: VisibleSet = chunk.iter().map(VisibleGeom::of).collect();
            thread::spawn(move || {
                for _ in 0..100 {
                    cache.replace(set.clone()).unwrap();
                    assert_eq!(cache.len().unwrap(), 4);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // Last writer wins with a whole set
    let last = cache.snapshot().unwrap();
    assert_eq!(last.len(), 4);
    assert!(objects.chunks(4).any(|chunk| chunk.iter().all(|o| last.contains(&VisibleGeom::of(o)))));
}
