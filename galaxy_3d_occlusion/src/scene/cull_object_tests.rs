use glam::{Mat4, Quat, Vec3};
use slotmap::SlotMap;
use super::*;

fn keys() -> (GeometryKey, TransformKey) {
    let mut geometries = SlotMap::<GeometryKey, ()>::with_key();
    let mut transforms = SlotMap::<TransformKey, ()>::with_key();
    (geometries.insert(()), transforms.insert(()))
}

// ============================================================================
// BoundingSphere
// ============================================================================

#[test]
fn test_sphere_is_empty() {
    assert!(!BoundingSphere::new(Vec3::ZERO, 1.0).is_empty());
    assert!(!BoundingSphere::new(Vec3::ZERO, 0.0).is_empty()); // a point is still bounded
    assert!(BoundingSphere::new(Vec3::ZERO, -1.0).is_empty());
    assert!(BoundingSphere::new(Vec3::ZERO, f32::NAN).is_empty());
    assert!(BoundingSphere::new(Vec3::ZERO, f32::INFINITY).is_empty());
    assert!(BoundingSphere::new(Vec3::new(f32::NAN, 0.0, 0.0), 1.0).is_empty());
}

#[test]
fn test_sphere_transformed_translation() {
    let sphere = BoundingSphere::new(Vec3::new(1.0, 0.0, 0.0), 2.0);
    let world = sphere.transformed(&Mat4::from_translation(Vec3::new(0.0, 10.0, 0.0)));

    assert_eq!(world.center, Vec3::new(1.0, 10.0, 0.0));
    assert_eq!(world.radius, 2.0);
}

#[test]
fn test_sphere_transformed_uses_largest_scale() {
    let sphere = BoundingSphere::new(Vec3::ZERO, 1.0);
    let m = Mat4::from_scale_rotation_translation(
        Vec3::new(1.0, 4.0, 2.0),
        Quat::from_rotation_y(0.7),
        Vec3::ZERO,
    );
    let world = sphere.transformed(&m);
    assert!((world.radius - 4.0).abs() < 1e-5);
}

#[test]
fn test_sphere_min_max() {
    let sphere = BoundingSphere::new(Vec3::new(1.0, 2.0, 3.0), 0.5);
    assert_eq!(sphere.min(), Vec3::new(0.5, 1.5, 2.5));
    assert_eq!(sphere.max(), Vec3::new(1.5, 2.5, 3.5));
}

// ============================================================================
// CullObject
// ============================================================================

#[test]
fn test_cull_object_accessors() {
    let (geometry, transform) = keys();
    let bounds = BoundingSphere::new(Vec3::ONE, 3.0);
    let object = CullObject::new(geometry, transform, Some(bounds));

    assert_eq!(object.geometry(), geometry);
    assert_eq!(object.transform(), transform);
    assert_eq!(object.local_bounds(), Some(&bounds));
}

#[test]
fn test_world_bounds_missing() {
    let (geometry, transform) = keys();
    let object = CullObject::new(geometry, transform, None);
    assert!(object.world_bounds(&Mat4::IDENTITY).is_none());
}

#[test]
fn test_world_bounds_empty_local_sphere() {
    let (geometry, transform) = keys();
    let object = CullObject::new(
        geometry, transform, Some(BoundingSphere::new(Vec3::ZERO, -1.0)),
    );
    assert!(object.world_bounds(&Mat4::IDENTITY).is_none());
}

#[test]
fn test_world_bounds_degenerate_transform() {
    let (geometry, transform) = keys();
    let object = CullObject::new(
        geometry, transform, Some(BoundingSphere::new(Vec3::ZERO, 1.0)),
    );
    let broken = Mat4::from_translation(Vec3::new(f32::NAN, 0.0, 0.0));
    assert!(object.world_bounds(&broken).is_none());
}

#[test]
fn test_world_bounds_transformed() {
    let (geometry, transform) = keys();
    let object = CullObject::new(
        geometry, transform, Some(BoundingSphere::new(Vec3::ZERO, 1.0)),
    );
    let world = object
        .world_bounds(&Mat4::from_translation(Vec3::new(5.0, 0.0, -5.0)))
        .unwrap();
    assert_eq!(world.center, Vec3::new(5.0, 0.0, -5.0));
    assert_eq!(world.radius, 1.0);
}
