//! Avian3D physics backend implementation.
//!
//! Foot probes are raycasts through Avian's [`SpatialQuery`]. Enable with the
//! `avian3d` feature.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::backend::{FootPlacementBackend, GroundProbe};
use crate::config::{CapsuleBounds, FootPlacementRig};
use crate::dataset::PelvisFeetData;
use crate::detection::{ProbeFilter, ProbeHit};
use crate::systems::{solve_rig, FootPlacementStatus};

/// Avian3D physics backend for foot placement.
pub struct Avian3dBackend;

impl FootPlacementBackend for Avian3dBackend {
    fn plugin() -> impl Plugin {
        Avian3dBackendPlugin
    }
}

/// Plugin that sets up Avian3D-specific systems for foot placement.
pub struct Avian3dBackendPlugin;

impl Plugin for Avian3dBackendPlugin {
    fn build(&self, app: &mut App) {
        use crate::FootPlacementSet;

        // Capsule bounds must be current before the pelvis correction reads them.
        app.add_systems(
            Update,
            (sync_capsule_bounds, avian_solve_feet)
                .chain()
                .in_set(FootPlacementSet::Solve),
        );
    }
}

impl GroundProbe for SpatialQuery<'_, '_> {
    fn cast(&self, start: Vec3, end: Vec3, filter: &ProbeFilter) -> ProbeHit {
        let Ok((direction, max_distance)) = Dir3::new_and_length(end - start) else {
            return ProbeHit::miss();
        };

        let query_filter = SpatialQueryFilter::from_mask(filter.collision_mask)
            .with_excluded_entities(filter.excluded.iter().copied());

        self.cast_ray(start, direction, max_distance, true, &query_filter)
            .map(|hit| {
                ProbeHit::hit(
                    hit.distance,
                    start + direction * hit.distance,
                    hit.normal,
                    Some(hit.entity),
                )
            })
            .unwrap_or_else(ProbeHit::miss)
    }
}

/// Get the distance from collider center to bottom for a given collider.
/// For capsules, this is half_height + radius.
pub fn get_collider_bottom_offset(collider: &Collider) -> f32 {
    let shape = collider.shape_scaled();
    if let Some(capsule) = shape.as_capsule() {
        let segment = capsule.segment;
        (segment.a.y - segment.b.y).abs() / 2.0 + capsule.radius
    } else if let Some(ball) = shape.as_ball() {
        ball.radius
    } else if let Some(cuboid) = shape.as_cuboid() {
        cuboid.half_extents.y
    } else {
        0.0
    }
}

/// Keep [`CapsuleBounds`] in sync with the rig's collider.
///
/// Also covers rigs whose dataset is added after the collider.
fn sync_capsule_bounds(
    mut commands: Commands,
    mut rigs: Query<
        (Entity, &Collider, Option<&mut CapsuleBounds>),
        (
            With<PelvisFeetData>,
            Or<(
                Changed<Collider>,
                Added<PelvisFeetData>,
                Without<CapsuleBounds>,
            )>,
        ),
    >,
) {
    for (entity, collider, bounds) in &mut rigs {
        let half_height = get_collider_bottom_offset(collider);
        match bounds {
            Some(mut bounds) => bounds.half_height = half_height,
            None => {
                commands.entity(entity).insert(CapsuleBounds::new(half_height));
            }
        }
    }
}

/// Probe and solve every rig whose pose was sampled this frame.
fn avian_solve_feet(
    spatial_query: SpatialQuery,
    mut rigs: Query<(
        &FootPlacementRig,
        &GlobalTransform,
        Option<&CapsuleBounds>,
        &mut PelvisFeetData,
        &mut FootPlacementStatus,
    )>,
) {
    for (rig, transform, capsule, mut data, mut status) in &mut rigs {
        solve_rig(
            &spatial_query,
            rig,
            transform,
            capsule,
            &mut data,
            &mut status,
        );
    }
}
