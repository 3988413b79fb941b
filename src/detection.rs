//! Ground probe result and filter structures.
//!
//! These hold the inputs and results of the per-foot downward raycasts.

use bevy::prelude::*;

use crate::config::FootProbeConfig;

/// Result of a foot's ground probe.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// Whether the probe hit a surface.
    pub hit: bool,
    /// Distance from the probe start to the hit point (if hit).
    pub distance: f32,
    /// World position of the hit point.
    pub point: Vec3,
    /// Normal of the surface at the hit point.
    pub normal: Vec3,
    /// Entity that was hit (if any).
    pub entity: Option<Entity>,
}

impl Default for ProbeHit {
    fn default() -> Self {
        Self::miss()
    }
}

impl ProbeHit {
    /// An empty (no hit) result.
    pub fn miss() -> Self {
        Self {
            hit: false,
            distance: 0.0,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            entity: None,
        }
    }

    /// A hit result.
    pub fn hit(distance: f32, point: Vec3, normal: Vec3, entity: Option<Entity>) -> Self {
        Self {
            hit: true,
            distance,
            point,
            normal,
            entity,
        }
    }
}

/// Collision filter for a single probe.
#[derive(Debug, Clone, Copy)]
pub struct ProbeFilter<'a> {
    /// Collision layers tested (bitmask).
    pub collision_mask: u32,
    /// Entities ignored by the probe.
    pub excluded: &'a [Entity],
}

impl<'a> ProbeFilter<'a> {
    pub fn excludes(&self, entity: Entity) -> bool {
        self.excluded.contains(&entity)
    }
}

impl<'a> From<&'a FootProbeConfig> for ProbeFilter<'a> {
    fn from(config: &'a FootProbeConfig) -> Self {
        Self {
            collision_mask: config.collision_mask,
            excluded: &config.excluded,
        }
    }
}
