//! Ground probing and per-foot IK target computation.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::backend::GroundProbe;
use crate::config::{FootPlacementParams, ValueConstraint};
use crate::detection::{ProbeFilter, ProbeHit};

/// IK targets computed for one foot in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootTarget {
    pub hit: ProbeHit,
    pub effector: Vec3,
    pub rotation: Quat,
    pub pole: Vec3,
}

/// Cast the ground probe for a foot whose posed bone sits at `bone_location`.
pub fn probe_foot(
    probe: &impl GroundProbe,
    bone_location: Vec3,
    params: &FootPlacementParams,
) -> ProbeHit {
    let start = bone_location + Vec3::Y * params.probe.height_offset;
    let end = start - Vec3::Y * params.probe.distance;
    probe.cast(start, end, &ProbeFilter::from(&params.probe))
}

/// Location that puts the foot bone `foot_bone_height` above the hit point.
pub fn placement_location(hit: &ProbeHit, foot_bone_height: f32) -> Vec3 {
    hit.point + Vec3::Y * foot_bone_height
}

/// Additive pitch and roll (degrees) aligning a foot with a surface normal.
///
/// Pitch rotates about the right axis and follows the forward lean of the
/// normal; roll rotates about the forward axis and follows its lateral lean.
/// Each is clamped by its constraint.
pub fn additive_angles(
    normal: Vec3,
    pitch_constraint: &ValueConstraint,
    roll_constraint: &ValueConstraint,
) -> (f32, f32) {
    // forward is -Z, right is +X
    let pitch = -(-normal.z).atan2(normal.y).to_degrees();
    let roll = -normal.x.atan2(normal.y).to_degrees();
    (
        pitch_constraint.constrain(pitch),
        roll_constraint.constrain(roll),
    )
}

/// World-space rotation to apply after the posed foot rotation so the foot
/// lies on a surface with the given normal.
pub fn additive_rotation(
    normal: Vec3,
    pitch_constraint: &ValueConstraint,
    roll_constraint: &ValueConstraint,
) -> Quat {
    let (pitch, roll) = additive_angles(normal, pitch_constraint, roll_constraint);
    Quat::from_rotation_x(pitch.to_radians()) * Quat::from_rotation_z(roll.to_radians())
}

/// Pole target for the leg: above/below the effector by the vertical offset,
/// pushed against the posed bone's up vector turned a quarter to the right
/// about vertical.
pub fn pole_location(effector: Vec3, posed_rotation: Quat, params: &FootPlacementParams) -> Vec3 {
    // Negative turn about +Y maps forward (-Z) to right (+X).
    let side = Quat::from_rotation_y(-FRAC_PI_2) * (posed_rotation * Vec3::Y);
    effector + Vec3::Y * params.pole_vertical_offset - side * params.pole_offset
}

/// Probe the ground under a foot and compute its IK targets.
///
/// - No ground: the posed transform is used as is.
/// - Ground and placement active: the foot is planted `foot_bone_height`
///   above the hit and aligned with the surface.
/// - Ground and placement inactive: the foot keeps its component-space height
///   above the hit, so a swinging foot tracks the ground without snapping flat.
pub fn compute_foot(
    probe: &impl GroundProbe,
    posed: &Transform,
    posed_component_location: Vec3,
    params: &FootPlacementParams,
    placement_active: bool,
) -> FootTarget {
    let hit = probe_foot(probe, posed.translation, params);

    let (effector, rotation) = if !hit.hit {
        (posed.translation, posed.rotation)
    } else if placement_active {
        let additive =
            additive_rotation(hit.normal, &params.pitch_constraint, &params.roll_constraint);
        (
            placement_location(&hit, params.foot_bone_height),
            additive * posed.rotation,
        )
    } else {
        (
            placement_location(&hit, 0.0) + Vec3::Y * posed_component_location.y,
            posed.rotation,
        )
    };

    FootTarget {
        hit,
        effector,
        rotation,
        pole: pole_location(effector, posed.rotation, params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Flat ground at a fixed height with a configurable normal.
    struct Ground {
        height: f32,
        normal: Vec3,
        last_ray: Cell<Option<(Vec3, Vec3)>>,
    }

    impl Ground {
        fn flat(height: f32) -> Self {
            Self::sloped(height, Vec3::Y)
        }

        fn sloped(height: f32, normal: Vec3) -> Self {
            Self {
                height,
                normal,
                last_ray: Cell::new(None),
            }
        }
    }

    impl GroundProbe for Ground {
        fn cast(&self, start: Vec3, end: Vec3, _filter: &ProbeFilter) -> ProbeHit {
            self.last_ray.set(Some((start, end)));
            if start.y >= self.height && end.y <= self.height {
                let point = Vec3::new(start.x, self.height, start.z);
                ProbeHit::hit(start.y - self.height, point, self.normal, None)
            } else {
                ProbeHit::miss()
            }
        }
    }

    const EPS: f32 = 1e-4;

    #[test]
    fn probe_spans_offset_and_distance() {
        let ground = Ground::flat(-100.0);
        let params = FootPlacementParams::new("foot").with_probe(0.5, 2.0);

        let hit = probe_foot(&ground, Vec3::new(1.0, 1.0, 0.0), &params);
        assert!(!hit.hit);

        let (start, end) = ground.last_ray.get().unwrap();
        assert_eq!(start, Vec3::new(1.0, 1.5, 0.0));
        assert_eq!(end, Vec3::new(1.0, -0.5, 0.0));
    }

    #[test]
    fn miss_uses_posed_transform() {
        let ground = Ground::flat(-100.0);
        let params = FootPlacementParams::new("foot");
        let posed = Transform::from_xyz(0.3, 0.2, -0.1)
            .with_rotation(Quat::from_rotation_y(0.7));

        let target = compute_foot(&ground, &posed, Vec3::new(0.0, 0.2, 0.0), &params, true);

        assert!(!target.hit.hit);
        assert_eq!(target.effector, posed.translation);
        assert_eq!(target.rotation, posed.rotation);
    }

    #[test]
    fn planted_foot_sits_on_ground_plus_bone_height() {
        let ground = Ground::flat(0.0);
        let params = FootPlacementParams::new("foot").with_foot_bone_height(0.08);
        let posed = Transform::from_xyz(0.0, 0.5, 0.0);

        let target = compute_foot(&ground, &posed, Vec3::new(0.0, 0.5, 0.0), &params, true);

        assert!(target.hit.hit);
        assert!((target.effector.y - 0.08).abs() < EPS);
        // Flat ground adds no rotation.
        assert!(target.rotation.angle_between(posed.rotation) < EPS);
    }

    #[test]
    fn swinging_foot_keeps_component_height() {
        let ground = Ground::flat(0.2);
        let params = FootPlacementParams::new("foot").with_foot_bone_height(0.08);
        let posed = Transform::from_xyz(0.0, 0.6, 0.0).with_rotation(Quat::from_rotation_x(0.3));

        let target = compute_foot(&ground, &posed, Vec3::new(0.1, 0.35, 0.0), &params, false);

        assert!((target.effector.y - (0.2 + 0.35)).abs() < EPS);
        assert_eq!(target.rotation, posed.rotation);
    }

    #[test]
    fn forward_slope_pitches_foot() {
        // Ground rising towards -Z leans the normal towards +Z.
        let angle = 20f32.to_radians();
        let normal = Vec3::new(0.0, angle.cos(), angle.sin());

        let (pitch, roll) =
            additive_angles(normal, &ValueConstraint::default(), &ValueConstraint::default());
        assert!((pitch - 20.0).abs() < EPS);
        assert!(roll.abs() < EPS);

        let additive =
            additive_rotation(normal, &ValueConstraint::default(), &ValueConstraint::default());
        assert!((additive * Vec3::Y - normal).length() < EPS);
    }

    #[test]
    fn lateral_slope_rolls_foot() {
        // Ground rising towards +X leans the normal towards -X.
        let angle = 15f32.to_radians();
        let normal = Vec3::new(-angle.sin(), angle.cos(), 0.0);

        let (pitch, roll) =
            additive_angles(normal, &ValueConstraint::default(), &ValueConstraint::default());
        assert!(pitch.abs() < EPS);
        assert!((roll - 15.0).abs() < EPS);

        let additive =
            additive_rotation(normal, &ValueConstraint::default(), &ValueConstraint::default());
        assert!((additive * Vec3::Y - normal).length() < EPS);
    }

    #[test]
    fn steep_normals_are_clamped() {
        let pitch_limit = ValueConstraint::symmetric(10.0);
        let roll_limit = ValueConstraint::new(-5.0, 2.0);

        let normals = [
            Vec3::new(0.9, 0.1, 0.4).normalize(),
            Vec3::new(-0.7, 0.2, -0.7).normalize(),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, -0.5, 0.0).normalize(),
            Vec3::Y,
        ];
        for normal in normals {
            let (pitch, roll) = additive_angles(normal, &pitch_limit, &roll_limit);
            assert!((-10.0..=10.0).contains(&pitch), "pitch {pitch} for {normal}");
            assert!((-5.0..=2.0).contains(&roll), "roll {roll} for {normal}");
        }
    }

    #[test]
    fn planted_rotation_applies_additive_after_pose() {
        let angle = 10f32.to_radians();
        let normal = Vec3::new(0.0, angle.cos(), angle.sin());
        let ground = Ground::sloped(0.0, normal);
        let params = FootPlacementParams::new("foot");
        let posed = Transform::from_xyz(0.0, 0.3, 0.0).with_rotation(Quat::from_rotation_y(1.2));

        let target = compute_foot(&ground, &posed, Vec3::ZERO, &params, true);

        let expected = Quat::from_rotation_x(angle) * posed.rotation;
        assert!(target.rotation.angle_between(expected) < EPS);
    }

    #[test]
    fn pole_follows_turned_up_vector() {
        let params = FootPlacementParams::new("foot").with_pole_offsets(2.0, -1.0);
        // Bone up vector pointing forward (-Z).
        let posed_rotation = Quat::from_rotation_x(-FRAC_PI_2);
        assert!((posed_rotation * Vec3::Y - Vec3::NEG_Z).length() < EPS);

        let effector = Vec3::new(1.0, 0.0, 0.0);
        let pole = pole_location(effector, posed_rotation, &params);

        // -Z turned a quarter to the right is +X; the pole is pushed against it.
        assert!((pole - Vec3::new(-1.0, -1.0, 0.0)).length() < EPS);
    }

    #[test]
    fn pole_side_turns_forward_to_right() {
        let params = FootPlacementParams::new("foot").with_pole_offsets(1.0, 0.0);
        // Bone up vector pointing right (+X) turns to backward (+Z).
        let posed_rotation = Quat::from_rotation_z(-FRAC_PI_2);
        assert!((posed_rotation * Vec3::Y - Vec3::X).length() < EPS);

        let pole = pole_location(Vec3::ZERO, posed_rotation, &params);
        assert!((pole - Vec3::new(0.0, 0.0, -1.0)).length() < EPS);
    }

    #[test]
    fn pole_is_relative_to_final_effector() {
        let ground = Ground::flat(0.0);
        let params = FootPlacementParams::new("foot")
            .with_foot_bone_height(0.1)
            .with_pole_offsets(0.0, -1.0);
        let posed = Transform::from_xyz(0.0, 0.5, 0.0);

        let target = compute_foot(&ground, &posed, Vec3::ZERO, &params, true);
        assert!((target.pole - Vec3::new(0.0, -0.9, 0.0)).length() < EPS);
    }
}
