//! Shared pelvis vertical correction.

use bevy::prelude::*;

use crate::dataset::PelvisFeetData;
use crate::detection::ProbeHit;

/// Vertical pelvis offset for a set of foot probes.
///
/// Zero when no foot found ground. Otherwise the lowest
/// `hit height - capsule bottom` over the feet that found ground, so the
/// pelvis drops only as far as the most constrained foot needs.
pub fn pelvis_offset(hits: &[ProbeHit], capsule_bottom: f32) -> f32 {
    if !hits.iter().any(|hit| hit.hit) {
        return 0.0;
    }

    hits.iter()
        .map(|hit| {
            if hit.hit {
                hit.point.y - capsule_bottom
            } else {
                f32::INFINITY
            }
        })
        .fold(f32::INFINITY, f32::min)
}

/// Compute the target pelvis translation and carry feet that found no ground
/// along with it.
pub fn correct_pelvis(data: &mut PelvisFeetData, capsule_bottom: f32) {
    let offset = pelvis_offset(&data.probe_hits, capsule_bottom);
    data.target_pelvis_translation = Vec3::Y * offset;

    for (hit, effector) in data
        .probe_hits
        .iter()
        .zip(data.target_effector_locations.iter_mut())
    {
        if !hit.hit {
            effector.y += offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FootPlacementParams;
    use crate::solver::initialize_pelvis;

    fn hit_at(y: f32) -> ProbeHit {
        ProbeHit::hit(0.0, Vec3::new(0.0, y, 0.0), Vec3::Y, None)
    }

    #[test]
    fn no_ground_means_no_correction() {
        assert_eq!(pelvis_offset(&[], -1.0), 0.0);
        assert_eq!(pelvis_offset(&[ProbeHit::miss(), ProbeHit::miss()], -1.0), 0.0);
    }

    #[test]
    fn lowest_grounded_foot_wins() {
        let hits = [hit_at(0.3), hit_at(-0.2), ProbeHit::miss()];
        assert!((pelvis_offset(&hits, 0.0) - -0.2).abs() < 1e-6);
    }

    #[test]
    fn missed_feet_do_not_constrain() {
        let hits = [ProbeHit::miss(), hit_at(0.0)];
        assert!((pelvis_offset(&hits, -10.0) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn ungrounded_feet_move_with_pelvis() {
        let mut data = PelvisFeetData::new([
            FootPlacementParams::new("foot_l"),
            FootPlacementParams::new("foot_r"),
        ]);
        initialize_pelvis(Entity::PLACEHOLDER, &mut data);
        data.probe_hits = vec![hit_at(-0.1), ProbeHit::miss()];
        data.target_effector_locations = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.2, 0.4, 0.0)];

        correct_pelvis(&mut data, 0.0);

        assert!((data.target_pelvis_translation - Vec3::new(0.0, -0.1, 0.0)).length() < 1e-6);
        // Grounded foot untouched, ungrounded foot dragged down.
        assert_eq!(data.target_effector_locations[0], Vec3::ZERO);
        assert!((data.target_effector_locations[1].y - 0.3).abs() < 1e-6);
    }
}
