//! Footstep-window notifications.
//!
//! Animation events mark the part of a footstep cycle during which a foot
//! should be ground-locked. They arrive as [`FootPlacementNotify`] messages and
//! are applied before the next solve.

use bevy::prelude::*;

use crate::dataset::PelvisFeetData;

/// Set or clear one foot's placement flag on a rig.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FootPlacementNotify {
    /// Entity holding the rig's [`PelvisFeetData`].
    pub rig: Entity,
    /// Foot slot.
    pub foot: usize,
    /// `true` while the foot is planted, `false` while it swings.
    pub active: bool,
}

impl FootPlacementNotify {
    /// Sent every frame the notify window is active. Ticks are used instead of
    /// a begin event because begin events can be skipped while blending.
    pub fn tick(rig: Entity, foot: usize) -> Self {
        Self {
            rig,
            foot,
            active: true,
        }
    }

    /// Sent when the notify window ends.
    pub fn end(rig: Entity, foot: usize) -> Self {
        Self {
            rig,
            foot,
            active: false,
        }
    }
}

/// Apply queued placement notifications.
pub fn apply_placement_notifies(
    mut messages: MessageReader<FootPlacementNotify>,
    mut rigs: Query<&mut PelvisFeetData>,
) {
    for msg in messages.read() {
        let Ok(mut data) = rigs.get_mut(msg.rig) else {
            continue;
        };
        if !data.set_placement_active(msg.foot, msg.active) {
            debug!(
                "ignoring placement notify for foot {} on {:?}: rig has {} feet",
                msg.foot,
                msg.rig,
                data.foot_count()
            );
        }
    }
}
