//! Locomotion input components.
//!
//! Supplied by the character's movement logic. Only the output stage reads
//! them, to derive idle/walk/run flags for the animation graph.

use bevy::prelude::*;

/// Coarse movement classification.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MovementState {
    Walk,
    #[default]
    Run,
}

/// Current movement of the character.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use msg_foot_ik::prelude::*;
///
/// let mut locomotion = Locomotion::new();
/// assert!(!locomotion.is_accelerating());
///
/// locomotion.set_acceleration(Vec3::new(2.0, 0.0, 0.0));
/// locomotion.set_state(MovementState::Walk);
/// assert!(locomotion.is_accelerating());
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Locomotion {
    /// Current acceleration (units/second^2).
    pub acceleration: Vec3,
    /// Walk or run.
    pub state: MovementState,
}

impl Locomotion {
    /// Not accelerating, running state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_acceleration(&mut self, acceleration: Vec3) {
        self.acceleration = acceleration;
    }

    pub fn set_state(&mut self, state: MovementState) {
        self.state = state;
    }

    /// Whether there is any acceleration input.
    pub fn is_accelerating(&self) -> bool {
        self.acceleration.length_squared() > 0.0
    }
}

/// Ground locomotion flags for the animation graph.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocomotionFlags {
    pub should_idle: bool,
    pub should_walk: bool,
    pub should_run: bool,
}

impl Default for LocomotionFlags {
    fn default() -> Self {
        Self::IDLE
    }
}

impl LocomotionFlags {
    pub const IDLE: Self = Self {
        should_idle: true,
        should_walk: false,
        should_run: false,
    };

    /// Idle without acceleration, otherwise walk or run by movement state.
    pub fn from_locomotion(locomotion: &Locomotion) -> Self {
        if !locomotion.is_accelerating() {
            return Self::IDLE;
        }
        match locomotion.state {
            MovementState::Walk => Self {
                should_idle: false,
                should_walk: true,
                should_run: false,
            },
            MovementState::Run => Self {
                should_idle: false,
                should_walk: false,
                should_run: true,
            },
        }
    }
}
