use avian3d::prelude::LayerMask;
use bevy::prelude::*;
use derivative::Derivative;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::locomotion::EscapeMotor;

/// An agent that keeps out of sight of another entity. Each tick the agent
/// faces the avoidee; once the avoidee gets within the avoid range and can
/// see the agent, the agent samples escape points around itself and runs to
/// the nearest one the avoidee cannot see.
#[derive(Component, Debug, Clone, Reflect, Derivative)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
#[derivative(Default)]
#[require(AvoiderState, EscapeMotor)]
#[reflect(Component)]
pub struct Avoider {
    /// The entity to stay away from
    pub avoidee: Option<Entity>,
    /// Distance at which the agent starts reacting to the avoidee
    #[derivative(Default(value = "10.0"))]
    pub avoid_range: f32,
    /// Movement speed when running to an escape point
    #[derivative(Default(value = "3.5"))]
    pub move_speed: f32,
    /// Minimum spacing between sampled candidate points
    #[derivative(Default(value = "2.0"))]
    pub sampling_radius: f32,
    /// Maximum number of candidate points per sampling pass
    #[derivative(Default(value = "30"))]
    pub max_sample_points: usize,
    /// Radius of the sampling area around the agent
    #[derivative(Default(value = "8.0"))]
    pub sample_area_radius: f32,
    /// The layers that can occlude line-of-sight rays
    #[derivative(Default(value = "LayerMask::ALL"))]
    pub occlusion_mask: LayerMask,
}

impl Avoider {
    /// Create a new Avoider that stays away from the given entity
    pub fn new(avoidee: Entity) -> Self {
        Self {
            avoidee: Some(avoidee),
            ..Default::default()
        }
    }

    /// Set the distance at which the agent reacts to the avoidee.
    /// (Default: 10.0)
    pub fn with_avoid_range(self, avoid_range: f32) -> Self {
        Self {
            avoid_range,
            ..self
        }
    }

    /// Set the movement speed used when running to an escape point.
    /// (Default: 3.5)
    pub fn with_move_speed(self, move_speed: f32) -> Self {
        Self { move_speed, ..self }
    }

    /// Set the minimum spacing between sampled candidate points.
    /// (Default: 2.0)
    pub fn with_sampling_radius(self, sampling_radius: f32) -> Self {
        Self {
            sampling_radius,
            ..self
        }
    }

    /// Set the maximum number of candidates per sampling pass. (Default: 30)
    pub fn with_max_sample_points(self, max_sample_points: usize) -> Self {
        Self {
            max_sample_points,
            ..self
        }
    }

    /// Set the radius of the sampling area around the agent. (Default: 8.0)
    pub fn with_sample_area_radius(self, sample_area_radius: f32) -> Self {
        Self {
            sample_area_radius,
            ..self
        }
    }

    /// Set the layers that can occlude line-of-sight rays.
    pub fn with_occlusion_mask(self, mask: impl Into<LayerMask>) -> Self {
        Self {
            occlusion_mask: mask.into(),
            ..self
        }
    }
}

/// The two operating modes of an avoider, re-evaluated every tick.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Reflect)]
pub enum AvoiderMode {
    /// The avoidee is out of range or cannot see the agent. The agent only
    /// turns to keep facing the avoidee.
    #[default]
    Tracking,
    /// The avoidee is within the avoid range and has line of sight to the
    /// agent. Escape points are planned and pursued.
    Evading,
}

impl AvoiderMode {
    /// Guarded transition: evading requires both proximity and being seen.
    pub(crate) fn next(in_range: bool, seen: bool) -> Self {
        if in_range && seen {
            AvoiderMode::Evading
        } else {
            AvoiderMode::Tracking
        }
    }
}

/// Mutable controller state. Owned exclusively by the controller system;
/// the escape set is only ever replaced wholesale by a completed re-plan.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct AvoiderState {
    pub(crate) mode: AvoiderMode,
    /// Avoidee position recorded at the last re-plan, used to detect
    /// significant avoidee movement.
    pub(crate) last_avoidee_position: Option<Vec3>,
    pub(crate) escape_points: Vec<Vec3>,
}

impl AvoiderState {
    /// The mode the agent operated in during the last tick.
    pub fn mode(&self) -> AvoiderMode {
        self.mode
    }

    /// The escape points that survived the last re-plan. Staleness between
    /// re-plans is expected; the set is only rebuilt when the avoidee moves
    /// significantly or the set runs empty.
    pub fn escape_points(&self) -> &[Vec3] {
        &self.escape_points
    }
}
