use avian3d::prelude::*;
use bevy::{ecs::query::QueryData, prelude::*};
use derivative::Derivative;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::{SMALL_THRESHOLD, agent::Avoider};

/// Drives an agent toward a target point at the avoider's move speed.
/// This is a deliberately simple actuator: straight-line kinematic velocity
/// control on the horizontal plane, cleared on arrival. The controller only
/// depends on [set_target](EscapeMotor::set_target),
/// [has_active_path](EscapeMotor::has_active_path) and
/// [current_target](EscapeMotor::current_target), so games with a real
/// pathfinder can drive their own actuator from
/// [AvoiderState](crate::agent::AvoiderState) instead.
#[derive(Component, Debug, Copy, Clone, Reflect, Derivative)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
#[derivative(Default)]
#[reflect(Component)]
pub struct EscapeMotor {
    target: Option<Vec3>,
    /// Distance from the target at which the path completes
    #[derivative(Default(value = "0.1"))]
    stopping_distance: f32,
}

impl EscapeMotor {
    /// Set the distance from the target at which the path completes.
    /// (Default: 0.1)
    pub fn with_stopping_distance(self, stopping_distance: f32) -> Self {
        Self {
            stopping_distance,
            ..self
        }
    }

    /// Start moving toward the given point, replacing any active path.
    pub fn set_target(&mut self, point: Vec3) {
        self.target = Some(point);
    }

    /// Abandon the active path, if any.
    pub fn stop(&mut self) {
        self.target = None;
    }

    /// Whether the motor is still moving toward a target.
    pub fn has_active_path(&self) -> bool {
        self.target.is_some()
    }

    /// The point the motor is currently moving toward.
    pub fn current_target(&self) -> Option<Vec3> {
        self.target
    }
}

#[derive(QueryData)]
#[query_data(mutable)]
pub(crate) struct MoveAgentSystemQuery {
    avoider: &'static Avoider,
    motor: &'static mut EscapeMotor,
    global_transform: &'static GlobalTransform,
    velocity: &'static mut LinearVelocity,
}

/// Advances agents toward their motor targets. Only the horizontal velocity
/// components are driven so gravity and vertical motion stay untouched.
pub(crate) fn move_agent(mut query: Query<MoveAgentSystemQuery>) {
    for mut item in query.iter_mut() {
        let Some(target) = item.motor.target else {
            item.velocity.x = 0.0;
            item.velocity.z = 0.0;
            continue;
        };

        let position = item.global_transform.translation();
        let mut to_target = target - position;
        to_target.y = 0.0;

        if to_target.length() <= item.motor.stopping_distance {
            item.motor.stop();
            item.velocity.x = 0.0;
            item.velocity.z = 0.0;
            continue;
        }

        let drive = if to_target.length_squared() > SMALL_THRESHOLD {
            to_target.normalize() * item.avoider.move_speed
        } else {
            Vec3::ZERO
        };
        item.velocity.x = drive.x;
        item.velocity.z = drive.z;
    }
}

/// Debug visualization for the active path: a line to the motor target and
/// a marker at the destination.
pub(crate) fn debug_movement(
    mut gizmos: Gizmos,
    query: Query<(&GlobalTransform, &EscapeMotor)>,
) {
    for (transform, motor) in query.iter() {
        let Some(target) = motor.current_target() else {
            continue;
        };
        let position = transform.translation();
        gizmos.line(position, target, Color::BLACK);
        gizmos.sphere(target, 1.0, Color::BLACK);
    }
}
