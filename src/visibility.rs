use avian3d::prelude::*;
use bevy::prelude::*;

/// Vertical offset above a viewer's position used as the ray origin.
pub const EYE_HEIGHT: f32 = 1.5;
/// Vertical offset above a queried point used as the ray target, so rays
/// aimed at ground-level points do not graze the walking surface.
pub const TARGET_LIFT: f32 = 0.5;
/// How close a ray hit must land to the lifted target for the hit to still
/// count as "seeing" the point rather than hitting intervening geometry.
pub const VISIBLE_HIT_TOLERANCE: f32 = 1.0;

/// Capability interface over the ray-based occlusion query. The controller
/// and filter only ever ask for the first blocking hit along a segment,
/// which keeps them testable against deterministic stand-ins.
pub trait OcclusionOracle {
    /// Casts a ray and returns the first blocking hit point within
    /// `max_distance`, or `None` when the segment is unobstructed.
    fn first_hit(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<Vec3>;
}

/// [OcclusionOracle] backed by the physics world. The filter decides which
/// layers can occlude and which entities (the agent itself, the avoidee) are
/// never treated as obstructions.
pub struct SceneOcclusion<'a, 'w, 's> {
    pub query: &'a SpatialQuery<'w, 's>,
    pub filter: SpatialQueryFilter,
}

impl OcclusionOracle for SceneOcclusion<'_, '_, '_> {
    fn first_hit(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<Vec3> {
        self.query
            .cast_ray(origin, direction, max_distance, true, &self.filter)
            .map(|hit| origin + *direction * hit.distance)
    }
}

/// Line-of-sight check from a viewer at `from` to a ground point `to`. The
/// ray runs from eye height above the viewer toward a slightly lifted
/// target; a hit only hides the point when it lands on intervening geometry
/// rather than within [VISIBLE_HIT_TOLERANCE] of the target itself.
pub fn is_visible(
    oracle: &impl OcclusionOracle,
    from: Vec3,
    to: Vec3,
    max_distance: f32,
) -> bool {
    let eye = from + Vec3::Y * EYE_HEIGHT;
    let target = to + Vec3::Y * TARGET_LIFT;
    let Ok(direction) = Dir3::new(target - eye) else {
        // Viewer eye and target coincide
        return true;
    };
    match oracle.first_hit(eye, direction, max_distance) {
        Some(hit) => hit.distance(target) < VISIBLE_HIT_TOLERANCE,
        None => true,
    }
}
