use bevy::prelude::*;

use crate::{
    navigation::{PROJECT_TOLERANCE, WalkableSurface},
    visibility::{OcclusionOracle, is_visible},
};

/// Reduces a candidate set to valid escape points: each candidate is snapped
/// to the nearest walkable point, then kept only if the avoidee has no line
/// of sight to it. Walkability runs first so off-mesh candidates never cost
/// an occlusion query. Returns a fresh set; callers replace their previous
/// escape set wholesale.
pub fn filter_escape_points(
    candidates: &[Vec3],
    avoidee_pos: Vec3,
    surface: &dyn WalkableSurface,
    occlusion: &impl OcclusionOracle,
) -> Vec<Vec3> {
    let mut escape_points = Vec::new();
    for candidate in candidates {
        let Some(snapped) = surface.project(*candidate, PROJECT_TOLERANCE) else {
            continue;
        };
        let max_distance = avoidee_pos.distance(snapped);
        if !is_visible(occlusion, avoidee_pos, snapped, max_distance) {
            escape_points.push(snapped);
        }
    }
    escape_points
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{
        navigation::PlanarSurface,
        visibility::tests::{OpenField, WallAt},
    };

    struct NothingWalkable;

    impl WalkableSurface for NothingWalkable {
        fn project(&self, _point: Vec3, _tolerance: f32) -> Option<Vec3> {
            None
        }
    }

    /// Oracle wrapper counting how many rays were actually cast.
    struct CountingOracle<'a, O> {
        inner: &'a O,
        casts: &'a Cell<usize>,
    }

    impl<O: OcclusionOracle> OcclusionOracle for CountingOracle<'_, O> {
        fn first_hit(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<Vec3> {
            self.casts.set(self.casts.get() + 1);
            self.inner.first_hit(origin, direction, max_distance)
        }
    }

    #[test]
    fn test_occluded_walkable_candidate_is_accepted() {
        let surface = PlanarSurface::new(Vec2::splat(20.0), 0.0);
        let avoidee = Vec3::new(-10.0, 0.0, 0.0);
        // Wall between the avoidee and the candidate
        let wall = WallAt { wall_x: 0.0 };
        let candidates = [Vec3::new(10.0, 0.0, 0.0)];
        let escape = filter_escape_points(&candidates, avoidee, &surface, &wall);
        assert_eq!(escape, vec![Vec3::new(10.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_visible_candidate_is_rejected() {
        let surface = PlanarSurface::new(Vec2::splat(20.0), 0.0);
        let avoidee = Vec3::new(-10.0, 0.0, 0.0);
        let candidates = [Vec3::new(10.0, 0.0, 0.0)];
        let escape = filter_escape_points(&candidates, avoidee, &surface, &OpenField);
        assert!(escape.is_empty());
    }

    #[test]
    fn test_candidates_snap_to_the_surface() {
        let surface = PlanarSurface::new(Vec2::splat(20.0), 0.0);
        let avoidee = Vec3::new(-10.0, 0.0, 0.0);
        let wall = WallAt { wall_x: 0.0 };
        // Slightly past the walkable edge; projection pulls it back in
        let candidates = [Vec3::new(20.5, 0.0, 4.0)];
        let escape = filter_escape_points(&candidates, avoidee, &surface, &wall);
        assert_eq!(escape, vec![Vec3::new(20.0, 0.0, 4.0)]);
    }

    #[test]
    fn test_off_mesh_candidates_skip_occlusion_queries() {
        let casts = Cell::new(0);
        let oracle = CountingOracle {
            inner: &OpenField,
            casts: &casts,
        };
        let candidates = [Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)];
        let escape = filter_escape_points(&candidates, Vec3::ZERO, &NothingWalkable, &oracle);
        assert!(escape.is_empty());
        assert_eq!(casts.get(), 0, "walkability must be checked first");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let surface = PlanarSurface::new(Vec2::splat(20.0), 0.0);
        let avoidee = Vec3::new(-10.0, 0.0, 0.0);
        let wall = WallAt { wall_x: 0.0 };
        let candidates = [
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(-15.0, 0.0, 3.0),
            Vec3::new(12.0, 0.0, -6.0),
        ];
        let first = filter_escape_points(&candidates, avoidee, &surface, &wall);
        let second = filter_escape_points(&candidates, avoidee, &surface, &wall);
        assert_eq!(first, second);
    }
}
