use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use crate::SMALL_THRESHOLD;

/// Maximum candidate offsets tried around an active point before it is
/// retired from the active list.
const MAX_ATTEMPTS_PER_POINT: usize = 30;

/// Generates a Poisson-disc distributed set of points on the horizontal
/// plane around `center`, using the dart-throwing variant with an active
/// list. Every returned point lies within `area_radius` of the center,
/// shares its height, and keeps at least `min_spacing` to every other point.
///
/// The RNG is injected so callers can seed it for reproducible sets. The
/// seed point is always included, even when `max_points` is zero. Degenerate
/// inputs (non-positive radius, spacing wider than the area) drain the
/// active list and terminate with a small or seed-only set.
pub fn poisson_disc_points(
    rng: &mut impl Rng,
    center: Vec3,
    area_radius: f32,
    min_spacing: f32,
    max_points: usize,
) -> Vec<Vec3> {
    // A non-positive spacing would make the offset range empty.
    let min_spacing = min_spacing.max(SMALL_THRESHOLD);

    let seed = random_point_in_disc(rng, center, area_radius.max(0.0));
    let mut points = vec![seed];
    let mut active_list = vec![seed];

    while !active_list.is_empty() && points.len() < max_points {
        let active_index = rng.random_range(0..active_list.len());
        let current_point = active_list[active_index];
        let mut found_valid_point = false;

        for _ in 0..MAX_ATTEMPTS_PER_POINT {
            let angle = rng.random_range(0.0..TAU);
            let radius = rng.random_range(min_spacing..2.0 * min_spacing);
            let new_point =
                current_point + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius);

            if new_point.distance(center) <= area_radius
                && far_enough_from_all(new_point, &points, min_spacing)
            {
                points.push(new_point);
                active_list.push(new_point);
                found_valid_point = true;
                break;
            }
        }

        if !found_valid_point {
            active_list.swap_remove(active_index);
        }
    }

    points
}

/// Uniformly random point inside the disc of `radius` around `center`,
/// pinned to the center's height.
fn random_point_in_disc(rng: &mut impl Rng, center: Vec3, radius: f32) -> Vec3 {
    let angle = rng.random_range(0.0..TAU);
    let distance = radius * rng.random::<f32>().sqrt();
    center + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

fn far_enough_from_all(new_point: Vec3, existing_points: &[Vec3], min_spacing: f32) -> bool {
    existing_points
        .iter()
        .all(|point| new_point.distance(*point) >= min_spacing)
}
