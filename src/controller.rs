use avian3d::prelude::*;
use bevy::{ecs::query::QueryData, prelude::*};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    agent::{Avoider, AvoiderMode, AvoiderState},
    filter::filter_escape_points,
    locomotion::EscapeMotor,
    navigation::{NavSurface, PROJECT_TOLERANCE, WalkableSurface},
    sampling::poisson_disc_points,
    visibility::{OcclusionOracle, SceneOcclusion, is_visible},
};

/// How far the avoidee must move before a new sampling pass is worthwhile.
const REPLAN_MOVE_THRESHOLD: f32 = 1.0;
/// Minimum horizontal offset to the avoidee before the agent turns to face it.
const FACING_THRESHOLD: f32 = 0.1;

/// Whether the current escape set should be rebuilt: the avoidee moved
/// significantly since the recorded snapshot, or there is nothing left to
/// run to. Agent movement alone never triggers a re-plan.
pub(crate) fn replan_due(state: &AvoiderState, avoidee_pos: Vec3) -> bool {
    match state.last_avoidee_position {
        Some(last) => {
            avoidee_pos.distance(last) > REPLAN_MOVE_THRESHOLD || state.escape_points.is_empty()
        }
        None => true,
    }
}

/// One tick of the evasion decision. Updates the mode, re-plans the escape
/// set when due, and returns the escape point to move to, if any. Pure over
/// the injected oracles and candidate generator, so the gating and selection
/// logic can be exercised with deterministic stand-ins.
pub(crate) fn evaluate_tick(
    avoider: &Avoider,
    state: &mut AvoiderState,
    agent_pos: Vec3,
    avoidee_pos: Vec3,
    surface: Option<&dyn WalkableSurface>,
    occlusion: &impl OcclusionOracle,
    generate: &mut impl FnMut() -> Vec<Vec3>,
) -> Option<Vec3> {
    let distance = agent_pos.distance(avoidee_pos);
    let seen = is_visible(occlusion, avoidee_pos, agent_pos, distance);
    state.mode = AvoiderMode::next(distance < avoider.avoid_range, seen);

    if state.mode != AvoiderMode::Evading {
        // Any in-flight path keeps running; no new command this tick.
        return None;
    }

    if replan_due(state, avoidee_pos) {
        let candidates = generate();
        state.escape_points = match surface {
            Some(surface) => filter_escape_points(&candidates, avoidee_pos, surface, occlusion),
            // Degraded mode: nothing is walkable without a surface
            None => Vec::new(),
        };
        state.last_avoidee_position = Some(avoidee_pos);
    }

    closest_escape_point(&state.escape_points, agent_pos)
}

/// The escape point nearest the agent. Ties keep the first point in the
/// set's iteration order.
fn closest_escape_point(escape_points: &[Vec3], agent_pos: Vec3) -> Option<Vec3> {
    escape_points
        .iter()
        .copied()
        .min_by(|a, b| {
            a.distance_squared(agent_pos)
                .total_cmp(&b.distance_squared(agent_pos))
        })
}

#[derive(QueryData)]
#[query_data(mutable)]
pub(crate) struct AvoiderControllerQuery {
    entity: Entity,
    avoider: &'static Avoider,
    state: &'static mut AvoiderState,
    motor: &'static mut EscapeMotor,
    transform: &'static mut Transform,
    global_transform: &'static GlobalTransform,
}

/// Drives every avoider for one simulation tick: face the avoidee, evaluate
/// range and line of sight, re-plan the escape set when due, and forward the
/// selected escape point to the motor.
pub(crate) fn run(
    mut agent_query: Query<AvoiderControllerQuery>,
    avoidee_query: Query<&GlobalTransform>,
    spatial_query: SpatialQuery,
    surface: Option<Res<NavSurface>>,
    mut rng: Local<Option<StdRng>>,
) {
    // Initialize RNG on first run using a simple seed
    let rng = rng.get_or_insert_with(|| StdRng::seed_from_u64(42));
    let surface = surface
        .as_deref()
        .map(|surface| surface as &dyn WalkableSurface);

    for mut item in agent_query.iter_mut() {
        let Some(avoidee) = item.avoider.avoidee else {
            continue;
        };
        let Ok(avoidee_transform) = avoidee_query.get(avoidee) else {
            continue;
        };

        let agent_pos = item.global_transform.translation();
        let avoidee_pos = avoidee_transform.translation();

        // Keep facing the avoidee on the horizontal plane (yaw only)
        let mut to_avoidee = avoidee_pos - agent_pos;
        to_avoidee.y = 0.0;
        if to_avoidee.length() > FACING_THRESHOLD {
            item.transform.look_to(to_avoidee, Vec3::Y);
        }

        let occlusion = SceneOcclusion {
            query: &spatial_query,
            filter: SpatialQueryFilter::from_mask(item.avoider.occlusion_mask)
                .with_excluded_entities([item.entity, avoidee]),
        };

        let area_radius = item.avoider.sample_area_radius;
        let min_spacing = item.avoider.sampling_radius;
        let max_points = item.avoider.max_sample_points;
        let mut generate =
            || poisson_disc_points(rng, agent_pos, area_radius, min_spacing, max_points);

        let command = evaluate_tick(
            item.avoider,
            &mut item.state,
            agent_pos,
            avoidee_pos,
            surface,
            &occlusion,
            &mut generate,
        );
        if let Some(point) = command {
            item.motor.set_target(point);
        }
    }
}

/// Fail-soft setup checks, run once per newly added avoider. Missing pieces
/// are warnings: the agent keeps ticking in a degraded mode instead of
/// panicking, so the component can be attached before a scene is fully wired.
pub(crate) fn validate_new_avoiders(
    query: Query<(Entity, &Avoider, &GlobalTransform), Added<Avoider>>,
    surface: Option<Res<NavSurface>>,
) {
    for (entity, avoider, global_transform) in query.iter() {
        if avoider.avoidee.is_none() {
            warn!("Avoider {entity}: no avoidee assigned, evasion is disabled");
        }
        match surface.as_deref() {
            None => {
                warn!(
                    "Avoider {entity}: no NavSurface resource, escape points cannot be \
                     validated and no movement will be issued"
                );
            }
            Some(surface) => {
                let position = global_transform.translation();
                if surface.project(position, PROJECT_TOLERANCE).is_none() {
                    warn!("Avoider {entity}: spawn position {position} is not walkable");
                }
            }
        }
    }
}

/// Debug visualization for avoiders: avoid range (red), sampling area
/// (yellow), surviving escape points (green), and the line of sight to the
/// avoidee (blue).
pub(crate) fn debug_avoider(
    mut gizmos: Gizmos,
    agent_query: Query<(&GlobalTransform, &Avoider, &AvoiderState)>,
    avoidee_query: Query<&GlobalTransform>,
) {
    for (transform, avoider, state) in agent_query.iter() {
        let agent_pos = transform.translation();

        gizmos.sphere(agent_pos, avoider.avoid_range, Color::srgb(1.0, 0.0, 0.0));
        gizmos.sphere(
            agent_pos,
            avoider.sample_area_radius,
            Color::srgb(1.0, 1.0, 0.0),
        );

        for point in state.escape_points() {
            gizmos.sphere(*point, 1.0, Color::srgb(0.0, 1.0, 0.0));
            gizmos.line(agent_pos, *point, Color::srgb(0.0, 1.0, 0.0).with_alpha(0.4));
        }

        if let Some(avoidee_transform) = avoider
            .avoidee
            .and_then(|avoidee| avoidee_query.get(avoidee).ok())
        {
            gizmos.line(
                agent_pos + Vec3::Y,
                avoidee_transform.translation() + Vec3::Y,
                Color::srgb(0.0, 0.0, 1.0),
            );
        }
    }
}
