use std::sync::Arc;

use bevy::prelude::*;

/// Default tolerance used when projecting candidate points onto the
/// walkable surface.
pub const PROJECT_TOLERANCE: f32 = 1.0;

/// Capability interface over the navigation world's walkability query.
/// Implementations answer one question: what is the nearest walkable point
/// within `tolerance` of the queried point, if any?
pub trait WalkableSurface {
    fn project(&self, point: Vec3, tolerance: f32) -> Option<Vec3>;
}

/// Resource handing the plugin whatever walkability backend the game uses.
/// Without this resource avoiders still run, but every re-plan produces an
/// empty escape set and no movement commands are issued.
#[derive(Resource, Clone)]
pub struct NavSurface(Arc<dyn WalkableSurface + Send + Sync>);

impl NavSurface {
    pub fn new(surface: impl WalkableSurface + Send + Sync + 'static) -> Self {
        Self(Arc::new(surface))
    }
}

impl WalkableSurface for NavSurface {
    fn project(&self, point: Vec3, tolerance: f32) -> Option<Vec3> {
        self.0.project(point, tolerance)
    }
}

/// Rectangular walkable plane: an axis-aligned region at a fixed height.
/// Projection clamps the point into the rectangle and snaps it to the
/// surface height, succeeding only when the original point was within the
/// tolerance of the surface. Enough for demos and flat arenas; games with a
/// real navigation mesh should provide their own [WalkableSurface].
#[derive(Debug, Clone, Copy)]
pub struct PlanarSurface {
    pub half_extents: Vec2,
    pub height: f32,
}

impl PlanarSurface {
    pub fn new(half_extents: Vec2, height: f32) -> Self {
        Self {
            half_extents,
            height,
        }
    }
}

impl WalkableSurface for PlanarSurface {
    fn project(&self, point: Vec3, tolerance: f32) -> Option<Vec3> {
        let clamped = Vec3::new(
            point.x.clamp(-self.half_extents.x, self.half_extents.x),
            self.height,
            point.z.clamp(-self.half_extents.y, self.half_extents.y),
        );
        (point.distance(clamped) <= tolerance).then_some(clamped)
    }
}
