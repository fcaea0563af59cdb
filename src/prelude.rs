pub use crate::agent::{Avoider, AvoiderMode, AvoiderState};
pub use crate::filter::filter_escape_points;
pub use crate::locomotion::EscapeMotor;
pub use crate::navigation::{NavSurface, PROJECT_TOLERANCE, PlanarSurface, WalkableSurface};
pub use crate::plugin::{AvoiderPlugin, AvoiderSystemSet, DebugAvoiderPlugin, DebugAvoiderSystem};
pub use crate::sampling::poisson_disc_points;
pub use crate::visibility::{
    EYE_HEIGHT, OcclusionOracle, SceneOcclusion, TARGET_LIFT, VISIBLE_HIT_TOLERANCE, is_visible,
};
