mod agent;
mod controller;
mod filter;
mod locomotion;
mod navigation;
mod plugin;
pub mod prelude;
mod sampling;
mod visibility;

pub(crate) const SMALL_THRESHOLD: f32 = 0.0001;
