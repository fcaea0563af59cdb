use bevy::prelude::*;

use crate::{
    controller::{debug_avoider, run, validate_new_avoiders},
    locomotion::{debug_movement, move_agent},
};

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct AvoiderSystemSet;

pub struct AvoiderPlugin;

impl Plugin for AvoiderPlugin {
    fn build(&self, app: &mut App) {
        let update_systems = (validate_new_avoiders, run, move_agent)
            .chain()
            .in_set(AvoiderSystemSet);
        app.add_systems(FixedUpdate, update_systems);
    }
}

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct DebugAvoiderSystem;

pub struct DebugAvoiderPlugin;

impl Plugin for DebugAvoiderPlugin {
    fn build(&self, app: &mut App) {
        let debug_systems = (debug_avoider, debug_movement).in_set(DebugAvoiderSystem);
        app.add_systems(Update, debug_systems);
    }
}
