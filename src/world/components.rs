//! Marker components for fixed world entities.
use bevy::prelude::*;

/// The directional light driven by the day cycle.
#[derive(Component, Debug)]
pub struct PrimarySun;

/// The single scene camera used for screen-space projections.
#[derive(Component, Debug)]
pub struct WorldCamera;
