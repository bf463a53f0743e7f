//! Scene graph construction and id-keyed object bookkeeping.
//!
//! Objects are described declaratively as [`objects::SceneObject`] trees and
//! spawned as entity hierarchies. Every named node is tracked by the
//! [`registry::ObjectRegistry`]; inserts and moves issued before the viewer is
//! ready wait in the [`buffer::SceneBuffer`].

/// Declarative scene object descriptors and their entity spawning.
pub mod objects;

/// Stable string id to entity/material lookup.
pub mod registry;

/// Deferred inserts and moves held until the viewer becomes ready.
pub mod buffer;

/// Floor grid line mesh in the positive domain quadrant.
pub mod grid;

/// RGB axes helper at the render origin.
pub mod axes;

/// Ambient light and background colour.
pub mod lighting;

/// Background floor-plan image loaded asynchronously.
pub mod map_image;

use bevy::prelude::*;

/// Marks entities spawned by the viewer so teardown can despawn them.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct ViewerOwned;
