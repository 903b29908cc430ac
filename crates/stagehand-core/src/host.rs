//! The capability boundary between the registry and the engine.
//!
//! The registry never touches scene objects directly. It holds opaque
//! handles and asks the host to answer liveness, report names, apply visual
//! changes, destroy, and spawn. A generation-counted index (a Bevy `Entity`,
//! a slotmap key) is the intended handle shape: dead handles stay dead and
//! are never resurrected by slot reuse.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Smallest uniform scale a host will apply. Requests below this (including
/// zero and negatives) are clamped up by the host.
pub const MIN_UNIFORM_SCALE: f32 = 0.01;

/// A concrete primitive the host knows how to instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveShape {
    Cube,
    Sphere,
}

/// Everything a host needs to create one interactive object. Placement is
/// the host's choice (the demo drops objects in front of the camera).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub shape: PrimitiveShape,
    pub color: Rgba,
    pub scale: f32,
}

/// Capabilities the registry consumes from the engine side.
///
/// Contracts:
/// - `is_alive` must be cheap; the registry calls it for every record at the
///   start of most operations.
/// - A handle that was reported dead must never read as alive again.
/// - `apply_scale` clamps to [`MIN_UNIFORM_SCALE`] before applying.
/// - `request_destroy` may complete asynchronously (deferred despawn); the
///   registry has already forgotten the record when it calls this.
/// - `spawn_primitive` returns `None` to decline. The created object is
///   expected to register itself through the host's normal lifecycle path,
///   not inside this call.
pub trait SceneHost {
    type Handle: Copy + Eq + fmt::Debug;

    /// Does this handle still refer to a live scene object?
    fn is_alive(&self, handle: Self::Handle) -> bool;

    /// The object's display name, if it has one. `None` (or an empty name)
    /// makes the registry substitute an id-based label.
    fn display_name(&self, handle: Self::Handle) -> Option<String>;

    /// Set the object's visual color.
    fn apply_color(&mut self, handle: Self::Handle, color: Rgba);

    /// Set the object's uniform scale, clamped to [`MIN_UNIFORM_SCALE`].
    fn apply_scale(&mut self, handle: Self::Handle, scale: f32);

    /// Ask the engine to destroy the object behind `handle`.
    fn request_destroy(&mut self, handle: Self::Handle);

    /// Create a primitive with the requested look, or decline with `None`.
    fn spawn_primitive(&mut self, request: &SpawnRequest) -> Option<Self::Handle>;
}
