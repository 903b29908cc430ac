//! Stagehand Core -- the object registry and selection service behind the
//! interactive scene demo.
//!
//! This crate is engine-agnostic: it never spawns, renders, or destroys
//! anything itself. The engine side implements the [`host::SceneHost`]
//! capability trait (liveness checks, display names, color/scale
//! application, destruction, spawning) and hands it to each call; the
//! service keeps the bookkeeping honest even when scene objects die without
//! telling anyone.
//!
//! # Operation pipeline
//!
//! Every selecting/mutating operation on [`service::ObjectManager`] runs the
//! same three phases:
//!
//! 1. **Sweep** -- drop records whose handles the host reports dead, and
//!    clear (with notification) a selection that died with them.
//! 2. **Act** -- apply the requested change to the store, the selection, or
//!    the selected object via a host capability.
//! 3. **Notify** -- deliver "list changed" / "selection changed" to
//!    observers, synchronously and in subscription order, always describing
//!    the post-change state.
//!
//! Failures (unknown id, nothing selected) are reported as `false` returns
//! and never raised; observers are isolated so one panicking callback cannot
//! starve the rest or corrupt registry state.
//!
//! # Key Types
//!
//! - [`service::ObjectManager`] -- the orchestrator; register/unregister,
//!   list, select, mutate-selected, delete-selected, spawn.
//! - [`host::SceneHost`] -- capability trait the engine implements;
//!   [`host::SpawnRequest`] describes what to create.
//! - [`registry::ObjectStore`] -- insertion-ordered records with monotonic,
//!   never-reused ids; [`registry::ListItem`] is the UI-facing snapshot row.
//! - [`selection::SelectionTracker`] -- the single current selection.
//! - [`notify::ChangeNotifier`] -- subscription-ordered observer fan-out.
//! - [`settings::ObjectDefaults`] -- injected spawn defaults, validated
//!   before use.

pub mod color;
pub mod host;
pub mod id;
pub mod notify;
pub mod registry;
pub mod rng;
pub mod selection;
pub mod service;
pub mod settings;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
