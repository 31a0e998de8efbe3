//! Shape canvas editor for the shape-builder game.
//!
//! The editor owns the full lifecycle of a construction: translating pointer
//! and palette events into shape mutations, keeping every shape on the canvas,
//! recording undo history, and handing the finished arrangement to the
//! external task backend for validation. The host page renders shapes and
//! wires DOM events; it talks to this crate through [`editor::Editor`] and
//! [`session::Session`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`editor`] | Top-level editor: applies input effects, commits history, emits actions |
//! | [`input`] | Input events and the interaction state machine |
//! | [`registry`] | Ordered shape collection, selection, clamped mutation |
//! | [`history`] | Bounded snapshot stack for undo |
//! | [`shape`] | Shape kinds, dimensions, colors, sparse updates |
//! | [`geometry`] | Points, canvas bounds, rotated extents |
//! | [`gateway`] | Task backend boundary: wire types, HTTP client, outcomes |
//! | [`session`] | Task lifecycle and submission guard |
//! | [`config`] | Typed configuration from the environment |
//! | [`consts`] | Shared defaults (sizes, history depth, timeouts) |
//! | [`error`] | Error-code trait shared by error enums |

pub mod config;
pub mod consts;
pub mod editor;
pub mod error;
pub mod gateway;
pub mod geometry;
pub mod history;
pub mod input;
pub mod registry;
pub mod session;
pub mod shape;
