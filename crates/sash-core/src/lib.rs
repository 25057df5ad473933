#![forbid(unsafe_code)]

//! Core: geometry and pointer events for the sash layout engine.
//!
//! # Role
//! `sash-core` holds the host-agnostic primitives that `sash-layout` solves
//! against. It owns no layout state itself.
//!
//! # Primary responsibilities
//! - **Geometry**: pixel rectangles, points, and margins.
//! - **Event**: pointer events as delivered by the host composite.
//! - **Cursor**: the pointer shapes the layout asks the host to show.

pub mod event;
pub mod geometry;
