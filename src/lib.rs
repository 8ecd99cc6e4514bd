//! Junction Traffic Simulation Library
//!
//! A fixed-timestep simulation of a four-lane junction that runs headless.
//! Rendering, UI binding and the platform timing source live outside this
//! crate; a driver only needs to call `SimWorld::step` with a fixed delta.

pub mod simulation;
pub mod storage;
