//!
//! Core library for driving a two-motor string plotter.
//!
//! A pen carriage hangs from two ropes wound onto independently driven
//! motors. This crate converts normalized canvas coordinates into
//! rope-angle targets, densifies sparse waypoint paths so no step exceeds
//! the configured resolution, and runs the closed feedback loop which
//! steers both motors until a path has been fully traced.
//!
//! The physical motor layer (encoder reads, velocity commands) sits behind
//! the [`hardware::Actuator`] trait, so the same control loop runs against
//! real hardware or the simulated rig in [`preview`].
//!

pub mod controller;
pub mod hardware;
pub mod path;
pub mod preview;
pub mod tracking;
