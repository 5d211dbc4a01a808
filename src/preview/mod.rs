//!
//! Simulated hardware for previewing and testing traces
//!

pub mod rig;
