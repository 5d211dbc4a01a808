use thiserror::Error;

use crate::hardware::error::ActuatorError;
use crate::path::error::PathError;

///
/// All errors emitted from the motion controller.
///
/// - `TraceInProgress`: When a new trace is started while one is already tracking
/// - `NoActivePath`: When the tracking state holds no current point; only reachable
/// if the controller's internal invariants are broken
/// - `Path`: A path problem, raised before any motion starts
/// - `Actuator`: A transient hardware failure, propagated without retry
///
#[derive(Error, Debug)]
pub enum ControlError {
    #[error("A trace is already in progress. Stop it before starting another.")]
    TraceInProgress,

    #[error("The controller is tracking but has no current path point.")]
    NoActivePath,

    #[error("Invalid path. {}", .0)]
    Path(#[from] PathError),

    #[error("Actuator failure. {}", .0)]
    Actuator(#[from] ActuatorError),
}
