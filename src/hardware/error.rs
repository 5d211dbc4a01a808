use thiserror::Error;

///
/// Errors describing an invalid physical configuration.
/// These are raised before any motion starts, never mid-trace.
///
/// - `NonPositiveDimension`: When a physical dimension which must be positive is not
///     Parameters:
///     - `name`: The human-readable name of the dimension
///     - `value`: The rejected value
///
#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("The {} must be positive, but {} was provided.", .name, .value)]
    NonPositiveDimension { name: &'static str, value: f64 },
}

///
/// Errors surfaced by an `Actuator` implementation.
/// The core never retries these; they propagate straight up to the caller, which
/// decides whether to retry the whole trace.
///
/// - `ReadFailed`: When the motor encoders could not be read
/// - `WriteFailed`: When a velocity command could not be issued
///     Parameters:
///     - `reason`: Whatever detail the actuator layer can provide
///
#[derive(Error, Debug)]
pub enum ActuatorError {
    #[error("Failed to read the motor encoders. {}", .reason)]
    ReadFailed { reason: String },

    #[error("Failed to command motor velocity. {}", .reason)]
    WriteFailed { reason: String },
}
