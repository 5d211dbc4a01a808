//!
//! Physical rig representations and the actuator seam
//!

pub mod error;
pub mod math;

use error::{ActuatorError, GeometryError};

///
/// A simple container for the physical dimensions of the plotter rig.
/// All distances are measured in millimetres.
/// All fields have an associated getter function.
///
/// # Fields:
/// - `anchor_interspace`: The horizontal distance between the two rope anchors
/// - `canvas_horizontal_offset`: The horizontal distance between the left anchor and canvas (0, 0)
/// - `canvas_vertical_offset`: The vertical distance between the left anchor and canvas (0, 0)
/// - `canvas_width`: The width of the canvas
/// - `canvas_height`: The height of the canvas
/// - `degree_per_mm`: Motor shaft degrees per millimetre of rope paid out. The sign fixes
/// the winding direction, so negative values are valid
///
#[derive(getset::Getters, Debug, Clone)]
#[get = "pub"]
pub struct GeometryConfig {
    anchor_interspace: f64,
    canvas_horizontal_offset: f64,
    canvas_vertical_offset: f64,
    canvas_width: f64,
    canvas_height: f64,
    degree_per_mm: f64,
}

impl GeometryConfig {
    ///
    /// A function to create a new GeometryConfig object, checking the physical invariants
    /// hold. Ideally, this is constructed once and kept for the lifetime of the rig.
    ///
    /// # Parameters:
    /// - `anchor_interspace`: The horizontal distance between the rope anchors, must be positive
    /// - `canvas_horizontal_offset`: Horizontal distance from the left anchor to canvas (0, 0)
    /// - `canvas_vertical_offset`: Vertical distance from the left anchor to canvas (0, 0)
    /// - `canvas_width`: The canvas width, must be positive
    /// - `canvas_height`: The canvas height, must be positive
    /// - `degree_per_mm`: Shaft degrees per millimetre of rope, any sign
    ///
    /// # Returns:
    /// - A new `GeometryConfig` instance
    /// - An error explaining which dimension was not positive
    ///
    pub fn new(anchor_interspace: f64, canvas_horizontal_offset: f64, canvas_vertical_offset: f64, canvas_width: f64, canvas_height: f64, degree_per_mm: f64) -> Result<GeometryConfig, GeometryError> {
        if !(anchor_interspace > 0.) {
            return Err(GeometryError::NonPositiveDimension { name: "anchor interspace", value: anchor_interspace });
        }
        if !(canvas_width > 0.) {
            return Err(GeometryError::NonPositiveDimension { name: "canvas width", value: canvas_width });
        }
        if !(canvas_height > 0.) {
            return Err(GeometryError::NonPositiveDimension { name: "canvas height", value: canvas_height });
        }

        Ok(GeometryConfig { anchor_interspace, canvas_horizontal_offset, canvas_vertical_offset, canvas_width, canvas_height, degree_per_mm })
    }
}

///
/// A pair of absolute rope-angle targets, in degrees relative to fully retracted
/// ropes. Derived purely from a canvas point and the rig geometry.
///
/// # Fields:
/// - `left_deg`: The target shaft angle of the left motor
/// - `right_deg`: The target shaft angle of the right motor
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleTarget {
    pub left_deg: f64,
    pub right_deg: f64,
}

///
/// The seam between the control loop and the physical motors. A firmware layer
/// implements this against real encoder and power hardware; `preview::rig::VirtualRig`
/// implements it as a software plant.
///
/// # Functions:
/// - `read_position`: Should return the accumulated (left, right) shaft angles in degrees.
/// The values are raw, can be negative, and carry no trace-relative meaning
/// - `set_velocity`: Should command an instantaneous target angular velocity per axis,
/// in degrees per second. Either sign is valid
///
/// Both functions may fail transiently. Implementations must surface the failure
/// rather than retry it, as recovery policy on a moving machine belongs to the caller.
///
pub trait Actuator {
    fn read_position(&mut self) -> Result<(f64, f64), ActuatorError>;
    fn set_velocity(&mut self, left_deg_per_s: f64, right_deg_per_s: f64) -> Result<(), ActuatorError>;
}

///
/// Tests relating to geometry validation.
///
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_geometry() {
        assert!(GeometryConfig::new(790., 290., 640., 270., 400., -40.).is_ok());
    }

    #[test]
    fn zero_anchor_interspace_rejected() {
        assert!(GeometryConfig::new(0., 290., 640., 270., 400., -40.).is_err());
    }

    #[test]
    fn negative_canvas_width_rejected() {
        assert!(GeometryConfig::new(790., 290., 640., -270., 400., -40.).is_err());
    }

    #[test]
    fn nan_canvas_height_rejected() {
        assert!(GeometryConfig::new(790., 290., 640., 270., f64::NAN, -40.).is_err());
    }
}
