//!
//! Trace-relative motor position tracking
//!

use crate::hardware::Actuator;
use crate::hardware::error::ActuatorError;

///
/// The raw encoder readings captured at the moment a trace begins. Subtracting
/// them from later readings yields positions relative to the trace start instead
/// of whatever the encoders happened to accumulate beforehand.
///
#[derive(Debug, Clone, Copy, Default)]
struct MotorBaseline {
    start_left: f64,
    start_right: f64,
}

///
/// Wraps the raw encoder feeds and exposes positions relative to the start of
/// the current trace. The baseline defaults to zero, so `reset_baseline` must be
/// called once at trace start for the relative readings to be meaningful.
///
pub struct PositionTracker {
    baseline: MotorBaseline,
}

impl PositionTracker {
    ///
    /// # Returns:
    /// - A new `PositionTracker` with a zero baseline
    ///
    pub fn new() -> PositionTracker {
        PositionTracker { baseline: MotorBaseline::default() }
    }

    ///
    /// Captures the current raw encoder readings as the new baseline.
    /// Called exactly once per trace, before tracking starts.
    ///
    /// # Parameters:
    /// - `actuator`: The actuator to read the encoders through
    ///
    /// # Returns:
    /// - Void if the baseline was captured
    /// - The actuator's read failure, unchanged
    ///
    pub fn reset_baseline<A: Actuator>(&mut self, actuator: &mut A) -> Result<(), ActuatorError> {
        let (left, right) = actuator.read_position()?;
        self.baseline = MotorBaseline { start_left: left, start_right: right };

        Ok(())
    }

    ///
    /// Polls the encoders and returns each axis relative to the baseline, in the
    /// same degree units the actuator reports. Read failures propagate unchanged;
    /// there is no retry here.
    ///
    /// # Parameters:
    /// - `actuator`: The actuator to read the encoders through
    ///
    /// # Returns:
    /// - The (left, right) positions in degrees, relative to the trace start
    /// - The actuator's read failure, unchanged
    ///
    pub fn relative_position<A: Actuator>(&self, actuator: &mut A) -> Result<(f64, f64), ActuatorError> {
        let (left, right) = actuator.read_position()?;

        Ok((left - self.baseline.start_left, right - self.baseline.start_right))
    }
}

impl Default for PositionTracker {
    fn default() -> PositionTracker {
        PositionTracker::new()
    }
}
