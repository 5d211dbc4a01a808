//!
//! The dual-axis closed-loop tracking controller
//!

pub mod error;

use error::ControlError;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::hardware::math::canvas_to_angles;
use crate::hardware::{Actuator, AngleTarget, GeometryConfig};
use crate::path::{CanvasPoint, PathInterpolator};
use crate::tracking::PositionTracker;

///
/// Tunable constants of the tracking loop.
/// The defaults are the values the firmware ships with; both speed and threshold
/// must be tuned together so the error shrinks every tick, as the loop has no
/// formal convergence guarantee for arbitrary settings.
///
/// # Fields:
/// - `max_deg_per_s`: The speed the dominant axis is driven at, in degrees per second
/// - `arrival_threshold_deg`: The angular error below which a point counts as reached
/// - `min_steps_per_mm`: The densification resolution handed to the path interpolator
///
#[derive(getset::Getters, Debug, Clone, Serialize, Deserialize)]
#[get = "pub"]
pub struct ControlConfig {
    max_deg_per_s: f64,
    arrival_threshold_deg: f64,
    min_steps_per_mm: f64,
}

impl ControlConfig {
    ///
    /// # Parameters:
    /// - `max_deg_per_s`: The dominant-axis speed, in degrees per second
    /// - `arrival_threshold_deg`: The arrival threshold, in degrees
    /// - `min_steps_per_mm`: The path densification resolution
    ///
    /// # Returns:
    /// - A new `ControlConfig` instance
    ///
    pub fn new(max_deg_per_s: f64, arrival_threshold_deg: f64, min_steps_per_mm: f64) -> ControlConfig {
        ControlConfig { max_deg_per_s, arrival_threshold_deg, min_steps_per_mm }
    }
}

impl Default for ControlConfig {
    ///
    /// # Returns:
    /// - The stock configuration: 90% of the motor's 930 deg/s maximum, a 5 degree
    /// arrival threshold and one interpolation step per millimetre
    ///
    fn default() -> ControlConfig {
        ControlConfig {
            max_deg_per_s: 930. * 0.9,
            arrival_threshold_deg: 5.,
            min_steps_per_mm: PathInterpolator::DEFAULT_MIN_STEPS_PER_MM,
        }
    }
}

///
/// The lifecycle of a trace.
///
/// - `Idle`: No path loaded, no commands being issued
/// - `Tracking`: A path is loaded and each `step` issues a velocity command
/// - `Done`: The path is exhausted; the final command was (0, 0) on both axes
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Tracking,
    Done,
}

///
/// Splits the configured maximum speed between the two motors so both axes are
/// expected to zero their errors at the same time. The axis with the larger
/// absolute error (the dominant axis) runs at full speed, signed to match its
/// error; the other is scaled down by the ratio of the errors. This is a
/// coordinated-arrival heuristic, not a true path follower.
///
/// When the magnitudes are exactly equal the right axis is treated as dominant.
/// The commands come out the same either way, but the branch is fixed so the
/// behaviour stays deterministic.
///
/// # Parameters:
/// - `left_error_deg`: The left axis angular error; the dominant error must be non-zero
/// - `right_error_deg`: The right axis angular error
/// - `max_deg_per_s`: The speed to drive the dominant axis at
///
/// # Returns:
/// - The (left, right) velocity commands, in degrees per second
///
pub fn allocate_velocity(left_error_deg: f64, right_error_deg: f64, max_deg_per_s: f64) -> (f64, f64) {
    if left_error_deg.abs() > right_error_deg.abs() {
        (
            max_deg_per_s.copysign(left_error_deg),
            right_error_deg / left_error_deg.abs() * max_deg_per_s,
        )
    } else {
        (
            left_error_deg / right_error_deg.abs() * max_deg_per_s,
            max_deg_per_s.copysign(right_error_deg),
        )
    }
}

///
/// Orchestrates a full trace: loads paths into the interpolator, zeroes the
/// position tracker, and steers both motors toward the current interpolated
/// point until the path is exhausted.
///
/// The controller contains no timing of its own. `step` performs exactly one
/// poll-compute-command cycle, and the host calls it at whatever cadence it can
/// provide: a hardware timer, a simulation clock or a test harness.
///
/// # Fields:
/// - `actuator`: The motor layer commands and encoder reads go through
/// - `geometry`: The physical dimensions of the rig
/// - `config`: The tunable loop constants
/// - `interpolator`: The densified path and its cursor
/// - `tracker`: The trace-relative position source
/// - `origin_target`: The angles of canvas (0, 0); the baseline zeroes the encoders,
/// not the geometric origin, so every error is computed relative to this offset
/// - `state`: The current lifecycle state
///
pub struct MotionController<A: Actuator> {
    actuator: A,
    geometry: GeometryConfig,
    config: ControlConfig,
    interpolator: PathInterpolator,
    tracker: PositionTracker,
    origin_target: AngleTarget,
    state: ControllerState,
}

impl<A: Actuator> MotionController<A> {
    ///
    /// Creates an idle controller for the given rig.
    ///
    /// # Parameters:
    /// - `actuator`: The motor layer to drive
    /// - `geometry`: The physical dimensions of the rig
    /// - `config`: The tunable loop constants
    ///
    /// # Returns:
    /// - A new `MotionController` in the `Idle` state
    ///
    pub fn new(actuator: A, geometry: GeometryConfig, config: ControlConfig) -> MotionController<A> {
        let interpolator = PathInterpolator::new(
            *geometry.canvas_width(),
            *geometry.canvas_height(),
            *config.min_steps_per_mm(),
        );
        let origin_target = canvas_to_angles(CanvasPoint::new(0., 0.), &geometry);

        MotionController {
            actuator,
            geometry,
            config,
            interpolator,
            tracker: PositionTracker::new(),
            origin_target,
            state: ControllerState::Idle,
        }
    }

    ///
    /// # Returns:
    /// - The current lifecycle state
    ///
    pub fn state(&self) -> ControllerState {
        self.state
    }

    ///
    /// # Returns:
    /// - A reference to the wrapped actuator
    ///
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    ///
    /// Starts a new trace: densifies the path, captures the encoder baseline and
    /// enters `Tracking`. The pen is assumed to be at canvas (0, 0) when this is
    /// called. No motion happens until `step` is called.
    ///
    /// # Parameters:
    /// - `path`: The sparse waypoint list, needs at least 2 points
    ///
    /// # Returns:
    /// - Void if the trace was started
    /// - An error if a trace is already running, the path is too short, or the
    /// baseline read failed
    ///
    pub fn begin(&mut self, path: &[CanvasPoint]) -> Result<(), ControlError> {
        if self.state == ControllerState::Tracking {
            return Err(ControlError::TraceInProgress);
        }

        self.interpolator.load(path)?;
        self.tracker.reset_baseline(&mut self.actuator)?;
        self.state = ControllerState::Tracking;

        info!("Started trace: {} waypoints, {} interpolated points", path.len(), self.interpolator.points().len());

        Ok(())
    }

    ///
    /// Performs one poll-compute-command cycle. In `Idle` or `Done` this does
    /// nothing and returns the state unchanged.
    ///
    /// While tracking: read the trace-relative position once, then advance
    /// through every interpolated point already within the arrival threshold.
    /// That inner loop is bounded by the path length, as each pass but the last
    /// consumes one point. If the path is exhausted, command (0, 0) and finish;
    /// otherwise allocate and issue one velocity command toward the current
    /// target.
    ///
    /// # Returns:
    /// - The state after this cycle
    /// - An actuator failure, propagated without retry
    ///
    pub fn step(&mut self) -> Result<ControllerState, ControlError> {
        if self.state != ControllerState::Tracking {
            return Ok(self.state);
        }

        let (left_pos, right_pos) = self.tracker.relative_position(&mut self.actuator)?;

        loop {
            let point = self.interpolator.current_point().ok_or(ControlError::NoActivePath)?;
            let target = canvas_to_angles(point, &self.geometry);

            let left_error = target.left_deg - (left_pos + self.origin_target.left_deg);
            let right_error = target.right_deg - (right_pos + self.origin_target.right_deg);

            if f64::min(left_error.abs(), right_error.abs()) < *self.config.arrival_threshold_deg() {
                if self.interpolator.has_next() {
                    self.interpolator.advance();
                    debug!("Point reached, advancing");
                    continue;
                }

                self.actuator.set_velocity(0., 0.)?;
                self.state = ControllerState::Done;
                info!("Trace complete");
                return Ok(self.state);
            }

            let (left_cmd, right_cmd) = allocate_velocity(left_error, right_error, *self.config.max_deg_per_s());
            self.actuator.set_velocity(left_cmd, right_cmd)?;

            return Ok(self.state);
        }
    }

    ///
    /// Runs a whole trace to completion: `begin` followed by `step` until the
    /// controller leaves `Tracking`. Only suitable for hosts that need no pacing
    /// between cycles, such as a simulation; on real hardware, call `step` from a
    /// timer instead.
    ///
    /// # Parameters:
    /// - `path`: The sparse waypoint list, needs at least 2 points
    ///
    /// # Returns:
    /// - Void once the trace reached `Done`
    /// - The first error encountered, with no retry
    ///
    pub fn draw(&mut self, path: &[CanvasPoint]) -> Result<(), ControlError> {
        self.begin(path)?;

        while self.step()? == ControllerState::Tracking {}

        Ok(())
    }

    ///
    /// Aborts whatever the controller is doing and commands (0, 0) on both axes.
    /// This is the cancellation point between cycles; a host interrupting a trace
    /// must call it so the motors never keep their last velocity.
    ///
    /// # Returns:
    /// - Void once the stop command was issued and the controller is `Idle`
    /// - The actuator's write failure, unchanged
    ///
    pub fn stop(&mut self) -> Result<(), ControlError> {
        self.actuator.set_velocity(0., 0.)?;
        self.state = ControllerState::Idle;

        Ok(())
    }
}

///
/// Tests relating to velocity allocation and the trace state machine.
///
#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::error::ActuatorError;
    use crate::preview::rig::VirtualRig;

    /// The firmware's rig dimensions.
    fn rig_geometry() -> GeometryConfig {
        GeometryConfig::new(790., 290., 640., 270., 400., -40.).unwrap()
    }

    #[test]
    fn dominant_left_gets_full_speed() {
        let (left, right) = allocate_velocity(-100., 40., 800.);

        assert_eq!(left, -800.);
        assert!((right - 320.).abs() < 1e-9);
    }

    #[test]
    fn dominant_right_gets_full_speed() {
        let (left, right) = allocate_velocity(30., -60., 800.);

        assert!((left - 400.).abs() < 1e-9);
        assert_eq!(right, -800.);
    }

    #[test]
    fn equal_magnitude_tie_break_is_deterministic() {
        let first = allocate_velocity(50., -50., 800.);
        for _ in 0..10 {
            assert_eq!(allocate_velocity(50., -50., 800.), first);
        }

        // right treated as dominant, so it carries the exact signed maximum
        assert_eq!(first.1, -800.);
        assert!((first.0 - 800.).abs() < 1e-9);
    }

    #[test]
    fn step_outside_tracking_is_a_noop() {
        let geometry = rig_geometry();
        let mut controller = MotionController::new(VirtualRig::new(0.005), geometry, ControlConfig::default());

        assert_eq!(controller.step().unwrap(), ControllerState::Idle);
        assert!(controller.actuator().command_log().is_empty());
    }

    #[test]
    fn short_path_rejected_before_motion() {
        let geometry = rig_geometry();
        let mut controller = MotionController::new(VirtualRig::new(0.005), geometry, ControlConfig::default());

        assert!(controller.draw(&[CanvasPoint::new(0.5, 0.5)]).is_err());
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(controller.actuator().command_log().is_empty());
    }

    #[test]
    fn begin_while_tracking_rejected() {
        let geometry = rig_geometry();
        let mut controller = MotionController::new(VirtualRig::new(0.005), geometry, ControlConfig::default());
        let path = [CanvasPoint::new(0., 0.), CanvasPoint::new(0.1, 0.)];

        controller.begin(&path).unwrap();
        assert!(matches!(controller.begin(&path), Err(ControlError::TraceInProgress)));
    }

    #[test]
    fn stop_zeroes_velocity_and_returns_to_idle() {
        let geometry = rig_geometry();
        let mut controller = MotionController::new(VirtualRig::new(0.005), geometry, ControlConfig::default());

        controller.begin(&[CanvasPoint::new(0., 0.), CanvasPoint::new(0.5, 0.5)]).unwrap();
        controller.step().unwrap();
        controller.stop().unwrap();

        assert_eq!(controller.state(), ControllerState::Idle);
        assert_eq!(controller.actuator().last_command(), Some((0., 0.)));
    }

    #[test]
    fn short_trace_reaches_done_with_final_zero_command() {
        let geometry = rig_geometry();
        // 4.185 degrees of travel per 5ms tick keeps each cycle under the threshold
        let mut controller = MotionController::new(VirtualRig::new(0.005), geometry, ControlConfig::default());

        controller.draw(&[CanvasPoint::new(0., 0.), CanvasPoint::new(0.05, 0.)]).unwrap();

        assert_eq!(controller.state(), ControllerState::Done);
        assert_eq!(controller.actuator().last_command(), Some((0., 0.)));
    }

    #[test]
    fn full_canvas_trace_terminates_within_bound() {
        let geometry = rig_geometry();
        let mut controller = MotionController::new(VirtualRig::new(0.005), geometry, ControlConfig::default());
        let path = [
            CanvasPoint::new(0., 0.),
            CanvasPoint::new(1., 0.),
            CanvasPoint::new(0., 1.),
            CanvasPoint::new(1., 1.),
            CanvasPoint::new(0., 0.),
        ];

        controller.begin(&path).unwrap();

        let mut reached_done = false;
        for _ in 0..200_000 {
            if controller.step().unwrap() == ControllerState::Done {
                reached_done = true;
                break;
            }
        }

        assert!(reached_done, "trace did not terminate within the iteration bound");
        assert_eq!(controller.actuator().last_command(), Some((0., 0.)));
    }

    #[test]
    fn dominant_axis_runs_at_configured_speed() {
        let geometry = rig_geometry();
        let mut controller = MotionController::new(VirtualRig::new(0.005), geometry, ControlConfig::default());

        controller.begin(&[CanvasPoint::new(0., 0.), CanvasPoint::new(1., 1.)]).unwrap();
        controller.step().unwrap();

        let (left_cmd, right_cmd) = controller.actuator().last_command().unwrap();
        let max = 930. * 0.9;
        assert!((left_cmd.abs() - max).abs() < 1e-9 || (right_cmd.abs() - max).abs() < 1e-9);
        assert!(left_cmd.abs() <= max + 1e-9 && right_cmd.abs() <= max + 1e-9);
    }

    /// An actuator whose encoders fail on every read.
    struct BrokenEncoders {
        commands: Vec<(f64, f64)>,
    }

    impl Actuator for BrokenEncoders {
        fn read_position(&mut self) -> Result<(f64, f64), ActuatorError> {
            Err(ActuatorError::ReadFailed { reason: "bus timeout".to_owned() })
        }

        fn set_velocity(&mut self, left_deg_per_s: f64, right_deg_per_s: f64) -> Result<(), ActuatorError> {
            self.commands.push((left_deg_per_s, right_deg_per_s));
            Ok(())
        }
    }

    #[test]
    fn read_failure_propagates_through_draw() {
        let geometry = rig_geometry();
        let actuator = BrokenEncoders { commands: Vec::new() };
        let mut controller = MotionController::new(actuator, geometry, ControlConfig::default());

        let result = controller.draw(&[CanvasPoint::new(0., 0.), CanvasPoint::new(0.5, 0.)]);
        assert!(matches!(result, Err(ControlError::Actuator(_))));

        // failed before any motion, so nothing was ever commanded
        assert!(controller.actuator().commands.is_empty());
    }

    #[test]
    fn trace_can_be_rerun_after_done() {
        let geometry = rig_geometry();
        let mut controller = MotionController::new(VirtualRig::new(0.005), geometry, ControlConfig::default());
        let path = [CanvasPoint::new(0., 0.), CanvasPoint::new(0.02, 0.)];

        controller.draw(&path).unwrap();
        assert_eq!(controller.state(), ControllerState::Done);

        controller.draw(&path).unwrap();
        assert_eq!(controller.state(), ControllerState::Done);
        assert_eq!(controller.actuator().last_command(), Some((0., 0.)));
    }
}
