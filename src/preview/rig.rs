use crate::hardware::Actuator;
use crate::hardware::error::ActuatorError;

///
/// A software model of the two-motor rig. Each time the encoders are read, the
/// most recent velocity command is integrated over one fixed control tick, so a
/// control loop polling the rig sees the effect of its previous command exactly
/// as a real plant with an ideal velocity controller would.
///
/// Every command issued is also kept in an ordered log, which previews and tests
/// use to inspect what the control loop actually sent.
///
/// # Fields:
/// - `left_deg`: The simulated left shaft angle, in degrees
/// - `right_deg`: The simulated right shaft angle, in degrees
/// - `tick_seconds`: The simulated time between consecutive encoder reads
/// - `commanded`: The most recently commanded (left, right) velocities
/// - `command_log`: Every velocity command issued, in order
///
pub struct VirtualRig {
    left_deg: f64,
    right_deg: f64,
    tick_seconds: f64,
    commanded: (f64, f64),
    command_log: Vec<(f64, f64)>,
}

impl VirtualRig {
    ///
    /// Creates a rig at rest with both shafts at zero degrees.
    ///
    /// # Parameters:
    /// - `tick_seconds`: The simulated time between consecutive encoder reads
    ///
    /// # Returns:
    /// - A new `VirtualRig` instance
    ///
    pub fn new(tick_seconds: f64) -> VirtualRig {
        VirtualRig {
            left_deg: 0.,
            right_deg: 0.,
            tick_seconds,
            commanded: (0., 0.),
            command_log: Vec::new(),
        }
    }

    ///
    /// # Returns:
    /// - The current simulated (left, right) shaft angles, in degrees
    ///
    pub fn position(&self) -> (f64, f64) {
        (self.left_deg, self.right_deg)
    }

    ///
    /// # Returns:
    /// - Every velocity command issued so far, oldest first
    ///
    pub fn command_log(&self) -> &[(f64, f64)] {
        &self.command_log
    }

    ///
    /// # Returns:
    /// - The most recent velocity command, or `None` if nothing was commanded yet
    ///
    pub fn last_command(&self) -> Option<(f64, f64)> {
        self.command_log.last().copied()
    }
}

impl Actuator for VirtualRig {
    ///
    /// Advances the plant by one tick under the pending command, then reports the
    /// accumulated shaft angles.
    ///
    fn read_position(&mut self) -> Result<(f64, f64), ActuatorError> {
        self.left_deg += self.commanded.0 * self.tick_seconds;
        self.right_deg += self.commanded.1 * self.tick_seconds;

        Ok((self.left_deg, self.right_deg))
    }

    fn set_velocity(&mut self, left_deg_per_s: f64, right_deg_per_s: f64) -> Result<(), ActuatorError> {
        self.commanded = (left_deg_per_s, right_deg_per_s);
        self.command_log.push((left_deg_per_s, right_deg_per_s));

        Ok(())
    }
}
