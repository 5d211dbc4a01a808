//!
//! Canvas path representation and resolution-bounded densification
//!

pub mod error;

use error::PathError;
use serde::{Deserialize, Serialize};

///
/// A point on the canvas, expressed as a fraction of the canvas size.
/// Both coordinates are nominally in [0, 1], with (0, 0) at the canvas origin.
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    pub fn new(x: f64, y: f64) -> CanvasPoint {
        CanvasPoint { x, y }
    }
}

///
/// Parses a JSON array of canvas points, e.g. `[{"x":0.0,"y":0.0},{"x":1.0,"y":0.5}]`.
/// Used by hosts which receive paths over a socket or from a file.
///
/// # Parameters:
/// - `json`: The JSON document describing the waypoint list
///
/// # Returns:
/// - The parsed waypoint vector
/// - An error explaining why the document could not be parsed
///
pub fn path_from_json(json: &str) -> Result<Vec<CanvasPoint>, PathError> {
    serde_json::from_str(json).map_err(|err| PathError::MalformedJson { reason: err.to_string() })
}

///
/// Densifies a sparse waypoint path into sub-points whose physical spacing never
/// exceeds the configured resolution, and owns the cursor the control loop walks
/// along the result. The bound on spacing keeps target discontinuities small
/// enough that the proportional control law stays stable.
///
/// # Fields:
/// - `canvas_width`: The canvas width in millimetres, used to scale x displacements
/// - `canvas_height`: The canvas height in millimetres, used to scale y displacements
/// - `min_steps_per_mm`: The minimum number of sub-points per millimetre of travel
/// - `interpolated`: The densified point list of the currently loaded path
/// - `idx`: The cursor into `interpolated`, only ever moving forwards
///
pub struct PathInterpolator {
    canvas_width: f64,
    canvas_height: f64,
    min_steps_per_mm: f64,
    interpolated: Vec<CanvasPoint>,
    idx: usize,
}

impl PathInterpolator {
    /// The default densification resolution: at least one sub-point per millimetre.
    pub const DEFAULT_MIN_STEPS_PER_MM: f64 = 1.;

    ///
    /// Creates a new, empty interpolator.
    ///
    /// # Parameters:
    /// - `canvas_width`: The canvas width in millimetres
    /// - `canvas_height`: The canvas height in millimetres
    /// - `min_steps_per_mm`: The minimum number of sub-points per millimetre of travel
    ///
    /// # Returns:
    /// - A new `PathInterpolator` instance with no path loaded
    ///
    pub fn new(canvas_width: f64, canvas_height: f64, min_steps_per_mm: f64) -> PathInterpolator {
        PathInterpolator { canvas_width, canvas_height, min_steps_per_mm, interpolated: Vec::new(), idx: 0 }
    }

    ///
    /// Replaces any previously loaded path with the densified form of `path`.
    /// The first output point is the first input point; each following segment is
    /// split into `ceil(distance_mm * min_steps_per_mm)` evenly spaced points, so
    /// consecutive outputs are at most `1 / min_steps_per_mm` millimetres apart.
    /// Zero-length segments (repeated waypoints) contribute no points at all, so
    /// they can never divide by zero or emit NaN.
    ///
    /// # Parameters:
    /// - `path`: The sparse waypoint list, needs at least 2 points
    ///
    /// # Returns:
    /// - Void if the path was loaded
    /// - An error if the path is too short to trace
    ///
    pub fn load(&mut self, path: &[CanvasPoint]) -> Result<(), PathError> {
        if path.len() < 2 {
            return Err(PathError::TooFewPoints { count: path.len() });
        }

        self.interpolated = vec![path[0]];
        self.idx = 0;

        let mut previous = path[0];
        for p1 in &path[1..] {
            let dx = p1.x - previous.x;
            let dy = p1.y - previous.y;
            let distance = f64::sqrt(f64::powi(dx * self.canvas_width, 2) + f64::powi(dy * self.canvas_height, 2));

            if distance == 0. {
                continue;
            }

            let steps = f64::ceil(distance * self.min_steps_per_mm).max(1.) as usize;
            for j in 1..=steps {
                let t = j as f64 / steps as f64;
                self.interpolated.push(CanvasPoint::new(previous.x + dx * t, previous.y + dy * t));
            }

            previous = *p1;
        }

        Ok(())
    }

    ///
    /// # Returns:
    /// - The point under the cursor, or `None` if no path has been loaded
    ///
    pub fn current_point(&self) -> Option<CanvasPoint> {
        self.interpolated.get(self.idx).copied()
    }

    ///
    /// # Returns:
    /// - Whether a point exists beyond the cursor
    ///
    pub fn has_next(&self) -> bool {
        self.idx + 1 < self.interpolated.len()
    }

    ///
    /// Moves the cursor to the next interpolated point.
    /// Calling this with no next point is a no-op; the cursor stays on the final
    /// point rather than running off the end.
    ///
    pub fn advance(&mut self) {
        if self.has_next() {
            self.idx += 1;
        }
    }

    ///
    /// # Returns:
    /// - The full densified point list of the currently loaded path
    ///
    pub fn points(&self) -> &[CanvasPoint] {
        &self.interpolated
    }
}
