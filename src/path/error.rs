use thiserror::Error;

///
/// All errors emitted from the path module.
/// Both are configuration problems, raised before any motion starts.
///
/// - `TooFewPoints`: When a path has fewer than two waypoints, so there is nothing to traverse
///     Parameters:
///     - `count`: The number of waypoints provided
/// - `MalformedJson`: When a JSON path description could not be parsed
///     Parameters:
///     - `reason`: The parser's explanation
///
#[derive(Error, Debug)]
pub enum PathError {
    #[error("A path needs at least 2 points to trace, but {} were provided.", .count)]
    TooFewPoints { count: usize },

    #[error("Could not parse the path description. {}", .reason)]
    MalformedJson { reason: String },
}
