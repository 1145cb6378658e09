use thiserror::Error;

/// Everything that can go wrong while building or rendering a scene.
///
/// Misses and unoccluded shadow rays are not errors; those are reported as
/// `None` by the geometry and tracing functions.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("coordinates must be finite, got ({x}, {y}, {z})")]
    NonFiniteCoordinate { x: f64, y: f64, z: f64 },

    #[error("color values must be in the range [0, 1], got ({r}, {g}, {b})")]
    ColorOutOfRange { r: f64, g: f64, b: f64 },

    #[error("{name} coefficient must be in the range [0, 1], got {value}")]
    CoefficientOutOfRange { name: &'static str, value: f64 },

    #[error("light intensity must be in the range [0, 1], got ({r}, {g}, {b})")]
    IntensityOutOfRange { r: f64, g: f64, b: f64 },

    #[error("sphere radius must be finite and positive, got {0}")]
    InvalidRadius(f64),

    #[error("{0} must be a non-zero vector")]
    DegenerateVector(&'static str),

    #[error("camera look direction is zero or parallel to the up vector")]
    DegenerateCamera,

    #[error("image dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("field of view must be within (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f64),

    #[error("maximum bounces must be >= 0, got {0}")]
    NegativeBounces(i32),

    #[error("unknown surface: {0}")]
    UnknownSurface(String),

    #[error("thread count must be at least 1")]
    InvalidThreadCount,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, TraceError>;
