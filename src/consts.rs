// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Offset applied to secondary ray origins so they don't hit the surface they
// leave from.
pub const TINY: f64 = 0.001;

// Maximum reflection depth
pub const MAX_BOUNCES: i32 = 16;

// Default canvas
pub const DEFAULT_WIDTH: usize = 860;
pub const DEFAULT_HEIGHT: usize = 640;

// Default view, field of view in degrees
pub const DEFAULT_FOV: f64 = 50.0;
pub const DEFAULT_EYE: (f64, f64, f64) = (0.0, 0.0, 10.0);
pub const DEFAULT_LOOK_AT: (f64, f64, f64) = (0.0, 0.0, 0.0);
pub const DEFAULT_UP: (f64, f64, f64) = (0.0, 1.0, 0.0);

pub const DEFAULT_SURFACE: &str = "matte black";
pub const OUT_FILE: &str = "out.png";
