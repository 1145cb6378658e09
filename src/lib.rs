pub mod consts;
pub mod error;

pub mod tuple;
pub mod color;
pub mod surface;
pub mod light;

pub mod geometry;
pub mod ray;
pub mod intersect;

pub mod camera;
pub mod scene;
pub mod renderer;

pub mod canvas;
pub mod parallel;

pub mod description;
pub mod tracer;

use crate::consts::FEQ_EPSILON;

pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
