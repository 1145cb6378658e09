use crate::consts::{ DEFAULT_EYE, DEFAULT_FOV, DEFAULT_LOOK_AT, DEFAULT_UP };
use crate::tuple::{ Point3D, Vector3D };
use crate::error::{ Result, TraceError };

/// The view basis derived from the camera parameters.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct Basis {
    horizontal: Vector3D,
    vertical: Vector3D,
    top_left: Vector3D,
}

impl Basis {
    /// Computes the basis which maps pixel `(i, j)` to a ray direction.
    ///
    /// The vertical axis is derived from `look × horizontal` rather than from
    /// `up`, so an `up` which isn't perpendicular to the view still yields an
    /// orthogonal basis.
    fn compute(eye: Point3D, look_at: Point3D, up: Vector3D, width: usize,
        height: usize, fov: f64) -> Result<Basis> {
        eye.finite()?;
        look_at.finite()?;
        up.finite()?;

        if width == 0 || height == 0 {
            return Err(TraceError::InvalidDimensions { width, height });
        }

        if !(fov > 0.0 && fov < 180.0) {
            return Err(TraceError::InvalidFieldOfView(fov));
        }

        let look = look_at - eye;
        let side = look.cross(&up);
        if look.is_zero() || side.is_zero() {
            return Err(TraceError::DegenerateCamera);
        }

        let horizontal = side.normalize();
        let vertical = look.cross(&horizontal).normalize();

        let (w, h) = (width as f64, height as f64);
        let focal_length = w / (2.0 * (0.5 * fov).to_radians().tan());
        let top_left = look.normalize() * focal_length
            - (horizontal * w + vertical * h) * 0.5;

        Ok(Basis { horizontal, vertical, top_left })
    }
}

/// A pinhole camera.
///
/// Holds the viewing parameters and a cached basis which is recomputed each
/// time a parameter changes. Setters validate the new parameters first and
/// leave the camera untouched if they would produce a degenerate view.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    eye: Point3D,
    look_at: Point3D,
    up: Vector3D,
    width: usize,
    height: usize,

    /// Full horizontal field of view, in degrees.
    fov: f64,

    basis: Basis,
}

fn tuple_point((x, y, z): (f64, f64, f64)) -> Point3D {
    Point3D { x, y, z }
}

impl Camera {
    /// Creates a camera with the default view: at `(0, 0, 10)`, looking at the
    /// origin with `+y` up and a 50 degree field of view.
    pub fn new(width: usize, height: usize) -> Result<Camera> {
        let up = tuple_point(DEFAULT_UP).into();

        Camera::looking_at(tuple_point(DEFAULT_EYE), tuple_point(DEFAULT_LOOK_AT),
            up, width, height, DEFAULT_FOV)
    }

    pub fn looking_at(eye: Point3D, look_at: Point3D, up: Vector3D,
        width: usize, height: usize, fov: f64) -> Result<Camera> {
        let basis = Basis::compute(eye, look_at, up, width, height, fov)?;

        Ok(Camera { eye, look_at, up, width, height, fov, basis })
    }

    pub fn eye(&self) -> Point3D {
        self.eye
    }

    pub fn look_at(&self) -> Point3D {
        self.look_at
    }

    pub fn up(&self) -> Vector3D {
        self.up
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn fov(&self) -> f64 {
        self.fov
    }

    pub fn set_eye(&mut self, eye: Point3D) -> Result<()> {
        self.update(Camera { eye, ..self.clone() })
    }

    pub fn set_look_at(&mut self, look_at: Point3D) -> Result<()> {
        self.update(Camera { look_at, ..self.clone() })
    }

    pub fn set_up(&mut self, up: Vector3D) -> Result<()> {
        self.update(Camera { up, ..self.clone() })
    }

    pub fn set_dimensions(&mut self, width: usize, height: usize) -> Result<()> {
        self.update(Camera { width, height, ..self.clone() })
    }

    pub fn set_fov(&mut self, fov: f64) -> Result<()> {
        self.update(Camera { fov, ..self.clone() })
    }

    fn update(&mut self, mut next: Camera) -> Result<()> {
        next.basis = Basis::compute(next.eye, next.look_at, next.up,
            next.width, next.height, next.fov)?;
        *self = next;

        Ok(())
    }

    /// The (unnormalized) direction of the ray through pixel `(i, j)`.
    ///
    /// Pixel `(0, 0)` is the top-left corner of the image; `j` grows
    /// downwards.
    pub fn direction(&self, i: usize, j: usize) -> Vector3D {
        self.basis.horizontal * i as f64
            + self.basis.vertical * j as f64
            + self.basis.top_left
    }
}

#[test]
fn center_pixel_looks_at_target() {
    let c = Camera::new(10, 10).unwrap();
    let d = c.direction(5, 5).normalize();

    assert_eq!(d, Vector3D { x: 0.0, y: 0.0, z: -1.0 });
    assert_eq!(c.eye(), Point3D { x: 0.0, y: 0.0, z: 10.0 });
}

#[test]
fn top_left_pixel_is_up_and_left() {
    let c = Camera::new(10, 10).unwrap();
    let d = c.direction(0, 0);

    assert!(d.x < 0.0);
    assert!(d.y > 0.0);
    assert!(d.z < 0.0);
}

#[test]
fn focal_length_matches_field_of_view() {
    let c = Camera::looking_at(
        Point3D::ORIGIN,
        Point3D { x: 0.0, y: 0.0, z: -1.0 },
        Vector3D { x: 0.0, y: 1.0, z: 0.0 },
        200, 100, 90.0,
    ).unwrap();

    // With a 90 degree view the focal length equals half the width, so the
    // left edge of the middle row sits at 45 degrees.
    let d = c.direction(0, 50);
    assert_eq!(d, Vector3D { x: -100.0, y: 0.0, z: -100.0 });
}

#[test]
fn basis_corrects_slanted_up() {
    let c = Camera::looking_at(
        Point3D::ORIGIN,
        Point3D { x: 0.0, y: 0.0, z: -1.0 },
        Vector3D { x: 0.0, y: 1.0, z: 1.0 },
        10, 10, 50.0,
    ).unwrap();

    assert_eq!(c.direction(5, 5).normalize(), Vector3D { x: 0.0, y: 0.0, z: -1.0 });
}

#[test]
fn setters_recompute_basis() {
    let mut c = Camera::new(10, 10).unwrap();
    c.set_look_at(Point3D { x: 10.0, y: 0.0, z: 10.0 }).unwrap();

    assert_eq!(c.direction(5, 5).normalize(), Vector3D { x: 1.0, y: 0.0, z: 0.0 });

    c.set_dimensions(20, 8).unwrap();
    assert_eq!(c.direction(10, 4).normalize(), Vector3D { x: 1.0, y: 0.0, z: 0.0 });
}

#[test]
fn reject_degenerate_view() {
    let mut c = Camera::new(10, 10).unwrap();
    let before = c.clone();

    assert!(matches!(
        c.set_up(Vector3D { x: 0.0, y: 0.0, z: -3.0 }),
        Err(TraceError::DegenerateCamera)
    ));
    assert!(c.set_look_at(c.eye()).is_err());
    assert!(c.set_dimensions(0, 10).is_err());
    assert!(c.set_fov(180.0).is_err());
    assert_eq!(c, before);
}

#[test]
fn reject_non_finite_camera() {
    let inf_eye = Point3D { x: f64::INFINITY, y: 0.0, z: 10.0 };

    assert!(matches!(
        Camera::looking_at(
            inf_eye,
            Point3D::ORIGIN,
            Vector3D { x: 0.0, y: 1.0, z: 0.0 },
            10, 10, 50.0,
        ),
        Err(TraceError::NonFiniteCoordinate { .. })
    ));

    let mut c = Camera::new(10, 10).unwrap();
    let before = c.clone();

    assert!(c.set_eye(inf_eye).is_err());
    assert!(c.set_look_at(Point3D { x: f64::NAN, y: 0.0, z: 0.0 }).is_err());
    assert!(c.set_up(Vector3D { x: 0.0, y: f64::NAN, z: 0.0 }).is_err());
    assert_eq!(c, before);
}
