use std::fmt;
use std::ops::{ Add, Sub, Neg, Mul };

use crate::feq;
use crate::error::{ Result, TraceError };

fn check_finite(x: f64, y: f64, z: f64) -> Result<()> {
    if x.is_finite() && y.is_finite() && z.is_finite() {
        Ok(())
    } else {
        Err(TraceError::NonFiniteCoordinate { x, y, z })
    }
}

/// A direction (or displacement) in 3D space.
///
/// Constructing a vector through `Vector3D::new` rejects NaN and infinite
/// components. Vectors produced by arithmetic are not re-checked.
#[derive(Debug, Default, Copy, Clone)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Vector3D {
    fn eq(&self, other: &Vector3D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

/// A location in 3D space.
#[derive(Debug, Default, Copy, Clone)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Point3D {
    fn eq(&self, other: &Point3D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl Vector3D {
    pub const ZERO: Vector3D = Vector3D { x: 0.0, y: 0.0, z: 0.0 };

    /// Creates a vector, failing if any component is NaN or infinite.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Vector3D> {
        check_finite(x, y, z)?;
        Ok(Vector3D { x, y, z })
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Returns the vector, or `NonFiniteCoordinate` if a component is NaN or
    /// infinite.
    pub fn finite(self) -> Result<Vector3D> {
        check_finite(self.x, self.y, self.z)?;
        Ok(self)
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// Scales the vector to unit length.
    ///
    /// The zero vector has no direction and is returned unchanged, as are
    /// vectors which are already exactly unit length.
    ///
    /// ```
    /// # use phong_ray_tracer::tuple::Vector3D;
    /// let v = Vector3D::new(4.0, 0.0, 3.0).unwrap().normalize();
    /// assert_eq!(v, Vector3D::new(0.8, 0.0, 0.6).unwrap());
    /// assert_eq!(Vector3D::ZERO.normalize(), Vector3D::ZERO);
    /// ```
    pub fn normalize(&self) -> Vector3D {
        let t = self.dot(self);
        if t == 0.0 || t == 1.0 {
            return *self;
        }

        *self * (1.0 / t.sqrt())
    }

    pub fn dot(&self, other: &Vector3D) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
    }

    pub fn cross(&self, other: &Vector3D) -> Vector3D {
        Vector3D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }
}

impl Point3D {
    pub const ORIGIN: Point3D = Point3D { x: 0.0, y: 0.0, z: 0.0 };

    /// Creates a point, failing if any component is NaN or infinite.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Point3D> {
        check_finite(x, y, z)?;
        Ok(Point3D { x, y, z })
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Returns the point, or `NonFiniteCoordinate` if a component is NaN or
    /// infinite.
    pub fn finite(self) -> Result<Point3D> {
        check_finite(self.x, self.y, self.z)?;
        Ok(self)
    }
}

impl From<Point3D> for Vector3D {
    fn from(p: Point3D) -> Vector3D {
        Vector3D { x: p.x, y: p.y, z: p.z }
    }
}

impl From<Vector3D> for Point3D {
    fn from(v: Vector3D) -> Point3D {
        Point3D { x: v.x, y: v.y, z: v.z }
    }
}

impl fmt::Display for Vector3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

impl fmt::Display for Point3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

impl Add for Vector3D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vector3D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vector3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Mul<f64> for Vector3D {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}

/// Implements scalar left-multiplication for a vector.
///
/// ```
/// # use phong_ray_tracer::tuple::Vector3D;
/// let v = Vector3D::new(1.0, -2.0, 3.0).unwrap();
/// assert_eq!(2.0 * v, Vector3D::new(2.0, -4.0, 6.0).unwrap());
/// ```
impl Mul<Vector3D> for f64 {
    type Output = Vector3D;

    fn mul(self, other: Vector3D) -> Vector3D {
        other * self
    }
}

/// The displacement from `other` to `self`.
impl Sub for Point3D {
    type Output = Vector3D;

    fn sub(self, other: Point3D) -> Vector3D {
        Vector3D {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Add<Vector3D> for Point3D {
    type Output = Point3D;

    fn add(self, other: Vector3D) -> Point3D {
        Point3D {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

/* Tests */

#[test]
fn reject_nan_components() {
    assert!(Vector3D::new(f64::NAN, 0.0, 0.0).is_err());
    assert!(Point3D::new(0.0, 0.0, f64::NAN).is_err());
    assert!(Point3D::new(0.0, f64::INFINITY, 0.0).is_err());
    assert!(Vector3D::new(1.0, 2.0, 3.0).is_ok());
}

#[test]
fn sub_points() {
    let p1 = Point3D { x: 3.0, y: 2.0, z: 1.0 };
    let p2 = Point3D { x: 5.0, y: 6.0, z: 7.0 };

    assert_eq!(p1 - p2, Vector3D { x: -2.0, y: -4.0, z: -6.0 });
}

#[test]
fn add_vector_to_point() {
    let p = Point3D { x: 3.0, y: 2.0, z: 1.0 };
    let v = Vector3D { x: 5.0, y: 6.0, z: 7.0 };

    assert_eq!(p + v, Point3D { x: 8.0, y: 8.0, z: 8.0 });
}

#[test]
fn neg_vector() {
    let a = Vector3D { x: 1.0, y: -2.0, z: 3.0 };

    assert_eq!(-a, Vector3D { x: -1.0, y: 2.0, z: -3.0 });
}

#[test]
fn length_of_vector() {
    let v = Vector3D { x: -1.0, y: -2.0, z: -3.0 };

    assert_eq!(v.length(), f64::sqrt(14.0));
}

#[test]
fn normalize_has_unit_length() {
    let vectors = [
        Vector3D { x: 4.0, y: 0.0, z: 0.0 },
        Vector3D { x: 1.0, y: 2.0, z: 3.0 },
        Vector3D { x: -0.001, y: 0.0002, z: 1e-5 },
        Vector3D { x: 1e6, y: -3e5, z: 2.0 },
    ];

    for v in vectors.iter() {
        assert!((v.normalize().length() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn normalize_zero_vector() {
    let n = Vector3D::ZERO.normalize();

    assert!(n.is_zero());
    assert!(!n.x.is_nan());
}

#[test]
fn dot_vectors() {
    let a = Vector3D { x: 1.0, y: 2.0, z: 3.0 };
    let b = Vector3D { x: 2.0, y: 3.0, z: 4.0 };

    assert_eq!(a.dot(&b), 20.0);
}

#[test]
fn cross_vectors() {
    let a = Vector3D { x: 1.0, y: 2.0, z: 3.0 };
    let b = Vector3D { x: 2.0, y: 3.0, z: 4.0 };

    assert_eq!(a.cross(&b), Vector3D { x: -1.0, y: 2.0, z: -1.0 });
    assert_eq!(b.cross(&a), Vector3D { x: 1.0, y: -2.0, z: 1.0 });
}

#[test]
fn finite_checks_struct_literals() {
    let nan = Point3D { x: f64::NAN, y: 0.0, z: 0.0 };
    let inf = Vector3D { x: 0.0, y: f64::NEG_INFINITY, z: 0.0 };

    assert!(!nan.is_finite());
    assert!(!inf.is_finite());
    assert!(matches!(nan.finite(), Err(TraceError::NonFiniteCoordinate { .. })));
    assert!(matches!(inf.finite(), Err(TraceError::NonFiniteCoordinate { .. })));

    assert!(Point3D::ORIGIN.finite().is_ok());
    assert!(Vector3D { x: 1.0, y: 2.0, z: 3.0 }.is_finite());
}
