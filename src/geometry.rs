use std::fmt;
use std::sync::Arc;

use crate::ray::Ray;
use crate::surface::Surface;
use crate::tuple::{ Point3D, Vector3D };
use crate::error::{ Result, TraceError };

/// A sphere with a center point and radius.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    center: Point3D,
    radius: f64,
    radius_sq: f64,
    surface: Arc<Surface>,
}

impl Sphere {
    pub fn new(center: Point3D, radius: f64, surface: Arc<Surface>)
        -> Result<Sphere> {
        let center = center.finite()?;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(TraceError::InvalidRadius(radius));
        }

        Ok(Sphere { center, radius, radius_sq: radius * radius, surface })
    }

    pub fn center(&self) -> Point3D {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Finds the nearest crossing in `(0, max_distance]`.
    ///
    /// `v` is the distance along the ray to the point closest to the center.
    /// If even the front of the sphere at that point lies beyond
    /// `max_distance`, the quadratic is skipped altogether.
    fn intersect(&self, ray: &Ray, max_distance: f64) -> Option<f64> {
        let to_center = self.center - ray.origin;
        let v = ray.direction.dot(&to_center);

        if v - self.radius > max_distance {
            return None;
        }

        let discriminant = self.radius_sq + v * v - to_center.dot(&to_center);
        if discriminant < 0.0 {
            return None;
        }

        // Only the near root is considered; a ray starting inside the sphere
        // gets a negative near root and misses.
        let t = v - discriminant.sqrt();
        if t < 0.0 || t > max_distance {
            return None;
        }

        Some(t)
    }

    fn surface_normal(&self, at: Point3D) -> Vector3D {
        (at - self.center).normalize()
    }
}

/// An infinite one-sided plane, `normal · p = d`.
#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    normal: Vector3D,
    d: f64,
    surface: Arc<Surface>,
}

impl Plane {
    /// Creates the plane through `point` facing along `normal`.
    ///
    /// The normal is normalized before it is stored.
    pub fn new(normal: Vector3D, point: Point3D, surface: Arc<Surface>)
        -> Result<Plane> {
        let point = point.finite()?;
        if normal.finite()?.is_zero() {
            return Err(TraceError::DegenerateVector("plane normal"));
        }

        let normal = normal.normalize();
        let d = normal.dot(&Vector3D::from(point));

        Ok(Plane { normal, d, surface })
    }

    pub fn normal(&self) -> Vector3D {
        self.normal
    }

    pub fn offset(&self) -> f64 {
        self.d
    }

    /// Rays parallel to the plane never hit it, including rays lying in it.
    fn intersect(&self, ray: &Ray, max_distance: f64) -> Option<f64> {
        let denominator = self.normal.dot(&ray.direction);
        if denominator == 0.0 {
            return None;
        }

        let t = (self.d - self.normal.dot(&Vector3D::from(ray.origin))) / denominator;
        if t < 0.0 || t > max_distance {
            return None;
        }

        Some(t)
    }
}

/// Anything a ray can hit.
#[derive(Clone, Debug, PartialEq)]
pub enum Renderable {
    Sphere(Sphere),
    Plane(Plane),
}

impl Renderable {
    /// Intersects a ray with this object.
    ///
    /// Returns the smallest distance along the ray in `(0, max_distance]` at
    /// which the surface is crossed, or `None` if there is no such crossing.
    pub fn intersect(&self, ray: &Ray, max_distance: f64) -> Option<f64> {
        match self {
            Renderable::Sphere(s) => s.intersect(ray, max_distance),
            Renderable::Plane(p) => p.intersect(ray, max_distance),
        }
    }

    /// The unit surface normal at a point on the object.
    ///
    /// Planes always return their stored normal.
    pub fn surface_normal(&self, at: Point3D) -> Vector3D {
        match self {
            Renderable::Sphere(s) => s.surface_normal(at),
            Renderable::Plane(p) => p.normal,
        }
    }

    pub fn surface(&self) -> &Arc<Surface> {
        match self {
            Renderable::Sphere(s) => &s.surface,
            Renderable::Plane(p) => &p.surface,
        }
    }
}

impl From<Sphere> for Renderable {
    fn from(s: Sphere) -> Renderable {
        Renderable::Sphere(s)
    }
}

impl From<Plane> for Renderable {
    fn from(p: Plane) -> Renderable {
        Renderable::Plane(p)
    }
}

impl fmt::Display for Renderable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Renderable::Sphere(s) => write!(f, "sphere {} {}", s.center, s.radius),
            Renderable::Plane(p) => write!(f, "{}x + {}y + {}z = {}",
                p.normal.x, p.normal.y, p.normal.z, p.d),
        }
    }
}

#[cfg(test)]
fn test_surface() -> Arc<Surface> {
    crate::surface::lookup("matte black").unwrap()
}

#[test]
fn ray_hits_unit_sphere() {
    let s: Renderable = Sphere::new(Point3D::ORIGIN, 1.0, test_surface())
        .unwrap().into();
    let r = Ray::new(
        Point3D { x: 0.0, y: 0.0, z: 5.0 },
        Vector3D { x: 0.0, y: 0.0, z: -1.0 },
        0,
    );

    let t = s.intersect(&r, f64::INFINITY).unwrap();
    assert_eq!(t, 4.0);
    assert_eq!(s.surface_normal(r.position(t)), Vector3D { x: 0.0, y: 0.0, z: 1.0 });
}

#[test]
fn sphere_is_behind_ray() {
    let s: Renderable = Sphere::new(Point3D::ORIGIN, 1.0, test_surface())
        .unwrap().into();
    let r = Ray::new(
        Point3D { x: 0.0, y: 0.0, z: 5.0 },
        Vector3D { x: 0.0, y: 0.0, z: 1.0 },
        0,
    );

    assert_eq!(s.intersect(&r, f64::INFINITY), None);
}

#[test]
fn ray_misses_sphere() {
    let s: Renderable = Sphere::new(Point3D::ORIGIN, 1.0, test_surface())
        .unwrap().into();
    let r = Ray::new(
        Point3D { x: 0.0, y: 2.0, z: 5.0 },
        Vector3D { x: 0.0, y: 0.0, z: -1.0 },
        0,
    );

    assert_eq!(s.intersect(&r, f64::INFINITY), None);
}

#[test]
fn ray_inside_sphere_misses() {
    let s: Renderable = Sphere::new(Point3D::ORIGIN, 1.0, test_surface())
        .unwrap().into();
    let r = Ray::new(Point3D::ORIGIN, Vector3D { x: 0.0, y: 0.0, z: 1.0 }, 0);

    assert_eq!(s.intersect(&r, f64::INFINITY), None);
}

#[test]
fn sphere_beyond_max_distance() {
    let s: Renderable = Sphere::new(Point3D::ORIGIN, 1.0, test_surface())
        .unwrap().into();
    let r = Ray::new(
        Point3D { x: 0.0, y: 0.0, z: 5.0 },
        Vector3D { x: 0.0, y: 0.0, z: -1.0 },
        0,
    );

    assert_eq!(s.intersect(&r, 3.0), None);
    assert_eq!(s.intersect(&r, 4.0), Some(4.0));
}

#[test]
fn reject_bad_radius() {
    assert!(Sphere::new(Point3D::ORIGIN, 0.0, test_surface()).is_err());
    assert!(Sphere::new(Point3D::ORIGIN, -2.0, test_surface()).is_err());
    assert!(Sphere::new(Point3D::ORIGIN, f64::NAN, test_surface()).is_err());
}

#[test]
fn ray_intersecting_plane_from_above() {
    let p: Renderable = Plane::new(
        Vector3D { x: 0.0, y: 1.0, z: 0.0 }, Point3D::ORIGIN, test_surface(),
    ).unwrap().into();
    let r = Ray::new(
        Point3D { x: 0.0, y: 5.0, z: 0.0 },
        Vector3D { x: 0.0, y: -1.0, z: 0.0 },
        0,
    );

    assert_eq!(p.intersect(&r, f64::INFINITY), Some(5.0));
}

#[test]
fn ray_parallel_to_plane() {
    let p: Renderable = Plane::new(
        Vector3D { x: 0.0, y: 1.0, z: 0.0 }, Point3D::ORIGIN, test_surface(),
    ).unwrap().into();

    let above = Ray::new(
        Point3D { x: 0.0, y: 5.0, z: 0.0 },
        Vector3D { x: 1.0, y: 0.0, z: 0.0 },
        0,
    );
    let coplanar = Ray::new(Point3D::ORIGIN, Vector3D { x: 1.0, y: 0.0, z: 0.0 }, 0);

    assert_eq!(p.intersect(&above, f64::INFINITY), None);
    assert_eq!(p.intersect(&coplanar, f64::INFINITY), None);
}

#[test]
fn plane_behind_ray() {
    let p: Renderable = Plane::new(
        Vector3D { x: 0.0, y: 1.0, z: 0.0 }, Point3D::ORIGIN, test_surface(),
    ).unwrap().into();
    let r = Ray::new(
        Point3D { x: 0.0, y: 5.0, z: 0.0 },
        Vector3D { x: 0.0, y: 1.0, z: 0.0 },
        0,
    );

    assert_eq!(p.intersect(&r, f64::INFINITY), None);
}

#[test]
fn plane_normal_is_constant_and_unit() {
    let p: Renderable = Plane::new(
        Vector3D { x: 0.0, y: 2.0, z: 0.0 },
        Point3D { x: 0.0, y: -200.0, z: -320.0 },
        test_surface(),
    ).unwrap().into();

    let n = Vector3D { x: 0.0, y: 1.0, z: 0.0 };
    assert_eq!(p.surface_normal(Point3D::ORIGIN), n);
    assert_eq!(p.surface_normal(Point3D { x: 10.0, y: -5.0, z: 1.0 }), n);
    assert_eq!(p.to_string(), "0x + 1y + 0z = -200");
}

#[test]
fn reject_zero_plane_normal() {
    assert!(Plane::new(Vector3D::ZERO, Point3D::ORIGIN, test_surface()).is_err());
}

#[test]
fn reject_non_finite_geometry() {
    let nan_center = Point3D { x: f64::NAN, y: 0.0, z: 0.0 };
    let inf_normal = Vector3D { x: 0.0, y: f64::INFINITY, z: 0.0 };
    let inf_point = Point3D { x: 0.0, y: 0.0, z: f64::NEG_INFINITY };

    assert!(matches!(
        Sphere::new(nan_center, 1.0, test_surface()),
        Err(TraceError::NonFiniteCoordinate { .. })
    ));
    assert!(matches!(
        Plane::new(inf_normal, Point3D::ORIGIN, test_surface()),
        Err(TraceError::NonFiniteCoordinate { .. })
    ));
    assert!(matches!(
        Plane::new(Vector3D { x: 0.0, y: 1.0, z: 0.0 }, inf_point, test_surface()),
        Err(TraceError::NonFiniteCoordinate { .. })
    ));
}
