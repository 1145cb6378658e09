use crate::color::Color;
use crate::tuple::{ Point3D, Vector3D };
use crate::error::{ Result, TraceError };

/// A light source.
///
/// Ambient lights have no direction and light every surface equally.
/// Directional lights shine along a fixed (normalized) direction from
/// infinitely far away. Point lights radiate from a position in the scene.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Light {
    Ambient { intensity: Color },
    Directional { intensity: Color, direction: Vector3D },
    Point { intensity: Color, position: Point3D },
}

fn check_intensity(intensity: Color) -> Result<Color> {
    if intensity.in_unit_range() {
        Ok(intensity)
    } else {
        Err(TraceError::IntensityOutOfRange {
            r: intensity.r, g: intensity.g, b: intensity.b,
        })
    }
}

impl Light {
    pub fn ambient(intensity: Color) -> Result<Light> {
        Ok(Light::Ambient { intensity: check_intensity(intensity)? })
    }

    /// Creates a directional light shining along `direction`.
    pub fn directional(intensity: Color, direction: Vector3D) -> Result<Light> {
        if direction.finite()?.is_zero() {
            return Err(TraceError::DegenerateVector("light direction"));
        }

        Ok(Light::Directional {
            intensity: check_intensity(intensity)?,
            direction: direction.normalize(),
        })
    }

    pub fn point(intensity: Color, position: Point3D) -> Result<Light> {
        Ok(Light::Point {
            intensity: check_intensity(intensity)?,
            position: position.finite()?,
        })
    }

    pub fn intensity(&self) -> Color {
        match *self {
            Light::Ambient { intensity }
            | Light::Directional { intensity, .. }
            | Light::Point { intensity, .. } => intensity,
        }
    }

    /// The unit vector from `point` towards the light.
    ///
    /// Ambient light has no direction, so `None` is returned for it. A point
    /// light sitting exactly at `point` gives the zero vector.
    pub fn light_vector(&self, point: Point3D) -> Option<Vector3D> {
        match *self {
            Light::Ambient { .. } => None,
            Light::Directional { direction, .. } => Some(-direction),
            Light::Point { position, .. } => Some((position - point).normalize()),
        }
    }
}

#[test]
fn ambient_light_has_no_vector() {
    let l = Light::ambient(Color::white()).unwrap();

    assert_eq!(l.light_vector(Point3D::ORIGIN), None);
    assert_eq!(l.intensity(), Color::white());
}

#[test]
fn directional_light_points_against_direction() {
    let l = Light::directional(
        Color::white(),
        Vector3D { x: 0.0, y: -4.0, z: 0.0 },
    ).unwrap();

    let p = Point3D { x: 3.0, y: 1.0, z: -7.0 };
    assert_eq!(l.light_vector(p), Some(Vector3D { x: 0.0, y: 1.0, z: 0.0 }));
    assert_eq!(l.light_vector(Point3D::ORIGIN), l.light_vector(p));
}

#[test]
fn point_light_vector_is_unit() {
    let l = Light::point(
        Color::rgb(0.5, 0.5, 0.5),
        Point3D { x: 0.0, y: 10.0, z: 0.0 },
    ).unwrap();

    let v = l.light_vector(Point3D { x: 0.0, y: 2.0, z: 0.0 }).unwrap();
    assert_eq!(v, Vector3D { x: 0.0, y: 1.0, z: 0.0 });
}

#[test]
fn reject_bad_lights() {
    assert!(Light::ambient(Color::rgb(1.5, 0.0, 0.0)).is_err());
    assert!(Light::point(Color::rgb(0.0, -0.1, 0.0), Point3D::ORIGIN).is_err());
    assert!(Light::directional(Color::white(), Vector3D::ZERO).is_err());
}

#[test]
fn reject_non_finite_lights() {
    let nan = Point3D { x: f64::NAN, y: 0.0, z: 0.0 };
    let inf = Vector3D { x: f64::INFINITY, y: -1.0, z: 0.0 };

    assert!(matches!(
        Light::point(Color::white(), nan),
        Err(TraceError::NonFiniteCoordinate { .. })
    ));
    assert!(matches!(
        Light::directional(Color::white(), inf),
        Err(TraceError::NonFiniteCoordinate { .. })
    ));
}

#[test]
fn point_light_on_the_point_has_zero_vector() {
    let p = Point3D { x: 1.0, y: 2.0, z: 3.0 };
    let l = Light::point(Color::white(), p).unwrap();

    assert_eq!(l.light_vector(p), Some(Vector3D::ZERO));
}
