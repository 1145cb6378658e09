use crate::ray::Ray;
use crate::tuple::{ Point3D, Vector3D };
use crate::geometry::Renderable;

/// A record of a ray hitting an object.
///
/// Everything here is derived from the ray and the object it hit; the record
/// lives only as long as the shading of that hit.
#[derive(Copy, Clone, Debug)]
pub struct Intersection<'a> {
    /// The object being intersected.
    pub object: &'a Renderable,

    /// The point where the intersection occurs.
    pub point: Point3D,

    /// The unit surface normal at `point`.
    pub normal: Vector3D,

    /// Unit vector from `point` back towards the ray's origin.
    pub to_origin: Vector3D,

    /// Bounce budget inherited from the ray.
    pub bounces: i32,
}

/// Two intersections are equal if they are at the same place on the same
/// object (compared by pointer).
impl<'a> PartialEq for Intersection<'a> {
    fn eq(&self, other: &Intersection<'a>) -> bool {
        self.point == other.point && std::ptr::eq(self.object, other.object)
    }
}

impl<'a> Intersection<'a> {
    pub fn new(ray: &Ray, object: &'a Renderable, distance: f64) -> Intersection<'a> {
        let point = ray.position(distance);

        Intersection {
            object,
            point,
            normal: object.surface_normal(point),
            to_origin: ray.unit_to_origin(),
            bounces: ray.bounces,
        }
    }

    /// Mirrors the vector towards the ray's origin about the normal.
    ///
    /// Only defined when the ray arrives from the side the normal faces.
    pub fn reflect(&self) -> Option<Vector3D> {
        let t = self.to_origin.dot(&self.normal);
        if t > 0.0 {
            Some(self.normal * (2.0 * t) - self.to_origin)
        } else {
            None
        }
    }

    /// Cosine between the normal and the light vector.
    pub fn lambert(&self, light_vector: Vector3D) -> f64 {
        self.normal.dot(&light_vector)
    }

    /// Cosine between the mirrored light vector and the view vector; the base
    /// of the Phong specular term.
    pub fn specular(&self, light_vector: Vector3D, lambert: f64) -> f64 {
        let mirrored = self.normal * (2.0 * lambert) - light_vector;
        self.to_origin.dot(&mirrored)
    }
}

#[cfg(test)]
fn floor() -> Renderable {
    use crate::geometry::Plane;

    Plane::new(
        Vector3D { x: 0.0, y: 1.0, z: 0.0 },
        Point3D::ORIGIN,
        crate::surface::lookup("mirror").unwrap(),
    ).unwrap().into()
}

#[test]
fn precompute_intersection_state() {
    let plane = floor();
    let r = Ray::new(
        Point3D { x: -1.0, y: 1.0, z: 0.0 },
        Vector3D { x: 1.0, y: -1.0, z: 0.0 },
        4,
    );

    let i = Intersection::new(&r, &plane, 2f64.sqrt());
    assert_eq!(i.point, Point3D::ORIGIN);
    assert_eq!(i.normal, Vector3D { x: 0.0, y: 1.0, z: 0.0 });
    assert_eq!(i.to_origin, r.unit_to_origin());
    assert_eq!(i.bounces, 4);
}

#[test]
fn reflect_45() {
    let plane = floor();
    let r = Ray::new(
        Point3D { x: -1.0, y: 1.0, z: 0.0 },
        Vector3D { x: 1.0, y: -1.0, z: 0.0 },
        0,
    );

    let i = Intersection::new(&r, &plane, 2f64.sqrt());
    let h = 2f64.sqrt() / 2.0;
    assert_eq!(i.reflect(), Some(Vector3D { x: h, y: h, z: 0.0 }));
}

#[test]
fn no_reflection_from_behind() {
    let plane = floor();
    let r = Ray::new(
        Point3D { x: 0.0, y: -1.0, z: 0.0 },
        Vector3D { x: 0.0, y: 1.0, z: 0.0 },
        0,
    );

    let i = Intersection::new(&r, &plane, 1.0);
    assert_eq!(i.reflect(), None);
}

#[test]
fn lambert_and_specular_head_on() {
    let plane = floor();
    let r = Ray::new(
        Point3D { x: 0.0, y: 1.0, z: 0.0 },
        Vector3D { x: 0.0, y: -1.0, z: 0.0 },
        0,
    );
    let i = Intersection::new(&r, &plane, 1.0);

    let up = Vector3D { x: 0.0, y: 1.0, z: 0.0 };
    let lambert = i.lambert(up);
    assert_eq!(lambert, 1.0);
    assert_eq!(i.specular(up, lambert), 1.0);

    let h = 2f64.sqrt() / 2.0;
    let slanted = Vector3D { x: h, y: h, z: 0.0 };
    let lambert = i.lambert(slanted);
    assert!((lambert - h).abs() < 1e-9);
    assert!((i.specular(slanted, lambert) - h).abs() < 1e-9);
}
