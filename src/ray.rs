use crate::tuple::{ Point3D, Vector3D };
use crate::geometry::Renderable;
use crate::intersect::Intersection;

/// A ray with an origin, a unit direction and a bounce budget.
///
/// The budget is the number of reflections still allowed below this ray. A ray
/// with a negative budget never hits anything.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Point3D,
    pub direction: Vector3D,
    pub bounces: i32,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    pub fn new(origin: Point3D, direction: Vector3D, bounces: i32) -> Ray {
        Ray { origin, direction: direction.normalize(), bounces }
    }

    pub fn position(&self, t: f64) -> Point3D {
        self.origin + self.direction * t
    }

    /// The unit vector pointing back towards the ray's origin.
    pub fn unit_to_origin(&self) -> Vector3D {
        -self.direction
    }

    /// Finds the nearest object hit by this ray.
    ///
    /// Objects are scanned in order. Each is asked for a hit no farther than
    /// the best found so far, so a later object only wins by being strictly
    /// closer; ties go to the earlier object.
    pub fn trace<'a>(&self, objects: &'a [Renderable]) -> Option<Intersection<'a>> {
        if self.bounces < 0 {
            return None;
        }

        let mut nearest = f64::INFINITY;
        let mut hit: Option<&'a Renderable> = None;

        for object in objects.iter() {
            if let Some(t) = object.intersect(self, nearest) {
                if t < nearest {
                    nearest = t;
                    hit = Some(object);
                }
            }
        }

        hit.map(|object| Intersection::new(self, object, nearest))
    }
}

#[cfg(test)]
fn unit_sphere_at(z: f64, name: &str) -> Renderable {
    use crate::geometry::Sphere;

    Sphere::new(
        Point3D { x: 0.0, y: 0.0, z },
        1.0,
        crate::surface::lookup(name).unwrap(),
    ).unwrap().into()
}

#[test]
fn ray_position() {
    let r = Ray::new(
        Point3D { x: 2.0, y: 3.0, z: 4.0 },
        Vector3D { x: 1.0, y: 0.0, z: 0.0 },
        0,
    );

    assert_eq!(r.position(0.0), Point3D { x: 2.0, y: 3.0, z: 4.0 });
    assert_eq!(r.position(-1.0), Point3D { x: 1.0, y: 3.0, z: 4.0 });
    assert_eq!(r.position(2.5), Point3D { x: 4.5, y: 3.0, z: 4.0 });
}

#[test]
fn direction_is_normalized() {
    let r = Ray::new(Point3D::ORIGIN, Vector3D { x: 0.0, y: 3.0, z: 4.0 }, 2);

    assert_eq!(r.direction, Vector3D { x: 0.0, y: 0.6, z: 0.8 });
    assert_eq!(r.unit_to_origin(), Vector3D { x: 0.0, y: -0.6, z: -0.8 });
}

#[test]
fn trace_finds_nearest_object() {
    let objects = vec![
        unit_sphere_at(-10.0, "gold"),
        unit_sphere_at(0.0, "mirror"),
        unit_sphere_at(-5.0, "emerald"),
    ];
    let r = Ray::new(
        Point3D { x: 0.0, y: 0.0, z: 5.0 },
        Vector3D { x: 0.0, y: 0.0, z: -1.0 },
        3,
    );

    let hit = r.trace(&objects).unwrap();
    assert!(std::ptr::eq(hit.object, &objects[1]));
    assert_eq!(hit.point, Point3D { x: 0.0, y: 0.0, z: 1.0 });
    assert_eq!(hit.bounces, 3);
}

#[test]
fn trace_tie_goes_to_first_object() {
    let objects = vec![
        unit_sphere_at(0.0, "gold"),
        unit_sphere_at(0.0, "mirror"),
    ];
    let r = Ray::new(
        Point3D { x: 0.0, y: 0.0, z: 5.0 },
        Vector3D { x: 0.0, y: 0.0, z: -1.0 },
        0,
    );

    let hit = r.trace(&objects).unwrap();
    assert!(std::ptr::eq(hit.object, &objects[0]));
}

#[test]
fn trace_misses_everything() {
    let objects = vec![unit_sphere_at(0.0, "gold")];
    let r = Ray::new(
        Point3D { x: 0.0, y: 0.0, z: 5.0 },
        Vector3D { x: 0.0, y: 1.0, z: 0.0 },
        0,
    );

    assert!(r.trace(&objects).is_none());
    assert!(r.trace(&[]).is_none());
}

#[test]
fn negative_budget_never_hits() {
    let objects = vec![unit_sphere_at(0.0, "gold")];
    let r = Ray::new(
        Point3D { x: 0.0, y: 0.0, z: 5.0 },
        Vector3D { x: 0.0, y: 0.0, z: -1.0 },
        -1,
    );

    assert!(r.trace(&objects).is_none());
}
