use std::sync::Arc;

use crate::color::Color;
use crate::light::Light;
use crate::surface::Surface;
use crate::tuple::{ Point3D, Vector3D };
use crate::geometry::{ Plane, Renderable, Sphere };
use crate::error::Result;

/// A scene with objects and lights.
///
/// The order of `objects` decides which object wins when two are hit at the
/// same distance; the order of `lights` is the order they are shaded in.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    objects: Vec<Renderable>,
    lights: Vec<Light>,
}

impl Scene {
    /// Creates an empty scene with no objects and no lights.
    pub fn new() -> Scene {
        Default::default()
    }

    pub fn objects(&self) -> &[Renderable] {
        &self.objects
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn add_object<R: Into<Renderable>>(&mut self, object: R) {
        self.objects.push(object.into());
    }

    pub fn add_sphere(&mut self, center: Point3D, radius: f64,
        surface: Arc<Surface>) -> Result<()> {
        self.add_object(Sphere::new(center, radius, surface)?);
        Ok(())
    }

    pub fn add_plane(&mut self, normal: Vector3D, point: Point3D,
        surface: Arc<Surface>) -> Result<()> {
        self.add_object(Plane::new(normal, point, surface)?);
        Ok(())
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn add_ambient_light(&mut self, intensity: Color) -> Result<()> {
        self.add_light(Light::ambient(intensity)?);
        Ok(())
    }

    pub fn add_directional_light(&mut self, intensity: Color,
        direction: Vector3D) -> Result<()> {
        self.add_light(Light::directional(intensity, direction)?);
        Ok(())
    }

    pub fn add_point_light(&mut self, intensity: Color, position: Point3D)
        -> Result<()> {
        self.add_light(Light::point(intensity, position)?);
        Ok(())
    }

    /// Removes the object at `index`, if there is one.
    pub fn remove_object(&mut self, index: usize) -> Option<Renderable> {
        if index < self.objects.len() {
            Some(self.objects.remove(index))
        } else {
            None
        }
    }

    /// Removes the light at `index`, if there is one.
    pub fn remove_light(&mut self, index: usize) -> Option<Light> {
        if index < self.lights.len() {
            Some(self.lights.remove(index))
        } else {
            None
        }
    }

    pub fn clear_objects(&mut self) {
        self.objects.clear();
    }

    pub fn clear_lights(&mut self) {
        self.lights.clear();
    }

    /// Removes every object and light.
    pub fn clear(&mut self) {
        self.clear_lights();
        self.clear_objects();
    }
}

#[test]
fn build_and_clear_scene() {
    use crate::surface::lookup;

    let mut s = Scene::new();
    s.add_sphere(Point3D::ORIGIN, 1.0, lookup("gold").unwrap()).unwrap();
    s.add_plane(
        Vector3D { x: 0.0, y: 1.0, z: 0.0 },
        Point3D { x: 0.0, y: -1.0, z: 0.0 },
        lookup("emerald").unwrap(),
    ).unwrap();
    s.add_ambient_light(Color::rgb(0.2, 0.2, 0.2)).unwrap();
    s.add_point_light(Color::white(), Point3D { x: 5.0, y: 5.0, z: 5.0 }).unwrap();

    assert_eq!(s.objects().len(), 2);
    assert_eq!(s.lights().len(), 2);
    assert!(matches!(s.objects()[1], Renderable::Plane(_)));

    s.clear_lights();
    assert!(s.lights().is_empty());
    assert_eq!(s.objects().len(), 2);

    s.clear();
    assert!(s.objects().is_empty());
}

#[test]
fn remove_keeps_order() {
    use crate::surface::lookup;

    let mut s = Scene::new();
    for z in 0..3 {
        s.add_sphere(
            Point3D { x: 0.0, y: 0.0, z: z as f64 },
            1.0,
            lookup("silver").unwrap(),
        ).unwrap();
    }

    let removed = s.remove_object(1).unwrap();
    assert_eq!(removed.to_string(), "sphere [0, 0, 1] 1");
    assert_eq!(s.objects()[1].to_string(), "sphere [0, 0, 2] 1");
    assert!(s.remove_object(5).is_none());
    assert!(s.remove_light(0).is_none());
}

#[test]
fn invalid_additions_leave_scene_unchanged() {
    use crate::surface::lookup;

    let mut s = Scene::new();
    assert!(s.add_sphere(Point3D::ORIGIN, -1.0, lookup("gold").unwrap()).is_err());
    assert!(s.add_directional_light(Color::white(), Vector3D::ZERO).is_err());

    assert!(s.objects().is_empty());
    assert!(s.lights().is_empty());
}
