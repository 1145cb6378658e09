use crate::ray::Ray;
use crate::scene::Scene;
use crate::color::Color;
use crate::light::Light;
use crate::camera::Camera;
use crate::surface::Surface;
use crate::tuple::Vector3D;
use crate::intersect::Intersection;
use crate::consts::{ MAX_BOUNCES, TINY };
use crate::error::{ Result, TraceError };

/// Computes pixel colors for a scene seen through a camera.
///
/// Shading follows the Phong model: ambient, diffuse and specular terms for
/// each light, shadow rays towards every non-ambient light, and recursive
/// mirror reflection bounded by the bounce budget.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Renderer {
    background: Color,
    max_bounces: i32,
}

impl Default for Renderer {
    fn default() -> Renderer {
        Renderer { background: Color::black(), max_bounces: MAX_BOUNCES }
    }
}

impl Renderer {
    pub fn new(background: Color, max_bounces: i32) -> Result<Renderer> {
        let mut renderer = Renderer { background, ..Default::default() };
        renderer.set_max_bounces(max_bounces)?;
        Ok(renderer)
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// The color returned by rays which hit nothing.
    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    pub fn max_bounces(&self) -> i32 {
        self.max_bounces
    }

    pub fn set_max_bounces(&mut self, bounces: i32) -> Result<()> {
        if bounces < 0 {
            return Err(TraceError::NegativeBounces(bounces));
        }

        self.max_bounces = bounces;
        Ok(())
    }

    /// Computes the color of pixel `(i, j)`.
    pub fn render_pixel(&self, i: usize, j: usize, scene: &Scene,
        camera: &Camera) -> Color {
        let ray = Ray::new(camera.eye(), camera.direction(i, j), self.max_bounces);
        self.color_at(&ray, scene)
    }

    /// Shades whatever `ray` hits first, or returns the background.
    pub fn color_at(&self, ray: &Ray, scene: &Scene) -> Color {
        match ray.trace(scene.objects()) {
            Some(hit) => self.shade(scene, &hit),
            None => self.background,
        }
    }

    /// Calculates the color for a hit, based on lights, shadows and
    /// reflections.
    ///
    /// The result is clamped to `[0, 1]` on every channel.
    pub fn shade(&self, scene: &Scene, hit: &Intersection) -> Color {
        let surface = hit.object.surface();

        let mut color = self.lighting(scene, surface, hit);

        let mirrored = self.reflection(scene, surface, hit);
        color += mirrored;

        // At the last bounce the mirror term is counted twice.
        if hit.bounces <= 0 {
            color += mirrored;
        }

        color.clamp()
    }

    /// Direct illumination from every light in the scene.
    ///
    /// Evaluation stops at the first non-ambient light whose shadow ray is
    /// blocked; lights after it contribute nothing, even ambient ones.
    fn lighting(&self, scene: &Scene, surface: &Surface, hit: &Intersection)
        -> Color {
        let phong = surface.phong();
        let mut color = Color::black();

        for light in scene.lights() {
            let light_vector = match light.light_vector(hit.point) {
                Some(v) => v,
                None => {
                    color += phong.ambient * (surface.color() * light.intensity());
                    continue;
                }
            };

            if self.in_shadow(scene, hit, light_vector) {
                break;
            }

            let lambert = hit.lambert(light_vector);
            if lambert > 0.0 {
                color += diffuse(surface, light, lambert);
                color += specular(surface, light, hit, light_vector, lambert);
            }
        }

        color
    }

    /// Whether anything lies between the hit and the light.
    ///
    /// The shadow ray has no length limit, so objects beyond a point light
    /// also count as occluders. A point light lying on the hit surface gives
    /// a zero light vector; the shadow ray then meets its own surface at
    /// distance zero and counts as shadowed.
    fn in_shadow(&self, scene: &Scene, hit: &Intersection,
        light_vector: Vector3D) -> bool {
        let origin = hit.point + light_vector * TINY;
        let shadow_ray = Ray::new(origin, light_vector, 0);

        shadow_ray.trace(scene.objects()).is_some()
    }

    /// The mirror term: the color seen along the reflected ray, scaled by the
    /// surface's reflectance.
    fn reflection(&self, scene: &Scene, surface: &Surface, hit: &Intersection)
        -> Color {
        let reflectance = surface.phong().reflectance;
        if reflectance <= 0.0 {
            return Color::black();
        }

        let direction = match hit.reflect() {
            Some(d) => d,
            None => return Color::black(),
        };

        let origin = hit.point + direction * TINY;
        let reflected = Ray::new(origin, direction, hit.bounces - 1);

        reflectance * self.color_at(&reflected, scene)
    }
}

fn diffuse(surface: &Surface, light: &Light, lambert: f64) -> Color {
    let kd = surface.phong().diffuse;
    if kd <= 0.0 {
        return Color::black();
    }

    (kd * lambert) * (surface.color() * light.intensity())
}

fn specular(surface: &Surface, light: &Light, hit: &Intersection,
    light_vector: Vector3D, lambert: f64) -> Color {
    let phong = surface.phong();
    if phong.specular <= 0.0 {
        return Color::black();
    }

    let spec = hit.specular(light_vector, lambert);
    if spec <= 0.0 {
        return Color::black();
    }

    (phong.specular * spec.powf(phong.exponent)) * light.intensity()
}

#[cfg(test)]
mod fixtures {
    use std::sync::Arc;

    use crate::color::Color;
    use crate::scene::Scene;
    use crate::tuple::Point3D;
    use crate::surface::{ PhongModel, Surface };

    pub fn surface(color: Color, phong: PhongModel) -> Arc<Surface> {
        Arc::new(Surface::new(color, phong).unwrap())
    }

    /// A unit sphere at the origin with the given surface.
    pub fn sphere_scene(surface: Arc<Surface>) -> Scene {
        let mut s = Scene::new();
        s.add_sphere(Point3D::ORIGIN, 1.0, surface).unwrap();
        s
    }
}

#[test]
fn ambient_only_center_pixel() {
    use crate::surface::PhongModel;
    use fixtures::*;

    let phong = PhongModel { ambient: 0.3, diffuse: 1.0, ..Default::default() };
    let white = surface(Color::white(), phong);
    let mut scene = sphere_scene(white);
    scene.add_ambient_light(Color::white()).unwrap();

    let camera = Camera::new(10, 10).unwrap();
    let r = Renderer::default();

    assert_eq!(r.render_pixel(5, 5, &scene, &camera), Color::rgb(0.3, 0.3, 0.3));
}

#[test]
fn miss_returns_background() {
    use crate::surface::lookup;
    use fixtures::*;

    let scene = sphere_scene(lookup("gold").unwrap());
    let camera = Camera::new(10, 10).unwrap();
    let r = Renderer::new(Color::from_rgb8(20, 20, 25), 4).unwrap();

    assert_eq!(r.render_pixel(0, 0, &scene, &camera), Color::from_rgb8(20, 20, 25));
}

#[test]
fn diffuse_and_specular_head_on() {
    use crate::tuple::{ Point3D, Vector3D };
    use crate::surface::PhongModel;
    use fixtures::*;

    let phong = PhongModel {
        diffuse: 0.5,
        specular: 0.25,
        exponent: 10.0,
        ..Default::default()
    };
    let mut scene = sphere_scene(surface(Color::rgb(1.0, 0.5, 0.0), phong));
    scene.add_point_light(Color::white(), Point3D { x: 0.0, y: 0.0, z: 10.0 }).unwrap();

    let ray = Ray::new(
        Point3D { x: 0.0, y: 0.0, z: 5.0 },
        Vector3D { x: 0.0, y: 0.0, z: -1.0 },
        0,
    );

    // lambert = 1 and spec = 1: diffuse 0.5 * color, plus 0.25 white.
    let c = Renderer::default().color_at(&ray, &scene);
    assert_eq!(c, Color::rgb(0.75, 0.5, 0.25));
}

#[test]
fn light_behind_surface_adds_nothing() {
    use crate::tuple::{ Point3D, Vector3D };
    use crate::surface::PhongModel;
    use fixtures::*;

    let phong = PhongModel { diffuse: 1.0, specular: 1.0, ..Default::default() };
    let mut scene = Scene::new();
    scene.add_plane(
        Vector3D { x: 0.0, y: 1.0, z: 0.0 },
        Point3D::ORIGIN,
        surface(Color::white(), phong),
    ).unwrap();
    scene.add_directional_light(Color::white(), Vector3D { x: 0.0, y: 1.0, z: 0.0 })
        .unwrap();

    let ray = Ray::new(
        Point3D { x: 0.0, y: 5.0, z: 0.0 },
        Vector3D { x: 0.0, y: -1.0, z: 0.0 },
        0,
    );

    assert_eq!(Renderer::default().color_at(&ray, &scene), Color::black());
}

#[test]
fn shadowed_light_stops_remaining_lights() {
    use crate::tuple::{ Point3D, Vector3D };
    use crate::surface::PhongModel;
    use fixtures::*;

    let phong = PhongModel { ambient: 0.5, diffuse: 0.5, ..Default::default() };
    let mut scene = Scene::new();
    scene.add_plane(
        Vector3D { x: 0.0, y: 1.0, z: 0.0 },
        Point3D::ORIGIN,
        surface(Color::white(), phong),
    ).unwrap();

    // Blocks light from straight above the hit point at the origin.
    scene.add_sphere(
        Point3D { x: 0.0, y: 3.0, z: 0.0 },
        1.0,
        surface(Color::white(), PhongModel::default()),
    ).unwrap();

    scene.add_point_light(Color::white(), Point3D { x: 0.0, y: 10.0, z: 0.0 }).unwrap();
    scene.add_ambient_light(Color::white()).unwrap();

    let ray = Ray::new(
        Point3D { x: 0.0, y: 1.0, z: 1.0 },
        Vector3D { x: 0.0, y: -1.0, z: -1.0 },
        0,
    );

    // The ambient light comes after the shadowed point light and is skipped.
    let r = Renderer::default();
    assert_eq!(r.color_at(&ray, &scene), Color::black());

    scene.remove_light(0);
    assert_eq!(r.color_at(&ray, &scene), Color::rgb(0.5, 0.5, 0.5));
}

#[test]
fn point_light_on_surface_shadows_itself() {
    use crate::tuple::{ Point3D, Vector3D };
    use crate::surface::PhongModel;
    use fixtures::*;

    let phong = PhongModel { ambient: 0.5, diffuse: 0.5, ..Default::default() };
    let mut scene = sphere_scene(surface(Color::white(), phong));

    // Exactly where the ray below meets the sphere.
    scene.add_point_light(Color::white(), Point3D { x: 0.0, y: 0.0, z: 1.0 }).unwrap();
    scene.add_ambient_light(Color::white()).unwrap();

    let ray = Ray::new(
        Point3D { x: 0.0, y: 0.0, z: 5.0 },
        Vector3D { x: 0.0, y: 0.0, z: -1.0 },
        0,
    );

    // The light stops the loop, so the ambient light after it is skipped.
    let r = Renderer::default();
    assert_eq!(r.color_at(&ray, &scene), Color::black());

    scene.remove_light(0);
    assert_eq!(r.color_at(&ray, &scene), Color::rgb(0.5, 0.5, 0.5));
}

#[test]
fn reflection_counts_twice_at_last_bounce() {
    use crate::tuple::{ Point3D, Vector3D };
    use crate::surface::PhongModel;
    use fixtures::*;

    let phong = PhongModel { reflectance: 0.25, ..Default::default() };
    let scene = sphere_scene(surface(Color::white(), phong));
    let mut r = Renderer::default();
    r.set_background(Color::rgb(0.4, 0.4, 0.4));

    let ray = |bounces| Ray::new(
        Point3D { x: 0.0, y: 0.0, z: 5.0 },
        Vector3D { x: 0.0, y: 0.0, z: -1.0 },
        bounces,
    );

    // The reflected ray heads straight back out and hits nothing.
    assert_eq!(r.color_at(&ray(1), &scene), Color::rgb(0.1, 0.1, 0.1));
    assert_eq!(r.color_at(&ray(0), &scene), Color::rgb(0.2, 0.2, 0.2));
}

#[test]
fn facing_mirrors_terminate() {
    use crate::tuple::{ Point3D, Vector3D };
    use crate::surface::lookup;

    let mut scene = Scene::new();
    let mirror = lookup("mirror").unwrap();
    scene.add_plane(
        Vector3D { x: 0.0, y: 0.0, z: 1.0 },
        Point3D { x: 0.0, y: 0.0, z: -1.0 },
        mirror.clone(),
    ).unwrap();
    scene.add_plane(
        Vector3D { x: 0.0, y: 0.0, z: -1.0 },
        Point3D { x: 0.0, y: 0.0, z: 1.0 },
        mirror,
    ).unwrap();
    scene.add_ambient_light(Color::white()).unwrap();

    let mut r = Renderer::default();
    r.set_background(Color::white());

    let ray = Ray::new(Point3D::ORIGIN, Vector3D { x: 0.0, y: 0.0, z: -1.0 }, 16);
    let c = r.color_at(&ray, &scene);

    assert!(c.in_unit_range());
}

#[test]
fn extreme_lighting_is_clamped() {
    use crate::tuple::{ Point3D, Vector3D };
    use crate::surface::PhongModel;
    use fixtures::*;

    let phong = PhongModel {
        ambient: 1.0,
        diffuse: 1.0,
        specular: 1.0,
        exponent: 1.0,
        reflectance: 1.0,
        ..Default::default()
    };
    let mut scene = sphere_scene(surface(Color::white(), phong));
    for _ in 0..5 {
        scene.add_ambient_light(Color::white()).unwrap();
        scene.add_directional_light(Color::white(), Vector3D { x: 0.0, y: 0.0, z: -1.0 })
            .unwrap();
    }

    let camera = Camera::new(16, 16).unwrap();
    let r = Renderer::new(Color::white(), 3).unwrap();

    for j in 0..16 {
        for i in 0..16 {
            let c = r.render_pixel(i, j, &scene, &camera);
            assert!(c.in_unit_range(), "pixel ({}, {}) = {:?}", i, j, c);
        }
    }

    let ray = Ray::new(
        Point3D { x: 0.0, y: 0.0, z: 5.0 },
        Vector3D { x: 0.0, y: 0.0, z: -1.0 },
        0,
    );
    assert_eq!(r.color_at(&ray, &scene), Color::white());
}

#[test]
fn reject_negative_bounces() {
    assert!(Renderer::new(Color::black(), -1).is_err());

    let mut r = Renderer::default();
    assert!(r.set_max_bounces(-3).is_err());
    assert_eq!(r.max_bounces(), MAX_BOUNCES);
}
