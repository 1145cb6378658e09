use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use serde::{ Serialize, Deserialize };

use crate::consts::*;
use crate::scene::Scene;
use crate::color::Color;
use crate::camera::Camera;
use crate::renderer::Renderer;
use crate::tuple::{ Point3D, Vector3D };
use crate::surface::{ self, PhongModel, Surface };
use crate::error::{ Result, TraceError };

/// Everything needed to render an image.
pub struct Setup {
    pub scene: Scene,
    pub camera: Camera,
    pub renderer: Renderer,
}

/// A complete render described in JSON.
///
/// Only `objects` is required; the camera, canvas, background, bounce limit,
/// custom surfaces and lights all have defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDescription {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_fov")]
    pub field_of_view: f64,

    #[serde(default = "default_eye")]
    pub eye: [f64; 3],
    #[serde(default = "default_look_at")]
    pub look_at: [f64; 3],
    #[serde(default = "default_up")]
    pub up: [f64; 3],

    #[serde(default)]
    pub background: [u8; 3],
    #[serde(default = "default_bounces")]
    pub max_bounces: i32,

    /// Surfaces defined by the file, shadowing presets of the same name.
    #[serde(default)]
    pub surfaces: HashMap<String, SurfaceDescription>,

    pub objects: Vec<ObjectDescription>,
    #[serde(default)]
    pub lights: Vec<LightDescription>,
}

fn triple((x, y, z): (f64, f64, f64)) -> [f64; 3] {
    [x, y, z]
}

fn default_width() -> usize { DEFAULT_WIDTH }
fn default_height() -> usize { DEFAULT_HEIGHT }
fn default_fov() -> f64 { DEFAULT_FOV }
fn default_eye() -> [f64; 3] { triple(DEFAULT_EYE) }
fn default_look_at() -> [f64; 3] { triple(DEFAULT_LOOK_AT) }
fn default_up() -> [f64; 3] { triple(DEFAULT_UP) }
fn default_bounces() -> i32 { MAX_BOUNCES }

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurfaceDescription {
    pub color: [f64; 3],
    #[serde(default)]
    pub ambient: f64,
    #[serde(default)]
    pub diffuse: f64,
    #[serde(default)]
    pub specular: f64,
    #[serde(default)]
    pub exponent: f64,
    #[serde(default)]
    pub reflectance: f64,
    #[serde(default)]
    pub transmission: f64,
    #[serde(default = "unit_index")]
    pub refractive_index: f64,
}

fn unit_index() -> f64 {
    1.0
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum ObjectDescription {
    Sphere { center: [f64; 3], radius: f64, surface: String },
    Plane { normal: [f64; 3], point: [f64; 3], surface: String },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum LightDescription {
    Ambient { intensity: [f64; 3] },
    Directional { intensity: [f64; 3], direction: [f64; 3] },
    Point { intensity: [f64; 3], position: [f64; 3] },
}

fn point([x, y, z]: [f64; 3]) -> Result<Point3D> {
    Point3D::new(x, y, z)
}

fn vector([x, y, z]: [f64; 3]) -> Result<Vector3D> {
    Vector3D::new(x, y, z)
}

fn color([r, g, b]: [f64; 3]) -> Color {
    Color::rgb(r, g, b)
}

impl SurfaceDescription {
    fn build(&self) -> Result<Surface> {
        Surface::new(color(self.color), PhongModel {
            ambient: self.ambient,
            diffuse: self.diffuse,
            specular: self.specular,
            exponent: self.exponent,
            reflectance: self.reflectance,
            transmission: self.transmission,
            refractive_index: self.refractive_index,
        })
    }
}

impl SceneDescription {
    /// Parses a description from a JSON string.
    ///
    /// ```
    /// # use phong_ray_tracer::description::SceneDescription;
    /// let d = SceneDescription::from_json(r#"{ "objects": [] }"#).unwrap();
    /// assert_eq!((d.width, d.height), (860, 640));
    /// ```
    pub fn from_json(json: &str) -> Result<SceneDescription> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a description file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<SceneDescription> {
        let path = path.as_ref();
        debug!("Loading scene description from {}", path.display());

        let json = fs::read_to_string(path)?;
        SceneDescription::from_json(&json)
    }

    /// Validates the description and builds the scene, camera and renderer.
    pub fn build(&self) -> Result<Setup> {
        let mut surfaces = HashMap::new();
        for (name, s) in self.surfaces.iter() {
            surfaces.insert(name.as_str(), Arc::new(s.build()?));
        }

        let resolve = |name: &str| -> Result<Arc<Surface>> {
            surfaces.get(name)
                .cloned()
                .or_else(|| surface::lookup(name))
                .ok_or_else(|| TraceError::UnknownSurface(name.to_string()))
        };

        let mut scene = Scene::new();
        for object in self.objects.iter() {
            match object {
                ObjectDescription::Sphere { center, radius, surface: name } => {
                    let surface = resolve(name.as_str())?;
                    scene.add_sphere(point(*center)?, *radius, surface)?;
                },
                ObjectDescription::Plane { normal, point: p, surface: name } => {
                    let surface = resolve(name.as_str())?;
                    scene.add_plane(vector(*normal)?, point(*p)?, surface)?;
                },
            }
        }

        for light in self.lights.iter() {
            match light {
                LightDescription::Ambient { intensity } => {
                    scene.add_ambient_light(color(*intensity))?;
                },
                LightDescription::Directional { intensity, direction } => {
                    scene.add_directional_light(color(*intensity), vector(*direction)?)?;
                },
                LightDescription::Point { intensity, position } => {
                    scene.add_point_light(color(*intensity), point(*position)?)?;
                },
            }
        }

        let camera = Camera::looking_at(
            point(self.eye)?,
            point(self.look_at)?,
            vector(self.up)?,
            self.width,
            self.height,
            self.field_of_view,
        )?;

        let [r, g, b] = self.background;
        let renderer = Renderer::new(Color::from_rgb8(r, g, b), self.max_bounces)?;

        debug!("Built scene with {} objects and {} lights",
            scene.objects().len(), scene.lights().len());

        Ok(Setup { scene, camera, renderer })
    }
}

#[cfg(test)]
const EXAMPLE: &str = r#"{
  "width": 32, "height": 24, "field_of_view": 60.0,
  "eye": [0, 0, 10], "look_at": [0, 0, 0], "up": [0, 1, 0],
  "background": [20, 20, 25], "max_bounces": 4,
  "surfaces": { "chalk": { "color": [1, 1, 1], "ambient": 0.2, "diffuse": 0.8 } },
  "objects": [
    { "type": "sphere", "center": [0, 0, 0], "radius": 1, "surface": "gold" },
    { "type": "plane", "normal": [0, 1, 0], "point": [0, -1, 0], "surface": "chalk" }
  ],
  "lights": [
    { "type": "ambient", "intensity": [0.2, 0.2, 0.2] },
    { "type": "directional", "intensity": [1, 1, 1], "direction": [1, -5, -4] },
    { "type": "point", "intensity": [1, 1, 1], "position": [5, 5, 5] }
  ]
}"#;

#[test]
fn build_full_description() {
    use crate::geometry::Renderable;

    let setup = SceneDescription::from_json(EXAMPLE).unwrap().build().unwrap();

    assert_eq!(setup.scene.objects().len(), 2);
    assert_eq!(setup.scene.lights().len(), 3);
    assert_eq!((setup.camera.width(), setup.camera.height()), (32, 24));
    assert_eq!(setup.camera.fov(), 60.0);
    assert_eq!(setup.renderer.background(), Color::from_rgb8(20, 20, 25));
    assert_eq!(setup.renderer.max_bounces(), 4);

    match &setup.scene.objects()[1] {
        Renderable::Plane(p) => {
            assert_eq!(p.normal(), Vector3D { x: 0.0, y: 1.0, z: 0.0 });
            assert_eq!(p.offset(), -1.0);
        },
        other => panic!("expected a plane, got {}", other),
    }

    let chalk = setup.scene.objects()[1].surface();
    assert_eq!(chalk.phong().diffuse, 0.8);
    assert_eq!(chalk.phong().refractive_index, 1.0);
}

#[test]
fn objects_are_required() {
    assert!(matches!(SceneDescription::from_json("{}"), Err(TraceError::Json(_))));
}

#[test]
fn defaults_fill_missing_fields() {
    let d = SceneDescription::from_json(r#"{ "objects": [] }"#).unwrap();
    let setup = d.build().unwrap();

    assert_eq!((setup.camera.width(), setup.camera.height()), (860, 640));
    assert_eq!(setup.camera.fov(), 50.0);
    assert_eq!(setup.camera.eye(), Point3D { x: 0.0, y: 0.0, z: 10.0 });
    assert_eq!(setup.renderer, Renderer::default());
    assert!(setup.scene.lights().is_empty());
}

#[test]
fn file_surfaces_shadow_presets() {
    let json = r#"{
      "surfaces": { "gold": { "color": [0, 0, 1], "diffuse": 1 } },
      "objects": [
        { "type": "sphere", "center": [0, 0, 0], "radius": 1, "surface": "gold" }
      ]
    }"#;

    let setup = SceneDescription::from_json(json).unwrap().build().unwrap();
    let gold = setup.scene.objects()[0].surface();
    assert_eq!(gold.color(), Color::rgb(0.0, 0.0, 1.0));
}

#[test]
fn unknown_surface_is_an_error() {
    let json = r#"{
      "objects": [
        { "type": "sphere", "center": [0, 0, 0], "radius": 1, "surface": "plaid" }
      ]
    }"#;

    let result = SceneDescription::from_json(json).unwrap().build();
    assert!(matches!(result, Err(TraceError::UnknownSurface(ref s)) if s == "plaid"));
}

#[test]
fn invalid_values_are_rejected() {
    let bad_radius = r#"{
      "objects": [
        { "type": "sphere", "center": [0, 0, 0], "radius": -1, "surface": "gold" }
      ]
    }"#;
    let bad_light = r#"{
      "objects": [],
      "lights": [ { "type": "point", "intensity": [2, 0, 0], "position": [0, 0, 0] } ]
    }"#;
    let bad_bounces = r#"{ "objects": [], "max_bounces": -2 }"#;

    for json in [bad_radius, bad_light, bad_bounces].iter() {
        assert!(SceneDescription::from_json(json).unwrap().build().is_err());
    }

    assert!(matches!(
        SceneDescription::from_json(r#"{ "objects": [ { "type": "cube" } ] }"#),
        Err(TraceError::Json(_))
    ));
}

#[test]
fn load_from_file() {
    let dir = std::env::temp_dir().join(format!("phong-description-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("scene.json");
    std::fs::write(&path, EXAMPLE).unwrap();

    let setup = SceneDescription::load(&path).unwrap().build().unwrap();
    assert_eq!(setup.scene.objects().len(), 2);

    assert!(matches!(
        SceneDescription::load(dir.join("missing.json")),
        Err(TraceError::Io(_))
    ));
}
