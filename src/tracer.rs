use std::path::{ Path, PathBuf };
use std::sync::Arc;

use log::{ debug, info };

use crate::parallel;
use crate::scene::Scene;
use crate::color::Color;
use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::renderer::Renderer;
use crate::surface::{ self, Surface };
use crate::tuple::{ Point3D, Vector3D };
use crate::consts::{ DEFAULT_HEIGHT, DEFAULT_SURFACE, DEFAULT_WIDTH };
use crate::error::{ Result, TraceError };

/// A stateful front end for building and rendering scenes.
///
/// Objects are added with the *current surface*, which starts out as
/// `"matte black"` and can be switched to any preset between additions.
///
/// ```no_run
/// # use phong_ray_tracer::tracer::RayTracer;
/// # use phong_ray_tracer::tuple::Point3D;
/// # fn main() -> phong_ray_tracer::error::Result<()> {
/// let mut tracer = RayTracer::new()?;
/// tracer.set_current_surface("gold")?;
/// tracer.add_sphere(Point3D::new(0.0, 0.0, 0.0)?, 1.0)?;
/// tracer.add_ambient_light(0.8, 0.8, 0.8)?;
/// tracer.render_image();
/// tracer.save_image("render.png")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct RayTracer {
    scene: Scene,
    camera: Camera,
    renderer: Renderer,
    current_surface: Arc<Surface>,
    canvas: Option<Canvas>,
}

impl RayTracer {
    pub fn new() -> Result<RayTracer> {
        Ok(RayTracer {
            scene: Scene::new(),
            camera: Camera::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)?,
            renderer: Renderer::default(),
            current_surface: lookup(DEFAULT_SURFACE)?,
            canvas: None,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn current_surface(&self) -> &Arc<Surface> {
        &self.current_surface
    }

    /// Switches the surface used for objects added from now on.
    pub fn set_current_surface(&mut self, name: &str) -> Result<()> {
        self.current_surface = lookup(name)?;
        debug!("Current surface is now {:?}", name);
        Ok(())
    }

    pub fn add_sphere(&mut self, center: Point3D, radius: f64) -> Result<()> {
        self.scene.add_sphere(center, radius, self.current_surface.clone())
    }

    pub fn add_plane(&mut self, normal: Vector3D, point: Point3D) -> Result<()> {
        self.scene.add_plane(normal, point, self.current_surface.clone())
    }

    pub fn add_ambient_light(&mut self, r: f64, g: f64, b: f64) -> Result<()> {
        self.scene.add_ambient_light(Color::rgb(r, g, b))
    }

    pub fn add_directional_light(&mut self, r: f64, g: f64, b: f64,
        direction: Vector3D) -> Result<()> {
        self.scene.add_directional_light(Color::rgb(r, g, b), direction)
    }

    pub fn add_point_light(&mut self, r: f64, g: f64, b: f64,
        position: Point3D) -> Result<()> {
        self.scene.add_point_light(Color::rgb(r, g, b), position)
    }

    pub fn set_max_bounces(&mut self, bounces: i32) -> Result<()> {
        self.renderer.set_max_bounces(bounces)
    }

    /// Moves the camera, keeping its up vector, size and field of view.
    pub fn set_camera(&mut self, eye: Point3D, look_at: Point3D) -> Result<()> {
        let camera = Camera::looking_at(eye, look_at, self.camera.up(),
            self.camera.width(), self.camera.height(), self.camera.fov())?;
        self.camera = camera;
        Ok(())
    }

    pub fn set_camera_full(&mut self, eye: Point3D, look_at: Point3D,
        up: Vector3D, width: usize, height: usize, fov: f64) -> Result<()> {
        self.camera = Camera::looking_at(eye, look_at, up, width, height, fov)?;
        Ok(())
    }

    pub fn set_camera_dimensions(&mut self, width: usize, height: usize)
        -> Result<()> {
        self.camera.set_dimensions(width, height)
    }

    /// Sets the background from 8-bit channels.
    pub fn set_background_color(&mut self, r: u8, g: u8, b: u8) {
        self.renderer.set_background(Color::from_rgb8(r, g, b));
    }

    /// Removes every object and light. Camera, renderer and current surface
    /// are kept.
    pub fn clear_scene(&mut self) {
        self.scene.clear();
    }

    /// Renders the scene in parallel and keeps the result.
    pub fn render_image(&mut self) -> &Canvas {
        let canvas = parallel::render(&self.scene, &self.camera, &self.renderer);
        self.canvas.insert(canvas)
    }

    /// The last rendered image, if any.
    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    /// Saves the last rendered image as PNG, rendering first if nothing has
    /// been rendered yet.
    ///
    /// Everything in the file name from the first `.` on is replaced by
    /// `.png`, so `"scene.v2.jpg"` is written as `"scene.png"`. Returns the
    /// path actually written.
    pub fn save_image<P: AsRef<Path>>(&mut self, filename: P) -> Result<PathBuf> {
        let path = png_path(filename.as_ref());

        if self.canvas.is_none() {
            self.render_image();
        }

        if let Some(canvas) = &self.canvas {
            canvas.save(&path)?;
        }

        Ok(path)
    }

    /// Replaces the scene with the built-in demo: gold, blue rubber and
    /// mirror spheres over an emerald plane, lit by an ambient and a
    /// directional light.
    pub fn load_test_scene(&mut self) -> Result<()> {
        self.clear_scene();
        self.set_max_bounces(0)?;
        self.set_background_color(20, 20, 25);
        self.set_camera(
            Point3D::new(-1.4, 0.3, 7.0)?,
            Point3D::new(-0.5, 0.7, -12.0)?,
        )?;

        self.set_current_surface("gold")?;
        self.add_sphere(Point3D::new(-1.5, -1.0, 3.0)?, 0.9)?;
        self.add_sphere(Point3D::new(-0.5, 1.9, -12.0)?, 0.5)?;

        self.set_current_surface("blue rubber")?;
        self.add_sphere(Point3D::new(-0.5, 0.7, -12.0)?, 0.7)?;
        self.add_sphere(Point3D::new(-0.5, -5.0, -12.0)?, 5.0)?;

        self.set_current_surface("mirror")?;
        self.add_sphere(Point3D::new(0.0, 0.0, -2500.0)?, 500.0)?;
        self.add_sphere(Point3D::new(-1.5, 0.1, 3.0)?, 0.2)?;

        self.set_current_surface("emerald")?;
        self.add_plane(Vector3D::new(0.0, 2.0, 0.0)?, Point3D::new(0.0, -200.0, -320.0)?)?;

        self.add_ambient_light(0.8, 0.8, 0.8)?;
        self.add_directional_light(1.0, 1.0, 1.0, Vector3D::new(1.0, -5.0, -4.0)?)?;

        info!("Loaded test scene");
        Ok(())
    }
}

fn lookup(name: &str) -> Result<Arc<Surface>> {
    surface::lookup(name).ok_or_else(|| TraceError::UnknownSurface(name.to_string()))
}

/// Keeps the directory part of `filename` and cuts its file name at the
/// first `.`, then appends `.png`.
fn png_path(filename: &Path) -> PathBuf {
    let name = filename.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let base = match name.find('.') {
        Some(i) => &name[..i],
        None => name.as_str(),
    };

    filename.with_file_name(format!("{}.png", base))
}

#[test]
fn new_tracer_defaults() {
    let t = RayTracer::new().unwrap();

    assert_eq!(t.current_surface(), &surface::lookup("matte black").unwrap());
    assert_eq!((t.camera().width(), t.camera().height()), (860, 640));
    assert_eq!(t.renderer(), &Renderer::default());
    assert!(t.scene().objects().is_empty());
    assert!(t.canvas().is_none());
}

#[test]
fn objects_use_current_surface() {
    let mut t = RayTracer::new().unwrap();
    t.add_sphere(Point3D::ORIGIN, 1.0).unwrap();
    t.set_current_surface("silver").unwrap();
    t.add_plane(Vector3D { x: 0.0, y: 1.0, z: 0.0 }, Point3D::ORIGIN).unwrap();

    let objects = t.scene().objects();
    assert_eq!(objects[0].surface(), &surface::lookup("matte black").unwrap());
    assert_eq!(objects[1].surface(), &surface::lookup("silver").unwrap());
}

#[test]
fn unknown_surface_keeps_current() {
    let mut t = RayTracer::new().unwrap();
    t.set_current_surface("gold").unwrap();

    assert!(matches!(
        t.set_current_surface("velvet"),
        Err(TraceError::UnknownSurface(_))
    ));
    assert_eq!(t.current_surface(), &surface::lookup("gold").unwrap());
}

#[test]
fn invalid_camera_is_rejected() {
    let mut t = RayTracer::new().unwrap();
    let before = t.camera().clone();

    assert!(t.set_camera(Point3D::ORIGIN, Point3D::ORIGIN).is_err());
    assert!(t.set_camera_dimensions(0, 0).is_err());
    assert!(t.set_max_bounces(-1).is_err());
    assert_eq!(t.camera(), &before);
}

#[test]
fn png_path_strips_extensions() {
    assert_eq!(png_path(Path::new("render")), PathBuf::from("render.png"));
    assert_eq!(png_path(Path::new("render.png")), PathBuf::from("render.png"));
    assert_eq!(png_path(Path::new("scene.v2.jpg")), PathBuf::from("scene.png"));
    assert_eq!(png_path(Path::new("out.d/final.ppm")), PathBuf::from("out.d/final.png"));
}

#[test]
fn test_scene_renders() {
    let mut t = RayTracer::new().unwrap();
    t.load_test_scene().unwrap();

    assert_eq!(t.scene().objects().len(), 7);
    assert_eq!(t.scene().lights().len(), 2);
    assert_eq!(t.renderer().max_bounces(), 0);
    assert_eq!(t.renderer().background(), Color::from_rgb8(20, 20, 25));

    t.set_camera_dimensions(43, 32).unwrap();
    let canvas = t.render_image();
    assert_eq!((canvas.width, canvas.height), (43, 32));

    // Loading again replaces rather than appends.
    t.load_test_scene().unwrap();
    assert_eq!(t.scene().objects().len(), 7);
}

#[test]
fn save_image_writes_png() {
    let dir = std::env::temp_dir().join(format!("phong-tracer-{}", std::process::id()));

    let mut t = RayTracer::new().unwrap();
    t.set_camera_dimensions(8, 6).unwrap();
    t.add_sphere(Point3D::ORIGIN, 1.0).unwrap();

    let written = t.save_image(dir.join("shot.final.bmp")).unwrap();
    assert_eq!(written, dir.join("shot.png"));
    assert!(written.exists());
    assert!(t.canvas().is_some());
}
