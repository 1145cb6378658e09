use std::time::Instant;

use log::{ debug, info };
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::scene::Scene;
use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::renderer::Renderer;
use crate::error::{ Result, TraceError };

/// Renders a full image on rayon's global pool.
///
/// Rows are handed out to the workers; every worker writes only the row it
/// was given, so the canvas needs no locking.
pub fn render(scene: &Scene, camera: &Camera, renderer: &Renderer) -> Canvas {
    let (width, height) = (camera.width(), camera.height());
    let mut canvas = Canvas::new(width, height);

    info!("Rendering {}x{} image using {} threads...",
        width, height, rayon::current_num_threads());
    debug!("{} objects, {} lights, {} bounces",
        scene.objects().len(), scene.lights().len(), renderer.max_bounces());

    let start = Instant::now();

    canvas.rows_mut()
        .enumerate()
        .for_each(|(j, row)| {
            for (i, pixel) in row.iter_mut().enumerate() {
                *pixel = renderer.render_pixel(i, j, scene, camera);
            }
        });

    info!("...done in {:.2?}", start.elapsed());
    canvas
}

/// Renders on a dedicated pool of `threads` workers, or on the global pool
/// when `threads` is `None`.
pub fn render_with_threads(scene: &Scene, camera: &Camera, renderer: &Renderer,
    threads: Option<usize>) -> Result<Canvas> {
    match threads {
        None => Ok(render(scene, camera, renderer)),
        Some(0) => Err(TraceError::InvalidThreadCount),
        Some(n) => {
            let pool = ThreadPoolBuilder::new().num_threads(n).build()?;
            Ok(pool.install(|| render(scene, camera, renderer)))
        }
    }
}

#[cfg(test)]
fn test_setup() -> (Scene, Camera, Renderer) {
    use crate::color::Color;
    use crate::tuple::{ Point3D, Vector3D };
    use crate::surface::lookup;

    let mut scene = Scene::new();
    scene.add_sphere(Point3D::ORIGIN, 1.5, lookup("gold").unwrap()).unwrap();
    scene.add_plane(
        Vector3D { x: 0.0, y: 1.0, z: 0.0 },
        Point3D { x: 0.0, y: -2.0, z: 0.0 },
        lookup("mirror").unwrap(),
    ).unwrap();
    scene.add_ambient_light(Color::rgb(0.5, 0.5, 0.5)).unwrap();
    scene.add_point_light(Color::white(), Point3D { x: 4.0, y: 6.0, z: 8.0 }).unwrap();

    let camera = Camera::new(24, 16).unwrap();
    let renderer = Renderer::new(Color::from_rgb8(20, 20, 25), 3).unwrap();

    (scene, camera, renderer)
}

#[test]
fn parallel_matches_sequential() {
    let (scene, camera, renderer) = test_setup();
    let canvas = render(&scene, &camera, &renderer);

    assert_eq!((canvas.width, canvas.height), (24, 16));
    for j in 0..16 {
        for i in 0..24 {
            assert_eq!(
                canvas.read_pixel(i, j).unwrap(),
                renderer.render_pixel(i, j, &scene, &camera),
            );
        }
    }
}

#[test]
fn thread_count_does_not_change_image() {
    let (scene, camera, renderer) = test_setup();

    let one = render_with_threads(&scene, &camera, &renderer, Some(1)).unwrap();
    let many = render_with_threads(&scene, &camera, &renderer, Some(4)).unwrap();
    let global = render_with_threads(&scene, &camera, &renderer, None).unwrap();

    assert_eq!(one, many);
    assert_eq!(one, global);
}

#[test]
fn reject_zero_threads() {
    let (scene, camera, renderer) = test_setup();

    assert!(matches!(
        render_with_threads(&scene, &camera, &renderer, Some(0)),
        Err(TraceError::InvalidThreadCount)
    ));
}
