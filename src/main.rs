use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use phong_ray_tracer::surface;
use phong_ray_tracer::parallel;
use phong_ray_tracer::consts::OUT_FILE;
use phong_ray_tracer::tracer::RayTracer;
use phong_ray_tracer::description::{ SceneDescription, Setup };

/// Render spheres and planes with a recursive Phong ray tracer.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// JSON scene description; renders the built-in test scene if omitted
    #[clap(long)]
    scene: Option<PathBuf>,

    /// Output image, PPM for a `.ppm` extension and PNG otherwise
    #[clap(short, long, default_value = OUT_FILE)]
    output: PathBuf,

    /// Number of worker threads
    #[clap(long)]
    threads: Option<usize>,

    /// Override the scene's reflection depth
    #[clap(long)]
    max_bounces: Option<i32>,

    /// Override the image width
    #[clap(long)]
    width: Option<usize>,

    /// Override the image height
    #[clap(long)]
    height: Option<usize>,

    /// Print the predefined surface names and exit
    #[clap(long)]
    list_surfaces: bool,
}

fn test_scene() -> anyhow::Result<Setup> {
    let mut tracer = RayTracer::new()?;
    tracer.load_test_scene()?;

    Ok(Setup {
        scene: tracer.scene().clone(),
        camera: tracer.camera().clone(),
        renderer: *tracer.renderer(),
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.list_surfaces {
        for name in surface::preset_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let Setup { scene, mut camera, mut renderer } = match &args.scene {
        Some(path) => {
            info!("Loading scene from {}", path.display());
            SceneDescription::load(path)
                .and_then(|d| d.build())
                .with_context(|| format!("could not load scene {}", path.display()))?
        },
        None => test_scene().context("could not build the test scene")?,
    };

    if let Some(bounces) = args.max_bounces {
        renderer.set_max_bounces(bounces)?;
    }

    if args.width.is_some() || args.height.is_some() {
        let width = args.width.unwrap_or_else(|| camera.width());
        let height = args.height.unwrap_or_else(|| camera.height());
        camera.set_dimensions(width, height)?;
    }

    let canvas = parallel::render_with_threads(&scene, &camera, &renderer, args.threads)?;
    canvas.save(&args.output)
        .with_context(|| format!("could not save image to {}", args.output.display()))?;

    Ok(())
}
