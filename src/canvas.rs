use std::fs;
use std::io::{ BufWriter, Write };
use std::fs::File;
use std::path::Path;

use image::{ ImageFormat, Rgb, RgbImage };
use log::info;
use rayon::prelude::*;
use rayon::slice::ChunksMut;

use crate::color::Color;
use crate::error::Result;

const PPM_LINE_WIDTH: usize = 70;

/// A canvas for drawing pixels.
///
/// The renderer fills the canvas one row at a time; once it is complete the
/// canvas can be saved as a PPM or PNG image.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored row by row.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// A parallel iterator over mutable rows of the canvas, top row first.
    ///
    /// Each slice is `width` pixels long. A canvas without pixels yields no
    /// rows.
    pub fn rows_mut(&mut self) -> ChunksMut<'_, Color> {
        // par_chunks_mut panics on a zero chunk size
        let width = self.width.max(1);
        self.pixels.par_chunks_mut(width)
    }

    /// Saves the canvas to `path`.
    ///
    /// A `.ppm` extension writes a plain PPM; anything else is written as
    /// PNG. Missing parent directories are created.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let is_ppm = path.extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            self.save_ppm(path)?;
        } else {
            self.to_rgb_image().save_with_format(path, ImageFormat::Png)?;
        }

        info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }

    /// Writes a plain (P3) PPM file.
    ///
    /// Lines in the PPM file are at most 70 columns wide. A channel value
    /// which would cross the 70 column mark starts the next line instead.
    fn save_ppm(&self, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);

        writeln!(&mut out, "P3")?;
        writeln!(&mut out, "{} {}", self.width, self.height)?;
        writeln!(&mut out, "255")?; // Maximum color value

        // Channel values are written one at a time; `col` counts the
        // characters already on the current line.
        let mut col = 0;
        for pixel in self.pixels.iter() {
            for value in pixel.to_rgb8().iter() {
                let value = value.to_string();
                let sep = if col > 0 { 1 } else { 0 };

                if col + sep + value.len() > PPM_LINE_WIDTH {
                    write!(&mut out, "\n{}", value)?;
                    col = value.len();
                } else {
                    if sep == 1 {
                        write!(&mut out, " ")?;
                    }

                    write!(&mut out, "{}", value)?;
                    col += sep + value.len();
                }
            }
        }

        writeln!(&mut out)?;
        out.flush()?;

        Ok(())
    }

    /// Converts the canvas to an 8-bit RGB image.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let pixel = self.pixels[y as usize * self.width + x as usize];
            Rgb(pixel.to_rgb8())
        })
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. `x` is the column and `y` the row,
    /// both zero-indexed from the top-left corner.
    ///
    /// # Examples
    ///
    /// ```
    /// # use phong_ray_tracer::color::Color;
    /// # use phong_ray_tracer::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`, or `None` if it is
    /// out-of-bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }
}

#[cfg(test)]
fn scratch_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("phong-ray-tracer-{}", std::process::id()))
        .join(name)
}

#[test]
fn rows_cover_canvas() {
    let mut c = Canvas::new(3, 2);
    c.rows_mut().enumerate().for_each(|(y, row)| {
        assert_eq!(row.len(), 3);
        row[y] = Color::white();
    });

    assert_eq!(c.read_pixel(0, 0), Some(Color::white()));
    assert_eq!(c.read_pixel(1, 1), Some(Color::white()));
    assert_eq!(c.read_pixel(1, 0), Some(Color::black()));
    assert_eq!(c.read_pixel(3, 0), None);
}

#[test]
fn empty_canvas_has_no_rows() {
    let mut c = Canvas::new(0, 0);
    assert_eq!(c.rows_mut().count(), 0);
}

#[test]
fn rgb_image_matches_pixels() {
    let mut c = Canvas::new(2, 2);
    c.write_pixel(1, 0, &Color::rgb(1.0, 0.5, 0.0));

    let img = c.to_rgb_image();
    assert_eq!(img.dimensions(), (2, 2));
    assert_eq!(img.get_pixel(1, 0), &Rgb([255, 128, 0]));
    assert_eq!(img.get_pixel(0, 1), &Rgb([0, 0, 0]));
}

#[test]
fn save_ppm_header_and_wrapping() {
    let mut c = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            c.write_pixel(x, y, &Color::rgb(1.0, 0.8, 0.6));
        }
    }

    let path = scratch_path("wrap.ppm");
    c.save(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(&lines[..3], &["P3", "10 2", "255"]);
    assert!(lines[3..].iter().all(|l| l.len() <= 70));
    assert!(lines[3..].iter().all(|l| !l.starts_with(' ') && !l.ends_with(' ')));
    assert!(lines[3].starts_with("255 204 153 255 204 153"));

    // 17 three-digit values fill 67 columns; an 18th would need 71.
    assert_eq!(lines[3].len(), 67);

    let values: Vec<&str> = lines[3..].iter().flat_map(|l| l.split(' ')).collect();
    assert_eq!(values.len(), 10 * 2 * 3);
    assert!(text.ends_with('\n'));
}

#[test]
fn save_png_creates_directories() {
    let mut c = Canvas::new(4, 3);
    c.write_pixel(2, 1, &Color::white());

    let path = scratch_path("nested/dir/out.png");
    c.save(&path).unwrap();

    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (4, 3));
    assert_eq!(img.get_pixel(2, 1), &Rgb([255, 255, 255]));
}
