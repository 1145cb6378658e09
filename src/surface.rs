use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::color::Color;
use crate::error::{ Result, TraceError };

/// Coefficients of the Phong reflection model, plus the transmission
/// parameters a surface carries.
///
/// Transmission and refractive index are stored but no transmitted rays are
/// ever traced.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhongModel {
    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,

    /// Sharpness of specular highlights.
    pub exponent: f64,

    pub reflectance: f64,
    pub transmission: f64,
    pub refractive_index: f64,
}

impl Default for PhongModel {
    fn default() -> PhongModel {
        PhongModel {
            ambient: 0.0,
            diffuse: 0.0,
            specular: 0.0,
            exponent: 0.0,
            reflectance: 0.0,
            transmission: 0.0,
            refractive_index: 1.0,
        }
    }
}

/// A material: an intrinsic color and how it interacts with light.
///
/// Surfaces are immutable once built. Primitives hold them through an `Arc`,
/// so one surface can back any number of spheres and planes.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    color: Color,
    phong: PhongModel,
}

impl Surface {
    /// Creates a surface, validating the color and the Phong coefficients.
    ///
    /// Color channels and the ambient, diffuse, specular, reflectance and
    /// transmission coefficients must all lie within `[0, 1]`.
    ///
    /// ```
    /// # use phong_ray_tracer::color::Color;
    /// # use phong_ray_tracer::surface::{ Surface, PhongModel };
    /// let chalk = Surface::new(Color::white(), PhongModel {
    ///     ambient: 0.2,
    ///     diffuse: 0.8,
    ///     ..Default::default()
    /// });
    /// assert!(chalk.is_ok());
    ///
    /// let glowing = Surface::new(Color::white(), PhongModel {
    ///     diffuse: 1.5,
    ///     ..Default::default()
    /// });
    /// assert!(glowing.is_err());
    /// ```
    pub fn new(color: Color, phong: PhongModel) -> Result<Surface> {
        if !color.in_unit_range() {
            return Err(TraceError::ColorOutOfRange {
                r: color.r, g: color.g, b: color.b,
            });
        }

        let coefficients = [
            ("ambient", phong.ambient),
            ("diffuse", phong.diffuse),
            ("specular", phong.specular),
            ("reflectance", phong.reflectance),
            ("transmission", phong.transmission),
        ];

        for &(name, value) in coefficients.iter() {
            if !(0.0..=1.0).contains(&value) {
                return Err(TraceError::CoefficientOutOfRange { name, value });
            }
        }

        Ok(Surface { color, phong })
    }

    /// The surface's own color, before any light is applied.
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn phong(&self) -> &PhongModel {
        &self.phong
    }
}

#[allow(clippy::too_many_arguments)]
fn preset(r: f64, g: f64, b: f64, ambient: f64, diffuse: f64, specular: f64,
    exponent: f64, reflectance: f64, transmission: f64, refractive_index: f64)
    -> Arc<Surface> {
    Arc::new(Surface {
        color: Color::rgb(r, g, b),
        phong: PhongModel {
            ambient, diffuse, specular, exponent,
            reflectance, transmission, refractive_index,
        },
    })
}

lazy_static! {
    static ref PRESETS: HashMap<&'static str, Arc<Surface>> = {
        let mut m = HashMap::new();
        m.insert("matte black",
            preset(0.0, 0.0, 0.0, 0.2, 0.8, 0.0, 0.0, 0.0, 0.0, 1.0));
        m.insert("glossy white",
            preset(1.0, 1.0, 1.0, 0.1, 0.7, 0.7, 20.0, 0.2, 0.0, 1.0));
        m.insert("mirror",
            preset(1.0, 1.0, 1.0, 0.0, 0.1, 0.9, 50.0, 1.0, 0.0, 1.5));
        m.insert("glass",
            preset(0.9, 0.9, 0.9, 0.0, 0.1, 0.8, 30.0, 0.0, 0.9, 1.5));
        m.insert("red plastic",
            preset(1.0, 0.0, 0.0, 0.2, 0.6, 0.4, 10.0, 0.1, 0.0, 1.0));
        m.insert("blue rubber",
            preset(0.0, 0.0, 1.0, 0.3, 0.7, 0.2, 5.0, 0.0, 0.0, 1.0));
        m.insert("gold",
            preset(1.0, 0.84, 0.0, 0.1, 0.6, 0.7, 25.0, 0.5, 0.0, 1.0));
        m.insert("silver",
            preset(0.75, 0.75, 0.75, 0.2, 0.7, 0.6, 20.0, 0.7, 0.0, 1.0));
        m.insert("emerald",
            preset(0.31, 0.78, 0.47, 0.2, 0.5, 0.5, 25.0, 0.0, 0.6, 1.5));
        m.insert("transparent water",
            preset(0.0, 0.1, 0.8, 0.0, 0.1, 0.7, 30.0, 0.0, 0.9, 1.33));
        m
    };
}

/// Looks up one of the predefined surfaces by name.
///
/// ```
/// # use phong_ray_tracer::surface;
/// let gold = surface::lookup("gold").unwrap();
/// assert_eq!(gold.phong().reflectance, 0.5);
/// assert!(surface::lookup("unobtainium").is_none());
/// ```
pub fn lookup(name: &str) -> Option<Arc<Surface>> {
    PRESETS.get(name).cloned()
}

/// Names of every predefined surface, sorted.
pub fn preset_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = PRESETS.keys().copied().collect();
    names.sort_unstable();
    names
}

#[test]
fn presets_pass_validation() {
    for name in preset_names() {
        let s = lookup(name).unwrap();
        assert!(Surface::new(s.color(), *s.phong()).is_ok(), "{}", name);
    }
}

#[test]
fn preset_lookup_shares_instance() {
    let a = lookup("mirror").unwrap();
    let b = lookup("mirror").unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(preset_names().len(), 10);
}

#[test]
fn reject_out_of_range_color() {
    let res = Surface::new(Color::rgb(0.5, 1.1, 0.0), Default::default());

    assert!(matches!(res, Err(TraceError::ColorOutOfRange { .. })));
}

#[test]
fn reject_out_of_range_coefficient() {
    let phong = PhongModel { reflectance: -0.1, ..Default::default() };
    let res = Surface::new(Color::white(), phong);

    match res {
        Err(TraceError::CoefficientOutOfRange { name, .. }) =>
            assert_eq!(name, "reflectance"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn exponent_and_index_are_unconstrained() {
    let phong = PhongModel {
        exponent: 250.0,
        refractive_index: -3.0,
        ..Default::default()
    };

    assert!(Surface::new(Color::black(), phong).is_ok());
}
