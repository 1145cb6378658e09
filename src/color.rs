use std::ops::{ Add, AddAssign, Mul };

use crate::feq;

/// A linear RGB color.
///
/// Channels nominally range from 0.0 to 1.0, but intermediate shading sums may
/// exceed that range; `clamp` saturates a color back into it.
///
/// # Examples
///
/// Saturate an over-exposed color:
///
/// ```
/// # use phong_ray_tracer::color::Color;
/// let hot = Color::rgb(1.7, 0.5, -0.2);
/// assert_eq!(hot.clamp(), Color::rgb(1.0, 0.5, 0.0));
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Colors are compared component-wise, accounting for floating point error.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// The color black.
    pub fn black() -> Color {
        Color { r: 0.0, g: 0.0, b: 0.0 }
    }

    /// The color white.
    pub fn white() -> Color {
        Color { r: 1.0, g: 1.0, b: 1.0 }
    }

    /// Creates a color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Color {
        Color {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Whether every channel lies within `[0, 1]`.
    pub fn in_unit_range(&self) -> bool {
        let unit = |c: f64| (0.0..=1.0).contains(&c);
        unit(self.r) && unit(self.g) && unit(self.b)
    }

    /// Saturates each channel into `[0, 1]`.
    pub fn clamp(&self) -> Color {
        Color {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// Converts to 8-bit channels, rounding to the nearest value.
    ///
    /// ```
    /// # use phong_ray_tracer::color::Color;
    /// assert_eq!(Color::rgb(1.0, 0.5, 2.0).to_rgb8(), [255, 128, 255]);
    /// ```
    pub fn to_rgb8(&self) -> [u8; 3] {
        let c = self.clamp();
        let quantize = |v: f64| (v * 255.0).round() as u8;

        [quantize(c.r), quantize(c.g), quantize(c.b)]
    }
}

impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl AddAssign<Color> for Color {
    fn add_assign(&mut self, other: Color) {
        *self = *self + other;
    }
}

/// Multiplies a color by a scalar.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        other * self
    }
}

/// Multiplies two colors component-wise (the Hadamard product).
///
/// This is how a light's intensity filters a surface's intrinsic color.
impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color {
            r: self.r * other.r,
            g: self.g * other.g,
            b: self.b * other.b,
        }
    }
}

#[test]
fn add_colors() {
    let mut c1 = Color::rgb(0.9, 0.6, 0.75);
    c1 += Color::rgb(0.7, 0.1, 0.25);

    assert_eq!(c1, Color::rgb(1.6, 0.7, 1.0));
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(1.0, 0.2, 0.4);
    let c2 = Color::rgb(0.9, 1.0, 0.1);

    assert_eq!(c1 * c2, Color::rgb(0.9, 0.2, 0.04));
    assert_eq!(2.0 * c1, Color::rgb(2.0, 0.4, 0.8));
}

#[test]
fn clamp_saturates_channels() {
    let c = Color::rgb(-3.0, 0.25, 12.0).clamp();

    assert_eq!(c, Color::rgb(0.0, 0.25, 1.0));
    assert!(c.in_unit_range());
}

#[test]
fn rgb8_conversion() {
    assert_eq!(Color::from_rgb8(255, 0, 51), Color::rgb(1.0, 0.0, 0.2));
    assert_eq!(Color::from_rgb8(20, 20, 25).to_rgb8(), [20, 20, 25]);
    assert_eq!(Color::rgb(-1.0, 0.0, 1.0).to_rgb8(), [0, 0, 255]);
}
