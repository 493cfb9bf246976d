//! RGB color type and the DrawingML color-modifier pipeline.
//!
//! Scheme and sRGB colors both funnel through [`ColorModifiers`], which
//! applies luminance, tint, shade, and alpha adjustments in the order the
//! OOXML specification mandates. Two luminance operations exist on purpose:
//! scheme colors modify luminance in HSL space, while some legacy call
//! sites multiply raw sRGB channels directly. Both are kept as distinct,
//! explicitly named entry points.

use serde::Serialize;
use std::fmt;

/// RGB color representation.
///
/// Represents a color using red, green, and blue components, each in the
/// range 0-255.
///
/// # Examples
///
/// ```rust
/// use longan::common::RGBColor;
///
/// // Create a red color
/// let red = RGBColor::new(255, 0, 0);
///
/// // Create from hex string
/// let blue = RGBColor::from_hex("0000FF").unwrap();
/// assert_eq!(blue.to_string(), "#0000FF");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RGBColor {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl RGBColor {
    /// Black, the universal fallback for unresolvable colors.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// White, the assumed backdrop for alpha compositing.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create an RGB color from a hex string.
    ///
    /// # Arguments
    ///
    /// * `hex` - Hex color string (e.g., "FF0000" or "#FF0000")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        // Length alone is not enough: a 6-byte multi-byte value would
        // slice off a char boundary below.
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self::new(r, g, b))
    }

    /// Convert to hex string (without # prefix).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use longan::common::RGBColor;
    ///
    /// let color = RGBColor::new(255, 0, 0);
    /// assert_eq!(color.to_hex(), "FF0000");
    /// ```
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Convert to HSL. Hue in degrees `[0, 360)`, saturation and
    /// luminance as fractions in `[0, 1]`.
    pub fn to_hsl(&self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            // Achromatic
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl {
            h: h * 60.0,
            s,
            l,
        }
    }
}

impl fmt::Display for RGBColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

/// A color in HSL space, used as the intermediate representation for
/// scheme-color luminance modification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Hue in degrees `[0, 360)`
    pub h: f64,
    /// Saturation `[0, 1]`
    pub s: f64,
    /// Luminance `[0, 1]`
    pub l: f64,
}

impl Hsl {
    /// Convert back to RGB, rounding each channel once.
    pub fn to_rgb(&self) -> RGBColor {
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);

        if s == 0.0 {
            let v = (l * 255.0).round() as u8;
            return RGBColor::new(v, v, v);
        }

        let q = if l > 0.5 { l + s - l * s } else { l * (1.0 + s) };
        let p = 2.0 * l - q;
        let h = self.h.rem_euclid(360.0) / 360.0;

        let r = hue_to_channel(p, q, h + 1.0 / 3.0);
        let g = hue_to_channel(p, q, h);
        let b = hue_to_channel(p, q, h - 1.0 / 3.0);

        RGBColor::new(
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
        )
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// The DrawingML color modifiers, all fractions in `[0, 1]`.
///
/// Application order is fixed by the OOXML specification and must not be
/// reordered even when only a subset is present:
///
/// 1. `lum_mod` — scale luminance
/// 2. `lum_off` — offset luminance
/// 3. `tint` — blend toward white
/// 4. `shade` — blend toward black
/// 5. `alpha` — composite over an opaque white backdrop
///
/// The alpha step assumes a white backdrop rather than the true underlying
/// background. That approximation holds for static markup output only and
/// would be wrong under real layered compositing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorModifiers {
    /// Luminance multiplier (`lumMod`)
    pub lum_mod: Option<f64>,
    /// Luminance offset (`lumOff`)
    pub lum_off: Option<f64>,
    /// Blend toward white (`tint`)
    pub tint: Option<f64>,
    /// Blend toward black (`shade`)
    pub shade: Option<f64>,
    /// Opacity (`alpha`), composited over white
    pub alpha: Option<f64>,
}

impl ColorModifiers {
    /// Whether no modifier is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lum_mod.is_none()
            && self.lum_off.is_none()
            && self.tint.is_none()
            && self.shade.is_none()
            && self.alpha.is_none()
    }

    /// Apply the modifiers with luminance handled in HSL space.
    ///
    /// This is the path for theme scheme colors: the base color is
    /// converted to HSL, its L component is scaled by `lum_mod` and offset
    /// by `lum_off`, and the result converted back before tint, shade, and
    /// alpha run on the RGB channels.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use longan::common::{ColorModifiers, RGBColor};
    ///
    /// // Office "accent1, lighter 40%"
    /// let accent1 = RGBColor::from_hex("4472C4").unwrap();
    /// let mods = ColorModifiers {
    ///     lum_mod: Some(0.6),
    ///     lum_off: Some(0.4),
    ///     ..Default::default()
    /// };
    /// assert_eq!(mods.apply_hsl(accent1).to_hex(), "8FAADC");
    /// ```
    pub fn apply_hsl(&self, base: RGBColor) -> RGBColor {
        let mut color = base;

        if self.lum_mod.is_some() || self.lum_off.is_some() {
            let mut hsl = color.to_hsl();
            if let Some(m) = self.lum_mod {
                hsl.l *= m;
            }
            if let Some(o) = self.lum_off {
                hsl.l = (hsl.l + o).clamp(0.0, 1.0);
            }
            color = hsl.to_rgb();
        }

        self.apply_tail(color)
    }

    /// Apply the modifiers with luminance as a direct per-channel
    /// multiply/add on sRGB values.
    ///
    /// Legacy path used on raw sRGB colors: `lum_mod` multiplies each
    /// channel and `lum_off` adds `fraction * 255`, both clamped. Tint,
    /// shade, and alpha behave identically to [`Self::apply_hsl`].
    pub fn apply_rgb(&self, base: RGBColor) -> RGBColor {
        let mut r = base.r as f64;
        let mut g = base.g as f64;
        let mut b = base.b as f64;

        if let Some(m) = self.lum_mod {
            r = (r * m).clamp(0.0, 255.0);
            g = (g * m).clamp(0.0, 255.0);
            b = (b * m).clamp(0.0, 255.0);
        }
        if let Some(o) = self.lum_off {
            let off = o * 255.0;
            r = (r + off).clamp(0.0, 255.0);
            g = (g + off).clamp(0.0, 255.0);
            b = (b + off).clamp(0.0, 255.0);
        }

        self.apply_tail_f64(r, g, b)
    }

    /// Tint, shade, and alpha on an already luminance-adjusted color.
    fn apply_tail(&self, color: RGBColor) -> RGBColor {
        self.apply_tail_f64(color.r as f64, color.g as f64, color.b as f64)
    }

    fn apply_tail_f64(&self, mut r: f64, mut g: f64, mut b: f64) -> RGBColor {
        if let Some(t) = self.tint {
            r += (255.0 - r) * t;
            g += (255.0 - g) * t;
            b += (255.0 - b) * t;
        }
        if let Some(s) = self.shade {
            let keep = 1.0 - s;
            r *= keep;
            g *= keep;
            b *= keep;
        }
        if let Some(a) = self.alpha {
            // Composite over an assumed opaque white backdrop.
            let backdrop = 255.0 * (1.0 - a);
            r = r * a + backdrop;
            g = g * a + backdrop;
            b = b * a + backdrop;
        }

        RGBColor::new(
            r.clamp(0.0, 255.0).round() as u8,
            g.clamp(0.0, 255.0).round() as u8,
            b.clamp(0.0, 255.0).round() as u8,
        )
    }
}
