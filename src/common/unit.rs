//! Unit conversion utilities.
//!
//! This module provides conversions for the length, angle, and percentage
//! units used by DrawingML: English Metric Units for coordinates, 1/60000
//! degree increments for rotations, hundredths of a point for font sizes,
//! and parts-per-100,000 for color modifiers.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_CM: i64 = 360_000;
pub const EMUS_PER_PT: i64 = 12_700;

/// EMU-to-pixel divisor historically used by the converter.
///
/// Numerically this is EMUs per point (914,400 / 72), which renders one
/// point per CSS pixel. Kept as the default because existing callers
/// depend on the resulting coordinates.
pub const EMU_PER_PX_LEGACY: f64 = 12_700.0;

/// EMU-to-pixel divisor at 96 DPI (914,400 / 96), the OOXML-correct value.
pub const EMU_PER_PX_96DPI: f64 = 9_525.0;

/// Angle units per full turn. Rotations are stored in 1/60000 degree
/// increments, so 360 degrees is 21,600,000 units.
pub const ANGLE_UNITS_PER_TURN: i64 = 21_600_000;

pub const ANGLE_UNITS_PER_DEGREE: i64 = 60_000;

/// Denominator for percentage-like values (lumMod, lumOff, tint, shade,
/// alpha), which are expressed in parts per 100,000.
pub const PERCENT_DENOMINATOR: f64 = 100_000.0;

/// Font sizes are stored in hundredths of a point.
pub const SIZE_UNITS_PER_PT: f64 = 100.0;

/// Convert EMUs to pixels using an explicit divisor.
///
/// Both [`EMU_PER_PX_LEGACY`] and [`EMU_PER_PX_96DPI`] are valid divisors;
/// which one applies is a per-job decision carried in the resolve options.
#[inline]
pub fn emu_to_px(emu: i64, emu_per_px: f64) -> f64 {
    emu as f64 / emu_per_px
}

/// Convert 1/60000-degree angle units to degrees.
#[inline]
pub fn angle_to_degrees(units: i64) -> f64 {
    units as f64 / ANGLE_UNITS_PER_DEGREE as f64
}

/// Convert a parts-per-100,000 value to a fraction in `[0, 1]`-ish range.
///
/// Values outside the nominal range are passed through; clamping is the
/// responsibility of the operation that consumes the fraction.
#[inline]
pub fn percent_to_fraction(value: i64) -> f64 {
    value as f64 / PERCENT_DENOMINATOR
}

/// Convert a stored font size (hundredths of a point) to points.
#[inline]
pub fn size_units_to_pt(value: i32) -> f64 {
    value as f64 / SIZE_UNITS_PER_PT
}

/// Normalize a rotation value into `[0, ANGLE_UNITS_PER_TURN)`.
///
/// Negative inputs wrap around, so -60,000 (one degree counter-clockwise)
/// becomes 21,540,000.
#[inline]
pub fn normalize_rotation(units: i64) -> i64 {
    units.rem_euclid(ANGLE_UNITS_PER_TURN)
}
