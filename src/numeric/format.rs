// ============================================================================
// Fixed-Point Format
// Signed two's-complement Q(I.F) format descriptor
// ============================================================================

use super::errors::{UnitError, UnitResult};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Narrowest supported register width.
pub const MIN_WIDTH: u32 = 2;

/// Widest supported register width. Values live in `i32`, products in `i64`.
pub const MAX_WIDTH: u32 = 32;

/// Signed fixed-point format with `width` total bits, `frac_bits` of them
/// fractional.
///
/// A real value `r` is stored as `round(r * 2^F)` clamped to
/// `[-2^(W-1), 2^(W-1) - 1]`.
///
/// # Example
/// ```
/// use exp_softplus_unit::numeric::FixedPointFormat;
///
/// let q4_12 = FixedPointFormat::new(16, 12).unwrap();
/// assert_eq!(q4_12.scale(), 4096);
/// assert_eq!(q4_12.to_fixed(1.5), 6144);
/// assert_eq!(q4_12.to_float(-2048), -0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawFormat"))]
pub struct FixedPointFormat {
    width: u32,
    frac_bits: u32,
}

/// Unchecked wire form; deserialization goes through [`FixedPointFormat::new`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawFormat {
    width: u32,
    frac_bits: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawFormat> for FixedPointFormat {
    type Error = UnitError;

    fn try_from(raw: RawFormat) -> UnitResult<Self> {
        Self::new(raw.width, raw.frac_bits)
    }
}

impl FixedPointFormat {
    /// Q4.12, the format of the reference hardware unit.
    pub const Q4_12: Self = Self {
        width: 16,
        frac_bits: 12,
    };

    /// Q8.8 on a 16-bit register.
    pub const Q8_8: Self = Self {
        width: 16,
        frac_bits: 8,
    };

    /// Q16.16 on a 32-bit register.
    pub const Q16_16: Self = Self {
        width: 32,
        frac_bits: 16,
    };

    /// Create a format, checking `0 < F < W` and the supported width range.
    ///
    /// # Errors
    /// Returns `InvalidFormat` for any other combination.
    pub fn new(width: u32, frac_bits: u32) -> UnitResult<Self> {
        let format = Self { width, frac_bits };
        format.validate()?;
        Ok(format)
    }

    /// Re-check the invariants (useful after deserialization).
    pub fn validate(&self) -> UnitResult<()> {
        let width_ok = (MIN_WIDTH..=MAX_WIDTH).contains(&self.width);
        if !width_ok || self.frac_bits == 0 || self.frac_bits >= self.width {
            return Err(UnitError::InvalidFormat {
                width: self.width,
                frac_bits: self.frac_bits,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Total bit width `W`.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Fractional bit count `F`.
    #[inline]
    pub const fn frac_bits(&self) -> u32 {
        self.frac_bits
    }

    /// Integer bit count `I = W - F` (sign bit included).
    #[inline]
    pub const fn int_bits(&self) -> u32 {
        self.width - self.frac_bits
    }

    /// Scale factor `S = 2^F`.
    #[inline]
    pub const fn scale(&self) -> i64 {
        1i64 << self.frac_bits
    }

    /// Mask selecting the low `F` bits.
    #[inline]
    pub const fn frac_mask(&self) -> i64 {
        self.scale() - 1
    }

    /// Smallest representable raw value, `-2^(W-1)`.
    #[inline]
    pub const fn min_raw(&self) -> i64 {
        -(1i64 << (self.width - 1))
    }

    /// Largest representable raw value, `2^(W-1) - 1`.
    #[inline]
    pub const fn max_raw(&self) -> i64 {
        (1i64 << (self.width - 1)) - 1
    }

    /// Whether `raw` fits the format without clamping.
    #[inline]
    pub const fn contains(&self, raw: i64) -> bool {
        raw >= self.min_raw() && raw <= self.max_raw()
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// `round(value * S)`, clamped to the representable range.
    ///
    /// Rounds half to even. NaN maps to zero.
    pub fn to_fixed(&self, value: f64) -> i32 {
        let scaled = (value * self.scale() as f64).round_ties_even();
        scaled.clamp(self.min_raw() as f64, self.max_raw() as f64) as i32
    }

    /// `raw / S`
    #[inline]
    pub fn to_float(&self, raw: i32) -> f64 {
        raw as f64 / self.scale() as f64
    }

    /// `round(log2(e) * S)`, the change-of-base constant register.
    ///
    /// Held at double width since for large `F` it exceeds the format.
    pub fn log2e(&self) -> i64 {
        (std::f64::consts::LOG2_E * self.scale() as f64).round_ties_even() as i64
    }
}

impl Default for FixedPointFormat {
    fn default() -> Self {
        Self::Q4_12
    }
}

impl fmt::Display for FixedPointFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}.{}", self.int_bits(), self.frac_bits)
    }
}
