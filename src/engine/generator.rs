// ============================================================================
// Coefficient Generator
// Secant-line segmentation of 2^v on [0, 1), quantized to a fixed-point format
// ============================================================================

use crate::domain::coefficient_table::fit_coefficient;
use crate::domain::{CoefficientTable, Segment, UnitConfig};
use crate::numeric::{Coefficient, FixedPointFormat, UnitResult};
use smallvec::SmallVec;

/// Generates piecewise-linear coefficient tables for `2^v`.
///
/// For segment `i` of `N` the line passes through `(i/N, 2^(i/N))` and
/// `((i+1)/N, 2^((i+1)/N))`. Slope and intercept are each rounded to the
/// nearest multiple of `2^-F` (ties to even) and must fit the coefficient
/// container; nothing is ever wrapped.
///
/// # Example
/// ```
/// use exp_softplus_unit::engine::TableGenerator;
/// use exp_softplus_unit::numeric::FixedPointFormat;
///
/// let table = TableGenerator::new(16, FixedPointFormat::Q4_12).generate().unwrap();
/// assert_eq!(table.segments()[0].a, 2902);
/// assert_eq!(table.segments()[0].b, 4096);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableGenerator {
    config: UnitConfig,
}

impl TableGenerator {
    /// Generator for `segments` pieces in `format`, coefficients as wide as
    /// the format.
    pub fn new(segments: usize, format: FixedPointFormat) -> Self {
        Self {
            config: UnitConfig::new(format, segments),
        }
    }

    /// Generator driven by a full unit configuration.
    pub fn from_config(config: UnitConfig) -> Self {
        Self { config }
    }

    /// Store coefficients in `width`-bit containers instead.
    pub fn with_coefficient_width(mut self, width: u32) -> Self {
        self.config = self.config.with_coefficient_width(width);
        self
    }

    /// Build the table.
    ///
    /// # Errors
    /// - Config errors for an invalid format, segment count or container
    /// - `CoefficientOverflow` if a quantized coefficient does not fit
    pub fn generate(&self) -> UnitResult<CoefficientTable> {
        self.config.validate()?;

        let segments = self.config.segments;
        let scale = self.config.format.scale() as f64;
        let width = self.config.effective_coefficient_width();

        let mut pieces: SmallVec<[Segment; 16]> = SmallVec::with_capacity(segments);
        for index in 0..segments {
            let (slope, intercept) = secant_coefficients(index, segments);
            let a = quantize(slope, scale);
            let b = quantize(intercept, scale);
            pieces.push(Segment {
                a: fit_coefficient(a, index, Coefficient::Slope, width)?,
                b: fit_coefficient(b, index, Coefficient::Intercept, width)?,
            });
        }

        tracing::debug!(
            segments,
            format = %self.config.format,
            coefficient_width = width,
            "generated 2^v coefficient table"
        );

        Ok(CoefficientTable::from_checked_segments(pieces, width))
    }
}

/// Generate the `segment_count`-piece table for `format` with coefficients as
/// wide as the format.
///
/// # Errors
/// See [`TableGenerator::generate`].
pub fn generate_table(
    segment_count: usize,
    format: FixedPointFormat,
) -> UnitResult<CoefficientTable> {
    TableGenerator::new(segment_count, format).generate()
}

/// Real-valued secant slope and intercept of `2^v` over segment `index`.
pub fn secant_coefficients(index: usize, segments: usize) -> (f64, f64) {
    let v0 = index as f64 / segments as f64;
    let v1 = (index + 1) as f64 / segments as f64;
    let y0 = v0.exp2();
    let y1 = v1.exp2();

    let slope = (y1 - y0) / (v1 - v0);
    let intercept = y0 - slope * v0;
    (slope, intercept)
}

#[inline]
fn quantize(value: f64, scale: f64) -> i64 {
    (value * scale).round_ties_even() as i64
}
