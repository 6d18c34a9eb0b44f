// ============================================================================
// Coefficient Table
// Per-segment slope/intercept pairs for the piecewise-linear 2^v lookup
// ============================================================================

use crate::numeric::{Coefficient, FixedPointFormat, UnitError, UnitResult};
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Narrowest coefficient container.
pub const MIN_COEFFICIENT_WIDTH: u32 = 2;

/// Widest coefficient container (coefficients are held in `i32`).
pub const MAX_COEFFICIENT_WIDTH: u32 = 32;

/// Slopes of the hardware's Q4.12 table, 16 segments.
pub const REFERENCE_SLOPES_Q4_12: [i32; 16] = [
    2902, 3030, 3164, 3304, 3451, 3603, 3763, 3929, 4103, 4285, 4475, 4673, 4880, 5096, 5321, 5557,
];

/// Intercepts of the hardware's Q4.12 table, 16 segments.
pub const REFERENCE_INTERCEPTS_Q4_12: [i32; 16] = [
    4096, 4088, 4071, 4045, 4008, 3961, 3901, 3828, 3741, 3639, 3520, 3384, 3229, 3053, 2856, 2635,
];

/// One linear piece `y = a * v + b`, both in the table's fixed-point format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    /// Slope
    pub a: i32,
    /// Intercept
    pub b: i32,
}

/// Ordered, immutable set of `N` segments covering `v ∈ [0, 1)`.
///
/// Segment `i` covers `[i/N, (i+1)/N)`; the last one is closed at 1.0.
/// `N` is always a non-zero power of two and every coefficient fits a signed
/// container of `coefficient_width` bits.
///
/// # Example
/// ```
/// use exp_softplus_unit::domain::CoefficientTable;
///
/// let table = CoefficientTable::reference_q4_12();
/// assert_eq!(table.len(), 16);
/// assert_eq!(table.segment_bits(), 4);
/// assert_eq!(table.segments()[0].b, 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawTable"))]
pub struct CoefficientTable {
    segments: SmallVec<[Segment; 16]>,
    coefficient_width: u32,
}

/// Unchecked wire form; deserialization goes through
/// [`CoefficientTable::from_coefficients`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawTable {
    segments: Vec<Segment>,
    coefficient_width: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTable> for CoefficientTable {
    type Error = UnitError;

    fn try_from(raw: RawTable) -> UnitResult<Self> {
        let slopes: Vec<i32> = raw.segments.iter().map(|s| s.a).collect();
        let intercepts: Vec<i32> = raw.segments.iter().map(|s| s.b).collect();
        Self::from_coefficients(&slopes, &intercepts, raw.coefficient_width)
    }
}

impl CoefficientTable {
    /// Build a table from externally supplied coefficients.
    ///
    /// # Errors
    /// - `TableShapeMismatch` if the two slices differ in length
    /// - `InvalidSegmentCount` if the length is not a positive power of two
    /// - `InvalidCoefficientWidth` for an unsupported container width
    /// - `CoefficientOverflow` if any value does not fit the container
    pub fn from_coefficients(
        slopes: &[i32],
        intercepts: &[i32],
        coefficient_width: u32,
    ) -> UnitResult<Self> {
        if slopes.len() != intercepts.len() {
            return Err(UnitError::TableShapeMismatch {
                slopes: slopes.len(),
                intercepts: intercepts.len(),
            });
        }
        check_segment_count(slopes.len())?;
        check_coefficient_width(coefficient_width)?;

        let mut segments = SmallVec::with_capacity(slopes.len());
        for (index, (&a, &b)) in slopes.iter().zip(intercepts).enumerate() {
            let a = fit_coefficient(a as i64, index, Coefficient::Slope, coefficient_width)?;
            let b = fit_coefficient(b as i64, index, Coefficient::Intercept, coefficient_width)?;
            segments.push(Segment { a, b });
        }

        Ok(Self {
            segments,
            coefficient_width,
        })
    }

    /// The 16-segment Q4.12 table burned into the reference hardware.
    pub fn reference_q4_12() -> Self {
        let segments = REFERENCE_SLOPES_Q4_12
            .iter()
            .zip(REFERENCE_INTERCEPTS_Q4_12.iter())
            .map(|(&a, &b)| Segment { a, b })
            .collect();
        Self {
            segments,
            coefficient_width: 16,
        }
    }

    /// Assemble from segments already checked by the caller.
    pub(crate) fn from_checked_segments(
        segments: SmallVec<[Segment; 16]>,
        coefficient_width: u32,
    ) -> Self {
        debug_assert!(segments.len().is_power_of_two());
        Self {
            segments,
            coefficient_width,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of segments `N`.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false: a table holds at least one segment.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// `log2(N)`, the number of fractional bits consumed by segment selection.
    #[inline]
    pub fn segment_bits(&self) -> u32 {
        self.segments.len().trailing_zeros()
    }

    /// Signed container width of each coefficient.
    #[inline]
    pub fn coefficient_width(&self) -> u32 {
        self.coefficient_width
    }

    /// All segments in domain order.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segment `index`, if it exists.
    #[inline]
    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Slopes in domain order.
    pub fn slopes(&self) -> impl Iterator<Item = i32> + '_ {
        self.segments.iter().map(|s| s.a)
    }

    /// Intercepts in domain order.
    pub fn intercepts(&self) -> impl Iterator<Item = i32> + '_ {
        self.segments.iter().map(|s| s.b)
    }

    /// Whether slopes never decrease from one segment to the next.
    ///
    /// Holds for any table generated from the convex `2^v`.
    pub fn slopes_non_decreasing(&self) -> bool {
        self.segments.windows(2).all(|pair| pair[0].a <= pair[1].a)
    }

    /// Check that `format` leaves enough fractional bits to select among the
    /// table's segments.
    ///
    /// # Errors
    /// Returns `SegmentsExceedPrecision` when `log2(N) > F`.
    pub fn check_precision(&self, format: FixedPointFormat) -> UnitResult<()> {
        if self.segment_bits() > format.frac_bits() {
            return Err(UnitError::SegmentsExceedPrecision {
                segments: self.len(),
                frac_bits: format.frac_bits(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Floating-point view
    // ========================================================================

    /// Evaluate `a[i] * v + b[i]` in floating point with the quantized
    /// coefficients, `i = min(floor(v * N), N - 1)`.
    ///
    /// This is the table's own approximation of `2^v` on `v ∈ [0, 1]`,
    /// independent of the integer datapath.
    pub fn evaluate_float(&self, v: f64, format: FixedPointFormat) -> f64 {
        let last = self.len() - 1;
        let index = ((v * self.len() as f64).floor().max(0.0) as usize).min(last);
        let segment = self.segments[index];
        format.to_float(segment.a) * v + format.to_float(segment.b)
    }
}

// ============================================================================
// Validation helpers
// ============================================================================

/// Reject segment counts that are zero or not a power of two.
pub(crate) fn check_segment_count(segments: usize) -> UnitResult<()> {
    if segments == 0 || !segments.is_power_of_two() {
        return Err(UnitError::InvalidSegmentCount(segments));
    }
    Ok(())
}

/// Reject container widths outside the supported range.
pub(crate) fn check_coefficient_width(width: u32) -> UnitResult<()> {
    if !(MIN_COEFFICIENT_WIDTH..=MAX_COEFFICIENT_WIDTH).contains(&width) {
        return Err(UnitError::InvalidCoefficientWidth(width));
    }
    Ok(())
}

/// Check that `value` fits a signed `width`-bit container.
pub(crate) fn fit_coefficient(
    value: i64,
    segment: usize,
    coefficient: Coefficient,
    width: u32,
) -> UnitResult<i32> {
    let max = (1i64 << (width - 1)) - 1;
    let min = -(1i64 << (width - 1));
    if value < min || value > max {
        return Err(UnitError::CoefficientOverflow {
            segment,
            coefficient,
            value,
            width,
        });
    }
    Ok(value as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_table_shape() {
        let table = CoefficientTable::reference_q4_12();
        assert_eq!(table.len(), 16);
        assert!(!table.is_empty());
        assert_eq!(table.segment_bits(), 4);
        assert_eq!(table.coefficient_width(), 16);
        assert_eq!(table.segment(15), Some(&Segment { a: 5557, b: 2635 }));
        assert_eq!(table.segment(16), None);
        assert!(table.slopes_non_decreasing());
    }

    #[test]
    fn test_from_coefficients_matches_reference() {
        let table = CoefficientTable::from_coefficients(
            &REFERENCE_SLOPES_Q4_12,
            &REFERENCE_INTERCEPTS_Q4_12,
            16,
        )
        .unwrap();
        assert_eq!(table, CoefficientTable::reference_q4_12());
    }

    #[test]
    fn test_from_coefficients_rejects_bad_shapes() {
        assert_eq!(
            CoefficientTable::from_coefficients(&[1, 2], &[1], 16),
            Err(UnitError::TableShapeMismatch {
                slopes: 2,
                intercepts: 1
            })
        );
        assert_eq!(
            CoefficientTable::from_coefficients(&[1, 2, 3], &[1, 2, 3], 16),
            Err(UnitError::InvalidSegmentCount(3))
        );
        assert_eq!(
            CoefficientTable::from_coefficients(&[], &[], 16),
            Err(UnitError::InvalidSegmentCount(0))
        );
        assert_eq!(
            CoefficientTable::from_coefficients(&[1], &[1], 40),
            Err(UnitError::InvalidCoefficientWidth(40))
        );
    }

    #[test]
    fn test_from_coefficients_rejects_overflow() {
        let result = CoefficientTable::from_coefficients(&[100, 200], &[0, 128], 8);
        assert_eq!(
            result,
            Err(UnitError::CoefficientOverflow {
                segment: 1,
                coefficient: Coefficient::Slope,
                value: 200,
                width: 8,
            })
        );
    }

    #[test]
    fn test_check_precision() {
        let table = CoefficientTable::reference_q4_12();
        assert!(table.check_precision(FixedPointFormat::Q4_12).is_ok());

        let coarse = FixedPointFormat::new(8, 3).unwrap();
        assert_eq!(
            table.check_precision(coarse),
            Err(UnitError::SegmentsExceedPrecision {
                segments: 16,
                frac_bits: 3
            })
        );
    }

    #[test]
    fn test_evaluate_float_endpoints() {
        let table = CoefficientTable::reference_q4_12();
        let q = FixedPointFormat::Q4_12;
        assert_eq!(table.evaluate_float(0.0, q), 1.0);
        // v = 1.0 uses the closed last segment
        assert!((table.evaluate_float(1.0, q) - 2.0).abs() <= 1.0 / 4096.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_round_trip() {
        let table = CoefficientTable::reference_q4_12();
        let json = serde_json::to_string(&table).unwrap();
        let parsed: CoefficientTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, table);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates() {
        let empty = serde_json::from_str::<CoefficientTable>(
            r#"{"segments":[],"coefficient_width":16}"#,
        );
        assert!(empty.is_err());

        let three = r#"{"segments":[{"a":1,"b":1},{"a":2,"b":2},{"a":3,"b":3}],"coefficient_width":16}"#;
        assert!(serde_json::from_str::<CoefficientTable>(three).is_err());

        for width in [0, 1, 33, 99] {
            let json = format!(
                r#"{{"segments":[{{"a":1,"b":1}},{{"a":2,"b":2}}],"coefficient_width":{}}}"#,
                width
            );
            assert!(
                serde_json::from_str::<CoefficientTable>(&json).is_err(),
                "width {}",
                width
            );
        }

        let overflow = r#"{"segments":[{"a":100,"b":0},{"a":200,"b":128}],"coefficient_width":8}"#;
        assert!(serde_json::from_str::<CoefficientTable>(overflow).is_err());
    }
}
