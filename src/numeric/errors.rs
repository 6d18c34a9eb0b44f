// ============================================================================
// Unit Errors
// Error types for table generation and format configuration
// ============================================================================

use std::fmt;

/// Which coefficient of a segment a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coefficient {
    /// Slope `a`
    Slope,
    /// Intercept `b`
    Intercept,
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coefficient::Slope => write!(f, "slope"),
            Coefficient::Intercept => write!(f, "intercept"),
        }
    }
}

/// Coarse classification of a [`UnitError`].
///
/// Both kinds are fatal for the call that produced them. Evaluation itself
/// never errors; out-of-range results are saturated instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid combination of width, fractional bits, segment count or
    /// coefficient container width.
    Config,
    /// A quantized coefficient does not fit its storage container.
    Overflow,
}

/// Errors raised while building a fixed-point format or a coefficient table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitError {
    /// `frac_bits` must satisfy `0 < F < W` and `W` must be a supported width
    InvalidFormat { width: u32, frac_bits: u32 },
    /// Segment count is zero or not a power of two
    InvalidSegmentCount(usize),
    /// `log2(segments)` exceeds the fractional bits available for selection
    SegmentsExceedPrecision { segments: usize, frac_bits: u32 },
    /// Coefficient container width outside the supported range
    InvalidCoefficientWidth(u32),
    /// Slope and intercept sequences differ in length
    TableShapeMismatch { slopes: usize, intercepts: usize },
    /// A quantized coefficient does not fit its container
    CoefficientOverflow {
        segment: usize,
        coefficient: Coefficient,
        value: i64,
        width: u32,
    },
}

impl UnitError {
    /// Classify the error as a configuration or overflow failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            UnitError::CoefficientOverflow { .. } => ErrorKind::Overflow,
            _ => ErrorKind::Config,
        }
    }
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitError::InvalidFormat { width, frac_bits } => write!(
                f,
                "invalid fixed-point format: width {} with {} fractional bits",
                width, frac_bits
            ),
            UnitError::InvalidSegmentCount(n) => {
                write!(f, "invalid segment count {}: must be a positive power of two", n)
            },
            UnitError::SegmentsExceedPrecision {
                segments,
                frac_bits,
            } => write!(
                f,
                "{} segments need more than the {} fractional bits available",
                segments, frac_bits
            ),
            UnitError::InvalidCoefficientWidth(width) => {
                write!(f, "unsupported coefficient container width {}", width)
            },
            UnitError::TableShapeMismatch { slopes, intercepts } => write!(
                f,
                "table shape mismatch: {} slopes but {} intercepts",
                slopes, intercepts
            ),
            UnitError::CoefficientOverflow {
                segment,
                coefficient,
                value,
                width,
            } => write!(
                f,
                "coefficient overflow: {} of segment {} is {}, which does not fit {} bits",
                coefficient, segment, value, width
            ),
        }
    }
}

impl std::error::Error for UnitError {}

/// Result type alias for unit construction
pub type UnitResult<T> = Result<T, UnitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            UnitError::InvalidSegmentCount(12).to_string(),
            "invalid segment count 12: must be a positive power of two"
        );
        let overflow = UnitError::CoefficientOverflow {
            segment: 3,
            coefficient: Coefficient::Slope,
            value: 45_000,
            width: 16,
        };
        assert_eq!(
            overflow.to_string(),
            "coefficient overflow: slope of segment 3 is 45000, which does not fit 16 bits"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            UnitError::InvalidFormat {
                width: 16,
                frac_bits: 16
            }
            .kind(),
            ErrorKind::Config
        );
        assert_eq!(UnitError::InvalidCoefficientWidth(1).kind(), ErrorKind::Config);
        assert_eq!(
            UnitError::CoefficientOverflow {
                segment: 0,
                coefficient: Coefficient::Intercept,
                value: 70_000,
                width: 16,
            }
            .kind(),
            ErrorKind::Overflow
        );
    }
}
