// ============================================================================
// Unit Configuration
// Format, segmentation and coefficient storage of an exp/softplus unit
// ============================================================================

use crate::domain::coefficient_table::{check_coefficient_width, check_segment_count};
use crate::numeric::{FixedPointFormat, UnitError, UnitResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Segment count of the reference hardware.
pub const DEFAULT_SEGMENTS: usize = 16;

/// Complete configuration for building an exp/softplus unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitConfig {
    /// Working fixed-point format of inputs, outputs and intermediates
    pub format: FixedPointFormat,

    /// Number of linear segments over `v ∈ [0, 1)`; must be a power of two
    pub segments: usize,

    /// Optional: Coefficient container width in bits
    /// None means the same width as the working format
    pub coefficient_width: Option<u32>,
}

impl UnitConfig {
    /// Create a new configuration with required parameters
    pub fn new(format: FixedPointFormat, segments: usize) -> Self {
        Self {
            format,
            segments,
            coefficient_width: None,
        }
    }

    /// Builder method: Set coefficient container width
    pub fn with_coefficient_width(mut self, width: u32) -> Self {
        self.coefficient_width = Some(width);
        self
    }

    /// Builder method: Set segment count
    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    /// Container width actually used for coefficients
    pub fn effective_coefficient_width(&self) -> u32 {
        self.coefficient_width.unwrap_or(self.format.width())
    }

    /// Validate the configuration
    ///
    /// Coefficient overflow is not detectable here; it surfaces when the
    /// table is generated.
    pub fn validate(&self) -> UnitResult<()> {
        self.format.validate()?;
        check_segment_count(self.segments)?;

        // Segment selection consumes log2(N) fractional bits
        let segment_bits = self.segments.trailing_zeros();
        if segment_bits > self.format.frac_bits() {
            return Err(UnitError::SegmentsExceedPrecision {
                segments: self.segments,
                frac_bits: self.format.frac_bits(),
            });
        }

        check_coefficient_width(self.effective_coefficient_width())
    }
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self::q4_12()
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl UnitConfig {
    /// Reference hardware configuration
    /// - Q4.12, 16-bit registers
    /// - 16 segments
    /// - 16-bit coefficients
    pub fn q4_12() -> Self {
        Self::new(FixedPointFormat::Q4_12, DEFAULT_SEGMENTS)
    }

    /// Low-precision configuration
    /// - Q8.8, 16-bit registers
    /// - 16 segments
    pub fn q8_8() -> Self {
        Self::new(FixedPointFormat::Q8_8, DEFAULT_SEGMENTS)
    }

    /// Wide configuration
    /// - Q16.16, 32-bit registers
    /// - 64 segments
    /// - 32-bit coefficients
    pub fn q16_16() -> Self {
        Self::new(FixedPointFormat::Q16_16, 64).with_coefficient_width(32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = UnitConfig::new(FixedPointFormat::Q4_12, 16);
        assert_eq!(config.segments, 16);
        assert_eq!(config.coefficient_width, None);
        assert_eq!(config.effective_coefficient_width(), 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = UnitConfig::q4_12()
            .with_segments(32)
            .with_coefficient_width(24);

        assert_eq!(config.segments, 32);
        assert_eq!(config.effective_coefficient_width(), 24);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            UnitConfig::q4_12().with_segments(12).validate(),
            Err(UnitError::InvalidSegmentCount(12))
        );
        assert_eq!(
            UnitConfig::q4_12().with_segments(0).validate(),
            Err(UnitError::InvalidSegmentCount(0))
        );
        assert_eq!(
            UnitConfig::q4_12().with_segments(8192).validate(),
            Err(UnitError::SegmentsExceedPrecision {
                segments: 8192,
                frac_bits: 12
            })
        );
        assert_eq!(
            UnitConfig::q4_12().with_coefficient_width(1).validate(),
            Err(UnitError::InvalidCoefficientWidth(1))
        );
    }

    #[test]
    fn test_preset_configs() {
        assert_eq!(UnitConfig::default(), UnitConfig::q4_12());
        assert_eq!(UnitConfig::q8_8().format.to_string(), "Q8.8");

        let wide = UnitConfig::q16_16();
        assert_eq!(wide.format.width(), 32);
        assert_eq!(wide.effective_coefficient_width(), 32);
        assert!(wide.validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_json() {
        let config = UnitConfig::q4_12().with_coefficient_width(18);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: UnitConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
