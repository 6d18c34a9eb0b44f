// ============================================================================
// Unit Factory
// Creates exp/softplus units with proper configuration
// ============================================================================

use crate::domain::{CoefficientTable, UnitConfig};
use crate::engine::{ExpSoftplusUnit, TableGenerator};
use crate::interfaces::{EvaluationObserver, UnitEvent};
use crate::numeric::{FixedPointFormat, UnitResult};
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a unit from configuration, generating its coefficient table
///
/// # Arguments
/// * `config` - Unit configuration
/// * `observer` - Observer for table and saturation events
///
/// # Returns
/// * `UnitResult<ExpSoftplusUnit>` - Configured unit or error
///
/// # Example
/// ```
/// use exp_softplus_unit::prelude::*;
/// use std::sync::Arc;
///
/// let unit = create_from_config(UnitConfig::q4_12(), Arc::new(NoOpObserver)).unwrap();
/// assert_eq!(unit.exp(0).value, 4096);
/// ```
pub fn create_from_config(
    config: UnitConfig,
    observer: Arc<dyn EvaluationObserver>,
) -> UnitResult<ExpSoftplusUnit> {
    // Validate configuration first
    config.validate()?;

    let table = TableGenerator::from_config(config).generate()?;

    observer.on_event(UnitEvent::TableGenerated {
        segments: table.len(),
        format: config.format,
        coefficient_width: table.coefficient_width(),
    });
    tracing::debug!(
        format = %config.format,
        segments = config.segments,
        "created exp/softplus unit"
    );

    Ok(ExpSoftplusUnit::from_parts(config, table, observer))
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating units with fluent API
///
/// # Example
/// ```
/// use exp_softplus_unit::prelude::*;
/// use std::sync::Arc;
///
/// let unit = UnitBuilder::new()
///     .format(FixedPointFormat::Q8_8)
///     .segments(8)
///     .build(Arc::new(NoOpObserver))
///     .unwrap();
/// assert_eq!(unit.table().len(), 8);
/// ```
pub struct UnitBuilder {
    config: UnitConfig,
    table: Option<CoefficientTable>,
}

impl UnitBuilder {
    /// Create a builder starting from the reference Q4.12 configuration
    pub fn new() -> Self {
        Self {
            config: UnitConfig::q4_12(),
            table: None,
        }
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Set the working format
    pub fn format(mut self, format: FixedPointFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Set the segment count of the generated table
    pub fn segments(mut self, segments: usize) -> Self {
        self.config.segments = segments;
        self
    }

    /// Set the coefficient container width
    pub fn coefficient_width(mut self, width: u32) -> Self {
        self.config.coefficient_width = Some(width);
        self
    }

    /// Use an existing table instead of generating one
    ///
    /// Segment count and coefficient width are taken from the table.
    pub fn with_table(mut self, table: CoefficientTable) -> Self {
        self.table = Some(table);
        self
    }

    // ========================================================================
    // Preset Configurations
    // ========================================================================

    /// Apply the reference Q4.12 configuration
    pub fn q4_12() -> Self {
        Self::from_config(UnitConfig::q4_12())
    }

    /// Apply the Q8.8 configuration
    pub fn q8_8() -> Self {
        Self::from_config(UnitConfig::q8_8())
    }

    /// Apply the Q16.16 configuration
    pub fn q16_16() -> Self {
        Self::from_config(UnitConfig::q16_16())
    }

    /// Start from an explicit configuration
    pub fn from_config(config: UnitConfig) -> Self {
        Self {
            config,
            table: None,
        }
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the unit
    pub fn build(self, observer: Arc<dyn EvaluationObserver>) -> UnitResult<ExpSoftplusUnit> {
        match self.table {
            Some(table) => ExpSoftplusUnit::with_table(self.config.format, table, observer),
            None => create_from_config(self.config, observer),
        }
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &UnitConfig {
        &self.config
    }
}

impl Default for UnitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::{NoOpObserver, RecordingObserver};
    use crate::numeric::{ErrorKind, UnitError};

    #[test]
    fn test_create_reference_unit() {
        let unit = create_from_config(UnitConfig::q4_12(), Arc::new(NoOpObserver)).unwrap();
        assert_eq!(unit.table(), &CoefficientTable::reference_q4_12());
        assert_eq!(unit.format(), FixedPointFormat::Q4_12);
    }

    #[test]
    fn test_create_reports_table() {
        let observer = Arc::new(RecordingObserver::new());
        create_from_config(UnitConfig::q8_8(), observer.clone()).unwrap();
        assert_eq!(
            observer.events(),
            vec![UnitEvent::TableGenerated {
                segments: 16,
                format: FixedPointFormat::Q8_8,
                coefficient_width: 16,
            }]
        );
    }

    #[test]
    fn test_create_invalid_config() {
        let config = UnitConfig::q4_12().with_segments(10);
        let err = create_from_config(config, Arc::new(NoOpObserver)).err();
        assert_eq!(err, Some(UnitError::InvalidSegmentCount(10)));
    }

    #[test]
    fn test_create_overflowing_config() {
        let config = UnitConfig::q16_16().with_coefficient_width(16);
        let err = create_from_config(config, Arc::new(NoOpObserver))
            .err()
            .map(|e| e.kind());
        assert_eq!(err, Some(ErrorKind::Overflow));
    }

    #[test]
    fn test_builder_pattern() {
        let unit = UnitBuilder::new()
            .format(FixedPointFormat::Q16_16)
            .segments(32)
            .coefficient_width(20)
            .build(Arc::new(NoOpObserver))
            .unwrap();

        assert_eq!(unit.table().len(), 32);
        assert_eq!(unit.table().coefficient_width(), 20);
        assert_eq!(unit.exp(0).value, 65536);
    }

    #[test]
    fn test_builder_with_table() {
        let unit = UnitBuilder::new()
            .segments(64)
            .with_table(CoefficientTable::reference_q4_12())
            .build(Arc::new(NoOpObserver))
            .unwrap();
        assert_eq!(unit.config().segments, 16);
        assert_eq!(unit.exp(4096).value, 11134);
    }

    #[test]
    fn test_preset_builders() {
        let q4 = UnitBuilder::q4_12().build(Arc::new(NoOpObserver)).unwrap();
        assert_eq!(q4.format().to_string(), "Q4.12");

        let q16 = UnitBuilder::q16_16();
        assert_eq!(q16.get_config().segments, 64);
        let q16 = q16.build(Arc::new(NoOpObserver)).unwrap();
        assert_eq!(q16.exp(65536).value, 178_146);

        let q8 = UnitBuilder::q8_8().build(Arc::new(NoOpObserver)).unwrap();
        assert_eq!(q8.exp(256).value, 694);
    }
}
