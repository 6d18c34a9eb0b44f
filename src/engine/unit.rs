// ============================================================================
// Exp/Softplus Unit
// A configured unit: format, coefficient table and event observer
// ============================================================================

use crate::domain::{CoefficientTable, CoreTrace, EvaluationMode, EvaluationResult, UnitConfig};
use crate::engine::FixedPointEvaluator;
use crate::interfaces::{EvaluationObserver, UnitEvent};
use crate::numeric::{FixedPointFormat, UnitResult};
use std::sync::Arc;

/// Exp/softplus unit owning its coefficient table
///
/// Evaluation is stateless; the only side effect is reporting saturated
/// outputs to the observer.
pub struct ExpSoftplusUnit {
    /// Configuration the table was built for
    config: UnitConfig,

    /// Read-only coefficient table
    table: CoefficientTable,

    /// Observer for saturation events
    observer: Arc<dyn EvaluationObserver>,
}

impl ExpSoftplusUnit {
    /// Create a unit around an existing table
    ///
    /// # Errors
    /// Returns a config error if the table has more segments than the
    /// format's fractional bits can select.
    pub fn with_table(
        format: FixedPointFormat,
        table: CoefficientTable,
        observer: Arc<dyn EvaluationObserver>,
    ) -> UnitResult<Self> {
        let config = UnitConfig::new(format, table.len())
            .with_coefficient_width(table.coefficient_width());
        config.validate()?;

        Ok(Self {
            config,
            table,
            observer,
        })
    }

    /// Evaluator borrowing this unit's table
    #[inline]
    pub fn evaluator(&self) -> FixedPointEvaluator<'_> {
        FixedPointEvaluator::new(&self.table, self.config.format)
    }

    /// Evaluate in `mode`, reporting saturation to the observer
    pub fn evaluate(&self, mode: EvaluationMode, x: i32) -> EvaluationResult {
        let result = self.evaluator().evaluate(mode, x);
        if result.saturated {
            self.observer.on_event(UnitEvent::Saturated {
                mode,
                input: x,
                output: result.value,
            });
        }
        result
    }

    /// Evaluate a batch of inputs in `mode`
    ///
    /// Saturation events are delivered in one batch.
    pub fn evaluate_all(&self, mode: EvaluationMode, inputs: &[i32]) -> Vec<EvaluationResult> {
        let evaluator = self.evaluator();
        let mut events = Vec::new();
        let results = inputs
            .iter()
            .map(|&x| {
                let result = evaluator.evaluate(mode, x);
                if result.saturated {
                    events.push(UnitEvent::Saturated {
                        mode,
                        input: x,
                        output: result.value,
                    });
                }
                result
            })
            .collect();

        if !events.is_empty() {
            self.observer.on_events(events);
        }
        results
    }

    /// `e^x`
    pub fn exp(&self, x: i32) -> EvaluationResult {
        self.evaluate(EvaluationMode::Exp, x)
    }

    /// Hardware softplus
    pub fn softplus(&self, x: i32) -> EvaluationResult {
        self.evaluate(EvaluationMode::Softplus, x)
    }

    /// Every register of the exponential pipeline for `x`
    pub fn trace(&self, x: i32) -> CoreTrace {
        self.evaluator().trace(x)
    }

    /// Get the coefficient table
    pub fn table(&self) -> &CoefficientTable {
        &self.table
    }

    /// Get the working format
    pub fn format(&self) -> FixedPointFormat {
        self.config.format
    }

    /// Get the configuration
    pub fn config(&self) -> &UnitConfig {
        &self.config
    }

    pub(crate) fn from_parts(
        config: UnitConfig,
        table: CoefficientTable,
        observer: Arc<dyn EvaluationObserver>,
    ) -> Self {
        debug_assert!(config.validate().is_ok());
        debug_assert_eq!(config.segments, table.len());
        Self {
            config,
            table,
            observer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::{NoOpObserver, RecordingObserver};
    use crate::numeric::UnitError;

    #[test]
    fn test_with_reference_table() {
        let unit = ExpSoftplusUnit::with_table(
            FixedPointFormat::Q4_12,
            CoefficientTable::reference_q4_12(),
            Arc::new(NoOpObserver),
        )
        .unwrap();

        assert_eq!(unit.config().segments, 16);
        assert_eq!(unit.config().effective_coefficient_width(), 16);
        assert_eq!(unit.exp(4096).value, 11134);
        assert_eq!(unit.softplus(4096).value, 5602);
        assert_eq!(unit.trace(4096).segment, 7);
    }

    #[test]
    fn test_rejects_table_finer_than_format() {
        let format = FixedPointFormat::new(8, 2).unwrap();
        let result = ExpSoftplusUnit::with_table(
            format,
            CoefficientTable::reference_q4_12(),
            Arc::new(NoOpObserver),
        );
        assert!(matches!(
            result,
            Err(UnitError::SegmentsExceedPrecision { segments: 16, .. })
        ));
    }

    #[test]
    fn test_saturation_reported() {
        let observer = Arc::new(RecordingObserver::new());
        let unit = ExpSoftplusUnit::with_table(
            FixedPointFormat::Q4_12,
            CoefficientTable::reference_q4_12(),
            observer.clone(),
        )
        .unwrap();

        assert!(!unit.exp(0).saturated);
        assert_eq!(observer.saturation_count(), 0);

        let result = unit.exp(16384);
        assert!(result.saturated);
        assert_eq!(
            observer.events(),
            vec![UnitEvent::Saturated {
                mode: EvaluationMode::Exp,
                input: 16384,
                output: 32767,
            }]
        );
    }

    #[test]
    fn test_evaluate_all_batches_events() {
        let observer = Arc::new(RecordingObserver::new());
        let unit = ExpSoftplusUnit::with_table(
            FixedPointFormat::Q4_12,
            CoefficientTable::reference_q4_12(),
            observer.clone(),
        )
        .unwrap();

        let results = unit.evaluate_all(EvaluationMode::Exp, &[0, 4096, 12288, 16384]);
        let values: Vec<i32> = results.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![4096, 11134, 32767, 32767]);
        assert_eq!(observer.saturation_count(), 2);
    }

    #[test]
    fn test_from_parts_with_generated_table() {
        let config = UnitConfig::q8_8();
        let table = crate::engine::generate_table(16, config.format).unwrap();
        let unit = ExpSoftplusUnit::from_parts(config, table, Arc::new(NoOpObserver));
        assert_eq!(unit.exp(256).value, 694);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic]
    fn test_from_parts_rejects_invalid_config_in_debug() {
        let config = UnitConfig::q4_12().with_segments(12);
        ExpSoftplusUnit::from_parts(
            config,
            CoefficientTable::reference_q4_12(),
            Arc::new(NoOpObserver),
        );
    }
}
