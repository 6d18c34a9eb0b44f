// ============================================================================
// Fixed-Point Function Interface
// Pairs a bit-exact fixed-point model with its ideal floating-point function
// ============================================================================

use crate::domain::{EvaluationMode, EvaluationResult};
use crate::engine::FixedPointEvaluator;
use crate::numeric::FixedPointFormat;

/// A fixed-point approximation that can be checked against an ideal function.
///
/// Used by the analysis layer to sweep any model the same way.
pub trait FixedPointFunction: Send + Sync {
    /// Evaluate the model on a raw fixed-point input
    fn evaluate(&self, x: i32) -> EvaluationResult;

    /// The real-valued function the model approximates
    fn ideal(&self, x: f64) -> f64;

    /// Format of inputs and outputs
    fn format(&self) -> FixedPointFormat;

    /// Name for logging/metrics
    fn name(&self) -> &str;
}

/// One mode of a [`FixedPointEvaluator`] exposed as a [`FixedPointFunction`].
#[derive(Debug, Clone, Copy)]
pub struct ModeFunction<'t> {
    evaluator: FixedPointEvaluator<'t>,
    mode: EvaluationMode,
}

impl<'t> ModeFunction<'t> {
    pub fn new(evaluator: FixedPointEvaluator<'t>, mode: EvaluationMode) -> Self {
        Self { evaluator, mode }
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }
}

impl FixedPointFunction for ModeFunction<'_> {
    fn evaluate(&self, x: i32) -> EvaluationResult {
        self.evaluator.evaluate(self.mode, x)
    }

    fn ideal(&self, x: f64) -> f64 {
        match self.mode {
            EvaluationMode::Exp => x.exp(),
            EvaluationMode::Softplus => x.exp().ln_1p(),
        }
    }

    fn format(&self) -> FixedPointFormat {
        self.evaluator.format()
    }

    fn name(&self) -> &str {
        match self.mode {
            EvaluationMode::Exp => "exp",
            EvaluationMode::Softplus => "softplus",
        }
    }
}

impl<'t> FixedPointEvaluator<'t> {
    /// View one mode of this evaluator as a [`FixedPointFunction`].
    pub fn function(&self, mode: EvaluationMode) -> ModeFunction<'t> {
        ModeFunction::new(*self, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CoefficientTable;

    #[test]
    fn test_mode_function_delegates() {
        let table = CoefficientTable::reference_q4_12();
        let evaluator = FixedPointEvaluator::new(&table, FixedPointFormat::Q4_12);

        let exp = evaluator.function(EvaluationMode::Exp);
        assert_eq!(exp.name(), "exp");
        assert_eq!(exp.mode(), EvaluationMode::Exp);
        assert_eq!(exp.evaluate(4096).value, 11134);
        assert_eq!(exp.format(), FixedPointFormat::Q4_12);

        let softplus = evaluator.function(EvaluationMode::Softplus);
        assert_eq!(softplus.name(), "softplus");
        assert_eq!(softplus.evaluate(4096).value, 5602);
    }

    #[test]
    fn test_ideal_functions() {
        let table = CoefficientTable::reference_q4_12();
        let evaluator = FixedPointEvaluator::new(&table, FixedPointFormat::Q4_12);

        let exp = evaluator.function(EvaluationMode::Exp);
        assert!((exp.ideal(1.0) - std::f64::consts::E).abs() < 1e-12);

        let softplus = evaluator.function(EvaluationMode::Softplus);
        assert!((softplus.ideal(0.0) - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn test_trait_object() {
        let table = CoefficientTable::reference_q4_12();
        let evaluator = FixedPointEvaluator::new(&table, FixedPointFormat::Q4_12);
        let functions: Vec<Box<dyn FixedPointFunction + '_>> = vec![
            Box::new(evaluator.function(EvaluationMode::Exp)),
            Box::new(evaluator.function(EvaluationMode::Softplus)),
        ];
        assert_eq!(functions[0].evaluate(0).value, 4096);
        assert_eq!(functions[1].evaluate(0).value, 4096);
    }
}
