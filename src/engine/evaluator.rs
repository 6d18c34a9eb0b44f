// ============================================================================
// Fixed-Point Evaluator
// Bit-exact model of the exp/softplus integer pipeline
// ============================================================================

use crate::domain::{CoefficientTable, CoreTrace, EvaluationMode, EvaluationResult};
use crate::numeric::datapath::{
    multiply_wide, narrow_to_width, rescale, saturate, select_segment, shift_by_exponent,
    split_exponent,
};
use crate::numeric::FixedPointFormat;

/// Stateless evaluator bound to a read-only coefficient table.
///
/// Every intermediate is local to the call, so one evaluator (or many
/// evaluators over the same table) can be used from any number of threads.
///
/// Inputs are register values: an argument outside the format's range is
/// first truncated to `W` bits, exactly as driving it onto a `W`-bit bus
/// would.
///
/// # Example
/// ```
/// use exp_softplus_unit::domain::CoefficientTable;
/// use exp_softplus_unit::engine::FixedPointEvaluator;
/// use exp_softplus_unit::numeric::FixedPointFormat;
///
/// let table = CoefficientTable::reference_q4_12();
/// let evaluator = FixedPointEvaluator::new(&table, FixedPointFormat::Q4_12);
///
/// assert_eq!(evaluator.exp(0).value, 4096);      // e^0 = 1.0
/// assert_eq!(evaluator.exp(4096).value, 11134);  // e^1 ≈ 2.718
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FixedPointEvaluator<'t> {
    table: &'t CoefficientTable,
    format: FixedPointFormat,
    log2e: i64,
}

impl<'t> FixedPointEvaluator<'t> {
    /// Bind `table` to `format`.
    ///
    /// Any table works; one whose `log2(N)` exceeds `F` simply selects
    /// segments from the full fraction, clamped to the last segment.
    /// Use [`CoefficientTable::check_precision`] to reject that up front.
    pub fn new(table: &'t CoefficientTable, format: FixedPointFormat) -> Self {
        Self {
            table,
            format,
            log2e: format.log2e(),
        }
    }

    #[inline]
    pub fn table(&self) -> &'t CoefficientTable {
        self.table
    }

    #[inline]
    pub fn format(&self) -> FixedPointFormat {
        self.format
    }

    /// The change-of-base constant `round(log2(e) * S)`.
    #[inline]
    pub fn log2e(&self) -> i64 {
        self.log2e
    }

    // ========================================================================
    // Public operations
    // ========================================================================

    /// Evaluate in the given mode.
    #[inline]
    pub fn evaluate(&self, mode: EvaluationMode, x: i32) -> EvaluationResult {
        match mode {
            EvaluationMode::Exp => self.exp(x),
            EvaluationMode::Softplus => self.softplus(x),
        }
    }

    /// `e^x`, computed as `2^(x * log2(e))`.
    #[inline]
    pub fn exp(&self, x: i32) -> EvaluationResult {
        self.trace(x).result
    }

    /// Softplus as the hardware computes it.
    ///
    /// - `x < 0`: returns `e^x` unchanged. The unit uses the exponential as
    ///   its stand-in for `log(1 + e^x)` on negative inputs; this is not a
    ///   faithful softplus.
    /// - `x >= 0`: `x + e^-x`, summed wide and saturated.
    ///
    /// `saturated` is set if either the inner exponential or the final sum
    /// clamped.
    pub fn softplus(&self, x: i32) -> EvaluationResult {
        let input = self.register(x as i64);
        if input < 0 {
            return self.core_exp(input).result;
        }

        let exp_neg = self.core_exp(-input).result;
        let sum = input as i128 + exp_neg.value as i128;
        let (value, clamped) = saturate(sum, self.format);
        EvaluationResult::new(value, clamped || exp_neg.saturated)
    }

    /// Run the exponential pipeline and return every intermediate register.
    pub fn trace(&self, x: i32) -> CoreTrace {
        self.core_exp(self.register(x as i64))
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    /// Truncate to the working register width.
    #[inline]
    fn register(&self, value: i64) -> i64 {
        narrow_to_width(value, self.format.width())
    }

    fn core_exp(&self, input: i64) -> CoreTrace {
        let frac_bits = self.format.frac_bits();
        let width = self.format.width();

        // Change of base: z = x * log2(e), back in the working format
        let full_product = multiply_wide(input, self.log2e);
        let z = narrow_to_width(rescale(full_product, frac_bits), width);

        // z = u + v / S with v in [0, S)
        let (integer_part, fraction) = split_exponent(z, frac_bits);

        // 2^(v / S) from the linear piece, roughly [S, 2S)
        let segment = select_segment(fraction, frac_bits, self.table.len());
        let coefficients = self.table.segments()[segment];
        let product = multiply_wide(coefficients.a as i64, fraction);
        let linear = narrow_to_width(rescale(product, frac_bits) + coefficients.b as i64, width);

        // Apply 2^u and clamp to the register range
        let scaled = shift_by_exponent(linear, integer_part);
        let (value, saturated) = saturate(scaled, self.format);

        CoreTrace {
            input,
            full_product,
            z,
            integer_part,
            fraction,
            segment,
            linear,
            scaled,
            result: EvaluationResult::new(value, saturated),
        }
    }
}

/// `e^x` for a fixed-point `x` in `format`, using `table`.
pub fn evaluate_exp(x: i32, table: &CoefficientTable, format: FixedPointFormat) -> i32 {
    FixedPointEvaluator::new(table, format).exp(x).value
}

/// Hardware softplus of a fixed-point `x` in `format`, using `table`.
pub fn evaluate_softplus(x: i32, table: &CoefficientTable, format: FixedPointFormat) -> i32 {
    FixedPointEvaluator::new(table, format).softplus(x).value
}
