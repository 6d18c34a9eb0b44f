// ============================================================================
// Input Sweeps
// Evaluate models across a real-valued range and compare to the ideal
// ============================================================================

use super::metrics::{ErrorMetrics, MetricsAccumulator};
use crate::domain::{CoefficientTable, EvaluationResult};
use crate::interfaces::FixedPointFunction;
use crate::numeric::FixedPointFormat;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `points` evenly spaced samples from `start` to `end`, both included.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sweep {
    pub start: f64,
    pub end: f64,
    pub points: usize,
}

impl Sweep {
    pub fn new(start: f64, end: f64, points: usize) -> Self {
        Self { start, end, points }
    }

    /// `[-1, 1]` in 1000 points, the datapath's verification range.
    pub fn symmetric_unit() -> Self {
        Self::new(-1.0, 1.0, 1000)
    }

    /// `[0, 1]` in 1000 points, the table's domain.
    pub fn unit_interval() -> Self {
        Self::new(0.0, 1.0, 1000)
    }

    /// Sample `index`. The last sample is exactly `end`.
    pub fn value(&self, index: usize) -> f64 {
        if self.points <= 1 {
            return self.start;
        }
        if index + 1 == self.points {
            return self.end;
        }
        let step = (self.end - self.start) / (self.points - 1) as f64;
        self.start + step * index as f64
    }

    /// All samples in order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.points).map(move |i| self.value(i))
    }
}

impl Default for Sweep {
    fn default() -> Self {
        Self::symmetric_unit()
    }
}

/// One evaluated sample, for callers that plot or tabulate results.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplePoint {
    /// Real-valued input
    pub x: f64,
    /// `to_fixed(x)`
    pub input: i32,
    /// Raw model output
    pub output: EvaluationResult,
    /// `to_float(output)`
    pub approx: f64,
    /// Ideal function at `x`
    pub ideal: f64,
}

/// Evaluate `function` at every sample of `sweep`.
pub fn sample_function(function: &dyn FixedPointFunction, sweep: Sweep) -> Vec<SamplePoint> {
    let format = function.format();
    sweep
        .values()
        .map(|x| {
            let input = format.to_fixed(x);
            let output = function.evaluate(input);
            SamplePoint {
                x,
                input,
                output,
                approx: format.to_float(output.value),
                ideal: function.ideal(x),
            }
        })
        .collect()
}

/// Error metrics of `function` over `sweep`.
///
/// Each sample is quantized with `to_fixed`, evaluated, converted back with
/// `to_float` and compared to the ideal function at the unquantized sample.
pub fn sweep_function(
    function: &dyn FixedPointFunction,
    sweep: Sweep,
    tolerance: f64,
) -> ErrorMetrics {
    let metrics = accumulate(function, sweep, 0..sweep.points, tolerance).finish();
    tracing::debug!(
        function = function.name(),
        samples = metrics.samples,
        max_abs_error = metrics.max_abs_error,
        rmse = metrics.rmse,
        mismatches = metrics.mismatches,
        "sweep finished"
    );
    metrics
}

/// [`sweep_function`] split across `threads` scoped worker threads.
///
/// Every sample depends only on its own input and the shared read-only
/// model, so chunking does not change the counts or the maximum; the RMSE
/// may differ in the last bits from the sequential sum order.
pub fn sweep_function_parallel(
    function: &dyn FixedPointFunction,
    sweep: Sweep,
    tolerance: f64,
    threads: usize,
) -> ErrorMetrics {
    let threads = threads.max(1);
    let chunk = sweep.points.div_ceil(threads).max(1);
    let ranges: Vec<Range<usize>> = (0..sweep.points)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(sweep.points))
        .collect();

    let partials = crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = ranges
            .into_iter()
            .map(|range| scope.spawn(move |_| accumulate(function, sweep, range, tolerance)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<std::thread::Result<Vec<_>>>()
    });

    let partials = match partials {
        Ok(Ok(partials)) => partials,
        Ok(Err(payload)) | Err(payload) => std::panic::resume_unwind(payload),
    };

    let mut total = MetricsAccumulator::new(tolerance);
    for partial in &partials {
        total.merge(partial);
    }
    total.finish()
}

/// Accuracy of the table's floating-point view of `2^v` over `sweep`.
///
/// Uses the quantized coefficients but none of the integer datapath, which
/// isolates table quality from pipeline effects.
pub fn table_metrics(
    table: &CoefficientTable,
    format: FixedPointFormat,
    sweep: Sweep,
    tolerance: f64,
) -> ErrorMetrics {
    let mut acc = MetricsAccumulator::new(tolerance);
    for v in sweep.values() {
        acc.record(table.evaluate_float(v, format), v.exp2(), false);
    }
    acc.finish()
}

fn accumulate(
    function: &dyn FixedPointFunction,
    sweep: Sweep,
    range: Range<usize>,
    tolerance: f64,
) -> MetricsAccumulator {
    let format = function.format();
    let mut acc = MetricsAccumulator::new(tolerance);
    for index in range {
        let x = sweep.value(index);
        let output = function.evaluate(format.to_fixed(x));
        acc.record(format.to_float(output.value), function.ideal(x), output.saturated);
    }
    acc
}
