// ============================================================================
// Error Metrics
// Accuracy summary of a fixed-point model against its ideal function
// ============================================================================

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mismatch tolerance for the table's own approximation of `2^v`.
pub const DEFAULT_TABLE_TOLERANCE: f64 = 0.01;

/// Mismatch tolerance for the full exp/softplus datapath.
pub const DEFAULT_MODEL_TOLERANCE: f64 = 0.1;

/// Accuracy of a model over a set of samples, in real units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ErrorMetrics {
    /// Number of samples compared
    pub samples: usize,
    /// Largest absolute error
    pub max_abs_error: f64,
    /// Root mean square error
    pub rmse: f64,
    /// Samples whose absolute error exceeds `tolerance`
    pub mismatches: usize,
    /// Samples whose output saturated
    pub saturated: usize,
    /// Threshold used for `mismatches`
    pub tolerance: f64,
}

impl ErrorMetrics {
    /// Fraction of samples that mismatched, 0 when there are no samples.
    pub fn mismatch_ratio(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.mismatches as f64 / self.samples as f64
        }
    }
}

/// Running totals behind [`ErrorMetrics`].
///
/// Accumulators over disjoint sample sets can be merged, which is how
/// parallel sweeps combine their chunks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsAccumulator {
    tolerance: f64,
    samples: usize,
    sum_squared: f64,
    max_abs_error: f64,
    mismatches: usize,
    saturated: usize,
}

impl MetricsAccumulator {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            samples: 0,
            sum_squared: 0.0,
            max_abs_error: 0.0,
            mismatches: 0,
            saturated: 0,
        }
    }

    /// Add one comparison.
    pub fn record(&mut self, approx: f64, ideal: f64, saturated: bool) {
        let error = (approx - ideal).abs();
        self.samples += 1;
        self.sum_squared += error * error;
        self.max_abs_error = self.max_abs_error.max(error);
        if error > self.tolerance {
            self.mismatches += 1;
        }
        if saturated {
            self.saturated += 1;
        }
    }

    /// Fold in an accumulator built over other samples.
    pub fn merge(&mut self, other: &MetricsAccumulator) {
        self.samples += other.samples;
        self.sum_squared += other.sum_squared;
        self.max_abs_error = self.max_abs_error.max(other.max_abs_error);
        self.mismatches += other.mismatches;
        self.saturated += other.saturated;
    }

    pub fn finish(&self) -> ErrorMetrics {
        let rmse = if self.samples == 0 {
            0.0
        } else {
            (self.sum_squared / self.samples as f64).sqrt()
        };
        ErrorMetrics {
            samples: self.samples,
            max_abs_error: self.max_abs_error,
            rmse,
            mismatches: self.mismatches,
            saturated: self.saturated,
            tolerance: self.tolerance,
        }
    }
}
