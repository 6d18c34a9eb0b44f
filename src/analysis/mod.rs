// ============================================================================
// Analysis Module
// Accuracy data for verification and reporting layers
// ============================================================================
//
// Produces numbers only. Printing, plotting and persistence belong to the
// caller.

mod metrics;
mod sweep;

pub use metrics::{
    ErrorMetrics, MetricsAccumulator, DEFAULT_MODEL_TOLERANCE, DEFAULT_TABLE_TOLERANCE,
};
pub use sweep::{
    sample_function, sweep_function, sweep_function_parallel, table_metrics, SamplePoint, Sweep,
};
