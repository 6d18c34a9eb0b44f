// ============================================================================
// Exp/Softplus Unit Library
// Bit-exact fixed-point model of a piecewise-linear exp/softplus unit
// ============================================================================

//! # Exp/Softplus Unit
//!
//! A bit-exact model of a hardware unit that computes `e^x` and softplus in
//! fixed point, using a piecewise-linear lookup table for `2^v`.
//!
//! ## Features
//!
//! - **Coefficient generation** for any power-of-two segment count and Q format
//! - **Bit-exact datapath** with explicit widening, truncation and saturation
//! - **Register traces** of every pipeline stage for RTL cross-checking
//! - **Accuracy sweeps** against the ideal functions, optionally in parallel
//!
//! ## Example
//!
//! ```rust
//! use exp_softplus_unit::prelude::*;
//! use std::sync::Arc;
//!
//! // Reference hardware: Q4.12, 16 segments
//! let unit = create_from_config(UnitConfig::q4_12(), Arc::new(NoOpObserver)).unwrap();
//! let format = unit.format();
//!
//! let y = unit.exp(format.to_fixed(1.0));
//! assert_eq!(y.value, 11134);
//! assert!((format.to_float(y.value) - std::f64::consts::E).abs() < 0.01);
//!
//! // Accuracy over [-1, 1]
//! let exp = unit.evaluator().function(EvaluationMode::Exp);
//! let metrics = sweep_function(&exp, Sweep::symmetric_unit(), DEFAULT_MODEL_TOLERANCE);
//! assert_eq!(metrics.mismatches, 0);
//! ```

pub mod analysis;
pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::analysis::{
        sample_function, sweep_function, sweep_function_parallel, table_metrics, ErrorMetrics,
        SamplePoint, Sweep, DEFAULT_MODEL_TOLERANCE, DEFAULT_TABLE_TOLERANCE,
    };
    pub use crate::domain::{
        CoefficientTable, CoreTrace, EvaluationMode, EvaluationResult, Segment, UnitConfig,
    };
    pub use crate::engine::{
        create_from_config, evaluate_exp, evaluate_softplus, generate_table, ExpSoftplusUnit,
        FixedPointEvaluator, TableGenerator, UnitBuilder,
    };
    pub use crate::interfaces::{
        EvaluationObserver, FixedPointFunction, LoggingObserver, NoOpObserver,
        RecordingObserver, UnitEvent,
    };
    pub use crate::numeric::{ErrorKind, FixedPointFormat, UnitError, UnitResult};
}
