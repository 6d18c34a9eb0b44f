// ============================================================================
// Domain Models Module
// Configuration, coefficient tables and evaluation values
// ============================================================================

pub mod coefficient_table;
pub mod config;
pub mod evaluation;

pub use coefficient_table::{
    CoefficientTable, Segment, MAX_COEFFICIENT_WIDTH, MIN_COEFFICIENT_WIDTH,
    REFERENCE_INTERCEPTS_Q4_12, REFERENCE_SLOPES_Q4_12,
};
pub use config::{UnitConfig, DEFAULT_SEGMENTS};
pub use evaluation::{CoreTrace, EvaluationMode, EvaluationResult};
