// ============================================================================
// Engine Module
// Coefficient generation and the bit-exact evaluation pipeline
// ============================================================================

mod evaluator;
mod generator;
mod unit;

pub mod factory;

pub use evaluator::{evaluate_exp, evaluate_softplus, FixedPointEvaluator};
pub use factory::{create_from_config, UnitBuilder};
pub use generator::{generate_table, secant_coefficients, TableGenerator};
pub use unit::ExpSoftplusUnit;
