// ============================================================================
// Numeric Module
// Fixed-point formats and width-explicit datapath primitives
// ============================================================================
//
// This module provides:
// - FixedPointFormat: Q(I.F) descriptor with conversions and range helpers
// - datapath: the named integer stages of the hardware pipeline
// - UnitError: Error types for format and table construction
//
// Design principles:
// - No floating-point operations in the datapath
// - Every narrowing is explicit (wrap) or saturating (clamp), never implicit
// - Evaluation never fails; only construction returns Result

pub mod datapath;
mod errors;
mod format;

pub use errors::{Coefficient, ErrorKind, UnitError, UnitResult};
pub use format::{FixedPointFormat, MAX_WIDTH, MIN_WIDTH};
