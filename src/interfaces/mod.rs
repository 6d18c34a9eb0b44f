// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod evaluation_observer;
mod fixed_point_function;

pub use evaluation_observer::{
    EvaluationObserver, LoggingObserver, NoOpObserver, RecordingObserver, UnitEvent,
};
pub use fixed_point_function::{FixedPointFunction, ModeFunction};
