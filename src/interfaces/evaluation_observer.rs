// ============================================================================
// Evaluation Observer Interface
// Defines the contract for observing table builds and saturation events
// ============================================================================

use crate::domain::EvaluationMode;
use crate::numeric::FixedPointFormat;
use parking_lot::Mutex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by an exp/softplus unit
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnitEvent {
    /// Coefficient table generated and bound to the unit
    TableGenerated {
        segments: usize,
        format: FixedPointFormat,
        coefficient_width: u32,
    },

    /// An evaluation clamped its output to the format range
    Saturated {
        mode: EvaluationMode,
        input: i32,
        output: i32,
    },
}

/// Observer trait for unit events
/// Implementations can handle logging, metrics, coverage collection, etc.
pub trait EvaluationObserver: Send + Sync {
    /// Handle a unit event
    fn on_event(&self, event: UnitEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<UnitEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op observer
pub struct NoOpObserver;

impl EvaluationObserver for NoOpObserver {
    fn on_event(&self, _event: UnitEvent) {
        // Do nothing
    }
}

/// Logging observer
pub struct LoggingObserver;

impl EvaluationObserver for LoggingObserver {
    fn on_event(&self, event: UnitEvent) {
        match event {
            UnitEvent::Saturated {
                mode,
                input,
                output,
            } => tracing::warn!(%mode, input, output, "evaluation saturated"),
            other => tracing::debug!("unit event: {:?}", other),
        }
    }
}

/// Observer that keeps every event, for inspection after a run
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<UnitEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the events seen so far
    pub fn events(&self) -> Vec<UnitEvent> {
        self.events.lock().clone()
    }

    /// Number of saturation events seen so far
    pub fn saturation_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, UnitEvent::Saturated { .. }))
            .count()
    }

    /// Drain the recorded events
    pub fn take(&self) -> Vec<UnitEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EvaluationObserver for RecordingObserver {
    fn on_event(&self, event: UnitEvent) {
        self.events.lock().push(event);
    }

    fn on_events(&self, events: Vec<UnitEvent>) {
        self.events.lock().extend(events);
    }
}
