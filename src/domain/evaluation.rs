// ============================================================================
// Evaluation Values
// Mode select, per-call results and pipeline traces
// ============================================================================

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Function computed by the unit, as driven by its mode-select input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EvaluationMode {
    /// `e^x`
    #[default]
    Exp,
    /// `log(1 + e^x)`, with the hardware's negative-input shortcut
    Softplus,
}

impl EvaluationMode {
    /// Encoding on the unit's mode pin: 1 for exp, 0 for softplus.
    #[inline]
    pub const fn mode_bit(self) -> u8 {
        match self {
            EvaluationMode::Exp => 1,
            EvaluationMode::Softplus => 0,
        }
    }

    /// Decode the mode pin. Only `1` selects exp.
    #[inline]
    pub const fn from_mode_bit(bit: u8) -> Self {
        if bit == 1 {
            EvaluationMode::Exp
        } else {
            EvaluationMode::Softplus
        }
    }
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationMode::Exp => write!(f, "exp"),
            EvaluationMode::Softplus => write!(f, "softplus"),
        }
    }
}

/// Output of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvaluationResult {
    /// Output register, in the evaluation's format
    pub value: i32,
    /// Whether the output was clamped to the format range
    pub saturated: bool,
}

impl EvaluationResult {
    #[inline]
    pub const fn new(value: i32, saturated: bool) -> Self {
        Self { value, saturated }
    }
}

/// Every intermediate register of one `core_exp` pass.
///
/// Intended for cross-checking against RTL waveforms stage by stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoreTrace {
    /// Input after truncation to the register width
    pub input: i64,
    /// `x * LOG2E`, double width
    pub full_product: i64,
    /// `x * log2(e)` back in the working format
    pub z: i64,
    /// Integer power of two, `z >> F`
    pub integer_part: i64,
    /// Fractional position, `z & (S - 1)`
    pub fraction: i64,
    /// Selected segment
    pub segment: usize,
    /// `2^fraction` from the linear piece, in `[S, 2S)` for a sane table
    pub linear: i64,
    /// `linear` scaled by `2^integer_part`, before saturation
    pub scaled: i128,
    /// Saturated output
    pub result: EvaluationResult,
}
