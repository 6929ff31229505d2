//! Errors raised by registers, gates, and simulator back-ends.
//!
//! All of these are raised synchronously at the offending call, before any
//! simulator state has been touched.

use thiserror::Error;

/// Everything that can go wrong while driving a register.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum QsyError {
    /// A qubit or bit index fell outside `[0, size)`.
    #[error(
        "can't access {register}[{index}]: register index out of range \
        (register size {size})"
    )]
    Range { register: String, index: usize, size: usize },

    /// The number of qubit arguments doesn't match a gate's arity.
    #[error("gate {gate} expects {expected} qubit arguments, got {got}")]
    Arity { gate: String, expected: usize, got: usize },

    /// A gate outside the Clifford subset was sent to the tableau back-end.
    #[error(
        "unsupported gate \"{gate}\" for the stabilizer back-end; \
        supported gates are {supported}"
    )]
    UnsupportedGate { gate: String, supported: String },

    /// Registers must hold at least one (qu)bit, and dense registers are
    /// additionally capped by memory.
    #[error("invalid register size {size}: {reason}")]
    InvalidRegisterSize { size: usize, reason: &'static str },

    /// Bulk replacement of a classical register with the wrong number of
    /// bits.
    #[error("register {register} holds {expected} bits, got {got}")]
    SizeMismatch { register: String, expected: usize, got: usize },

    /// The same qubit was passed twice to a single gate application.
    #[error("gate {gate} received qubit {index} more than once")]
    DuplicateQubit { gate: String, index: usize },

    /// Rowsum produced an odd power of *i*, which no valid stabilizer state
    /// can do.
    #[error("inconsistent tableau: rowsum into row {row} gave phase i^{exponent}")]
    InconsistentTableau { row: usize, exponent: u8 },

    /// A back-end name couldn't be parsed.
    #[error("unknown back-end \"{0}\"; expected one of: statevector, chp")]
    UnknownBackend(String),
}

pub type Result<T> = std::result::Result<T, QsyError>;
