//! The capability contract shared by all simulator back-ends.
//!
//! A [`Backend`] owns the authoritative state of a single register and knows
//! how to evolve it under gates and measurements. Two are provided:
//! [`DenseBackend`], which keeps the full vector of 2<sup>*n*</sup> complex
//! amplitudes and so can run any gate, and [`StabBackend`], which keeps a
//! Gottesman-Knill tableau and so runs in polynomial time but only for
//! Clifford gates.

use std::{ fmt, str::FromStr };
use itertools::Itertools;
use num_complex::Complex64 as C64;
use rand::rngs::StdRng;
use crate::{
    dense::DenseBackend,
    error::{ QsyError, Result },
    gate::Gate,
    stab::StabBackend,
};

/// Lazy sequence of `(basis index, amplitude)` pairs.
pub type StateIter<'a> = Box<dyn Iterator<Item = (usize, C64)> + 'a>;

/// Magnitudes at or below this are treated as zero when rendering states.
pub const ZERO_TOL: f64 = 1e-8;

/// Operations every back-end provides.
///
/// Qubit arguments to [`Self::apply_gate`] are ordered controls-first, with
/// the target last. Measurement outcomes are bits, `0` or `1`.
pub trait Backend: fmt::Debug {
    /// Name of the register this back-end is simulating.
    fn name(&self) -> &str;

    /// Number of qubits.
    fn size(&self) -> usize;

    /// Apply `gate` (or its adjoint) to the given qubits.
    ///
    /// Nothing is mutated if an error is returned.
    fn apply_gate(&mut self, gate: &Gate, qubits: &[usize], adjoint: bool)
        -> Result<()>;

    /// Perform a projective Z-basis measurement on a single qubit, collapsing
    /// the state accordingly.
    fn measure(&mut self, target: usize) -> Result<u8>;

    /// Measure every qubit, returning outcomes ordered by qubit index.
    fn measure_all(&mut self) -> Result<Vec<u8>>;

    /// Iterate over all basis-state amplitudes.
    ///
    /// Back-ends without access to amplitudes yield nothing.
    fn yield_state(&self) -> StateIter<'_>;

    /// Render the state as a superposition of basis kets.
    ///
    /// Returns an empty string if unsupported.
    fn to_dirac(&self) -> String;

    /// Check that `index` addresses a qubit of this back-end.
    fn check_in_range(&self, index: usize) -> Result<()> {
        check_in_range(self.name(), self.size(), index)
    }
}

/// Fail with [`QsyError::Range`] unless `index < size`.
pub fn check_in_range(name: &str, size: usize, index: usize) -> Result<()> {
    if index >= size {
        Err(QsyError::Range { register: name.to_string(), index, size })
    } else {
        Ok(())
    }
}

/// Validate a full set of qubit arguments for `gate`: the count must match
/// the gate's arity, every index must be in range, and no index may repeat.
pub fn check_qubits(name: &str, size: usize, gate: &Gate, qubits: &[usize])
    -> Result<()>
{
    if qubits.len() != gate.arity() {
        return Err(QsyError::Arity {
            gate: gate.name().to_string(),
            expected: gate.arity(),
            got: qubits.len(),
        });
    }
    qubits.iter()
        .try_for_each(|k| check_in_range(name, size, *k))?;
    if let Some(dup) = qubits.iter().duplicates().next() {
        return Err(QsyError::DuplicateQubit {
            gate: gate.name().to_string(),
            index: *dup,
        });
    }
    Ok(())
}

fn format_real(x: f64) -> String {
    // `+ 0.0` sends -0.0 to +0.0
    let s = format!("{:+.5}", x + 0.0);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Format a complex amplitude for display, e.g. `+0.70711`, `-0.5i`, or
/// `+0.5 -0.5i`.
///
/// Components within [`ZERO_TOL`] of zero are dropped.
pub fn format_complex(a: C64) -> String {
    let a = if a.norm() <= ZERO_TOL { C64::from(0.0) } else { a };
    if a.im.abs() <= ZERO_TOL {
        format_real(a.re)
    } else if a.re.abs() <= ZERO_TOL {
        format!("{}i", format_real(a.im))
    } else {
        format!("{} {}i", format_real(a.re), format_real(a.im))
    }
}

/// Selects which [`Backend`] a register is built on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// [`DenseBackend`]
    #[default]
    Dense,
    /// [`StabBackend`]
    Stabilizer,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dense => write!(f, "statevector"),
            Self::Stabilizer => write!(f, "chp"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = QsyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "statevector" | "dense" => Ok(Self::Dense),
            "chp" | "stabilizer" => Ok(Self::Stabilizer),
            _ => Err(QsyError::UnknownBackend(s.to_string())),
        }
    }
}

impl BackendKind {
    /// Construct a new back-end of this kind in the ∣0...0⟩ state.
    pub fn build(self, size: usize, name: &str, rng: StdRng)
        -> Result<Box<dyn Backend>>
    {
        match self {
            Self::Dense
                => Ok(Box::new(DenseBackend::new(size, name, rng)?)),
            Self::Stabilizer
                => Ok(Box::new(StabBackend::new(size, name, rng)?)),
        }
    }
}
