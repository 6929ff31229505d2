//! Exact simulation via a dense vector of complex amplitudes.
//!
//! The state of *n* qubits is stored as 2<sup>*n*</sup> amplitudes, where the
//! binary digits of basis index `i` give the qubit values with qubit 0 as the
//! most significant bit. Any gate can be applied, but memory and time both
//! grow as 2<sup>*n*</sup>.
//!
//! Gates act on their target through a 2×2 operator, with any control qubits
//! restricting the action to the subspace where every control is ∣1⟩. The
//! literal construction of the full 2<sup>*n*</sup> × 2<sup>*n*</sup> operator
//! is available as [`full_transformation`], but [`DenseBackend`] itself
//! updates amplitude pairs in place, which is equivalent and costs
//! *O*(2<sup>*n*</sup>) per gate rather than *O*(4<sup>*n*</sup>).
//!
//! # Example
//! ```
//! use qreg_sim::{ backend::Backend, dense::DenseBackend, gate };
//! use rand::{ rngs::StdRng, SeedableRng };
//!
//! let mut state = DenseBackend::new(2, "q", StdRng::seed_from_u64(10546)).unwrap();
//! state.apply_gate(&gate::H, &[0], false).unwrap();
//! state.apply_gate(&gate::CX, &[0, 1], false).unwrap();
//! assert_eq!(state.to_dirac(), "+0.70711|00> +0.70711|11>");
//! ```

use itertools::Itertools;
use nalgebra as na;
use num_complex::Complex64 as C64;
use rand::{ rngs::StdRng, Rng };
use tracing::{ debug, trace };
use crate::{
    backend::{ self, Backend, StateIter, ZERO_TOL },
    error::{ QsyError, Result },
    gate::{ Gate, Mat2 },
};

/// Largest register the dense back-end will allocate.
pub const MAX_QUBITS: usize = 30;

/// Dense state-vector back-end.
#[derive(Clone, Debug)]
pub struct DenseBackend {
    name: String,
    n: usize,
    state: na::DVector<C64>,
    rng: StdRng,
}

impl DenseBackend {
    /// Create a new `n`-qubit state initialized to ∣0...0⟩.
    pub fn new(n: usize, name: impl Into<String>, rng: StdRng) -> Result<Self> {
        if n == 0 {
            return Err(QsyError::InvalidRegisterSize {
                size: n,
                reason: "registers must be non-empty",
            });
        }
        if n > MAX_QUBITS {
            return Err(QsyError::InvalidRegisterSize {
                size: n,
                reason: "too many qubits for the statevector back-end",
            });
        }
        let mut state: na::DVector<C64> = na::DVector::zeros(1 << n);
        state[0] = C64::from(1.0);
        let name = name.into();
        debug!(register = %name, qubits = n, "new statevector back-end");
        Ok(Self { name, n, state, rng })
    }

    /// Bit mask selecting qubit `k` in a basis index.
    fn mask(&self, k: usize) -> usize { 1 << (self.n - 1 - k) }

    /// View the amplitudes in basis-index order.
    pub fn amplitudes(&self) -> &[C64] { self.state.as_slice() }

    /// Probability of each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.state.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Sum of squared amplitude magnitudes; 1 up to rounding.
    pub fn norm_sqr(&self) -> f64 {
        self.state.iter().map(|a| a.norm_sqr()).sum()
    }

    // apply `op` to `target` on the subspace where all `controls` are 1
    fn apply_controlled(&mut self, op: &Mat2, controls: &[usize], target: usize)
    {
        let tmask = self.mask(target);
        let cmask
            = controls.iter().fold(0, |acc, c| acc | self.mask(*c));
        let (u00, u01, u10, u11)
            = (op[(0, 0)], op[(0, 1)], op[(1, 0)], op[(1, 1)]);
        let mut a0: C64;
        let mut a1: C64;
        for i in 0..self.state.len() {
            if i & tmask != 0 || i & cmask != cmask { continue; }
            a0 = self.state[i];
            a1 = self.state[i | tmask];
            self.state[i] = u00 * a0 + u01 * a1;
            self.state[i | tmask] = u10 * a0 + u11 * a1;
        }
    }

    fn normalize(&mut self) {
        let norm = self.state.norm();
        if norm > 0.0 { self.state.unscale_mut(norm); }
    }

    // draw a basis index with probability |amplitude|^2
    fn sample(&mut self) -> usize {
        let p: f64 = self.rng.gen();
        let mut acc: f64 = 0.0;
        for (i, a) in self.state.iter().enumerate() {
            acc += a.norm_sqr();
            if p < acc { return i; }
        }
        // rounding left `acc` just short of 1
        self.state.as_slice().iter()
            .rposition(|a| a.norm_sqr() > 0.0)
            .unwrap_or(0)
    }
}

impl Backend for DenseBackend {
    fn name(&self) -> &str { &self.name }

    fn size(&self) -> usize { self.n }

    fn apply_gate(&mut self, gate: &Gate, qubits: &[usize], adjoint: bool)
        -> Result<()>
    {
        backend::check_qubits(&self.name, self.n, gate, qubits)?;
        trace!(register = %self.name, gate = %gate, ?qubits, adjoint);
        let (target, controls)
            = qubits.split_last()
            .ok_or_else(|| QsyError::Arity {
                gate: gate.name().to_string(),
                expected: gate.arity(),
                got: 0,
            })?;
        self.apply_controlled(gate.operator(adjoint), controls, *target);
        self.normalize();
        Ok(())
    }

    fn measure(&mut self, target: usize) -> Result<u8> {
        self.check_in_range(target)?;
        let tmask = self.mask(target);
        let outcome = u8::from(self.sample() & tmask != 0);
        self.state.iter_mut()
            .enumerate()
            .filter(|(i, _)| u8::from(i & tmask != 0) != outcome)
            .for_each(|(_, a)| { *a = C64::from(0.0); });
        self.normalize();
        trace!(register = %self.name, target, outcome, "measure");
        Ok(outcome)
    }

    fn measure_all(&mut self) -> Result<Vec<u8>> {
        let measured = self.sample();
        self.state.fill(C64::from(0.0));
        self.state[measured] = C64::from(1.0);
        let outcomes: Vec<u8>
            = (0..self.n)
            .map(|k| u8::from(measured & self.mask(k) != 0))
            .collect();
        trace!(register = %self.name, ?outcomes, "measure all");
        Ok(outcomes)
    }

    fn yield_state(&self) -> StateIter<'_> {
        Box::new(self.state.iter().copied().enumerate())
    }

    fn to_dirac(&self) -> String {
        let n = self.n;
        self.state.iter()
            .enumerate()
            .filter(|(_, a)| a.norm() > ZERO_TOL)
            .map(|(i, a)| {
                format!("{}|{:0n$b}>", backend::format_complex(*a), i, n = n)
            })
            .join(" ")
    }
}

/// Build the full 2<sup>*n*</sup> × 2<sup>*n*</sup> operator that applies `op`
/// to `target` whenever every qubit in `controls` is ∣1⟩, and acts as the
/// identity otherwise.
///
/// This is the Kronecker product over all qubits of the identity, `op` at the
/// target, and at each control an operator that is the identity on ∣1⟩ and
/// "don't care" on ∣0⟩. Don't-care entries of the product are then resolved to
/// 1 on the diagonal and 0 elsewhere.
pub fn full_transformation(
    n: usize,
    op: &Mat2,
    controls: &[usize],
    target: usize,
) -> na::DMatrix<C64>
{
    let zero = C64::from(0.0);
    let one = C64::from(1.0);
    let dont_care = C64::new(f64::NAN, 0.0);
    let control: na::DMatrix<C64>
        = na::DMatrix::from_row_slice(2, 2, &[dont_care, zero, zero, one]);
    let local_op: na::DMatrix<C64>
        = na::DMatrix::from_iterator(2, 2, op.iter().copied());
    let ident: na::DMatrix<C64> = na::DMatrix::identity(2, 2);
    let mut full: na::DMatrix<C64> = na::DMatrix::identity(1, 1);
    for k in 0..n {
        full
            = if controls.contains(&k) {
                full.kronecker(&control)
            } else if k == target {
                full.kronecker(&local_op)
            } else {
                full.kronecker(&ident)
            };
    }
    let dim = full.nrows();
    for i in 0..dim {
        for j in 0..dim {
            if full[(i, j)].re.is_nan() || full[(i, j)].im.is_nan() {
                full[(i, j)] = if i == j { one } else { zero };
            }
        }
    }
    full
}
