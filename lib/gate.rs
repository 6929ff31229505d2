//! Gate descriptors.
//!
//! A [`Gate`] is an immutable description of a logic gate: a name, the 2×2
//! unitary it applies to its target qubit, that unitary's adjoint, and the
//! number of control qubits it carries. Controls are never folded into the
//! matrix; back-ends apply them structurally, so [`C`] and [`CC`] only bump
//! the control count and tag the name.
//!
//! Fixed gates are built once on first use (see [`H`], [`CX`], etc.), while
//! parameterized ones are produced fresh by factories like [`rx`].
//!
//! # Example
//! ```
//! use qreg_sim::gate::{ self, C };
//!
//! let ch = C(&gate::H);
//! assert_eq!(ch.name(), "CH");
//! assert_eq!(ch.arity(), 2);
//! assert_eq!(ch.matrix(), gate::H.matrix());
//! ```

use std::fmt;
use nalgebra as na;
use num_complex::Complex64 as C64;
use once_cell::sync::Lazy;

/// A 2×2 complex matrix acting on a single qubit.
pub type Mat2 = na::Matrix2<C64>;

/// Identity of a gate's target operator, independent of its controls.
///
/// Back-ends that can't work from the raw matrix (i.e. the stabilizer
/// back-end) dispatch on this instead.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GateKind {
    /// Identity
    I,
    /// π rotation about X
    X,
    /// π rotation about Y
    Y,
    /// π rotation about Z
    Z,
    /// Hadamard
    H,
    /// π/2 rotation about Z
    S,
    /// –π/2 rotation about Z
    SDag,
    /// π/4 rotation about Z
    T,
    /// –π/4 rotation about Z
    TDag,
    /// Arbitrary rotation about X
    Rx(f64),
    /// Arbitrary rotation about Y
    Ry(f64),
    /// Arbitrary rotation about Z
    Rz(f64),
    /// Relative phase e<sup>*i*θ</sup> on ∣1⟩
    Phase(f64),
    /// A caller-supplied unitary
    Custom,
}

/// Description of a (possibly controlled) single-target gate.
#[derive(Clone, Debug, PartialEq)]
pub struct Gate {
    name: String,
    kind: GateKind,
    matrix: Mat2,
    adjoint_matrix: Mat2,
    controls: usize,
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Gate {
    fn new(name: impl Into<String>, kind: GateKind, matrix: Mat2) -> Self {
        let adjoint_matrix = matrix.adjoint();
        Self { name: name.into(), kind, matrix, adjoint_matrix, controls: 0 }
    }

    /// Make an uncontrolled gate from an arbitrary single-qubit unitary.
    ///
    /// The adjoint is taken as the conjugate transpose of `matrix`; no check
    /// is made that `matrix` is actually unitary.
    pub fn custom(name: impl Into<String>, matrix: Mat2) -> Self {
        Self::new(name, GateKind::Custom, matrix)
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn kind(&self) -> GateKind { self.kind }

    /// The target operator.
    pub fn matrix(&self) -> &Mat2 { &self.matrix }

    /// Conjugate transpose of the target operator.
    pub fn adjoint_matrix(&self) -> &Mat2 { &self.adjoint_matrix }

    /// Return [`Self::adjoint_matrix`] if `adjoint` is `true`, otherwise
    /// [`Self::matrix`].
    pub fn operator(&self, adjoint: bool) -> &Mat2 {
        if adjoint { &self.adjoint_matrix } else { &self.matrix }
    }

    /// Number of control qubits.
    pub fn controls(&self) -> usize { self.controls }

    /// Total number of qubits the gate acts on, controls included.
    pub fn arity(&self) -> usize { self.controls + 1 }

    fn with_controls(&self, prefix: &str, extra: usize) -> Self {
        Self {
            name: format!("{}{}", prefix, self.name),
            kind: self.kind,
            matrix: self.matrix,
            adjoint_matrix: self.adjoint_matrix,
            controls: self.controls + extra,
        }
    }
}

/// Create a controlled version of `gate`.
///
/// Qubit arguments for the result are ordered controls-first, with the
/// target last.
pub fn C(gate: &Gate) -> Gate { gate.with_controls("C", 1) }

/// Create a doubly controlled version of `gate`.
pub fn CC(gate: &Gate) -> Gate { gate.with_controls("CC", 2) }

fn c(re: f64, im: f64) -> C64 { C64::new(re, im) }

fn mat(a: C64, b: C64, c: C64, d: C64) -> Mat2 { Mat2::new(a, b, c, d) }

fn diag(a: C64, b: C64) -> Mat2 { mat(a, C64::from(0.0), C64::from(0.0), b) }

/// Identity.
pub static I: Lazy<Gate> = Lazy::new(|| {
    Gate::new("I", GateKind::I, Mat2::identity())
});

/// Pauli X.
pub static X: Lazy<Gate> = Lazy::new(|| {
    Gate::new("X", GateKind::X, mat(c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)))
});

/// Pauli Y.
pub static Y: Lazy<Gate> = Lazy::new(|| {
    Gate::new("Y", GateKind::Y, mat(c(0.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(0.0, 0.0)))
});

/// Pauli Z.
pub static Z: Lazy<Gate> = Lazy::new(|| {
    Gate::new("Z", GateKind::Z, diag(c(1.0, 0.0), c(-1.0, 0.0)))
});

/// Hadamard.
pub static H: Lazy<Gate> = Lazy::new(|| {
    use std::f64::consts::FRAC_1_SQRT_2;
    let h = c(FRAC_1_SQRT_2, 0.0);
    Gate::new("H", GateKind::H, mat(h, h, h, -h))
});

/// π/2 phase.
pub static S: Lazy<Gate> = Lazy::new(|| {
    Gate::new("S", GateKind::S, diag(c(1.0, 0.0), c(0.0, 1.0)))
});

/// Adjoint of [`S`].
pub static SDAG: Lazy<Gate> = Lazy::new(|| {
    Gate::new("Sdag", GateKind::SDag, diag(c(1.0, 0.0), c(0.0, -1.0)))
});

/// π/4 phase.
pub static T: Lazy<Gate> = Lazy::new(|| {
    use std::f64::consts::FRAC_PI_4;
    Gate::new("T", GateKind::T, diag(c(1.0, 0.0), C64::cis(FRAC_PI_4)))
});

/// Adjoint of [`T`].
pub static TDAG: Lazy<Gate> = Lazy::new(|| {
    use std::f64::consts::FRAC_PI_4;
    Gate::new("Tdag", GateKind::TDag, diag(c(1.0, 0.0), C64::cis(-FRAC_PI_4)))
});

/// Controlled X (CNOT).
pub static CX: Lazy<Gate> = Lazy::new(|| C(&X));

/// Controlled Z.
pub static CZ: Lazy<Gate> = Lazy::new(|| C(&Z));

/// Doubly controlled X (Toffoli).
pub static CCX: Lazy<Gate> = Lazy::new(|| CC(&X));

/// Rotation by `angle` about X.
pub fn rx(angle: f64) -> Gate {
    let cos = c((angle / 2.0).cos(), 0.0);
    let isin = c(0.0, -(angle / 2.0).sin());
    Gate::new("Rx", GateKind::Rx(angle), mat(cos, isin, isin, cos))
}

/// Rotation by `angle` about Y.
pub fn ry(angle: f64) -> Gate {
    let cos = c((angle / 2.0).cos(), 0.0);
    let sin = c((angle / 2.0).sin(), 0.0);
    Gate::new("Ry", GateKind::Ry(angle), mat(cos, -sin, sin, cos))
}

/// Rotation by `angle` about Z.
pub fn rz(angle: f64) -> Gate {
    Gate::new(
        "Rz",
        GateKind::Rz(angle),
        diag(C64::cis(-angle / 2.0), C64::cis(angle / 2.0)),
    )
}

/// Relative phase of `angle` applied to ∣1⟩.
pub fn phase(angle: f64) -> Gate {
    Gate::new("P", GateKind::Phase(angle), diag(c(1.0, 0.0), C64::cis(angle)))
}
