//! *N*-qubit stabilizer states in the Gottesman-Knill tableau representation.
//!
//! In the tableau representation, states are identified not by complex
//! amplitudes but by the set of *N*-qubit Pauli operators that stabilize them,
//! of which there are *N* independent generators. Each single-qubit Pauli
//! takes two bits to encode (one "X" bit and one "Z" bit) and each generator
//! carries a sign, so a complete state fits in *O*(*N*<sup>2</sup>) bits
//! instead of the *O*(2<sup>*N*</sup>) amplitudes of a state vector.
//!
//! Following Aaronson and Gottesman[^1], the tableau here holds 2*N* + 1 rows:
//! rows `0..N` are "destabilizers", which together with the stabilizers
//! generate the full *N*-qubit Pauli group and make measurement *O*(*N*²);
//! rows `N..2N` are the stabilizer generators themselves; and row `2N` is
//! scratch space for deterministic measurements.
//!
//! The generators of the Clifford group (Hadamard, π/2 phase, and CNOT) act on
//! the tableau as bitwise operations on single columns, which makes gates
//! *O*(*N*). Only the following are accepted: I, X, Y, Z, H, S, S<sup>†</sup>,
//! CX, and CZ.
//!
//! Signs are kept as a single bit per row. Every product of stabilizers that
//! arises under this gate set carries a phase of ±1, so the ±*i* phases that
//! a full Pauli-group phase would need are never produced; destabilizer signs
//! are never read, so their phases are not tracked exactly. Extending the gate
//! set means revisiting the row-multiplication rule.
//!
//! # Example
//! ```
//! use qreg_sim::{ backend::Backend, gate, stab::StabBackend };
//! use rand::{ rngs::StdRng, SeedableRng };
//!
//! let mut stab = StabBackend::new(3, "q", StdRng::seed_from_u64(10546)).unwrap();
//!
//! // generate a Bell state on qubits 0, 1
//! stab.apply_gate(&gate::H, &[0], false).unwrap();
//! stab.apply_gate(&gate::CX, &[0, 1], false).unwrap();
//!
//! // print out the stabilizers and destabilizers
//! println!("{:#}", stab.as_group()); // `#` formatter suppresses identities
//! // +1 XX. | +1 Z..
//! // +1 ZZ. | +1 .X.
//! // +1 ..Z | +1 ..X
//!
//! let outcomes = stab.measure_all().unwrap();
//! assert_eq!(outcomes[0], outcomes[1]);
//! assert_eq!(outcomes[2], 0);
//! ```
//!
//! [^1]: [arXiv:quant-ph/0406196](https://arxiv.org/abs/quant-ph/0406196)

use std::fmt;
use ndarray::{ self as nd, s };
use rand::{ rngs::StdRng, Rng };
use tracing::{ debug, info, trace };
use crate::{
    backend::{ self, Backend, StateIter },
    error::{ QsyError, Result },
    gate::{ Gate, GateKind },
};

const PW: [u32; 32] = [ // PW[i] = 2^i
    1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096, 8192, 16384, 32768,
    65536, 131072, 262144, 524288, 1048576, 2097152, 4194304, 8388608, 16777216,
    33554432, 67108864, 134217728, 268435456, 536870912, 1073741824, 2147483648
];

/// Names of the gates the stabilizer back-end accepts.
pub const SUPPORTED_GATES: &str = "I, X, Y, Z, H, S, Sdag, CX, CZ";

/// A Clifford operation in terms the tableau can act on directly.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StabOp {
    /// Identity
    I(usize),
    /// π rotation about X
    X(usize),
    /// π rotation about Y
    Y(usize),
    /// π rotation about Z
    Z(usize),
    /// Hadamard
    H(usize),
    /// π/2 rotation about Z
    S(usize),
    /// –π/2 rotation about Z
    SInv(usize),
    /// Z-controlled π rotation about X.
    ///
    /// The first qubit index is the control.
    CX(usize, usize),
    /// Z-controlled π rotation about Z.
    ///
    /// The first qubit index is the control.
    CZ(usize, usize),
}

impl StabOp {
    /// Translate a gate application into a tableau operation, if the gate is
    /// one the tableau supports.
    ///
    /// `qubits` is ordered controls-first, as for [`Backend::apply_gate`].
    pub fn from_gate(gate: &Gate, qubits: &[usize], adjoint: bool)
        -> Option<Self>
    {
        use GateKind as K;
        match (gate.kind(), gate.controls(), qubits) {
            (K::I, 0, &[k]) => Some(Self::I(k)),
            (K::X, 0, &[k]) => Some(Self::X(k)),
            (K::Y, 0, &[k]) => Some(Self::Y(k)),
            (K::Z, 0, &[k]) => Some(Self::Z(k)),
            (K::H, 0, &[k]) => Some(Self::H(k)),
            (K::S, 0, &[k])
                => Some(if adjoint { Self::SInv(k) } else { Self::S(k) }),
            (K::SDag, 0, &[k])
                => Some(if adjoint { Self::S(k) } else { Self::SInv(k) }),
            (K::X, 1, &[c, t]) => Some(Self::CX(c, t)),
            (K::Z, 1, &[c, t]) => Some(Self::CZ(c, t)),
            _ => None,
        }
    }
}

/// The result of a single-qubit measurement, generated by
/// [`StabBackend::measure_outcome`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A deterministic outcome resulting in ∣0⟩
    Det0,
    /// A deterministic outcome resulting in ∣1⟩
    Det1,
    /// A random outcome resulting in ∣0⟩
    Rand0,
    /// A random outcome resulting in ∣1⟩
    Rand1,
}

impl Outcome {
    /// The measured bit.
    pub fn bit(self) -> u8 {
        match self {
            Self::Det0 | Self::Rand0 => 0,
            Self::Det1 | Self::Rand1 => 1,
        }
    }

    /// Return `true` if the state was already an eigenstate of the measured
    /// observable.
    pub fn is_deterministic(self) -> bool {
        matches!(self, Self::Det0 | Self::Det1)
    }
}

/// Stabilizer tableau back-end.
#[derive(Clone, Debug)]
pub struct StabBackend {
    name: String,
    n: usize,
    // `x` and `z` are bit arrays of size (2n + 1) × n; for space efficiency,
    // the columns are packed into u32s
    x: nd::Array2<u32>, // Pauli-X bits; size (2n + 1) × (floor(n / 32) + 1)
    z: nd::Array2<u32>, // Pauli-Z bits; size (2n + 1) × (floor(n / 32) + 1)
    r: nd::Array1<u8>, // Signs (0 for +1, 1 for -1); size 2n + 1
    rng: StdRng,
}

impl StabBackend {
    /// Create a new stabilizer state of size `n` initialized to ∣0...0⟩.
    pub fn new(n: usize, name: impl Into<String>, rng: StdRng) -> Result<Self> {
        if n == 0 {
            return Err(QsyError::InvalidRegisterSize {
                size: n,
                reason: "registers must be non-empty",
            });
        }
        let over32: usize = (n >> 5) + 1;
        let mut x: nd::Array2<u32> = nd::Array2::zeros((2 * n + 1, over32));
        let mut z: nd::Array2<u32> = nd::Array2::zeros((2 * n + 1, over32));
        let r: nd::Array1<u8> = nd::Array1::zeros(2 * n + 1);
        for j in 0..n {
            x[[j, j >> 5]] = PW[j & 31];
            z[[n + j, j >> 5]] = PW[j & 31];
        }
        let name = name.into();
        debug!(register = %name, qubits = n, "new stabilizer back-end");
        Ok(Self { name, n, x, z, r, rng })
    }

    fn x_bit(&self, i: usize, j: usize) -> bool {
        self.x[[i, j >> 5]] & PW[j & 31] != 0
    }

    fn z_bit(&self, i: usize, j: usize) -> bool {
        self.z[[i, j >> 5]] & PW[j & 31] != 0
    }

    fn apply_h(&mut self, k: usize) -> &mut Self {
        let k5: usize = k >> 5;
        let pw: u32 = PW[k & 31];
        let mut tmp: u32;
        for ((x_i_k5, z_i_k5), r_i) in
            self.x.slice_mut(s![.., k5]).iter_mut()
                .zip(self.z.slice_mut(s![.., k5]).iter_mut())
                .zip(self.r.iter_mut())
                .take(2 * self.n)
        {
            if *x_i_k5 & pw != 0 && *z_i_k5 & pw != 0 { *r_i ^= 1; }
            tmp = *x_i_k5;
            *x_i_k5 ^= (*x_i_k5 ^ *z_i_k5) & pw;
            *z_i_k5 ^= (*z_i_k5 ^ tmp) & pw;
        }
        self
    }

    fn apply_s(&mut self, k: usize) -> &mut Self {
        let k5: usize = k >> 5;
        let pw: u32 = PW[k & 31];
        for ((x_i_k5, z_i_k5), r_i) in
            self.x.slice_mut(s![.., k5]).iter_mut()
                .zip(self.z.slice_mut(s![.., k5]).iter_mut())
                .zip(self.r.iter_mut())
                .take(2 * self.n)
        {
            if *x_i_k5 & pw != 0 && *z_i_k5 & pw != 0 { *r_i ^= 1; }
            *z_i_k5 ^= *x_i_k5 & pw;
        }
        self
    }

    fn apply_sinv(&mut self, k: usize) -> &mut Self {
        self.apply_s(k).apply_s(k).apply_s(k)
    }

    fn apply_x(&mut self, k: usize) -> &mut Self {
        self.apply_h(k).apply_z(k).apply_h(k)
    }

    // Y = iXZ; the global phase is irrelevant
    fn apply_y(&mut self, k: usize) -> &mut Self {
        self.apply_z(k).apply_x(k)
    }

    fn apply_z(&mut self, k: usize) -> &mut Self {
        self.apply_s(k).apply_s(k)
    }

    fn apply_cnot(&mut self, a: usize, b: usize) -> &mut Self {
        let a5: usize = a >> 5;
        let b5: usize = b >> 5;
        let pwa: u32 = PW[a & 31];
        let pwb: u32 = PW[b & 31];
        let mut xa: bool;
        let mut zb: bool;
        for ((mut x_i, mut z_i), r_i) in
            self.x.axis_iter_mut(nd::Axis(0))
                .zip(self.z.axis_iter_mut(nd::Axis(0)))
                .zip(self.r.iter_mut())
                .take(2 * self.n)
        {
            xa = x_i[a5] & pwa != 0;
            zb = z_i[b5] & pwb != 0;
            // r ^= x_a z_b (x_b ^ z_a ^ 1)
            if xa && zb && ((x_i[b5] & pwb != 0) == (z_i[a5] & pwa != 0)) {
                *r_i ^= 1;
            }
            if xa { x_i[b5] ^= pwb; }
            if zb { z_i[a5] ^= pwa; }
        }
        self
    }

    fn apply_cz(&mut self, a: usize, b: usize) -> &mut Self {
        self.apply_h(b).apply_cnot(a, b).apply_h(b)
    }

    /// Perform the action of a tableau operation.
    ///
    /// Qubit indices are assumed to be in range and distinct.
    fn apply_op(&mut self, op: StabOp) -> &mut Self {
        match op {
            StabOp::I(_) => self,
            StabOp::X(k) => self.apply_x(k),
            StabOp::Y(k) => self.apply_y(k),
            StabOp::Z(k) => self.apply_z(k),
            StabOp::H(k) => self.apply_h(k),
            StabOp::S(k) => self.apply_s(k),
            StabOp::SInv(k) => self.apply_sinv(k),
            StabOp::CX(a, b) => self.apply_cnot(a, b),
            StabOp::CZ(a, b) => self.apply_cz(a, b),
        }
    }

    fn row_copy(&mut self, a: usize, b: usize) -> &mut Self {
        // set row b equal to row a
        for (mut x__j, mut z__j) in
            self.x.axis_iter_mut(nd::Axis(1))
                .zip(self.z.axis_iter_mut(nd::Axis(1)))
        {
            x__j[b] = x__j[a];
            z__j[b] = z__j[a];
        }
        self.r[b] = self.r[a];
        self
    }

    fn row_clear(&mut self, a: usize) -> &mut Self {
        self.x.slice_mut(s![a, ..]).fill(0);
        self.z.slice_mut(s![a, ..]).fill(0);
        self
    }

    // power of i picked up when the Pauli encoded by (x1, z1) left-multiplies
    // the one encoded by (x2, z2)
    fn g(x1: bool, z1: bool, x2: bool, z2: bool) -> i32 {
        let (x2, z2) = (i32::from(x2), i32::from(z2));
        match (x1, z1) {
            (false, false) => 0,
            (true,  true ) => z2 - x2,
            (true,  false) => z2 * (2 * x2 - 1),
            (false, true ) => x2 * (1 - 2 * z2),
        }
    }

    /// Left-multiply row `h` by row `i`, tracking the sign of the product.
    ///
    /// Destabilizer signs carry no information, and a destabilizer may
    /// anticommute with the row multiplied into it; for `h < n` an odd phase
    /// leaves the sign untouched. Elsewhere a phase of ±*i* can't happen for a
    /// valid tableau and is an error.
    fn rowsum(&mut self, h: usize, i: usize) -> Result<()> {
        let e: i32
            = (0..self.n)
            .map(|j| {
                Self::g(
                    self.x_bit(i, j), self.z_bit(i, j),
                    self.x_bit(h, j), self.z_bit(h, j),
                )
            })
            .sum::<i32>()
            + 2 * i32::from(self.r[h])
            + 2 * i32::from(self.r[i]);
        match e.rem_euclid(4) {
            0 => { self.r[h] = 0; },
            2 => { self.r[h] = 1; },
            _ if h < self.n => { },
            odd => {
                return Err(QsyError::InconsistentTableau {
                    row: h,
                    exponent: odd as u8,
                });
            },
        }
        for (mut x__j, mut z__j) in
            self.x.axis_iter_mut(nd::Axis(1))
                .zip(self.z.axis_iter_mut(nd::Axis(1)))
        {
            x__j[h] ^= x__j[i];
            z__j[h] ^= z__j[i];
        }
        Ok(())
    }

    /// Perform a projective measurement on qubit `k` in the Z-basis,
    /// returning the outcome along with whether it was random.
    ///
    /// The measurement is deterministic when qubit `k` is already in ∣0⟩ or
    /// ∣1⟩ (i.e. no stabilizer anticommutes with Z<sub>*k*</sub>); only then
    /// is no randomness consumed.
    pub fn measure_outcome(&mut self, k: usize) -> Result<Outcome> {
        self.check_in_range(k)?;
        let n = self.n;
        let k5: usize = k >> 5;
        let pw: u32 = PW[k & 31];

        let maybe_p: Option<usize>
            = (n..2 * n).find(|q| self.x[[*q, k5]] & pw != 0);

        let outcome
            = if let Some(p) = maybe_p {
                for i in 0..2 * n {
                    if i != p && self.x[[i, k5]] & pw != 0 {
                        self.rowsum(i, p)?;
                    }
                }
                self.row_copy(p, p - n).row_clear(p);
                let rnd: bool = self.rng.gen();
                self.r[p] = u8::from(rnd);
                self.z[[p, k5]] |= pw;
                if rnd { Outcome::Rand1 } else { Outcome::Rand0 }
            } else {
                self.row_clear(2 * n);
                self.r[2 * n] = 0;
                for i in 0..n {
                    if self.x[[i, k5]] & pw != 0 {
                        self.rowsum(2 * n, i + n)?;
                    }
                }
                if self.r[2 * n] != 0 { Outcome::Det1 } else { Outcome::Det0 }
            };
        trace!(register = %self.name, target = k, ?outcome, "measure");
        Ok(outcome)
    }

    fn row_as_npauli(&self, i: usize) -> NPauli {
        let ops: Vec<Pauli>
            = (0..self.n)
            .map(|j| Pauli::from_bits(self.x_bit(i, j), self.z_bit(i, j)))
            .collect();
        NPauli { negative: self.r[i] != 0, ops }
    }

    /// Convert `self` to a more human-readable stabilizer/destabilizer group
    /// representation.
    pub fn as_group(&self) -> StabGroup {
        let n = self.n;
        StabGroup {
            stab: (n..2 * n).map(|i| self.row_as_npauli(i)).collect(),
            destab: (0..n).map(|i| self.row_as_npauli(i)).collect(),
        }
    }
}

impl Backend for StabBackend {
    fn name(&self) -> &str { &self.name }

    fn size(&self) -> usize { self.n }

    fn apply_gate(&mut self, gate: &Gate, qubits: &[usize], adjoint: bool)
        -> Result<()>
    {
        backend::check_qubits(&self.name, self.n, gate, qubits)?;
        let op
            = StabOp::from_gate(gate, qubits, adjoint)
            .ok_or_else(|| QsyError::UnsupportedGate {
                gate: gate.name().to_string(),
                supported: SUPPORTED_GATES.to_string(),
            })?;
        trace!(register = %self.name, ?op);
        self.apply_op(op);
        Ok(())
    }

    fn measure(&mut self, target: usize) -> Result<u8> {
        self.measure_outcome(target).map(Outcome::bit)
    }

    fn measure_all(&mut self) -> Result<Vec<u8>> {
        (0..self.n).map(|k| self.measure(k)).collect()
    }

    fn yield_state(&self) -> StateIter<'_> {
        info!(
            register = %self.name,
            "printing the quantum state is not supported by the stabilizer \
            back-end; use the statevector back-end to inspect amplitudes",
        );
        Box::new(std::iter::empty())
    }

    fn to_dirac(&self) -> String { String::new() }
}

/// A single-qubit Pauli operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pauli {
    /// Identity
    I,
    /// σ<sub>*x*</sub>
    X,
    /// σ<sub>*y*</sub>
    Y,
    /// σ<sub>*z*</sub>
    Z,
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::I => write!(f, "{}", if f.alternate() { "." } else { "I" }),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl Pauli {
    fn from_bits(x: bool, z: bool) -> Self {
        match (x, z) {
            (false, false) => Self::I,
            (true,  false) => Self::X,
            (true,  true ) => Self::Y,
            (false, true ) => Self::Z,
        }
    }

    /// Return `true` if `self` and `other` commute.
    pub fn commutes_with(self, other: Self) -> bool {
        match (self, other) {
            (_, Self::I) => true,
            (Self::I, _) => true,
            (a, b) if a == b => true,
            _ => false,
        }
    }
}

/// A single *N*-qubit Pauli operator with a sign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NPauli {
    pub negative: bool,
    pub ops: Vec<Pauli>,
}

impl fmt::Display for NPauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", if self.negative { "-1" } else { "+1" })?;
        self.ops.iter()
            .try_for_each(|p| p.fmt(f))
    }
}

impl NPauli {
    /// Return `true` if `self` and `other` commute, i.e. they anticommute on
    /// an even number of qubits.
    pub fn commutes_with(&self, other: &Self) -> bool {
        self.ops.iter().zip(&other.ops)
            .filter(|(a, b)| !a.commutes_with(**b))
            .count() % 2 == 0
    }

    /// Return `true` if every factor is the identity.
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(|p| *p == Pauli::I)
    }
}

/// The complete *N*-qubit stabilizer/destabilizer groups for a given state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StabGroup {
    pub stab: Vec<NPauli>,
    pub destab: Vec<NPauli>,
}

impl fmt::Display for StabGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.stab.len();
        for (k, (stab, destab)) in
            self.stab.iter().zip(&self.destab).enumerate()
        {
            stab.fmt(f)?;
            write!(f, " | ")?;
            destab.fmt(f)?;
            if k < n - 1 { writeln!(f)?; }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use crate::gate::{ self, C };

    fn new_stab(n: usize, seed: u64) -> StabBackend {
        StabBackend::new(n, "q", StdRng::seed_from_u64(seed)).unwrap()
    }

    fn group_strings(stab: &StabBackend) -> (Vec<String>, Vec<String>) {
        let group = stab.as_group();
        (
            group.stab.iter().map(|p| format!("{:#}", p)).collect(),
            group.destab.iter().map(|p| format!("{:#}", p)).collect(),
        )
    }

    fn assert_valid(stab: &StabBackend) {
        let group = stab.as_group();
        for (i, si) in group.stab.iter().enumerate() {
            assert!(!si.is_identity(), "stabilizer {} is the identity", i);
            for sj in group.stab.iter().skip(i + 1) {
                assert!(si.commutes_with(sj), "{} and {} anticommute", si, sj);
            }
        }
        // each destabilizer anticommutes with exactly its partner
        for (i, di) in group.destab.iter().enumerate() {
            for (j, sj) in group.stab.iter().enumerate() {
                assert_eq!(di.commutes_with(sj), i != j);
            }
        }
    }

    #[test]
    fn initial_tableau() {
        let stab = new_stab(3, 0);
        let (s, d) = group_strings(&stab);
        assert_eq!(s, vec!["+1 Z..", "+1 .Z.", "+1 ..Z"]);
        assert_eq!(d, vec!["+1 X..", "+1 .X.", "+1 ..X"]);
        assert_valid(&stab);
    }

    #[test]
    fn bell_tableau() {
        let mut stab = new_stab(2, 0);
        stab.apply_gate(&gate::H, &[0], false).unwrap();
        stab.apply_gate(&gate::CX, &[0, 1], false).unwrap();
        let (s, d) = group_strings(&stab);
        assert_eq!(s, vec!["+1 XX", "+1 ZZ"]);
        assert_eq!(d, vec!["+1 Z.", "+1 .X"]);
        assert_eq!(
            format!("{}", stab.as_group()),
            "+1 XX | +1 ZI\n+1 ZZ | +1 IX",
        );
        assert_valid(&stab);
    }

    #[test]
    fn pauli_signs() {
        let mut stab = new_stab(3, 0);
        stab.apply_gate(&gate::X, &[0], false).unwrap();
        stab.apply_gate(&gate::Y, &[1], false).unwrap();
        stab.apply_gate(&gate::Z, &[2], false).unwrap();
        let (s, _) = group_strings(&stab);
        assert_eq!(s, vec!["-1 Z..", "-1 .Z.", "+1 ..Z"]);
        assert_eq!(stab.measure_outcome(0).unwrap(), Outcome::Det1);
        assert_eq!(stab.measure_outcome(1).unwrap(), Outcome::Det1);
        assert_eq!(stab.measure_outcome(2).unwrap(), Outcome::Det0);
    }

    #[test]
    fn phase_gates() {
        // H S S H = H Z H = X
        let mut stab = new_stab(1, 0);
        stab.apply_gate(&gate::H, &[0], false).unwrap();
        stab.apply_gate(&gate::S, &[0], false).unwrap();
        stab.apply_gate(&gate::S, &[0], false).unwrap();
        stab.apply_gate(&gate::H, &[0], false).unwrap();
        assert_eq!(stab.measure_outcome(0).unwrap(), Outcome::Det1);

        // H S S^† H = I
        let mut stab = new_stab(1, 0);
        stab.apply_gate(&gate::H, &[0], false).unwrap();
        stab.apply_gate(&gate::S, &[0], false).unwrap();
        stab.apply_gate(&gate::S, &[0], true).unwrap();
        stab.apply_gate(&gate::H, &[0], false).unwrap();
        assert_eq!(stab.measure_outcome(0).unwrap(), Outcome::Det0);

        // S ∣+⟩ = ∣+i⟩, stabilized by +Y; S^† (as Sdag) takes it back to +X
        let mut stab = new_stab(1, 0);
        stab.apply_gate(&gate::H, &[0], false).unwrap();
        stab.apply_gate(&gate::S, &[0], false).unwrap();
        assert_eq!(group_strings(&stab).0, vec!["+1 Y"]);
        stab.apply_gate(&gate::SDAG, &[0], false).unwrap();
        assert_eq!(group_strings(&stab).0, vec!["+1 X"]);
        stab.apply_gate(&gate::SDAG, &[0], false).unwrap();
        assert_eq!(group_strings(&stab).0, vec!["-1 Y"]);
    }

    #[test]
    fn cz_is_conjugated_cx() {
        // CZ ∣++⟩ stabilized by XZ and ZX
        let mut stab = new_stab(2, 0);
        stab.apply_gate(&gate::H, &[0], false).unwrap();
        stab.apply_gate(&gate::H, &[1], false).unwrap();
        stab.apply_gate(&gate::CZ, &[0, 1], false).unwrap();
        assert_eq!(group_strings(&stab).0, vec!["+1 XZ", "+1 ZX"]);
        assert_valid(&stab);
    }

    #[test]
    fn measure_y_eigenstate() {
        // H S H ∣0⟩ is stabilized by -Y; Z outcomes are random
        let mut rng = StdRng::seed_from_u64(1618);
        let mut ones: usize = 0;
        for _ in 0..100 {
            let mut stab = new_stab(1, rng.gen());
            stab.apply_gate(&gate::H, &[0], false).unwrap();
            stab.apply_gate(&gate::S, &[0], false).unwrap();
            stab.apply_gate(&gate::H, &[0], false).unwrap();
            assert_eq!(group_strings(&stab).0, vec!["-1 Y"]);
            let first = stab.measure_outcome(0).unwrap();
            assert!(!first.is_deterministic());
            assert_eq!(stab.measure(0).unwrap(), first.bit());
            assert_eq!(stab.measure_all().unwrap(), vec![first.bit()]);
            assert_valid(&stab);
            ones += first.bit() as usize;
        }
        assert!((25..=75).contains(&ones), "{} of 100 were ones", ones);

        // same, with the Y eigenstate entangled into a larger register
        let mut stab = new_stab(3, 8);
        stab.apply_gate(&gate::H, &[1], false).unwrap();
        stab.apply_gate(&gate::S, &[1], false).unwrap();
        stab.apply_gate(&gate::CX, &[1, 2], false).unwrap();
        stab.apply_gate(&gate::H, &[1], false).unwrap();
        let outcomes = stab.measure_all().unwrap();
        assert_eq!(outcomes[0], 0);
        assert_valid(&stab);
        assert_eq!(stab.measure_all().unwrap(), outcomes);
    }

    #[test]
    fn random_then_repeatable() {
        let mut stab = new_stab(1, 7);
        stab.apply_gate(&gate::H, &[0], false).unwrap();
        let first = stab.measure_outcome(0).unwrap();
        assert!(!first.is_deterministic());
        for _ in 0..5 {
            let again = stab.measure_outcome(0).unwrap();
            assert!(again.is_deterministic());
            assert_eq!(again.bit(), first.bit());
        }
    }

    #[test]
    fn ghz_outcomes_agree() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut ones: usize = 0;
        for _ in 0..200 {
            let mut stab = new_stab(40, rng.gen());
            stab.apply_gate(&gate::H, &[0], false).unwrap();
            for k in 1..40 {
                stab.apply_gate(&gate::CX, &[0, k], false).unwrap();
            }
            let outcomes = stab.measure_all().unwrap();
            assert!(outcomes.iter().all(|b| *b == outcomes[0]));
            ones += outcomes[0] as usize;
        }
        assert!((60..=140).contains(&ones), "{} of 200 were ones", ones);
    }

    #[test]
    fn consistent_under_random_circuits() {
        let mut rng = StdRng::seed_from_u64(31415);
        let n: usize = 37; // spans more than one packed word
        let mut stab = new_stab(n, rng.gen());
        let singles: [&Gate; 7]
            = [&gate::I, &gate::X, &gate::Y, &gate::Z, &gate::H, &gate::S, &gate::SDAG];
        for step in 0..600 {
            match rng.gen_range(0..4) {
                0 | 1 => {
                    let g = singles[rng.gen_range(0..singles.len())];
                    let k = rng.gen_range(0..n);
                    stab.apply_gate(g, &[k], rng.gen()).unwrap();
                },
                2 => {
                    let a = rng.gen_range(0..n);
                    let b = (a + rng.gen_range(1..n)) % n;
                    let g = if rng.gen() { &*gate::CX } else { &*gate::CZ };
                    stab.apply_gate(g, &[a, b], false).unwrap();
                },
                _ => { stab.measure(rng.gen_range(0..n)).unwrap(); },
            }
            if step % 50 == 0 { assert_valid(&stab); }
        }
        assert_valid(&stab);
        stab.measure_all().unwrap();
        assert_valid(&stab);
    }

    #[test]
    fn unsupported_gates() {
        let mut stab = new_stab(3, 0);
        let before = stab.as_group();
        for (g, qubits) in [
            ((*gate::T).clone(), vec![0]),
            (gate::rx(0.5), vec![1]),
            (C(&gate::H), vec![0, 1]),
            ((*gate::CCX).clone(), vec![0, 1, 2]),
        ] {
            let err = stab.apply_gate(&g, &qubits, false).unwrap_err();
            assert_eq!(
                err,
                QsyError::UnsupportedGate {
                    gate: g.name().to_string(),
                    supported: SUPPORTED_GATES.to_string(),
                },
            );
            assert!(err.to_string().contains("CX, CZ"));
        }
        assert!(matches!(
            stab.apply_gate(&gate::H, &[3], false),
            Err(QsyError::Range { index: 3, size: 3, .. }),
        ));
        assert!(matches!(
            stab.apply_gate(&gate::CX, &[0], false),
            Err(QsyError::Arity { expected: 2, got: 1, .. }),
        ));
        assert!(matches!(stab.measure(5), Err(QsyError::Range { .. })));
        assert_eq!(stab.as_group(), before);
    }

    #[test]
    fn no_state_introspection() {
        let mut stab = new_stab(2, 0);
        stab.apply_gate(&gate::H, &[0], false).unwrap();
        assert_eq!(stab.yield_state().count(), 0);
        assert_eq!(stab.to_dirac(), "");
    }

    #[test]
    fn zero_size() {
        assert!(matches!(
            StabBackend::new(0, "q", StdRng::seed_from_u64(0)),
            Err(QsyError::InvalidRegisterSize { size: 0, .. }),
        ));
    }
}
