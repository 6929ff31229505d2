//! Named quantum and classical registers.
//!
//! A [`QuantumRegister`] is a thin façade over exactly one [`Backend`], chosen
//! at construction via [`BackendKind`] and owned for the register's whole
//! life. A [`ClassicalRegister`] is a plain bit array meant to receive
//! measurement outcomes.
//!
//! # Example
//! ```
//! use qreg_sim::{ gate, register::{ ClassicalRegister, QuantumRegister }, BackendKind };
//!
//! let mut q = QuantumRegister::with_seed(2, Some("q"), BackendKind::Dense, 10546).unwrap();
//! let mut c = ClassicalRegister::new(2, None).unwrap();
//! q.apply_gate(&gate::H, &[0], false).unwrap();
//! q.apply_gate(&gate::CX, &[0, 1], false).unwrap();
//! println!("{}", q.to_dirac()); // +0.70711|00> +0.70711|11>
//!
//! c.set_state(&q.measure_all().unwrap()).unwrap();
//! assert_eq!(c.get(0).unwrap(), c.get(1).unwrap());
//! ```

use std::{
    fmt,
    sync::atomic::{ AtomicUsize, Ordering },
};
use rand::{ rngs::StdRng, SeedableRng };
use tracing::debug;
use crate::{
    backend::{ self, Backend, BackendKind, StateIter },
    error::{ QsyError, Result },
    gate::Gate,
};

static QUANTUM_COUNT: AtomicUsize = AtomicUsize::new(0);
static CLASSICAL_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Distinguishes the two flavors of register, for naming purposes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegisterKind {
    Quantum,
    Classical,
}

impl RegisterKind {
    /// Prefix of automatically generated names.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Quantum => "q",
            Self::Classical => "c",
        }
    }

    fn counter(self) -> &'static AtomicUsize {
        match self {
            Self::Quantum => &QUANTUM_COUNT,
            Self::Classical => &CLASSICAL_COUNT,
        }
    }

    /// Generate the next unused name for this kind, e.g. `q0`, `q1`, ...
    pub fn next_name(self) -> String {
        let k = self.counter().fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix(), k)
    }
}

impl fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quantum => write!(f, "QuantumRegister"),
            Self::Classical => write!(f, "ClassicalRegister"),
        }
    }
}

/// Name and size shared by both kinds of register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Register {
    kind: RegisterKind,
    name: String,
    size: usize,
}

impl Register {
    /// Create a new register identity.
    ///
    /// Fails if `size` is zero. A name is generated only if `name` is `None`.
    pub fn new(kind: RegisterKind, size: usize, name: Option<&str>)
        -> Result<Self>
    {
        if size == 0 {
            return Err(QsyError::InvalidRegisterSize {
                size,
                reason: "registers must be non-empty",
            });
        }
        let name = name.map_or_else(|| kind.next_name(), str::to_string);
        Ok(Self { kind, name, size })
    }

    pub fn kind(&self) -> RegisterKind { self.kind }

    pub fn name(&self) -> &str { &self.name }

    pub fn size(&self) -> usize { self.size }

    /// Fail with [`QsyError::Range`] unless `index` addresses an element of
    /// this register.
    pub fn check_in_range(&self, index: usize) -> Result<()> {
        backend::check_in_range(&self.name, self.size, index)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}[{}]>", self.kind, self.name, self.size)
    }
}

/// A fixed-size array of classical bits, initialized to all zeros.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassicalRegister {
    reg: Register,
    state: Vec<u8>,
}

impl ClassicalRegister {
    pub fn new(size: usize, name: Option<&str>) -> Result<Self> {
        let reg = Register::new(RegisterKind::Classical, size, name)?;
        debug!(register = %reg.name(), bits = size, "new classical register");
        Ok(Self { reg, state: vec![0; size] })
    }

    pub fn register(&self) -> &Register { &self.reg }

    pub fn name(&self) -> &str { self.reg.name() }

    pub fn len(&self) -> usize { self.reg.size() }

    /// Always `false`; registers hold at least one bit.
    pub fn is_empty(&self) -> bool { false }

    pub fn get(&self, index: usize) -> Result<u8> {
        self.reg.check_in_range(index)?;
        Ok(self.state[index])
    }

    /// Set a single bit. Any nonzero `bit` is stored as `1`.
    pub fn set(&mut self, index: usize, bit: u8) -> Result<()> {
        self.reg.check_in_range(index)?;
        self.state[index] = u8::from(bit != 0);
        Ok(())
    }

    /// Replace every bit at once.
    ///
    /// Fails without modification if `bits` isn't exactly as long as the
    /// register.
    pub fn set_state(&mut self, bits: &[u8]) -> Result<()> {
        if bits.len() != self.len() {
            return Err(QsyError::SizeMismatch {
                register: self.name().to_string(),
                expected: self.len(),
                got: bits.len(),
            });
        }
        self.state.iter_mut().zip(bits)
            .for_each(|(s, b)| { *s = u8::from(*b != 0); });
        Ok(())
    }

    pub fn state(&self) -> &[u8] { &self.state }
}

impl fmt::Display for ClassicalRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.reg)?;
        self.state.iter().try_for_each(|b| write!(f, "{}", b))
    }
}

/// A named register of qubits backed by a single simulator.
#[derive(Debug)]
pub struct QuantumRegister {
    reg: Register,
    kind: BackendKind,
    backend: Box<dyn Backend>,
}

impl QuantumRegister {
    /// Create a new register in ∣0...0⟩, seeding its random source from
    /// system entropy.
    pub fn new(size: usize, name: Option<&str>, kind: BackendKind)
        -> Result<Self>
    {
        Self::with_rng(size, name, kind, StdRng::from_entropy())
    }

    /// Like [`Self::new`], but with a fixed seed for reproducible
    /// measurement outcomes.
    pub fn with_seed(size: usize, name: Option<&str>, kind: BackendKind, seed: u64)
        -> Result<Self>
    {
        Self::with_rng(size, name, kind, StdRng::seed_from_u64(seed))
    }

    /// Like [`Self::new`], but drawing measurement outcomes from `rng`.
    pub fn with_rng(
        size: usize,
        name: Option<&str>,
        kind: BackendKind,
        rng: StdRng,
    ) -> Result<Self>
    {
        let reg = Register::new(RegisterKind::Quantum, size, name)?;
        let backend = kind.build(size, reg.name(), rng)?;
        debug!(register = %reg.name(), qubits = size, backend = %kind, "new quantum register");
        Ok(Self { reg, kind, backend })
    }

    pub fn register(&self) -> &Register { &self.reg }

    pub fn name(&self) -> &str { self.reg.name() }

    pub fn size(&self) -> usize { self.reg.size() }

    pub fn backend_kind(&self) -> BackendKind { self.kind }

    /// Read-only access to the underlying simulator.
    pub fn backend(&self) -> &dyn Backend { self.backend.as_ref() }

    /// Apply `gate` to `qubits`, ordered controls-first, or its adjoint if
    /// `adjoint` is `true`.
    ///
    /// Arity and range are checked before anything is forwarded.
    pub fn apply_gate(&mut self, gate: &Gate, qubits: &[usize], adjoint: bool)
        -> Result<()>
    {
        backend::check_qubits(self.name(), self.size(), gate, qubits)?;
        self.backend.apply_gate(gate, qubits, adjoint)
    }

    /// Measure a single qubit in the Z basis.
    pub fn measure(&mut self, target: usize) -> Result<u8> {
        self.reg.check_in_range(target)?;
        self.backend.measure(target)
    }

    /// Measure every qubit, returning outcomes ordered by qubit index.
    pub fn measure_all(&mut self) -> Result<Vec<u8>> {
        self.backend.measure_all()
    }

    /// Iterate over `(basis index, amplitude)` pairs.
    ///
    /// Empty for back-ends without amplitude access.
    pub fn yield_state(&self) -> StateIter<'_> { self.backend.yield_state() }

    /// Render the state in Dirac notation, or an empty string if unsupported.
    pub fn to_dirac(&self) -> String { self.backend.to_dirac() }
}

impl fmt::Display for QuantumRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reg.fmt(f)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gate;

    #[test]
    fn auto_names() {
        let a = Register::new(RegisterKind::Quantum, 1, None).unwrap();
        let b = Register::new(RegisterKind::Quantum, 1, None).unwrap();
        let c = Register::new(RegisterKind::Classical, 1, None).unwrap();
        assert!(a.name().starts_with('q'));
        assert!(b.name().starts_with('q'));
        assert!(c.name().starts_with('c'));
        assert_ne!(a.name(), b.name());
        assert!(a.name()[1..].parse::<usize>().is_ok());

        let named = Register::new(RegisterKind::Quantum, 4, Some("anc")).unwrap();
        assert_eq!(named.name(), "anc");
        assert_eq!(named.to_string(), "QuantumRegister<anc[4]>");
    }

    #[test]
    fn zero_size() {
        assert!(matches!(
            Register::new(RegisterKind::Classical, 0, Some("c")),
            Err(QsyError::InvalidRegisterSize { size: 0, .. }),
        ));
        for kind in [BackendKind::Dense, BackendKind::Stabilizer] {
            assert!(matches!(
                QuantumRegister::with_seed(0, None, kind, 0),
                Err(QsyError::InvalidRegisterSize { size: 0, .. }),
            ));
        }
    }

    #[test]
    fn classical_bits() {
        let mut c = ClassicalRegister::new(3, Some("m")).unwrap();
        assert_eq!(c.state(), &[0, 0, 0]);
        c.set(1, 1).unwrap();
        c.set(2, 7).unwrap();
        assert_eq!(c.get(1), Ok(1));
        assert_eq!(c.state(), &[0, 1, 1]);
        assert_eq!(c.to_string(), "ClassicalRegister<m[3]>: 011");

        assert_eq!(
            c.set(3, 1),
            Err(QsyError::Range { register: "m".into(), index: 3, size: 3 }),
        );
        assert!(c.get(10).is_err());

        c.set_state(&[1, 0, 1]).unwrap();
        assert_eq!(c.state(), &[1, 0, 1]);
        assert_eq!(
            c.set_state(&[1, 1]),
            Err(QsyError::SizeMismatch { register: "m".into(), expected: 3, got: 2 }),
        );
        assert_eq!(c.state(), &[1, 0, 1]);
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn forwards_to_backend() {
        for kind in [BackendKind::Dense, BackendKind::Stabilizer] {
            let mut q = QuantumRegister::with_seed(2, Some("q"), kind, 5).unwrap();
            assert_eq!(q.backend_kind(), kind);
            assert_eq!(q.backend().size(), 2);
            assert_eq!(q.backend().name(), "q");
            q.apply_gate(&gate::X, &[1], false).unwrap();
            assert_eq!(q.measure_all().unwrap(), vec![0, 1]);
            assert_eq!(q.measure(1).unwrap(), 1);
        }
    }

    #[test]
    fn register_checks_arguments() {
        let mut q = QuantumRegister::with_seed(2, Some("q"), BackendKind::Dense, 0).unwrap();
        assert!(matches!(
            q.apply_gate(&gate::CX, &[0], false),
            Err(QsyError::Arity { expected: 2, got: 1, .. }),
        ));
        assert!(matches!(
            q.apply_gate(&gate::H, &[0, 1], false),
            Err(QsyError::Arity { expected: 1, got: 2, .. }),
        ));
        assert!(matches!(
            q.apply_gate(&gate::H, &[2], false),
            Err(QsyError::Range { index: 2, size: 2, .. }),
        ));
        assert!(matches!(q.measure(2), Err(QsyError::Range { .. })));
        assert_eq!(q.to_dirac(), "+1|00>");
    }

    #[test]
    fn measure_after_phase_gates() {
        for kind in [BackendKind::Dense, BackendKind::Stabilizer] {
            for seed in 0..20 {
                let mut q = QuantumRegister::with_seed(1, Some("y"), kind, seed).unwrap();
                q.apply_gate(&gate::H, &[0], false).unwrap();
                q.apply_gate(&gate::S, &[0], false).unwrap();
                q.apply_gate(&gate::H, &[0], false).unwrap();
                let bit = q.measure(0).unwrap();
                assert_eq!(q.measure_all().unwrap(), vec![bit]);
            }
            let mut q = QuantumRegister::with_seed(1, Some("y"), kind, 3).unwrap();
            q.apply_gate(&gate::H, &[0], false).unwrap();
            q.apply_gate(&gate::S, &[0], false).unwrap();
            q.apply_gate(&gate::H, &[0], false).unwrap();
            assert_eq!(q.measure_all().unwrap().len(), 1);
        }
    }

    #[test]
    fn introspection() {
        let mut q = QuantumRegister::with_seed(1, Some("d"), BackendKind::Dense, 0).unwrap();
        q.apply_gate(&gate::H, &[0], false).unwrap();
        assert_eq!(q.yield_state().count(), 2);
        assert_eq!(q.to_string(), "QuantumRegister<d[1]>");

        let mut q = QuantumRegister::with_seed(1, Some("s"), BackendKind::Stabilizer, 0).unwrap();
        q.apply_gate(&gate::H, &[0], false).unwrap();
        assert_eq!(q.yield_state().count(), 0);
        assert_eq!(q.to_dirac(), "");
    }
}
