#![allow(non_snake_case)]

//! Tools for simulating registers of qubits under sequences of logic gates and
//! measurements.
//!
//! Each [`QuantumRegister`] owns one simulator back-end, picked at
//! construction:
//! - [`BackendKind::Dense`] keeps all 2<sup>*n*</sup> complex amplitudes,
//!   supporting any (multiply controlled) single-target unitary at
//!   exponential cost.
//! - [`BackendKind::Stabilizer`] keeps a Gottesman-Knill tableau,
//!   supporting only Clifford gates (I, X, Y, Z, H, S, S<sup>†</sup>, CX,
//!   CZ), but in polynomial time and memory.
//!
//! Measurement randomness comes from a [`StdRng`][rand::rngs::StdRng]
//! injected into each back-end, so fixed seeds give reproducible runs.
//!
//! # Example
//! ```
//! use qreg_sim::{ gate, BackendKind, QuantumRegister };
//!
//! for kind in [BackendKind::Dense, BackendKind::Stabilizer] {
//!     let mut q = QuantumRegister::with_seed(2, None, kind, 10546).unwrap();
//!     q.apply_gate(&gate::H, &[0], false).unwrap();
//!     q.apply_gate(&gate::CX, &[0, 1], false).unwrap();
//!     let outcomes = q.measure_all().unwrap();
//!     assert_eq!(outcomes[0], outcomes[1]);
//! }
//! ```

pub mod error;
pub mod gate;
pub mod backend;
pub mod dense;
pub mod stab;
pub mod register;

pub use error::{ QsyError, Result };
pub use gate::Gate;
pub use backend::{ Backend, BackendKind };
pub use register::{ ClassicalRegister, QuantumRegister };
