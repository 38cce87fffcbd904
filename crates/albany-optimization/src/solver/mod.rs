//! Numerical solvers.
//!
//! [`sqp::minimize`] drives the outer loop and delegates each quadratic
//! subproblem to the ADMM solver in [`qp`].

pub(crate) mod qp;
pub(crate) mod sqp;

pub(crate) use sqp::{SqpReport, minimize};
