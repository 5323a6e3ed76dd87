//! Dense Jacobian matrices by automatic differentiation.
//!
//! Two strategies fill the same `codomain × domain` matrix:
//!
//! - **adjoint** (reverse) mode records one evaluation on a [`Tape`] and runs
//!   one backward sweep per output; best when outputs ≤ inputs;
//! - **forward** (tangent) mode evaluates once per input with [`Dual`]
//!   values; best when inputs ≤ outputs.
//!
//! Choosing between them is left to the caller.

pub mod api;
pub mod dual;
pub mod error;
pub mod float;
pub mod jacobian;
pub mod reverse;
pub mod tape;
mod traits;

pub use api::{adjoint_jacobian, adjoint_jacobian_with, forward_jacobian, forward_jacobian_with};
#[cfg(feature = "parallel")]
pub use api::forward_jacobian_par;
pub use dual::Dual;
pub use error::{Error, Extent, Result};
pub use float::Float;
pub use jacobian::{adjoint_jacobian_into, forward_jacobian_into, JacobianConfig, RowCheck, Shape};
#[cfg(feature = "parallel")]
pub use jacobian::forward_jacobian_par_into;
pub use reverse::Reverse;
pub use tape::{Tape, TapeGuard};

/// Type alias for forward-mode dual numbers over `f64`.
pub type Dual64 = Dual<f64>;
/// Type alias for forward-mode dual numbers over `f32`.
pub type Dual32 = Dual<f32>;
/// Type alias for reverse-mode variables over `f64`.
pub type Reverse64 = Reverse<f64>;
/// Type alias for reverse-mode variables over `f32`.
pub type Reverse32 = Reverse<f32>;
