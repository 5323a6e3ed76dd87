//! Dense Jacobian computation over the forward and adjoint engines.
//!
//! Both computers share the dimension resolver ([`dims`]) and the destination
//! adapter ([`sink`]); their sweep loops are kept separate because they own
//! different state (a tape vs. a seeded input copy) and have opposite cost
//! profiles.

pub mod adjoint;
pub mod config;
pub mod dims;
pub mod forward;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod sink;

pub use adjoint::adjoint_jacobian_into;
pub use config::{JacobianConfig, RowCheck};
pub use dims::Shape;
pub use forward::forward_jacobian_into;
#[cfg(feature = "parallel")]
pub use parallel::forward_jacobian_par_into;
pub use sink::RowSink;
