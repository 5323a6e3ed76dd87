use std::fmt::{Debug, Display};

use num_traits::{Float as NumFloat, FromPrimitive};

/// Marker trait for the plain floating-point types Jacobian cells are made of.
///
/// Only `f32` and `f64` implement this; the augmented types [`crate::Dual`]
/// and [`crate::Reverse`] are built on top of it.
pub trait Float:
    NumFloat + FromPrimitive + Copy + Send + Sync + Default + Debug + Display + 'static
{
}

impl Float for f32 {}
impl Float for f64 {}
