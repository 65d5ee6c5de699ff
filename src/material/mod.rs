//! Implements the constitutive-model interface and sample elastic models

mod constitutive;
mod linear_elastic;
mod orthotropic;
pub use crate::material::constitutive::*;
pub use crate::material::linear_elastic::*;
pub use crate::material::orthotropic::*;
