//! Makes available common structures needed to evaluate shell elements
//!
//! You may write `use plyshell::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{ShapeData, ShellParams};
pub use crate::material::{allocate_constitutive_model, ConstitutiveModel, ParamConstitutive};
pub use crate::shell::{compute_deformation, condense, Deformation, ShellElement, ShellState};
pub use crate::util::{natural_to_local, Face, LayeredTensorMap};
