use super::{LinearElastic, Orthotropic};
use crate::StrError;
use russell_lab::{Matrix, Vector};

/// Holds parameters for the per-layer constitutive models
#[derive(Clone, Copy, Debug)]
pub enum ParamConstitutive {
    /// Isotropic linear elastic model
    LinearElastic {
        /// Young's modulus
        young: f64,

        /// Poisson's coefficient
        poisson: f64,
    },

    /// Orthotropic linear elastic model (engineering constants)
    Orthotropic {
        /// Young's modulus along the first material axis
        e1: f64,

        /// Young's modulus along the second material axis
        e2: f64,

        /// Young's modulus along the thickness axis
        e3: f64,

        /// Major Poisson's coefficient in the 1-2 plane
        nu12: f64,

        /// Major Poisson's coefficient in the 1-3 plane
        nu13: f64,

        /// Major Poisson's coefficient in the 2-3 plane
        nu23: f64,

        /// Shear modulus in the 1-2 plane
        g12: f64,

        /// Shear modulus in the 2-3 plane
        g23: f64,

        /// Shear modulus in the 1-3 plane
        g13: f64,
    },
}

/// Defines the interface of the constitutive collaborator
///
/// The strain arrives in the local material frame as an engineering
/// 6-vector (ordering 11, 22, 33, 12, 23, 13 with engineering shear); the
/// model returns the work-conjugate stress and the consistent 6×6 tangent
/// modulus in the same frame and ordering.
pub trait ConstitutiveModel: Send + Sync {
    /// Evaluates stress and tangent modulus for a given strain
    fn evaluate(&mut self, stress: &mut Vector, modulus: &mut Matrix, strain: &Vector) -> Result<(), StrError>;
}

/// Allocates a constitutive model from its parameters
pub fn allocate_constitutive_model(param: &ParamConstitutive) -> Result<Box<dyn ConstitutiveModel>, StrError> {
    let model: Box<dyn ConstitutiveModel> = match param {
        ParamConstitutive::LinearElastic { young, poisson } => Box::new(LinearElastic::new(*young, *poisson)?),
        ParamConstitutive::Orthotropic {
            e1,
            e2,
            e3,
            nu12,
            nu13,
            nu23,
            g12,
            g23,
            g13,
        } => Box::new(Orthotropic::new(*e1, *e2, *e3, *nu12, *nu13, *nu23, *g12, *g23, *g13)?),
    };
    Ok(model)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
