use super::ConstitutiveModel;
use crate::StrError;
use russell_lab::{mat_copy, mat_vec_mul, Matrix, Vector};

/// Implements an isotropic linear elastic model
///
/// The 6×6 engineering modulus uses the Lamé parameters on the normal
/// block and the shear modulus on the (engineering) shear diagonal.
pub struct LinearElastic {
    /// Constant elastic modulus (6, 6)
    pub dd: Matrix,
}

impl LinearElastic {
    /// Allocates a new instance
    pub fn new(young: f64, poisson: f64) -> Result<Self, StrError> {
        if young <= 0.0 {
            return Err("Young's modulus must be positive");
        }
        if poisson <= -1.0 || poisson >= 0.5 {
            return Err("Poisson's coefficient must be in (-1, 0.5)");
        }
        let lambda = young * poisson / ((1.0 + poisson) * (1.0 - 2.0 * poisson));
        let mu = young / (2.0 * (1.0 + poisson));
        let mut dd = Matrix::new(6, 6);
        for i in 0..3 {
            for j in 0..3 {
                dd.set(i, j, lambda);
            }
            dd.set(i, i, lambda + 2.0 * mu);
            dd.set(3 + i, 3 + i, mu);
        }
        Ok(LinearElastic { dd })
    }
}

impl ConstitutiveModel for LinearElastic {
    /// Computes stress and tangent modulus for a given strain
    fn evaluate(&mut self, stress: &mut Vector, modulus: &mut Matrix, strain: &Vector) -> Result<(), StrError> {
        mat_vec_mul(stress, 1.0, &self.dd, strain).map_err(|_| "strain and stress vectors must have 6 components")?;
        mat_copy(modulus, &self.dd).map_err(|_| "modulus matrix must be 6 × 6")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
