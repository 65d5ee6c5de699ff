use super::ConstitutiveModel;
use crate::StrError;
use russell_lab::{mat_copy, mat_inverse, mat_vec_mul, Matrix, Vector};

/// Implements an orthotropic linear elastic model
///
/// The modulus is obtained by inverting the engineering compliance matrix
/// assembled from the nine independent constants. The material axes must
/// coincide with the local frame handed to the element.
pub struct Orthotropic {
    /// Constant elastic modulus (6, 6)
    pub dd: Matrix,
}

impl Orthotropic {
    /// Allocates a new instance from engineering constants
    pub fn new(
        e1: f64,
        e2: f64,
        e3: f64,
        nu12: f64,
        nu13: f64,
        nu23: f64,
        g12: f64,
        g23: f64,
        g13: f64,
    ) -> Result<Self, StrError> {
        if e1 <= 0.0 || e2 <= 0.0 || e3 <= 0.0 {
            return Err("Young's moduli must be positive");
        }
        if g12 <= 0.0 || g23 <= 0.0 || g13 <= 0.0 {
            return Err("shear moduli must be positive");
        }
        let mut cc = Matrix::new(6, 6);
        cc.set(0, 0, 1.0 / e1);
        cc.set(1, 1, 1.0 / e2);
        cc.set(2, 2, 1.0 / e3);
        cc.set(0, 1, -nu12 / e1);
        cc.set(1, 0, -nu12 / e1);
        cc.set(0, 2, -nu13 / e1);
        cc.set(2, 0, -nu13 / e1);
        cc.set(1, 2, -nu23 / e2);
        cc.set(2, 1, -nu23 / e2);
        cc.set(3, 3, 1.0 / g12);
        cc.set(4, 4, 1.0 / g23);
        cc.set(5, 5, 1.0 / g13);
        let mut dd = Matrix::new(6, 6);
        mat_inverse(&mut dd, &cc).map_err(|_| "cannot invert the orthotropic compliance matrix")?;
        Ok(Orthotropic { dd })
    }
}

impl ConstitutiveModel for Orthotropic {
    /// Computes stress and tangent modulus for a given strain
    fn evaluate(&mut self, stress: &mut Vector, modulus: &mut Matrix, strain: &Vector) -> Result<(), StrError> {
        mat_vec_mul(stress, 1.0, &self.dd, strain).map_err(|_| "strain and stress vectors must have 6 components")?;
        mat_copy(modulus, &self.dd).map_err(|_| "modulus matrix must be 6 × 6")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Orthotropic;
    use crate::material::LinearElastic;
    use russell_lab::mat_approx_eq;

    #[test]
    fn new_captures_errors() {
        assert_eq!(
            Orthotropic::new(0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0).err(),
            Some("Young's moduli must be positive")
        );
        assert_eq!(
            Orthotropic::new(1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0).err(),
            Some("shear moduli must be positive")
        );
    }

    #[test]
    fn equal_constants_reduce_to_isotropy() {
        let young = 2000.0;
        let poisson = 0.3;
        let shear = young / (2.0 * (1.0 + poisson));
        let ortho = Orthotropic::new(
            young, young, young, poisson, poisson, poisson, shear, shear, shear,
        )
        .unwrap();
        let iso = LinearElastic::new(young, poisson).unwrap();
        mat_approx_eq(&ortho.dd, &iso.dd, 1e-9);
    }
}
