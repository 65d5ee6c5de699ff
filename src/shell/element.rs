use super::{
    add_geometric_stiffness, compute_deformation, condense, recover_internal, strain, strain_operator, ShellState,
};
use crate::base::{ShapeData, ShellParams};
use crate::material::{allocate_constitutive_model, ConstitutiveModel, ParamConstitutive};
use crate::util::{natural_to_local, Face, LayeredTensorMap};
use crate::StrError;
use russell_lab::{mat_mat_mul, vec_copy, Matrix, Vector};

/// Implements a layered solid-shell element
///
/// The element owns one constitutive model per layer and the read-only
/// shape-data sequence covering all integration points. Every evaluation
/// recomputes the kinematics from the caller's state, integrates the
/// residual and tangent stiffness over all points, and condenses the
/// internal enhancement DOFs before returning.
pub struct ShellElement {
    /// Topology constants
    pub params: ShellParams,

    /// Reference nodal coordinates (3, n_external_node)
    coords: Matrix,

    /// One constitutive model per layer
    models: Vec<Box<dyn ConstitutiveModel>>,

    /// Shape data at each integration point
    pub ips: Vec<ShapeData>,

    /// Layered stress bookkeeping, refilled at every evaluation
    pub layered: LayeredTensorMap,

    /// Full-size stiffness buffer (n_dof_total, n_dof_total)
    kk_full: Matrix,

    /// Full-size residual buffer (n_dof_total)
    rr_full: Vector,

    /// Auxiliary product modulus × operator (6, n_dof_total)
    aux_cb: Matrix,
}

impl ShellElement {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `params` -- topology constants
    /// * `coords` -- reference nodal coordinates (3, n_external_node)
    /// * `layers` -- constitutive parameters, one entry per layer
    /// * `ips` -- shape data sequence from the shape-function provider
    pub fn new(
        params: ShellParams,
        coords: Matrix,
        layers: &[ParamConstitutive],
        ips: Vec<ShapeData>,
    ) -> Result<Self, StrError> {
        if coords.dims() != (3, params.n_external_node) {
            return Err("coordinates matrix must be 3 × n_external_node");
        }
        if layers.len() != params.n_layer {
            return Err("number of layer parameters must equal the layer count");
        }
        if ips.is_empty() {
            return Err("shape data sequence must not be empty");
        }
        for sd in &ips {
            if sd.layer >= params.n_layer {
                return Err("shape data layer index is out of bounds");
            }
        }
        let models: Result<Vec<_>, _> = layers.iter().map(|p| allocate_constitutive_model(p)).collect();
        Ok(ShellElement {
            params,
            coords,
            models: models?,
            ips,
            layered: LayeredTensorMap::new(params.n_layer, params.n_external_node)?,
            kk_full: Matrix::new(params.n_dof_total, params.n_dof_total),
            rr_full: Vector::new(params.n_dof_total),
            aux_cb: Matrix::new(6, params.n_dof_total),
        })
    }

    /// Returns the number of integration points
    pub fn n_integ_point(&self) -> usize {
        self.ips.len()
    }

    /// Computes the condensed residual and tangent stiffness
    ///
    /// Iterates all integration points, evaluating the kinematics, the
    /// local-frame strain, the constitutive response, and the material
    /// plus geometric stiffness contributions; the stress history and the
    /// layered table are refreshed along the way. The caller's buffers
    /// must have the condensed size.
    pub fn calc_response(
        &mut self,
        residual: &mut Vector,
        jacobian: &mut Matrix,
        state: &mut ShellState,
    ) -> Result<(), StrError> {
        let params = &self.params;
        if residual.dim() != params.n_dof_condensed {
            return Err("residual vector length must equal the condensed DOF count");
        }
        if jacobian.dims() != (params.n_dof_condensed, params.n_dof_condensed) {
            return Err("jacobian matrix must have the condensed DOF dimensions");
        }
        if state.stresses.len() != self.ips.len() || state.strains.len() != self.ips.len() {
            return Err("state history length must equal the number of integration points");
        }
        self.kk_full.fill(0.0);
        self.rr_full.fill(0.0);
        self.layered.reset();
        let ntot = params.n_dof_total;
        let mut eps_loc = Vector::new(6);
        let mut sig = Vector::new(6);
        let mut modulus = Matrix::new(6, 6);
        for (index, sd) in self.ips.iter().enumerate() {
            // kinematics and local frame
            let def = compute_deformation(params, sd, &self.coords, &state.uu, &state.uu_previous)?;
            let frame = def.current.local_frame();

            // strain in the local frame
            let eps = strain(params, &def, sd, &state.alpha)?;
            natural_to_local(&mut eps_loc, &eps, &frame);

            // constitutive response
            self.models[sd.layer].evaluate(&mut sig, &mut modulus, &eps_loc)?;

            // strain operator and material stiffness
            let bb = strain_operator(params, &def, sd, &frame)?;
            mat_mat_mul(&mut self.aux_cb, 1.0, &modulus, &bb, 0.0).unwrap();
            for i in 0..ntot {
                for j in 0..ntot {
                    let mut value = 0.0;
                    for p in 0..6 {
                        value += bb.get(p, i) * self.aux_cb.get(p, j);
                    }
                    self.kk_full.set(i, j, self.kk_full.get(i, j) + sd.weight * value);
                }
                let mut value = 0.0;
                for p in 0..6 {
                    value += bb.get(p, i) * sig[p];
                }
                self.rr_full[i] += sd.weight * value;
            }

            // geometric stiffness
            add_geometric_stiffness(&mut self.kk_full, params, sd, &def, &sig, &frame)?;

            // bookkeeping
            vec_copy(&mut state.stresses[index], &sig).unwrap();
            vec_copy(&mut state.strains[index], &eps_loc).unwrap();
            let face = if sd.zeta < 0.0 { Face::Bottom } else { Face::Top };
            self.layered.add_tensor(sd.layer, face, &sig, sd.weight)?;
        }

        // eliminate the internal enhancement DOFs
        condense(jacobian, residual, &self.kk_full, &self.rr_full, params.n_dof_condensed)
    }

    /// Advances the state after a converged (or accepted) global solve
    ///
    /// Back-substitutes the enhancement increments from the buffers of the
    /// last [ShellElement::calc_response] call, then shifts the nodal
    /// displacement history.
    pub fn update_state(&self, state: &mut ShellState, duu: &Vector) -> Result<(), StrError> {
        let params = &self.params;
        if duu.dim() != params.n_dof_condensed {
            return Err("displacement increment length must equal the condensed DOF count");
        }
        let mut dalpha = Vector::new(params.n_internal_node);
        recover_internal(&mut dalpha, &self.kk_full, &self.rr_full, duu, params.n_dof_condensed)?;
        for j in 0..params.n_internal_node {
            state.alpha[j] += dalpha[j];
        }
        vec_copy(&mut state.uu_previous, &state.uu).unwrap();
        for i in 0..params.n_dof_condensed {
            state.uu[i] += duu[i];
        }
        Ok(())
    }

    /// Returns the labelled layered-output table
    ///
    /// The labels name the layer and the physical component (e.g.,
    /// "lay0-s11"); the table rows follow the labels and the columns are
    /// the external nodes.
    pub fn layer_data(&self) -> (Vec<String>, Matrix) {
        (self.layered.labels(), self.layered.get_data())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ShellElement;
    use crate::base::{ShapeData, ShellParams};
    use crate::material::ParamConstitutive;
    use crate::shell::ShellState;
    use russell_lab::{Matrix, Vector};

    fn flat_patch_coords(params: &ShellParams, thickness: f64) -> Matrix {
        let h = thickness / 2.0;
        let n = params.n_mid_node;
        let mut coords = Matrix::new(3, params.n_external_node);
        let corners = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let midsides = [[0.5, 0.0], [1.0, 0.5], [0.5, 1.0], [0.0, 0.5]];
        for m in 0..n {
            let xy = if m < 4 { corners[m] } else { midsides[m - 4] };
            coords.set(0, m, xy[0]);
            coords.set(1, m, xy[1]);
            coords.set(2, m, -h);
            coords.set(0, m + n, xy[0]);
            coords.set(1, m + n, xy[1]);
            coords.set(2, m + n, h);
        }
        coords
    }

    #[test]
    fn new_captures_errors() {
        let params = ShellParams::new(8, 2).unwrap();
        let ips = ShapeData::new_sequence(&params).unwrap();
        let p1 = ParamConstitutive::LinearElastic {
            young: 1000.0,
            poisson: 0.3,
        };
        let coords = flat_patch_coords(&params, 0.1);
        assert_eq!(
            ShellElement::new(params, Matrix::new(3, 4), &[p1, p1], ips.clone()).err(),
            Some("coordinates matrix must be 3 × n_external_node")
        );
        assert_eq!(
            ShellElement::new(params, coords.clone(), &[p1], ips.clone()).err(),
            Some("number of layer parameters must equal the layer count")
        );
        assert_eq!(
            ShellElement::new(params, coords, &[p1, p1], Vec::new()).err(),
            Some("shape data sequence must not be empty")
        );
    }

    #[test]
    fn calc_response_checks_buffer_sizes() {
        let params = ShellParams::new(8, 1).unwrap();
        let ips = ShapeData::new_sequence(&params).unwrap();
        let nip = ips.len();
        let p1 = ParamConstitutive::LinearElastic {
            young: 1000.0,
            poisson: 0.3,
        };
        let coords = flat_patch_coords(&params, 0.1);
        let mut element = ShellElement::new(params, coords, &[p1], ips).unwrap();
        let mut state = ShellState::new(&params, nip);
        let mut jacobian = Matrix::new(24, 24);
        assert_eq!(
            element.calc_response(&mut Vector::new(23), &mut jacobian, &mut state).err(),
            Some("residual vector length must equal the condensed DOF count")
        );
        let mut residual = Vector::new(24);
        assert_eq!(
            element
                .calc_response(&mut residual, &mut Matrix::new(24, 23), &mut state)
                .err(),
            Some("jacobian matrix must have the condensed DOF dimensions")
        );
        let mut wrong_state = ShellState::new(&params, nip + 1);
        assert_eq!(
            element.calc_response(&mut residual, &mut jacobian, &mut wrong_state).err(),
            Some("state history length must equal the number of integration points")
        );
    }
}
