use super::ShellParams;
use crate::StrError;
use gemlab::shapes::{GeoKind, Scratchpad};
use russell_lab::math::SQRT_3;
use russell_lab::{Matrix, Vector};

/// Holds read-only shape/geometric data at one integration point
///
/// The data is produced by a shape-function provider and consumed by the
/// kinematics engine, the strain operator builder, and the geometric
/// stiffness assembler. One record exists per integration point; the full
/// element sequence covers the in-plane Gauss rule times two through
/// thickness points per layer.
#[derive(Clone, Debug)]
pub struct ShapeData {
    /// Shape function values at the mid-surface point (n_mid_node)
    pub interp: Vector,

    /// Derivatives with respect to the natural coordinates (n_mid_node, 2)
    pub deriv: Matrix,

    /// Natural coordinates (ξ, η) of the integration point
    pub ksi: [f64; 2],

    /// Through-thickness natural coordinate ζ ∈ [-1, 1]
    pub zeta: f64,

    /// Combined integration weight (in-plane × through-thickness)
    pub weight: f64,

    /// Curvature weight for the thickness-stretch coupling
    pub curvature: f64,

    /// Bilinear interpolation values of the four enhancement parameters
    pub enh: Vector,

    /// Index of the material layer containing this point
    pub layer: usize,

    /// Director-increment operator (3, n_dof_condensed); present when the
    /// assumed-natural-strain correction is active
    pub gamma_bar: Option<Matrix>,
}

/// Natural coordinates of the four enhancement (internal) nodes
const ENH_NODES: [[f64; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

/// Abscissa of the 3-point Gauss-Legendre rule: √(3/5)
const GAUSS_3: f64 = 0.774596669241483;

/// Returns the in-plane Gauss rule as (ξ, η, weight) triplets
///
/// 2×2 for the bilinear mid-surface and 3×3 for the quadratic one.
fn in_plane_rule(n_mid_node: usize) -> Vec<[f64; 3]> {
    let (coords, weights): (Vec<f64>, Vec<f64>) = if n_mid_node == 4 {
        (vec![-1.0 / SQRT_3, 1.0 / SQRT_3], vec![1.0, 1.0])
    } else {
        (vec![-GAUSS_3, 0.0, GAUSS_3], vec![5.0 / 9.0, 8.0 / 9.0, 5.0 / 9.0])
    };
    let mut rule = Vec::with_capacity(coords.len() * coords.len());
    for (j, eta) in coords.iter().enumerate() {
        for (i, ksi) in coords.iter().enumerate() {
            rule.push([*ksi, *eta, weights[i] * weights[j]]);
        }
    }
    rule
}

impl ShapeData {
    /// Builds the complete integration-point sequence for one element
    ///
    /// Uses the standard in-plane Gauss rule of the mid-surface shape
    /// (2×2 for the 8-node topology, 3×3 for the 16-node topology) and a
    /// two-point Gauss rule through the thickness of every layer.
    pub fn new_sequence(params: &ShellParams) -> Result<Vec<ShapeData>, StrError> {
        let kind = match params.n_mid_node {
            4 => GeoKind::Qua4,
            8 => GeoKind::Qua8,
            _ => return Err("number of mid-surface nodes must be 4 or 8"),
        };
        let mut pad = Scratchpad::new(2, kind)?;
        let rule = in_plane_rule(params.n_mid_node);
        let mut all = Vec::new();
        for point in &rule {
            let ksi = [point[0], point[1]];
            let weight_plane = point[2];
            (pad.fn_interp)(&mut pad.interp, &ksi);
            (pad.fn_deriv)(&mut pad.deriv, &ksi);
            let mut interp = Vector::new(params.n_mid_node);
            let mut deriv = Matrix::new(params.n_mid_node, 2);
            for m in 0..params.n_mid_node {
                interp[m] = pad.interp[m];
                deriv.set(m, 0, pad.deriv.get(m, 0));
                deriv.set(m, 1, pad.deriv.get(m, 1));
            }
            let enh = ShapeData::enhancement_interp(&ksi);
            let gamma_bar = if params.ans {
                Some(ShapeData::director_increment_operator(params, &interp))
            } else {
                None
            };
            for layer in 0..params.n_layer {
                let za = -1.0 + 2.0 * (layer as f64) / (params.n_layer as f64);
                let zb = -1.0 + 2.0 * ((layer + 1) as f64) / (params.n_layer as f64);
                let half = (zb - za) / 2.0;
                let center = (za + zb) / 2.0;
                for gp in [-1.0, 1.0] {
                    all.push(ShapeData {
                        interp: interp.clone(),
                        deriv: deriv.clone(),
                        ksi,
                        zeta: center + gp * half / SQRT_3,
                        weight: weight_plane * half,
                        curvature: 1.0,
                        enh: enh.clone(),
                        layer,
                        gamma_bar: gamma_bar.clone(),
                    });
                }
            }
        }
        Ok(all)
    }

    /// Evaluates the bilinear interpolation of the enhancement parameters
    pub fn enhancement_interp(ksi: &[f64; 2]) -> Vector {
        let mut enh = Vector::new(4);
        for j in 0..4 {
            enh[j] = 0.25 * (1.0 + ksi[0] * ENH_NODES[j][0]) * (1.0 + ksi[1] * ENH_NODES[j][1]);
        }
        enh
    }

    /// Builds the operator mapping nodal DOFs to the director increment
    ///
    /// The entries are ±½·Nₖ on the matching translation columns, with the
    /// minus sign on bottom nodes and the plus sign on top nodes.
    pub fn director_increment_operator(params: &ShellParams, interp: &Vector) -> Matrix {
        let mut gb = Matrix::new(3, params.n_dof_condensed);
        for m in 0..params.n_mid_node {
            for (side, sign) in [(0, -1.0), (1, 1.0)] {
                let col = params.n_dof_per_node * (m + side * params.n_mid_node);
                for i in 0..3 {
                    gb.set(i, col + i, sign * 0.5 * interp[m]);
                }
            }
        }
        gb
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ShapeData;
    use crate::base::ShellParams;
    use russell_lab::approx_eq;

    #[test]
    fn sequence_8_node_works() {
        let params = ShellParams::new(8, 2).unwrap();
        let all = ShapeData::new_sequence(&params).unwrap();
        // 4 in-plane points × 2 layers × 2 thickness points
        assert_eq!(all.len(), 16);
        for sd in &all {
            // partition of unity
            let mut sum = 0.0;
            for m in 0..params.n_mid_node {
                sum += sd.interp[m];
            }
            approx_eq(sum, 1.0, 1e-14);
            // derivatives of a partition of unity sum to zero
            let mut sum_d1 = 0.0;
            let mut sum_d2 = 0.0;
            for m in 0..params.n_mid_node {
                sum_d1 += sd.deriv.get(m, 0);
                sum_d2 += sd.deriv.get(m, 1);
            }
            approx_eq(sum_d1, 0.0, 1e-14);
            approx_eq(sum_d2, 0.0, 1e-14);
            // enhancement interpolation is a partition of unity too
            let mut sum_enh = 0.0;
            for j in 0..4 {
                sum_enh += sd.enh[j];
            }
            approx_eq(sum_enh, 1.0, 1e-14);
            assert!(sd.zeta > -1.0 && sd.zeta < 1.0);
            assert!(sd.gamma_bar.is_some());
            assert_eq!(sd.curvature, 1.0);
        }
        // the weights integrate the natural volume: area 4 × thickness 2
        let total: f64 = all.iter().map(|sd| sd.weight).sum();
        approx_eq(total, 8.0, 1e-13);
    }

    #[test]
    fn sequence_16_node_works() {
        let params = ShellParams::new(16, 1).unwrap();
        let all = ShapeData::new_sequence(&params).unwrap();
        // 9 in-plane points × 1 layer × 2 thickness points
        assert_eq!(all.len(), 18);
        for sd in &all {
            assert!(sd.gamma_bar.is_none());
            assert_eq!(sd.layer, 0);
        }
        let total: f64 = all.iter().map(|sd| sd.weight).sum();
        approx_eq(total, 8.0, 1e-13);
    }

    #[test]
    fn enhancement_interp_works() {
        let enh = ShapeData::enhancement_interp(&[-1.0, -1.0]);
        assert_eq!(enh.as_data(), &[1.0, 0.0, 0.0, 0.0]);
        let enh = ShapeData::enhancement_interp(&[0.0, 0.0]);
        assert_eq!(enh.as_data(), &[0.25, 0.25, 0.25, 0.25]);
    }

    #[test]
    fn director_increment_operator_works() {
        let params = ShellParams::new(8, 1).unwrap();
        let sd = &ShapeData::new_sequence(&params).unwrap()[0];
        let gb = sd.gamma_bar.as_ref().unwrap();
        let (nrow, ncol) = gb.dims();
        assert_eq!(nrow, 3);
        assert_eq!(ncol, 24);
        // bottom and top entries of one node have opposite signs
        for i in 0..3 {
            approx_eq(gb.get(i, i), -0.5 * sd.interp[0], 1e-15);
            approx_eq(gb.get(i, 12 + i), 0.5 * sd.interp[0], 1e-15);
        }
    }
}
