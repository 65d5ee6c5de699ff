use super::Deformation;
use crate::base::{ShapeData, ShellParams};
use crate::util::local_to_natural;
use crate::StrError;
use russell_lab::{Matrix, Vector};

/// Accumulates the geometric (stress-dependent) stiffness of one point
///
/// The contribution is the second variation of the Green-Lagrange strain
/// contracted with the stress, integrated with the point weight. The
/// stress arrives in the local frame and is rotated back to the natural
/// frame before the node-pair loop. The buffer `kk` must be the
/// pre-allocated total-DOF element matrix; accumulation happens in place.
///
/// Three extra blocks complete the standard node-pair terms:
///
/// * the coupling between internal thickness-enhancement DOFs and the
///   translations, scaled by −4ζ times the thickness stress;
/// * the γ-bar curvature coupling, scaled by 2ζw times the thickness
///   stress;
/// * the blended ANS edge corrections for both transverse-shear stresses
///   (8-node topology only).
pub fn add_geometric_stiffness(
    kk: &mut Matrix,
    params: &ShellParams,
    sd: &ShapeData,
    def: &Deformation,
    stress_local: &Vector,
    frame: &Matrix,
) -> Result<(), StrError> {
    if kk.dims() != (params.n_dof_total, params.n_dof_total) {
        return Err("stiffness buffer must be n_dof_total × n_dof_total");
    }
    if stress_local.dim() != 6 {
        return Err("stress vector must have 6 components");
    }
    if frame.dims() != (3, 3) {
        return Err("frame matrix must be 3 × 3");
    }
    let mut sig = Vector::new(6);
    local_to_natural(&mut sig, stress_local, frame);
    let zeta = sd.zeta;
    let weight = sd.weight;
    let nmid = params.n_mid_node;
    let ndof = params.n_dof_per_node;

    // node-pair loop with pseudo-bottom/pseudo-top sign conventions
    for m in 0..nmid {
        let vm = sd.interp[m];
        let h1m = sd.deriv.get(m, 0);
        let h2m = sd.deriv.get(m, 1);
        for (side_m, sm) in [(0, -1.0), (1, 1.0)] {
            let row = ndof * (m + side_m * nmid);
            let a1m = 0.5 * h1m * (1.0 + sm * zeta);
            let a2m = 0.5 * h2m * (1.0 + sm * zeta);
            let a0m = 0.5 * sm * vm;
            for n in 0..nmid {
                let vn = sd.interp[n];
                let h1n = sd.deriv.get(n, 0);
                let h2n = sd.deriv.get(n, 1);
                for (side_n, sn) in [(0, -1.0), (1, 1.0)] {
                    let col = ndof * (n + side_n * nmid);
                    let a1n = 0.5 * h1n * (1.0 + sn * zeta);
                    let a2n = 0.5 * h2n * (1.0 + sn * zeta);
                    let a0n = 0.5 * sn * vn;
                    let block = sig[0] * a1m * a1n
                        + sig[1] * a2m * a2n
                        + sig[2] * a0m * a0n
                        + sig[3] * (a1m * a2n + a2m * a1n)
                        + sig[4] * (a2m * a0n + a0m * a2n)
                        + sig[5] * (a1m * a0n + a0m * a1n);
                    for i in 0..3 {
                        let value = kk.get(row + i, col + i) + weight * block;
                        kk.set(row + i, col + i, value);
                    }
                }
            }
        }
    }

    // coupling of the internal thickness-stretch DOFs with the translations
    let dv = &def.current.d;
    for j in 0..params.n_internal_node {
        let row = params.n_dof_condensed + j;
        let scale = -4.0 * zeta * sig[2] * sd.enh[j] * weight;
        for n in 0..nmid {
            let vn = sd.interp[n];
            for (side_n, sn) in [(0, -1.0), (1, 1.0)] {
                let col = ndof * (n + side_n * nmid);
                for i in 0..3 {
                    let value = scale * 0.5 * sn * vn * dv[i];
                    kk.set(row, col + i, kk.get(row, col + i) + value);
                    kk.set(col + i, row, kk.get(col + i, row) + value);
                }
            }
        }
    }

    // γ-bar curvature coupling
    if let Some(gb) = &sd.gamma_bar {
        let scale = 2.0 * zeta * sd.curvature * sig[2] * weight;
        for c1 in 0..params.n_dof_condensed {
            for c2 in 0..params.n_dof_condensed {
                let mut value = 0.0;
                for i in 0..3 {
                    value += gb.get(i, c1) * gb.get(i, c2);
                }
                kk.set(c1, c2, kk.get(c1, c2) + scale * value);
            }
        }
    }

    // ANS edge corrections
    if let Some(ans) = &def.ans {
        ans.add_geometric_correction(kk, sig[4], sig[5], &sd.ksi, weight);
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
