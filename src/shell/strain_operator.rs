use super::{Deformation, Snapshot};
use crate::base::{ShapeData, ShellParams};
use crate::util::transform_matrix;
use crate::StrError;
use russell_lab::{mat_mat_mul, Matrix, Vector};

/// Subtracts two 3-vectors
#[inline]
fn sub(a: &Vector, b: &Vector) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Dot product of two 3-vectors
#[inline]
fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Computes the membrane (mid-surface) Green-Lagrange strain
///
/// The components are evaluated from the base-configuration tangents and
/// director dotted with the displacement-derived vectors of the deformed
/// configuration, plus one-half quadratic terms. Pass the reference
/// snapshot as base for total strain, or the previous snapshot for the
/// load-step increment.
pub fn strain_membrane(base: &Snapshot, deformed: &Snapshot) -> Vector {
    let b1 = [base.t1[0], base.t1[1], base.t1[2]];
    let b2 = [base.t2[0], base.t2[1], base.t2[2]];
    let bd = [base.d[0], base.d[1], base.d[2]];
    let p1 = sub(&deformed.t1, &base.t1);
    let p2 = sub(&deformed.t2, &base.t2);
    let q = sub(&deformed.d, &base.d);
    let mut eps = Vector::new(6);
    eps[0] = dot(&b1, &p1) + 0.5 * dot(&p1, &p1);
    eps[1] = dot(&b2, &p2) + 0.5 * dot(&p2, &p2);
    eps[2] = dot(&bd, &q) + 0.5 * dot(&q, &q);
    eps[3] = dot(&b1, &p2) + dot(&b2, &p1) + dot(&p1, &p2);
    eps[4] = dot(&b2, &q) + dot(&bd, &p2) + dot(&p2, &q);
    eps[5] = dot(&b1, &q) + dot(&bd, &p1) + dot(&p1, &q);
    eps
}

/// Computes the curvature (bending) strain
///
/// These are the ζ-linear contributions built from the director
/// derivatives; the curvature weight scales the thickness-stretch
/// coupling component.
pub fn strain_curvature(base: &Snapshot, deformed: &Snapshot, curvature_weight: f64) -> Vector {
    let b1 = [base.t1[0], base.t1[1], base.t1[2]];
    let b2 = [base.t2[0], base.t2[1], base.t2[2]];
    let bd = [base.d[0], base.d[1], base.d[2]];
    let bd1 = [base.dd1[0], base.dd1[1], base.dd1[2]];
    let bd2 = [base.dd2[0], base.dd2[1], base.dd2[2]];
    let p1 = sub(&deformed.t1, &base.t1);
    let p2 = sub(&deformed.t2, &base.t2);
    let q = sub(&deformed.d, &base.d);
    let q1 = sub(&deformed.dd1, &base.dd1);
    let q2 = sub(&deformed.dd2, &base.dd2);
    let mut kap = Vector::new(6);
    kap[0] = dot(&b1, &q1) + dot(&bd1, &p1) + dot(&p1, &q1);
    kap[1] = dot(&b2, &q2) + dot(&bd2, &p2) + dot(&p2, &q2);
    kap[2] = 2.0 * curvature_weight * (dot(&bd, &q) + 0.5 * dot(&q, &q));
    kap[3] = dot(&b1, &q2) + dot(&b2, &q1) + dot(&bd1, &p2) + dot(&bd2, &p1) + dot(&p1, &q2) + dot(&p2, &q1);
    kap[4] = dot(&bd2, &q) + dot(&bd, &q2) + dot(&q2, &q);
    kap[5] = dot(&bd1, &q) + dot(&bd, &q1) + dot(&q1, &q);
    kap
}

/// Evaluates the Green-Lagrange strain between two configurations at ζ
///
/// Composes the covariant base vectors at ζ so that the result is exactly
/// consistent with the strain operator of [strain_operator].
fn strain_between(base: &Snapshot, deformed: &Snapshot, zeta: f64, curvature_weight: f64) -> Vector {
    let g1r = [
        base.t1[0] + zeta * base.dd1[0],
        base.t1[1] + zeta * base.dd1[1],
        base.t1[2] + zeta * base.dd1[2],
    ];
    let g2r = [
        base.t2[0] + zeta * base.dd2[0],
        base.t2[1] + zeta * base.dd2[1],
        base.t2[2] + zeta * base.dd2[2],
    ];
    let dr = [base.d[0], base.d[1], base.d[2]];
    let p1 = sub(&deformed.t1, &base.t1);
    let p2 = sub(&deformed.t2, &base.t2);
    let q1 = sub(&deformed.dd1, &base.dd1);
    let q2 = sub(&deformed.dd2, &base.dd2);
    let q = sub(&deformed.d, &base.d);
    let dp1 = [p1[0] + zeta * q1[0], p1[1] + zeta * q1[1], p1[2] + zeta * q1[2]];
    let dp2 = [p2[0] + zeta * q2[0], p2[1] + zeta * q2[1], p2[2] + zeta * q2[2]];
    let mut eps = Vector::new(6);
    eps[0] = dot(&g1r, &dp1) + 0.5 * dot(&dp1, &dp1);
    eps[1] = dot(&g2r, &dp2) + 0.5 * dot(&dp2, &dp2);
    eps[2] = (1.0 + 2.0 * zeta * curvature_weight) * (dot(&dr, &q) + 0.5 * dot(&q, &q));
    eps[3] = dot(&g1r, &dp2) + dot(&g2r, &dp1) + dot(&dp1, &dp2);
    eps[4] = dot(&g2r, &q) + dot(&dr, &dp2) + dot(&dp2, &q);
    eps[5] = dot(&g1r, &q) + dot(&dr, &dp1) + dot(&dp1, &q);
    eps
}

/// Evaluates the total Green-Lagrange strain in the natural frame
///
/// Includes the ANS substitution of the transverse-shear components (when
/// active) and the internal enhancement contribution on the thickness
/// component.
///
/// # Input
///
/// * `alpha` -- internal enhancement parameters (n_internal_node)
pub fn strain(params: &ShellParams, def: &Deformation, sd: &ShapeData, alpha: &Vector) -> Result<Vector, StrError> {
    if alpha.dim() != params.n_internal_node {
        return Err("alpha vector length must equal the internal node count");
    }
    let mut eps = strain_between(&def.reference, &def.current, sd.zeta, sd.curvature);
    if let Some(ans) = &def.ans {
        let (gamma23, gamma13) = ans.shear_strain(&sd.ksi);
        eps[4] = gamma23;
        eps[5] = gamma13;
    }
    let dc = &def.current.d;
    let dd = dc[0] * dc[0] + dc[1] * dc[1] + dc[2] * dc[2];
    for j in 0..params.n_internal_node {
        eps[2] += -2.0 * sd.zeta * dd * sd.enh[j] * alpha[j];
    }
    Ok(eps)
}

/// Evaluates the load-step strain increment in the natural frame
///
/// Same structure as [strain] but measured from the previous
/// configuration, with `dalpha` holding the enhancement increments.
pub fn strain_increment(
    params: &ShellParams,
    def: &Deformation,
    sd: &ShapeData,
    dalpha: &Vector,
) -> Result<Vector, StrError> {
    if dalpha.dim() != params.n_internal_node {
        return Err("alpha vector length must equal the internal node count");
    }
    let mut deps = strain_between(&def.previous, &def.current, sd.zeta, sd.curvature);
    if let Some(ans) = &def.ans {
        let (gamma23, gamma13) = ans.shear_strain_increment(&sd.ksi);
        deps[4] = gamma23;
        deps[5] = gamma13;
    }
    let dc = &def.current.d;
    let dd = dc[0] * dc[0] + dc[1] * dc[1] + dc[2] * dc[2];
    for j in 0..params.n_internal_node {
        deps[2] += -2.0 * sd.zeta * dd * sd.enh[j] * dalpha[j];
    }
    Ok(deps)
}

/// Builds the strain-displacement operator in the local frame
///
/// The returned matrix has dimensions (6, n_dof_total). The nodal columns
/// follow the "bottom minus, top plus" degeneration; the γ-bar correction
/// adds the ζ-scaled thickness coupling; the ANS rows replace the
/// transverse-shear rows when active; the trailing internal columns carry
/// the enhancement terms eliminated later by static condensation.
pub fn strain_operator(
    params: &ShellParams,
    def: &Deformation,
    sd: &ShapeData,
    frame: &Matrix,
) -> Result<Matrix, StrError> {
    if frame.dims() != (3, 3) {
        return Err("frame matrix must be 3 × 3");
    }
    if sd.interp.dim() != params.n_mid_node {
        return Err("shape data arrays are inconsistent with the mid-surface node count");
    }
    let zeta = sd.zeta;
    let cur = &def.current;
    let g1v = [
        cur.t1[0] + zeta * cur.dd1[0],
        cur.t1[1] + zeta * cur.dd1[1],
        cur.t1[2] + zeta * cur.dd1[2],
    ];
    let g2v = [
        cur.t2[0] + zeta * cur.dd2[0],
        cur.t2[1] + zeta * cur.dd2[1],
        cur.t2[2] + zeta * cur.dd2[2],
    ];
    let dv = [cur.d[0], cur.d[1], cur.d[2]];
    // without a provider-supplied γ-bar, the thickness-curvature coupling
    // goes directly into the nodal columns of the thickness row
    let thick = if sd.gamma_bar.is_some() {
        1.0
    } else {
        1.0 + 2.0 * zeta * sd.curvature
    };
    let mut bb = Matrix::new(6, params.n_dof_total);
    for m in 0..params.n_mid_node {
        let v = sd.interp[m];
        let h1 = sd.deriv.get(m, 0);
        let h2 = sd.deriv.get(m, 1);
        for (side, sign) in [(0, -1.0), (1, 1.0)] {
            let col = params.n_dof_per_node * (m + side * params.n_mid_node);
            let c1 = 0.5 * h1 * (1.0 + sign * zeta);
            let c2 = 0.5 * h2 * (1.0 + sign * zeta);
            let c0 = 0.5 * sign * v;
            for i in 0..3 {
                bb.set(0, col + i, c1 * g1v[i]);
                bb.set(1, col + i, c2 * g2v[i]);
                bb.set(2, col + i, thick * c0 * dv[i]);
                bb.set(3, col + i, c2 * g1v[i] + c1 * g2v[i]);
                bb.set(4, col + i, c0 * g2v[i] + c2 * dv[i]);
                bb.set(5, col + i, c0 * g1v[i] + c1 * dv[i]);
            }
        }
    }
    if let Some(gb) = &sd.gamma_bar {
        let scale = 2.0 * zeta * sd.curvature;
        for c in 0..params.n_dof_condensed {
            let mut value = 0.0;
            for i in 0..3 {
                value += dv[i] * gb.get(i, c);
            }
            bb.set(2, c, bb.get(2, c) + scale * value);
        }
    }
    if let Some(ans) = &def.ans {
        ans.apply_rows(&mut bb, &sd.ksi);
    }
    let dd = dot(&dv, &dv);
    for j in 0..params.n_internal_node {
        bb.set(2, params.n_dof_condensed + j, -2.0 * zeta * dd * sd.enh[j]);
    }
    let tt = transform_matrix(frame);
    let mut local = Matrix::new(6, params.n_dof_total);
    mat_mat_mul(&mut local, 1.0, &tt, &bb, 0.0).unwrap();
    Ok(local)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{strain, strain_curvature, strain_increment, strain_membrane, strain_operator};
    use crate::base::{ShapeData, ShellParams};
    use crate::shell::compute_deformation;
    use crate::util::natural_to_local;
    use russell_lab::{approx_eq, vec_approx_eq, Matrix, Vector};

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

    /// Generates a smooth nonlinear displacement field for testing
    fn sample_displacement(params: &ShellParams, coords: &Matrix, scale: f64) -> Vector {
        let mut uu = Vector::new(params.n_dof_condensed);
        for m in 0..params.n_external_node {
            let (x, y, z) = (coords.get(0, m), coords.get(1, m), coords.get(2, m));
            uu[3 * m] = scale * (0.3 * x * x + 0.1 * y + 0.2 * z);
            uu[3 * m + 1] = scale * (0.2 * x * y - 0.4 * z);
            uu[3 * m + 2] = scale * (0.5 * x - 0.3 * y * y + 0.1 * z);
        }
        uu
    }

    #[test]
    fn zero_displacement_gives_zero_strain() {
        for n_external_node in [8, 16] {
            let params = ShellParams::new(n_external_node, 2).unwrap();
            let coords = flat_patch_coords(&params, 0.1);
            let uu = Vector::new(params.n_dof_condensed);
            let alpha = Vector::new(4);
            for sd in &ShapeData::new_sequence(&params).unwrap() {
                let def = compute_deformation(&params, sd, &coords, &uu, &uu).unwrap();
                let eps = strain(&params, &def, sd, &alpha).unwrap();
                let deps = strain_increment(&params, &def, sd, &alpha).unwrap();
                vec_approx_eq(&eps, &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 1e-15);
                vec_approx_eq(&deps, &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 1e-15);
                let kap = strain_curvature(&def.reference, &def.current, sd.curvature);
                vec_approx_eq(&kap, &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 1e-15);
            }
        }
    }

    #[test]
    fn uniform_stretch_strain_works() {
        // u_x = 0.01 x on a unit patch: p1 = (0.005, 0, 0) and the
        // covariant membrane strain is B1·p1 + ½ p1·p1
        let params = ShellParams::new(8, 1).unwrap();
        let coords = flat_patch_coords(&params, 0.1);
        let mut uu = Vector::new(24);
        for m in 0..8 {
            uu[3 * m] = 0.01 * coords.get(0, m);
        }
        let sd = &ShapeData::new_sequence(&params).unwrap()[0];
        let def = compute_deformation(&params, sd, &coords, &uu, &uu).unwrap();
        let eps = strain_membrane(&def.reference, &def.current);
        approx_eq(eps[0], 0.5 * 0.005 + 0.5 * 0.005 * 0.005, 1e-15);
        approx_eq(eps[1], 0.0, 1e-15);
        approx_eq(eps[2], 0.0, 1e-15);
        approx_eq(eps[3], 0.0, 1e-15);
    }

    #[test]
    fn operator_matches_finite_differences() {
        // central finite differences of the strain evaluation must match
        // the operator columns (translational and enhancement DOFs alike)
        let step = 1e-6;
        for n_external_node in [8, 16] {
            let params = ShellParams::new(n_external_node, 1).unwrap();
            let coords = flat_patch_coords(&params, 0.2);
            let uu = sample_displacement(&params, &coords, 0.05);
            let alpha = Vector::new(4);
            let sequence = ShapeData::new_sequence(&params).unwrap();
            for sd in [&sequence[0], &sequence[sequence.len() - 1]] {
                let def = compute_deformation(&params, sd, &coords, &uu, &uu).unwrap();
                let frame = def.current.local_frame();
                let bb = strain_operator(&params, &def, sd, &frame).unwrap();
                let mut eps_loc = Vector::new(6);
                for j in 0..params.n_dof_condensed {
                    let mut up = uu.clone();
                    let mut um = uu.clone();
                    up[j] += step;
                    um[j] -= step;
                    let def_p = compute_deformation(&params, sd, &coords, &up, &uu).unwrap();
                    let def_m = compute_deformation(&params, sd, &coords, &um, &uu).unwrap();
                    let eps_p = strain(&params, &def_p, sd, &alpha).unwrap();
                    let eps_m = strain(&params, &def_m, sd, &alpha).unwrap();
                    for p in 0..6 {
                        // note: the frame is held fixed while differencing
                        eps_loc[p] = (eps_p[p] - eps_m[p]) / (2.0 * step);
                    }
                    let mut fd_loc = Vector::new(6);
                    natural_to_local(&mut fd_loc, &eps_loc, &frame);
                    for p in 0..6 {
                        approx_eq(bb.get(p, j), fd_loc[p], 1e-8);
                    }
                }
                for j in 0..params.n_internal_node {
                    let mut ap = alpha.clone();
                    let mut am = alpha.clone();
                    ap[j] += step;
                    am[j] -= step;
                    let eps_p = strain(&params, &def, sd, &ap).unwrap();
                    let eps_m = strain(&params, &def, sd, &am).unwrap();
                    let mut fd = Vector::new(6);
                    for p in 0..6 {
                        fd[p] = (eps_p[p] - eps_m[p]) / (2.0 * step);
                    }
                    let mut fd_loc = Vector::new(6);
                    natural_to_local(&mut fd_loc, &fd, &frame);
                    for p in 0..6 {
                        approx_eq(bb.get(p, params.n_dof_condensed + j), fd_loc[p], 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn increment_equals_total_minus_previous() {
        let params = ShellParams::new(16, 1).unwrap();
        let coords = flat_patch_coords(&params, 0.2);
        let uu_prev = sample_displacement(&params, &coords, 0.02);
        let uu = sample_displacement(&params, &coords, 0.05);
        let alpha = Vector::new(4);
        for sd in &ShapeData::new_sequence(&params).unwrap() {
            let def = compute_deformation(&params, sd, &coords, &uu, &uu_prev).unwrap();
            let def_prev = compute_deformation(&params, sd, &coords, &uu_prev, &uu_prev).unwrap();
            let eps = strain(&params, &def, sd, &alpha).unwrap();
            let eps_prev = strain(&params, &def_prev, sd, &alpha).unwrap();
            let deps = strain_increment(&params, &def, sd, &alpha).unwrap();
            for p in 0..6 {
                approx_eq(deps[p], eps[p] - eps_prev[p], 1e-12);
            }
        }
    }

    #[test]
    fn strain_captures_errors() {
        let params = ShellParams::new(8, 1).unwrap();
        let coords = flat_patch_coords(&params, 0.1);
        let uu = Vector::new(24);
        let sd = &ShapeData::new_sequence(&params).unwrap()[0];
        let def = compute_deformation(&params, sd, &coords, &uu, &uu).unwrap();
        assert_eq!(
            strain(&params, &def, sd, &Vector::new(3)).err(),
            Some("alpha vector length must equal the internal node count")
        );
        assert_eq!(
            strain_operator(&params, &def, sd, &Matrix::new(2, 3)).err(),
            Some("frame matrix must be 3 × 3")
        );
    }
}
