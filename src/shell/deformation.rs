use super::AnsState;
use crate::base::{ShapeData, ShellParams};
use crate::StrError;
use russell_lab::{Matrix, Vector};

/// Holds the nodal arrays and derived vectors of one configuration
///
/// One instance exists per configuration role (reference, previous,
/// current, increment). The mid-surface position is the half-sum of the
/// bottom and top nodal arrays and the director is their half-difference;
/// the derived vectors are shape-weighted combinations evaluated at one
/// integration point. For the increment role, the nodal arrays contain
/// displacement increments and the derived vectors are the corresponding
/// increment quantities.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Bottom-half nodal array (3, n_mid_node)
    pub bottom: Matrix,

    /// Top-half nodal array (3, n_mid_node)
    pub top: Matrix,

    /// First in-plane tangent vector (∂x̄/∂ξ)
    pub t1: Vector,

    /// Second in-plane tangent vector (∂x̄/∂η)
    pub t2: Vector,

    /// Director vector (half-difference of top and bottom)
    pub d: Vector,

    /// Derivative of the director with respect to ξ
    pub dd1: Vector,

    /// Derivative of the director with respect to η
    pub dd2: Vector,
}

impl Snapshot {
    /// Computes a snapshot from partitioned nodal arrays
    pub fn new(bottom: Matrix, top: Matrix, sd: &ShapeData) -> Self {
        let n_mid_node = bottom.dims().1;
        let mut t1 = Vector::new(3);
        let mut t2 = Vector::new(3);
        let mut d = Vector::new(3);
        let mut dd1 = Vector::new(3);
        let mut dd2 = Vector::new(3);
        for m in 0..n_mid_node {
            let g1 = sd.deriv.get(m, 0);
            let g2 = sd.deriv.get(m, 1);
            let v = sd.interp[m];
            for i in 0..3 {
                let mid = 0.5 * (bottom.get(i, m) + top.get(i, m));
                let dir = 0.5 * (top.get(i, m) - bottom.get(i, m));
                t1[i] += g1 * mid;
                t2[i] += g2 * mid;
                d[i] += v * dir;
                dd1[i] += g1 * dir;
                dd2[i] += g2 * dir;
            }
        }
        Snapshot {
            bottom,
            top,
            t1,
            t2,
            d,
            dd1,
            dd2,
        }
    }

    /// Builds the orthonormal local/material frame at this point
    ///
    /// The rows of the returned 3×3 matrix are the local basis vectors:
    /// the normalized first tangent, its in-plane orthogonal complement,
    /// and the unit normal from t1 × t2. Degenerate geometry (zero-length
    /// tangents) is not checked; the caller owns frame validity.
    pub fn local_frame(&self) -> Matrix {
        let t1 = &self.t1;
        let t2 = &self.t2;
        let mut a3 = Vector::new(3);
        a3[0] = t1[1] * t2[2] - t1[2] * t2[1];
        a3[1] = t1[2] * t2[0] - t1[0] * t2[2];
        a3[2] = t1[0] * t2[1] - t1[1] * t2[0];
        let norm1 = f64::sqrt(t1[0] * t1[0] + t1[1] * t1[1] + t1[2] * t1[2]);
        let norm3 = f64::sqrt(a3[0] * a3[0] + a3[1] * a3[1] + a3[2] * a3[2]);
        let a1 = [t1[0] / norm1, t1[1] / norm1, t1[2] / norm1];
        let a3 = [a3[0] / norm3, a3[1] / norm3, a3[2] / norm3];
        let a2 = [
            a3[1] * a1[2] - a3[2] * a1[1],
            a3[2] * a1[0] - a3[0] * a1[2],
            a3[0] * a1[1] - a3[1] * a1[0],
        ];
        Matrix::from(&[a1, a2, a3])
    }
}

/// Holds the four configuration snapshots of one integration point
///
/// All snapshots are recomputed at every call; no state persists across
/// integration points or load steps.
#[derive(Clone, Debug)]
pub struct Deformation {
    /// Reference (undeformed) configuration
    pub reference: Snapshot,

    /// Configuration at the previous load step
    pub previous: Snapshot,

    /// Current configuration
    pub current: Snapshot,

    /// Increment: current minus previous (displacement increments)
    pub increment: Snapshot,

    /// Assumed-natural-strain tying data (8-node topology only)
    pub ans: Option<AnsState>,
}

/// Partitions positions-plus-displacements into bottom/top nodal arrays
fn partition(params: &ShellParams, coords: Option<&Matrix>, uu: Option<&Vector>) -> (Matrix, Matrix) {
    let n = params.n_mid_node;
    let ndof = params.n_dof_per_node;
    let mut bottom = Matrix::new(3, n);
    let mut top = Matrix::new(3, n);
    for m in 0..n {
        for i in 0..3 {
            let mut vb = 0.0;
            let mut vt = 0.0;
            if let Some(xx) = coords {
                vb += xx.get(i, m);
                vt += xx.get(i, m + n);
            }
            if let Some(u) = uu {
                vb += u[ndof * m + i];
                vt += u[ndof * (m + n) + i];
            }
            bottom.set(i, m, vb);
            top.set(i, m, vt);
        }
    }
    (bottom, top)
}

/// Computes the deformation snapshots at one integration point
///
/// # Input
///
/// * `params` -- the shell topology descriptor
/// * `sd` -- shape data at the integration point
/// * `coords` -- reference nodal coordinates (3, n_external_node)
/// * `uu` -- current nodal displacement (n_dof_condensed)
/// * `uu_previous` -- nodal displacement at the previous load step
///
/// Size mismatches are contract violations and fail immediately.
pub fn compute_deformation(
    params: &ShellParams,
    sd: &ShapeData,
    coords: &Matrix,
    uu: &Vector,
    uu_previous: &Vector,
) -> Result<Deformation, StrError> {
    let (nrow, ncol) = coords.dims();
    if nrow != 3 || ncol != params.n_external_node {
        return Err("coordinates matrix must be 3 × n_external_node");
    }
    if uu.dim() != params.n_dof_condensed || uu_previous.dim() != params.n_dof_condensed {
        return Err("nodal state vector length must equal the condensed DOF count");
    }
    if sd.interp.dim() != params.n_mid_node || sd.deriv.dims().0 != params.n_mid_node {
        return Err("shape data arrays are inconsistent with the mid-surface node count");
    }
    let (xb, xt) = partition(params, Some(coords), None);
    let reference = Snapshot::new(xb, xt, sd);
    let (cb, ct) = partition(params, Some(coords), Some(uu));
    let current = Snapshot::new(cb, ct, sd);
    let (pb, pt) = partition(params, Some(coords), Some(uu_previous));
    let previous = Snapshot::new(pb, pt, sd);
    let mut du = Vector::new(params.n_dof_condensed);
    for i in 0..params.n_dof_condensed {
        du[i] = uu[i] - uu_previous[i];
    }
    let (ib, it) = partition(params, None, Some(&du));
    let increment = Snapshot::new(ib, it, sd);
    let ans = if params.ans {
        Some(AnsState::new(params, &reference, &previous, &current))
    } else {
        None
    };
    Ok(Deformation {
        reference,
        previous,
        current,
        increment,
        ans,
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
