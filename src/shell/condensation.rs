use crate::StrError;
use russell_lab::{mat_inverse, mat_mat_mul, Matrix, Vector};

/// Condenses the trailing internal-DOF block out of stiffness and residual
///
/// Partitioning the element stiffness into the nodal block A, the coupling
/// block B, and the internal block D, the condensed quantities are the
/// Schur complements
///
/// ```text
/// K* = A - B·D⁻¹·Bᵀ      r* = r_A - B·D⁻¹·r_D
/// ```
///
/// # Input
///
/// * `kk_red`, `rr_red` -- pre-allocated outputs of condensed size
/// * `kk`, `rr` -- the full element stiffness and residual
/// * `n_condensed` -- the number of leading (nodal) DOFs to keep
///
/// # Errors
///
/// A numerically singular internal block indicates a degenerate
/// through-thickness state and is surfaced as a distinct error; no
/// regularization is attempted here.
pub fn condense(
    kk_red: &mut Matrix,
    rr_red: &mut Vector,
    kk: &Matrix,
    rr: &Vector,
    n_condensed: usize,
) -> Result<(), StrError> {
    let (nrow, ncol) = kk.dims();
    if nrow != ncol {
        return Err("stiffness matrix must be square");
    }
    if rr.dim() != nrow {
        return Err("residual vector length must match the stiffness dimension");
    }
    if n_condensed >= nrow {
        return Err("condensed DOF count must be smaller than the total DOF count");
    }
    if kk_red.dims() != (n_condensed, n_condensed) || rr_red.dim() != n_condensed {
        return Err("condensed outputs have incompatible dimensions");
    }
    let n_internal = nrow - n_condensed;
    let mut dd = Matrix::new(n_internal, n_internal);
    for p in 0..n_internal {
        for q in 0..n_internal {
            dd.set(p, q, kk.get(n_condensed + p, n_condensed + q));
        }
    }
    let mut ddi = Matrix::new(n_internal, n_internal);
    mat_inverse(&mut ddi, &dd).map_err(|_| "internal dof block is singular during static condensation")?;
    let mut coupling = Matrix::new(n_condensed, n_internal);
    for i in 0..n_condensed {
        for q in 0..n_internal {
            coupling.set(i, q, kk.get(i, n_condensed + q));
        }
    }
    let mut bdi = Matrix::new(n_condensed, n_internal);
    mat_mat_mul(&mut bdi, 1.0, &coupling, &ddi, 0.0).unwrap();
    for i in 0..n_condensed {
        for j in 0..n_condensed {
            let mut value = kk.get(i, j);
            for q in 0..n_internal {
                value -= bdi.get(i, q) * kk.get(j, n_condensed + q);
            }
            kk_red.set(i, j, value);
        }
        let mut value = rr[i];
        for q in 0..n_internal {
            value -= bdi.get(i, q) * rr[n_condensed + q];
        }
        rr_red[i] = value;
    }
    Ok(())
}

/// Recovers the internal-DOF increments after a global solve
///
/// Back-substitutes Δα = -D⁻¹·(r_D + Bᵀ·Δu) using the same full stiffness
/// and residual that produced the condensed system.
pub fn recover_internal(
    dalpha: &mut Vector,
    kk: &Matrix,
    rr: &Vector,
    duu: &Vector,
    n_condensed: usize,
) -> Result<(), StrError> {
    let (nrow, ncol) = kk.dims();
    if nrow != ncol {
        return Err("stiffness matrix must be square");
    }
    if rr.dim() != nrow || duu.dim() != n_condensed {
        return Err("vector lengths are incompatible with the stiffness dimensions");
    }
    let n_internal = nrow - n_condensed;
    if dalpha.dim() != n_internal {
        return Err("internal increment vector has an incompatible length");
    }
    let mut dd = Matrix::new(n_internal, n_internal);
    for p in 0..n_internal {
        for q in 0..n_internal {
            dd.set(p, q, kk.get(n_condensed + p, n_condensed + q));
        }
    }
    let mut ddi = Matrix::new(n_internal, n_internal);
    mat_inverse(&mut ddi, &dd).map_err(|_| "internal dof block is singular during static condensation")?;
    let mut rhs = Vector::new(n_internal);
    for p in 0..n_internal {
        let mut value = rr[n_condensed + p];
        for j in 0..n_condensed {
            value += kk.get(n_condensed + p, j) * duu[j];
        }
        rhs[p] = value;
    }
    for p in 0..n_internal {
        let mut value = 0.0;
        for q in 0..n_internal {
            value -= ddi.get(p, q) * rhs[q];
        }
        dalpha[p] = value;
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
