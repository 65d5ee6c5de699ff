use russell_lab::{Matrix, Vector};

/// Maps the six engineering components to tensor index pairs
///
/// Component ordering: 11, 22, 33, 12, 23, 13
pub const VOIGT: [(usize, usize); 6] = [(0, 0), (1, 1), (2, 2), (0, 1), (1, 2), (0, 2)];

/// Builds the 6×6 transformation operator from a 3×3 frame matrix
///
/// The operator is the fourth-order product frame ⊗ frame collapsed onto
/// the engineering component ordering; the rows of `frame` are the local
/// basis vectors. The same operator serves strain-like and stress-like
/// 6-vectors. The frame is not checked for orthonormality; a malformed
/// frame silently yields an incorrect but well-defined result.
pub fn transform_matrix(frame: &Matrix) -> Matrix {
    assert_eq!(frame.dims(), (3, 3));
    let mut tt = Matrix::new(6, 6);
    for p in 0..6 {
        let (k, l) = VOIGT[p];
        for q in 0..6 {
            let (i, j) = VOIGT[q];
            let mut value = frame.get(k, i) * frame.get(l, j);
            if i != j {
                value += frame.get(k, j) * frame.get(l, i);
            }
            tt.set(p, q, value);
        }
    }
    tt
}

/// Transforms a 6-component tensor from the natural to the local frame
///
/// Pure function: never mutates the frame; no error path.
pub fn natural_to_local(local: &mut Vector, natural: &Vector, frame: &Matrix) {
    assert_eq!(local.dim(), 6);
    assert_eq!(natural.dim(), 6);
    assert_eq!(frame.dims(), (3, 3));
    for p in 0..6 {
        let (k, l) = VOIGT[p];
        let mut value = 0.0;
        for q in 0..6 {
            let (i, j) = VOIGT[q];
            value += frame.get(k, i) * frame.get(l, j) * natural[q];
            if i != j {
                value += frame.get(k, j) * frame.get(l, i) * natural[q];
            }
        }
        local[p] = value;
    }
}

/// Transforms a 6-component tensor from the local to the natural frame
///
/// Applies the transposed frame; the exact inverse of [natural_to_local]
/// for orthonormal frames.
pub fn local_to_natural(natural: &mut Vector, local: &Vector, frame: &Matrix) {
    assert_eq!(natural.dim(), 6);
    assert_eq!(local.dim(), 6);
    assert_eq!(frame.dims(), (3, 3));
    for p in 0..6 {
        let (k, l) = VOIGT[p];
        let mut value = 0.0;
        for q in 0..6 {
            let (i, j) = VOIGT[q];
            value += frame.get(i, k) * frame.get(j, l) * local[q];
            if i != j {
                value += frame.get(j, k) * frame.get(i, l) * local[q];
            }
        }
        natural[p] = value;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{local_to_natural, natural_to_local, transform_matrix};
    use russell_lab::math::PI;
    use russell_lab::{mat_approx_eq, vec_approx_eq, Matrix, Vector};

    /// Returns an orthonormal frame from successive rotations about z and x
    fn sample_frame(alpha: f64, beta: f64) -> Matrix {
        let (sa, ca) = (f64::sin(alpha), f64::cos(alpha));
        let (sb, cb) = (f64::sin(beta), f64::cos(beta));
        #[rustfmt::skip]
        let frame = Matrix::from(&[
            [ ca,      sa,      0.0],
            [-sa * cb, ca * cb, sb ],
            [ sa * sb, -ca * sb, cb],
        ]);
        frame
    }

    #[test]
    fn identity_frame_is_a_no_op() {
        let frame = Matrix::from(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let tt = transform_matrix(&frame);
        let mut correct = Matrix::new(6, 6);
        for i in 0..6 {
            correct.set(i, i, 1.0);
        }
        mat_approx_eq(&tt, &correct, 1e-15);
        let natural = Vector::from(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut local = Vector::new(6);
        natural_to_local(&mut local, &natural, &frame);
        vec_approx_eq(&local, &natural, 1e-15);
    }

    #[test]
    fn involution_recovers_the_tensor() {
        let tensor = Vector::from(&[1.5, -0.8, 2.2, 0.4, -1.1, 0.9]);
        for (alpha, beta) in [(PI / 6.0, PI / 4.0), (-PI / 3.0, PI / 5.0), (1.0, -2.0)] {
            let frame = sample_frame(alpha, beta);
            let mut local = Vector::new(6);
            let mut back = Vector::new(6);
            natural_to_local(&mut local, &tensor, &frame);
            local_to_natural(&mut back, &local, &frame);
            vec_approx_eq(&back, &tensor, 1e-14);
        }
    }

    #[test]
    fn rotation_about_z_swaps_normal_components() {
        // 90° about z: local x = global y, local y = -global x
        let frame = Matrix::from(&[[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        let natural = Vector::from(&[1.0, 2.0, 3.0, 0.0, 0.0, 0.0]);
        let mut local = Vector::new(6);
        natural_to_local(&mut local, &natural, &frame);
        vec_approx_eq(&local, &[2.0, 1.0, 3.0, 0.0, 0.0, 0.0], 1e-15);
    }

    #[test]
    fn transform_matrix_matches_vector_transform() {
        let frame = sample_frame(0.7, -0.3);
        let tt = transform_matrix(&frame);
        let natural = Vector::from(&[0.3, -0.2, 1.1, 0.5, -0.4, 0.25]);
        let mut local = Vector::new(6);
        natural_to_local(&mut local, &natural, &frame);
        let mut via_matrix = Vector::new(6);
        russell_lab::mat_vec_mul(&mut via_matrix, 1.0, &tt, &natural).unwrap();
        vec_approx_eq(&via_matrix, &local, 1e-15);
    }
}
