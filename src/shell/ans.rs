use super::Snapshot;
use crate::base::ShellParams;
use russell_lab::{Matrix, Vector};

/// Describes one transverse-shear tying edge of the bilinear mid-surface
#[derive(Clone, Copy, Debug)]
pub struct AnsEdge {
    /// Mid-surface corner indices delimiting the edge (start, end)
    pub nodes: (usize, usize),

    /// Strain component substituted by this edge (4 = γ23, 5 = γ13)
    pub component: usize,

    /// Natural coordinates of the tying point at the edge midpoint
    pub ksi: [f64; 2],
}

/// Tying edges of the 8-node topology
///
/// The corner numbering must match the counter-clockwise mid-surface
/// ordering exactly; the edge directions keep the +ξ and +η orientations.
pub const ANS_EDGES: [AnsEdge; 4] = [
    AnsEdge {
        nodes: (0, 1),
        component: 5,
        ksi: [0.0, -1.0],
    },
    AnsEdge {
        nodes: (1, 2),
        component: 4,
        ksi: [1.0, 0.0],
    },
    AnsEdge {
        nodes: (3, 2),
        component: 5,
        ksi: [0.0, 1.0],
    },
    AnsEdge {
        nodes: (0, 3),
        component: 4,
        ksi: [-1.0, 0.0],
    },
];

/// Sign of the tying-tangent variation per slot (b₁, b₂, t₁, t₂)
const SIGN_TANGENT: [f64; 4] = [-1.0, 1.0, -1.0, 1.0];

/// Sign of the tying-director variation per slot (b₁, b₂, t₁, t₂)
const SIGN_DIRECTOR: [f64; 4] = [-1.0, -1.0, 1.0, 1.0];

/// Sign pattern of the per-edge geometric correction over the four slots
const CORR_PATTERN: [[f64; 4]; 4] = [
    [1.0, 0.0, 0.0, -1.0],
    [0.0, -1.0, 1.0, 0.0],
    [0.0, 1.0, -1.0, 0.0],
    [-1.0, 0.0, 0.0, 1.0],
];

/// Weight of the geometric correction entries
const CORR_WEIGHT: f64 = 0.125;

/// Holds the assumed-natural-strain tying data of one integration point
///
/// The transverse shear is sampled at the four edge-midpoint tying points
/// and bilinearly blended between opposite edge pairs, replacing the
/// locking-prone isoparametric interpolation.
#[derive(Clone, Debug)]
pub struct AnsState {
    /// Tying tangent vectors at the current configuration (per edge)
    pub edge_tangent: [[f64; 3]; 4],

    /// Tying director vectors at the current configuration (per edge)
    pub edge_director: [[f64; 3]; 4],

    /// Tying shear values at the reference configuration
    pub gamma_reference: [f64; 4],

    /// Tying shear values at the previous configuration
    pub gamma_previous: [f64; 4],

    /// Tying shear values at the current configuration
    pub gamma_current: [f64; 4],

    /// Substitute-strain operator rows (n_dof_condensed each)
    pub rows: [Vector; 4],

    n_mid_node: usize,
    n_dof_per_node: usize,
}

/// Computes the tying tangent and director of one edge
fn tying_vectors(snapshot: &Snapshot, n1: usize, n2: usize) -> ([f64; 3], [f64; 3]) {
    let mut e = [0.0; 3];
    let mut d = [0.0; 3];
    for i in 0..3 {
        let mid1 = 0.5 * (snapshot.bottom.get(i, n1) + snapshot.top.get(i, n1));
        let mid2 = 0.5 * (snapshot.bottom.get(i, n2) + snapshot.top.get(i, n2));
        let dir1 = 0.5 * (snapshot.top.get(i, n1) - snapshot.bottom.get(i, n1));
        let dir2 = 0.5 * (snapshot.top.get(i, n2) - snapshot.bottom.get(i, n2));
        e[i] = 0.5 * (mid2 - mid1);
        d[i] = 0.5 * (dir1 + dir2);
    }
    (e, d)
}

/// Returns the bilinear blending weights of the four edges at (ξ, η)
fn blend_weights(ksi: &[f64; 2]) -> [f64; 4] {
    [
        0.5 * (1.0 - ksi[1]),
        0.5 * (1.0 + ksi[0]),
        0.5 * (1.0 + ksi[1]),
        0.5 * (1.0 - ksi[0]),
    ]
}

impl AnsState {
    /// Computes the tying data from the configuration snapshots
    pub fn new(params: &ShellParams, reference: &Snapshot, previous: &Snapshot, current: &Snapshot) -> Self {
        assert!(params.ans);
        let mut edge_tangent = [[0.0; 3]; 4];
        let mut edge_director = [[0.0; 3]; 4];
        let mut gamma_reference = [0.0; 4];
        let mut gamma_previous = [0.0; 4];
        let mut gamma_current = [0.0; 4];
        let mut rows = [
            Vector::new(params.n_dof_condensed),
            Vector::new(params.n_dof_condensed),
            Vector::new(params.n_dof_condensed),
            Vector::new(params.n_dof_condensed),
        ];
        for (index, edge) in ANS_EDGES.iter().enumerate() {
            let (n1, n2) = edge.nodes;
            let (er, dr) = tying_vectors(reference, n1, n2);
            let (ep, dp) = tying_vectors(previous, n1, n2);
            let (ec, dc) = tying_vectors(current, n1, n2);
            for i in 0..3 {
                gamma_reference[index] += er[i] * dr[i];
                gamma_previous[index] += ep[i] * dp[i];
                gamma_current[index] += ec[i] * dc[i];
            }
            // operator row: variation of e·d at the current configuration,
            // populated only on the DOF slots of the edge's four nodes
            let slots = [n1, n2, n1 + params.n_mid_node, n2 + params.n_mid_node];
            for p in 0..4 {
                let col = params.n_dof_per_node * slots[p];
                for i in 0..3 {
                    rows[index][col + i] = 0.25 * (SIGN_TANGENT[p] * dc[i] + SIGN_DIRECTOR[p] * ec[i]);
                }
            }
            edge_tangent[index] = ec;
            edge_director[index] = dc;
        }
        AnsState {
            edge_tangent,
            edge_director,
            gamma_reference,
            gamma_previous,
            gamma_current,
            rows,
            n_mid_node: params.n_mid_node,
            n_dof_per_node: params.n_dof_per_node,
        }
    }

    /// Returns the blended substitute shear strains (γ23, γ13) at (ξ, η)
    pub fn shear_strain(&self, ksi: &[f64; 2]) -> (f64, f64) {
        let ff = blend_weights(ksi);
        let mut gamma23 = 0.0;
        let mut gamma13 = 0.0;
        for (index, edge) in ANS_EDGES.iter().enumerate() {
            let value = ff[index] * (self.gamma_current[index] - self.gamma_reference[index]);
            if edge.component == 4 {
                gamma23 += value;
            } else {
                gamma13 += value;
            }
        }
        (gamma23, gamma13)
    }

    /// Returns the blended substitute shear strain increments (γ23, γ13)
    pub fn shear_strain_increment(&self, ksi: &[f64; 2]) -> (f64, f64) {
        let ff = blend_weights(ksi);
        let mut gamma23 = 0.0;
        let mut gamma13 = 0.0;
        for (index, edge) in ANS_EDGES.iter().enumerate() {
            let value = ff[index] * (self.gamma_current[index] - self.gamma_previous[index]);
            if edge.component == 4 {
                gamma23 += value;
            } else {
                gamma13 += value;
            }
        }
        (gamma23, gamma13)
    }

    /// Overwrites the transverse-shear rows of the strain operator
    ///
    /// Only the condensed (nodal) columns are touched; the internal-DOF
    /// columns of rows 4 and 5 remain zero.
    pub fn apply_rows(&self, bb: &mut Matrix, ksi: &[f64; 2]) {
        let ff = blend_weights(ksi);
        let ncol = self.rows[0].dim();
        for c in 0..ncol {
            bb.set(4, c, 0.0);
            bb.set(5, c, 0.0);
        }
        for (index, edge) in ANS_EDGES.iter().enumerate() {
            for c in 0..ncol {
                let value = bb.get(edge.component, c) + ff[index] * self.rows[index][c];
                bb.set(edge.component, c, value);
            }
        }
    }

    /// Accumulates the blended geometric-stiffness corrections
    ///
    /// # Input
    ///
    /// * `kk` -- the element stiffness buffer (total-DOF size)
    /// * `s23`, `s13` -- natural-frame transverse-shear stresses
    /// * `ksi` -- natural coordinates of the integration point
    /// * `weight` -- integration weight
    pub fn add_geometric_correction(&self, kk: &mut Matrix, s23: f64, s13: f64, ksi: &[f64; 2], weight: f64) {
        let ff = blend_weights(ksi);
        for (index, edge) in ANS_EDGES.iter().enumerate() {
            let stress = if edge.component == 4 { s23 } else { s13 };
            let scale = weight * ff[index] * stress * CORR_WEIGHT;
            let (n1, n2) = edge.nodes;
            let slots = [n1, n2, n1 + self.n_mid_node, n2 + self.n_mid_node];
            for p in 0..4 {
                for q in 0..4 {
                    if CORR_PATTERN[p][q] == 0.0 {
                        continue;
                    }
                    let row = self.n_dof_per_node * slots[p];
                    let col = self.n_dof_per_node * slots[q];
                    for i in 0..3 {
                        let value = kk.get(row + i, col + i) + scale * CORR_PATTERN[p][q];
                        kk.set(row + i, col + i, value);
                    }
                }
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
