use crate::StrError;

/// Holds immutable topology constants of a solid-shell element
///
/// The degenerated solid-shell pairs every mid-surface node with a bottom
/// and a top external node carrying three translations each. Four internal
/// (non-nodal) thickness-enhancement parameters occupy the trailing slots
/// of the element matrices and are eliminated by static condensation.
///
/// Two topologies are supported:
///
/// * 8 external nodes -- bilinear mid-surface (4 mid-nodes), ANS active
/// * 16 external nodes -- quadratic mid-surface (8 mid-nodes), no ANS
#[derive(Clone, Copy, Debug)]
pub struct ShellParams {
    /// Total number of element DOFs, including internal ones
    pub n_dof_total: usize,

    /// Number of condensed (nodal) DOFs remaining after condensation
    pub n_dof_condensed: usize,

    /// Number of DOFs per external node (always 3: ux, uy, uz)
    pub n_dof_per_node: usize,

    /// Number of mid-surface nodes (4 or 8)
    pub n_mid_node: usize,

    /// Number of external nodes (bottom + top pairs; 8 or 16)
    pub n_external_node: usize,

    /// Number of internal nodes carrying one enhancement parameter each
    pub n_internal_node: usize,

    /// Indicates that the assumed-natural-strain correction is active
    pub ans: bool,

    /// Number of material layers through the thickness
    pub n_layer: usize,
}

impl ShellParams {
    /// Allocates a new instance given the external node count
    ///
    /// # Input
    ///
    /// * `n_external_node` -- 8 or 16
    /// * `n_layer` -- number of material layers (≥ 1)
    pub fn new(n_external_node: usize, n_layer: usize) -> Result<Self, StrError> {
        if n_external_node != 8 && n_external_node != 16 {
            return Err("number of external nodes must be 8 or 16");
        }
        if n_layer < 1 {
            return Err("number of layers must be at least 1");
        }
        let n_mid_node = n_external_node / 2;
        let n_internal_node = 4;
        let n_dof_per_node = 3;
        let n_dof_condensed = n_external_node * n_dof_per_node;
        Ok(ShellParams {
            n_dof_total: n_dof_condensed + n_internal_node,
            n_dof_condensed,
            n_dof_per_node,
            n_mid_node,
            n_external_node,
            n_internal_node,
            ans: n_external_node == 8,
            n_layer,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
