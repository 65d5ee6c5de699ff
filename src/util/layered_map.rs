use crate::StrError;
use russell_lab::{Matrix, Vector};

/// Labels of the six stress components in the element-local ordering
pub const COMPONENT_LABELS: [&str; 6] = ["s11", "s22", "s33", "s12", "s23", "s13"];

/// Indicates which face of a single-layer shell contributed a value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Face {
    /// Integration point below the mid-surface (ζ < 0)
    Bottom,

    /// Integration point above the mid-surface (ζ ≥ 0)
    Top,
}

/// Accumulates per-layer, per-component, per-node tensor values
///
/// Values are stored as raw weighted sums; the division by the accumulated
/// weight happens only when reading through [LayeredTensorMap::get_data].
/// Single-layer constructions route bottom-face contributions to the
/// bottom nodes and top-face contributions to the top nodes; multi-layer
/// constructions populate every node of the layer.
#[derive(Clone, Debug)]
pub struct LayeredTensorMap {
    /// Number of layers
    pub n_layer: usize,

    /// Number of external nodes (bottom + top)
    pub n_node: usize,

    /// Weighted sums per layer: (6, n_node) each
    values: Vec<Matrix>,

    /// Accumulated weights per layer and node: (n_node) each
    weights: Vec<Vector>,
}

impl LayeredTensorMap {
    /// Allocates a new instance
    pub fn new(n_layer: usize, n_node: usize) -> Result<Self, StrError> {
        if n_layer < 1 {
            return Err("number of layers must be at least 1");
        }
        if n_node < 2 || n_node % 2 != 0 {
            return Err("number of nodes must be positive and even");
        }
        Ok(LayeredTensorMap {
            n_layer,
            n_node,
            values: vec![Matrix::new(6, n_node); n_layer],
            weights: vec![Vector::new(n_node); n_layer],
        })
    }

    /// Clears all accumulated values and weights
    pub fn reset(&mut self) {
        for layer in 0..self.n_layer {
            self.values[layer].fill(0.0);
            self.weights[layer].fill(0.0);
        }
    }

    /// Accumulates one weighted tensor contribution into a layer
    ///
    /// # Input
    ///
    /// * `layer` -- the layer index
    /// * `face` -- the contributing face (used by single-layer storage only)
    /// * `tensor` -- the six components to accumulate
    /// * `weight` -- the contribution weight (e.g., the integration weight)
    pub fn add_tensor(&mut self, layer: usize, face: Face, tensor: &Vector, weight: f64) -> Result<(), StrError> {
        if layer >= self.n_layer {
            return Err("layer index is out of bounds");
        }
        if tensor.dim() != 6 {
            return Err("tensor vector must have 6 components");
        }
        let half = self.n_node / 2;
        let (first, last) = if self.n_layer == 1 {
            match face {
                Face::Bottom => (0, half),
                Face::Top => (half, self.n_node),
            }
        } else {
            (0, self.n_node)
        };
        for n in first..last {
            for c in 0..6 {
                let value = self.values[layer].get(c, n) + weight * tensor[c];
                self.values[layer].set(c, n, value);
            }
            self.weights[layer][n] += weight;
        }
        Ok(())
    }

    /// Returns the weighted-average table: (n_layer × 6, n_node)
    ///
    /// Rows are ordered layer-major (all six components of layer 0 first);
    /// entries without accumulated weight are zero.
    pub fn get_data(&self) -> Matrix {
        let mut table = Matrix::new(self.n_layer * 6, self.n_node);
        for layer in 0..self.n_layer {
            for n in 0..self.n_node {
                let weight = self.weights[layer][n];
                if weight == 0.0 {
                    continue;
                }
                for c in 0..6 {
                    table.set(layer * 6 + c, n, self.values[layer].get(c, n) / weight);
                }
            }
        }
        table
    }

    /// Generates human-readable labels for the rows of [LayeredTensorMap::get_data]
    pub fn labels(&self) -> Vec<String> {
        let mut all = Vec::with_capacity(self.n_layer * 6);
        for layer in 0..self.n_layer {
            for c in 0..6 {
                all.push(format!("lay{}-{}", layer, COMPONENT_LABELS[c]));
            }
        }
        all
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
