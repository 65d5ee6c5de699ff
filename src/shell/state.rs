use crate::base::ShellParams;
use crate::StrError;
use russell_lab::Vector;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the persistent state of one shell element
///
/// The nodal displacement history, the internal enhancement parameters,
/// and the per-integration-point stress/strain records survive across
/// load steps; everything else is recomputed at every evaluation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShellState {
    /// Current nodal displacement (n_dof_condensed)
    pub uu: Vector,

    /// Nodal displacement at the previous load step (n_dof_condensed)
    pub uu_previous: Vector,

    /// Internal thickness-enhancement parameters (n_internal_node)
    pub alpha: Vector,

    /// Local-frame stress at each integration point (n_integ_point)
    pub stresses: Vec<Vector>,

    /// Local-frame strain at each integration point (n_integ_point)
    pub strains: Vec<Vector>,
}

impl ShellState {
    /// Allocates a new zeroed instance
    pub fn new(params: &ShellParams, n_integ_point: usize) -> Self {
        ShellState {
            uu: Vector::new(params.n_dof_condensed),
            uu_previous: Vector::new(params.n_dof_condensed),
            alpha: Vector::new(params.n_internal_node),
            stresses: vec![Vector::new(6); n_integ_point],
            strains: vec![Vector::new(6); n_integ_point],
        }
    }

    /// Reads a JSON file containing the state
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let input = File::open(path).map_err(|_| "cannot open state file")?;
        let buffered = BufReader::new(input);
        let state = serde_json::from_reader(buffered).map_err(|_| "cannot parse state file")?;
        Ok(state)
    }

    /// Writes a JSON file with the state
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create state file")?;
        serde_json::to_writer(&mut file, &self).map_err(|_| "cannot write state file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
