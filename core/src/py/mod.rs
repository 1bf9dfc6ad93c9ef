// PyO3-bindinger for Flask-backenden: samme scorer som klienten bruker.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::error::ScoreError;

fn to_py_err(e: ScoreError) -> PyErr {
    match e {
        ScoreError::Decode { path, message } => {
            PyValueError::new_err(format!("parse error (HealthEntry) at {}: {}", path, message))
        }
        other => PyValueError::new_err(other.to_string()),
    }
}

/// JSON (HealthEntry) → JSON (RiskAssessment)
#[pyfunction]
fn score_entry_json(json_in: &str) -> PyResult<String> {
    crate::scoring::score_entry_json(json_in).map_err(to_py_err)
}

#[pyfunction]
fn confidence_for(score: u32) -> u8 {
    crate::scoring::confidence_for(score)
}

// ──────────────────────────────────────────────────────────────────────────────
// PyO3-MODUL
// ──────────────────────────────────────────────────────────────────────────────

#[pymodule]
fn astrasync_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(score_entry_json, m)?)?;
    m.add_function(wrap_pyfunction!(confidence_for, m)?)?;
    Ok(())
}
