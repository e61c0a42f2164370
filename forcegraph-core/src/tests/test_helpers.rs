//! Test helper utilities for forcegraph tests

use crate::runtime::{DetectorValue, SceneResult};
use glam::DVec2;
use std::fs;
use std::path::PathBuf;

/// Check if two floating point values are approximately equal within tolerance
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// Component-wise `approx_eq`
pub fn vec_approx_eq(a: DVec2, b: DVec2, tol: f64) -> bool {
    approx_eq(a.x, b.x, tol) && approx_eq(a.y, b.y, tol)
}

/// Path of a scene file under `forcegraph-core/tests/data`
pub fn scene_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(filename);
    path
}

/// Read a scene file from the test data directory
pub fn load_scene(filename: &str) -> Result<String, Box<dyn std::error::Error>> {
    Ok(fs::read_to_string(scene_path(filename))?)
}

/// Run a scene file from the test data directory
pub fn run_scene_file(filename: &str) -> Result<SceneResult, Box<dyn std::error::Error>> {
    let source = load_scene(filename)?;
    Ok(crate::run_scene(&source)?)
}

/// Scalar detector value by name
pub fn scalar(result: &SceneResult, name: &str) -> Option<f64> {
    result.detectors.iter().find(|d| d.name == name).and_then(|d| match d.value {
        DetectorValue::Scalar(v) => Some(v),
        DetectorValue::Point(_) => None,
    })
}

/// Point detector value by name
pub fn point(result: &SceneResult, name: &str) -> Option<DVec2> {
    result.detectors.iter().find(|d| d.name == name).and_then(|d| match d.value {
        DetectorValue::Point(p) => Some(p),
        DetectorValue::Scalar(_) => None,
    })
}
