//! PyO3 wrapper for the generator adapter
//!
//! # Example (from Python)
//!
//! ```python
//! from generator_adapter_core_rs import Generator
//!
//! gen = Generator(snapshot_path=None)
//! gen.apply_defaults()
//! gen.set_processes(True, False, False, False, False)
//! gen.set_seed(12345)
//! gen.set_beam(2, 2212, 2212, 6500.0, 6500.0)
//! gen.initialize()
//!
//! status, code, t, xi = gen.sample_event()
//! sigma_tot, sigma_el = gen.cross_sections()
//! ```

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::path::PathBuf;

use crate::adapter::{AdapterError, BeamConfig, GeneratorAdapter, ProcessSelection};
use crate::generator::ToyGenerator;

fn to_py_err(e: AdapterError) -> PyErr {
    match e {
        AdapterError::Config(_) | AdapterError::Validation(_) | AdapterError::RunConfig(_) => {
            PyValueError::new_err(e.to_string())
        }
        _ => PyRuntimeError::new_err(e.to_string()),
    }
}

/// Python wrapper over an adapter driving the reference generator.
#[pyclass(name = "Generator")]
pub struct PyGenerator {
    inner: GeneratorAdapter<ToyGenerator>,
}

#[pymethods]
impl PyGenerator {
    /// Create a generator. `snapshot_path=None` disables the settings
    /// snapshot; omit it to use the default file name.
    #[new]
    #[pyo3(signature = (snapshot_path = Some(PathBuf::from(crate::settings::snapshot::DEFAULT_SNAPSHOT_FILE))))]
    fn new(snapshot_path: Option<PathBuf>) -> Self {
        PyGenerator {
            inner: GeneratorAdapter::new(ToyGenerator::new()).with_snapshot_path(snapshot_path),
        }
    }

    #[getter]
    fn run_id(&self) -> String {
        self.inner.run_id().to_string()
    }

    fn initialize(&mut self) -> PyResult<()> {
        self.inner.initialize().map_err(to_py_err)
    }

    fn apply_defaults(&mut self) -> PyResult<()> {
        self.inner.apply_defaults().map_err(to_py_err)
    }

    fn set_processes(
        &mut self,
        elastic: bool,
        single_diffractive: bool,
        double_diffractive: bool,
        central_diffractive: bool,
        non_diffractive: bool,
    ) -> PyResult<()> {
        self.inner
            .set_processes(ProcessSelection {
                elastic,
                single_diffractive,
                double_diffractive,
                central_diffractive,
                non_diffractive,
            })
            .map_err(to_py_err)
    }

    fn set_coulomb(&mut self, enabled: bool, t_abs_min: f64) -> PyResult<()> {
        self.inner.set_coulomb(enabled, t_abs_min).map_err(to_py_err)
    }

    /// Returns `True` when the seed makes the run reproducible.
    fn set_seed(&mut self, seed: i32) -> PyResult<bool> {
        self.inner
            .set_seed(seed)
            .map(|mode| mode.is_deterministic())
            .map_err(to_py_err)
    }

    fn set_beam(&mut self, frame_type: i32, id_a: i32, id_b: i32, e_a: f64, e_b: f64) -> PyResult<()> {
        self.inner
            .set_beam(BeamConfig {
                frame_type,
                id_a,
                id_b,
                e_a,
                e_b,
            })
            .map_err(to_py_err)
    }

    /// Apply one setting by native key, e.g. `set_setting("SoftQCD:elastic", "on")`.
    fn set_setting(&mut self, name: &str, value: &str) -> PyResult<()> {
        self.inner.set_by_name(name, value).map_err(to_py_err)
    }

    fn load_file(&mut self, path: PathBuf) -> PyResult<usize> {
        self.inner.load_file(&path).map_err(to_py_err)
    }

    /// `(sigma_total, sigma_elastic)` in mb.
    fn cross_sections(&self) -> PyResult<(f64, f64)> {
        let summary = self.inner.cross_sections().map_err(to_py_err)?;
        Ok((summary.sigma_total, summary.sigma_elastic))
    }

    /// `(status, process_code, t, xi)`.
    fn sample_event(&mut self) -> PyResult<(bool, i32, f64, f64)> {
        let event = self.inner.sample_event().map_err(to_py_err)?;
        Ok((event.status, event.process_code, event.t, event.xi))
    }

    /// Settings that differ from their defaults, as `(key, value)` text pairs.
    fn changed_settings(&self) -> Vec<(String, String)> {
        self.inner
            .registry()
            .changed()
            .into_iter()
            .map(|(key, value)| (key.native_name().to_string(), value.to_string()))
            .collect()
    }
}
