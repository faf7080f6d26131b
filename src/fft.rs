//! FFT backend selection and process-wide initialization.
//!
//! The backend is resolved once per process from the `PITCH_ENGINE_FFT_BACKEND`
//! environment variable:
//!
//!   * `auto` (or unset): [rustfft::FftPlanner], which picks AVX, SSE or NEON
//!     kernels at runtime when the CPU supports them.
//!   * `scalar`: [rustfft::FftPlannerScalar], portable scalar kernels only.
//!
//! Unknown values fall back to `auto`.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use rustfft::{Fft, FftPlanner, FftPlannerScalar};

use crate::float::Float;
use crate::note;

pub const BACKEND_ENV_VAR: &str = "PITCH_ENGINE_FFT_BACKEND";

static BACKEND: OnceCell<FftBackend> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftBackend {
    Auto,
    Scalar,
}

impl FftBackend {
    /// Parse a backend name. `None` for names that are not recognized.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Some(FftBackend::Auto),
            "scalar" => Some(FftBackend::Scalar),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FftBackend::Auto => "auto",
            FftBackend::Scalar => "scalar",
        }
    }

    fn from_env() -> Self {
        match std::env::var(BACKEND_ENV_VAR) {
            Ok(value) => FftBackend::from_name(&value).unwrap_or_else(|| {
                tracing::warn!(
                    value = %value,
                    "Unknown {}, falling back to auto",
                    BACKEND_ENV_VAR
                );
                FftBackend::Auto
            }),
            Err(_) => FftBackend::Auto,
        }
    }

    /// Plan a forward and an inverse transform of length `len`.
    pub fn plan<T: Float>(&self, len: usize) -> (Arc<dyn Fft<T>>, Arc<dyn Fft<T>>) {
        match self {
            FftBackend::Auto => {
                let mut planner = FftPlanner::new();
                (planner.plan_fft_forward(len), planner.plan_fft_inverse(len))
            }
            FftBackend::Scalar => {
                let mut planner = FftPlannerScalar::new();
                (planner.plan_fft_forward(len), planner.plan_fft_inverse(len))
            }
        }
    }
}

impl fmt::Display for FftBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One-time process-wide initialization: resolves the FFT backend and builds
/// the note-name table. Safe to call any number of times from any thread;
/// every call after the first returns the backend chosen by the first.
///
/// Detectors call this on construction, so an explicit call is optional.
pub fn init() -> FftBackend {
    *BACKEND.get_or_init(|| {
        let backend = FftBackend::from_env();
        note::init_note_names();
        tracing::info!(backend = %backend, "Pitch engine initialized");
        backend
    })
}
