//! Handle-based access to detectors.
//!
//! Hosts that cannot hold a [YinDetector] directly (for example because they
//! sit behind a foreign call boundary) address detectors through a [Handle]
//! instead. The registry owns every detector it creates. Each handle carries
//! the generation of the slot it was issued for; destroying a detector bumps
//! that generation, so a handle that outlived its detector is rejected even
//! after the slot has been given to a new detector. A slot whose generation
//! has run out is retired rather than reused.
//!
//! ```
//! use pitch_engine::{Config, Registry};
//!
//! let mut registry = Registry::<f32>::new();
//! let handle = registry.create(Config::default()).unwrap();
//! let result = registry.process(handle, &[]).unwrap();
//! assert!(!result.pitched);
//!
//! registry.destroy(handle);
//! registry.destroy(handle); // no-op
//! assert!(registry.process(handle, &[]).is_err());
//! ```

use std::fmt;

use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::detector::result::DetectionResult;
use crate::detector::yin::YinDetector;
use crate::detector::PitchDetector;
use crate::fft;
use crate::float::Float;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("{0} does not refer to a live detector")]
    InvalidHandle(Handle),

    #[error("no detector slots left")]
    Exhausted,
}

/// Opaque reference to a detector owned by a [Registry].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle {}v{}", self.index, self.generation)
    }
}

struct Slot<T: Float> {
    generation: u32,
    detector: Option<YinDetector<T>>,
}

pub struct Registry<T>
where
    T: Float,
{
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T: Float> Registry<T> {
    pub fn new() -> Self {
        fft::init();
        Registry {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Create a detector and return its handle.
    pub fn create(&mut self, config: Config) -> Result<Handle, EngineError> {
        let detector = YinDetector::new(config)?;

        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.detector = Some(detector);
                Handle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index =
                    u32::try_from(self.slots.len()).map_err(|_| EngineError::Exhausted)?;
                self.slots.push(Slot {
                    generation: 0,
                    detector: Some(detector),
                });
                Handle {
                    index,
                    generation: 0,
                }
            }
        };

        self.live += 1;
        tracing::debug!(handle = %handle, "Created detector");
        Ok(handle)
    }

    /// Analyse one frame with the detector behind `handle`.
    pub fn process(
        &mut self,
        handle: Handle,
        samples: &[T],
    ) -> Result<DetectionResult<T>, EngineError> {
        Ok(self.get_mut(handle)?.process(samples))
    }

    pub fn reset(&mut self, handle: Handle) -> Result<(), EngineError> {
        self.get_mut(handle)?.reset();
        Ok(())
    }

    /// `false` if `handle` is stale or `hz` is not a positive frequency; the
    /// detector is unchanged in both cases.
    pub fn set_reference_pitch(&mut self, handle: Handle, hz: T) -> bool {
        match self.get_mut(handle) {
            Ok(detector) => detector.set_reference_pitch(hz),
            Err(_) => false,
        }
    }

    /// Destroy the detector behind `handle`. Destroying a stale handle,
    /// including one that was already destroyed, does nothing.
    pub fn destroy(&mut self, handle: Handle) {
        if !self.contains(handle) {
            tracing::debug!(handle = %handle, "Ignoring destroy of stale handle");
            return;
        }

        let slot = &mut self.slots[handle.index as usize];
        slot.detector = None;
        self.live -= 1;
        // A slot whose generation cannot advance is retired, never reissued.
        match slot.generation.checked_add(1) {
            Some(generation) => {
                slot.generation = generation;
                self.free.push(handle.index);
            }
            None => tracing::debug!(handle = %handle, "Retiring detector slot"),
        }
        tracing::debug!(handle = %handle, "Destroyed detector");
    }

    /// Whether `handle` refers to a live detector.
    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: Handle) -> Option<&YinDetector<T>> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.detector.as_ref())
    }

    fn get_mut(&mut self, handle: Handle) -> Result<&mut YinDetector<T>, EngineError> {
        match self
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.detector.as_mut())
        {
            Some(detector) => Ok(detector),
            None => {
                tracing::warn!(handle = %handle, "Stale detector handle");
                Err(EngineError::InvalidHandle(handle))
            }
        }
    }

    /// Number of live detectors.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Float> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
