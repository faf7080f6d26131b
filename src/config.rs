//! Detector configuration.
//!
//! A [Config] is fixed when a detector is created, with the exception of the
//! reference pitch which can be changed later through
//! [`PitchDetector::set_reference_pitch`](crate::detector::PitchDetector::set_reference_pitch).
//! Configs can be built in code or loaded from JSON; missing JSON fields take
//! their default values.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
pub const DEFAULT_FRAME_SIZE: usize = 2048;
/// The YIN paper suggests 0.10; values up to 0.20 trade precision for recall.
pub const DEFAULT_THRESHOLD: f64 = 0.10;
/// Concert A.
pub const DEFAULT_REFERENCE_PITCH_HZ: f64 = 440.0;
pub const DEFAULT_MIN_FREQUENCY: f64 = 20.0;
pub const DEFAULT_MAX_FREQUENCY: f64 = 4200.0;
/// Frames larger than this are rejected.
pub const MAX_FRAME_SIZE: usize = 32768;

/// Errors produced while building or loading a [Config].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("sample rate must be positive")]
    SampleRate,

    #[error("frame size must be between 2 and 32768, got {0}")]
    FrameSize(usize),

    #[error("threshold must lie strictly between 0 and 1, got {0}")]
    Threshold(f64),

    #[error("reference pitch must be a positive frequency, got {0}")]
    ReferencePitch(f64),

    #[error("invalid voicing range: min {min} Hz, max {max} Hz")]
    FrequencyRange { min: f64, max: f64 },

    #[error("hop size must be between 1 and the frame size {frame_size}, got {hop_size}")]
    HopSize { hop_size: usize, frame_size: usize },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

fn default_frame_size() -> usize {
    DEFAULT_FRAME_SIZE
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_reference_pitch_hz() -> f64 {
    DEFAULT_REFERENCE_PITCH_HZ
}

fn default_min_frequency() -> f64 {
    DEFAULT_MIN_FREQUENCY
}

fn default_max_frequency() -> f64 {
    DEFAULT_MAX_FREQUENCY
}

/// Parameters of a pitch detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Number of samples analysed per frame
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,
    /// Upper bound on the normalized difference for a lag to count as periodic
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Frequency assigned to MIDI note 69 (A4)
    #[serde(default = "default_reference_pitch_hz")]
    pub reference_pitch_hz: f64,
    /// Lowest frequency reported as pitched
    #[serde(default = "default_min_frequency")]
    pub min_frequency: f64,
    /// Highest frequency reported as pitched
    #[serde(default = "default_max_frequency")]
    pub max_frequency: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            frame_size: default_frame_size(),
            threshold: default_threshold(),
            reference_pitch_hz: default_reference_pitch_hz(),
            min_frequency: default_min_frequency(),
            max_frequency: default_max_frequency(),
        }
    }
}

impl Config {
    pub fn new(sample_rate: u32, frame_size: usize, threshold: f64, reference_pitch_hz: f64) -> Self {
        Self {
            sample_rate,
            frame_size,
            threshold,
            reference_pitch_hz,
            ..Self::default()
        }
    }

    /// Restrict the frequencies reported as pitched to `min..=max` Hz.
    pub fn with_frequency_range(mut self, min: f64, max: f64) -> Self {
        self.min_frequency = min;
        self.max_frequency = max;
        self
    }

    /// Check every field against its domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::SampleRate);
        }
        if self.frame_size < 2 || self.frame_size > MAX_FRAME_SIZE {
            return Err(ConfigError::FrameSize(self.frame_size));
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(ConfigError::Threshold(self.threshold));
        }
        if !is_valid_reference_pitch(self.reference_pitch_hz) {
            return Err(ConfigError::ReferencePitch(self.reference_pitch_hz));
        }
        let (min, max) = (self.min_frequency, self.max_frequency);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min < max) {
            return Err(ConfigError::FrequencyRange { min, max });
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded detector config");
        Ok(config)
    }
}

/// A reference pitch must be a finite, strictly positive frequency.
pub fn is_valid_reference_pitch(hz: f64) -> bool {
    hz.is_finite() && hz > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.frame_size, 2048);
        assert_eq!(config.reference_pitch_hz, 440.0);
    }

    #[test]
    fn rejects_out_of_domain_values() {
        let base = Config::default();

        let config = Config { sample_rate: 0, ..base };
        assert!(matches!(config.validate(), Err(ConfigError::SampleRate)));

        for frame_size in [0, 1, MAX_FRAME_SIZE + 1] {
            let config = Config { frame_size, ..base };
            assert!(matches!(config.validate(), Err(ConfigError::FrameSize(_))));
        }

        for threshold in [0.0, 1.0, -0.1, f64::NAN] {
            let config = Config { threshold, ..base };
            assert!(matches!(config.validate(), Err(ConfigError::Threshold(_))));
        }

        for reference_pitch_hz in [0.0, -440.0, f64::INFINITY, f64::NAN] {
            let config = Config { reference_pitch_hz, ..base };
            assert!(matches!(config.validate(), Err(ConfigError::ReferencePitch(_))));
        }

        let config = base.with_frequency_range(500.0, 100.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FrequencyRange { .. })
        ));
    }

    #[test]
    fn json_fills_in_defaults() {
        let config = Config::from_json(r#"{ "sample_rate": 48000, "threshold": 0.15 }"#).unwrap();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.threshold, 0.15);
        assert_eq!(config.frame_size, DEFAULT_FRAME_SIZE);
        assert_eq!(config.max_frequency, DEFAULT_MAX_FREQUENCY);
    }

    #[test]
    fn json_is_validated() {
        assert!(matches!(
            Config::from_json(r#"{ "frame_size": 1 }"#),
            Err(ConfigError::FrameSize(1))
        ));
        assert!(matches!(
            Config::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detector.json");
        let config = Config::new(48000, 4096, 0.2, 442.0);
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
        assert!(matches!(
            Config::load(&dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
