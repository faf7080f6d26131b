//! # Pitch Engine
//! *pitch_engine* estimates the fundamental frequency of a stream of audio
//! frames in real time and reports it as a musical pitch: frequency,
//! confidence, nearest note and the offset from that note in cents. It is
//! meant to sit behind a tuner or pitch-feedback UI that feeds one block of
//! samples at a time.
//!
//! # Detectors
//! The estimator is the [YIN algorithm][detector::yin]. A [YinDetector] owns all
//! of its working memory, sized once at construction, so that
//! [`process`][PitchDetector::process] never allocates.
//!
//!   * [YinDetector] analyses one frame per call.
//!   * [StreamingDetector] accepts blocks of any size and analyses overlapping frames.
//!   * [Registry] hands out generation-checked [Handle]s for hosts that cannot
//!     own a detector directly.
//!
//! # Examples
//! ```
//! use pitch_engine::{Config, PitchDetector, YinDetector};
//!
//! fn main() {
//!     const SAMPLE_RATE: u32 = 44100;
//!     const SIZE: usize = 2048;
//!
//!     // Signal coming from some source (microphone, generated, etc...)
//!     let dt = 1.0 / SAMPLE_RATE as f64;
//!     let freq = 440.0;
//!     let signal: Vec<f64> = (0..SIZE)
//!         .map(|x| (2.0 * std::f64::consts::PI * x as f64 * dt * freq).sin())
//!         .collect();
//!
//!     let config = Config::new(SAMPLE_RATE, SIZE, 0.10, 440.0);
//!     let mut detector = YinDetector::new(config).unwrap();
//!
//!     let pitch = detector.process(&signal);
//!     assert!(pitch.pitched);
//!
//!     println!(
//!         "Frequency: {}, Note: {:?}, Cents: {}",
//!         pitch.frequency,
//!         pitch.note_name(),
//!         pitch.cents_offset
//!     );
//! }
//! ```

pub use config::{Config, ConfigError};
pub use detector::result::DetectionResult;
pub use detector::yin::YinDetector;
pub use detector::PitchDetector;
pub use fft::{init, FftBackend};
pub use registry::{EngineError, Handle, Registry};
pub use stream::StreamingDetector;

pub mod config;
pub mod detector;
pub mod fft;
pub mod float;
pub mod note;
pub mod registry;
pub mod stream;
pub mod utils;
