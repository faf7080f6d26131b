//! The YIN pitch detection algorithm is based on the algorithm from the paper
//! *[YIN, a fundamental frequency estimator for speech and music](http://recherche.ircam.fr/equipes/pcm/cheveign/ps/2002_JASA_YIN_proof.pdf)*.
//!
//! Let $S=(s_0,s_1,\ldots,s_{N-1})$ be a discrete signal. The *difference function* at lag $t$
//! is defined by
//! $$ d(t) = \sum_{i=0}^{N-t-1} (s_i-s_{i+t})^2. $$
//! This function is close to zero when the signal "lines up" with itself. However, *close* is a relative term,
//! and the value of $d(t)$ depends on volume, which should not affect the pitch of the signal. For this
//! reason, the signal is normalized. The YIN algorithm computes the *cumulative mean normalized difference function*,
//! $$ d\'(t) = \begin{cases}1&\text{if }t=0\\\\ d(t) / \left[ \tfrac{1}{t}\sum_{i=1}^t d(i) \right] & \text{otherwise}\end{cases}. $$
//! Then, it searches for the first local minimum of $d\'(t)$ below a given threshold.
//!
//! ## Implementation
//! Rather than compute the difference function directly,
//! an [FFT](https://en.wikipedia.org/wiki/Fast_Fourier_transform) is used, providing a dramatic speed increase for large buffers.
//!
//! After a candidate lag is found, quadratic interpolation is applied to further refine the estimate.
//! The frequency is then mapped to the nearest note relative to the reference pitch.
//!
//! All buffers and FFT plans are created by [YinDetector::new]; [PitchDetector::process]
//! does not allocate.

use crate::config::{is_valid_reference_pitch, Config, ConfigError};
use crate::detector::internals::{cumulative_mean_normalize, difference_function, min_lag};
use crate::detector::result::DetectionResult;
use crate::detector::voicing::VoicingClassifier;
use crate::detector::PitchDetector;
use crate::fft;
use crate::float::{constant, Float};
use crate::note::map_frequency;
use crate::utils::buffer::{fill_frame, square_sum, ScratchBuffers};
use crate::utils::peak::{find_valley, refine_lag};

pub struct YinDetector<T>
where
    T: Float,
{
    config: Config,
    threshold: T,
    reference_pitch: T,
    min_lag: usize,
    voicing: VoicingClassifier<T>,
    buffers: ScratchBuffers<T>,
}

impl<T> YinDetector<T>
where
    T: Float,
{
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        if let Err(e) = config.validate() {
            tracing::debug!(error = %e, "Rejected detector config");
            return Err(e);
        }

        let backend = fft::init();
        let detector = YinDetector {
            threshold: constant(config.threshold),
            reference_pitch: constant(config.reference_pitch_hz),
            min_lag: min_lag(config.sample_rate),
            voicing: VoicingClassifier::new(
                config.sample_rate,
                config.min_frequency,
                config.max_frequency,
            ),
            buffers: ScratchBuffers::new(config.frame_size, backend),
            config,
        };

        tracing::debug!(
            sample_rate = config.sample_rate,
            frame_size = config.frame_size,
            threshold = config.threshold,
            reference_pitch_hz = config.reference_pitch_hz,
            backend = %backend,
            "Created YIN detector"
        );
        Ok(detector)
    }

    /// The configuration this detector was created with, carrying the
    /// current reference pitch.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn frame_size(&self) -> usize {
        self.config.frame_size
    }

    /// The normalized difference function of the last analysed frame.
    pub fn normalized_difference(&self) -> &[T] {
        &self.buffers.normalized
    }

    fn detect(&mut self, signal: &[T]) -> DetectionResult<T> {
        let buffers = &mut self.buffers;

        // STEP 2: Calculate the difference function, d_t.
        difference_function(signal, buffers);

        // STEP 3: Calculate the cumulative mean normalized difference function, d_t'.
        cumulative_mean_normalize(&buffers.difference, &mut buffers.normalized);
        let normalized = &buffers.normalized[..];

        // STEP 4: The absolute threshold. We want the first dip below `threshold`.
        let valley = match find_valley(normalized, self.min_lag, self.threshold) {
            Some(valley) => valley,
            None => {
                tracing::trace!(
                    lags = normalized.len(),
                    min_lag = self.min_lag,
                    "Frame too short for the minimum lag"
                );
                return DetectionResult::unpitched();
            }
        };

        // STEP 5: Quadratic interpolation to fine-tune the lag.
        let refined_lag = refine_lag(normalized, valley.tau);

        match self
            .voicing
            .classify(valley, refined_lag, normalized[valley.tau])
        {
            Some(voiced) => {
                let note = map_frequency(voiced.frequency, self.reference_pitch);
                DetectionResult {
                    pitched: true,
                    frequency: voiced.frequency,
                    probability: voiced.probability,
                    midi_note: note.midi_note,
                    cents_offset: note.cents_offset,
                }
            }
            None => DetectionResult::unpitched(),
        }
    }
}

/// Pitch detection based on the YIN algorithm. See <http://recherche.ircam.fr/equipes/pcm/cheveign/ps/2002_JASA_YIN_proof.pdf>
impl<T> PitchDetector<T> for YinDetector<T>
where
    T: Float,
{
    fn process(&mut self, signal: &[T]) -> DetectionResult<T> {
        if signal.is_empty() {
            tracing::trace!("Empty input");
            return DetectionResult::unpitched();
        }

        if signal.len() == self.config.frame_size {
            if square_sum(signal) == T::zero() {
                tracing::trace!("Silent frame");
                return DetectionResult::unpitched();
            }
            return self.detect(signal);
        }

        // Blocks of the wrong length are padded or trimmed into the frame
        // buffer. It is moved out for the duration of the call so the other
        // scratch buffers can be borrowed alongside it.
        let mut frame = std::mem::take(&mut self.buffers.frame);
        fill_frame(signal, &mut frame);
        let result = if square_sum(&frame) == T::zero() {
            tracing::trace!("Silent frame");
            DetectionResult::unpitched()
        } else {
            self.detect(&frame)
        };
        self.buffers.frame = frame;
        result
    }

    fn reset(&mut self) {
        self.buffers.clear();
        tracing::debug!("Reset YIN detector");
    }

    fn set_reference_pitch(&mut self, hz: T) -> bool {
        let hz_f64 = hz.to_f64().unwrap_or(f64::NAN);
        if !is_valid_reference_pitch(hz_f64) {
            tracing::warn!(hz = hz_f64, "Rejected reference pitch");
            return false;
        }
        self.reference_pitch = hz;
        self.config.reference_pitch_hz = hz_f64;
        tracing::debug!(hz = hz_f64, "Reference pitch changed");
        true
    }

    fn reference_pitch(&self) -> T {
        self.reference_pitch
    }
}
