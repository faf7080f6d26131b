//! The voiced/unvoiced decision.

use crate::float::{constant, Float};
use crate::utils::peak::Valley;

/// A frame judged to carry a pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voiced<T: Float> {
    pub frequency: T,
    pub probability: T,
}

/// Turns a refined lag into a frequency and decides whether it counts as a
/// pitch: the valley must have passed the threshold search and the frequency
/// must fall inside the configured range.
#[derive(Debug, Clone, Copy)]
pub struct VoicingClassifier<T: Float> {
    pub sample_rate: T,
    pub min_frequency: T,
    pub max_frequency: T,
}

impl<T: Float> VoicingClassifier<T> {
    pub fn new(sample_rate: u32, min_frequency: f64, max_frequency: f64) -> Self {
        VoicingClassifier {
            sample_rate: constant(f64::from(sample_rate)),
            min_frequency: constant(min_frequency),
            max_frequency: constant(max_frequency),
        }
    }

    /// `depth` is the normalized difference at the integer lag `valley.tau`,
    /// before interpolation. Lower is better; the probability is `1 - depth`
    /// clamped to `[0, 1]`.
    pub fn classify(&self, valley: Valley, refined_lag: T, depth: T) -> Option<Voiced<T>> {
        if !valley.accepted || !(refined_lag > T::zero()) {
            return None;
        }

        let frequency = self.sample_rate / refined_lag;
        if frequency < self.min_frequency || frequency > self.max_frequency {
            return None;
        }

        Some(Voiced {
            frequency,
            probability: probability(depth),
        })
    }
}

/// Confidence that a valley of the given depth marks a real period.
pub fn probability<T: Float>(depth: T) -> T {
    (T::one() - depth).max(T::zero()).min(T::one())
}
