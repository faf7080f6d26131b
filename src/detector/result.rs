use serde::Serialize;

use crate::float::Float;
use crate::note;

/// Outcome of analysing one frame.
///
/// When `pitched` is false every other field holds its zero value, so there
/// is exactly one "no pitch" shape: see [DetectionResult::unpitched].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectionResult<T>
where
    T: Float,
{
    pub pitched: bool,
    /// Estimated fundamental frequency in Hz.
    pub frequency: T,
    /// Confidence in `[0, 1]`, derived from how deep the chosen valley is.
    pub probability: T,
    /// Nearest MIDI note relative to the reference pitch.
    pub midi_note: i32,
    /// Distance from `midi_note` in cents, within `[-50, 50]`.
    pub cents_offset: T,
}

impl<T: Float> DetectionResult<T> {
    pub fn unpitched() -> Self {
        DetectionResult {
            pitched: false,
            frequency: T::zero(),
            probability: T::zero(),
            midi_note: 0,
            cents_offset: T::zero(),
        }
    }

    /// Name of the detected note ("A4", "C#3", ...), if a pitch was found and
    /// it lies within the MIDI range.
    pub fn note_name(&self) -> Option<&'static str> {
        if self.pitched {
            note::note_name(self.midi_note)
        } else {
            None
        }
    }
}

impl<T: Float> Default for DetectionResult<T> {
    fn default() -> Self {
        Self::unpitched()
    }
}
