//! Mapping between frequencies and equal-tempered notes.
//!
//! Notes are numbered as in [MIDI](https://en.wikipedia.org/wiki/MIDI): note 69 is
//! concert A (A4), and each semitone adds 1. The frequency of note 69 is the
//! *reference pitch*, 440 Hz unless configured otherwise.

use once_cell::sync::Lazy;

use crate::float::{constant, Float};

/// MIDI number of the note tuned to the reference pitch.
pub const REFERENCE_MIDI_NOTE: i32 = 69;

const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Names of MIDI notes 0 ("C-1") through 127 ("G9").
static NOTE_NAMES: Lazy<Vec<String>> = Lazy::new(|| {
    (0..128)
        .map(|midi: usize| {
            let octave = (midi / 12) as i32 - 1;
            format!("{}{}", PITCH_CLASSES[midi % 12], octave)
        })
        .collect()
});

pub(crate) fn init_note_names() {
    Lazy::force(&NOTE_NAMES);
}

/// Nearest note and deviation from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteMapping<T: Float> {
    pub midi_note: i32,
    /// Signed distance from `midi_note` in cents, within `[-50, 50]`.
    pub cents_offset: T,
}

/// Fractional note number of `frequency`: `69 + 12 * log2(frequency / reference)`.
pub fn note_number<T: Float>(frequency: T, reference_pitch: T) -> T {
    constant::<T>(12.0) * (frequency / reference_pitch).log2() + constant(f64::from(REFERENCE_MIDI_NOTE))
}

/// Map a positive frequency to the nearest note relative to `reference_pitch`.
pub fn map_frequency<T: Float>(frequency: T, reference_pitch: T) -> NoteMapping<T> {
    let number = note_number(frequency, reference_pitch);
    let nearest = number.round();
    NoteMapping {
        midi_note: nearest.to_i32().unwrap_or(0),
        cents_offset: constant::<T>(100.0) * (number - nearest),
    }
}

/// Frequency of `midi_note` when note 69 sounds at `reference_pitch`.
pub fn midi_to_frequency<T: Float>(midi_note: i32, reference_pitch: T) -> T {
    let semitones = constant::<T>(f64::from(midi_note - REFERENCE_MIDI_NOTE));
    reference_pitch * (semitones / constant(12.0)).exp2()
}

/// Scientific pitch name of a MIDI note, e.g. "A4" or "C#3". `None` outside `0..=127`.
pub fn note_name(midi_note: i32) -> Option<&'static str> {
    let index = usize::try_from(midi_note).ok()?;
    NOTE_NAMES.get(index).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn concert_a_is_69() {
        let mapping = map_frequency(440.0, 440.0);
        assert_eq!(mapping.midi_note, 69);
        assert_abs_diff_eq!(mapping.cents_offset, 0.0);
    }

    #[test]
    fn middle_c() {
        let mapping = map_frequency(261.6256f64, 440.0);
        assert_eq!(mapping.midi_note, 60);
        assert_abs_diff_eq!(mapping.cents_offset, 0.0, epsilon = 0.01);
    }

    #[test]
    fn offset_relative_to_reference() {
        // 440 Hz against A4 = 432 Hz is sharp of A4 by 12 * log2(440 / 432) semitones.
        let expected = 1200.0 * (440.0f64 / 432.0).log2();
        let mapping = map_frequency(440.0, 432.0);
        assert_eq!(mapping.midi_note, 69);
        assert_abs_diff_eq!(mapping.cents_offset, expected, epsilon = 1e-9);
        assert!(mapping.cents_offset > 31.0 && mapping.cents_offset < 32.0);
    }

    #[test]
    fn cents_stay_within_half_a_semitone() {
        let mut frequency = 30.0f32;
        while frequency < 5000.0 {
            let mapping = map_frequency(frequency, 440.0);
            assert!(mapping.cents_offset >= -50.0 && mapping.cents_offset <= 50.0);
            frequency *= 1.0137;
        }
    }

    #[test]
    fn midi_to_frequency_inverts_mapping() {
        for midi in [21, 45, 60, 69, 88, 108] {
            let frequency = midi_to_frequency(midi, 442.0f64);
            let mapping = map_frequency(frequency, 442.0);
            assert_eq!(mapping.midi_note, midi);
            assert_abs_diff_eq!(mapping.cents_offset, 0.0, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(midi_to_frequency(81, 440.0f64), 880.0, epsilon = 1e-9);
    }

    #[test]
    fn names() {
        assert_eq!(note_name(69), Some("A4"));
        assert_eq!(note_name(60), Some("C4"));
        assert_eq!(note_name(61), Some("C#4"));
        assert_eq!(note_name(0), Some("C-1"));
        assert_eq!(note_name(127), Some("G9"));
        assert_eq!(note_name(128), None);
        assert_eq!(note_name(-1), None);
    }
}
