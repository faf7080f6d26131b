use crate::detector::result::DetectionResult;
use crate::float::Float;

pub mod internals;
pub mod result;
pub mod voicing;
pub mod yin;

/// A stateful, frame-by-frame pitch estimator.
///
/// Implementations own all of their working memory; none of these calls
/// allocate. Calls must be serialized by the caller, which `&mut self`
/// already enforces.
pub trait PitchDetector<T>
where
    T: Float,
{
    /// Analyse one frame of samples. Empty input yields
    /// [DetectionResult::unpitched].
    fn process(&mut self, signal: &[T]) -> DetectionResult<T>;

    /// Clear all working memory. The configuration is kept.
    fn reset(&mut self);

    /// Change the frequency assigned to A4. Returns `false`, leaving the
    /// detector untouched, unless `hz` is finite and positive.
    fn set_reference_pitch(&mut self, hz: T) -> bool;

    fn reference_pitch(&self) -> T;
}
