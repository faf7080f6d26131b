//! Streaming front end for audio callbacks.
//!
//! Audio callbacks rarely deliver exactly one analysis frame at a time. A
//! [StreamingDetector] buffers whatever it is given in a ring buffer and runs
//! the detector over the most recent `frame_size` samples each time `hop_size`
//! new samples have arrived, which with the default hop of half a frame gives
//! 50% overlapping frames. Between analyses the previous result is repeated.

use crate::config::{Config, ConfigError};
use crate::detector::result::DetectionResult;
use crate::detector::yin::YinDetector;
use crate::detector::PitchDetector;
use crate::float::Float;
use crate::utils::buffer::new_real_buffer;

pub struct StreamingDetector<T>
where
    T: Float,
{
    detector: YinDetector<T>,
    frame_size: usize,
    hop_size: usize,
    /// Twice the frame size, so a full frame is always available behind the
    /// write position.
    ring: Vec<T>,
    frame: Vec<T>,
    write_pos: usize,
    samples_ready: usize,
    samples_since_analysis: usize,
    last_result: DetectionResult<T>,
}

impl<T> StreamingDetector<T>
where
    T: Float,
{
    /// A streaming detector that analyses every half frame.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::with_hop_size(config, config.frame_size / 2)
    }

    pub fn with_hop_size(config: Config, hop_size: usize) -> Result<Self, ConfigError> {
        let detector = YinDetector::new(config)?;
        let frame_size = config.frame_size;
        if hop_size == 0 || hop_size > frame_size {
            return Err(ConfigError::HopSize {
                hop_size,
                frame_size,
            });
        }

        Ok(StreamingDetector {
            detector,
            frame_size,
            hop_size,
            ring: new_real_buffer(2 * frame_size),
            frame: new_real_buffer(frame_size),
            write_pos: 0,
            samples_ready: 0,
            samples_since_analysis: 0,
            last_result: DetectionResult::unpitched(),
        })
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Feed a block of samples of any length. Returns the result of the
    /// newest analysis, which is the unpitched result until a full frame has
    /// been buffered.
    pub fn push(&mut self, samples: &[T]) -> DetectionResult<T> {
        let capacity = self.ring.len();
        for &sample in samples {
            self.ring[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % capacity;
        }
        self.samples_ready = (self.samples_ready + samples.len()).min(self.frame_size);
        self.samples_since_analysis = self.samples_since_analysis.saturating_add(samples.len());

        if self.samples_ready < self.frame_size || self.samples_since_analysis < self.hop_size {
            return self.last_result;
        }
        self.samples_since_analysis = 0;

        // Unroll the most recent frame out of the ring.
        let start = (self.write_pos + capacity - self.frame_size) % capacity;
        let (head, tail) = self.ring.split_at(start);
        let first = tail.len().min(self.frame_size);
        self.frame[..first].copy_from_slice(&tail[..first]);
        self.frame[first..].copy_from_slice(&head[..self.frame_size - first]);

        self.last_result = self.detector.process(&self.frame);
        self.last_result
    }

    pub fn last_result(&self) -> DetectionResult<T> {
        self.last_result
    }

    /// Forget all buffered audio and the last result, e.g. on stream restart.
    pub fn reset(&mut self) {
        self.ring.iter_mut().for_each(|x| *x = T::zero());
        self.frame.iter_mut().for_each(|x| *x = T::zero());
        self.write_pos = 0;
        self.samples_ready = 0;
        self.samples_since_analysis = 0;
        self.last_result = DetectionResult::unpitched();
        self.detector.reset();
    }

    pub fn set_reference_pitch(&mut self, hz: T) -> bool {
        self.detector.set_reference_pitch(hz)
    }

    pub fn detector(&self) -> &YinDetector<T> {
        &self.detector
    }
}
