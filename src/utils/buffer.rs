use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;
use rustfft::Fft;

use crate::fft::FftBackend;
use crate::float::Float;

pub fn new_real_buffer<T: Float>(size: usize) -> Vec<T> {
    vec![T::zero(); size]
}

pub fn new_complex_buffer<T: Float>(size: usize) -> Vec<Complex<T>> {
    vec![Complex::zero(); size]
}

/// Copy `input` into the real part of `output` and zero everything else,
/// including the tail of `output` past `input.len()`.
pub fn copy_real_to_complex<T: Float>(input: &[T], output: &mut [Complex<T>]) {
    assert!(input.len() <= output.len());
    input.iter().zip(output.iter_mut()).for_each(|(i, o)| {
        o.re = *i;
        o.im = T::zero();
    });
    output[input.len()..]
        .iter_mut()
        .for_each(|o| *o = Complex::zero())
}

/// Computes |x|^2 for each complex value x in `arr`. This function
/// modifies `arr` in place and leaves the complex component zero.
pub fn modulus_squared<T: Float>(arr: &mut [Complex<T>]) {
    for s in arr {
        s.re = s.re * s.re + s.im * s.im;
        s.im = T::zero();
    }
}

/// Compute the sum of the square of each element of `arr`.
pub fn square_sum<T: Float>(arr: &[T]) -> T {
    arr.iter().map(|&s| s * s).sum::<T>()
}

/// Copy the most recent `frame.len()` samples of `input` into `frame`,
/// zero-padding the end when `input` is shorter.
pub fn fill_frame<T: Float>(input: &[T], frame: &mut [T]) {
    let start = input.len().saturating_sub(frame.len());
    let input = &input[start..];
    frame[..input.len()].copy_from_slice(input);
    frame[input.len()..].iter_mut().for_each(|x| *x = T::zero());
}

/// All working memory a detector needs, allocated once up front so that
/// analysing a frame never touches the allocator.
///
/// The FFT buffer is `frame_size + frame_size / 2` long: that is enough
/// zero padding for the circular correlation computed by the FFT to equal
/// the linear one on every lag below `frame_size / 2`.
pub struct ScratchBuffers<T>
where
    T: Float,
{
    pub frame_size: usize,
    /// Raw difference function, `d(t)`.
    pub difference: Vec<T>,
    /// Cumulative mean normalized difference function, `d'(t)`.
    pub normalized: Vec<T>,
    /// Input samples when the caller's block is not exactly one frame long.
    pub frame: Vec<T>,
    pub spectrum: Vec<Complex<T>>,
    pub fft_scratch: Vec<Complex<T>>,
    pub forward: Arc<dyn Fft<T>>,
    pub inverse: Arc<dyn Fft<T>>,
}

impl<T: Float> ScratchBuffers<T> {
    pub fn new(frame_size: usize, backend: FftBackend) -> Self {
        let lags = frame_size / 2;
        let fft_size = frame_size + lags;
        let (forward, inverse) = backend.plan(fft_size);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        ScratchBuffers {
            frame_size,
            difference: new_real_buffer(lags),
            normalized: new_real_buffer(lags),
            frame: new_real_buffer(frame_size),
            spectrum: new_complex_buffer(fft_size),
            fft_scratch: new_complex_buffer(scratch_len),
            forward,
            inverse,
        }
    }

    /// Number of lags covered by the difference function.
    pub fn lags(&self) -> usize {
        self.difference.len()
    }

    /// Zero-fill every buffer. Lengths and FFT plans are kept.
    pub fn clear(&mut self) {
        self.difference.iter_mut().for_each(|x| *x = T::zero());
        self.normalized.iter_mut().for_each(|x| *x = T::zero());
        self.frame.iter_mut().for_each(|x| *x = T::zero());
        self.spectrum.iter_mut().for_each(|x| *x = Complex::zero());
        self.fft_scratch.iter_mut().for_each(|x| *x = Complex::zero());
    }
}
