use crate::float::{constant, from_usize, Float};
use crate::utils::buffer::{copy_real_to_complex, modulus_squared, square_sum, ScratchBuffers};

/// Lags shorter than this many samples at a given sample rate correspond to
/// frequencies above the audible range and are never searched.
pub const SEARCH_CEILING_HZ: f64 = 20_000.0;

/// The smallest lag worth examining at `sample_rate`: `ceil(sample_rate / 20 kHz)`,
/// and at least 1.
pub fn min_lag(sample_rate: u32) -> usize {
    let lag = (f64::from(sample_rate) / SEARCH_CEILING_HZ).ceil() as usize;
    lag.max(1)
}

/// Compute the autocorrelation of `signal` for every lag in `0..result.len()`
/// and put it in `result`. `buffers.spectrum` must be at least
/// `signal.len() + result.len()` long so that the circular correlation
/// computed by the FFT does not wrap onto the lags we keep.
pub fn autocorrelation<T>(signal: &[T], buffers: &mut ScratchBuffers<T>, result: &mut [T])
where
    T: Float,
{
    assert!(
        buffers.spectrum.len() >= signal.len() + result.len(),
        "The FFT buffer is too short for a linear autocorrelation"
    );

    let spectrum = &mut buffers.spectrum[..];
    let scratch = &mut buffers.fft_scratch[..];

    copy_real_to_complex(signal, spectrum);
    buffers.forward.process_with_scratch(spectrum, scratch);
    modulus_squared(spectrum);
    buffers.inverse.process_with_scratch(spectrum, scratch);

    // rustfft doesn't normalize, so a forward and an inverse transform scale
    // the result by the transform length.
    let normalization_const = T::one() / from_usize::<T>(spectrum.len());
    result
        .iter_mut()
        .zip(spectrum.iter())
        .for_each(|(r, c)| *r = c.re * normalization_const);
}

/// Compute the difference function, _d(t)_, of `signal` into `buffers.difference`.
/// For a signal _x=(x_0,...,x_{N-1})_ this is
///
///  > d(t) = sum_{j=0}^{N-t-1} (x_j - x_{j+t})^2
///
/// for _t_ in `0..N/2`. It is computed with an FFT as
///
///  > d(t) = pow_0^{N-t} + pow_t^N - 2*r(t)
///
/// where pow_a^b is the sum of the squares of `signal` on `a..b` and _r_ is the
/// autocorrelation.
pub fn difference_function<T>(signal: &[T], buffers: &mut ScratchBuffers<T>)
where
    T: Float,
{
    assert_eq!(signal.len(), buffers.frame_size);

    let two = constant::<T>(2.);
    let n = signal.len();

    let mut difference = std::mem::take(&mut buffers.difference);
    autocorrelation(signal, buffers, &mut difference);

    let power = square_sum(signal);
    let mut head_power = power;
    let mut tail_power = power;

    difference.iter_mut().enumerate().for_each(|(t, d)| {
        // Rounding in the FFT can push a perfect match slightly below zero.
        *d = (head_power + tail_power - two * *d).max(T::zero());
        // Step both windows forward by one lag by dropping their boundary terms.
        head_power = head_power - signal[n - t - 1] * signal[n - t - 1];
        tail_power = tail_power - signal[t] * signal[t];
    });

    buffers.difference = difference;
}

/// Direct O(N^2) evaluation of the difference function, used to check
/// [difference_function].
pub fn naive_difference_function<T: Float>(signal: &[T], result: &mut [T]) {
    let n = signal.len();
    result.iter_mut().enumerate().for_each(|(t, d)| {
        *d = signal[..n - t]
            .iter()
            .zip(signal[t..].iter())
            .map(|(&a, &b)| (a - b) * (a - b))
            .sum();
    });
}

/// Calculate the "cumulative mean normalized difference function" as
/// specified in the YIN paper. If _d(t)_ is the difference function,
/// _d'(0) = 1_ and for _t > 0_
///
///  > d'(t) = d(t) / [ (1/t) * sum_{j=1}^t d(j) ]
///
/// A running sum of zero (silence) normalizes to 1, i.e. "not periodic".
pub fn cumulative_mean_normalize<T: Float>(difference: &[T], normalized: &mut [T]) {
    assert_eq!(difference.len(), normalized.len());
    if normalized.is_empty() {
        return;
    }

    let mut sum = T::zero();
    normalized[0] = T::one();
    normalized
        .iter_mut()
        .zip(difference.iter())
        .enumerate()
        .skip(1)
        .for_each(|(t, (n, &d))| {
            sum = sum + d;
            *n = if sum > T::zero() {
                d * from_usize::<T>(t) / sum
            } else {
                T::one()
            };
        });
}
