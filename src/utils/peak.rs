use std::cmp::Ordering;

use crate::float::{constant, from_usize, Float};

struct Point<T: Float> {
    x: T,
    y: T,
}

/// A candidate period picked out of the normalized difference function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Valley {
    /// Integer lag of the chosen minimum.
    pub tau: usize,
    /// Whether the lag passed the threshold test. A valley found by the
    /// global-minimum fallback is only accepted under the always-accept
    /// policy (`threshold >= 1`).
    pub accepted: bool,
}

/// Find the best period candidate in the normalized difference function
/// `normalized`, ignoring lags below `min_lag`.
///
/// The first lag whose value drops below `threshold` starts a dip; the dip is
/// then followed down to its local minimum. Taking the *first* dip rather than
/// the deepest one is what keeps the search on the fundamental instead of one
/// of its multiples. If nothing falls below `threshold`, the global minimum of
/// the searched range is returned instead.
///
/// Returns `None` when there is no lag at or above `min_lag`.
pub fn find_valley<T: Float>(normalized: &[T], min_lag: usize, threshold: T) -> Option<Valley> {
    if min_lag >= normalized.len() {
        return None;
    }

    let first_dip = normalized
        .iter()
        .enumerate()
        .skip(min_lag)
        .find(|&(_, &val)| val < threshold)
        .map(|(tau, _)| tau);

    if let Some(mut tau) = first_dip {
        while tau + 1 < normalized.len() && normalized[tau + 1] < normalized[tau] {
            tau += 1;
        }
        return Some(Valley {
            tau,
            accepted: true,
        });
    }

    normalized
        .iter()
        .enumerate()
        .skip(min_lag)
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .map(|(tau, _)| Valley {
            tau,
            accepted: threshold >= T::one(),
        })
}

/// Refine the integer lag `tau` to sub-sample precision by fitting a parabola
/// through its value and those of its two neighbours in `data` and returning
/// the location of the vertex. Lags on the edge of `data`, and neighbourhoods
/// flat enough that the parabola degenerates, are returned unchanged.
pub fn refine_lag<T: Float>(data: &[T], tau: usize) -> T {
    let unrefined = from_usize::<T>(tau);
    if tau == 0 || tau + 1 >= data.len() {
        return unrefined;
    }

    quadratic_interpolation(
        Point {
            x: from_usize(tau - 1),
            y: data[tau - 1],
        },
        Point {
            x: unrefined,
            y: data[tau],
        },
        Point {
            x: from_usize(tau + 1),
            y: data[tau + 1],
        },
    )
    .map(|vertex| vertex.x)
    .unwrap_or(unrefined)
}

/// Vertex of the parabola through three equally spaced points. `None` when
/// the points are (numerically) collinear.
fn quadratic_interpolation<T: Float>(
    left: Point<T>,
    center: Point<T>,
    right: Point<T>,
) -> Option<Point<T>> {
    let denominator = constant::<T>(2.0) * center.y - left.y - right.y;
    if denominator.abs() < T::epsilon() {
        return None;
    }
    let shift = constant::<T>(0.5) * (right.y - left.y) / denominator;
    let x = center.x + shift;
    let y = center.y + constant::<T>(0.25) * (right.y - left.y) * shift;
    Some(Point { x, y })
}
