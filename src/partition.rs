use std::ops::Range;

use tracing::debug;

/// Get `workers + 1` points at which we split the input, each one on a line start.
///
/// The points start evenly spaced at `i * len / workers`. Those aren't aligned to line
/// endings, so every inner point walks forward until the byte before it is a `\n` (or it
/// hits the end). The first and last points are always `0` and `len`.
pub fn split_points(bytes: &[u8], workers: usize) -> Vec<usize> {
    let len = bytes.len();
    let workers = workers.max(1);
    let mut points: Vec<usize> = (0..=workers)
        .map(|i| (i as u128 * len as u128 / workers as u128) as usize)
        .collect();

    // an inner point can only ever land on or after the one before it, so the list stays
    // sorted and consecutive points may end up equal on tiny inputs
    for point in points[1..workers].iter_mut() {
        while *point > 0 && *point < len && bytes[*point - 1] != b'\n' {
            *point += 1;
        }
    }
    debug!(?points, "final split points");
    points
}

/// Contiguous record-aligned chunks covering `0..bytes.len()`, one per worker. Some may be
/// empty when the input has fewer lines than workers.
pub fn partition(bytes: &[u8], workers: usize) -> Vec<Range<usize>> {
    split_points(bytes, workers)
        .windows(2)
        .map(|w| w[0]..w[1])
        .collect()
}
