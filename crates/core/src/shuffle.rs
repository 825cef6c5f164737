//! Uniform random permutations for establishing deck order.

use rand::Rng;

/// Return a shuffled copy of `items` using the thread-local RNG.
///
/// The input is left untouched; empty and single-element inputs come back as-is.
#[must_use]
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    shuffle_with(items, &mut rand::rng())
}

/// Fisher–Yates over a copy of `items`, walking from the last index down and
/// swapping each slot with a uniformly chosen index in `[0, i]`.
#[must_use]
pub fn shuffle_with<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.random_range(0..=i);
        out.swap(i, j);
    }
    out
}
