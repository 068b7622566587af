//! Deterministic enumeration of orientations (step vectors) for a board of
//! a given dimensionality.

use std::cell::RefCell;
use std::collections::HashMap;

use itertools::Itertools;

use crate::coord::Orientation;

thread_local! {
    static CACHE: RefCell<HashMap<usize, Vec<Orientation>>> = RefCell::new(HashMap::new());
}

/// Every non-zero vector in `{-1, 0, 1}^dims`, in ascending lexicographic
/// order (most-negative-leading first). Memoized per dimension count.
///
/// For 2-D boards this yields the familiar 8 compass directions, with
/// `[-1, -1]` (toward the top-left) visited first.
pub fn orientations(dims: usize) -> Vec<Orientation> {
    CACHE.with(|cache| {
        cache
            .borrow_mut()
            .entry(dims)
            .or_insert_with(|| enumerate(dims))
            .clone()
    })
}

fn enumerate(dims: usize) -> Vec<Orientation> {
    std::iter::repeat([-1i64, 0, 1])
        .take(dims)
        .multi_cartesian_product()
        .filter(|axes| axes.iter().any(|&v| v != 0))
        .map(Orientation)
        .collect()
}
