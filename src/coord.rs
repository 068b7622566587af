//! N-dimensional coordinates and orientation step-vectors.

use std::ops::{Add, Mul};

/// A player is identified by a small non-negative integer; 0 is the first
/// player to move.
pub type PlayerId = u32;

/// A point in an N-dimensional board. Axis 0 is the outermost axis (vertical
/// for a 2-D board).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord(pub Vec<i64>);

impl Coord {
    pub fn new(axes: Vec<i64>) -> Self {
        Coord(axes)
    }

    pub fn dims(&self) -> usize {
        self.0.len()
    }

    pub fn axis(&self, i: usize) -> i64 {
        self.0[i]
    }

    /// Coord cast down to unsigned axes, for indexing a dense board. Callers
    /// must check `in_bounds` first; this panics on negative axes.
    pub fn as_unsigned(&self) -> Vec<usize> {
        self.0
            .iter()
            .map(|&v| usize::try_from(v).expect("coordinate axis is negative"))
            .collect()
    }
}

impl Add<&Orientation> for &Coord {
    type Output = Coord;

    fn add(self, rhs: &Orientation) -> Coord {
        Coord(
            self.0
                .iter()
                .zip(rhs.0.iter())
                .map(|(a, b)| a + b)
                .collect(),
        )
    }
}

/// A non-zero step vector in `{-1, 0, 1}^N`, used to walk the board in a
/// straight line when enumerating pattern matches.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Orientation(pub Vec<i64>);

impl Orientation {
    pub fn dims(&self) -> usize {
        self.0.len()
    }

    /// The orientation pointing the opposite way along the same line.
    pub fn reversed(&self) -> Orientation {
        Orientation(self.0.iter().map(|v| -v).collect())
    }
}

impl Mul<i64> for &Orientation {
    type Output = Coord;

    fn mul(self, rhs: i64) -> Coord {
        Coord(self.0.iter().map(|v| v * rhs).collect())
    }
}

/// Computes `anchor + (k - i) * step` for the k-th cell of a pattern of
/// length `len`, given that the move coordinate sits at pattern index `i`.
pub fn step_position(mv: &Coord, step: &Orientation, i: usize, k: usize) -> Coord {
    let delta = k as i64 - i as i64;
    let offset = step * delta;
    mv + &offset
}
