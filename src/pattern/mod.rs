//! Pattern compilation, orientation enumeration, and match-finding over an
//! N-dimensional board.

mod compile;
mod matcher;
mod orientation;

pub use compile::{CellPredicate, Pattern, Polarity};
pub use matcher::{find_matches, Match};
pub use orientation::orientations;
