//! Typed error surfaces for the two phases of the engine's lifecycle:
//! loading a set of datapacks, and applying a move to a loaded game.

use thiserror::Error;

use crate::coord::Coord;

/// Raised by [crate::loader::load] when the supplied datapacks cannot be
/// merged into a coherent ruleset. These are datapack authoring bugs, not
/// runtime conditions, and are always fatal to that load.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("datapack {pack:?} depends on {missing:?}, which is not in the supplied set")]
    MissingDependency { pack: String, missing: String },

    #[error("dependency cycle among datapacks: {cycle:?}")]
    DependencyCycle { cycle: Vec<String> },

    #[error("duplicate registration of {qualified_name:?} within datapack {pack:?}")]
    DuplicateRegistration {
        pack: String,
        qualified_name: String,
    },

    #[error("qualified memo {memo:?} referenced by {referrer:?} is not registered")]
    UnresolvedMemo { referrer: String, memo: String },

    #[error("pattern {pattern:?} is malformed: {reason}")]
    MalformedPattern { pattern: String, reason: String },

    #[error("top-level restriction in datapack {pack:?} is missing a qualified name")]
    MissingRestrictionName { pack: String },

    #[error("schema violation in {context}: {reason}")]
    SchemaViolation { context: String, reason: String },

    #[error("datapack {pack:?} declares board dimensions {dims:?}, conflicting with dependency {dependency:?}'s {dependency_dims:?}")]
    InconsistentBoardDimensions {
        pack: String,
        dims: Vec<usize>,
        dependency: String,
        dependency_dims: Vec<usize>,
    },
}

/// Raised by [crate::engine::apply] / [crate::engine::is_legal] when a move
/// cannot be processed. On any `ApplyError`, the caller-visible state is
/// guaranteed unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplyError {
    #[error("coordinate {coord:?} is out of bounds for the board")]
    OutOfBounds { coord: Coord },

    #[error("cell {coord:?} is already occupied")]
    CellOccupied { coord: Coord },

    #[error("move {coord:?} is illegal under restriction {restriction:?}")]
    IllegalMove { coord: Coord, restriction: String },

    #[error(
        "rule or restriction {owner:?} expects a stone at match index {index} but the cell is empty"
    )]
    DatapackAuthoringError { owner: String, index: i64 },

    #[error("the game has already ended")]
    GameOver,
}
