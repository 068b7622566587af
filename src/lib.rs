#![warn(missing_debug_implementations)]

//! A rules engine for generalized N-in-a-row / territorial board games (Pente
//! and its many variants). Games are not hard-coded: they are declared as
//! JSON **datapacks** that compose rules, restrictions, and per-player score
//! counters, loaded and merged by [loader] into an immutable [Ruleset](ruleset::Ruleset).
//!
//! The engine itself is synchronous and single-threaded: a call to
//! [engine::Engine::apply] runs to completion and either returns a mutated
//! [state::GameState] or leaves the previous one untouched.
//!
//! # Example
//!
//! ```
//! # use lib_pente::prelude::*;
//! let doc: DatapackDoc = serde_json::from_str(r#"{
//!     "name": "demo",
//!     "board": { "dimensions": [19, 19] },
//!     "scores": [],
//!     "restrictions": [],
//!     "rules": []
//! }"#).unwrap();
//! let ruleset = load(vec![doc]).unwrap();
//! let state = new_game(&ruleset, 2);
//! assert!(is_legal(&ruleset, &state, &Coord::new(vec![9, 9])));
//! let state = apply(&ruleset, &state, &Coord::new(vec![9, 9])).unwrap();
//! assert_eq!(state.board.get(&Coord::new(vec![9, 9])), Some(0));
//! ```

pub mod utils {
    pub mod prelude {
        pub use crate::error::{ApplyError, LoadError};
        pub type Result<T> = std::result::Result<T, crate::error::LoadError>;
    }
}

pub mod error;
pub mod coord;
pub mod board;
pub mod score;
pub mod pattern;
pub mod condition;
pub mod restriction;
pub mod rule;
pub mod datapack;
pub mod loader;
pub mod ruleset;
pub mod state;
pub mod engine;

pub mod prelude {
    pub use crate::board::Board;
    pub use crate::condition::{Condition, CoordsCondition, ScoreCondition};
    pub use crate::coord::{Coord, Orientation, PlayerId};
    pub use crate::datapack::{BoardDoc as BoardSpecDoc, DatapackDoc, RestrictionDoc, RuleDoc, ScoreSpecDoc};
    pub use crate::engine::{apply, deserialize, is_legal, load, new_game, serialize, winner};
    pub use crate::error::{ApplyError, LoadError};
    pub use crate::pattern::{CellPredicate, Match, Pattern, Polarity};
    pub use crate::restriction::Restriction;
    pub use crate::rule::{BoardAction, MultimatchMode, Priority, Rule, ScoreAction, ScoreOp};
    pub use crate::ruleset::Ruleset;
    pub use crate::score::ScoreStore;
    pub use crate::state::{GameState, SaveDoc};
}
