//! The immutable, merged result of loading a set of datapacks.

use crate::restriction::Restriction;
use crate::rule::Rule;

/// A registered score counter: its qualified memo name, optional display
/// name, and optional win threshold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreSpec {
    pub qualified_memo: String,
    pub display_name: Option<String>,
    pub threshold: Option<i64>,
}

/// The merged, load-order-total ruleset produced by [crate::loader::load].
/// Immutable once built; safe to share read-only across games.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ruleset {
    /// Datapack names in topological (load) order.
    pub datapack_order: Vec<String>,
    pub board_dims: Vec<usize>,
    pub scores: Vec<ScoreSpec>,
    /// Top-level restrictions, in stable registration order.
    pub restrictions: Vec<Restriction>,
    /// Rules, already sorted into final evaluation order: priority bucket,
    /// then owning datapack's load order, then declaration order.
    pub rules: Vec<Rule>,
}

impl Ruleset {
    pub fn score_spec(&self, qualified_memo: &str) -> Option<&ScoreSpec> {
        self.scores.iter().find(|s| s.qualified_memo == qualified_memo)
    }
}
