//! Per-player integer score counters, keyed by qualified memo name.

use std::collections::HashMap;

use crate::coord::PlayerId;

/// `(player, qualified_memo) -> value`, defaulting to 0 for any key never
/// written. Scores are clamped below at 0 after every mutation, per the
/// schema's `minimum: 0` even though `multiply`/`add` can otherwise drive a
/// score negative.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreStore {
    values: HashMap<(PlayerId, String), i64>,
}

/// How a [crate::rule::ScoreAction] combines with the existing value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreOp {
    Set,
    Add,
    Multiply,
}

impl ScoreStore {
    pub fn get(&self, player: PlayerId, memo: &str) -> i64 {
        self.values
            .get(&(player, memo.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn apply(&mut self, player: PlayerId, memo: &str, op: ScoreOp, value: i64) {
        let current = self.get(player, memo);
        let updated = match op {
            ScoreOp::Set => value,
            ScoreOp::Add => current + value,
            ScoreOp::Multiply => current * value,
        };
        self.values
            .insert((player, memo.to_string()), updated.max(0));
    }

    /// All `(player, memo, value)` triples with a non-default score, sorted
    /// for deterministic serialization.
    pub fn entries(&self) -> Vec<(PlayerId, &str, i64)> {
        let mut out: Vec<_> = self
            .values
            .iter()
            .map(|((p, m), v)| (*p, m.as_str(), *v))
            .collect();
        out.sort_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(&b.0)));
        out
    }
}
