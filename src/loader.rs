//! Datapack loader & override resolver: topologically orders a set of
//! datapacks, then registers or overrides their named features into a
//! single immutable [Ruleset].

use std::collections::{HashMap, HashSet};

use crate::condition::{Condition, CoordsCondition, ScoreCondition};
use crate::datapack::{
    ConditionDoc, DatapackDoc, DisjunctionRestrictionDoc, MultimatchModeDoc, PatternRestrictionDoc,
    PriorityDoc, RestrictionDoc, RuleDoc, ScoreOpDoc,
};
use crate::error::LoadError;
use crate::pattern::Pattern;
use crate::restriction::{DisjunctionRestriction, PatternRestriction, Restriction};
use crate::rule::{BoardAction, MultimatchMode, Priority, Rule, ScoreAction, ScoreOp};
use crate::ruleset::{Ruleset, ScoreSpec};

/// A slot in a qualified-name feature table: the position the feature was
/// first registered at (owner's load-order index, then declaration index
/// within that datapack) plus its current payload. An override replaces
/// `payload` without touching `position`.
struct Slot<T> {
    position: (usize, usize),
    owner: String,
    payload: T,
}

struct Registry<T> {
    slots: HashMap<String, Slot<T>>,
}

impl<T> Registry<T> {
    fn new() -> Self {
        Registry {
            slots: HashMap::new(),
        }
    }

    /// Registers or overrides `qualified_name`, per §4.I.3: if `owner`
    /// matches the name's prefix, register (duplicate-in-same-pack is an
    /// error); otherwise override an existing entry in place, or silently
    /// skip if nothing is registered yet under that name.
    fn register_or_override(
        &mut self,
        qualified_name: &str,
        owner: &str,
        owner_index: usize,
        decl_index: usize,
        payload: T,
    ) -> Result<(), LoadError> {
        let prefix = qualified_name.split('.').next().unwrap_or(qualified_name);

        if prefix == owner {
            if self
                .slots
                .get(qualified_name)
                .is_some_and(|slot| slot.owner == owner)
            {
                return Err(LoadError::DuplicateRegistration {
                    pack: owner.to_string(),
                    qualified_name: qualified_name.to_string(),
                });
            }
            self.slots.insert(
                qualified_name.to_string(),
                Slot {
                    position: (owner_index, decl_index),
                    owner: owner.to_string(),
                    payload,
                },
            );
        } else if let Some(slot) = self.slots.get_mut(qualified_name) {
            slot.payload = payload;
        } else {
            log::warn!(
                "override of {qualified_name:?} by datapack {owner:?} silently skipped: \
                 owner has not registered it"
            );
        }
        Ok(())
    }

    /// Final payloads, ordered by registration position (owner load order,
    /// then declaration order) — the order rules execute in within a
    /// priority bucket, and a stable order for everything else.
    fn into_ordered(self) -> Vec<(String, T)> {
        let mut entries: Vec<_> = self
            .slots
            .into_iter()
            .map(|(name, slot)| (slot.position, name, slot.payload))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.into_iter().map(|(_, name, payload)| (name, payload)).collect()
    }
}

/// Loads and merges a set of datapack documents into an immutable
/// [Ruleset]. See §4.I.
pub fn load(docs: Vec<DatapackDoc>) -> Result<Ruleset, LoadError> {
    log::debug!("beginning load pass over {} datapack(s)", docs.len());

    let by_name: HashMap<String, &DatapackDoc> =
        docs.iter().map(|d| (d.name.clone(), d)).collect();

    for doc in &docs {
        for dep in &doc.dependencies {
            if !by_name.contains_key(dep) {
                return Err(LoadError::MissingDependency {
                    pack: doc.name.clone(),
                    missing: dep.clone(),
                });
            }
        }
    }

    let order = topological_sort(&docs)?;
    log::debug!("datapack load order: {order:?}");
    let owner_index: HashMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut scores: Registry<ScoreSpec> = Registry::new();
    let mut restrictions: Registry<Restriction> = Registry::new();
    let mut rules: Registry<Rule> = Registry::new();
    let mut board_dims: Vec<usize> = vec![19, 19];
    let mut board_owner: Option<(&str, Vec<usize>)> = None;

    for name in &order {
        let doc = by_name[name];
        let idx = owner_index[name.as_str()];

        if let Some(board) = &doc.board {
            board_dims = board.dimensions.clone();
            board_owner = Some((name.as_str(), board.dimensions.clone()));
        }
        if let Some((owner, dims)) = &board_owner {
            for dep in &doc.dependencies {
                if let Some(dep_doc) = by_name.get(dep) {
                    if let Some(dep_board) = &dep_doc.board {
                        if dep_board.dimensions.len() != dims.len() && *owner != dep.as_str() {
                            return Err(LoadError::InconsistentBoardDimensions {
                                pack: name.clone(),
                                dims: dims.clone(),
                                dependency: dep.clone(),
                                dependency_dims: dep_board.dimensions.clone(),
                            });
                        }
                    }
                }
            }
        }

        for (decl_index, score) in doc.scores.iter().enumerate() {
            let spec = ScoreSpec {
                qualified_memo: score.qualified_memo.clone(),
                display_name: score.display_name.clone(),
                threshold: score.threshold,
            };
            scores.register_or_override(&score.qualified_memo, name, idx, decl_index, spec)?;
        }

        for (decl_index, restriction) in doc.restrictions.iter().enumerate() {
            let (qualified_name, compiled) = compile_restriction(restriction, name)?;
            restrictions.register_or_override(&qualified_name, name, idx, decl_index, compiled)?;
        }

        for (decl_index, rule) in doc.rules.iter().enumerate() {
            let compiled = compile_rule(rule)?;
            rules.register_or_override(&rule.qualified_name, name, idx, decl_index, compiled)?;
        }
    }

    let scores: Vec<ScoreSpec> = scores.into_ordered().into_iter().map(|(_, v)| v).collect();
    let restrictions: Vec<Restriction> = restrictions
        .into_ordered()
        .into_iter()
        .map(|(_, v)| v)
        .collect();
    let mut rules: Vec<Rule> = rules.into_ordered().into_iter().map(|(_, v)| v).collect();
    rules.sort_by_key(|r| r.priority);

    log::debug!(
        "registration complete: {} score(s), {} restriction(s), {} rule(s)",
        scores.len(),
        restrictions.len(),
        rules.len()
    );

    validate_memo_references(&scores, &restrictions, &rules)?;

    Ok(Ruleset {
        datapack_order: order,
        board_dims,
        scores,
        restrictions,
        rules,
    })
}

fn topological_sort(docs: &[DatapackDoc]) -> Result<Vec<String>, LoadError> {
    let by_name: HashMap<&str, &DatapackDoc> =
        docs.iter().map(|d| (d.name.as_str(), d)).collect();

    // edge (a, b) means "a must load before b".
    let mut indegree: HashMap<&str, usize> = by_name.keys().map(|&n| (n, 0)).collect();
    let mut edges: HashMap<&str, Vec<&str>> = by_name.keys().map(|&n| (n, Vec::new())).collect();

    for doc in docs {
        for dep in &doc.dependencies {
            edges.get_mut(dep.as_str()).unwrap().push(&doc.name);
            *indegree.get_mut(doc.name.as_str()).unwrap() += 1;
        }
        for after in &doc.load_after {
            if by_name.contains_key(after.as_str()) {
                edges.get_mut(after.as_str()).unwrap().push(&doc.name);
                *indegree.get_mut(doc.name.as_str()).unwrap() += 1;
            }
        }
    }

    let mut ready: Vec<&str> = indegree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(&n, _)| n)
        .collect();
    ready.sort_unstable();

    let mut order = Vec::with_capacity(docs.len());
    let mut ready: std::collections::BinaryHeap<std::cmp::Reverse<&str>> =
        ready.into_iter().map(std::cmp::Reverse).collect();

    while let Some(std::cmp::Reverse(name)) = ready.pop() {
        order.push(name.to_string());
        for &next in &edges[name] {
            let deg = indegree.get_mut(next).unwrap();
            *deg -= 1;
            if *deg == 0 {
                ready.push(std::cmp::Reverse(next));
            }
        }
    }

    if order.len() != docs.len() {
        let done: HashSet<&str> = order.iter().map(|s| s.as_str()).collect();
        let mut cycle: Vec<String> = by_name
            .keys()
            .filter(|n| !done.contains(*n))
            .map(|s| s.to_string())
            .collect();
        cycle.sort();
        return Err(LoadError::DependencyCycle { cycle });
    }

    Ok(order)
}

fn compile_condition(doc: &ConditionDoc) -> Result<Condition, LoadError> {
    match doc {
        ConditionDoc::Score(c) => {
            if c.min.is_none() && c.max.is_none() {
                return Err(LoadError::SchemaViolation {
                    context: format!("score condition on memo {:?}", c.memo),
                    reason: "at least one of min/max must be present".to_string(),
                });
            }
            Ok(Condition::Score(ScoreCondition {
                player_index: c.player_index,
                memo: c.memo.clone(),
                min: c.min,
                max: c.max,
            }))
        }
        ConditionDoc::Coords(c) => Ok(Condition::Coords(CoordsCondition {
            axes: c.axes.clone(),
            min: c.min,
            max: c.max,
        })),
    }
}

fn compile_restriction(
    doc: &RestrictionDoc,
    pack: &str,
) -> Result<(String, Restriction), LoadError> {
    match doc {
        RestrictionDoc::Pattern(p) => {
            let name = p
                .name
                .clone()
                .ok_or_else(|| LoadError::MissingRestrictionName {
                    pack: pack.to_string(),
                })?;
            let conditions = p
                .conditions
                .iter()
                .map(compile_condition)
                .collect::<Result<_, _>>()?;
            Ok((
                name.clone(),
                Restriction::Pattern(PatternRestriction {
                    name: Some(name),
                    pattern: Pattern::compile(&p.pattern)?,
                    conditions,
                    active_player: p.active_player,
                    negate: p.negate,
                }),
            ))
        }
        RestrictionDoc::Disjunction(d) => {
            let name = d
                .name
                .clone()
                .ok_or_else(|| LoadError::MissingRestrictionName {
                    pack: pack.to_string(),
                })?;
            let conjunctions = d
                .conjunctions
                .iter()
                .map(|group| {
                    group
                        .iter()
                        .map(|sub| compile_nested_restriction(sub))
                        .collect::<Result<Vec<_>, _>>()
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((
                name.clone(),
                Restriction::Disjunction(DisjunctionRestriction {
                    name: Some(name),
                    conjunctions,
                }),
            ))
        }
    }
}

/// Compiles a nested (anonymous) restriction inside a disjunction; nested
/// restrictions cannot be overridden and do not need a qualified name.
fn compile_nested_restriction(doc: &RestrictionDoc) -> Result<Restriction, LoadError> {
    match doc {
        RestrictionDoc::Pattern(p) => {
            let conditions = p
                .conditions
                .iter()
                .map(compile_condition)
                .collect::<Result<_, _>>()?;
            Ok(Restriction::Pattern(PatternRestriction {
                name: p.name.clone(),
                pattern: Pattern::compile(&p.pattern)?,
                conditions,
                active_player: p.active_player,
                negate: p.negate,
            }))
        }
        RestrictionDoc::Disjunction(d) => {
            let conjunctions = d
                .conjunctions
                .iter()
                .map(|group| {
                    group
                        .iter()
                        .map(compile_nested_restriction)
                        .collect::<Result<Vec<_>, _>>()
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Restriction::Disjunction(DisjunctionRestriction {
                name: d.name.clone(),
                conjunctions,
            }))
        }
    }
}

fn compile_rule(doc: &RuleDoc) -> Result<Rule, LoadError> {
    let conditions = doc
        .conditions
        .iter()
        .map(compile_condition)
        .collect::<Result<_, _>>()?;
    let score_actions = doc
        .score_actions
        .iter()
        .map(|a| ScoreAction {
            player_index: a.player_index,
            memo: a.memo.clone(),
            op: match a.op {
                ScoreOpDoc::Set => ScoreOp::Set,
                ScoreOpDoc::Add => ScoreOp::Add,
                ScoreOpDoc::Multiply => ScoreOp::Multiply,
            },
            value: a.value,
        })
        .collect();
    let board_actions = doc
        .board_actions
        .iter()
        .map(|a| BoardAction {
            player_index: a.player_index,
            location_index: a.location_index,
        })
        .collect();

    Ok(Rule {
        qualified_name: doc.qualified_name.clone(),
        priority: match doc.priority {
            PriorityDoc::Earliest => Priority::Earliest,
            PriorityDoc::Earlier => Priority::Earlier,
            PriorityDoc::Early => Priority::Early,
            PriorityDoc::Default => Priority::Default,
            PriorityDoc::Late => Priority::Late,
            PriorityDoc::Later => Priority::Later,
            PriorityDoc::Latest => Priority::Latest,
        },
        pattern: Pattern::compile(&doc.pattern)?,
        multimatch_mode: match doc.multimatch_mode {
            MultimatchModeDoc::One => MultimatchMode::One,
            MultimatchModeDoc::Half => MultimatchMode::Half,
            MultimatchModeDoc::All => MultimatchMode::All,
        },
        conditions,
        score_actions,
        board_actions,
        active_player: doc.active_player,
    })
}

fn validate_memo_references(
    scores: &[ScoreSpec],
    restrictions: &[Restriction],
    rules: &[Rule],
) -> Result<(), LoadError> {
    let known: HashSet<&str> = scores.iter().map(|s| s.qualified_memo.as_str()).collect();

    let check_condition = |referrer: &str, c: &Condition| -> Result<(), LoadError> {
        if let Condition::Score(sc) = c {
            if !known.contains(sc.memo.as_str()) {
                return Err(LoadError::UnresolvedMemo {
                    referrer: referrer.to_string(),
                    memo: sc.memo.clone(),
                });
            }
        }
        Ok(())
    };

    fn walk_restriction(
        referrer: &str,
        r: &Restriction,
        known: &HashSet<&str>,
    ) -> Result<(), LoadError> {
        match r {
            Restriction::Pattern(p) => {
                for c in &p.conditions {
                    if let Condition::Score(sc) = c {
                        if !known.contains(sc.memo.as_str()) {
                            return Err(LoadError::UnresolvedMemo {
                                referrer: referrer.to_string(),
                                memo: sc.memo.clone(),
                            });
                        }
                    }
                }
            }
            Restriction::Disjunction(d) => {
                for group in &d.conjunctions {
                    for sub in group {
                        walk_restriction(referrer, sub, known)?;
                    }
                }
            }
        }
        Ok(())
    }

    for r in restrictions {
        let name = match r {
            Restriction::Pattern(p) => p.name.as_deref().unwrap_or("<restriction>"),
            Restriction::Disjunction(d) => d.name.as_deref().unwrap_or("<restriction>"),
        };
        walk_restriction(name, r, &known)?;
    }

    for rule in rules {
        for c in &rule.conditions {
            check_condition(&rule.qualified_name, c)?;
        }
        for action in &rule.score_actions {
            if !known.contains(action.memo.as_str()) {
                return Err(LoadError::UnresolvedMemo {
                    referrer: rule.qualified_name.clone(),
                    memo: action.memo.clone(),
                });
            }
        }
    }

    Ok(())
}
