//! Depth-first 0/1 backend.
//!
//! Each search node fixes one more variable and then reduces the remaining
//! choices by bound propagation: for every constraint touched by a newly fixed
//! variable we compute the smallest and largest value its left-hand side can
//! still reach, fail if the right-hand side is out of reach, and fix any free
//! variable whose other value would put it out of reach. Constraints touched by
//! those forced variables are queued in turn until nothing changes.

use log::{debug, trace};

use crate::error::{CodebreakerError, Result};
use crate::solver::backend::{Assignment, SolveOutcome, SolverBackend};
use crate::solver::linear::{Comparison, ConstraintModel, LinearConstraint, VarId};

type PartialAssignment = Vec<Option<bool>>;

#[derive(Debug, Clone, Default)]
pub struct BacktrackingBackend {
    node_limit: Option<u64>,
    last_node_count: u64,
}

impl BacktrackingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up with a solver error once a single solve visits more than
    /// `node_limit` search nodes.
    pub fn with_node_limit(node_limit: Option<u64>) -> Self {
        Self {
            node_limit,
            last_node_count: 0,
        }
    }

    pub fn node_limit(&self) -> Option<u64> {
        self.node_limit
    }

    /// Nodes visited by the most recent call to `solve`.
    pub fn last_node_count(&self) -> u64 {
        self.last_node_count
    }
}

impl SolverBackend for BacktrackingBackend {
    fn solve(&mut self, model: &ConstraintModel) -> Result<SolveOutcome> {
        let mut search = Search::new(model, self.node_limit);
        let result = search.run();
        self.last_node_count = search.nodes;
        debug!(
            target: "backtracking",
            "Solved {} ({} constraints) in {} nodes",
            model.name(),
            model.constraints().len(),
            search.nodes
        );
        let outcome = match result? {
            Some(values) => SolveOutcome::Feasible(Assignment::new(values)),
            None => SolveOutcome::Infeasible,
        };
        Ok(outcome)
    }
}

struct Search<'a> {
    model: &'a ConstraintModel,
    /// Constraint indices that mention each variable.
    watchers: Vec<Vec<usize>>,
    nodes: u64,
    node_limit: Option<u64>,
}

impl<'a> Search<'a> {
    fn new(model: &'a ConstraintModel, node_limit: Option<u64>) -> Self {
        let mut watchers = vec![Vec::new(); model.num_variables()];
        for (idx, constraint) in model.constraints().iter().enumerate() {
            for (var, _) in constraint.expr.terms() {
                if watchers[var.index()].last() != Some(&idx) {
                    watchers[var.index()].push(idx);
                }
            }
        }
        Self {
            model,
            watchers,
            nodes: 0,
            node_limit,
        }
    }

    fn run(&mut self) -> Result<Option<Vec<bool>>> {
        let mut values: PartialAssignment = vec![None; self.model.num_variables()];
        let worklist: Vec<usize> = (0..self.model.constraints().len()).rev().collect();
        if !self.propagate(&mut values, worklist) {
            trace!(target: "backtracking", "Conflict before branching");
            return Ok(None);
        }
        self.search(values)
    }

    fn search(&mut self, values: PartialAssignment) -> Result<Option<Vec<bool>>> {
        self.nodes += 1;
        if let Some(limit) = self.node_limit {
            if self.nodes > limit {
                return Err(CodebreakerError::solver(format!(
                    "node limit of {} exceeded while solving {}",
                    limit,
                    self.model.name()
                )));
            }
        }

        let Some(var) = values.iter().position(|value| value.is_none()) else {
            let complete: Vec<bool> = values.iter().map(|value| value.unwrap_or(false)).collect();
            if self.model.is_satisfied(&complete) {
                return Ok(Some(complete));
            }
            return Ok(None);
        };

        for choice in [true, false] {
            trace!(
                target: "backtracking",
                "Node {}: trying {} = {}",
                self.nodes,
                self.model.variable_name(VarId::from_index(var)),
                choice
            );
            let mut next = values.clone();
            next[var] = Some(choice);
            if !self.propagate(&mut next, self.watchers[var].clone()) {
                continue;
            }
            if let Some(solution) = self.search(next)? {
                return Ok(Some(solution));
            }
        }
        Ok(None)
    }

    /// Reduce `values` to a fixpoint. Returns false on conflict.
    fn propagate(&self, values: &mut PartialAssignment, mut worklist: Vec<usize>) -> bool {
        while let Some(idx) = worklist.pop() {
            let constraint = &self.model.constraints()[idx];
            if !constraint.is_satisfiable(values) {
                trace!(target: "backtracking", "Constraint {} cannot be satisfied", constraint.name);
                return false;
            }
            let (min, max) = constraint.expr.bounds(values);
            for &(var, coefficient) in constraint.expr.terms() {
                if values[var.index()].is_some() || coefficient == 0 {
                    continue;
                }
                match forced_value(constraint, min, max, coefficient) {
                    Forced::Free => {}
                    Forced::Conflict => return false,
                    Forced::Value(value) => {
                        values[var.index()] = Some(value);
                        worklist.extend(self.watchers[var.index()].iter().copied());
                        // bounds are stale now; the constraint itself was re-queued above
                        break;
                    }
                }
            }
        }
        true
    }
}

enum Forced {
    Free,
    Value(bool),
    Conflict,
}

/// Decide whether a free variable with the given coefficient is forced by the
/// constraint's current bounds.
fn forced_value(constraint: &LinearConstraint, min: i64, max: i64, coefficient: i64) -> Forced {
    let magnitude = coefficient.abs();
    // The value that raises the minimum, and the value that lowers the maximum.
    let raises_min = coefficient > 0;
    let lowers_max = coefficient < 0;

    let (upper, lower) = match constraint.comparison {
        Comparison::Le => (true, false),
        Comparison::Ge => (false, true),
        Comparison::Eq => (true, true),
    };
    let forbid_raise = upper && min + magnitude > constraint.rhs;
    let forbid_lower = lower && max - magnitude < constraint.rhs;

    match (forbid_raise, forbid_lower) {
        (true, true) => Forced::Conflict,
        (true, false) => Forced::Value(!raises_min),
        (false, true) => Forced::Value(!lowers_max),
        (false, false) => Forced::Free,
    }
}
