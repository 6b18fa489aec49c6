use crate::error::Result;
use crate::solver::linear::{ConstraintModel, VarId};

/// A complete 0/1 assignment, indexed by variable.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Assignment {
    values: Vec<bool>,
}

impl Assignment {
    pub fn new(values: Vec<bool>) -> Self {
        Self { values }
    }

    pub fn value(&self, var: VarId) -> bool {
        self.values.get(var.index()).copied().unwrap_or(false)
    }

    pub fn values(&self) -> &[bool] {
        &self.values
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SolveOutcome {
    Feasible(Assignment),
    Infeasible,
}

/// Solves a single instance of a constraint model.
///
/// Implementations block until they either find an assignment satisfying
/// every constraint, prove that none exists, or fail. Failure (resource
/// limits, internal faults) must be reported as an error, never as
/// `Infeasible`.
pub trait SolverBackend {
    fn solve(&mut self, model: &ConstraintModel) -> Result<SolveOutcome>;
}

impl<B: SolverBackend + ?Sized> SolverBackend for &mut B {
    fn solve(&mut self, model: &ConstraintModel) -> Result<SolveOutcome> {
        (**self).solve(model)
    }
}

impl<B: SolverBackend + ?Sized> SolverBackend for Box<B> {
    fn solve(&mut self, model: &ConstraintModel) -> Result<SolveOutcome> {
        (**self).solve(model)
    }
}
