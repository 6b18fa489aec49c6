use std::iter::FusedIterator;

use log::{debug, trace};

use crate::error::Result;
use crate::model::Secret;
use crate::solver::backend::{SolveOutcome, SolverBackend};
use crate::solver::model_builder::MastermindModel;

/// Lazily yields every secret satisfying a model, each exactly once.
///
/// Every call to `next` runs one solve. A feasible result is decoded, then
/// blocked with an exclusion constraint so later solves must find something
/// new. The sequence ends (`None`) when the backend reports the model
/// infeasible. A backend failure is yielded once as an error and ends the
/// sequence as well.
///
/// The model only ever grows, so an enumerator cannot be rewound: build a
/// fresh model to start over.
pub struct SolutionEnumerator<B: SolverBackend> {
    model: MastermindModel,
    backend: B,
    finished: bool,
}

impl<B: SolverBackend> SolutionEnumerator<B> {
    pub fn new(model: MastermindModel, backend: B) -> Self {
        Self {
            model,
            backend,
            finished: false,
        }
    }

    pub fn model(&self) -> &MastermindModel {
        &self.model
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Secrets yielded so far.
    pub fn found(&self) -> usize {
        self.model.exclusions()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn next_secret(&mut self) -> Result<Option<Secret>> {
        let assignment = match self.backend.solve(self.model.constraints())? {
            SolveOutcome::Infeasible => return Ok(None),
            SolveOutcome::Feasible(assignment) => assignment,
        };
        let secret = self.model.decode(&assignment)?;
        self.model.exclude(self.model.chosen_cells(&assignment));
        Ok(Some(secret))
    }
}

impl<B: SolverBackend> Iterator for SolutionEnumerator<B> {
    type Item = Result<Secret>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_secret() {
            Ok(Some(secret)) => {
                trace!(target: "enumerator", "Solution {}: {}", self.found(), secret);
                Some(Ok(secret))
            }
            Ok(None) => {
                debug!(target: "enumerator", "No more solutions after {}", self.found());
                self.finished = true;
                None
            }
            Err(err) => {
                debug!(target: "enumerator", "Stopping after {} solutions: {}", self.found(), err);
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl<B: SolverBackend> FusedIterator for SolutionEnumerator<B> {}
