pub mod backend;
pub mod backtracking;
pub mod enumerator;
pub mod linear;
pub mod model_builder;

pub use backend::{Assignment, SolveOutcome, SolverBackend};
pub use backtracking::BacktrackingBackend;
pub use enumerator::SolutionEnumerator;
pub use linear::{Comparison, ConstraintModel, LinearConstraint, LinearExpr, VarId};
pub use model_builder::{build_model, MastermindModel};

use crate::error::Result;
use crate::model::ClueSet;

/// Enumerate every secret consistent with `clue_set` using the default backend.
pub fn enumerate_secrets(clue_set: &ClueSet) -> Result<SolutionEnumerator<BacktrackingBackend>> {
    let model = MastermindModel::from_clue_set(clue_set)?;
    Ok(SolutionEnumerator::new(model, BacktrackingBackend::new()))
}
