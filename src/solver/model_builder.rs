use std::collections::BTreeSet;

use log::{debug, trace};

use crate::error::{CodebreakerError, Result};
use crate::model::{Alphabet, Clue, ClueSet, Secret, Symbol};
use crate::solver::backend::Assignment;
use crate::solver::linear::{Comparison, ConstraintModel, LinearConstraint, LinearExpr, VarId};

/// The linear model for one clue set, plus the variable layout needed to read
/// secrets back out of an assignment.
///
/// `cells[i][v]` is true iff position `i` holds the alphabet's `v`-th symbol.
/// `present[v]` is true iff that symbol occurs anywhere in the secret.
#[derive(Debug, Clone)]
pub struct MastermindModel {
    alphabet: Alphabet,
    code_length: usize,
    cells: Vec<Vec<VarId>>,
    present: Vec<VarId>,
    model: ConstraintModel,
    exclusions: usize,
}

impl MastermindModel {
    pub fn from_clue_set(clue_set: &ClueSet) -> Result<Self> {
        build_model(clue_set.alphabet(), clue_set.code_length(), clue_set.clues())
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn code_length(&self) -> usize {
        self.code_length
    }

    pub fn cell(&self, position: usize, symbol_index: usize) -> VarId {
        self.cells[position][symbol_index]
    }

    pub fn present(&self, symbol_index: usize) -> VarId {
        self.present[symbol_index]
    }

    pub fn constraints(&self) -> &ConstraintModel {
        &self.model
    }

    /// Read the secret encoded by an assignment: for each position, the one
    /// symbol whose cell variable is set.
    pub fn decode(&self, assignment: &Assignment) -> Result<Secret> {
        let mut symbols = Vec::with_capacity(self.code_length);
        for (position, row) in self.cells.iter().enumerate() {
            let mut chosen = row
                .iter()
                .enumerate()
                .filter(|(_, var)| assignment.value(**var))
                .map(|(symbol_index, _)| symbol_index);
            let (Some(symbol_index), None) = (chosen.next(), chosen.next()) else {
                return Err(CodebreakerError::solver(format!(
                    "assignment does not set exactly one symbol at position {}",
                    position
                )));
            };
            let symbol = self.alphabet.symbol_at(symbol_index).ok_or_else(|| {
                CodebreakerError::solver(format!("symbol index {} out of range", symbol_index))
            })?;
            symbols.push(symbol);
        }
        Ok(Secret::new(symbols))
    }

    /// The cell variables set in `assignment`, one per position.
    pub fn chosen_cells(&self, assignment: &Assignment) -> Vec<VarId> {
        self.cells
            .iter()
            .flatten()
            .copied()
            .filter(|var| assignment.value(*var))
            .collect()
    }

    /// Forbid the exact cell assignment of a solution already found.
    ///
    /// With one-hot cells, all `code_length` chosen cells can only be set
    /// together by reproducing that solution, so capping their sum one below
    /// leaves every other assignment feasible.
    pub fn exclude(&mut self, chosen: Vec<VarId>) {
        let name = format!("exclude_{:04}", self.exclusions);
        self.exclusions += 1;
        trace!(target: "model_builder", "Adding {} over {} cells", name, chosen.len());
        let bound = self.code_length as i64 - 1;
        self.model
            .add_constraint(LinearConstraint::new(name, LinearExpr::sum(chosen), Comparison::Le, bound));
    }

    /// Number of solutions excluded so far.
    pub fn exclusions(&self) -> usize {
        self.exclusions
    }
}

/// Translate clues into a 0/1 linear model over per-cell symbol choices.
pub fn build_model(alphabet: &Alphabet, code_length: usize, clues: &[Clue]) -> Result<MastermindModel> {
    validate(alphabet, code_length, clues)?;

    let mut model = ConstraintModel::new("mastermind");
    let cells: Vec<Vec<VarId>> = (0..code_length)
        .map(|i| {
            (0..alphabet.len())
                .map(|v| model.add_variable(format!("cell_{:02}_{:02}", i, v)))
                .collect()
        })
        .collect();
    let present: Vec<VarId> = (0..alphabet.len())
        .map(|v| model.add_variable(format!("present_{:02}", v)))
        .collect();

    let mut builder = MastermindModel {
        alphabet: alphabet.clone(),
        code_length,
        cells,
        present,
        model,
        exclusions: 0,
    };
    builder.add_cell_constraints();
    builder.add_presence_constraints();
    for (idx, clue) in clues.iter().enumerate() {
        builder.add_clue_constraints(idx, clue)?;
    }

    debug!(
        target: "model_builder",
        "Built model: {} positions, {} symbols, {} clues, {} variables, {} constraints",
        code_length,
        alphabet.len(),
        clues.len(),
        builder.model.num_variables(),
        builder.model.constraints().len()
    );
    Ok(builder)
}

fn validate(alphabet: &Alphabet, code_length: usize, clues: &[Clue]) -> Result<()> {
    if clues.is_empty() {
        return Err(CodebreakerError::invalid_input("at least one clue is required"));
    }
    if code_length == 0 {
        return Err(CodebreakerError::invalid_input("code length must be at least 1"));
    }
    let mut seen: BTreeSet<&[Symbol]> = BTreeSet::new();
    for clue in clues {
        clue.validate(code_length)?;
        if !seen.insert(&clue.guess) {
            return Err(CodebreakerError::invalid_input(format!(
                "guess {} appears more than once",
                clue.guess_string()
            )));
        }
        if let Some(symbol) = clue.guess.iter().find(|s| !alphabet.contains(**s)) {
            return Err(CodebreakerError::invalid_input(format!(
                "clue {:?} uses symbol {} outside the alphabet {}",
                clue, symbol, alphabet
            )));
        }
    }
    Ok(())
}

impl MastermindModel {
    fn add(&mut self, name: String, expr: LinearExpr, comparison: Comparison, rhs: i64) {
        let constraint = LinearConstraint::new(name, expr, comparison, rhs);
        trace!(target: "model_builder", "{}: {:?} {} {}", constraint.name, constraint.expr.terms(), comparison, rhs);
        self.model.add_constraint(constraint);
    }

    fn symbol_index(&self, symbol: Symbol) -> Result<usize> {
        self.alphabet.index_of(symbol).ok_or_else(|| {
            CodebreakerError::invalid_input(format!("symbol {} outside the alphabet", symbol))
        })
    }

    /// Exactly one symbol per position.
    fn add_cell_constraints(&mut self) {
        for i in 0..self.code_length {
            let expr = LinearExpr::sum(self.cells[i].iter().copied());
            self.add(format!("cell_{:02}", i), expr, Comparison::Eq, 1);
        }
    }

    /// `present[v]` is set iff some cell holds `v`:
    /// `sum_i cell[i][v] >= present[v]` and `sum_i cell[i][v] <= N * present[v]`.
    fn add_presence_constraints(&mut self) {
        let n = self.code_length as i64;
        for v in 0..self.alphabet.len() {
            let column: Vec<VarId> = self.cells.iter().map(|row| row[v]).collect();
            let at_least = LinearExpr::sum(column.iter().copied()).term(self.present[v], -1);
            self.add(format!("present_min_{:02}", v), at_least, Comparison::Ge, 0);
            let at_most = LinearExpr::sum(column).term(self.present[v], -n);
            self.add(format!("present_max_{:02}", v), at_most, Comparison::Le, 0);
        }
    }

    fn add_clue_constraints(&mut self, idx: usize, clue: &Clue) -> Result<()> {
        let mut distinct = Vec::new();
        for symbol in clue.distinct_symbols() {
            distinct.push(self.present[self.symbol_index(symbol)?]);
        }
        self.add(
            format!("total_{:03}", idx),
            LinearExpr::sum(distinct),
            Comparison::Eq,
            clue.total_matches as i64,
        );

        let mut in_place = Vec::with_capacity(clue.guess.len());
        for (i, symbol) in clue.guess.iter().enumerate() {
            in_place.push(self.cells[i][self.symbol_index(*symbol)?]);
        }
        self.add(
            format!("exact_{:03}", idx),
            LinearExpr::sum(in_place),
            Comparison::Eq,
            clue.exact_matches as i64,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_context::test_context;

    use crate::solver::backend::{SolveOutcome, SolverBackend};
    use crate::solver::backtracking::BacktrackingBackend;
    use crate::tests::UsingLogger;

    use super::*;

    #[test_context(UsingLogger)]
    #[test]
    fn test_model_layout(_: &mut UsingLogger) {
        let clue_set = ClueSet::parse(&["ABC 2 1", "CAA 1 0"]);
        let model = MastermindModel::from_clue_set(&clue_set).unwrap();
        let constraints = model.constraints();

        // 3x3 cells plus 3 presence indicators
        assert_eq!(constraints.num_variables(), 12);
        // 3 cell + 2 * 3 presence + 2 * 2 clue constraints
        assert_eq!(constraints.constraints().len(), 13);

        let lp = constraints.to_string();
        assert!(lp.contains("cell_00: cell_00_00 + cell_00_01 + cell_00_02 = 1"));
        assert!(lp.contains(
            "present_max_00: cell_00_00 + cell_01_00 + cell_02_00 - 3 present_00 <= 0"
        ));
        // CAA counts A once
        assert!(lp.contains("total_001: present_00 + present_02 = 1"));
        assert!(lp.contains("exact_001: cell_00_02 + cell_01_00 + cell_02_00 = 0"));
    }

    #[test]
    fn test_presence_is_exact() {
        let clue_set = ClueSet::parse(&["AB 1 1"]);
        let model = MastermindModel::from_clue_set(&clue_set).unwrap();
        let constraints = model.constraints();

        // secret AA with present[B] wrongly set
        let mut values = vec![false; constraints.num_variables()];
        values[model.cell(0, 0).index()] = true;
        values[model.cell(1, 0).index()] = true;
        values[model.present(0).index()] = true;
        assert!(constraints.is_satisfied(&values));
        values[model.present(1).index()] = true;
        assert!(!constraints.is_satisfied(&values));
        // or present[A] wrongly cleared
        values[model.present(1).index()] = false;
        values[model.present(0).index()] = false;
        assert!(!constraints.is_satisfied(&values));
    }

    #[test]
    fn test_rejects_invalid_input() {
        let alphabet = Alphabet::parse("123");
        assert!(build_model(&alphabet, 3, &[]).unwrap_err().is_invalid_input());

        let clue = Clue::new(Symbol::sequence("111"), 1, 3);
        assert!(build_model(&alphabet, 3, &[clue]).unwrap_err().is_invalid_input());

        let clue = Clue::new(Symbol::sequence("12"), 1, 0);
        assert!(build_model(&alphabet, 3, &[clue]).unwrap_err().is_invalid_input());

        let clue = Clue::new(Symbol::sequence("124"), 1, 0);
        assert!(build_model(&alphabet, 3, &[clue]).unwrap_err().is_invalid_input());

        let clues = [
            Clue::new(Symbol::sequence("123"), 1, 0),
            Clue::new(Symbol::sequence("123"), 2, 0),
        ];
        assert!(build_model(&alphabet, 3, &clues).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_decode_and_exclude() {
        let clue_set = ClueSet::parse(&["AB 2 0"]);
        let mut model = MastermindModel::from_clue_set(&clue_set).unwrap();
        let mut backend = BacktrackingBackend::new();

        let SolveOutcome::Feasible(assignment) = backend.solve(model.constraints()).unwrap() else {
            panic!("expected a solution");
        };
        assert_eq!(model.decode(&assignment).unwrap(), Secret::parse("BA"));

        model.exclude(model.chosen_cells(&assignment));
        assert!(model
            .constraints()
            .to_string()
            .contains("exclude_0000: cell_00_01 + cell_01_00 <= 1"));
        assert_eq!(backend.solve(model.constraints()).unwrap(), SolveOutcome::Infeasible);
    }

    #[test]
    fn test_decode_rejects_corrupt_assignment() {
        let clue_set = ClueSet::parse(&["AB 2 0"]);
        let model = MastermindModel::from_clue_set(&clue_set).unwrap();
        let values = vec![false; model.constraints().num_variables()];
        let err = model.decode(&Assignment::new(values)).unwrap_err();
        assert!(err.is_solver_error());
    }
}
