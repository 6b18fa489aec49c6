use std::fmt::{self, Display};
use std::io::Write;

use itertools::Itertools;

/// Handle to a 0/1 variable owned by a [`ConstraintModel`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct VarId(usize);

impl VarId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Comparison {
    Eq,
    Le,
    Ge,
}

impl Comparison {
    pub fn holds(&self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::Eq => lhs == rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Ge => lhs >= rhs,
        }
    }
}

impl Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::Eq => write!(f, "="),
            Comparison::Le => write!(f, "<="),
            Comparison::Ge => write!(f, ">="),
        }
    }
}

/// Weighted sum of variables.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct LinearExpr {
    terms: Vec<(VarId, i64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the given variables, each with coefficient 1.
    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        Self {
            terms: vars.into_iter().map(|var| (var, 1)).collect(),
        }
    }

    pub fn term(mut self, var: VarId, coefficient: i64) -> Self {
        self.terms.push((var, coefficient));
        self
    }

    pub fn terms(&self) -> &[(VarId, i64)] {
        &self.terms
    }

    pub fn evaluate(&self, values: &[bool]) -> i64 {
        self.terms
            .iter()
            .filter(|(var, _)| values[var.0])
            .map(|(_, coefficient)| coefficient)
            .sum()
    }

    /// Smallest and largest values the expression can still take when only
    /// some of the variables have been fixed.
    pub fn bounds(&self, values: &[Option<bool>]) -> (i64, i64) {
        let mut min = 0;
        let mut max = 0;
        for &(var, coefficient) in self.terms.iter() {
            match values[var.0] {
                Some(true) => {
                    min += coefficient;
                    max += coefficient;
                }
                Some(false) => {}
                None => {
                    min += coefficient.min(0);
                    max += coefficient.max(0);
                }
            }
        }
        (min, max)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LinearConstraint {
    pub name: String,
    pub expr: LinearExpr,
    pub comparison: Comparison,
    pub rhs: i64,
}

impl LinearConstraint {
    pub fn new(name: impl Into<String>, expr: LinearExpr, comparison: Comparison, rhs: i64) -> Self {
        Self {
            name: name.into(),
            expr,
            comparison,
            rhs,
        }
    }

    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        self.comparison.holds(self.expr.evaluate(values), self.rhs)
    }

    /// Whether some completion of a partial assignment could still satisfy
    /// this constraint.
    pub fn is_satisfiable(&self, values: &[Option<bool>]) -> bool {
        let (min, max) = self.expr.bounds(values);
        match self.comparison {
            Comparison::Eq => min <= self.rhs && self.rhs <= max,
            Comparison::Le => min <= self.rhs,
            Comparison::Ge => max >= self.rhs,
        }
    }
}

/// A set of 0/1 variables and the linear constraints over them.
///
/// Constraints are only ever appended; nothing is removed once added.
#[derive(Clone, Debug)]
pub struct ConstraintModel {
    name: String,
    variables: Vec<String>,
    constraints: Vec<LinearConstraint>,
}

impl ConstraintModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_variable(&mut self, name: impl Into<String>) -> VarId {
        self.variables.push(name.into());
        VarId(self.variables.len() - 1)
    }

    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        debug_assert!(constraint
            .expr
            .terms()
            .iter()
            .all(|(var, _)| var.0 < self.variables.len()));
        self.constraints.push(constraint);
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn variable_name(&self, var: VarId) -> &str {
        &self.variables[var.0]
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Whether a complete assignment satisfies every constraint.
    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        values.len() == self.variables.len()
            && self.constraints.iter().all(|c| c.is_satisfied(values))
    }

    /// Write the model in CPLEX LP format.
    pub fn write_lp<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        write!(writer, "{}", self)
    }

    fn format_expr(&self, expr: &LinearExpr) -> String {
        if expr.terms().is_empty() {
            return "0".to_string();
        }
        expr.terms()
            .iter()
            .enumerate()
            .map(|(idx, &(var, coefficient))| {
                let name = self.variable_name(var);
                let sign = if coefficient < 0 {
                    "- "
                } else if idx > 0 {
                    "+ "
                } else {
                    ""
                };
                match coefficient.abs() {
                    1 => format!("{}{}", sign, name),
                    c => format!("{}{} {}", sign, c, name),
                }
            })
            .join(" ")
    }
}

impl Display for ConstraintModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\\* {} *\\", self.name)?;
        writeln!(f, "Minimize")?;
        writeln!(f, "OBJ: 0 {}", self.variables.first().map_or("", |v| v.as_str()))?;
        writeln!(f, "Subject To")?;
        for constraint in self.constraints.iter() {
            writeln!(
                f,
                "{}: {} {} {}",
                constraint.name,
                self.format_expr(&constraint.expr),
                constraint.comparison,
                constraint.rhs
            )?;
        }
        writeln!(f, "Binaries")?;
        for variable in self.variables.iter() {
            writeln!(f, "{}", variable)?;
        }
        writeln!(f, "End")
    }
}
