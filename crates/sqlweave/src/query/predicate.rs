//! Predicate tree for WHERE and ON conditions.
//!
//! A [`Predicate`] is either a comparison leaf or an AND/OR group. Groups render
//! their children left to right; a child group is wrapped in parentheses and a child
//! that renders to nothing is skipped. An empty group renders to nothing at all, so
//! `And([eq(id), Or([])])` and `And([eq(id)])` produce the same text.

use crate::dialect::Dialect;
use crate::error::BuildResult;

use super::column::{Column, ColumnFormat, Count, Lower};
use super::variable::Variable;

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    NotLike,
    ILike,
    NotILike,
    Between,
    NotBetween,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

impl Operator {
    /// SQL text of the operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::ILike => "ILIKE",
            Operator::NotILike => "NOT ILIKE",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }

    pub fn is_range(self) -> bool {
        matches!(self, Operator::Between | Operator::NotBetween)
    }

    pub fn is_list(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    pub fn is_null_check(self) -> bool {
        matches!(self, Operator::IsNull | Operator::IsNotNull)
    }

    /// Placeholder used when the caller supplies none.
    fn default_variable(self) -> Option<Variable> {
        if self.is_null_check() {
            None
        } else if self.is_range() {
            Some(Variable::Range)
        } else {
            Some(Variable::Positional)
        }
    }
}

/// Left-hand side of a comparison.
#[derive(Debug, Clone)]
pub enum Operand {
    Column(Column),
    Count(Count),
    Lower(Lower),
}

impl Operand {
    pub(crate) fn column(&self) -> &Column {
        match self {
            Operand::Column(c) => c,
            Operand::Count(c) => &c.column,
            Operand::Lower(l) => &l.column,
        }
    }

    pub(crate) fn column_mut(&mut self) -> &mut Column {
        match self {
            Operand::Column(c) => c,
            Operand::Count(c) => &mut c.column,
            Operand::Lower(l) => &mut l.column,
        }
    }

    fn write(&self, out: &mut String, dialect: &dyn Dialect) {
        match self {
            Operand::Column(c) => c.write(out, dialect, ColumnFormat::Qualified),
            Operand::Count(c) => c.write(out, dialect),
            Operand::Lower(l) => l.write_expr(out, dialect),
        }
    }
}

impl From<Column> for Operand {
    fn from(c: Column) -> Self {
        Operand::Column(c)
    }
}

impl From<&str> for Operand {
    fn from(name: &str) -> Self {
        Operand::Column(Column::new(name))
    }
}

impl From<Count> for Operand {
    fn from(c: Count) -> Self {
        Operand::Count(c)
    }
}

impl From<Lower> for Operand {
    fn from(l: Lower) -> Self {
        Operand::Lower(l)
    }
}

/// `column op variable`
#[derive(Debug, Clone)]
pub struct Comparison {
    pub(crate) operand: Operand,
    pub(crate) op: Operator,
    pub(crate) variable: Option<Variable>,
    pub(crate) alias: Option<String>,
}

impl Comparison {
    fn new(operand: impl Into<Operand>, op: Operator) -> Self {
        Self {
            operand: operand.into(),
            variable: op.default_variable(),
            op,
            alias: None,
        }
    }

    pub fn operator(&self) -> Operator {
        self.op
    }

    pub fn column(&self) -> &Column {
        self.operand.column()
    }

    fn write(&self, out: &mut String, dialect: &dyn Dialect) -> BuildResult<()> {
        self.operand.write(out, dialect);
        out.push(' ');
        out.push_str(self.op.as_sql());
        if let Some(v) = &self.variable {
            out.push(' ');
            v.write(out, dialect)?;
        }
        Ok(())
    }
}

/// AND / OR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logic {
    And,
    Or,
}

impl Logic {
    fn separator(self) -> &'static str {
        match self {
            Logic::And => " AND ",
            Logic::Or => " OR ",
        }
    }
}

/// Condition tree node.
#[derive(Debug, Clone)]
pub enum Predicate {
    Comparison(Comparison),
    Logical(Logic, Vec<Predicate>),
}

macro_rules! scalar_ctor {
    ($($(#[$doc:meta])* $name:ident => $op:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(operand: impl Into<Operand>) -> Self {
                Predicate::Comparison(Comparison::new(operand, Operator::$op))
            }
        )*
    };
}

impl Predicate {
    scalar_ctor! {
        /// `column = ?`
        eq => Eq;
        /// `column != ?`
        ne => Ne;
        /// `column > ?`
        gt => Gt;
        /// `column >= ?`
        gte => Gte;
        /// `column < ?`
        lt => Lt;
        /// `column <= ?`
        lte => Lte;
        /// `column LIKE ?`
        like => Like;
        /// `column NOT LIKE ?`
        not_like => NotLike;
        /// `column ILIKE ?`
        ilike => ILike;
        /// `column NOT ILIKE ?`
        not_ilike => NotILike;
        /// `column BETWEEN ? AND ?`
        between => Between;
        /// `column NOT BETWEEN ? AND ?`
        not_between => NotBetween;
        /// `column IS NULL`
        is_null => IsNull;
        /// `column IS NOT NULL`
        is_not_null => IsNotNull;
    }

    /// `column IN (?, ...)` with `len` slots. Zero slots fail the build.
    pub fn in_list(operand: impl Into<Operand>, len: usize) -> Self {
        let mut c = Comparison::new(operand, Operator::In);
        c.variable = Some(Variable::List(len));
        Predicate::Comparison(c)
    }

    /// `column NOT IN (?, ...)` with `len` slots.
    pub fn not_in(operand: impl Into<Operand>, len: usize) -> Self {
        let mut c = Comparison::new(operand, Operator::NotIn);
        c.variable = Some(Variable::List(len));
        Predicate::Comparison(c)
    }

    /// Comparison with an arbitrary operator and its default placeholder.
    pub fn compare(operand: impl Into<Operand>, op: Operator) -> Self {
        Predicate::Comparison(Comparison::new(operand, op))
    }

    /// All of `children`.
    pub fn and(children: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::Logical(Logic::And, children.into_iter().collect())
    }

    /// Any of `children`.
    pub fn or(children: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::Logical(Logic::Or, children.into_iter().collect())
    }

    /// Replace the placeholder of a comparison. Groups are returned unchanged.
    pub fn var(mut self, variable: impl Into<Variable>) -> Self {
        if let Predicate::Comparison(c) = &mut self {
            c.variable = Some(variable.into());
        }
        self
    }

    /// Output alias when the comparison is selected as a field.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        if let Predicate::Comparison(c) = &mut self {
            c.alias = Some(alias.into());
        }
        self
    }

    /// Whether the tree has no comparison at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Predicate::Comparison(_) => false,
            Predicate::Logical(_, children) => children.iter().all(Predicate::is_empty),
        }
    }

    /// Render the tree as it stands, without resolving any table reference.
    pub fn to_sql(&self, dialect: &dyn Dialect) -> BuildResult<String> {
        let mut out = String::new();
        self.write(&mut out, dialect)?;
        Ok(out)
    }

    /// Append the condition to `out`; writes nothing for an empty tree.
    pub(crate) fn write(&self, out: &mut String, dialect: &dyn Dialect) -> BuildResult<()> {
        match self {
            Predicate::Comparison(c) => c.write(out, dialect),
            Predicate::Logical(logic, children) => {
                let mut first = true;
                for child in children {
                    let mut part = String::new();
                    child.write(&mut part, dialect)?;
                    if part.is_empty() {
                        continue;
                    }
                    if !first {
                        out.push_str(logic.separator());
                    }
                    first = false;
                    if matches!(child, Predicate::Logical(..)) {
                        out.push('(');
                        out.push_str(&part);
                        out.push(')');
                    } else {
                        out.push_str(&part);
                    }
                }
                Ok(())
            }
        }
    }

    /// Write as a select-list entry.
    pub(crate) fn write_select(&self, out: &mut String, dialect: &dyn Dialect) -> BuildResult<()> {
        self.write(out, dialect)?;
        if let Predicate::Comparison(Comparison { alias: Some(a), .. }) = self {
            out.push_str(" AS ");
            dialect.write_identifier(out, a);
        }
        Ok(())
    }

    /// Visit every comparison, depth first.
    pub(crate) fn for_each_comparison_mut(&mut self, f: &mut impl FnMut(&mut Comparison)) {
        match self {
            Predicate::Comparison(c) => f(c),
            Predicate::Logical(_, children) => {
                for child in children {
                    child.for_each_comparison_mut(f);
                }
            }
        }
    }
}

impl From<Comparison> for Predicate {
    fn from(c: Comparison) -> Self {
        Predicate::Comparison(c)
    }
}
