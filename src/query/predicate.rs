//! Predicate, operator and operand definitions

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparison operators understood by every storage kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    IsNull,
    IsNotNull,
    /// SQLite-style glob (`*`, `?`, `[...]`), case sensitive
    Glob,
    /// Unanchored regular expression search
    RegexMatch,
}

impl ComparisonOp {
    /// Returns true for IsNull / IsNotNull, which ignore the operand.
    pub fn is_null_check(self) -> bool {
        matches!(self, ComparisonOp::IsNull | ComparisonOp::IsNotNull)
    }

    /// Returns true for operators matched against text patterns.
    pub fn is_pattern(self) -> bool {
        matches!(self, ComparisonOp::Glob | ComparisonOp::RegexMatch)
    }

    /// Operators whose matches form one contiguous run over sorted data.
    ///
    /// Pattern operators are deliberately absent: lexicographic order says
    /// nothing about which strings a pattern accepts.
    pub fn supports_binary_search(self) -> bool {
        matches!(
            self,
            ComparisonOp::Equal
                | ComparisonOp::Less
                | ComparisonOp::LessOrEqual
                | ComparisonOp::Greater
                | ComparisonOp::GreaterOrEqual
        )
    }

    /// Whether a stored value ordered `ord` relative to the operand matches.
    pub fn accepts(self, ord: Ordering) -> bool {
        match self {
            ComparisonOp::Equal => ord == Ordering::Equal,
            ComparisonOp::NotEqual => ord != Ordering::Equal,
            ComparisonOp::Less => ord == Ordering::Less,
            ComparisonOp::LessOrEqual => ord != Ordering::Greater,
            ComparisonOp::Greater => ord == Ordering::Greater,
            ComparisonOp::GreaterOrEqual => ord != Ordering::Less,
            ComparisonOp::IsNull
            | ComparisonOp::IsNotNull
            | ComparisonOp::Glob
            | ComparisonOp::RegexMatch => false,
        }
    }

    /// Returns the operator name used in log output
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Equal => "eq",
            ComparisonOp::NotEqual => "ne",
            ComparisonOp::Less => "lt",
            ComparisonOp::LessOrEqual => "le",
            ComparisonOp::Greater => "gt",
            ComparisonOp::GreaterOrEqual => "ge",
            ComparisonOp::IsNull => "is_null",
            ComparisonOp::IsNotNull => "is_not_null",
            ComparisonOp::Glob => "glob",
            ComparisonOp::RegexMatch => "regex",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal operand of a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Operand {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

/// A numeric operand ready for comparison. NaN never reaches this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericOperand {
    Int(i64),
    Real(f64),
}

impl Operand {
    /// Returns true only for `Null`; see `numeric` for NaN.
    pub fn is_null(&self) -> bool {
        matches!(self, Operand::Null)
    }

    /// Returns the numeric form of the operand.
    ///
    /// A NaN real compares false against everything, so it is reported as
    /// absent just like a null.
    pub fn numeric(&self) -> Option<NumericOperand> {
        match self {
            Operand::Integer(v) => Some(NumericOperand::Int(*v)),
            Operand::Real(v) if !v.is_nan() => Some(NumericOperand::Real(*v)),
            _ => None,
        }
    }

    /// The text of a `Text` operand.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Operand::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Operand kind written in FILTER_STEP log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Null => "null",
            Operand::Integer(_) => "integer",
            Operand::Real(_) => "real",
            Operand::Text(_) => "text",
        }
    }
}

impl From<i64> for Operand {
    fn from(v: i64) -> Self {
        Operand::Integer(v)
    }
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self {
        Operand::Real(v)
    }
}

impl From<&str> for Operand {
    fn from(v: &str) -> Self {
        Operand::Text(v.to_string())
    }
}

impl From<String> for Operand {
    fn from(v: String) -> Self {
        Operand::Text(v)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Null => write!(f, "NULL"),
            Operand::Integer(v) => write!(f, "{}", v),
            Operand::Real(v) => write!(f, "{}", v),
            Operand::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// A single predicate: column, operator and operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    /// Index of the column in the executor's column set
    pub column: usize,
    pub op: ComparisonOp,
    #[serde(default = "null_operand")]
    pub operand: Operand,
}

fn null_operand() -> Operand {
    Operand::Null
}

impl Predicate {
    /// A predicate on column `column`.
    pub fn new(column: usize, op: ComparisonOp, operand: impl Into<Operand>) -> Self {
        Self {
            column,
            op,
            operand: operand.into(),
        }
    }

    pub fn eq(column: usize, operand: impl Into<Operand>) -> Self {
        Self::new(column, ComparisonOp::Equal, operand)
    }

    pub fn ne(column: usize, operand: impl Into<Operand>) -> Self {
        Self::new(column, ComparisonOp::NotEqual, operand)
    }

    pub fn lt(column: usize, operand: impl Into<Operand>) -> Self {
        Self::new(column, ComparisonOp::Less, operand)
    }

    pub fn le(column: usize, operand: impl Into<Operand>) -> Self {
        Self::new(column, ComparisonOp::LessOrEqual, operand)
    }

    pub fn gt(column: usize, operand: impl Into<Operand>) -> Self {
        Self::new(column, ComparisonOp::Greater, operand)
    }

    pub fn ge(column: usize, operand: impl Into<Operand>) -> Self {
        Self::new(column, ComparisonOp::GreaterOrEqual, operand)
    }

    pub fn is_null(column: usize) -> Self {
        Self::new(column, ComparisonOp::IsNull, Operand::Null)
    }

    pub fn is_not_null(column: usize) -> Self {
        Self::new(column, ComparisonOp::IsNotNull, Operand::Null)
    }

    /// SQLite-style `*`, `?`, `[...]` wildcards.
    pub fn glob(column: usize, pattern: &str) -> Self {
        Self::new(column, ComparisonOp::Glob, pattern)
    }

    pub fn regex(column: usize, pattern: &str) -> Self {
        Self::new(column, ComparisonOp::RegexMatch, pattern)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.op.is_null_check() {
            write!(f, "col{} {}", self.column, self.op)
        } else {
            write!(f, "col{} {} {}", self.column, self.op, self.operand)
        }
    }
}
