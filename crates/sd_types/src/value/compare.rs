//! Ordering between values.

use std::cmp::Ordering;
use std::fmt;

use super::Value;
use crate::adt;
use crate::errors::ComparisonError;
use crate::flags::SpecialMethods;

/// A rich comparison operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub const ALL: [CompareOp; 4] = [CompareOp::Lt, CompareOp::Le, CompareOp::Gt, CompareOp::Ge];

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    /// Whether `ordering` satisfies this operator.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Lt => ordering.is_lt(),
            CompareOp::Le => ordering.is_le(),
            CompareOp::Gt => ordering.is_gt(),
            CompareOp::Ge => ordering.is_ge(),
        }
    }

    /// The operator with its operands swapped (`a < b` is `b > a`).
    pub fn reflected(self) -> Self {
        match self {
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Le => CompareOp::Ge,
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Ge => CompareOp::Le,
        }
    }

    /// The special method implementing this operator.
    pub fn special(self) -> SpecialMethods {
        match self {
            CompareOp::Lt => SpecialMethods::LT,
            CompareOp::Le => SpecialMethods::LE,
            CompareOp::Gt => SpecialMethods::GT,
            CompareOp::Ge => SpecialMethods::GE,
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            CompareOp::Lt => 0,
            CompareOp::Le => 1,
            CompareOp::Gt => 2,
            CompareOp::Ge => 3,
        }
    }

    pub(crate) fn unsupported(self, lhs: &Value, rhs: &Value) -> ComparisonError {
        ComparisonError::Unsupported {
            op: self,
            lhs: lhs.type_name(),
            rhs: rhs.type_name(),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Lexicographic comparison: the first unequal pair decides, otherwise the
/// shorter sequence is smaller.
pub(crate) fn compare_sequences(
    op: CompareOp,
    lhs: &[Value],
    rhs: &[Value],
) -> Result<bool, ComparisonError> {
    match lhs.iter().zip(rhs).find(|(a, b)| a != b) {
        Some((a, b)) => a.compare(op, b),
        None => Ok(op.holds(lhs.len().cmp(&rhs.len()))),
    }
}

impl Value {
    /// Evaluate `self <op> other`.
    pub fn compare(&self, op: CompareOp, other: &Value) -> Result<bool, ComparisonError> {
        if self.is_adt() {
            return adt::compare(op, self, other);
        }
        if other.is_adt() {
            return adt::compare(op.reflected(), other, self);
        }
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Ok(op.holds(a.as_str().cmp(b.as_str()))),
            (Value::Tuple(a), Value::Tuple(b)) => compare_sequences(op, a.items(), b.items()),
            (Value::List(a), Value::List(b)) => compare_sequences(op, a, b),
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => Ok(a.partial_cmp(b).is_some_and(|ord| op.holds(ord))),
                _ => Err(op.unsupported(self, other)),
            },
        }
    }

    pub fn lt(&self, other: &Value) -> Result<bool, ComparisonError> {
        self.compare(CompareOp::Lt, other)
    }

    pub fn le(&self, other: &Value) -> Result<bool, ComparisonError> {
        self.compare(CompareOp::Le, other)
    }

    pub fn gt(&self, other: &Value) -> Result<bool, ComparisonError> {
        self.compare(CompareOp::Gt, other)
    }

    pub fn ge(&self, other: &Value) -> Result<bool, ComparisonError> {
        self.compare(CompareOp::Ge, other)
    }
}
