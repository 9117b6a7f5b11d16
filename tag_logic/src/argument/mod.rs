//! Argument definitions - the typed positions inside a predicate.
//!
//! Every position in a predicate's argument list is one of:
//! - **String**: a literal token such as `friendly` or `breed=pug`
//! - **Numeric**: an integer comparison such as `age=1`, `height>5`, or `10`
//! - **Variable**: a wildcard (`?`, `*`) or a named variable (`&x`)
//!
//! The leaf-level match tables (negation XOR for strings, the operator
//! combination table for numerics) live here; the position-by-position
//! walk over two argument lists lives in [`crate::unify`].

use serde::{Deserialize, Serialize};

/// Comparison operator carried by a numeric argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NumericOp {
    /// `name=value` - the other side must hold exactly `value`.
    Eq,
    /// `name>value` - the other side must exceed `value`.
    Gt,
    /// `name<value` - the other side must fall below `value`.
    Lt,
    /// A bare integer literal with no comparator; compares like `Eq`.
    Int,
}

impl NumericOp {
    /// Collapse `Int` onto `Eq` - both carry a concrete value.
    fn normalized(self) -> NumericOp {
        match self {
            NumericOp::Int => NumericOp::Eq,
            other => other,
        }
    }
}

/// A literal string position.
///
/// `name` is the attribute label for `label=value` tokens and empty for bare
/// tokens; `value` is the payload compared during matching. Display
/// reassembles the original token from the two.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StringArgument {
    pub name: String,
    pub value: String,
    pub negated: bool,
}

impl StringArgument {
    /// Leaf match: values equal, with XOR negation flipping the verdict.
    /// Two negated sides never match.
    pub fn matches(&self, other: &StringArgument) -> bool {
        if self.negated && other.negated {
            return false;
        }
        if self.negated || other.negated {
            return self.value != other.value;
        }
        self.value == other.value
    }
}

/// An integer comparison position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NumericArgument {
    /// Attribute label (`age` in `age=1`); empty for a bare literal.
    pub name: String,
    pub op: NumericOp,
    pub value: i64,
    pub negated: bool,
}

impl NumericArgument {
    /// Leaf match per the operator combination table.
    ///
    /// EQ/EQ compares for equality; EQ paired with GT or LT performs the
    /// ordering check against the bound; two bounds (GT/GT, GT/LT, LT/GT,
    /// LT/LT) never match. A single negated side matches iff the values
    /// differ; two negated sides never match.
    pub fn matches(&self, other: &NumericArgument) -> bool {
        if self.negated && other.negated {
            return false;
        }
        if self.negated || other.negated {
            return self.value != other.value;
        }
        use NumericOp::{Eq, Gt, Lt};
        match (self.op.normalized(), other.op.normalized()) {
            (Eq, Eq) => self.value == other.value,
            (Eq, Gt) => self.value > other.value,
            (Gt, Eq) => other.value > self.value,
            (Eq, Lt) => self.value < other.value,
            (Lt, Eq) => other.value < self.value,
            _ => false,
        }
    }
}

/// Wildcard and variable positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VariableArgument {
    /// `?` - matches exactly one concrete argument.
    MatchOne,
    /// `*` - matches any remaining arguments and ends the comparison.
    MatchAll,
    /// `&x` - matches one concrete argument and records a binding
    /// (stored without the `&` sigil).
    Named(String),
}

/// A single position in a predicate's argument list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Argument {
    String(StringArgument),
    Numeric(NumericArgument),
    Variable(VariableArgument),
}

impl Argument {
    /// Create a bare string argument.
    pub fn string(value: impl Into<String>) -> Self {
        Argument::String(StringArgument {
            name: String::new(),
            value: value.into(),
            negated: false,
        })
    }

    /// Create a labelled string argument (`name=value`).
    pub fn labelled(name: impl Into<String>, value: impl Into<String>) -> Self {
        Argument::String(StringArgument {
            name: name.into(),
            value: value.into(),
            negated: false,
        })
    }

    /// Create a numeric argument with an explicit comparator.
    pub fn numeric(name: impl Into<String>, op: NumericOp, value: i64) -> Self {
        Argument::Numeric(NumericArgument {
            name: name.into(),
            op,
            value,
            negated: false,
        })
    }

    /// Create a bare integer argument.
    pub fn int(value: i64) -> Self {
        Argument::Numeric(NumericArgument {
            name: String::new(),
            op: NumericOp::Int,
            value,
            negated: false,
        })
    }

    /// Create the `?` wildcard.
    pub fn match_one() -> Self {
        Argument::Variable(VariableArgument::MatchOne)
    }

    /// Create the `*` wildcard.
    pub fn match_all() -> Self {
        Argument::Variable(VariableArgument::MatchAll)
    }

    /// Create a named variable (`&x`; pass the name without the sigil).
    pub fn variable(name: impl Into<String>) -> Self {
        Argument::Variable(VariableArgument::Named(name.into()))
    }

    /// Flip the negation flag. Wildcards and variables cannot be negated
    /// and are returned unchanged.
    pub fn negate(mut self) -> Self {
        match &mut self {
            Argument::String(s) => s.negated = true,
            Argument::Numeric(n) => n.negated = true,
            Argument::Variable(_) => {}
        }
        self
    }

    /// Whether this position is a wildcard or variable.
    pub fn is_variable(&self) -> bool {
        matches!(self, Argument::Variable(_))
    }

    /// Whether this position is the `*` wildcard.
    pub fn is_match_all(&self) -> bool {
        matches!(self, Argument::Variable(VariableArgument::MatchAll))
    }
}

impl std::fmt::Display for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Argument::String(s) => {
                if s.negated {
                    write!(f, "!")?;
                }
                if s.name.is_empty() {
                    write!(f, "{}", s.value)
                } else {
                    write!(f, "{}={}", s.name, s.value)
                }
            }
            Argument::Numeric(n) => {
                if n.negated {
                    write!(f, "!")?;
                }
                match n.op {
                    NumericOp::Eq => write!(f, "{}={}", n.name, n.value),
                    NumericOp::Gt => write!(f, "{}>{}", n.name, n.value),
                    NumericOp::Lt => write!(f, "{}<{}", n.name, n.value),
                    NumericOp::Int => write!(f, "{}", n.value),
                }
            }
            Argument::Variable(VariableArgument::MatchOne) => write!(f, "?"),
            Argument::Variable(VariableArgument::MatchAll) => write!(f, "*"),
            Argument::Variable(VariableArgument::Named(name)) => write!(f, "&{}", name),
        }
    }
}
