use std::ops::{BitAnd, BitOr, Not};

use serde::{Deserialize, Serialize};

use crate::types::{SymbolId, Tristate};

/// A reference to a symbol from inside an expression.
///
/// Serialized either as a sentinel letter (`"y"`, `"m"`, `"n"`) or as a
/// symbol-table index.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SymbolRef {
    Const(Tristate),
    Id(SymbolId),
}

impl SymbolRef {
    pub const YES: SymbolRef = SymbolRef::Const(Tristate::Yes);
    pub const MOD: SymbolRef = SymbolRef::Const(Tristate::Mod);
    pub const NO: SymbolRef = SymbolRef::Const(Tristate::No);

    pub fn sentinel(self) -> Option<Tristate> {
        match self {
            SymbolRef::Const(t) => Some(t),
            SymbolRef::Id(_) => None,
        }
    }

    pub fn id(self) -> Option<SymbolId> {
        match self {
            SymbolRef::Const(_) => None,
            SymbolRef::Id(id) => Some(id),
        }
    }
}

impl From<SymbolId> for SymbolRef {
    fn from(id: SymbolId) -> Self {
        SymbolRef::Id(id)
    }
}

impl From<Tristate> for SymbolRef {
    fn from(t: Tristate) -> Self {
        SymbolRef::Const(t)
    }
}

/// Discriminant of an [`Expr`] node, used by the precedence table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ExprKind {
    Symbol,
    Not,
    Equal,
    Unequal,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    List,
    Range,
    Unknown,
}

/// An expression tree as produced by the configuration parser.
///
/// Comparison and range nodes take symbol operands directly; the logical
/// connectives take sub-expressions. `List` chains encode ordered choice
/// members (`sym`, then the rest of the chain in `next`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Expr {
    Symbol {
        sym: SymbolRef,
    },
    Not {
        expr: Box<Expr>,
    },
    Equal {
        left: SymbolRef,
        right: SymbolRef,
    },
    Unequal {
        left: SymbolRef,
        right: SymbolRef,
    },
    Less {
        left: SymbolRef,
        right: SymbolRef,
    },
    LessEqual {
        left: SymbolRef,
        right: SymbolRef,
    },
    Greater {
        left: SymbolRef,
        right: SymbolRef,
    },
    GreaterEqual {
        left: SymbolRef,
        right: SymbolRef,
    },
    And {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Or {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    List {
        sym: SymbolRef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        next: Option<Box<Expr>>,
    },
    Range {
        low: SymbolRef,
        high: SymbolRef,
    },
    /// A node kind this crate has no rule for (newer parser revisions).
    #[serde(other)]
    Unknown,
}

impl Expr {
    pub fn symbol(sym: impl Into<SymbolRef>) -> Self {
        Expr::Symbol { sym: sym.into() }
    }

    pub fn yes() -> Self {
        Expr::symbol(SymbolRef::YES)
    }

    pub fn not(expr: Self) -> Self {
        Expr::Not { expr: Box::new(expr) }
    }

    pub fn and(lhs: Self, rhs: Self) -> Self {
        Expr::And {
            left: Box::new(lhs),
            right: Box::new(rhs),
        }
    }

    pub fn or(lhs: Self, rhs: Self) -> Self {
        Expr::Or {
            left: Box::new(lhs),
            right: Box::new(rhs),
        }
    }

    pub fn equal(left: impl Into<SymbolRef>, right: impl Into<SymbolRef>) -> Self {
        Expr::Equal {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn unequal(left: impl Into<SymbolRef>, right: impl Into<SymbolRef>) -> Self {
        Expr::Unequal {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn less(left: impl Into<SymbolRef>, right: impl Into<SymbolRef>) -> Self {
        Expr::Less {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn less_equal(left: impl Into<SymbolRef>, right: impl Into<SymbolRef>) -> Self {
        Expr::LessEqual {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn greater(left: impl Into<SymbolRef>, right: impl Into<SymbolRef>) -> Self {
        Expr::Greater {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn greater_equal(left: impl Into<SymbolRef>, right: impl Into<SymbolRef>) -> Self {
        Expr::GreaterEqual {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn range(low: impl Into<SymbolRef>, high: impl Into<SymbolRef>) -> Self {
        Expr::Range {
            low: low.into(),
            high: high.into(),
        }
    }

    /// Builds a choice-member chain `a ^ (b ^ (c))` from an ordered list.
    ///
    /// Returns `None` for an empty list.
    pub fn list<I>(members: I) -> Option<Self>
    where
        I: IntoIterator,
        I::Item: Into<SymbolRef>,
        I::IntoIter: DoubleEndedIterator,
    {
        members.into_iter().rev().fold(None, |next, sym| {
            Some(Expr::List {
                sym: sym.into(),
                next: next.map(Box::new),
            })
        })
    }

    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Symbol { .. } => ExprKind::Symbol,
            Expr::Not { .. } => ExprKind::Not,
            Expr::Equal { .. } => ExprKind::Equal,
            Expr::Unequal { .. } => ExprKind::Unequal,
            Expr::Less { .. } => ExprKind::Less,
            Expr::LessEqual { .. } => ExprKind::LessEqual,
            Expr::Greater { .. } => ExprKind::Greater,
            Expr::GreaterEqual { .. } => ExprKind::GreaterEqual,
            Expr::And { .. } => ExprKind::And,
            Expr::Or { .. } => ExprKind::Or,
            Expr::List { .. } => ExprKind::List,
            Expr::Range { .. } => ExprKind::Range,
            Expr::Unknown => ExprKind::Unknown,
        }
    }

    /// Syntactically the `y` leaf.
    pub fn is_yes(&self) -> bool {
        matches!(self, Expr::Symbol { sym } if *sym == SymbolRef::YES)
    }

    /// Syntactically the `m` leaf.
    pub fn is_mod(&self) -> bool {
        matches!(self, Expr::Symbol { sym } if *sym == SymbolRef::MOD)
    }

    /// Calls `f` on every symbol reference in the tree, left to right.
    pub fn for_each_symbol<F>(&self, f: &mut F)
    where
        F: FnMut(SymbolRef),
    {
        match self {
            Expr::Symbol { sym } => f(*sym),
            Expr::Not { expr } => expr.for_each_symbol(f),
            Expr::Equal { left, right }
            | Expr::Unequal { left, right }
            | Expr::Less { left, right }
            | Expr::LessEqual { left, right }
            | Expr::Greater { left, right }
            | Expr::GreaterEqual { left, right } => {
                f(*left);
                f(*right);
            }
            Expr::And { left, right } | Expr::Or { left, right } => {
                left.for_each_symbol(f);
                right.for_each_symbol(f);
            }
            Expr::List { sym, next } => {
                f(*sym);
                if let Some(next) = next {
                    next.for_each_symbol(f);
                }
            }
            Expr::Range { low, high } => {
                f(*low);
                f(*high);
            }
            Expr::Unknown => {}
        }
    }
}

/// Tautology test: an absent expression, or exactly the `y` leaf.
///
/// This is a syntactic check only; no logical equivalence is attempted.
pub fn is_tautology(expr: Option<&Expr>) -> bool {
    expr.map_or(true, Expr::is_yes)
}

impl From<SymbolRef> for Expr {
    fn from(sym: SymbolRef) -> Self {
        Expr::symbol(sym)
    }
}

impl From<SymbolId> for Expr {
    fn from(id: SymbolId) -> Self {
        Expr::symbol(id)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Self::Output {
        Expr::not(self)
    }
}

impl BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Self) -> Self::Output {
        Expr::and(self, rhs)
    }
}

impl BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Self) -> Self::Output {
        Expr::or(self, rhs)
    }
}
