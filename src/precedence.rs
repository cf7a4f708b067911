//! Operator precedence between expression-node kinds.
//!
//! From tightest to loosest binding:
//!
//! ```text
//! <  <=  >  >=      ordering comparisons
//! ==  !=            equality
//! !                 negation
//! &&                conjunction
//! ||                disjunction
//! ^                 choice-list separator
//! ```
//!
//! Symbol references, ranges and unknown nodes are atoms and have no place in
//! the order.

use crate::expr::ExprKind;

/// Result of comparing two node kinds by binding strength.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Precedence {
    /// Same binding strength.
    Equal,
    /// The first kind binds less tightly.
    Lower,
    /// The first kind binds more tightly.
    Higher,
    /// At least one kind is an atom.
    Incomparable,
}

fn binding_power(kind: ExprKind) -> Option<u8> {
    match kind {
        ExprKind::Less | ExprKind::LessEqual | ExprKind::Greater | ExprKind::GreaterEqual => Some(5),
        ExprKind::Equal | ExprKind::Unequal => Some(4),
        ExprKind::Not => Some(3),
        ExprKind::And => Some(2),
        ExprKind::Or => Some(1),
        ExprKind::List => Some(0),
        ExprKind::Symbol | ExprKind::Range | ExprKind::Unknown => None,
    }
}

pub fn compare(a: ExprKind, b: ExprKind) -> Precedence {
    match (binding_power(a), binding_power(b)) {
        (Some(x), Some(y)) if x == y => Precedence::Equal,
        (Some(x), Some(y)) if x < y => Precedence::Lower,
        (Some(_), Some(_)) => Precedence::Higher,
        _ => Precedence::Incomparable,
    }
}

/// Whether a child of kind `child` must be parenthesized when rendered inside
/// a parent of kind `enclosing` (`None` at the top of an expression).
pub fn needs_parens(enclosing: Option<ExprKind>, child: ExprKind) -> bool {
    let Some(parent) = enclosing else {
        return false;
    };
    match compare(parent, child) {
        Precedence::Higher => true,
        Precedence::Equal | Precedence::Lower => false,
        // Atoms are self-delimiting.
        Precedence::Incomparable => false,
    }
}
