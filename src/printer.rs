//! Expression rendering for constraint output.
//!
//! The printer walks an [`Expr`] and writes the shortest text that parses
//! back to the same formula, inserting parentheses only where the
//! [precedence table][crate::precedence] requires them. Two syntaxes share the
//! same rules and differ only in their tokens:
//!
//! | | [`Syntax::Boolean`] | [`Syntax::Logic`] |
//! |---|---|---|
//! | negation | `!` | ` not ` |
//! | conjunction | ` && ` | ` and ` |
//! | disjunction | ` \|\| ` | ` or ` |
//! | variable | `(defined CONFIG_X)` | `CONFIG_X` |
//! | untyped symbol | `0` | `"X"` |
//!
//! Comparisons against a sentinel collapse: `X == y` prints as the bare
//! variable and `X == n` as its negation.
//!
//! # Examples
//!
//! ```
//! use kclause::config::Config;
//! use kclause::expr::Expr;
//! use kclause::model::{Model, Symbol};
//! use kclause::printer::{Printer, Syntax};
//! use kclause::types::{SymbolId, SymbolKind};
//!
//! let model = Model::new(vec![
//!     Symbol::new("A", SymbolKind::Bool),
//!     Symbol::new("B", SymbolKind::Bool),
//! ]);
//! let config = Config::default();
//! let a = Expr::symbol(SymbolId::new(0));
//! let b = Expr::symbol(SymbolId::new(1));
//! let e = !(a & b);
//!
//! let logic = Printer::new(&model, &config, Syntax::Logic);
//! assert_eq!(logic.render_to_string(&e), " not (CONFIG_A and CONFIG_B)");
//!
//! let boolean = Printer::new(&model, &config, Syntax::Boolean);
//! assert_eq!(boolean.render_to_string(&e), "!((defined CONFIG_A) && (defined CONFIG_B))");
//! ```

use std::fmt::{self, Write};

use crate::config::Config;
use crate::expr::{Expr, ExprKind, SymbolRef};
use crate::model::Model;
use crate::precedence::needs_parens;
use crate::symbol::{classify, identifier, SymbolClass, SymbolMode};

/// Target syntax of the printer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Syntax {
    /// C-preprocessor style: `&&`, `||`, `!`, `(defined X)`.
    Boolean,
    /// Keyword style of the constraint grammar: `and`, `or`, `not`.
    Logic,
}

struct Tokens {
    not: &'static str,
    and: &'static str,
    or: &'static str,
    equal: &'static str,
    unequal: &'static str,
}

impl Syntax {
    fn tokens(self) -> Tokens {
        match self {
            Syntax::Boolean => Tokens {
                not: "!",
                and: " && ",
                or: " || ",
                equal: "==",
                unequal: "!=",
            },
            Syntax::Logic => Tokens {
                not: " not ",
                and: " and ",
                or: " or ",
                equal: "==",
                unequal: "!=",
            },
        }
    }
}

fn ordering_token(kind: ExprKind) -> &'static str {
    match kind {
        ExprKind::Less => " < ",
        ExprKind::LessEqual => " <= ",
        ExprKind::Greater => " > ",
        ExprKind::GreaterEqual => " >= ",
        _ => unreachable!("not an ordering comparison: {:?}", kind),
    }
}

/// Renders expressions of one model in one syntax.
#[derive(Debug, Copy, Clone)]
pub struct Printer<'a> {
    model: &'a Model,
    prefix: &'a str,
    syntax: Syntax,
}

impl<'a> Printer<'a> {
    pub fn new(model: &'a Model, config: &'a Config, syntax: Syntax) -> Self {
        Self {
            model,
            prefix: &config.prefix,
            syntax,
        }
    }

    /// Token for a single symbol reference.
    pub fn symbol(&self, sym: SymbolRef, mode: SymbolMode) -> String {
        match classify(self.model, sym) {
            SymbolClass::True => "1".to_string(),
            SymbolClass::False => "0".to_string(),
            SymbolClass::Opaque(name) => match self.syntax {
                Syntax::Boolean => "0".to_string(),
                Syntax::Logic => format!("\"{}\"", name),
            },
            SymbolClass::Variable(name) => {
                let id = identifier(self.prefix, name);
                match (self.syntax, mode) {
                    (Syntax::Boolean, SymbolMode::Defined) => format!("(defined {})", id),
                    _ => id,
                }
            }
        }
    }

    /// Writes `expr` to `out`, as a child of a node of kind `enclosing`
    /// (`None` at the top level).
    pub fn render<W: Write>(&self, expr: &Expr, out: &mut W, enclosing: Option<ExprKind>) -> fmt::Result {
        let tokens = self.syntax.tokens();
        let parens = needs_parens(enclosing, expr.kind());
        if parens {
            out.write_char('(')?;
        }
        match expr {
            Expr::Symbol { sym } => out.write_str(&self.symbol(*sym, SymbolMode::Defined))?,
            Expr::Not { expr: inner } => {
                out.write_str(tokens.not)?;
                if self.prefix_not_splits(inner) {
                    out.write_char('(')?;
                    self.render(inner, out, None)?;
                    out.write_char(')')?;
                } else {
                    self.render(inner, out, Some(ExprKind::Not))?;
                }
            }
            Expr::Equal { left, right } => self.render_equality(*left, *right, true, out)?,
            Expr::Unequal { left, right } => self.render_equality(*left, *right, false, out)?,
            Expr::Less { left, right }
            | Expr::LessEqual { left, right }
            | Expr::Greater { left, right }
            | Expr::GreaterEqual { left, right } => match self.syntax {
                Syntax::Logic => {
                    out.write_str(&self.symbol(*left, SymbolMode::Naked))?;
                    out.write_str(ordering_token(expr.kind()))?;
                    out.write_str(&self.symbol(*right, SymbolMode::Naked))?;
                }
                Syntax::Boolean => {
                    log::warn!("Ordering comparison {:?} has no boolean form, emitting 1", expr.kind());
                    out.write_char('1')?;
                }
            },
            Expr::And { left, right } => {
                self.render(left, out, Some(ExprKind::And))?;
                out.write_str(tokens.and)?;
                self.render(right, out, Some(ExprKind::And))?;
            }
            Expr::Or { left, right } => {
                self.render(left, out, Some(ExprKind::Or))?;
                out.write_str(tokens.or)?;
                self.render(right, out, Some(ExprKind::Or))?;
            }
            Expr::List { sym, next } => {
                out.write_str(&self.symbol(*sym, SymbolMode::Defined))?;
                out.write_char(' ')?;
                if let Some(next) = next {
                    out.write_str("^ ")?;
                    self.render(next, out, Some(ExprKind::List))?;
                }
            }
            Expr::Range { low, high } => {
                write!(
                    out,
                    "[{} {}]",
                    self.symbol(*low, SymbolMode::Naked),
                    self.symbol(*high, SymbolMode::Naked)
                )?;
            }
            Expr::Unknown => {
                log::warn!("No rendering rule for unknown expression node, emitting 1");
                out.write_char('1')?;
            }
        }
        if parens {
            out.write_char(')')?;
        }
        Ok(())
    }

    /// Whether `!` directly before `inner` would bind to its left operand only.
    ///
    /// C-style `!` binds tighter than `==`/`!=`, so a comparison that prints
    /// with an explicit operator needs its own parentheses under negation.
    fn prefix_not_splits(&self, inner: &Expr) -> bool {
        match (self.syntax, inner) {
            (Syntax::Boolean, Expr::Equal { right, .. } | Expr::Unequal { right, .. }) => {
                right.sentinel().is_none()
            }
            _ => false,
        }
    }

    fn render_equality<W: Write>(&self, left: SymbolRef, right: SymbolRef, equal: bool, out: &mut W) -> fmt::Result {
        let tokens = self.syntax.tokens();
        match right.sentinel() {
            Some(t) => {
                // `X == y` and `X != n` hold exactly when X does.
                if t.is_true() != equal {
                    out.write_str(tokens.not)?;
                }
                out.write_str(&self.symbol(left, SymbolMode::Defined))
            }
            None => {
                out.write_str(&self.symbol(left, SymbolMode::Naked))?;
                out.write_str(if equal { tokens.equal } else { tokens.unequal })?;
                out.write_str(&self.symbol(right, SymbolMode::Naked))
            }
        }
    }

    pub fn render_to_string(&self, expr: &Expr) -> String {
        let mut s = String::new();
        // Writing into a String cannot fail.
        let _ = self.render(expr, &mut s, None);
        s
    }

    /// Renders a guard condition; an absent condition is the literal `1`.
    pub fn condition(&self, expr: Option<&Expr>) -> String {
        match expr {
            Some(expr) => self.render_to_string(expr),
            None => "1".to_string(),
        }
    }
}
