use crate::expr::is_tautology;
use crate::model::Symbol;

/// Whether `symbol` is a pure default.
///
/// Defaults are configuration variables that are invisible (no prompt), have
/// no reverse dependency beyond a tautology, and carry at least one default
/// whose value is `y` or `m` under an unconditional (or tautological) guard.
///
/// Tautologies are recognized syntactically: only an absent expression or
/// the literal `y` leaf counts.
pub fn is_default(symbol: &Symbol) -> bool {
    if symbol.prompts().next().is_some() {
        return false;
    }
    if !is_tautology(symbol.rev_dep.as_ref()) {
        return false;
    }
    symbol.defaults().any(|prop| {
        is_tautology(prop.visible.as_ref()) && prop.expr.as_ref().map_or(true, |e| e.is_yes() || e.is_mod())
    })
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::expr::{Expr, SymbolRef};
    use crate::model::Property;
    use crate::types::{PropertyKind, SymbolId, SymbolKind};

    fn default_to(value: Expr) -> Property {
        Property::new(PropertyKind::Default).with_expr(value)
    }

    fn foo() -> Symbol {
        Symbol::new("FOO", SymbolKind::Bool).with_property(default_to(Expr::yes()))
    }

    #[test]
    fn test_unguarded_yes_default() {
        assert!(is_default(&foo()));
    }

    #[test]
    fn test_prompt_flips_classification() {
        let symbol = foo().with_property(Property::new(PropertyKind::Prompt).with_text("Foo"));
        assert!(!is_default(&symbol));
    }

    #[test]
    fn test_mod_default() {
        let symbol = Symbol::new("FOO", SymbolKind::Tristate).with_property(default_to(Expr::from(SymbolRef::MOD)));
        assert!(is_default(&symbol));
    }

    #[test]
    fn test_no_default() {
        let symbol = Symbol::new("FOO", SymbolKind::Bool).with_property(default_to(Expr::from(SymbolRef::NO)));
        assert!(!is_default(&symbol));
        assert!(!is_default(&Symbol::new("BAR", SymbolKind::Bool)));
    }

    #[test]
    fn test_guarded_default() {
        let guard = Expr::symbol(SymbolId::new(1));
        let symbol = Symbol::new("FOO", SymbolKind::Bool).with_property(default_to(Expr::yes()).with_visible(guard));
        assert!(!is_default(&symbol));

        let symbol =
            Symbol::new("FOO", SymbolKind::Bool).with_property(default_to(Expr::yes()).with_visible(Expr::yes()));
        assert!(is_default(&symbol));
    }

    #[test]
    fn test_reverse_dependency() {
        assert!(!is_default(&foo().with_rev_dep(Expr::symbol(SymbolId::new(2)))));
        assert!(is_default(&foo().with_rev_dep(Expr::yes())));
    }

    #[test]
    fn test_any_default_suffices() {
        let symbol = Symbol::new("FOO", SymbolKind::Bool)
            .with_property(default_to(Expr::symbol(SymbolId::new(3))))
            .with_property(default_to(Expr::yes()));
        assert!(is_default(&symbol));
    }

    #[test]
    fn test_tautology_is_syntactic() {
        // `y || n` is always true, but not syntactically `y`.
        let value = Expr::yes() | Expr::from(SymbolRef::NO);
        let symbol = Symbol::new("FOO", SymbolKind::Bool).with_property(default_to(value));
        assert!(!is_default(&symbol));
    }
}
