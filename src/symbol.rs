//! Symbol classification: how a symbol reference prints.
//!
//! Every printing path starts by sorting a reference into one of four
//! classes. Sentinels and anonymous symbols collapse to truth literals, untyped
//! symbols are opaque values, and everything else is a prefixed variable.

use crate::expr::SymbolRef;
use crate::model::Model;
use crate::types::{SymbolFlags, SymbolKind};

/// Printable identity of a symbol reference in constraint output.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SymbolClass<'a> {
    /// `y`, `m`, or an anonymous symbol.
    True,
    /// `n`.
    False,
    /// An untyped symbol, treated as an opaque value.
    Opaque(&'a str),
    /// A typed, named configuration variable.
    Variable(&'a str),
}

/// Rendering strength of a variable reference.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SymbolMode {
    /// Standalone reference used as an implicit boolean test.
    Defined,
    /// Operand of an explicit comparison.
    Naked,
}

pub fn classify(model: &Model, sym: SymbolRef) -> SymbolClass<'_> {
    match sym {
        SymbolRef::Const(t) if t.is_true() => SymbolClass::True,
        SymbolRef::Const(_) => SymbolClass::False,
        SymbolRef::Id(id) => {
            let symbol = model.symbol(id);
            match symbol.named() {
                None => SymbolClass::True,
                Some(name) if symbol.kind == SymbolKind::Unknown => SymbolClass::Opaque(name),
                Some(name) => SymbolClass::Variable(name),
            }
        }
    }
}

/// `<prefix><name>`, with `&` replaced so the downstream grammar stays intact.
pub fn identifier(prefix: &str, name: &str) -> String {
    let mut id = String::with_capacity(prefix.len() + name.len());
    id.push_str(prefix);
    id.extend(name.chars().map(|c| if c == '&' { '_' } else { c }));
    id
}

/// Token for a symbol reference in the structural dump.
///
/// Unlike constraint output this keeps sentinels as letters and names table
/// symbols by id, so the dump can be re-linked to `<symbol id=...>` blocks.
pub fn dump_token(model: &Model, sym: SymbolRef) -> String {
    match sym {
        SymbolRef::Const(t) => t.letter().to_string(),
        SymbolRef::Id(id) => {
            let symbol = model.symbol(id);
            if symbol.is_const() || symbol.kind == SymbolKind::Unknown {
                format!("'{}'", identifier("", symbol.name.as_deref().unwrap_or_default()))
            } else if symbol.flags.contains(SymbolFlags::AUTO) && !symbol.is_choice() && symbol.name.is_none() {
                "IGNORE".to_string()
            } else {
                id.to_string()
            }
        }
    }
}
