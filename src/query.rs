//! Symbol listings and per-symbol dependency queries.

use std::io::Write;

use crate::config::Config;
use crate::defaults::is_default;
use crate::error::{Error, Result};
use crate::model::Model;
use crate::printer::{Printer, Syntax};
use crate::symbol::identifier;
use crate::types::PropertyKind;

/// Every named symbol, in table order.
pub fn configs(model: &Model) -> impl Iterator<Item = &str> + '_ {
    model.named_symbols().map(|(_, name, _)| name)
}

/// Named symbols declared in a Kconfig file (carrying a `symbol` property).
pub fn kconfigs(model: &Model) -> impl Iterator<Item = &str> + '_ {
    model
        .named_symbols()
        .filter(|(_, _, s)| s.properties_of(PropertyKind::Symbol).next().is_some())
        .map(|(_, name, _)| name)
}

/// Named symbols attached to menus, in menu-tree pre-order.
///
/// A symbol appears once per menu entry that declares it.
pub fn menu_symbols(model: &Model) -> impl Iterator<Item = &str> + '_ {
    model
        .menus()
        .filter_map(|menu| menu.symbol)
        .filter_map(move |id| model.symbol(id).named())
}

/// Named symbols classified as defaults, minus the force-off list.
pub fn defaults<'a>(model: &'a Model, config: &'a Config) -> impl Iterator<Item = &'a str> + 'a {
    model
        .named_symbols()
        .filter(|(_, _, s)| is_default(s))
        .filter(move |(_, name, _)| !config.is_forced_off(name))
        .map(|(_, name, _)| name)
}

/// Writes the direct and reverse dependency of `name` in boolean syntax.
///
/// ```text
/// dep CONFIG_FOO ((defined CONFIG_BAR) && !(defined CONFIG_BAZ))
/// rev_dep CONFIG_FOO ((defined CONFIG_QUX))
/// ```
///
/// Absent dependencies print as `(1)`.
pub fn deps<W: Write>(model: &Model, config: &Config, name: &str, out: &mut W) -> Result<()> {
    let id = model.lookup(name).ok_or_else(|| Error::UnknownSymbol(name.to_string()))?;
    let symbol = model.symbol(id);
    let printer = Printer::new(model, config, Syntax::Boolean);
    let ident = identifier(&config.prefix, name);
    writeln!(out, "dep {} ({})", ident, printer.condition(symbol.dir_dep.as_ref()))?;
    if config.reverse_dependencies {
        writeln!(out, "rev_dep {} ({})", ident, printer.condition(symbol.rev_dep.as_ref()))?;
    }
    Ok(())
}
