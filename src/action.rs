//! Top-level actions of the `kextractor` tool.

use std::io::Write;

use crate::config::Config;
use crate::dump::Dumper;
use crate::error::Result;
use crate::extract::Extractor;
use crate::model::Model;
use crate::query;

/// What to write for a loaded model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Every named symbol.
    Configs,
    /// Named symbols declared in a Kconfig file.
    Kconfigs,
    /// Named symbols attached to menus.
    MenuSymbols,
    /// Invisible symbols that default to on.
    Defaults,
    /// The full constraint encoding.
    Extract,
    /// Direct and reverse dependency of one symbol.
    Deps(String),
    /// The structural dump of the menu tree.
    Dump,
}

impl Action {
    pub fn run<W: Write>(&self, model: &Model, config: &Config, out: &mut W) -> Result<()> {
        log::debug!("Running {:?}", self);
        match self {
            Action::Configs => write_names(out, query::configs(model)),
            Action::Kconfigs => write_names(out, query::kconfigs(model)),
            Action::MenuSymbols => write_names(out, query::menu_symbols(model)),
            Action::Defaults => write_names(out, query::defaults(model, config)),
            Action::Extract => Extractor::new(model, config).extract(out),
            Action::Deps(name) => query::deps(model, config, name, out),
            Action::Dump => Dumper::new(model).dump(out),
        }
    }
}

fn write_names<'a, W: Write>(out: &mut W, names: impl Iterator<Item = &'a str>) -> Result<()> {
    for name in names {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}
