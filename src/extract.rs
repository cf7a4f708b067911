//! Constraint extraction.
//!
//! The [`Extractor`] turns a [`Model`] into the line-oriented constraint
//! grammar consumed by downstream SAT tooling:
//!
//! ```text
//! config <ID> <bool|tristate|number|string>
//! prompt <ID> (<BOOLEXPR>)
//! def_bool <ID> <BOOLEXPR>|(<BOOLEXPR>)
//! def_nonbool <ID> <EXPR>|(<BOOLEXPR>)
//! bool_choice <ID> <ID> ... |(<BOOLEXPR>)
//! tristate_choice <ID> <ID> ... |(<BOOLEXPR>)
//! dep <ID> (<BOOLEXPR>)
//! select <ID> <ID> (<BOOLEXPR>)
//! rev_dep <ID> (<BOOLEXPR>)
//! ```
//!
//! Extraction runs two passes over the symbol table in declaration order.
//! The first declares every typed symbol together with its prompts and
//! defaults; the second emits choice groups and dependency rules, which may
//! refer to any declared symbol.

use std::io::Write;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Model, Symbol};
use crate::printer::{Printer, Syntax};
use crate::symbol::{identifier, SymbolMode};
use crate::types::{SymbolId, SymbolKind};

pub struct Extractor<'a> {
    model: &'a Model,
    config: &'a Config,
    printer: Printer<'a>,
}

impl<'a> Extractor<'a> {
    pub fn new(model: &'a Model, config: &'a Config) -> Self {
        Self {
            model,
            config,
            printer: Printer::new(model, config, Syntax::Logic),
        }
    }

    /// Writes the full constraint encoding of the model to `out`.
    pub fn extract<W: Write>(&self, out: &mut W) -> Result<()> {
        log::debug!("Extracting constraints for {} symbols", self.model.len());
        self.write_declarations(out)?;
        self.write_dependencies(out)?;
        Ok(())
    }

    fn write_declarations<W: Write>(&self, out: &mut W) -> Result<()> {
        for (_, name, symbol) in self.model.named_symbols() {
            let Some(type_name) = symbol.kind.constraint_name() else {
                log::debug!("Skipping untyped symbol {}", name);
                continue;
            };
            let id = identifier(&self.config.prefix, name);
            writeln!(out, "config {} {}", id, type_name)?;

            for prompt in symbol.prompts() {
                writeln!(out, "prompt {} ({})", id, self.printer.condition(prompt.visible.as_ref()))?;
            }

            let rule = if symbol.kind.is_boolean() {
                "def_bool"
            } else {
                "def_nonbool"
            };
            for default in symbol.defaults() {
                let Some(value) = &default.expr else {
                    continue;
                };
                writeln!(
                    out,
                    "{} {} {}|({})",
                    rule,
                    id,
                    self.printer.render_to_string(value),
                    self.printer.condition(default.visible.as_ref())
                )?;
            }
        }
        Ok(())
    }

    fn write_dependencies<W: Write>(&self, out: &mut W) -> Result<()> {
        for (sym_id, symbol) in self.model.symbols() {
            if symbol.is_choice() {
                self.write_choice(out, sym_id, symbol)?;
            }

            let Some(name) = symbol.named() else {
                continue;
            };
            if symbol.kind == SymbolKind::Unknown {
                continue;
            }
            let id = identifier(&self.config.prefix, name);
            let mut has_dependency = false;

            if let Some(dep) = &symbol.dir_dep {
                has_dependency = true;
                writeln!(out, "dep {} ({})", id, self.printer.render_to_string(dep))?;
            }

            if self.config.reverse_dependencies {
                for select in symbol.selects() {
                    // The selected symbol first, then the selecting one.
                    writeln!(
                        out,
                        "select {} {} ({})",
                        self.printer.condition(select.expr.as_ref()),
                        id,
                        self.printer.condition(select.visible.as_ref())
                    )?;
                }
                if let Some(rev_dep) = &symbol.rev_dep {
                    has_dependency = true;
                    writeln!(out, "rev_dep {} ({})", id, self.printer.render_to_string(rev_dep))?;
                }
            }

            // Numbers and strings always get at least one dependency rule.
            if symbol.kind.is_nonboolean() && !has_dependency {
                writeln!(out, "dep {} (1)", id)?;
            }
        }
        Ok(())
    }

    /// Writes `<kind>_choice <members...>|(<visibility>)`.
    ///
    /// A choice's direct and reverse dependencies are both implied by its
    /// prompt visibility, so the visibility alone is the applicability
    /// condition.
    fn write_choice<W: Write>(&self, out: &mut W, sym_id: SymbolId, symbol: &Symbol) -> Result<()> {
        let optional = self.model.is_optional_choice(symbol);
        let keyword = match (symbol.kind, optional) {
            (SymbolKind::Bool, false) => "bool_choice",
            (SymbolKind::Bool, true) => "bool_opt_choice",
            (SymbolKind::Tristate, false) => "tristate_choice",
            (SymbolKind::Tristate, true) => "tristate_opt_choice",
            (kind, _) => return Err(Error::InvalidChoiceType { id: sym_id, kind }),
        };

        let mut line = String::from(keyword);
        for member in self.model.choice_members(sym_id) {
            line.push(' ');
            line.push_str(&self.printer.symbol(member, SymbolMode::Naked));
        }

        let mut prompts = symbol.prompts();
        let condition = self.printer.condition(prompts.next().and_then(|p| p.visible.as_ref()));
        if prompts.next().is_some() {
            log::warn!("Choice {} has multiple prompts, honoring only the first", sym_id);
        }

        writeln!(out, "{}|({})", line, condition)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::expr::{Expr, SymbolRef};
    use crate::model::{Capabilities, ChoiceMembers, Menu, Property};
    use crate::types::{PropertyKind, SymbolFlags};

    fn id(i: u32) -> SymbolId {
        SymbolId::new(i)
    }

    fn var(i: u32) -> Expr {
        id(i).into()
    }

    fn extract(model: &Model, config: &Config) -> String {
        let mut out = Vec::new();
        Extractor::new(model, config).extract(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn test_prompt_and_default() {
        let model = Model::new(vec![
            Symbol::new("FOO", SymbolKind::Bool)
                .with_property(Property::new(PropertyKind::Prompt).with_text("Foo").with_visible(var(1)))
                .with_property(Property::new(PropertyKind::Default).with_expr(Expr::yes())),
            Symbol::new("BAR", SymbolKind::Bool),
        ]);
        let text = extract(&model, &Config::default());
        assert_eq!(
            lines(&text),
            vec![
                "config CONFIG_FOO bool",
                "prompt CONFIG_FOO (CONFIG_BAR)",
                "def_bool CONFIG_FOO 1|(1)",
                "config CONFIG_BAR bool",
            ]
        );
    }

    #[test]
    fn test_default_guard() {
        let model = Model::new(vec![
            Symbol::new("FOO", SymbolKind::Tristate)
                .with_property(
                    Property::new(PropertyKind::Default)
                        .with_expr(Expr::symbol(SymbolRef::MOD))
                        .with_visible(var(1) & !var(2)),
                )
                .with_property(Property::new(PropertyKind::Default)),
            Symbol::new("A", SymbolKind::Bool),
            Symbol::new("B", SymbolKind::Bool),
        ]);
        let text = extract(&model, &Config::default());
        assert!(text.contains("def_bool CONFIG_FOO 1|(CONFIG_A and  not CONFIG_B)\n"));
        assert_eq!(text.matches("def_bool CONFIG_FOO").count(), 1);
    }

    #[test]
    fn test_nonbool_default() {
        let model = Model::new(vec![
            Symbol::new("N", SymbolKind::Hex)
                .with_property(Property::new(PropertyKind::Default).with_expr(var(1)))
                .with_dir_dep(var(2)),
            Symbol::new("0x10", SymbolKind::Unknown).with_flags(SymbolFlags::CONST),
            Symbol::new("A", SymbolKind::Bool),
        ]);
        let text = extract(&model, &Config::default());
        assert_eq!(
            lines(&text),
            vec![
                "config CONFIG_N number",
                "def_nonbool CONFIG_N \"0x10\"|(1)",
                "config CONFIG_A bool",
                "dep CONFIG_N (CONFIG_A)",
            ]
        );
    }

    #[test]
    fn test_untyped_symbols_skipped() {
        let model = Model::new(vec![
            Symbol::new("GHOST", SymbolKind::Unknown).with_dir_dep(var(1)),
            Symbol::new("A", SymbolKind::Bool),
        ]);
        let text = extract(&model, &Config::default());
        assert_eq!(lines(&text), vec!["config CONFIG_A bool"]);
    }

    #[test]
    fn test_select_and_rev_dep() {
        let model = Model::new(vec![
            Symbol::new("FOO", SymbolKind::Bool).with_property(
                Property::new(PropertyKind::Select)
                    .with_expr(var(2))
                    .with_visible(var(1)),
            ),
            Symbol::new("BAR", SymbolKind::Bool),
            Symbol::new("BAZ", SymbolKind::Bool).with_rev_dep(var(0) & var(1)),
        ]);
        let text = extract(&model, &Config::default());
        assert_eq!(
            lines(&text)[3..],
            [
                "select CONFIG_BAZ CONFIG_FOO (CONFIG_BAR)",
                "rev_dep CONFIG_BAZ (CONFIG_FOO and CONFIG_BAR)",
            ]
        );

        let text = extract(&model, &Config::default().with_reverse_dependencies(false));
        assert!(!text.contains("select"));
        assert!(!text.contains("rev_dep"));
        assert_eq!(lines(&text).len(), 3);
    }

    #[test]
    fn test_nonbool_fallback_dependency() {
        let model = Model::new(vec![
            Symbol::new("S", SymbolKind::String),
            Symbol::new("I", SymbolKind::Int).with_rev_dep(var(2)),
            Symbol::new("B", SymbolKind::Bool),
        ]);
        let text = extract(&model, &Config::default());
        assert!(text.contains("dep CONFIG_S (1)\n"));
        assert!(!text.contains("dep CONFIG_I (1)"));
        assert!(!text.contains("dep CONFIG_B"));

        // Without reverse dependencies the rev_dep no longer counts.
        let text = extract(&model, &Config::default().with_reverse_dependencies(false));
        assert!(text.contains("dep CONFIG_I (1)\n"));
    }

    fn choice_model(kind: SymbolKind, flags: SymbolFlags) -> Model {
        Model::new(vec![
            Symbol::anonymous(kind)
                .with_flags(SymbolFlags::CHOICE | flags)
                .with_property(Property::new(PropertyKind::Prompt).with_text("Pick"))
                .with_property(Property::new(PropertyKind::Choice).with_expr(Expr::list([id(1), id(2)]).unwrap())),
            Symbol::new("A", SymbolKind::Bool)
                .with_flags(SymbolFlags::CHOICEVAL)
                .with_dir_dep(var(0)),
            Symbol::new("B", SymbolKind::Bool)
                .with_flags(SymbolFlags::CHOICEVAL)
                .with_dir_dep(var(0)),
        ])
    }

    #[test]
    fn test_choice() {
        let model = choice_model(SymbolKind::Bool, SymbolFlags::empty());
        let text = extract(&model, &Config::default());
        assert_eq!(
            lines(&text),
            vec![
                "config CONFIG_A bool",
                "config CONFIG_B bool",
                "bool_choice CONFIG_A CONFIG_B|(1)",
                "dep CONFIG_A (1)",
                "dep CONFIG_B (1)",
            ]
        );
    }

    #[test]
    fn test_optional_choice() {
        let model = choice_model(SymbolKind::Tristate, SymbolFlags::OPTIONAL);
        let text = extract(&model, &Config::default());
        assert!(text.contains("tristate_opt_choice CONFIG_A CONFIG_B|(1)\n"));

        let model = model.with_capabilities(Capabilities {
            choice_members: ChoiceMembers::Property,
            optional_choices: false,
        });
        let text = extract(&model, &Config::default());
        assert!(text.contains("tristate_choice CONFIG_A CONFIG_B|(1)\n"));
    }

    #[test]
    fn test_choice_menu_shape() {
        let model = Model::new(vec![
            Symbol::anonymous(SymbolKind::Bool)
                .with_flags(SymbolFlags::CHOICE)
                .with_property(Property::new(PropertyKind::Prompt).with_visible(var(3)))
                .with_property(Property::new(PropertyKind::Prompt).with_visible(var(1))),
            Symbol::new("A", SymbolKind::Bool),
            Symbol::new("B", SymbolKind::Bool),
            Symbol::new("V", SymbolKind::Bool),
        ])
        .with_capabilities(Capabilities {
            choice_members: ChoiceMembers::Menu,
            optional_choices: false,
        })
        .with_root(Menu::default().with_child(Menu::new(Some(id(0))).with_choice_members(vec![id(1), id(2)])));
        let text = extract(&model, &Config::default());
        assert!(text.contains("bool_choice CONFIG_A CONFIG_B|(CONFIG_V)\n"));
    }

    #[test]
    fn test_invalid_choice_type() {
        let model = Model::new(vec![Symbol::anonymous(SymbolKind::Int).with_flags(SymbolFlags::CHOICE)]);
        let mut out = Vec::new();
        let err = Extractor::new(&model, &Config::default()).extract(&mut out).unwrap_err();
        assert!(matches!(err, Error::InvalidChoiceType { kind: SymbolKind::Int, .. }));
    }

    #[test]
    fn test_prefix() {
        let model = Model::new(vec![Symbol::new("X&Y", SymbolKind::String)]);
        let text = extract(&model, &Config::default().with_prefix("K_"));
        assert_eq!(lines(&text), vec!["config K_X_Y string", "dep K_X_Y (1)"]);
    }

    #[test]
    fn test_deterministic() {
        let model = choice_model(SymbolKind::Bool, SymbolFlags::empty());
        let config = Config::default();
        assert_eq!(extract(&model, &config), extract(&model, &config));
    }
}
