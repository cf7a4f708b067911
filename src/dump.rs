//! Structural dump of the menu tree.
//!
//! Unlike constraint extraction, the dump keeps every expression verbatim:
//! each compound node is wrapped in its own parentheses, symbols are named by
//! table id (`S@3`) and sentinels by their letter. The output is a markup
//! stream of the form
//!
//! ```text
//! <submenu>
//! <menu flags="0">
//! <symbol type="boolean" flags="0" id="0">
//! <name>FOO</name>
//! <property type="prompt"><text><![CDATA[Foo]]></text><visible><expr>S@1</expr></visible></property>
//! </symbol>
//! <dep>S@1</dep></menu>
//! </submenu>
//! ```

use std::io::Write;

use crate::error::{Error, Result};
use crate::expr::{Expr, SymbolRef};
use crate::model::{ChoiceMembers, Menu, Model, Property, WalkEvent};
use crate::symbol::{dump_token, identifier};
use crate::types::{PropertyKind, SymbolId, SymbolKind};

pub struct Dumper<'a> {
    model: &'a Model,
}

impl<'a> Dumper<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Writes the whole menu tree, depth-first, to `out`.
    pub fn dump<W: Write>(&self, out: &mut W) -> Result<()> {
        log::debug!("Dumping menu tree");
        writeln!(out, "<submenu>")?;
        for event in self.model.root().walk() {
            match event {
                WalkEvent::Visit(menu) => self.dump_menu(out, menu)?,
                WalkEvent::Descend => writeln!(out, "<submenu>")?,
                WalkEvent::Ascend => writeln!(out, "</submenu>")?,
            }
        }
        Ok(())
    }

    fn dump_menu<W: Write>(&self, out: &mut W, menu: &Menu) -> Result<()> {
        writeln!(out, "<menu flags=\"{}\">", menu.flags.bits())?;
        if let Some(id) = menu.symbol {
            self.dump_symbol(out, id)?;
        }
        if let Some(dep) = &menu.dep {
            write!(out, "<dep>{}</dep>", self.expr(dep, "menu dependency")?)?;
        }
        writeln!(out, "</menu>")?;
        Ok(())
    }

    fn dump_symbol<W: Write>(&self, out: &mut W, id: SymbolId) -> Result<()> {
        let symbol = self.model.symbol(id);
        if symbol.is_choice() && !symbol.kind.is_boolean() {
            return Err(Error::InvalidChoiceType { id, kind: symbol.kind });
        }
        if symbol.kind == SymbolKind::Unknown {
            log::warn!("Dumping untyped symbol {} as integer", id);
        }
        writeln!(
            out,
            "<symbol type=\"{}\" flags=\"{}\" id=\"{}\">",
            symbol.kind.dump_name(),
            symbol.flags.bits(),
            id.index()
        )?;
        if let Some(name) = &symbol.name {
            writeln!(out, "<name>{}</name>", identifier("", name))?;
        }

        let mut declaration = None;
        for prop in &symbol.properties {
            if prop.kind == PropertyKind::Symbol {
                declaration = Some(prop);
            }
            self.dump_property(out, prop)?;
        }

        // Menu-anchored choices have no `choice` property to dump; synthesize
        // one from the member list.
        if symbol.is_choice() && self.model.capabilities().choice_members == ChoiceMembers::Menu {
            let members = self.model.choice_members(id);
            write!(out, "<property type=\"choice\"><expr>{}</expr>", self.member_chain(&members))?;
            if let Some(visible) = declaration.and_then(|p| p.visible.as_ref()) {
                write!(out, "<visible><expr>{}</expr></visible>", self.expr(visible, "choice visibility")?)?;
            }
            writeln!(out, "</property>")?;
        }

        writeln!(out, "</symbol>")?;
        Ok(())
    }

    fn dump_property<W: Write>(&self, out: &mut W, prop: &Property) -> Result<()> {
        write!(out, "<property type=\"{}\">", prop.kind.dump_name())?;
        if let Some(text) = &prop.text {
            write!(out, "<text><![CDATA[{}]]></text>", text)?;
        }
        if let Some(expr) = &prop.expr {
            write!(out, "<expr>{}</expr>", self.expr(expr, prop.kind.dump_name())?)?;
        }
        if let Some(visible) = &prop.visible {
            write!(out, "<visible><expr>{}</expr></visible>", self.expr(visible, prop.kind.dump_name())?)?;
        }
        writeln!(out, "</property>")?;
        Ok(())
    }

    /// `(A ^ (B ^ (C)))`, the same nesting a `list` chain dumps as.
    fn member_chain(&self, members: &[SymbolRef]) -> String {
        let mut s = String::new();
        for (i, &member) in members.iter().enumerate() {
            if i > 0 {
                s.push_str(" ^ ");
            }
            s.push('(');
            s.push_str(&dump_token(self.model, member));
        }
        s.extend(std::iter::repeat(')').take(members.len()));
        s
    }

    /// Renders an expression verbatim; `context` names the enclosing element
    /// for error reports.
    pub fn expr(&self, expr: &Expr, context: &str) -> Result<String> {
        let mut s = String::new();
        self.render(expr, &mut s, context)?;
        Ok(s)
    }

    fn render(&self, expr: &Expr, s: &mut String, context: &str) -> Result<()> {
        let token = |sym: SymbolRef| dump_token(self.model, sym);
        match expr {
            Expr::Symbol { sym } => s.push_str(&token(*sym)),
            Expr::Not { expr } => {
                s.push('!');
                self.render(expr, s, context)?;
            }
            Expr::Equal { left, right } => {
                s.push_str(&format!("({}={})", token(*left), token(*right)));
            }
            Expr::Unequal { left, right } => {
                s.push_str(&format!("({}!={})", token(*left), token(*right)));
            }
            Expr::Less { .. } | Expr::LessEqual { .. } | Expr::Greater { .. } | Expr::GreaterEqual { .. } => {
                log::warn!("Ignoring {:?} comparison in {}, dumping y", expr.kind(), context);
                s.push('y');
            }
            Expr::And { left, right } => {
                s.push('(');
                self.render(left, s, context)?;
                s.push_str(" &amp;&amp; ");
                self.render(right, s, context)?;
                s.push(')');
            }
            Expr::Or { left, right } => {
                s.push('(');
                self.render(left, s, context)?;
                s.push_str(" || ");
                self.render(right, s, context)?;
                s.push(')');
            }
            Expr::List { sym, next } => {
                s.push('(');
                s.push_str(&token(*sym));
                if let Some(next) = next {
                    s.push_str(" ^ ");
                    self.render(next, s, context)?;
                }
                s.push(')');
            }
            Expr::Range { low, high } => {
                s.push_str(&format!("[{},{}]", token(*low), token(*high)));
            }
            Expr::Unknown => {
                return Err(Error::UnrenderableExpression {
                    context: context.to_string(),
                });
            }
        }
        Ok(())
    }
}
