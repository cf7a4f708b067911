//! The parsed configuration model.
//!
//! A [`Model`] is built once from the external parser's output and never
//! mutated afterwards. It owns three things:
//!
//! - the **symbol table**, in the parser's native declaration order,
//! - the **menu tree**, rooted at an anonymous root menu,
//! - the **capabilities** of the parser revision that produced it.
//!
//! The on-disk form is JSON:
//!
//! ```json
//! {
//!   "capabilities": { "choice_members": "menu", "optional_choices": false },
//!   "symbols": [
//!     { "name": "FOO", "type": "bool",
//!       "properties": [ { "type": "prompt", "text": "Foo", "visible": { "op": "symbol", "sym": 1 } } ] },
//!     { "name": "BAR", "type": "bool" }
//!   ],
//!   "root": { "children": [ { "symbol": 0 }, { "symbol": 1 } ] }
//! }
//! ```
//!
//! Symbols are referenced by their index in `symbols`; the reserved truth
//! values are referenced as `"y"`, `"m"` and `"n"`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::expr::{Expr, SymbolRef};
use crate::types::{MenuFlags, PropertyKind, SymbolFlags, SymbolId, SymbolKind};

/// An attached fact about a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Value expression (default value, selected symbol, choice members, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expr: Option<Expr>,
    /// Condition under which the property applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<Expr>,
}

impl Property {
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            text: None,
            expr: None,
            visible: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_expr(mut self, expr: Expr) -> Self {
        self.expr = Some(expr);
        self
    }

    pub fn with_visible(mut self, visible: Expr) -> Self {
        self.visible = Some(visible);
        self
    }
}

/// A configuration option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    /// Absent for anonymous symbols (e.g. choice containers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: SymbolKind,
    #[serde(default)]
    pub flags: SymbolFlags,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
    /// Aggregated OR of every `select` pointing at this symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev_dep: Option<Expr>,
    /// Conjunction of the enclosing `depends on` / menu conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir_dep: Option<Expr>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: Some(name.into()),
            kind,
            ..Default::default()
        }
    }

    pub fn anonymous(kind: SymbolKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn with_flags(mut self, flags: SymbolFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_rev_dep(mut self, expr: Expr) -> Self {
        self.rev_dep = Some(expr);
        self
    }

    pub fn with_dir_dep(mut self, expr: Expr) -> Self {
        self.dir_dep = Some(expr);
        self
    }

    /// The symbol's name, if it has a non-empty one.
    pub fn named(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    pub fn is_choice(&self) -> bool {
        self.flags.contains(SymbolFlags::CHOICE)
    }

    pub fn is_const(&self) -> bool {
        self.flags.contains(SymbolFlags::CONST)
    }

    /// Iterates the properties of one kind, in declaration order.
    pub fn properties_of(&self, kind: PropertyKind) -> impl Iterator<Item = &Property> + '_ {
        self.properties.iter().filter(move |p| p.kind == kind)
    }

    pub fn prompts(&self) -> impl Iterator<Item = &Property> + '_ {
        self.properties_of(PropertyKind::Prompt)
    }

    pub fn defaults(&self) -> impl Iterator<Item = &Property> + '_ {
        self.properties_of(PropertyKind::Default)
    }

    pub fn selects(&self) -> impl Iterator<Item = &Property> + '_ {
        self.properties_of(PropertyKind::Select)
    }
}

/// A node of the menu tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub flags: MenuFlags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<SymbolId>,
    /// Accumulated visibility condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dep: Option<Expr>,
    /// Members of the choice declared by this menu (menu-anchored shape).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choice_members: Vec<SymbolId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Menu>,
}

impl Menu {
    pub fn new(symbol: Option<SymbolId>) -> Self {
        Self {
            symbol,
            ..Default::default()
        }
    }

    pub fn with_dep(mut self, dep: Expr) -> Self {
        self.dep = Some(dep);
        self
    }

    pub fn with_choice_members(mut self, members: Vec<SymbolId>) -> Self {
        self.choice_members = members;
        self
    }

    pub fn with_child(mut self, child: Menu) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first walk over this menu's descendants, with nesting events.
    pub fn walk(&self) -> MenuWalk<'_> {
        MenuWalk {
            stack: vec![self.children.iter()],
            pending: None,
        }
    }

    /// Pre-order iterator over this menu's descendants (excluding itself).
    pub fn descendants(&self) -> MenuIter<'_> {
        MenuIter { walk: self.walk() }
    }
}

/// A step of a [`MenuWalk`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WalkEvent<'a> {
    /// A menu, in pre-order.
    Visit(&'a Menu),
    /// Entering the children of the menu just visited.
    Descend,
    /// Leaving a child list. The last event leaves the top-level list.
    Ascend,
}

/// Depth-first pre-order walk over a menu tree, using an explicit stack.
pub struct MenuWalk<'a> {
    stack: Vec<std::slice::Iter<'a, Menu>>,
    pending: Option<&'a Menu>,
}

impl<'a> Iterator for MenuWalk<'a> {
    type Item = WalkEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(menu) = self.pending.take() {
            self.stack.push(menu.children.iter());
            return Some(WalkEvent::Descend);
        }
        let level = self.stack.last_mut()?;
        match level.next() {
            Some(menu) => {
                if !menu.children.is_empty() {
                    self.pending = Some(menu);
                }
                Some(WalkEvent::Visit(menu))
            }
            None => {
                self.stack.pop();
                Some(WalkEvent::Ascend)
            }
        }
    }
}

/// The menus of a [`MenuWalk`], without nesting events.
pub struct MenuIter<'a> {
    walk: MenuWalk<'a>,
}

impl<'a> Iterator for MenuIter<'a> {
    type Item = &'a Menu;

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.find_map(|event| match event {
            WalkEvent::Visit(menu) => Some(menu),
            WalkEvent::Descend | WalkEvent::Ascend => None,
        })
    }
}

/// Where a choice container's members are recorded.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceMembers {
    /// A `choice` property whose expression is a `list` chain.
    #[default]
    Property,
    /// The `choice_members` list of the choice's first menu.
    Menu,
}

/// Structural features of the parser revision that produced a model.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub choice_members: ChoiceMembers,
    /// Whether choices can be optional; newer parsers removed this.
    #[serde(default = "default_optional_choices")]
    pub optional_choices: bool,
}

fn default_optional_choices() -> bool {
    true
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            choice_members: ChoiceMembers::default(),
            optional_choices: default_optional_choices(),
        }
    }
}

/// The read-only configuration model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    capabilities: Capabilities,
    #[serde(default)]
    symbols: Vec<Symbol>,
    #[serde(default)]
    root: Menu,
}

impl Model {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self {
            capabilities: Capabilities::default(),
            symbols,
            root: Menu::default(),
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_root(mut self, root: Menu) -> Self {
        self.root = root;
        self
    }

    /// Parses and validates a model from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let model: Model = serde_json::from_str(text)?;
        model.validate()?;
        Ok(model)
    }

    /// Parses and validates a model from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let model: Model = serde_json::from_reader(BufReader::new(reader))?;
        model.validate()?;
        Ok(model)
    }

    /// Loads a model from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading model from {}", path.display());
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_reader(file)?;
        log::debug!("Loaded {} symbols", model.symbols.len());
        Ok(model)
    }

    /// Checks that every symbol id referenced anywhere is in the table.
    pub fn validate(&self) -> Result<()> {
        let len = self.symbols.len();
        let check = |id: SymbolId| -> Result<()> {
            if id.index() < len {
                Ok(())
            } else {
                Err(Error::DanglingSymbol { id, len })
            }
        };
        let check_expr = |expr: Option<&Expr>| -> Result<()> {
            let mut dangling = None;
            if let Some(expr) = expr {
                expr.for_each_symbol(&mut |sym| {
                    if let SymbolRef::Id(id) = sym {
                        if dangling.is_none() && id.index() >= len {
                            dangling = Some(id);
                        }
                    }
                });
            }
            match dangling {
                Some(id) => Err(Error::DanglingSymbol { id, len }),
                None => Ok(()),
            }
        };

        for symbol in &self.symbols {
            check_expr(symbol.rev_dep.as_ref())?;
            check_expr(symbol.dir_dep.as_ref())?;
            for prop in &symbol.properties {
                check_expr(prop.expr.as_ref())?;
                check_expr(prop.visible.as_ref())?;
            }
        }
        check_expr(self.root.dep.as_ref())?;
        for menu in self.root.descendants() {
            if let Some(id) = menu.symbol {
                check(id)?;
            }
            for &id in &menu.choice_members {
                check(id)?;
            }
            check_expr(menu.dep.as_ref())?;
        }
        Ok(())
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn root(&self) -> &Menu {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the symbol with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range, which [`Model::validate`] rules out
    /// for every id reachable from the model.
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    /// Iterates all symbols in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId::new(i as u32), s))
    }

    /// Iterates named symbols in declaration order.
    pub fn named_symbols(&self) -> impl Iterator<Item = (SymbolId, &str, &Symbol)> + '_ {
        self.symbols().filter_map(|(id, s)| s.named().map(|name| (id, name, s)))
    }

    /// Finds the first non-constant symbol with the given name.
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.named_symbols()
            .find(|(_, n, s)| *n == name && !s.is_const())
            .map(|(id, _, _)| id)
    }

    /// Pre-order walk of the menu tree, excluding the root.
    pub fn menus(&self) -> MenuIter<'_> {
        self.root.descendants()
    }

    /// The first menu (in declaration order) attached to `id`.
    pub fn first_menu(&self, id: SymbolId) -> Option<&Menu> {
        self.menus().find(|m| m.symbol == Some(id))
    }

    /// Ordered members of a choice container.
    ///
    /// Reads either the `choice` property chain or the first menu's member
    /// list, depending on [`Capabilities::choice_members`].
    pub fn choice_members(&self, id: SymbolId) -> Vec<SymbolRef> {
        match self.capabilities.choice_members {
            ChoiceMembers::Property => {
                let mut members = Vec::new();
                let mut cursor = self
                    .symbol(id)
                    .properties_of(PropertyKind::Choice)
                    .next()
                    .and_then(|p| p.expr.as_ref());
                while let Some(Expr::List { sym, next }) = cursor {
                    members.push(*sym);
                    cursor = next.as_deref();
                }
                members
            }
            ChoiceMembers::Menu => self
                .first_menu(id)
                .map(|m| m.choice_members.iter().copied().map(SymbolRef::Id).collect())
                .unwrap_or_default(),
        }
    }

    /// Whether a choice is optional, honoring the parser's capability.
    pub fn is_optional_choice(&self, symbol: &Symbol) -> bool {
        self.capabilities.optional_choices && symbol.flags.contains(SymbolFlags::OPTIONAL)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn id(i: u32) -> SymbolId {
        SymbolId::new(i)
    }

    #[test]
    fn test_from_json() {
        let text = r#"{
            "symbols": [
                { "name": "FOO", "type": "bool",
                  "properties": [ { "type": "prompt", "text": "Foo", "visible": { "op": "symbol", "sym": 1 } } ] },
                { "name": "BAR", "type": "tristate", "flags": "CHOICEVAL" }
            ],
            "root": { "flags": "ROOT", "children": [ { "symbol": 0 }, { "symbol": 1 } ] }
        }"#;
        let model = Model::from_json(text).unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model.capabilities(), &Capabilities::default());
        let foo = model.symbol(id(0));
        assert_eq!(foo.named(), Some("FOO"));
        assert_eq!(foo.prompts().count(), 1);
        assert_eq!(foo.prompts().next().unwrap().visible, Some(Expr::symbol(id(1))));
        assert_eq!(model.symbol(id(1)).flags, SymbolFlags::CHOICEVAL);
        assert_eq!(model.menus().count(), 2);
    }

    #[test]
    fn test_dangling_symbol() {
        let text = r#"{ "symbols": [ { "name": "FOO", "type": "bool", "dir_dep": { "op": "symbol", "sym": 3 } } ] }"#;
        let err = Model::from_json(text).unwrap_err();
        assert!(matches!(err, Error::DanglingSymbol { len: 1, .. }));
    }

    #[test]
    fn test_dangling_menu_symbol() {
        let model = Model::new(vec![]).with_root(Menu::default().with_child(Menu::new(Some(id(0)))));
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_named_and_lookup() {
        let model = Model::new(vec![
            Symbol::anonymous(SymbolKind::Bool),
            Symbol::new("A", SymbolKind::Bool),
            Symbol::new("", SymbolKind::Bool),
            Symbol::new("B", SymbolKind::Unknown).with_flags(SymbolFlags::CONST),
            Symbol::new("B", SymbolKind::Int),
        ]);
        let names: Vec<_> = model.named_symbols().map(|(_, n, _)| n).collect();
        assert_eq!(names, vec!["A", "B", "B"]);
        assert_eq!(model.lookup("B"), Some(id(4)));
        assert_eq!(model.lookup("C"), None);
    }

    #[test]
    fn test_menu_preorder() {
        let root = Menu::default()
            .with_child(
                Menu::new(Some(id(0)))
                    .with_child(Menu::new(Some(id(1))))
                    .with_child(Menu::new(Some(id(2))).with_child(Menu::new(Some(id(3))))),
            )
            .with_child(Menu::new(Some(id(4))));
        let order: Vec<_> = root.descendants().map(|m| m.symbol.unwrap().index()).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);

        let events: Vec<String> = root
            .walk()
            .map(|event| match event {
                WalkEvent::Visit(m) => m.symbol.unwrap().index().to_string(),
                WalkEvent::Descend => "[".to_string(),
                WalkEvent::Ascend => "]".to_string(),
            })
            .collect();
        assert_eq!(events.concat(), "0[12[3]]4]");
    }

    #[test]
    fn test_walk_empty_tree() {
        let menu = Menu::default();
        let events: Vec<_> = menu.walk().collect();
        assert_eq!(events, vec![WalkEvent::Ascend]);
    }

    #[test]
    fn test_choice_members_property_shape() {
        let choice = Symbol::anonymous(SymbolKind::Bool)
            .with_flags(SymbolFlags::CHOICE)
            .with_property(Property::new(PropertyKind::Choice).with_expr(Expr::list([id(1), id(2)]).unwrap()));
        let model = Model::new(vec![
            choice,
            Symbol::new("A", SymbolKind::Bool),
            Symbol::new("B", SymbolKind::Bool),
        ]);
        assert_eq!(
            model.choice_members(id(0)),
            vec![SymbolRef::Id(id(1)), SymbolRef::Id(id(2))]
        );
    }

    #[test]
    fn test_choice_members_menu_shape() {
        let model = Model::new(vec![
            Symbol::anonymous(SymbolKind::Bool).with_flags(SymbolFlags::CHOICE),
            Symbol::new("A", SymbolKind::Bool),
            Symbol::new("B", SymbolKind::Bool),
        ])
        .with_capabilities(Capabilities {
            choice_members: ChoiceMembers::Menu,
            optional_choices: false,
        })
        .with_root(
            Menu::default().with_child(
                Menu::new(Some(id(0)))
                    .with_choice_members(vec![id(2), id(1)])
                    .with_child(Menu::new(Some(id(1))))
                    .with_child(Menu::new(Some(id(2)))),
            ),
        );
        assert_eq!(
            model.choice_members(id(0)),
            vec![SymbolRef::Id(id(2)), SymbolRef::Id(id(1))]
        );
    }

    #[test]
    fn test_optional_choice_capability() {
        let choice = Symbol::anonymous(SymbolKind::Bool).with_flags(SymbolFlags::CHOICE | SymbolFlags::OPTIONAL);
        let model = Model::new(vec![choice.clone()]);
        assert!(model.is_optional_choice(&choice));
        let model = model.with_capabilities(Capabilities {
            choice_members: ChoiceMembers::Menu,
            optional_choices: false,
        });
        assert!(!model.is_optional_choice(&choice));
    }
}
