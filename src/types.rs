//! Type-safe wrappers for symbol identifiers, kinds and flags.
//!
//! The configuration model is produced by an external parser and handed to
//! this crate read-only. These types give the raw parser data a checked shape:
//! symbol ids are distinct from plain integers, the three reserved truth values
//! are a closed enum, and flag words keep their Kconfig bit layout so the
//! structural dump can print them numerically.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// A symbol identifier (0-indexed position in the parser's symbol table).
///
/// Ids are stable for the lifetime of a [`Model`][crate::model::Model] and
/// follow the parser's native declaration order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Creates a new symbol id from a table index.
    pub fn new(index: u32) -> Self {
        SymbolId(index)
    }

    /// Returns the table index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S@{}", self.0)
    }
}

impl From<SymbolId> for u32 {
    fn from(id: SymbolId) -> Self {
        id.0
    }
}

impl From<u32> for SymbolId {
    fn from(index: u32) -> Self {
        SymbolId(index)
    }
}

/// One of the three reserved constant symbols.
///
/// These are sentinel truth values and are never renamed or prefixed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Tristate {
    #[serde(rename = "y")]
    Yes,
    #[serde(rename = "m")]
    Mod,
    #[serde(rename = "n")]
    No,
}

impl Tristate {
    /// The single-letter Kconfig spelling (`y`, `m`, `n`).
    pub fn letter(self) -> &'static str {
        match self {
            Tristate::Yes => "y",
            Tristate::Mod => "m",
            Tristate::No => "n",
        }
    }

    /// Whether this sentinel counts as "true" in constraint output.
    ///
    /// Both `y` and `m` collapse to true; only `n` is false.
    pub fn is_true(self) -> bool {
        !matches!(self, Tristate::No)
    }
}

impl fmt::Display for Tristate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// Declared kind of a symbol.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// Untyped or undeclared (e.g. a constant value like `"foo"` or `42`).
    #[default]
    Unknown,
    Bool,
    Tristate,
    Int,
    Hex,
    String,
}

impl SymbolKind {
    /// `bool` or `tristate`.
    pub fn is_boolean(self) -> bool {
        matches!(self, SymbolKind::Bool | SymbolKind::Tristate)
    }

    /// `int`, `hex` or `string`.
    pub fn is_nonboolean(self) -> bool {
        matches!(self, SymbolKind::Int | SymbolKind::Hex | SymbolKind::String)
    }

    /// Kind token used in `config` declarations of the constraint output.
    ///
    /// Returns `None` for [`SymbolKind::Unknown`], which the extractor skips.
    pub fn constraint_name(self) -> Option<&'static str> {
        match self {
            SymbolKind::Bool => Some("bool"),
            SymbolKind::Tristate => Some("tristate"),
            SymbolKind::Int | SymbolKind::Hex => Some("number"),
            SymbolKind::String => Some("string"),
            SymbolKind::Unknown => None,
        }
    }

    /// Kind token used in `<symbol type=...>` of the structural dump.
    ///
    /// Untyped symbols are dumped as integers.
    pub fn dump_name(self) -> &'static str {
        match self {
            SymbolKind::Bool => "boolean",
            SymbolKind::Tristate => "tristate",
            SymbolKind::Int | SymbolKind::Unknown => "integer",
            SymbolKind::Hex => "hex",
            SymbolKind::String => "string",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Unknown => "unknown",
            SymbolKind::Bool => "bool",
            SymbolKind::Tristate => "tristate",
            SymbolKind::Int => "int",
            SymbolKind::Hex => "hex",
            SymbolKind::String => "string",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Symbol flags, using the Kconfig bit values.
    #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SymbolFlags: u32 {
        const CONST = 0x0001;
        const CHOICE = 0x0010;
        const CHOICEVAL = 0x0020;
        const OPTIONAL = 0x0100;
        const AUTO = 0x1000;
    }
}

bitflags! {
    /// Menu flags, using the Kconfig bit values.
    #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct MenuFlags: u32 {
        const CHANGED = 0x0001;
        const ROOT = 0x0002;
    }
}

/// Kind of a property attached to a symbol.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Prompt,
    Comment,
    Menu,
    Default,
    Choice,
    Select,
    Imply,
    Range,
    Env,
    /// Marks the location where the symbol was declared.
    Symbol,
}

impl PropertyKind {
    /// Property type token used in `<property type=...>` of the structural dump.
    pub fn dump_name(self) -> &'static str {
        match self {
            PropertyKind::Prompt => "prompt",
            PropertyKind::Comment => "comment",
            PropertyKind::Menu => "menu",
            PropertyKind::Default => "default",
            PropertyKind::Choice => "choice",
            // Dump consumers have no notion of weak selects.
            PropertyKind::Select | PropertyKind::Imply => "select",
            PropertyKind::Range => "range",
            PropertyKind::Env => "env",
            PropertyKind::Symbol => "symbol",
        }
    }
}
