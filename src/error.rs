use std::io;
use std::path::PathBuf;

use crate::types::{SymbolId, SymbolKind};

/// Errors produced while loading a model or writing constraint output.
///
/// Model-shape anomalies are not errors: they are logged and replaced by a
/// placeholder. Only broken invariants and I/O failures end up here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("can't open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed model: {0}")]
    Json(#[from] serde_json::Error),

    #[error("symbol reference {id} is out of range (table has {len} symbols)")]
    DanglingSymbol { id: SymbolId, len: usize },

    #[error("choice {id} has type {kind}, but a choice can only be bool or tristate")]
    InvalidChoiceType { id: SymbolId, kind: SymbolKind },

    #[error("no rendering rule for expression node in {context}")]
    UnrenderableExpression { context: String },

    #[error("unknown symbol {0}")]
    UnknownSymbol(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
