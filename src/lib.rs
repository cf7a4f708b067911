//! # kclause: Kconfig models as boolean constraints
//!
//! **`kclause`** compiles a parsed Kconfig feature model into a compact, line-oriented
//! **constraint encoding** for SAT/#SAT tooling, and into a **structural dump** that keeps
//! the full parse-tree shape for debugging.
//!
//! ## What goes in
//!
//! The model is produced by an external Kconfig parser and loaded from JSON
//! (see [`model`] for the format). It is read-only: nothing in this crate ever mutates it.
//!
//! ## What comes out
//!
//! ```text
//! config CONFIG_FOO bool
//! prompt CONFIG_FOO (CONFIG_BAR)
//! def_bool CONFIG_FOO 1|(1)
//! bool_choice CONFIG_A CONFIG_B|(1)
//! dep CONFIG_X (1)
//! ```
//!
//! Every expression is printed with the fewest parentheses the operator
//! precedence allows, and comparisons against `y`/`m`/`n` collapse to plain variable tests.
//!
//! ## Basic Usage
//!
//! ```rust
//! use kclause::config::Config;
//! use kclause::extract::Extractor;
//! use kclause::model::Model;
//!
//! let model = Model::from_json(r#"{
//!     "symbols": [
//!         { "name": "FOO", "type": "bool",
//!           "properties": [
//!             { "type": "prompt", "text": "Foo", "visible": { "op": "symbol", "sym": 1 } },
//!             { "type": "default", "expr": { "op": "symbol", "sym": "y" } }
//!           ] },
//!         { "name": "BAR", "type": "bool" }
//!     ]
//! }"#)?;
//!
//! let mut out = Vec::new();
//! Extractor::new(&model, &Config::default()).extract(&mut out)?;
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "config CONFIG_FOO bool\n\
//!      prompt CONFIG_FOO (CONFIG_BAR)\n\
//!      def_bool CONFIG_FOO 1|(1)\n\
//!      config CONFIG_BAR bool\n"
//! );
//! # Ok::<(), kclause::Error>(())
//! ```
//!
//! ## Core Components
//!
//! - **[`printer`]**: Precedence-aware expression rendering, in keyword or C-preprocessor syntax.
//! - **[`extract`]**: The two-pass constraint extractor.
//! - **[`dump`]**: The structural dumper.
//! - **[`action`]**: The actions of the `kextractor` command line tool.

pub mod action;
pub mod config;
pub mod defaults;
pub mod dump;
pub mod error;
pub mod expr;
pub mod extract;
pub mod model;
pub mod precedence;
pub mod printer;
pub mod query;
pub mod symbol;
pub mod types;

pub use error::{Error, Result};
