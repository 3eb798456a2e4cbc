#![forbid(unsafe_code)]
//! Flattens Android `<string-array>` resources into individually addressable
//! `<string>` entries.
//!
//! Every array item gets a stable name derived from its base-language text
//! (`colors` + `Light Blue` → `colors_light_blue`). That name map then drives
//! four rewrites of a `res/` tree:
//!
//! - **extract-base**: append one entry per item to the base arrays document.
//! - **extract-translations**: do the same in every `values-<lang>/` and drop
//!   the arrays there.
//! - **relocate**: move the base arrays into the constants document, items
//!   rewritten as `@string/<name>` references.
//! - **backfill**: copy the base entries into every translation as
//!   placeholders.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use arrayflat::{Mode, ResourceTree, Settings, run};
//!
//! let tree = ResourceTree::new("app/src/main/res", "out");
//! let report = run(Mode::ExtractBase, &tree, &Settings::default())?;
//! println!("wrote {} documents", report.documents.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dispatch;
pub mod document;
pub mod error;
pub mod ident;
pub mod layout;
pub mod name_map;
pub mod traits;
pub mod transform;
pub mod tree;

// Re-export most used types for easy consumption
pub use crate::{
    dispatch::{DocumentReport, Mode, RunReport, Settings, run},
    document::{Document, Element, Node, NodeKind},
    error::Error,
    name_map::NameMap,
    transform::{ExistingEntries, ExtractOptions, Outcome, backfill, extract, relocate},
    tree::ResourceTree,
};
