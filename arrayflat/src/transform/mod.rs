//! Tree rewrites driven by a [`NameMap`].
//!
//! - [`extract`]: one `<string>` entry per array item, arrays optionally removed.
//! - [`relocate`]: arrays moved to the constants document, items turned into
//!   `@string/` references.
//! - [`backfill`]: base-language entries copied into a translation.
//!
//! Every transformer edits the tree first and fixes whitespace once at the
//! end through [`crate::layout`].

mod backfill;
mod extract;
mod relocate;

use std::collections::HashSet;

use serde::Serialize;

use crate::{
    document::{Document, Element, STRING, STRING_ARRAY},
    name_map::NameMap,
};

pub use backfill::backfill;
pub use extract::{ExtractOptions, extract};
pub use relocate::relocate;

/// What to do when the destination already holds an entry of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistingEntries {
    /// Do not append another entry. The existing one is kept as is, unless
    /// extraction removes the array it came from: then the item's content
    /// overwrites it.
    #[default]
    Skip,
    /// Append anyway, producing a second entry with the same name.
    Duplicate,
}

/// Counts reported by a transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Outcome {
    /// Nodes appended to the destination document.
    pub appended: usize,
    /// Entries not appended because they already existed.
    pub skipped: usize,
    /// Existing entries overwritten with the content of the array item they
    /// stand for, because that array is being removed.
    pub replaced: usize,
    /// Array declarations removed from the source document.
    pub removed: usize,
}

/// Names of the `<string>` entries already present, when they matter.
fn existing_names(document: &Document, policy: ExistingEntries) -> HashSet<String> {
    match policy {
        ExistingEntries::Skip => document
            .root
            .elements_named(STRING)
            .filter_map(Element::resource_name)
            .map(str::to_string)
            .collect(),
        ExistingEntries::Duplicate => HashSet::new(),
    }
}

/// `true` for `<string-array>` declarations the map knows about.
fn is_mapped_array(map: &NameMap) -> impl Fn(&Element) -> bool + '_ {
    move |e| e.name == STRING_ARRAY && e.resource_name().is_some_and(|n| map.contains_array(n))
}
