use std::collections::HashSet;

use tracing::debug;

use super::{ExistingEntries, Outcome, existing_names, is_mapped_array};
use crate::{
    document::{Document, Element, ITEM, Node, STRING},
    error::Error,
    layout::{self, Spacing},
    name_map::{NameMap, array_name},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractOptions {
    /// Delete the mapped `<string-array>` declarations once flattened.
    pub remove_source_arrays: bool,
    pub existing: ExistingEntries,
}

/// Appends a `<string>` entry for every item of every `<string-array>` in
/// `document`, named after the item's position in `map`.
///
/// Entries keep the array order and, inside an array, the item order. Each
/// array's entries form a block separated from the next by an empty line.
/// An array unknown to the map, or with more items than the map has
/// identifiers for, fails the whole call.
///
/// With [`ExistingEntries::Skip`], an entry already in the document is not
/// appended again. When the arrays are removed as well, the existing entry
/// takes the item's content instead, so no item text is lost.
pub fn extract(
    document: &mut Document,
    map: &NameMap,
    options: &ExtractOptions,
) -> Result<Outcome, Error> {
    let mut outcome = Outcome::default();
    let present = existing_names(document, options.existing);
    let mut queued = HashSet::new();
    let mut replacements: Vec<(String, Element)> = Vec::new();
    let mut groups = Vec::new();

    for array in document.string_arrays() {
        let name = array_name(array)?;
        let identifiers = map.get(name).ok_or_else(|| Error::UnknownArray {
            array: name.to_string(),
            language: document.language_label().to_string(),
        })?;

        let items: Vec<&Element> = array.elements_named(ITEM).collect();
        if items.len() > identifiers.len() {
            return Err(Error::ItemCountMismatch {
                array: name.to_string(),
                language: document.language_label().to_string(),
                expected: identifiers.len(),
                actual: items.len(),
            });
        }

        let mut group = Vec::with_capacity(items.len());
        for (item, identifier) in items.into_iter().zip(identifiers) {
            if options.existing == ExistingEntries::Skip {
                if !queued.insert(identifier.as_str()) {
                    debug!(entry = %identifier, "entry already queued, not extracting again");
                    outcome.skipped += 1;
                    continue;
                }
                if present.contains(identifier) {
                    // The array goes away, so its item is the text to keep.
                    if options.remove_source_arrays {
                        replacements.push((identifier.clone(), item.clone()));
                    } else {
                        debug!(entry = %identifier, "entry already present, not extracting again");
                        outcome.skipped += 1;
                    }
                    continue;
                }
            }
            let mut entry = Element::string_entry(identifier.as_str());
            entry.copy_content_from(item);
            group.push(Node::element(entry));
        }
        debug!(array = name, entries = group.len(), "flattened string-array");
        groups.push(group);
    }

    for (identifier, item) in replacements {
        if let Some(entry) = document.root.find_mut(STRING, &identifier) {
            debug!(entry = %identifier, "overwriting existing entry with array item");
            entry.copy_content_from(&item);
            outcome.replaced += 1;
        }
    }

    if options.remove_source_arrays {
        outcome.removed = document.root.detach(is_mapped_array(map)).len();
        if outcome.removed > 0 {
            layout::settle(&mut document.root);
        }
    }

    outcome.appended = layout::append_groups(&mut document.root, groups, Spacing::ENTRIES);
    Ok(outcome)
}
