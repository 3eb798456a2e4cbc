use tracing::debug;

use super::{ExistingEntries, Outcome, existing_names};
use crate::{
    document::{Document, Node},
    error::Error,
    layout::{self, Spacing},
    name_map::NameMap,
};

/// Copies the base-language `<string>` entry of every identifier in `map`
/// into `variant`, as placeholders until real translations arrive.
///
/// `base` must already hold the flattened entries; a missing one fails the
/// call before `variant` is touched.
pub fn backfill(
    map: &NameMap,
    base: &Document,
    variant: &mut Document,
    existing: ExistingEntries,
) -> Result<Outcome, Error> {
    let mut outcome = Outcome::default();
    let mut present = existing_names(variant, existing);
    let mut groups = Vec::with_capacity(map.len());

    for (name, identifiers) in map.iter() {
        let mut group = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            let entry = base
                .string_entry(identifier)
                .ok_or_else(|| Error::MissingEntry(identifier.clone()))?;
            if existing == ExistingEntries::Skip && !present.insert(identifier.clone()) {
                outcome.skipped += 1;
                continue;
            }
            group.push(Node::element(entry.clone()));
        }
        debug!(
            array = name,
            language = variant.language_label(),
            entries = group.len(),
            "copied base entries"
        );
        groups.push(group);
    }

    outcome.appended = layout::append_groups(&mut variant.root, groups, Spacing::BACKFILL);
    Ok(outcome)
}
