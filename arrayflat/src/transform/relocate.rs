use tracing::debug;

use super::{Outcome, is_mapped_array};
use crate::{
    document::{Document, ITEM},
    error::Error,
    ident::reference_token,
    layout::{self, Spacing},
    name_map::NameMap,
};

/// Moves every mapped `<string-array>` from `source` to the end of `target`,
/// rewriting each item to reference its flattened entry
/// (`<item>@string/colors_red</item>`).
///
/// `map` must have been built from `source`. Arrays land in `target` in map
/// order, one per line.
pub fn relocate(
    map: &NameMap,
    source: &mut Document,
    target: &mut Document,
) -> Result<Outcome, Error> {
    let language = source.language_label().to_string();
    for (name, identifiers) in map.iter() {
        let array = source
            .string_array_mut(name)
            .ok_or_else(|| Error::MissingArray(name.to_string()))?;

        let mut items = array.elements_mut().filter(|e| e.name == ITEM).peekable();
        for identifier in identifiers {
            match items.next() {
                Some(item) => item.set_text(reference_token(identifier)),
                None => break,
            }
        }
        if items.peek().is_some() {
            return Err(Error::ItemCountMismatch {
                array: name.to_string(),
                language,
                expected: identifiers.len(),
                actual: identifiers.len() + items.count(),
            });
        }
        debug!(array = name, items = identifiers.len(), "rewrote items as references");
    }

    let mut moved = source.root.detach(is_mapped_array(map));
    moved.sort_by_key(|node| {
        node.as_element()
            .and_then(|e| e.resource_name())
            .and_then(|n| map.position(n))
    });
    let removed = moved.len();
    if removed > 0 {
        layout::settle(&mut source.root);
    }

    let groups = moved.into_iter().map(|node| vec![node]).collect();
    let appended = layout::append_groups(&mut target.root, groups, Spacing::ARRAYS);
    Ok(Outcome {
        appended,
        removed,
        ..Default::default()
    })
}
