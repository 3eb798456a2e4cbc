//! The array name → derived identifiers map every transformer works from.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::{
    document::{Document, Element, ITEM},
    error::Error,
    ident::derive_identifier,
};

/// For every base-language `<string-array>`, the identifiers of its items in
/// positional order. Arrays keep the order in which they appear in the base
/// document.
///
/// The map is immutable once built; transformers only read from it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct NameMap {
    arrays: IndexMap<String, Vec<String>>,
}

impl NameMap {
    /// Derives the map from the unqualified base-language arrays document.
    ///
    /// Fails when two items, in the same array or in different ones, derive
    /// the same identifier. Items without letters or digits derive
    /// `{array}_`, so two of them in one array clash.
    pub fn build(base: &Document) -> Result<Self, Error> {
        let mut arrays: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut owners: HashMap<String, String> = HashMap::new();

        for array in base.string_arrays() {
            let array_name = array_name(array)?;
            if arrays.contains_key(array_name) {
                return Err(Error::malformed(format!(
                    "string-array `{array_name}` is declared twice"
                )));
            }

            let mut identifiers = Vec::new();
            for item in array.elements_named(ITEM) {
                let identifier = derive_identifier(array_name, &item.text_content());
                if let Some(first) = owners.insert(identifier.clone(), array_name.to_string()) {
                    return Err(Error::DuplicateIdentifier {
                        identifier,
                        first,
                        second: array_name.to_string(),
                    });
                }
                identifiers.push(identifier);
            }

            debug!(array = array_name, items = identifiers.len(), "mapped string-array");
            arrays.insert(array_name.to_string(), identifiers);
        }

        Ok(NameMap { arrays })
    }

    /// Identifiers for `array`, one per base item.
    pub fn get(&self, array: &str) -> Option<&[String]> {
        self.arrays.get(array).map(Vec::as_slice)
    }

    pub fn contains_array(&self, array: &str) -> bool {
        self.arrays.contains_key(array)
    }

    /// Arrays and their identifiers in base-document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.arrays
            .iter()
            .map(|(name, ids)| (name.as_str(), ids.as_slice()))
    }

    pub fn array_names(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(String::as_str)
    }

    /// Every identifier, array by array, item by item.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.arrays.values().flatten().map(String::as_str)
    }

    /// Number of arrays.
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Number of identifiers over all arrays.
    pub fn item_count(&self) -> usize {
        self.arrays.values().map(Vec::len).sum()
    }

    /// Position of `array` in base-document order.
    pub fn position(&self, array: &str) -> Option<usize> {
        self.arrays.get_index_of(array)
    }

    /// Checks that every `<string-array>` of `document` is known and has as
    /// many items as its base-language counterpart.
    ///
    /// Arrays the document lacks are fine: a translation may be incomplete.
    pub fn check_alignment(&self, document: &Document) -> Result<(), Error> {
        let language = document.language_label();
        for array in document.string_arrays() {
            let name = array_name(array)?;
            let expected = self
                .get(name)
                .ok_or_else(|| Error::UnknownArray {
                    array: name.to_string(),
                    language: language.to_string(),
                })?
                .len();
            let actual = array.elements_named(ITEM).count();
            if actual != expected {
                return Err(Error::ItemCountMismatch {
                    array: name.to_string(),
                    language: language.to_string(),
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}

pub(crate) fn array_name(array: &Element) -> Result<&str, Error> {
    array
        .resource_name()
        .ok_or_else(|| Error::malformed("string-array tag missing 'name'"))
}
