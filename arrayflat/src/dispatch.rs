//! The four pipelines the tool can run.
//!
//! Every pipeline starts the same way: the base-language arrays document is
//! loaded and the [`NameMap`] is built from it once. The map is then only
//! read. Documents are loaded fresh on every run; nothing carries over from
//! one run to the next.
//!
//! Writes are not transactional. If a pipeline fails after some documents
//! were written, those stay written.

use std::{fmt, path::PathBuf, str::FromStr};

use serde::Serialize;
use tracing::info;

use crate::{
    document::Document,
    error::Error,
    name_map::NameMap,
    transform::{ExistingEntries, ExtractOptions, Outcome, backfill, extract, relocate},
    tree::ResourceTree,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Add flattened entries to the base arrays document, keeping the arrays.
    ExtractBase,
    /// Replace the arrays of every translation by flattened entries.
    ExtractTranslations,
    /// Move the base arrays to the constants document as `@string/` references.
    Relocate,
    /// Seed every translation with the base-language entries.
    Backfill,
}

impl Mode {
    pub const ALL: [Mode; 4] = [
        Mode::ExtractBase,
        Mode::ExtractTranslations,
        Mode::Relocate,
        Mode::Backfill,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::ExtractBase => "extract-base",
            Mode::ExtractTranslations => "extract-translations",
            Mode::Relocate => "relocate",
            Mode::Backfill => "backfill",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    /// Case-insensitive; `_` and `-` are interchangeable. The names used by
    /// earlier versions of the tool are accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "extract-base" | "extract-english" => Ok(Mode::ExtractBase),
            "extract-translations" => Ok(Mode::ExtractTranslations),
            "relocate" | "move-arrays" => Ok(Mode::Relocate),
            "backfill" | "fill-translations-with-en" => Ok(Mode::Backfill),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

/// File names and policies shared by all modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Document holding the `<string-array>` declarations.
    pub arrays_file: String,
    /// Destination of [`Mode::Relocate`].
    pub constants_file: String,
    pub existing: ExistingEntries,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            arrays_file: "11-arrays.xml".to_string(),
            constants_file: "constants.xml".to_string(),
            existing: ExistingEntries::default(),
        }
    }
}

/// One written (or, in a dry run, would-be-written) document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub language: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub mode: Mode,
    pub arrays: usize,
    pub identifiers: usize,
    pub documents: Vec<DocumentReport>,
}

/// Runs `mode` over `tree`.
pub fn run(mode: Mode, tree: &ResourceTree, settings: &Settings) -> Result<RunReport, Error> {
    let base = tree.load(&settings.arrays_file, None)?;
    let map = NameMap::build(&base)?;
    info!(
        %mode,
        arrays = map.len(),
        identifiers = map.item_count(),
        "built name map"
    );

    let mut report = RunReport {
        mode,
        arrays: map.len(),
        identifiers: map.item_count(),
        documents: Vec::new(),
    };

    match mode {
        Mode::ExtractBase => {
            let mut base = base;
            let options = ExtractOptions {
                remove_source_arrays: false,
                existing: settings.existing,
            };
            let outcome = extract(&mut base, &map, &options)?;
            report.push(tree, &base, &settings.arrays_file, outcome)?;
        }
        Mode::ExtractTranslations => {
            let variants = load_variants(tree, &settings.arrays_file)?;
            for variant in &variants {
                map.check_alignment(variant)?;
            }
            let options = ExtractOptions {
                remove_source_arrays: true,
                existing: settings.existing,
            };
            for mut variant in variants {
                let outcome = extract(&mut variant, &map, &options)?;
                info!(language = %variant.language, appended = outcome.appended, "extracted");
                report.push(tree, &variant, &settings.arrays_file, outcome)?;
            }
        }
        Mode::Relocate => {
            let mut source = base;
            let mut constants = tree.load(&settings.constants_file, None)?;
            let moved = relocate(&map, &mut source, &mut constants)?;
            info!(arrays = moved.appended, "relocated arrays");
            report.push(
                tree,
                &source,
                &settings.arrays_file,
                Outcome {
                    removed: moved.removed,
                    ..Default::default()
                },
            )?;
            report.push(
                tree,
                &constants,
                &settings.constants_file,
                Outcome {
                    appended: moved.appended,
                    ..Default::default()
                },
            )?;
        }
        Mode::Backfill => {
            if let Some(missing) = map.identifiers().find(|id| !base.has_string_entry(id)) {
                return Err(Error::MissingEntry(missing.to_string()));
            }
            for mut variant in load_variants(tree, &settings.arrays_file)? {
                let outcome = backfill(&map, &base, &mut variant, settings.existing)?;
                info!(language = %variant.language, appended = outcome.appended, "backfilled");
                report.push(tree, &variant, &settings.arrays_file, outcome)?;
            }
        }
    }

    Ok(report)
}

/// Every discovered translation of `file`, loaded before anything is written.
fn load_variants(tree: &ResourceTree, file: &str) -> Result<Vec<Document>, Error> {
    tree.languages()?
        .iter()
        .map(|lang| tree.load(file, Some(lang)))
        .collect()
}

impl RunReport {
    fn push(
        &mut self,
        tree: &ResourceTree,
        document: &Document,
        file: &str,
        outcome: Outcome,
    ) -> Result<(), Error> {
        let lang = Some(document.language.as_str()).filter(|l| !l.is_empty());
        let path = tree.store(document, file, lang)?;
        self.documents.push(DocumentReport {
            language: document.language_label().to_string(),
            path,
            outcome,
        });
        Ok(())
    }

    /// Pretty JSON for `--report-json`.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
