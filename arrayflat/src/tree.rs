//! The `res/` directory: where documents are read from and written to.
//!
//! Input and output mirror each other:
//! `<root>/values/<file>` holds the base language and
//! `<root>/values-<lang>/<file>` one translation each.

use std::{
    io,
    path::{Path, PathBuf},
};

use glob::Pattern;
use tracing::{debug, info};

use crate::{document::Document, error::Error, traits::Parser};

/// Directory of the base language.
pub const BASE_DIR: &str = "values";

/// `values-*` directories that are device or orientation qualifiers rather
/// than languages.
pub const DEFAULT_EXCLUDED: [&str; 3] = ["values-v21", "values-sw600dp", "values-land"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTree {
    input: PathBuf,
    output: PathBuf,
    excluded: Vec<String>,
    dry_run: bool,
}

impl ResourceTree {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        ResourceTree {
            input: input.into(),
            output: output.into(),
            excluded: DEFAULT_EXCLUDED.iter().map(|d| d.to_string()).collect(),
            dry_run: false,
        }
    }

    /// Adds a directory name (e.g. `values-night`) to skip during discovery.
    pub fn with_excluded(mut self, dir: impl Into<String>) -> Self {
        let dir = dir.into();
        if !self.excluded.contains(&dir) {
            self.excluded.push(dir);
        }
        self
    }

    /// When set, [`ResourceTree::store`] reports paths without writing.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// `<root>/values[-<lang>]/<file>`
    pub fn document_path(root: &Path, file: &str, lang: Option<&str>) -> PathBuf {
        let dir = match lang {
            Some(lang) => format!("{BASE_DIR}-{lang}"),
            None => BASE_DIR.to_string(),
        };
        root.join(dir).join(file)
    }

    /// Reads `file` of the base language (`None`) or of a translation.
    pub fn load(&self, file: &str, lang: Option<&str>) -> Result<Document, Error> {
        let path = Self::document_path(&self.input, file, lang);
        let mut document = Document::read_from(&path).map_err(|e| match e {
            Error::Io(err) => Error::Io(io::Error::new(
                err.kind(),
                format!("{}: {err}", path.display()),
            )),
            other => other,
        })?;
        document.language = lang.unwrap_or_default().to_string();
        Ok(document)
    }

    /// Writes `document` to the output tree and returns the path used.
    pub fn store(&self, document: &Document, file: &str, lang: Option<&str>) -> Result<PathBuf, Error> {
        let path = Self::document_path(&self.output, file, lang);
        if self.dry_run {
            info!(path = %path.display(), "dry run, not writing");
        } else {
            document.write_to(&path)?;
        }
        Ok(path)
    }

    /// Language suffixes of the `values-*` directories under the input root,
    /// minus the excluded qualifiers, sorted.
    pub fn languages(&self) -> Result<Vec<String>, Error> {
        if !self.input.is_dir() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("input directory not found: {}", self.input.display()),
            )));
        }

        let root = Pattern::escape(&self.input.to_string_lossy());
        let pattern = format!("{root}/{BASE_DIR}-*");
        let mut languages = Vec::new();
        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(io::Error::from)?;
            if !path.is_dir() {
                continue;
            }
            let Some(dir) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if self.excluded.iter().any(|e| e == dir) {
                debug!(dir, "skipping excluded qualifier");
                continue;
            }
            if let Some(lang) = dir.strip_prefix(BASE_DIR).and_then(|s| s.strip_prefix('-')) {
                languages.push(lang.to_string());
            }
        }
        languages.sort();
        debug!(?languages, "discovered languages");
        Ok(languages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_dirs(root: &Path, dirs: &[&str]) {
        for dir in dirs {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
    }

    #[test]
    fn test_document_path() {
        let root = Path::new("res");
        assert_eq!(
            ResourceTree::document_path(root, "11-arrays.xml", None),
            Path::new("res/values/11-arrays.xml")
        );
        assert_eq!(
            ResourceTree::document_path(root, "11-arrays.xml", Some("fr")),
            Path::new("res/values-fr/11-arrays.xml")
        );
    }

    #[test]
    fn test_languages_skip_excluded_qualifiers() {
        let temp_dir = TempDir::new().unwrap();
        make_dirs(
            temp_dir.path(),
            &["values", "values-fr", "values-v21", "values-land", "values-de"],
        );
        let tree = ResourceTree::new(temp_dir.path(), "out");
        assert_eq!(tree.languages().unwrap(), vec!["de", "fr"]);
    }

    #[test]
    fn test_languages_ignore_files_and_extra_exclusions() {
        let temp_dir = TempDir::new().unwrap();
        make_dirs(temp_dir.path(), &["values", "values-es", "values-night"]);
        fs::write(temp_dir.path().join("values-notes.txt"), "x").unwrap();
        let tree = ResourceTree::new(temp_dir.path(), "out").with_excluded("values-night");
        assert_eq!(tree.languages().unwrap(), vec!["es"]);
    }

    #[test]
    fn test_languages_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let tree = ResourceTree::new(temp_dir.path().join("nope"), "out");
        assert!(matches!(tree.languages(), Err(Error::Io(_))));
    }

    #[test]
    fn test_load_sets_language_and_store_creates_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("res");
        make_dirs(&input, &["values-fr"]);
        fs::write(
            input.join("values-fr/11-arrays.xml"),
            "<resources>\n    <string name=\"a\">A</string>\n</resources>\n",
        )
        .unwrap();

        let output = temp_dir.path().join("out");
        let tree = ResourceTree::new(&input, &output);
        let doc = tree.load("11-arrays.xml", Some("fr")).unwrap();
        assert_eq!(doc.language, "fr");

        let written = tree.store(&doc, "11-arrays.xml", Some("fr")).unwrap();
        assert_eq!(written, output.join("values-fr/11-arrays.xml"));
        assert_eq!(
            fs::read_to_string(written).unwrap(),
            "<resources>\n    <string name=\"a\">A</string>\n</resources>\n"
        );
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let tree = ResourceTree::new(temp_dir.path(), "out");
        let err = tree.load("constants.xml", None).unwrap_err();
        assert!(err.to_string().contains("constants.xml"));
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out");
        let tree = ResourceTree::new(temp_dir.path(), &output).with_dry_run(true);
        assert!(tree.is_dry_run());
        let doc = Document::new();
        let path = tree.store(&doc, "11-arrays.xml", None).unwrap();
        assert!(!path.exists());
        assert!(!output.exists());
    }
}
