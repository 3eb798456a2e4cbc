use arrayflat::document::{ITEM, STRING};
use arrayflat::traits::Parser;
use arrayflat::{Document, Error, ExistingEntries, Mode, NameMap, ResourceTree, Settings, run};
use indoc::indoc;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const BASE_ARRAYS: &str = indoc! {r#"
    <?xml version="1.0" encoding="utf-8"?>
    <!-- Arrays shown in the settings screen -->
    <resources>
        <string name="settings_title">Settings</string>

        <string-array name="colors">
            <item>Red</item>
            <item>Light Blue</item>
        </string-array>

        <string-array name="refresh_intervals">
            <item>Every 15 minutes</item>
            <item>Hourly</item>
            <item>Never</item>
        </string-array>
    </resources>
"#};

const CONSTANTS: &str = indoc! {r#"
    <?xml version="1.0" encoding="utf-8"?>
    <resources>
        <string name="app_id" translatable="false">demo</string>
    </resources>
"#};

fn variant_arrays(colors: [&str; 2], intervals: [&str; 3]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources>\n    \
         <string-array name=\"colors\">\n        <item>{}</item>\n        <item>{}</item>\n    </string-array>\n\n    \
         <string-array name=\"refresh_intervals\">\n        <item>{}</item>\n        <item>{}</item>\n        <item>{}</item>\n    </string-array>\n\
         </resources>\n",
        colors[0], colors[1], intervals[0], intervals[1], intervals[2]
    )
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn res_tree(temp_dir: &TempDir) -> PathBuf {
    let res = temp_dir.path().join("res");
    write(&res, "values/11-arrays.xml", BASE_ARRAYS);
    write(&res, "values/constants.xml", CONSTANTS);
    write(
        &res,
        "values-fr/11-arrays.xml",
        &variant_arrays(["Rouge", "Bleu clair"], ["Tous les quarts d'heure", "Toutes les heures", "Jamais"]),
    );
    write(
        &res,
        "values-de/11-arrays.xml",
        &variant_arrays(["Rot", "Hellblau"], ["Alle 15 Minuten", "Stündlich", "Nie"]),
    );
    write(&res, "values-land/dimens.xml", "<resources/>\n");
    write(&res, "values-sw600dp/dimens.xml", "<resources/>\n");
    res
}

fn read(path: &Path) -> Document {
    Document::read_from(path).unwrap()
}

#[test]
fn test_languages_follow_directory_layout() {
    let temp_dir = TempDir::new().unwrap();
    let res = res_tree(&temp_dir);
    write(&res, "values-v21/styles.xml", "<resources/>\n");

    let tree = ResourceTree::new(&res, temp_dir.path().join("out"));
    assert_eq!(tree.languages().unwrap(), vec!["de", "fr"]);
}

#[test]
fn test_extract_base_keeps_arrays_and_adds_entries() {
    let temp_dir = TempDir::new().unwrap();
    let res = res_tree(&temp_dir);
    let out = temp_dir.path().join("out");

    let report = run(Mode::ExtractBase, &ResourceTree::new(&res, &out), &Settings::default()).unwrap();
    assert_eq!(report.arrays, 2);
    assert_eq!(report.identifiers, 5);
    assert_eq!(report.documents.len(), 1);
    assert_eq!(report.documents[0].language, "base");
    assert_eq!(report.documents[0].outcome.appended, 5);

    let doc = read(&out.join("values/11-arrays.xml"));
    assert_eq!(doc.string_arrays().count(), 2);
    assert_eq!(doc.root.elements_named(STRING).count(), 6);
    assert_eq!(
        doc.string_entry("refresh_intervals_every_15_minutes").unwrap().text,
        "Every 15 minutes"
    );

    let text = fs::read_to_string(out.join("values/11-arrays.xml")).unwrap();
    assert!(text.contains("<!-- Arrays shown in the settings screen -->\n<resources>"));
    assert!(text.ends_with("<string name=\"refresh_intervals_never\">Never</string>\n\n</resources>\n"));
}

#[test]
fn test_extract_translations_uses_base_identifiers() {
    let temp_dir = TempDir::new().unwrap();
    let res = res_tree(&temp_dir);
    let out = temp_dir.path().join("out");

    let report = run(
        Mode::ExtractTranslations,
        &ResourceTree::new(&res, &out),
        &Settings::default(),
    )
    .unwrap();
    let languages: Vec<_> = report.documents.iter().map(|d| d.language.as_str()).collect();
    assert_eq!(languages, vec!["de", "fr"]);

    let fr = read(&out.join("values-fr/11-arrays.xml"));
    assert_eq!(fr.string_arrays().count(), 0);
    assert_eq!(fr.string_entry("colors_light_blue").unwrap().text, "Bleu clair");
    assert_eq!(
        fr.string_entry("refresh_intervals_every_15_minutes").unwrap().text,
        "Tous les quarts d'heure"
    );
    let de = read(&out.join("values-de/11-arrays.xml"));
    assert_eq!(de.string_entry("refresh_intervals_hourly").unwrap().text, "Stündlich");

    assert!(!out.join("values").exists());
    assert!(!out.join("values-land").exists());
}

#[test]
fn test_extract_translations_fails_fast_on_misaligned_arrays() {
    let temp_dir = TempDir::new().unwrap();
    let res = res_tree(&temp_dir);
    write(
        &res,
        "values-fr/11-arrays.xml",
        &variant_arrays(["Rouge", "Bleu clair"], ["Jamais", "Jamais", "Jamais"])
            .replace("        <item>Bleu clair</item>\n", ""),
    );
    let out = temp_dir.path().join("out");

    let err = run(
        Mode::ExtractTranslations,
        &ResourceTree::new(&res, &out),
        &Settings::default(),
    )
    .unwrap_err();
    match err {
        Error::ItemCountMismatch {
            array,
            language,
            expected,
            actual,
        } => {
            assert_eq!(array, "colors");
            assert_eq!(language, "fr");
            assert_eq!(expected, 2);
            assert_eq!(actual, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    // `de` sorts first but is not written either.
    assert!(!out.exists());
}

#[test]
fn test_relocate_moves_arrays_as_references() {
    let temp_dir = TempDir::new().unwrap();
    let res = res_tree(&temp_dir);
    let out = temp_dir.path().join("out");
    let map = NameMap::build(&read(&res.join("values/11-arrays.xml"))).unwrap();

    let report = run(Mode::Relocate, &ResourceTree::new(&res, &out), &Settings::default()).unwrap();
    assert_eq!(report.documents.len(), 2);
    assert_eq!(report.documents[0].outcome.removed, 2);
    assert_eq!(report.documents[1].outcome.appended, 2);

    let arrays = read(&out.join("values/11-arrays.xml"));
    assert_eq!(arrays.string_arrays().count(), 0);
    assert!(arrays.has_string_entry("settings_title"));

    let constants = read(&out.join("values/constants.xml"));
    assert!(constants.has_string_entry("app_id"));
    for (name, identifiers) in map.iter() {
        let array = constants.string_array(name).unwrap();
        let items: Vec<String> = array.elements_named(ITEM).map(|i| i.text.clone()).collect();
        let expected: Vec<String> = identifiers.iter().map(|id| format!("@string/{id}")).collect();
        assert_eq!(items, expected);
    }

    let text = fs::read_to_string(out.join("values/11-arrays.xml")).unwrap();
    assert!(text.ends_with("<string name=\"settings_title\">Settings</string>\n\n</resources>\n"));
}

#[test]
fn test_full_workflow_backfills_translations() {
    let temp_dir = TempDir::new().unwrap();
    let res = res_tree(&temp_dir);
    let staged = temp_dir.path().join("staged");
    let out = temp_dir.path().join("out");

    run(Mode::ExtractBase, &ResourceTree::new(&res, &staged), &Settings::default()).unwrap();
    // A fresh translation with nothing translated yet.
    write(&staged, "values-it/11-arrays.xml", "<resources>\n</resources>\n");

    let report = run(Mode::Backfill, &ResourceTree::new(&staged, &out), &Settings::default()).unwrap();
    assert_eq!(report.documents.len(), 1);
    assert_eq!(report.documents[0].language, "it");

    let base = read(&staged.join("values/11-arrays.xml"));
    let it = read(&out.join("values-it/11-arrays.xml"));
    let map = NameMap::build(&base).unwrap();
    assert_eq!(it.root.elements_named(STRING).count(), map.item_count());
    for identifier in map.identifiers() {
        assert_eq!(
            it.string_entry(identifier).unwrap().text,
            base.string_entry(identifier).unwrap().text
        );
    }
}

#[test]
fn test_extract_translations_after_backfill_keeps_translated_text() {
    let temp_dir = TempDir::new().unwrap();
    let res = res_tree(&temp_dir);
    let staged = temp_dir.path().join("staged");
    let filled = temp_dir.path().join("filled");
    let out = temp_dir.path().join("out");

    run(Mode::ExtractBase, &ResourceTree::new(&res, &staged), &Settings::default()).unwrap();
    fs::create_dir_all(staged.join("values-fr")).unwrap();
    fs::copy(res.join("values-fr/11-arrays.xml"), staged.join("values-fr/11-arrays.xml")).unwrap();

    // Placeholders land next to the still untouched French arrays.
    run(Mode::Backfill, &ResourceTree::new(&staged, &filled), &Settings::default()).unwrap();
    fs::create_dir_all(filled.join("values")).unwrap();
    fs::copy(staged.join("values/11-arrays.xml"), filled.join("values/11-arrays.xml")).unwrap();
    let placeholders = read(&filled.join("values-fr/11-arrays.xml"));
    assert_eq!(placeholders.string_entry("colors_red").unwrap().text, "Red");
    assert_eq!(placeholders.string_arrays().count(), 2);

    let report = run(
        Mode::ExtractTranslations,
        &ResourceTree::new(&filled, &out),
        &Settings::default(),
    )
    .unwrap();
    assert_eq!(report.documents.len(), 1);
    let outcome = report.documents[0].outcome;
    assert_eq!(outcome.appended, 0);
    assert_eq!(outcome.skipped, 0);
    assert_eq!(outcome.replaced, 5);
    assert_eq!(outcome.removed, 2);

    let fr = read(&out.join("values-fr/11-arrays.xml"));
    assert_eq!(fr.string_arrays().count(), 0);
    assert_eq!(fr.root.elements_named(STRING).count(), 5);
    assert_eq!(fr.string_entry("colors_red").unwrap().text, "Rouge");
    assert_eq!(fr.string_entry("colors_light_blue").unwrap().text, "Bleu clair");
    assert_eq!(
        fr.string_entry("refresh_intervals_hourly").unwrap().text,
        "Toutes les heures"
    );
}

#[test]
fn test_items_without_letters_are_flattened() {
    let temp_dir = TempDir::new().unwrap();
    let res = temp_dir.path().join("res");
    write(
        &res,
        "values/11-arrays.xml",
        "<resources>\n    <string-array name=\"sep\">\n        <item>Top</item>\n        <item>—</item>\n    </string-array>\n</resources>\n",
    );
    let out = temp_dir.path().join("out");

    let report = run(Mode::ExtractBase, &ResourceTree::new(&res, &out), &Settings::default()).unwrap();
    assert_eq!(report.identifiers, 2);
    let doc = read(&out.join("values/11-arrays.xml"));
    assert_eq!(doc.string_entry("sep_").unwrap().text, "—");
}

#[test]
fn test_backfill_can_duplicate_existing_entries() {
    let temp_dir = TempDir::new().unwrap();
    let res = res_tree(&temp_dir);
    let staged = temp_dir.path().join("staged");
    let out = temp_dir.path().join("out");

    run(Mode::ExtractBase, &ResourceTree::new(&res, &staged), &Settings::default()).unwrap();
    write(
        &staged,
        "values-it/11-arrays.xml",
        "<resources>\n    <string name=\"colors_red\">Rosso</string>\n</resources>\n",
    );

    let settings = Settings {
        existing: ExistingEntries::Duplicate,
        ..Default::default()
    };
    run(Mode::Backfill, &ResourceTree::new(&staged, &out), &settings).unwrap();
    let it = read(&out.join("values-it/11-arrays.xml"));
    let reds: Vec<_> = it
        .root
        .elements_named(STRING)
        .filter(|e| e.resource_name() == Some("colors_red"))
        .map(|e| e.text.as_str())
        .collect();
    assert_eq!(reds, vec!["Rosso", "Red"]);
}

#[test]
fn test_custom_file_names() {
    let temp_dir = TempDir::new().unwrap();
    let res = temp_dir.path().join("res");
    write(&res, "values/arrays.xml", BASE_ARRAYS);
    let out = temp_dir.path().join("out");

    let settings = Settings {
        arrays_file: "arrays.xml".to_string(),
        ..Default::default()
    };
    run(Mode::ExtractBase, &ResourceTree::new(&res, &out), &settings).unwrap();
    assert!(out.join("values/arrays.xml").exists());
}

#[test]
fn test_missing_base_document_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = run(
        Mode::ExtractBase,
        &ResourceTree::new(temp_dir.path(), temp_dir.path().join("out")),
        &Settings::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(err.to_string().contains("11-arrays.xml"));
}
