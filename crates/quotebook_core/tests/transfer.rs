use quotebook_core::transfer::{
    export_quotes, import_quotes, write_export, ImportError, ImportOptions, EXPORT_FILE_NAME,
};
use quotebook_core::{
    MemoryPreferenceRepository, QuoteBook, QuoteBookError, QuoteStore, IMPORTED_MESSAGE,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn export_then_import_into_empty_store_reproduces_records() {
    let mut source = QuoteStore::seeded();
    source.add("Fortune favors the bold.", "Courage").unwrap();
    let exported = export_quotes(&source).unwrap();

    let mut target = QuoteStore::new();
    let report = import_quotes(
        &mut target,
        &exported,
        ImportOptions {
            skip_duplicates: false,
        },
    )
    .unwrap();

    assert_eq!(report.imported, source.len());
    assert_eq!(target.all(), source.all());
}

#[test]
fn export_is_indented_json_array() {
    let exported = export_quotes(&QuoteStore::seeded()).unwrap();
    assert!(exported.starts_with("[\n  {"));
    assert!(exported.contains("\"category\": \"Education\""));
    assert!(!exported.contains("\"id\""));
}

#[test]
fn write_export_creates_quotes_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_export(&QuoteStore::seeded(), dir.path()).unwrap();

    assert_eq!(path.file_name().unwrap(), EXPORT_FILE_NAME);
    let written = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 3);
}

#[test]
fn mixed_file_adds_only_valid_entries() {
    let mut store = QuoteStore::seeded();
    let contents = r#"[
        {"text": "Valid one", "category": "A"},
        {"text": "", "category": "A"},
        {"text": "Missing category"},
        {"category": "Missing text"},
        {"text": 42, "category": "A"},
        "not an object",
        null,
        {"text": "Valid two", "category": "B", "extra": true}
    ]"#;

    let report = import_quotes(&mut store, contents, ImportOptions::default()).unwrap();
    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped_malformed, 6);
    assert_eq!(report.total_seen(), 8);
    assert_eq!(store.len(), 5);
    assert_eq!(store.categories(), vec!["Motivation", "Inspiration", "Education", "A", "B"]);
}

#[test]
fn duplicates_are_skipped_by_default() {
    let mut store = QuoteStore::seeded();
    let contents = r#"[
        {"text": "Knowledge is power.", "category": "Education"},
        {"text": "New", "category": "X"},
        {"text": "New", "category": "Y"}
    ]"#;

    let report = import_quotes(&mut store, contents, ImportOptions::default()).unwrap();
    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped_duplicates, 2);
    assert_eq!(store.len(), 4);

    let again = import_quotes(&mut store, contents, ImportOptions::default()).unwrap();
    assert_eq!(again.imported, 0);
    assert_eq!(store.len(), 4);
}

#[test]
fn invalid_json_and_non_array_leave_store_untouched() {
    let mut store = QuoteStore::seeded();

    let parse = import_quotes(&mut store, "{not json", ImportOptions::default()).unwrap_err();
    assert!(matches!(parse, ImportError::Parse(_)));

    let format = import_quotes(
        &mut store,
        r#"{"text": "x", "category": "y"}"#,
        ImportOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(format, ImportError::Format("object")));

    assert_eq!(store.len(), 3);
}

#[test]
fn session_import_refreshes_categories_and_notifies() {
    let mut book = QuoteBook::with_parts(
        QuoteStore::seeded(),
        MemoryPreferenceRepository::new(),
        StdRng::seed_from_u64(5),
    );
    book.initialize().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("incoming.json");
    std::fs::write(&path, r#"[{"text": "Be kind.", "category": "Kindness"}]"#).unwrap();

    let report = book.import_file(&path).unwrap();
    assert_eq!(report.imported, 1);
    assert!(book.categories().iter().any(|c| c == "Kindness"));
    assert!(book
        .drain_notices()
        .iter()
        .any(|n| n.message == IMPORTED_MESSAGE));

    let missing = book.import_file(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(missing, QuoteBookError::Import(ImportError::Io { .. })));
    assert_eq!(book.store().len(), 4);
}
