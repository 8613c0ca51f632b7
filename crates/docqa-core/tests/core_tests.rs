use std::fs;
use std::io::Write;
use tempfile::TempDir;

use docqa_core::config::{Config, Settings};
use docqa_core::data_processor::{DataProcessor, PlainTextExtractor};
use docqa_core::traits::TextExtractor;
use docqa_core::types::{SearchHit, SearchOutcome, SourceFile};
use docqa_core::Error;

#[test]
fn process_directory_single_small_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let file_path = dir.join("a.txt");
    let mut f = fs::File::create(&file_path).unwrap();
    writeln!(f, "Short text").unwrap();

    let processor = DataProcessor::new();
    let files = processor.process_directory(dir).expect("process");

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "a.txt");
    let text = PlainTextExtractor.extract(&files[0]).expect("extract");
    assert_eq!(text, "Short text");
}

#[test]
fn process_directory_skips_other_extensions_and_sorts() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("b.txt"), "bravo").unwrap();
    fs::write(dir.join("a.TXT"), "alpha").unwrap();
    fs::write(dir.join("notes.md"), "ignored").unwrap();

    let files = DataProcessor::new().process_directory(dir).expect("process");
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.TXT", "b.txt"]);
}

#[test]
fn process_directory_limited_two_files_limit_one() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "alpha bravo").unwrap();
    fs::write(dir.join("b.txt"), "charlie delta").unwrap();

    let files = DataProcessor::new()
        .process_directory_limited(dir, 1)
        .expect("process limited");
    assert_eq!(files.len(), 1, "limited to one source document");
}

#[test]
fn process_paths_reports_unreadable_file_as_io_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("ok.txt"), "alpha").unwrap();
    let paths = vec![tmp.path().join("ok.txt"), tmp.path().join("missing.txt")];

    match DataProcessor::new().process_paths(&paths) {
        Err(Error::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn extractor_decodes_lossily_and_rejects_pdf() {
    let txt = SourceFile { name: "x.txt".into(), bytes: b"  hola \xff mundo \n".to_vec() };
    let text = PlainTextExtractor.extract(&txt).expect("txt");
    assert!(text.starts_with("hola"));
    assert!(text.ends_with("mundo"));

    let pdf = SourceFile { name: "x.pdf".into(), bytes: b"%PDF-1.4".to_vec() };
    assert!(PlainTextExtractor.extract(&pdf).is_err());

    let doc = SourceFile { name: "x.docx".into(), bytes: vec![] };
    assert!(PlainTextExtractor.extract(&doc).is_err());
}

#[test]
fn source_file_extension_is_lowercased() {
    let f = SourceFile { name: "Report.PDF".into(), bytes: vec![] };
    assert_eq!(f.extension().as_deref(), Some("pdf"));
    let none = SourceFile { name: "README".into(), bytes: vec![] };
    assert_eq!(none.extension(), None);
    let hidden = SourceFile { name: ".txt".into(), bytes: vec![] };
    assert_eq!(hidden.extension(), None);
}

#[test]
fn settings_defaults_match_service_contract() {
    let settings = Config::from_figment(figment::Figment::new()).settings().expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.chunking.chunk_size, 300);
    assert_eq!(settings.chunking.overlap, 100);
    assert_eq!(settings.ingest.min_valid_documents, 3);
    assert!((settings.search.min_score - 0.25).abs() < f64::EPSILON);
    assert!((settings.answer.min_score - 0.15).abs() < f64::EPSILON);
}

#[test]
fn settings_overrides_from_toml_and_validation() {
    use figment::providers::{Format, Toml};

    let cfg = Config::from_figment(figment::Figment::from(Toml::string("[search]\ntop_k = 3\n")));
    let settings = cfg.settings().expect("settings");
    assert_eq!(settings.search.top_k, 3);
    assert!((settings.search.min_score - 0.25).abs() < f64::EPSILON, "untouched keys keep defaults");
    assert_eq!(cfg.get::<usize>("search.top_k").expect("get"), 3);

    let bad = Config::from_figment(figment::Figment::from(Toml::string(
        "[chunking]\nchunk_size = 100\noverlap = 100\n",
    )));
    assert!(matches!(bad.settings(), Err(Error::InvalidConfig(_))));
}

#[test]
fn snapshot_path_resolves_relative_to_base() {
    let tmp = TempDir::new().unwrap();
    let settings = Settings::default();
    assert_eq!(settings.snapshot_path(tmp.path()), tmp.path().join("data/document_index.json"));
}

#[test]
fn search_outcome_distinguishes_no_match() {
    assert_eq!(SearchOutcome::from_hits(vec![]), SearchOutcome::NoMatch);
    let hit = SearchHit { text: "t".into(), document_name: "d".into(), relevance_score: 0.5 };
    let outcome = SearchOutcome::from_hits(vec![hit]);
    assert_eq!(outcome.hits().len(), 1);
    assert!(SearchOutcome::NotIndexed.hits().is_empty());
}
