use docqa_core::types::{AnswerOutcome, SearchHit, SearchOutcome};
use docqa_text::answer::{NO_CITATIONS, NO_INFORMATION, NO_SPECIFIC_INFORMATION};
use docqa_text::{answer_question, extract_answer, retrieve, search, AnswerOptions, Bm25Params, ChunkIndex, Chunker, IndexBuilder};

const CORPUS: &[(&str, &str)] = &[
    ("python.txt", "Python es un lenguaje de programación interpretado muy popular."),
    ("volcanes.txt", "Los volcanes activos expulsan magma incandescente durante cada erupción."),
    ("cafe.txt", "El café colombiano crece en montañas húmedas bajo sombra abundante."),
    ("ballenas.txt", "Las ballenas azules migran miles de kilómetros hacia aguas templadas."),
    ("ajedrez.txt", "El ajedrez moderno exige paciencia, memoria táctica y visión estratégica."),
    ("pan.txt", "Hornear pan artesanal requiere harina fuerte, agua tibia y levadura fresca."),
    ("satelites.txt", "Varios satélites meteorológicos observan nubes y tormentas desde órbita alta."),
    ("jardin.txt", "Un jardín urbano bien regado produce tomates, albahaca y pimientos."),
    ("bicicleta.txt", "Montar bicicleta fortalece piernas, mejora el corazón y reduce el estrés."),
    ("museo.txt", "El museo nacional exhibe esculturas antiguas y pinturas renacentistas."),
];

fn corpus_index() -> ChunkIndex {
    let mut builder = IndexBuilder::new(Chunker::default(), 20);
    for (name, text) in CORPUS {
        assert_eq!(builder.add_document(name, text), 1, "{name} should be one chunk");
    }
    builder.build(Bm25Params::default())
}

fn names(hits: &[SearchHit]) -> Vec<&str> { hits.iter().map(|h| h.document_name.as_str()).collect() }

#[test]
fn search_finds_only_documents_with_enough_overlap() {
    let index = corpus_index();
    assert_eq!(index.chunks().len(), CORPUS.len());

    let hits = retrieve(&index, "volcanes magma", 5, 0.25);
    assert_eq!(names(&hits), vec!["volcanes.txt"]);
    assert!(hits[0].relevance_score >= 0.25);
    assert!(hits[0].text.contains("magma"));
}

#[test]
fn single_keyword_needs_phrase_match_and_score() {
    let index = corpus_index();
    // One token: below the search threshold even though the phrase matches.
    assert!(retrieve(&index, "magma", 5, 0.25).is_empty());
    // The looser answer threshold lets the phrase match through.
    assert_eq!(names(&retrieve(&index, "magma", 5, 0.15)), vec!["volcanes.txt"]);
}

#[test]
fn top_k_truncates_before_gating_and_keeps_score_order() {
    let index = corpus_index();
    let both = retrieve(&index, "volcanes magma ballenas azules", 5, 0.25);
    assert_eq!(names(&both), vec!["volcanes.txt", "ballenas.txt"], "ties keep indexing order");
    assert!(both[0].relevance_score >= both[1].relevance_score);

    let one = retrieve(&index, "volcanes magma ballenas azules", 1, 0.25);
    assert_eq!(names(&one), vec!["volcanes.txt"]);
}

#[test]
fn search_distinguishes_absent_index_from_no_match() {
    assert_eq!(search(&ChunkIndex::empty(), "volcanes", 5, 0.25), SearchOutcome::NotIndexed);
    assert!(retrieve(&ChunkIndex::empty(), "volcanes", 5, 0.25).is_empty());

    let index = corpus_index();
    assert_eq!(search(&index, "Java", 5, 0.25), SearchOutcome::NoMatch);
    assert!(matches!(search(&index, "volcanes magma", 5, 0.25), SearchOutcome::Hits(h) if h.len() == 1));
}

#[test]
fn answer_picks_best_overlapping_sentence() {
    let index = corpus_index();
    let outcome = answer_question(&index, "¿Qué expulsan los volcanes durante una erupción?", AnswerOptions::default());
    let AnswerOutcome::Answered(answer) = outcome else { panic!("expected an answer, got {outcome:?}") };
    assert_eq!(answer.text, "Los volcanes activos expulsan magma incandescente durante cada erupción.");
    assert_eq!(answer.citations.len(), 1);
    assert_eq!(answer.citations[0].document_name, "volcanes.txt");
    assert_eq!(answer.citations[0].text, answer.text);
}

#[test]
fn answer_without_overlap_is_not_found() {
    let index = corpus_index();
    match answer_question(&index, "¿Dónde juegan hockey?", AnswerOptions::default()) {
        AnswerOutcome::NotFound(msg) => assert!(msg.to_lowercase().contains("no encuentro")),
        other => panic!("expected not found, got {other:?}"),
    }
    assert_eq!(answer_question(&ChunkIndex::empty(), "hola", AnswerOptions::default()), AnswerOutcome::NotIndexed);
}

#[test]
fn single_chunk_index_rejects_unrelated_query() {
    let mut builder = IndexBuilder::new(Chunker::default(), 20);
    builder.add_document("python.txt", "Python es un lenguaje interpretado.");
    let index = builder.build(Bm25Params::default());
    assert!(index.is_indexed());

    assert_eq!(search(&index, "Java", 5, 0.25), SearchOutcome::NoMatch);
    assert_eq!(
        answer_question(&index, "Java", AnswerOptions::default()),
        AnswerOutcome::NotFound(NO_INFORMATION.to_string())
    );
}

fn hit(doc: &str, text: &str) -> SearchHit {
    SearchHit { text: text.to_string(), document_name: doc.to_string(), relevance_score: 1.0 }
}

#[test]
fn extract_answer_falls_back_to_summary() {
    let hits = vec![
        hit("a.txt", "Primera oración larga del texto. Segunda oración del texto. Tercera."),
        hit("b.txt", "Otro documento distinto aquí. Con más frases."),
        hit("c.txt", "Un tercer fragmento que no se resume."),
    ];
    let answer = extract_answer("zzz qqq", &hits);
    assert_eq!(
        answer.text,
        "Primera oración larga del texto. Segunda oración del texto. Otro documento distinto aquí. Con más frases."
    );
    let cited: Vec<&str> = answer.citations.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(cited, vec!["Primera oración larga del texto.", "Otro documento distinto aquí.", "Un tercer fragmento que no se resume."]);
}

#[test]
fn extract_answer_caps_citations_and_prefers_first_on_ties() {
    let hits = vec![
        hit("a.txt", "El río grande cruza la ciudad vieja. Nada más."),
        hit("b.txt", "El río grande cruza también el valle. Otra cosa."),
        hit("c.txt", "Texto sin relación alguna con nada."),
        hit("d.txt", "El río grande y la ciudad, otra vez aquí."),
    ];
    let answer = extract_answer("río grande", &hits);
    assert_eq!(answer.text, "El río grande cruza la ciudad vieja.");
    assert_eq!(answer.citations.len(), 3);
    assert_eq!(answer.citations[2].document_name, "c.txt");
}

#[test]
fn extract_answer_with_no_hits_uses_fixed_message() {
    let answer = extract_answer("algo", &[]);
    assert_eq!(answer.text, NO_INFORMATION);
    assert!(answer.citations.is_empty());
    assert_ne!(NO_SPECIFIC_INFORMATION, NO_CITATIONS);
}

#[test]
fn builder_replaces_document_added_twice() {
    let mut builder = IndexBuilder::new(Chunker::default(), 20);
    builder.add_document("a.txt", "Primer texto del documento A con contenido suficiente.");
    builder.add_document("b.txt", "Texto del documento B que también es suficientemente largo.");
    builder.add_document("a.txt", "Versión nueva del documento A, con otras palabras distintas.");
    assert_eq!(builder.document_count(), 2);
    assert_eq!(builder.chunk_count(), 2);

    let index = builder.build(Bm25Params::default());
    assert_eq!(index.document_names(), vec!["a.txt", "b.txt"]);
    assert!(index.chunks()[0].text.starts_with("Versión nueva"));
    assert_eq!(index.chunks()[0].tokens, docqa_text::tokenize(&index.chunks()[0].text));
}

#[test]
fn builder_without_chunks_builds_absent_index() {
    let mut builder = IndexBuilder::new(Chunker::default(), 20);
    assert_eq!(builder.add_document("tiny.txt", "Hola."), 0);
    assert_eq!(builder.document_count(), 1);
    assert!(builder.is_empty());
    let index = builder.build(Bm25Params::default());
    assert!(!index.is_indexed());
    assert!(index.documents().is_empty());
}
