use search_core::{Document, Error, InvertedIndex, Normalizer, SearchEngine};

fn movies() -> Vec<Document> {
    vec![
        Document { id: 1, title: "The Matrix".into(), description: "A hacker discovers reality".into() },
        Document { id: 2, title: "Matrix Reloaded".into(), description: "Sequel".into() },
    ]
}

fn engine() -> SearchEngine {
    SearchEngine::build(movies(), Normalizer::new(["a", "the"])).unwrap()
}

#[test]
fn matrix_ranks_both_films_by_id_on_tie() {
    let engine = engine();
    assert_eq!(engine.search("matrix", 5), vec!["The Matrix", "Matrix Reloaded"]);
    let hits = engine.search_scored("matrix", 5);
    assert_eq!(hits[0].score, hits[1].score);
}

#[test]
fn term_frequency_for_single_and_multi_word_terms() {
    let engine = engine();
    assert_eq!(engine.term_frequency(1, "hacker").unwrap(), 1);
    let err = engine.term_frequency(1, "hacker discovers").unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn unknown_term_returns_nothing() {
    let engine = engine();
    assert!(engine.search("zzz_no_such_term", 5).is_empty());
    assert!(engine.search("", 5).is_empty());
    assert!(engine.search("the a", 5).is_empty());
}

#[test]
fn common_terms_have_lower_idf_than_rare_ones() {
    let engine = engine();
    let common = engine.inverse_document_frequency("matrix").unwrap();
    let rare = engine.inverse_document_frequency("hacker").unwrap();
    assert!(common < rare);
    assert!((rare - (2.0f64 / 2.0).ln()).abs() < 1e-12);
    assert!((common - (2.0f64 / 3.0).ln()).abs() < 1e-12);
}

#[test]
fn idf_of_unknown_word_is_log_of_corpus_size() {
    let engine = engine();
    let idf = engine.inverse_document_frequency("zebra").unwrap();
    assert!((idf - 2f64.ln()).abs() < 1e-12);
    assert!(engine.inverse_document_frequency("two words").is_err());
}

#[test]
fn repeated_searches_agree() {
    let engine = engine();
    for q in ["matrix", "hacker matrix", "sequel reloaded matrix", "reality"] {
        assert_eq!(engine.search_scored(q, 10), engine.search_scored(q, 10));
    }
}

#[test]
fn adding_documents_never_lowers_frequencies() {
    let mut index = InvertedIndex::new(Normalizer::new(["a", "the"]));
    index.add_document(1, "The Matrix A hacker discovers reality").unwrap();
    let df_before = index.document_frequency("matrix");
    let tf_before = index.raw_term_frequency(1, "matrix");
    index.add_document(2, "Matrix Reloaded Sequel").unwrap();
    assert!(index.document_frequency("matrix") >= df_before);
    assert!(index.raw_term_frequency(1, "matrix") >= tf_before);
    assert_eq!(index.document_frequency("matrix"), 2);
}

#[test]
fn duplicate_ids_abort_the_build() {
    let mut docs = movies();
    docs.push(Document { id: 1, title: "Imposter".into(), description: String::new() });
    let err = SearchEngine::build(docs, Normalizer::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn queries_run_concurrently_on_a_shared_engine() {
    let engine = engine();
    let expected = engine.search("matrix hacker", 5);
    let shared = &engine;
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(move || shared.search("matrix hacker", 5))).collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}
