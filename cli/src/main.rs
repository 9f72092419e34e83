use anyhow::Result;
use clap::{Parser, Subcommand};
use search_core::source::{load_corpus, load_stopwords};
use search_core::{DocId, Error, Normalizer, SearchEngine};
use tracing_subscriber::{fmt, EnvFilter};

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "keyword-search")]
#[command(about = "Keyword search over a movie corpus", long_about = None)]
struct Cli {
    /// Movie corpus (JSON)
    #[arg(long, global = true, env = "KEYWORD_SEARCH_CORPUS", default_value = "data/movies.json")]
    corpus: PathBuf,
    /// Stopword list, one word per line. Use the same list for queries as for
    /// `build`; a mismatch with the cached list is logged as a warning.
    #[arg(long, global = true, env = "KEYWORD_SEARCH_STOPWORDS", default_value = "data/stopwords.txt")]
    stopwords: PathBuf,
    /// Index cache directory
    #[arg(long, global = true, env = "KEYWORD_SEARCH_CACHE", default_value = "cache")]
    cache: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from the corpus and write it to the cache
    Build,
    /// Search movies by keyword, ranked by TF-IDF
    Search {
        query: String,
        #[arg(long, default_value_t = 5)]
        limit: usize,
        /// Literal, case-sensitive title match ordered by id instead of ranked search
        #[arg(long, default_value_t = false)]
        substring: bool,
    },
    /// Occurrences of a term in a document
    Tf { doc_id: DocId, term: String },
    /// Inverse document frequency of a term
    Idf { term: String },
    /// TF-IDF of a term in a document
    Tfidf { doc_id: DocId, term: String },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Build => {
            let engine = build(&cli)?;
            println!("Indexed {} documents into {}", engine.index().num_docs(), cli.cache.display());
        }
        Commands::Search { query, limit, substring } => {
            let engine = open(&cli)?;
            let titles = if *substring {
                engine.title_substring_search(query, *limit)
            } else {
                engine.search(query, *limit)
            };
            println!("Searching for: {query}");
            for (i, title) in titles.iter().enumerate() {
                println!("{}. {}", i + 1, title);
            }
        }
        Commands::Tf { doc_id, term } => {
            let tf = open(&cli)?.term_frequency(*doc_id, term)?;
            println!("Term frequency of '{term}' in document {doc_id}: {tf}");
        }
        Commands::Idf { term } => {
            let idf = open(&cli)?.inverse_document_frequency(term)?;
            println!("Inverse document frequency of '{term}': {idf:.2}");
        }
        Commands::Tfidf { doc_id, term } => {
            let score = open(&cli)?.tf_idf(*doc_id, term)?;
            println!("TF-IDF score of '{term}' in document {doc_id}: {score:.2}");
        }
    }
    Ok(())
}

fn normalizer(stopwords: &Path) -> Normalizer {
    let n = Normalizer::new(load_stopwords(stopwords));
    tracing::info!(path = %stopwords.display(), stopwords = n.stopword_count(), "normalizer ready");
    n
}

fn build(cli: &Cli) -> Result<SearchEngine> {
    let docs = load_corpus(&cli.corpus)?;
    let engine = SearchEngine::build(docs, normalizer(&cli.stopwords))?;
    engine.save(&cli.cache)?;
    Ok(engine)
}

/// Loads the cached index, rebuilding from the corpus only when the cache is unavailable.
fn open(cli: &Cli) -> Result<SearchEngine> {
    match SearchEngine::load(&cli.cache, normalizer(&cli.stopwords)) {
        Ok(engine) => Ok(engine),
        Err(err @ Error::CacheUnavailable { .. }) => {
            tracing::warn!(error = %err, "rebuilding index");
            build(cli)
        }
        Err(err) => Err(err.into()),
    }
}
