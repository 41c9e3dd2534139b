//! BM25 lexical relevance over the candidate population.
//!
//! The population snapshot is the document collection: document frequencies
//! and average length are computed once per snapshot, queries score against
//! that index. Raw BM25 magnitudes are not comparable across queries or
//! populations, so scores are max-normalized to [0,1] per query.


use std::collections::{HashMap, HashSet};

use unicode_normalization::UnicodeNormalization;

use crate::model::Company;

/// Term-frequency saturation parameter.
pub const BM25_K1: f64 = 1.2;

/// Document-length normalization parameter.
pub const BM25_B: f64 = 0.75;

const MIN_TOKEN_LENGTH: usize = 3;

/// Portuguese stop words stripped before scoring. Kept short on purpose:
/// BM25's IDF already down-weights common terms.
const STOP_WORDS: &[&str] = &[
    "de", "da", "do", "das", "dos", "em", "para", "com", "por", "que", "e", "a", "o", "as", "os",
    "um", "uma", "uns", "umas", "na", "no", "nas", "nos", "ao", "aos",
];

/// A per-snapshot BM25 index over the candidate corpus.
///
/// Document order matches the company order the index was built from, so
/// [`LexicalIndex::score`] output aligns positionally with the snapshot.
#[derive(Debug)]
pub struct LexicalIndex {
    doc_terms: Vec<Vec<String>>,
    document_frequencies: HashMap<String, usize>,
    avg_doc_len: f64,
    k1: f64,
    b: f64,
}

impl LexicalIndex {
    /// Builds the index from the candidate population.
    pub fn build(companies: &[Company]) -> Self {
        Self::with_params(companies, BM25_K1, BM25_B)
    }

    /// Builds the index with explicit BM25 parameters.
    pub fn with_params(companies: &[Company], k1: f64, b: f64) -> Self {
        let doc_terms: Vec<Vec<String>> = companies
            .iter()
            .map(|c| tokenize(&c.lexical_text()))
            .collect();

        let document_frequencies = compute_document_frequencies(&doc_terms);

        let avg_doc_len = (doc_terms.iter().map(Vec::len).sum::<usize>() as f64
            / doc_terms.len().max(1) as f64)
            .max(1.0);

        Self {
            doc_terms,
            document_frequencies,
            avg_doc_len,
            k1,
            b,
        }
    }

    /// Number of documents in the corpus.
    pub fn len(&self) -> usize {
        self.doc_terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_terms.is_empty()
    }

    /// Scores `query_text` against every document, max-normalized to [0,1].
    ///
    /// Zero lexical overlap scores exactly 0.0, a valid low signal, never
    /// null. Degenerate corpora (empty or near-empty documents) still
    /// produce values in [0,1].
    pub fn score(&self, query_text: &str) -> Vec<f32> {
        let query_terms = tokenize(query_text);

        if query_terms.is_empty() || self.doc_terms.is_empty() {
            return vec![0.0; self.doc_terms.len()];
        }

        let n = self.doc_terms.len() as f64;
        let idf: HashMap<&String, f64> = query_terms
            .iter()
            .map(|term| {
                let df = self.document_frequencies.get(term).copied().unwrap_or(0) as f64;
                (term, idf_from_df(n, df))
            })
            .collect();

        let raw: Vec<f64> = self
            .doc_terms
            .iter()
            .map(|doc| self.bm25(&query_terms, doc, &idf))
            .collect();

        let max = raw.iter().cloned().fold(0.0f64, f64::max);
        if max <= 0.0 {
            return vec![0.0; raw.len()];
        }

        raw.iter().map(|&score| (score / max) as f32).collect()
    }

    fn bm25(&self, query_terms: &[String], doc_terms: &[String], idf: &HashMap<&String, f64>) -> f64 {
        if doc_terms.is_empty() {
            return 0.0;
        }

        let doc_len = doc_terms.len() as f64;
        let length_norm = 1.0 - self.b + self.b * (doc_len / self.avg_doc_len);

        let mut score = 0.0;
        for term in query_terms {
            let tf = doc_terms.iter().filter(|t| *t == term).count() as f64;
            if tf > 0.0 {
                let idf = idf.get(term).copied().unwrap_or(0.0);
                score += idf * (tf * (self.k1 + 1.0)) / (tf + self.k1 * length_norm);
            }
        }
        score
    }
}

/// Robertson IDF with the +1 shift that keeps it non-negative.
#[inline]
fn idf_from_df(n: f64, df: f64) -> f64 {
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

fn compute_document_frequencies(doc_terms: &[Vec<String>]) -> HashMap<String, usize> {
    let mut df_map: HashMap<String, usize> = HashMap::new();

    for doc in doc_terms {
        let unique: HashSet<&String> = doc.iter().collect();
        for term in unique {
            *df_map.entry(term.clone()).or_insert(0) += 1;
        }
    }

    df_map
}

/// Lowercases, strips diacritics, splits on non-alphanumerics, and drops
/// short tokens and stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    let folded: String = text
        .to_lowercase()
        .nfkd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect();

    folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= MIN_TOKEN_LENGTH || t.chars().all(|c| c.is_ascii_digit()))
        .filter(|t| !t.is_empty() && !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}
