//! Collection-local TF-IDF vectors.

use std::collections::{BTreeMap, BTreeSet};

use super::persona::PersonaQuery;
use crate::text::tokenize;

/// Sparse term-weight vector with a fixed iteration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    weights: BTreeMap<String, f32>,
}

impl TermVector {
    /// Wrap raw weights.
    pub fn from_weights(weights: BTreeMap<String, f32>) -> Self {
        Self { weights }
    }

    /// Weight of `term`.
    pub fn get(&self, term: &str) -> f32 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    /// Number of non-zero terms.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Check if the vector has no terms.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Terms and weights in term order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.weights.iter().map(|(t, w)| (t.as_str(), *w))
    }

    /// Euclidean length.
    pub fn norm(&self) -> f32 {
        self.weights.values().map(|w| w * w).sum::<f32>().sqrt()
    }

    /// Scale to unit length. A zero vector stays zero.
    pub fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for w in self.weights.values_mut() {
                *w /= norm;
            }
        }
        self
    }

    /// Dot product, summed in term order.
    pub fn dot(&self, other: &TermVector) -> f32 {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .weights
            .iter()
            .filter_map(|(term, w)| large.weights.get(term).map(|v| w * v))
            .sum()
    }

    /// Cosine similarity; zero when either vector is empty.
    pub fn cosine(&self, other: &TermVector) -> f32 {
        let denominator = self.norm() * other.norm();
        if denominator == 0.0 {
            0.0
        } else {
            self.dot(other) / denominator
        }
    }
}

/// IDF table fitted on the sections of one collection.
#[derive(Debug, Clone, Default)]
pub struct KeywordEmbedder {
    section_count: usize,
    document_frequency: BTreeMap<String, usize>,
}

impl KeywordEmbedder {
    /// Fit on the token lists of every section in the collection.
    pub fn fit<T: AsRef<[String]>>(sections: &[T]) -> Self {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for tokens in sections {
            let distinct: BTreeSet<&String> = tokens.as_ref().iter().collect();
            for term in distinct {
                *document_frequency.entry(term.clone()).or_insert(0) += 1;
            }
        }

        log::debug!(
            "IDF fitted on {} sections, vocabulary {}",
            sections.len(),
            document_frequency.len()
        );

        Self {
            section_count: sections.len(),
            document_frequency,
        }
    }

    /// Number of sections the table was fitted on.
    pub fn section_count(&self) -> usize {
        self.section_count
    }

    /// Number of distinct terms seen.
    pub fn vocabulary_size(&self) -> usize {
        self.document_frequency.len()
    }

    /// `ln((1 + N) / (1 + df)) + 1`; unseen terms get the highest value.
    pub fn idf(&self, term: &str) -> f32 {
        let df = self.document_frequency.get(term).copied().unwrap_or(0);
        ((1.0 + self.section_count as f32) / (1.0 + df as f32)).ln() + 1.0
    }

    /// Unit-length TF-IDF vector of a token list.
    pub fn embed_tokens(&self, tokens: &[String]) -> TermVector {
        if tokens.is_empty() {
            return TermVector::default();
        }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for token in tokens {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }

        let total = tokens.len() as f32;
        let weights = counts
            .into_iter()
            .map(|(term, count)| (term.to_string(), count as f32 / total * self.idf(term)))
            .collect();
        TermVector::from_weights(weights).normalized()
    }

    /// Unit-length TF-IDF vector of raw text.
    pub fn embed_text(&self, text: &str) -> TermVector {
        self.embed_tokens(&tokenize(text))
    }

    /// Unit-length query vector: term weight times IDF.
    pub fn embed_query(&self, query: &PersonaQuery) -> TermVector {
        let weights = query
            .terms
            .iter()
            .filter(|(_, w)| **w > 0.0)
            .map(|(term, w)| (term.clone(), w * self.idf(term)))
            .collect();
        TermVector::from_weights(weights).normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        tokenize(text)
    }

    #[test]
    fn test_idf_formula() {
        let sections = vec![
            tokens("beaches and beaches"),
            tokens("museums downtown"),
            tokens("beaches at sunset"),
        ];
        let embedder = KeywordEmbedder::fit(&sections);
        assert_eq!(embedder.section_count(), 3);
        let expected = (4.0f32 / 3.0).ln() + 1.0;
        assert!((embedder.idf("beaches") - expected).abs() < 1e-6);
        assert!(embedder.idf("museums") > embedder.idf("beaches"));
        assert!((embedder.idf("unseen") - (4.0f32.ln() + 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let sections = vec![tokens("coastal hiking trails"), tokens("hiking boots")];
        let embedder = KeywordEmbedder::fit(&sections);
        let v = embedder.embed_tokens(&sections[0]);
        assert!((v.norm() - 1.0).abs() < 1e-5);
        assert!(embedder.embed_tokens(&[]).is_empty());
        assert_eq!(embedder.vocabulary_size(), 4);
        assert_eq!(embedder.embed_text("Hiking boots!"), embedder.embed_tokens(&sections[1]));
    }

    #[test]
    fn test_cosine() {
        let sections = vec![tokens("vegetarian protein mains"), tokens("travel itinerary")];
        let embedder = KeywordEmbedder::fit(&sections);
        let a = embedder.embed_tokens(&sections[0]);
        let b = embedder.embed_tokens(&sections[1]);
        assert!((a.cosine(&a) - 1.0).abs() < 1e-5);
        assert_eq!(a.cosine(&b), 0.0);
        assert_eq!(a.cosine(&TermVector::default()), 0.0);
    }

    #[test]
    fn test_query_vector_uses_weights() {
        let sections = vec![tokens("buffet menu"), tokens("buffet ideas")];
        let embedder = KeywordEmbedder::fit(&sections);
        let mut terms = BTreeMap::new();
        terms.insert("buffet".to_string(), 1.0);
        terms.insert("menu".to_string(), 0.5);
        terms.insert("ignored".to_string(), 0.0);
        let query = PersonaQuery {
            role: String::new(),
            task: String::new(),
            category: None,
            terms,
        };
        let v = embedder.embed_query(&query);
        assert_eq!(v.len(), 2);
        assert!((v.norm() - 1.0).abs() < 1e-5);
    }
}
