//! Text-run sources: the contract with the PDF-extraction collaborator.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::TextRun;

/// Supplies the text runs of a document by file name.
///
/// Implementations are shared across worker threads.
pub trait RunSource: Send + Sync {
    /// Ordered text runs of `filename`.
    fn text_runs(&self, filename: &str) -> Result<Vec<TextRun>>;
}

impl<F> RunSource for F
where
    F: Fn(&str) -> Result<Vec<TextRun>> + Send + Sync,
{
    fn text_runs(&self, filename: &str) -> Result<Vec<TextRun>> {
        self(filename)
    }
}

/// Runs held in memory, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRuns {
    documents: HashMap<String, Vec<TextRun>>,
}

impl InMemoryRuns {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, replacing any previous runs under the same name.
    pub fn insert(&mut self, filename: impl Into<String>, runs: Vec<TextRun>) {
        self.documents.insert(filename.into(), runs);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_document(mut self, filename: impl Into<String>, runs: Vec<TextRun>) -> Self {
        self.insert(filename, runs);
        self
    }

    /// Number of documents held.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if no document is held.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl RunSource for InMemoryRuns {
    fn text_runs(&self, filename: &str) -> Result<Vec<TextRun>> {
        self.documents
            .get(filename)
            .cloned()
            .ok_or_else(|| Error::extraction(filename, "no text runs available"))
    }
}

/// Decode a JSON array of text runs.
pub fn runs_from_json(json: &str) -> Result<Vec<TextRun>> {
    Ok(serde_json::from_str(json)?)
}
