//! Collection input and output documents.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Error, Result};

/// A collection request: documents plus the persona and task to rank for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInput {
    /// Free-form challenge metadata, passed through untouched
    #[serde(default)]
    pub challenge_info: serde_json::Value,
    /// Documents in collection order
    pub documents: Vec<DocumentRef>,
    /// Who is asking
    pub persona: Persona,
    /// What they need to get done
    pub job_to_be_done: JobToBeDone,
}

/// A document entry of the collection input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// File name, used as the document id
    pub filename: String,
    /// Human-readable title
    #[serde(default)]
    pub title: String,
}

impl DocumentRef {
    /// Create a document reference.
    pub fn new(filename: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            title: title.into(),
        }
    }
}

/// Persona block of the collection input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Role description, e.g. "Food Contractor"
    pub role: String,
}

/// Job-to-be-done block of the collection input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobToBeDone {
    /// Task statement
    pub task: String,
}

impl CollectionInput {
    /// Build an input from its parts.
    pub fn new(
        documents: Vec<DocumentRef>,
        role: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        Self {
            challenge_info: serde_json::Value::Null,
            documents,
            persona: Persona { role: role.into() },
            job_to_be_done: JobToBeDone { task: task.into() },
        }
    }

    /// Parse and validate an input from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let input: Self = serde_json::from_str(json).map_err(|e| Error::Input(e.to_string()))?;
        input.validate()?;
        Ok(input)
    }

    /// Parse and validate an input from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let input: Self =
            serde_json::from_reader(reader).map_err(|e| Error::Input(e.to_string()))?;
        input.validate()?;
        Ok(input)
    }

    /// Parse and validate an input file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// Check that every document has a file name and names are unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for (i, doc) in self.documents.iter().enumerate() {
            if doc.filename.trim().is_empty() {
                return Err(Error::Input(format!("document {} has no filename", i)));
            }
            if !seen.insert(doc.filename.as_str()) {
                return Err(Error::Input(format!(
                    "document {} is listed twice",
                    doc.filename
                )));
            }
        }
        Ok(())
    }

    /// File names in collection order.
    pub fn filenames(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.filename.clone()).collect()
    }
}

/// Ranked output for one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionOutput {
    /// Run metadata
    pub metadata: OutputMetadata,
    /// Top-ranked sections
    pub extracted_sections: Vec<ExtractedSection>,
    /// Excerpts from the top-ranked sections
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

/// Metadata block of the collection output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputMetadata {
    /// File names of every requested document
    pub input_documents: Vec<String>,
    /// Persona role
    pub persona: String,
    /// Task statement
    pub job_to_be_done: String,
    /// Local time the run started, ISO 8601
    pub processing_timestamp: String,
    /// Wall-clock seconds, rounded to two decimals
    pub processing_time_seconds: f64,
    /// Documents left out of the ranking
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_documents: Vec<SkippedDocument>,
}

/// A document that did not take part in ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedDocument {
    /// Document file name
    pub document: String,
    /// Why it was skipped
    pub reason: String,
}

/// One entry of `extracted_sections`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSection {
    /// Document file name
    pub document: String,
    /// Section title
    pub section_title: String,
    /// 1-based rank
    pub importance_rank: usize,
    /// First page of the section
    pub page_number: u32,
}

/// One entry of `subsection_analysis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    /// Document file name
    pub document: String,
    /// Trimmed excerpt text
    pub refined_text: String,
    /// Page of the excerpt
    pub page_number: u32,
}
