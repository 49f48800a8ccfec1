//! # outlinerank
//!
//! Structural outline extraction and persona-driven section ranking for
//! paginated documents.
//!
//! The crate consumes typed text runs (page, position, font, text) produced by
//! an external PDF-extraction library. From them it builds a title and an
//! H1-H3 outline per document, cuts each document into sections, and ranks
//! the sections of a whole collection against a persona role and task with a
//! collection-local TF-IDF model.
//!
//! ## Quick Start
//!
//! ```no_run
//! use outlinerank::{extract_outline, render, TextRun};
//!
//! fn main() -> outlinerank::Result<()> {
//!     let runs = vec![
//!         TextRun::new(1, "Travel Guide", 24.0).at(72.0, 50.0),
//!         TextRun::new(1, "1. Introduction", 18.0).with_bold(true).at(72.0, 100.0),
//!         TextRun::new(1, "Welcome to the south of France.", 12.0).at(72.0, 130.0),
//!     ];
//!
//!     let outline = extract_outline("guide.pdf", &runs);
//!     println!("{}", render::to_json(&outline, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Outline extraction**: body baseline, heading candidates, style clusters, numbering
//! - **Running header/footer removal**: repeated page furniture never becomes a heading
//! - **Persona queries**: built-in travel, HR, food-service and research keyword tables
//! - **Explainable ranking**: cosine, title overlap, position prior and keyword hits
//! - **Parallel processing**: uses Rayon for per-document extraction and scoring

pub mod error;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod rank;
pub mod render;
pub mod text;

// Re-export commonly used types
pub use error::{Error, Result};
pub use layout::{LayoutOptions, OutlineExtractor, TitleFallback};
pub use model::{
    BoundingBox, CollectionInput, CollectionOutput, DocumentOutline, DocumentRef, HeadingLevel,
    Outline, OutlineNode, ScoredSection, Section, SubsectionExcerpt, TextRun,
};
pub use pipeline::{AnalysisOptions, CollectionAnalyzer, InMemoryRuns, RunSource};
pub use rank::{PersonaQuery, PersonaRegistry, QueryBuilder, RankingOptions};
pub use render::JsonFormat;

use std::path::Path;

/// Extract the outline of one document with default options.
///
/// # Arguments
///
/// * `document` - File name of the document
/// * `runs` - Text runs in reading order
///
/// # Example
///
/// ```
/// use outlinerank::{extract_outline, TextRun};
///
/// let outline = extract_outline("empty.pdf", &[]);
/// assert!(outline.outline.is_empty());
/// ```
pub fn extract_outline(document: &str, runs: &[TextRun]) -> DocumentOutline {
    OutlineExtractor::default()
        .extract(document, runs)
        .to_document_outline()
}

/// Extract the outline of one document with custom options.
///
/// # Example
///
/// ```no_run
/// use outlinerank::{extract_outline_with_options, LayoutOptions, TitleFallback};
///
/// let options = LayoutOptions::new().with_title_fallback(TitleFallback::FileName);
/// let outline = extract_outline_with_options("report.pdf", &[], &options).unwrap();
/// assert_eq!(outline.title, "report");
/// ```
pub fn extract_outline_with_options(
    document: &str,
    runs: &[TextRun],
    options: &LayoutOptions,
) -> Result<DocumentOutline> {
    options.validate()?;
    Ok(OutlineExtractor::new(options.clone())
        .extract(document, runs)
        .to_document_outline())
}

/// Extract an outline and render it as JSON.
pub fn outline_to_json(document: &str, runs: &[TextRun], format: JsonFormat) -> Result<String> {
    render::to_json(&extract_outline(document, runs), format)
}

/// Analyze a collection with default options.
///
/// # Example
///
/// ```no_run
/// use outlinerank::{analyze_collection, CollectionInput, InMemoryRuns};
///
/// let input = CollectionInput::from_path("challenge1b_input.json").unwrap();
/// let output = analyze_collection(&input, InMemoryRuns::new()).unwrap();
/// println!("{} sections", output.extracted_sections.len());
/// ```
pub fn analyze_collection(
    input: &CollectionInput,
    source: impl RunSource + 'static,
) -> Result<CollectionOutput> {
    CollectionAnalyzer::new(source).analyze(input)
}

/// Analyze a collection given as a JSON string and return the output as JSON.
pub fn analyze_collection_json(
    input_json: &str,
    source: impl RunSource + 'static,
    format: JsonFormat,
) -> Result<String> {
    let input = CollectionInput::from_json_str(input_json)?;
    let output = analyze_collection(&input, source)?;
    render::to_json(&output, format)
}

/// Analyze a collection input file.
pub fn analyze_collection_file<P: AsRef<Path>>(
    path: P,
    source: impl RunSource + 'static,
) -> Result<CollectionOutput> {
    let input = CollectionInput::from_path(path)?;
    analyze_collection(&input, source)
}
