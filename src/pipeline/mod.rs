//! Collection pipeline: per-document extraction, the IDF join, and ranking.
//!
//! Each document is extracted and segmented on its own rayon task. Results
//! come back over a channel to a single collector, which is the only join
//! point before collection-wide scoring. A soft time budget bounds how long
//! the collector waits; documents that miss it are reported as skipped.
//!
//! # Example
//!
//! ```no_run
//! use outlinerank::pipeline::{CollectionAnalyzer, InMemoryRuns};
//! use outlinerank::{CollectionInput, DocumentRef, TextRun};
//!
//! fn main() -> outlinerank::Result<()> {
//!     let source = InMemoryRuns::new()
//!         .with_document("menu.pdf", vec![TextRun::new(1, "Vegetarian Mains", 18.0)]);
//!     let input = CollectionInput::new(
//!         vec![DocumentRef::new("menu.pdf", "Menu")],
//!         "Food Contractor",
//!         "Prepare a vegetarian buffet",
//!     );
//!
//!     let output = CollectionAnalyzer::new(source).analyze(&input)?;
//!     println!("{}", output.extracted_sections.len());
//!     Ok(())
//! }
//! ```

mod options;
mod source;

pub use options::{AnalysisOptions, ENV_TIME_BUDGET_SECS, ENV_TOP_EXCERPTS, ENV_TOP_SECTIONS};
pub use source::{runs_from_json, InMemoryRuns, RunSource};

use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use crossbeam_channel::RecvTimeoutError;
use rayon::ThreadPoolBuilder;

use crate::error::{Error, Result};
use crate::layout::{OutlineExtractor, TitleFallback};
use crate::model::{
    CollectionInput, CollectionOutput, DocumentOutline, ExtractedSection, OutputMetadata,
    Section, SkippedDocument, SubsectionAnalysis,
};
use crate::rank::{PersonaRegistry, QueryBuilder, RankedCollection, RelevanceScorer};

const BUDGET_EXCEEDED: &str = "time budget exceeded";

/// Outline and sections of one extracted document.
#[derive(Debug, Clone)]
pub struct DocumentAnalysis {
    /// Document file name
    pub document: String,
    /// Position in the collection
    pub document_index: usize,
    /// Extracted outline
    pub outline: DocumentOutline,
    /// Sections in reading order
    pub sections: Vec<Section>,
}

/// Full result of a collection run.
#[derive(Debug, Clone)]
pub struct CollectionReport {
    /// Output document
    pub output: CollectionOutput,
    /// Per-document analyses, in collection order, skipped documents excluded
    pub documents: Vec<DocumentAnalysis>,
    /// Ranked sections with score breakdowns
    pub ranked: RankedCollection,
}

/// Analyzes document collections against a persona and task.
pub struct CollectionAnalyzer {
    source: Arc<dyn RunSource>,
    options: AnalysisOptions,
    registry: Option<PersonaRegistry>,
}

impl CollectionAnalyzer {
    /// Create an analyzer reading runs from `source`.
    pub fn new(source: impl RunSource + 'static) -> Self {
        Self::from_arc(Arc::new(source))
    }

    /// Create an analyzer over a shared source.
    pub fn from_arc(source: Arc<dyn RunSource>) -> Self {
        Self {
            source,
            options: AnalysisOptions::default(),
            registry: None,
        }
    }

    /// Replace all options.
    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the number of selected sections.
    pub fn with_top_sections(mut self, n: usize) -> Self {
        self.options = self.options.with_top_sections(n);
        self
    }

    /// Set the number of excerpts per selected section.
    pub fn with_top_excerpts(mut self, n: usize) -> Self {
        self.options = self.options.with_top_excerpts(n);
        self
    }

    /// Set the soft time budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.options = self.options.with_time_budget(budget);
        self
    }

    /// Set the title fallback policy.
    pub fn with_title_fallback(mut self, fallback: TitleFallback) -> Self {
        self.options = self.options.with_title_fallback(fallback);
        self
    }

    /// Use a caller-provided persona registry instead of the built-in one.
    pub fn with_registry(mut self, registry: PersonaRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Disable parallel extraction.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.with_parallel(false);
        self
    }

    /// Get the options.
    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    fn registry(&self) -> &PersonaRegistry {
        match &self.registry {
            Some(registry) => registry,
            None => PersonaRegistry::builtin(),
        }
    }

    /// Analyze a collection and return the output document.
    pub fn analyze(&self, input: &CollectionInput) -> Result<CollectionOutput> {
        self.run(input).map(|report| report.output)
    }

    /// Analyze a collection and keep the intermediate results.
    pub fn run(&self, input: &CollectionInput) -> Result<CollectionReport> {
        self.options.validate()?;
        input.validate()?;

        let started = Instant::now();
        let processing_timestamp = Local::now()
            .naive_local()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string();
        let role = &input.persona.role;
        let task = &input.job_to_be_done.task;
        log::info!(
            "Analyzing {} documents for {:?}: {:?}",
            input.documents.len(),
            role,
            task
        );

        let deadline = self.options.time_budget.map(|budget| started + budget);
        let extractor = OutlineExtractor::new(self.options.layout.clone());
        let (mut documents, skipped) = if self.options.parallel {
            self.extract_parallel(input, &extractor, deadline)?
        } else {
            self.extract_sequential(input, &extractor, deadline)
        };
        documents.sort_by_key(|d| d.document_index);

        let query = QueryBuilder::new(self.registry()).build(role, task);
        let sections: Vec<Section> = documents
            .iter()
            .flat_map(|d| d.sections.iter().cloned())
            .collect();
        let ranked = RelevanceScorer::new(&self.options.ranking, &query).rank(sections);

        let elapsed = started.elapsed().as_secs_f64();
        log::info!(
            "Ranked {} sections from {} documents in {:.2}s ({} skipped)",
            ranked.candidates,
            documents.len(),
            elapsed,
            skipped.len()
        );

        let output = CollectionOutput {
            metadata: OutputMetadata {
                input_documents: input.filenames(),
                persona: role.clone(),
                job_to_be_done: task.clone(),
                processing_timestamp,
                processing_time_seconds: (elapsed * 100.0).round() / 100.0,
                skipped_documents: skipped,
            },
            extracted_sections: ranked
                .sections
                .iter()
                .map(|s| ExtractedSection {
                    document: s.section.document.clone(),
                    section_title: s.section.title.clone(),
                    importance_rank: s.rank,
                    page_number: s.section.start_page,
                })
                .collect(),
            subsection_analysis: ranked
                .excerpts
                .iter()
                .map(|e| SubsectionAnalysis {
                    document: e.document.clone(),
                    refined_text: e.text.clone(),
                    page_number: e.page,
                })
                .collect(),
        };

        Ok(CollectionReport {
            output,
            documents,
            ranked,
        })
    }

    /// Extract on a pool owned by this run, so the collector never blocks
    /// a worker the document tasks need (e.g. when called from `par_iter`).
    fn extract_parallel(
        &self,
        input: &CollectionInput,
        extractor: &OutlineExtractor,
        deadline: Option<Instant>,
    ) -> Result<(Vec<DocumentAnalysis>, Vec<SkippedDocument>)> {
        if input.documents.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.options.workers.min(input.documents.len()))
            .thread_name(|i| format!("outlinerank-extract-{}", i))
            .build()?;

        let (tx, rx) = crossbeam_channel::unbounded();
        for (index, doc) in input.documents.iter().enumerate() {
            let tx = tx.clone();
            let source = Arc::clone(&self.source);
            let extractor = extractor.clone();
            let filename = doc.filename.clone();
            pool.spawn(move || {
                let result = guarded_analyze(source.as_ref(), &extractor, &filename, index);
                // the collector is gone once the budget has run out
                let _ = tx.send((index, result));
            });
        }
        drop(tx);

        let mut pending: BTreeSet<usize> = (0..input.documents.len()).collect();
        let mut documents = Vec::with_capacity(pending.len());
        let mut skipped = Vec::new();
        let mut reason = BUDGET_EXCEEDED;

        while !pending.is_empty() {
            let received = match deadline {
                Some(deadline) => rx.recv_deadline(deadline),
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok((index, result)) => {
                    pending.remove(&index);
                    let filename = &input.documents[index].filename;
                    collect_result(filename, result, &mut documents, &mut skipped);
                }
                Err(RecvTimeoutError::Timeout) => {
                    log::warn!(
                        "Time budget exceeded with {} documents outstanding",
                        pending.len()
                    );
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    reason = "extraction did not complete";
                    break;
                }
            }
        }

        for index in pending {
            skipped.push(SkippedDocument {
                document: input.documents[index].filename.clone(),
                reason: reason.to_string(),
            });
        }
        skipped.sort_by_cached_key(|s| {
            input
                .documents
                .iter()
                .position(|d| d.filename == s.document)
        });

        Ok((documents, skipped))
    }

    fn extract_sequential(
        &self,
        input: &CollectionInput,
        extractor: &OutlineExtractor,
        deadline: Option<Instant>,
    ) -> (Vec<DocumentAnalysis>, Vec<SkippedDocument>) {
        let mut documents = Vec::with_capacity(input.documents.len());
        let mut skipped = Vec::new();

        for (index, doc) in input.documents.iter().enumerate() {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                log::warn!("Time budget exceeded, skipping {}", doc.filename);
                skipped.push(SkippedDocument {
                    document: doc.filename.clone(),
                    reason: BUDGET_EXCEEDED.to_string(),
                });
                continue;
            }
            let result = guarded_analyze(self.source.as_ref(), extractor, &doc.filename, index);
            collect_result(&doc.filename, result, &mut documents, &mut skipped);
        }

        (documents, skipped)
    }
}

/// Run the per-document stages for one file.
fn analyze_document(
    source: &dyn RunSource,
    extractor: &OutlineExtractor,
    filename: &str,
    document_index: usize,
) -> Result<DocumentAnalysis> {
    let runs = source.text_runs(filename)?;
    let layout = extractor.analyze(filename, &runs);
    let sections = layout.sections(document_index, extractor.options());

    Ok(DocumentAnalysis {
        document: filename.to_string(),
        document_index,
        outline: layout.outline.to_document_outline(),
        sections,
    })
}

/// [`analyze_document`] with a panicking source turned into an extraction error.
fn guarded_analyze(
    source: &dyn RunSource,
    extractor: &OutlineExtractor,
    filename: &str,
    document_index: usize,
) -> Result<DocumentAnalysis> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        analyze_document(source, extractor, filename, document_index)
    }))
    .unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        Err(Error::extraction(filename, format!("panicked: {}", message)))
    })
}

fn collect_result(
    filename: &str,
    result: Result<DocumentAnalysis>,
    documents: &mut Vec<DocumentAnalysis>,
    skipped: &mut Vec<SkippedDocument>,
) {
    match result {
        Ok(analysis) => documents.push(analysis),
        Err(e) => {
            log::warn!("Skipping {}: {}", filename, e);
            skipped.push(SkippedDocument {
                document: filename.to_string(),
                reason: e.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentRef, TextRun};

    fn menu_runs() -> Vec<TextRun> {
        let mut runs = vec![
            TextRun::new(1, "Dinner Ideas", 24.0).at(72.0, 40.0),
            TextRun::new(1, "Vegetarian Lasagne", 16.0)
                .with_bold(true)
                .at(72.0, 90.0),
        ];
        for i in 0..4 {
            runs.push(
                TextRun::new(1, format!("Layers of spinach and ricotta, step {}.", i), 11.0)
                    .at(72.0, 120.0 + i as f32 * 14.0),
            );
        }
        runs
    }

    fn input(files: &[&str]) -> CollectionInput {
        CollectionInput::new(
            files.iter().map(|f| DocumentRef::new(*f, *f)).collect(),
            "Food Contractor",
            "Prepare a vegetarian buffet-style dinner menu",
        )
    }

    #[test]
    fn test_failed_document_is_skipped() {
        let source = InMemoryRuns::new().with_document("menu.pdf", menu_runs());
        let analyzer = CollectionAnalyzer::new(source);
        let report = analyzer.run(&input(&["menu.pdf", "broken.pdf"])).unwrap();

        assert_eq!(report.documents.len(), 1);
        let skipped = &report.output.metadata.skipped_documents;
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].document, "broken.pdf");
        assert_eq!(
            report.output.metadata.input_documents,
            vec!["menu.pdf", "broken.pdf"]
        );
        assert!(!report.output.extracted_sections.is_empty());
    }

    fn panicking_source() -> impl RunSource {
        |name: &str| -> Result<Vec<TextRun>> {
            if name == "bad.pdf" {
                panic!("corrupt stream in {}", name);
            }
            Ok(menu_runs())
        }
    }

    #[test]
    fn test_panicking_source_is_skipped() {
        let analyzers = [
            CollectionAnalyzer::new(panicking_source()),
            CollectionAnalyzer::new(panicking_source()).sequential(),
        ];
        for analyzer in analyzers {
            let output = analyzer.analyze(&input(&["menu.pdf", "bad.pdf"])).unwrap();
            let skipped = &output.metadata.skipped_documents;
            assert_eq!(skipped.len(), 1);
            assert_eq!(skipped[0].document, "bad.pdf");
            assert!(skipped[0].reason.contains("corrupt stream in bad.pdf"));
            assert!(output
                .extracted_sections
                .iter()
                .all(|s| s.document == "menu.pdf"));
            assert!(!output.extracted_sections.is_empty());
        }
    }

    #[test]
    fn test_analyze_from_inside_busy_pool() {
        use rayon::prelude::*;

        let pool = ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let analyzer =
            CollectionAnalyzer::new(InMemoryRuns::new().with_document("menu.pdf", menu_runs()))
                .with_time_budget(Duration::from_secs(30));
        let started = Instant::now();

        let output = pool.install(|| analyzer.analyze(&input(&["menu.pdf"]))).unwrap();
        assert!(output.metadata.skipped_documents.is_empty());
        assert!(!output.extracted_sections.is_empty());

        let inputs = vec![input(&["menu.pdf"]), input(&["menu.pdf"])];
        let outputs = pool
            .install(|| {
                inputs
                    .par_iter()
                    .map(|i| analyzer.analyze(i))
                    .collect::<Result<Vec<_>>>()
            })
            .unwrap();
        assert!(outputs
            .iter()
            .all(|o| o.metadata.skipped_documents.is_empty()));
        assert!(started.elapsed() < Duration::from_secs(30));
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let source = Arc::new(
            InMemoryRuns::new()
                .with_document("a.pdf", menu_runs())
                .with_document("b.pdf", menu_runs()),
        );
        let input = input(&["a.pdf", "b.pdf"]);
        let parallel = CollectionAnalyzer::from_arc(source.clone()).analyze(&input).unwrap();
        let sequential = CollectionAnalyzer::from_arc(source)
            .sequential()
            .analyze(&input)
            .unwrap();
        assert_eq!(parallel.extracted_sections, sequential.extracted_sections);
        assert_eq!(parallel.subsection_analysis, sequential.subsection_analysis);
    }

    #[test]
    fn test_zero_budget_skips_everything() {
        let source = InMemoryRuns::new().with_document("menu.pdf", menu_runs());
        let output = CollectionAnalyzer::new(source)
            .sequential()
            .with_time_budget(Duration::ZERO)
            .analyze(&input(&["menu.pdf"]))
            .unwrap();
        assert!(output.extracted_sections.is_empty());
        assert_eq!(output.metadata.skipped_documents[0].reason, BUDGET_EXCEEDED);
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let analyzer = CollectionAnalyzer::new(InMemoryRuns::new()).with_top_sections(0);
        assert!(matches!(analyzer.analyze(&input(&[])), Err(Error::Config(_))));
    }

    #[test]
    fn test_processing_time_is_rounded() {
        let output = CollectionAnalyzer::new(InMemoryRuns::new())
            .analyze(&input(&[]))
            .unwrap();
        let t = output.metadata.processing_time_seconds;
        assert_eq!((t * 100.0).round() / 100.0, t);
        assert_eq!(output.metadata.processing_timestamp.len(), 26);
    }
}
