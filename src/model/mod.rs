//! Data model shared by outline extraction and ranking.
//!
//! Text runs come in from the extraction collaborator, outlines and sections
//! are produced per document, and the collection types mirror the JSON
//! documents exchanged with the batch driver.

mod collection;
mod outline;
mod run;
mod section;

pub use collection::{
    CollectionInput, CollectionOutput, DocumentRef, ExtractedSection, JobToBeDone,
    OutputMetadata, Persona, SkippedDocument, SubsectionAnalysis,
};
pub use outline::{DocumentOutline, HeadingLevel, Outline, OutlineNode};
pub use run::{is_bold_font_name, BoundingBox, TextRun};
pub use section::{ScoreBreakdown, ScoredSection, Section, SectionParagraph, SubsectionExcerpt};
