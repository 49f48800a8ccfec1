//! Persona-driven relevance ranking.
//!
//! A persona role and task become a weighted query, sections of the whole
//! collection are embedded with collection-local TF-IDF, and each section is
//! scored on similarity, title overlap, position and keyword hits.

mod embed;
mod options;
mod persona;
mod scorer;

pub use embed::{KeywordEmbedder, TermVector};
pub use options::{RankingOptions, ScoreWeights};
pub use persona::{CategoryProfile, PersonaCategory, PersonaQuery, PersonaRegistry, QueryBuilder};
pub use scorer::{is_boilerplate_title, RankedCollection, RelevanceScorer};
