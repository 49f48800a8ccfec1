//! Ranking options.

use crate::error::{Error, Result};

/// Weights of the four score terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Query/section cosine similarity
    pub cosine: f32,
    /// Title term overlap
    pub title_overlap: f32,
    /// Positional prior
    pub positional_prior: f32,
    /// Persona keyword hits
    pub keyword_hits: f32,
}

impl ScoreWeights {
    /// Create weights from the four terms.
    pub fn new(cosine: f32, title_overlap: f32, positional_prior: f32, keyword_hits: f32) -> Self {
        Self {
            cosine,
            title_overlap,
            positional_prior,
            keyword_hits,
        }
    }

    fn validate(&self) -> Result<()> {
        let terms = [
            ("cosine", self.cosine),
            ("title_overlap", self.title_overlap),
            ("positional_prior", self.positional_prior),
            ("keyword_hits", self.keyword_hits),
        ];
        for (name, value) in terms {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::Config(format!(
                    "weight {} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::new(0.5, 0.2, 0.1, 0.2)
    }
}

/// Options for scoring and selecting sections and excerpts.
#[derive(Debug, Clone)]
pub struct RankingOptions {
    /// Score term weights
    pub weights: ScoreWeights,

    /// Number of sections kept per collection
    pub top_sections: usize,

    /// Excerpts emitted per selected section
    pub top_excerpts: usize,

    /// Excerpt length bound in characters
    pub max_excerpt_chars: usize,

    /// Paragraphs shorter than this never become excerpts
    pub min_excerpt_chars: usize,

    /// Paragraphs scoring below this never become excerpts
    pub min_excerpt_score: f32,

    /// Emit each (document, text) excerpt at most once
    pub dedup_excerpts: bool,

    /// Cap on sections taken from a single document (None = no cap)
    pub max_sections_per_document: Option<usize>,

    /// Positional prior is `1 / (1 + decay * section_index)`
    pub prior_decay: f32,

    /// Prior assigned to boilerplate sections, negated
    pub boilerplate_penalty: f32,
}

impl RankingOptions {
    /// Create new ranking options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the score weights.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the number of selected sections.
    pub fn with_top_sections(mut self, n: usize) -> Self {
        self.top_sections = n;
        self
    }

    /// Set the number of excerpts per selected section.
    pub fn with_top_excerpts(mut self, n: usize) -> Self {
        self.top_excerpts = n;
        self
    }

    /// Set the excerpt length bound.
    pub fn with_max_excerpt_chars(mut self, chars: usize) -> Self {
        self.max_excerpt_chars = chars;
        self
    }

    /// Set the minimum paragraph length for excerpts.
    pub fn with_min_excerpt_chars(mut self, chars: usize) -> Self {
        self.min_excerpt_chars = chars;
        self
    }

    /// Set the minimum paragraph score for excerpts.
    pub fn with_min_excerpt_score(mut self, score: f32) -> Self {
        self.min_excerpt_score = score;
        self
    }

    /// Enable or disable excerpt deduplication.
    pub fn with_dedup_excerpts(mut self, dedup: bool) -> Self {
        self.dedup_excerpts = dedup;
        self
    }

    /// Limit how many sections one document may contribute.
    pub fn with_max_sections_per_document(mut self, cap: usize) -> Self {
        self.max_sections_per_document = Some(cap);
        self
    }

    /// Check that weights and limits are usable.
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        if self.top_sections == 0 {
            return Err(Error::Config("top_sections must be at least 1".to_string()));
        }
        if self.max_excerpt_chars == 0 {
            return Err(Error::Config("max_excerpt_chars must be at least 1".to_string()));
        }
        if !(self.min_excerpt_score.is_finite() && self.min_excerpt_score >= 0.0) {
            return Err(Error::Config(format!(
                "min_excerpt_score must be non-negative, got {}",
                self.min_excerpt_score
            )));
        }
        if self.max_sections_per_document == Some(0) {
            return Err(Error::Config(
                "max_sections_per_document must be at least 1".to_string(),
            ));
        }
        if !(self.prior_decay.is_finite() && self.prior_decay >= 0.0) {
            return Err(Error::Config(format!(
                "prior_decay must be non-negative, got {}",
                self.prior_decay
            )));
        }
        if !(self.boilerplate_penalty.is_finite() && self.boilerplate_penalty >= 0.0) {
            return Err(Error::Config(format!(
                "boilerplate_penalty must be non-negative, got {}",
                self.boilerplate_penalty
            )));
        }
        Ok(())
    }
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            top_sections: 5,
            top_excerpts: 2,
            max_excerpt_chars: 500,
            min_excerpt_chars: 20,
            min_excerpt_score: 0.0,
            dedup_excerpts: true,
            max_sections_per_document: None,
            prior_decay: 0.1,
            boilerplate_penalty: 1.0,
        }
    }
}
