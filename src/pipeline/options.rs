//! Collection analysis options.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::layout::{LayoutOptions, TitleFallback};
use crate::rank::RankingOptions;

/// Overrides `top_sections`.
pub const ENV_TOP_SECTIONS: &str = "OUTLINERANK_TOP_SECTIONS";
/// Overrides `top_excerpts`.
pub const ENV_TOP_EXCERPTS: &str = "OUTLINERANK_TOP_EXCERPTS";
/// Overrides the time budget, in seconds.
pub const ENV_TIME_BUDGET_SECS: &str = "OUTLINERANK_TIME_BUDGET_SECS";

/// Options for analyzing a whole collection.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Outline extraction options
    pub layout: LayoutOptions,

    /// Ranking options
    pub ranking: RankingOptions,

    /// Soft wall-clock budget for per-document extraction (None = unbounded)
    pub time_budget: Option<Duration>,

    /// Run per-document extraction on a rayon pool
    pub parallel: bool,

    /// Extraction worker threads (0 = one per CPU)
    pub workers: usize,
}

impl AnalysisOptions {
    /// Create new analysis options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Set ranking options.
    pub fn with_ranking(mut self, ranking: RankingOptions) -> Self {
        self.ranking = ranking;
        self
    }

    /// Set the number of selected sections.
    pub fn with_top_sections(mut self, n: usize) -> Self {
        self.ranking.top_sections = n;
        self
    }

    /// Set the number of excerpts per selected section.
    pub fn with_top_excerpts(mut self, n: usize) -> Self {
        self.ranking.top_excerpts = n;
        self
    }

    /// Set the title fallback policy.
    pub fn with_title_fallback(mut self, fallback: TitleFallback) -> Self {
        self.layout.title_fallback = fallback;
        self
    }

    /// Set the soft time budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Remove the time budget.
    pub fn without_time_budget(mut self) -> Self {
        self.time_budget = None;
        self
    }

    /// Enable or disable parallel extraction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the number of extraction worker threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Apply `OUTLINERANK_*` environment overrides.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any key lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(n) = parse_override::<usize>(&lookup, ENV_TOP_SECTIONS)? {
            self.ranking.top_sections = n;
        }
        if let Some(n) = parse_override::<usize>(&lookup, ENV_TOP_EXCERPTS)? {
            self.ranking.top_excerpts = n;
        }
        if let Some(secs) = parse_override::<f64>(&lookup, ENV_TIME_BUDGET_SECS)? {
            if !(secs.is_finite() && secs >= 0.0) {
                return Err(Error::Config(format!(
                    "{} must be a non-negative number of seconds",
                    ENV_TIME_BUDGET_SECS
                )));
            }
            self.time_budget = Some(Duration::from_secs_f64(secs));
        }
        Ok(self)
    }

    /// Validate layout and ranking options.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.ranking.validate()
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            ranking: RankingOptions::default(),
            time_budget: Some(Duration::from_secs(60)),
            parallel: true,
            workers: 0,
        }
    }
}

fn parse_override<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} has an invalid value: {:?}", key, raw))),
    }
}
