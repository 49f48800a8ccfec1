//! Section scoring, ranking and excerpt selection.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::OnceLock;

use rayon::prelude::*;
use regex::Regex;

use super::embed::{KeywordEmbedder, TermVector};
use super::options::RankingOptions;
use super::persona::PersonaQuery;
use crate::model::{ScoreBreakdown, ScoredSection, Section, SubsectionExcerpt};
use crate::text::{tokenize, truncate_at_sentence};

/// Check if a section title is navigational or legal boilerplate.
pub fn is_boilerplate_title(title: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:\d+(?:\.\d+)*\.?\s+)?(?:table\s+of\s+contents|contents|index|appendix\b.*|references|bibliography|acknowledge?ments?|revision\s+history|copyright\b.*)$",
        )
        .unwrap()
    });
    re.is_match(title.trim())
}

/// Outcome of ranking one collection.
#[derive(Debug, Clone, Default)]
pub struct RankedCollection {
    /// Selected sections, rank 1 first
    pub sections: Vec<ScoredSection>,
    /// Excerpts of the selected sections, in rank order
    pub excerpts: Vec<SubsectionExcerpt>,
    /// Number of sections that were scored
    pub candidates: usize,
}

/// Scores sections against a persona query.
pub struct RelevanceScorer<'a> {
    options: &'a RankingOptions,
    query: &'a PersonaQuery,
}

impl<'a> RelevanceScorer<'a> {
    /// Create a scorer for `query`.
    pub fn new(options: &'a RankingOptions, query: &'a PersonaQuery) -> Self {
        Self { options, query }
    }

    /// Score and order every section; ranks cover the full list.
    pub fn score_all(&self, sections: Vec<Section>) -> Vec<ScoredSection> {
        let (scored, _) = self.score_with_embedder(sections);
        scored
    }

    /// Select the top sections and their best excerpts.
    pub fn rank(&self, sections: Vec<Section>) -> RankedCollection {
        let candidates = sections.len();
        let (scored, embedder) = self.score_with_embedder(sections);

        let mut per_document: HashMap<usize, usize> = HashMap::new();
        let mut selected: Vec<ScoredSection> = scored
            .into_iter()
            .filter(|s| match self.options.max_sections_per_document {
                Some(cap) => {
                    let taken = per_document.entry(s.section.document_index).or_insert(0);
                    *taken += 1;
                    *taken <= cap
                }
                None => true,
            })
            .take(self.options.top_sections)
            .collect();
        for (position, section) in selected.iter_mut().enumerate() {
            section.rank = position + 1;
        }

        let excerpts = self.excerpts(&selected, &embedder);
        log::debug!(
            "Selected {} of {} sections, {} excerpts",
            selected.len(),
            candidates,
            excerpts.len()
        );

        RankedCollection {
            sections: selected,
            excerpts,
            candidates,
        }
    }

    fn score_with_embedder(
        &self,
        sections: Vec<Section>,
    ) -> (Vec<ScoredSection>, KeywordEmbedder) {
        let tokens: Vec<Vec<String>> = sections
            .par_iter()
            .map(|s| {
                let mut tokens = tokenize(&s.title);
                tokens.extend(tokenize(&s.text()));
                tokens
            })
            .collect();

        // IDF needs every section of the collection before any score
        let embedder = KeywordEmbedder::fit(&tokens);
        let query_vector = embedder.embed_query(self.query);

        let mut scored: Vec<ScoredSection> = sections
            .into_par_iter()
            .zip(tokens.par_iter())
            .map(|(section, tokens)| {
                let breakdown = self.breakdown(&section, tokens, &embedder, &query_vector);
                ScoredSection {
                    score: self.combine(&breakdown),
                    breakdown,
                    section,
                    rank: 0,
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.section.document_index.cmp(&b.section.document_index))
                .then(a.section.start_page.cmp(&b.section.start_page))
                .then(a.section.index.cmp(&b.section.index))
        });
        for (position, section) in scored.iter_mut().enumerate() {
            section.rank = position + 1;
        }

        (scored, embedder)
    }

    fn breakdown(
        &self,
        section: &Section,
        tokens: &[String],
        embedder: &KeywordEmbedder,
        query_vector: &TermVector,
    ) -> ScoreBreakdown {
        let section_vector = embedder.embed_tokens(tokens);

        let title_tokens = tokenize(&section.title);
        let title_overlap = if title_tokens.is_empty() {
            0.0
        } else {
            let hits = title_tokens.iter().filter(|t| self.query.contains(t)).count();
            hits as f32 / title_tokens.len() as f32
        };

        let positional_prior = if is_boilerplate_title(&section.title) {
            -self.options.boilerplate_penalty
        } else {
            1.0 / (1.0 + self.options.prior_decay * section.index as f32)
        };

        ScoreBreakdown {
            cosine: query_vector.cosine(&section_vector),
            title_overlap,
            positional_prior,
            keyword_hits: self.keyword_hits(tokens),
        }
    }

    /// Share of query weight whose terms occur in `tokens`.
    fn keyword_hits(&self, tokens: &[String]) -> f32 {
        let total = self.query.total_weight();
        if total <= 0.0 {
            return 0.0;
        }
        let present: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
        let found: f32 = self
            .query
            .terms
            .iter()
            .filter(|(term, _)| present.contains(term.as_str()))
            .map(|(_, w)| *w)
            .sum();
        found / total
    }

    fn combine(&self, b: &ScoreBreakdown) -> f32 {
        let w = &self.options.weights;
        w.cosine * b.cosine
            + w.title_overlap * b.title_overlap
            + w.positional_prior * b.positional_prior
            + w.keyword_hits * b.keyword_hits
    }

    /// Best paragraphs of each selected section, trimmed.
    ///
    /// Paragraphs below the length or score floor are dropped. With dedup on,
    /// a (document, text) pair already emitted for a better-ranked section is
    /// skipped and the next paragraph takes its place.
    fn excerpts(
        &self,
        selected: &[ScoredSection],
        embedder: &KeywordEmbedder,
    ) -> Vec<SubsectionExcerpt> {
        if self.options.top_excerpts == 0 {
            return Vec::new();
        }
        let query_vector = embedder.embed_query(self.query);
        let w = &self.options.weights;

        let candidates: Vec<Vec<SubsectionExcerpt>> = selected
            .par_iter()
            .map(|scored| {
                let mut paragraphs: Vec<(usize, f32)> = scored
                    .section
                    .paragraphs
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| {
                        p.text.trim().chars().count() >= self.options.min_excerpt_chars.max(1)
                    })
                    .map(|(i, p)| {
                        let tokens = tokenize(&p.text);
                        let cosine = query_vector.cosine(&embedder.embed_tokens(&tokens));
                        (i, w.cosine * cosine + w.keyword_hits * self.keyword_hits(&tokens))
                    })
                    .filter(|(_, score)| *score >= self.options.min_excerpt_score)
                    .collect();
                paragraphs.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

                paragraphs
                    .into_iter()
                    .map(|(i, score)| {
                        let paragraph = &scored.section.paragraphs[i];
                        let text =
                            truncate_at_sentence(&paragraph.text, self.options.max_excerpt_chars);
                        SubsectionExcerpt {
                            document: scored.section.document.clone(),
                            text: text.to_string(),
                            page: paragraph.page,
                            score,
                            section_rank: scored.rank,
                        }
                    })
                    .collect()
            })
            .collect();

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut excerpts = Vec::new();
        for section_excerpts in candidates {
            let mut taken = 0;
            for excerpt in section_excerpts {
                if taken == self.options.top_excerpts {
                    break;
                }
                if self.options.dedup_excerpts
                    && !seen.insert((excerpt.document.clone(), excerpt.text.clone()))
                {
                    continue;
                }
                excerpts.push(excerpt);
                taken += 1;
            }
        }
        excerpts
    }
}
