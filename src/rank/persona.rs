//! Persona categories and query construction.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use crate::text::{tokenize, words};

/// Recognized persona category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PersonaCategory {
    /// Travel planners and agents
    Travel,
    /// HR and compliance professionals
    HumanResources,
    /// Caterers, chefs and food contractors
    FoodService,
    /// Researchers and analysts
    Research,
}

impl PersonaCategory {
    /// Short label.
    pub fn as_str(self) -> &'static str {
        match self {
            PersonaCategory::Travel => "travel",
            PersonaCategory::HumanResources => "hr",
            PersonaCategory::FoodService => "food-service",
            PersonaCategory::Research => "research",
        }
    }
}

impl fmt::Display for PersonaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword table of one category.
#[derive(Debug, Clone)]
pub struct CategoryProfile {
    /// Category tag
    pub category: PersonaCategory,
    /// Role words or phrases that select this category
    pub triggers: &'static [&'static str],
    /// Term weights merged into the query
    pub keywords: &'static [(&'static str, f32)],
}

const TRAVEL_KEYWORDS: &[(&str, f32)] = &[
    ("destinations", 1.0),
    ("cities", 0.9),
    ("activities", 0.9),
    ("itinerary", 0.8),
    ("culinary", 0.8),
    ("cuisine", 0.8),
    ("coastal", 0.7),
    ("adventures", 0.7),
    ("restaurants", 0.7),
    ("hotels", 0.7),
    ("nightlife", 0.7),
    ("entertainment", 0.6),
    ("beaches", 0.6),
    ("packing", 0.6),
    ("tips", 0.6),
    ("budget", 0.5),
    ("group", 0.5),
];

const HR_KEYWORDS: &[(&str, f32)] = &[
    ("forms", 1.0),
    ("fillable", 1.0),
    ("onboarding", 0.9),
    ("compliance", 0.8),
    ("signatures", 0.8),
    ("workflow", 0.7),
    ("fields", 0.6),
    ("sign", 0.6),
    ("convert", 0.6),
    ("conversion", 0.6),
    ("bulk", 0.6),
    ("create", 0.5),
    ("documents", 0.5),
    ("employees", 0.5),
];

const FOOD_KEYWORDS: &[(&str, f32)] = &[
    ("vegetarian", 1.0),
    ("protein", 0.9),
    ("buffet", 0.9),
    ("corporate", 0.8),
    ("catering", 0.8),
    ("menu", 0.8),
    ("mains", 0.7),
    ("sides", 0.7),
    ("appetizers", 0.7),
    ("dishes", 0.7),
    ("recipes", 0.7),
    ("vegan", 0.6),
    ("gluten", 0.6),
    ("ingredients", 0.5),
    ("dinner", 0.5),
    ("salad", 0.5),
    ("falafel", 0.5),
];

const RESEARCH_KEYWORDS: &[(&str, f32)] = &[
    ("methodology", 1.0),
    ("methods", 0.9),
    ("datasets", 0.8),
    ("benchmarks", 0.8),
    ("evaluation", 0.8),
    ("results", 0.8),
    ("literature", 0.7),
    ("analysis", 0.7),
    ("experiments", 0.7),
    ("review", 0.6),
    ("performance", 0.6),
    ("findings", 0.6),
];

/// Immutable set of persona categories, checked in order.
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    profiles: Vec<CategoryProfile>,
}

impl PersonaRegistry {
    /// Create a registry from category profiles.
    pub fn new(profiles: Vec<CategoryProfile>) -> Self {
        Self { profiles }
    }

    /// A registry with no categories; every persona falls back to plain tokens.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The built-in registry, initialized once per process.
    pub fn builtin() -> &'static PersonaRegistry {
        static REGISTRY: OnceLock<PersonaRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            Self::new(vec![
                CategoryProfile {
                    category: PersonaCategory::Travel,
                    triggers: &["travel", "trip", "tourism", "tourist", "vacation"],
                    keywords: TRAVEL_KEYWORDS,
                },
                CategoryProfile {
                    category: PersonaCategory::HumanResources,
                    triggers: &[
                        "hr",
                        "human resources",
                        "recruiter",
                        "recruiting",
                        "people operations",
                    ],
                    keywords: HR_KEYWORDS,
                },
                CategoryProfile {
                    category: PersonaCategory::FoodService,
                    triggers: &["food", "chef", "cook", "caterer", "catering", "restaurant"],
                    keywords: FOOD_KEYWORDS,
                },
                CategoryProfile {
                    category: PersonaCategory::Research,
                    triggers: &["researcher", "research", "scientist", "academic", "phd"],
                    keywords: RESEARCH_KEYWORDS,
                },
            ])
        })
    }

    /// Category profiles in lookup order.
    pub fn profiles(&self) -> &[CategoryProfile] {
        &self.profiles
    }

    /// First category whose trigger appears in `role` as a whole word or phrase.
    pub fn recognize(&self, role: &str) -> Option<&CategoryProfile> {
        let padded = format!(" {} ", words(role).collect::<Vec<_>>().join(" "));
        self.profiles.iter().find(|profile| {
            profile
                .triggers
                .iter()
                .any(|trigger| padded.contains(&format!(" {} ", trigger)))
        })
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

/// Weighted query terms derived from a persona role and task.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaQuery {
    /// Persona role as given
    pub role: String,
    /// Task statement as given
    pub task: String,
    /// Recognized category, if any
    pub category: Option<PersonaCategory>,
    /// Term weights, all non-negative
    pub terms: BTreeMap<String, f32>,
}

impl PersonaQuery {
    /// Weight of `term`, zero if absent.
    pub fn weight(&self, term: &str) -> f32 {
        self.terms.get(term).copied().unwrap_or(0.0)
    }

    /// Check if `term` is a query term.
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// Sum of all term weights.
    pub fn total_weight(&self) -> f32 {
        self.terms.values().sum()
    }

    /// Check if the query has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Builds [`PersonaQuery`] values against a registry.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'r> {
    registry: &'r PersonaRegistry,
}

impl QueryBuilder<'static> {
    /// Builder over the built-in registry.
    pub fn builtin() -> Self {
        Self::new(PersonaRegistry::builtin())
    }
}

impl<'r> QueryBuilder<'r> {
    /// Create a builder over `registry`.
    pub fn new(registry: &'r PersonaRegistry) -> Self {
        Self { registry }
    }

    /// Build the query for a role and task.
    ///
    /// Every content token of role and task gets weight 1.0. A recognized
    /// category contributes its keyword table; shared terms keep the larger
    /// weight.
    pub fn build(&self, role: &str, task: &str) -> PersonaQuery {
        let mut terms: BTreeMap<String, f32> = BTreeMap::new();
        for token in tokenize(role).into_iter().chain(tokenize(task)) {
            terms.insert(token, 1.0);
        }

        let profile = self.registry.recognize(role);
        match profile {
            Some(profile) => {
                for &(term, weight) in profile.keywords {
                    let entry = terms.entry(term.to_string()).or_insert(0.0);
                    *entry = entry.max(weight);
                }
                log::debug!(
                    "Persona {:?} recognized as {}, {} query terms",
                    role,
                    profile.category,
                    terms.len()
                );
            }
            None => log::debug!(
                "Persona {:?} not recognized, {} plain query terms",
                role,
                terms.len()
            ),
        }

        PersonaQuery {
            role: role.to_string(),
            task: task.to_string(),
            category: profile.map(|p| p.category),
            terms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_contractor_query() {
        let query = QueryBuilder::builtin()
            .build("Food Contractor", "vegetarian buffet for corporate event");
        assert_eq!(query.category, Some(PersonaCategory::FoodService));
        for term in ["vegetarian", "buffet", "corporate", "protein"] {
            assert!(query.weight(term) > 0.0, "missing {}", term);
        }
        assert!(!query.contains("for"));
        assert_eq!(query.weight("vegetarian"), 1.0);
    }

    #[test]
    fn test_unrecognized_persona_uses_plain_tokens() {
        let query = QueryBuilder::builtin().build("Astronaut", "Prepare the launch checklist");
        assert_eq!(query.category, None);
        let terms: Vec<_> = query.terms.iter().map(|(t, w)| (t.as_str(), *w)).collect();
        assert_eq!(
            terms,
            vec![("astronaut", 1.0), ("checklist", 1.0), ("launch", 1.0), ("prepare", 1.0)]
        );
    }

    #[test]
    fn test_short_role_words_are_recognized() {
        let query = QueryBuilder::builtin().build("HR professional", "Create fillable forms");
        assert_eq!(query.category, Some(PersonaCategory::HumanResources));
        assert!(query.contains("onboarding"));
    }

    #[test]
    fn test_trigger_must_be_whole_word() {
        let registry = PersonaRegistry::builtin();
        assert!(registry.recognize("Seafood blogger").is_none());
        assert_eq!(
            registry.recognize("Travel Planner").map(|p| p.category),
            Some(PersonaCategory::Travel)
        );
    }

    #[test]
    fn test_query_is_deterministic() {
        let builder = QueryBuilder::builtin();
        let a = builder.build("Travel Planner", "Plan a trip of 4 days for 10 college friends");
        let b = builder.build("Travel Planner", "Plan a trip of 4 days for 10 college friends");
        assert_eq!(a, b);
        assert!(a.terms.values().all(|w| *w >= 0.0));
    }

    #[test]
    fn test_custom_registry() {
        let registry = PersonaRegistry::empty();
        let query = QueryBuilder::new(&registry).build("Food Contractor", "menu");
        assert_eq!(query.category, None);
        assert!(!query.contains("protein"));
    }
}
