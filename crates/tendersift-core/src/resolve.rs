use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::registry::ReferenceData;
use crate::variants::leading_token;

/// Best fuzzy candidate must be closer than this dissimilarity to count.
pub const FUZZY_DISSIMILARITY_THRESHOLD: f64 = 0.3;

pub const KEYWORD_CONFIDENCE: f64 = 0.7;

const STOP_PHRASES: &[&str] = &["university hospitals"];

const STOP_WORDS: &[&str] = &[
    "nhs",
    "trust",
    "foundation",
    "ft",
    "hospitals",
    "hospital",
    "teaching",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingMethod {
    ExactMatch,
    FuzzyMatch,
    KeywordMatch,
    Manual,
}

impl MappingMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExactMatch => "exact_match",
            Self::FuzzyMatch => "fuzzy_match",
            Self::KeywordMatch => "keyword_match",
            Self::Manual => "manual",
        }
    }
}

impl std::fmt::Display for MappingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MappingMethod {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact_match" => Ok(Self::ExactMatch),
            "fuzzy_match" => Ok(Self::FuzzyMatch),
            "keyword_match" => Ok(Self::KeywordMatch),
            "manual" => Ok(Self::Manual),
            _ => Err(crate::Error::InvalidMappingMethod(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMapping {
    pub provider_code: String,
    pub provider_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
    pub confidence: f64,
    pub method: MappingMethod,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedMatch {
    pub index: usize,
    pub dissimilarity: f64,
}

/// Narrow seam around the approximate-matching algorithm so the metric is
/// swappable without touching the tiers.
pub trait NameMatcher: Send + Sync {
    fn best_match(&self, query: &str, candidates: &[&str]) -> Option<RankedMatch>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LevenshteinMatcher;

impl NameMatcher for LevenshteinMatcher {
    fn best_match(&self, query: &str, candidates: &[&str]) -> Option<RankedMatch> {
        candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| RankedMatch {
                index,
                dissimilarity: 1.0 - strsim::normalized_levenshtein(query, candidate),
            })
            .min_by(|a, b| {
                a.dissimilarity
                    .partial_cmp(&b.dissimilarity)
                    .unwrap_or(Ordering::Equal)
            })
    }
}

/// Lower-cases, removes organizational stop-words as whole tokens, strips
/// punctuation, and collapses whitespace.
#[must_use]
pub fn normalize_org_name(name: &str) -> String {
    let mut lowered = name.to_lowercase();
    for phrase in STOP_PHRASES {
        lowered = lowered.replace(phrase, " ");
    }
    let depunctuated: String = lowered
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    depunctuated
        .split_whitespace()
        .filter(|token| !STOP_WORDS.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves free-text buyer names to canonical providers. Tiers are tried
/// in a fixed order; the first success wins and is cached for the
/// resolver's lifetime.
pub struct EntityResolver {
    data: Arc<ReferenceData>,
    matcher: Option<Box<dyn NameMatcher>>,
    cache: Mutex<HashMap<String, EntityMapping>>,
}

impl EntityResolver {
    #[must_use]
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self {
            data,
            matcher: Some(Box::new(LevenshteinMatcher)),
            cache: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_matcher(mut self, matcher: Box<dyn NameMatcher>) -> Self {
        self.matcher = Some(matcher);
        self
    }

    /// Drops the fuzzy tier; exact and keyword tiers still run.
    #[must_use]
    pub fn without_fuzzy(mut self) -> Self {
        self.matcher = None;
        self
    }

    pub fn resolve(&self, buyer_name: &str) -> Option<EntityMapping> {
        let key = buyer_name.to_lowercase();
        if let Some(cached) = self.lock_cache().get(&key) {
            tracing::debug!(buyer = buyer_name, "resolver cache hit");
            return Some(cached.clone());
        }

        let mapping = self
            .exact_tier(buyer_name)
            .or_else(|| self.fuzzy_tier(buyer_name))
            .or_else(|| self.keyword_tier(buyer_name));

        match mapping {
            Some(mapping) => {
                self.lock_cache().insert(key, mapping.clone());
                Some(mapping)
            }
            None => {
                tracing::warn!(buyer = buyer_name, "buyer resolved to no provider");
                None
            }
        }
    }

    /// Host-supplied override, recorded as a manual mapping.
    pub fn insert_override(&self, buyer_name: &str, mut mapping: EntityMapping) {
        mapping.method = MappingMethod::Manual;
        self.lock_cache()
            .insert(buyer_name.to_lowercase(), mapping);
    }

    /// Cache size partitioned by mapping method.
    #[must_use]
    pub fn mapping_stats(&self) -> HashMap<MappingMethod, usize> {
        let mut stats = HashMap::new();
        for mapping in self.lock_cache().values() {
            *stats.entry(mapping.method).or_insert(0) += 1;
        }
        stats
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<String, EntityMapping>> {
        match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn exact_tier(&self, buyer_name: &str) -> Option<EntityMapping> {
        let needle = normalize_org_name(buyer_name);
        if needle.is_empty() {
            return None;
        }
        self.data
            .providers()
            .iter()
            .find(|p| normalize_org_name(&p.name) == needle)
            .map(|p| EntityMapping {
                provider_code: p.code.clone(),
                provider_name: p.name.clone(),
                parent_code: p.parent_code.clone(),
                confidence: 1.0,
                method: MappingMethod::ExactMatch,
            })
    }

    fn fuzzy_tier(&self, buyer_name: &str) -> Option<EntityMapping> {
        let matcher = self.matcher.as_ref()?;
        let query = buyer_name.to_lowercase();
        let names: Vec<String> = self
            .data
            .providers()
            .iter()
            .map(|p| p.name.to_lowercase())
            .collect();
        let candidates: Vec<&str> = names.iter().map(String::as_str).collect();

        let best = matcher.best_match(&query, &candidates)?;
        if best.dissimilarity >= FUZZY_DISSIMILARITY_THRESHOLD {
            return None;
        }
        let provider = &self.data.providers()[best.index];
        Some(EntityMapping {
            provider_code: provider.code.clone(),
            provider_name: provider.name.clone(),
            parent_code: provider.parent_code.clone(),
            confidence: 1.0 - best.dissimilarity,
            method: MappingMethod::FuzzyMatch,
        })
    }

    fn keyword_tier(&self, buyer_name: &str) -> Option<EntityMapping> {
        let token = leading_token(buyer_name)?;
        self.data
            .providers()
            .iter()
            .find(|p| leading_token(&p.name).as_deref() == Some(token.as_str()))
            .map(|p| EntityMapping {
                provider_code: p.code.clone(),
                provider_name: p.name.clone(),
                parent_code: p.parent_code.clone(),
                confidence: KEYWORD_CONFIDENCE,
                method: MappingMethod::KeywordMatch,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Provider;

    fn reference_data() -> Arc<ReferenceData> {
        Arc::new(ReferenceData::from_parts(
            vec![
                Provider::new("RGT", "Cambridge University Hospitals NHS Foundation Trust")
                    .with_parent(
                        "QUE",
                        "NHS Cambridgeshire and Peterborough Integrated Care Board",
                    ),
                Provider::new("RR8", "Leeds Teaching Hospitals NHS Trust")
                    .with_parent("QWO", "NHS West Yorkshire Integrated Care Board"),
                Provider::new("RCX", "The Queen Elizabeth Hospital King's Lynn NHS Foundation Trust")
                    .with_parent("QMM", "NHS Norfolk and Waveney Integrated Care Board"),
            ],
            Vec::new(),
        ))
    }

    fn resolver() -> EntityResolver {
        EntityResolver::new(reference_data())
    }

    #[test]
    fn normalize_removes_stop_words_and_punctuation() {
        assert_eq!(
            normalize_org_name("Cambridge University Hospitals NHS Foundation Trust"),
            "cambridge"
        );
        assert_eq!(
            normalize_org_name("Leeds Teaching Hospitals NHS Trust"),
            "leeds"
        );
        assert_eq!(
            normalize_org_name("The Queen Elizabeth Hospital, King's Lynn NHS Foundation Trust"),
            "the queen elizabeth king s lynn"
        );
    }

    #[test]
    fn exact_tier_matches_normalized_names() {
        let mapping = resolver().resolve("Cambridge NHS Trust").unwrap();
        assert_eq!(mapping.provider_code, "RGT");
        assert_eq!(mapping.method, MappingMethod::ExactMatch);
        assert!((mapping.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fuzzy_tier_accepts_close_misspelling() {
        // "Teching" dodges the stop-word list, so the exact tier fails
        // and the fuzzy tier has to carry it.
        let mapping = resolver()
            .resolve("Leeds Teching Hospitals NHS Trust")
            .unwrap();
        assert_eq!(mapping.provider_code, "RR8");
        assert_eq!(mapping.method, MappingMethod::FuzzyMatch);
        assert!(mapping.confidence > 0.7);
    }

    #[test]
    fn fuzzy_wins_over_keyword_when_both_would_match() {
        // Close enough for the fuzzy tier, and its leading token also
        // equals the provider's; tier order must report fuzzy.
        let mapping = resolver()
            .resolve("Leeds Teaching Hospitals NHS Trust Board")
            .unwrap();
        assert_eq!(mapping.method, MappingMethod::FuzzyMatch);
    }

    #[test]
    fn keyword_tier_matches_leading_token() {
        let resolver = resolver().without_fuzzy();
        let mapping = resolver
            .resolve("Cambridge University Hospitals Procurement Team NHS")
            .unwrap();
        assert_eq!(mapping.provider_code, "RGT");
        assert_eq!(mapping.method, MappingMethod::KeywordMatch);
        assert!((mapping.confidence - KEYWORD_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_buyer_returns_none() {
        assert!(resolver().resolve("Acme Recruitment Ltd").is_none());
    }

    #[test]
    fn without_fuzzy_skips_to_keyword_tier() {
        let strict = resolver().without_fuzzy();
        let mapping = strict
            .resolve("Leeds Teaching Hospitals NHS Procurement Hub")
            .unwrap();
        assert_eq!(mapping.provider_code, "RR8");
        assert_eq!(mapping.method, MappingMethod::KeywordMatch);
    }

    #[test]
    fn cache_is_case_insensitive_and_returns_identical_mapping() {
        let resolver = resolver();
        let first = resolver
            .resolve("CAMBRIDGE UNIVERSITY HOSPITALS NHS FOUNDATION TRUST")
            .unwrap();
        let second = resolver
            .resolve("cambridge university hospitals nhs foundation trust")
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(resolver.mapping_stats().values().sum::<usize>(), 1);
    }

    #[test]
    fn failed_lookups_are_not_cached() {
        let resolver = resolver();
        assert!(resolver.resolve("Acme Recruitment Ltd").is_none());
        assert!(resolver.mapping_stats().is_empty());
    }

    #[test]
    fn mapping_stats_partition_by_method() {
        let resolver = resolver();
        resolver.resolve("Cambridge NHS Trust");
        resolver.resolve("Leeds Teching Hospitals NHS Trust");
        let stats = resolver.mapping_stats();
        assert_eq!(stats.get(&MappingMethod::ExactMatch), Some(&1));
        assert_eq!(stats.get(&MappingMethod::FuzzyMatch), Some(&1));
    }

    #[test]
    fn manual_override_takes_precedence() {
        let resolver = resolver();
        resolver.insert_override(
            "Acme Recruitment Ltd",
            EntityMapping {
                provider_code: "RGT".into(),
                provider_name: "Cambridge University Hospitals NHS Foundation Trust".into(),
                parent_code: Some("QUE".into()),
                confidence: 1.0,
                method: MappingMethod::ExactMatch,
            },
        );
        let mapping = resolver.resolve("acme recruitment ltd").unwrap();
        assert_eq!(mapping.method, MappingMethod::Manual);
        assert_eq!(mapping.provider_code, "RGT");
    }

    #[test]
    fn mapping_method_roundtrip() {
        for method in [
            MappingMethod::ExactMatch,
            MappingMethod::FuzzyMatch,
            MappingMethod::KeywordMatch,
            MappingMethod::Manual,
        ] {
            let parsed: MappingMethod = method.to_string().parse().unwrap();
            assert_eq!(parsed, method);
        }
    }
}
