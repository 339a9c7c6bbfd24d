use std::collections::HashMap;
use std::sync::Arc;

use super::rules::{
    self, confidence, CORE_KEYWORDS, CPV_HEALTH_PREFIX, EXCLUSION_RULES, FRAMEWORK_PHRASES,
    NAMED_FRAMEWORKS, NON_STAFFING_CATEGORIES, POSITIVE_INDICATORS, SERVICE_KEYWORDS,
};
use super::{Classification, ClassificationResult, EntityKind, MatchedEntity};
use crate::notice::Notice;
use crate::registry::ReferenceData;
use crate::variants::MIN_SCAN_LEN;

enum Relevance {
    Core(&'static str),
    Service(&'static str),
    CpvCode(String),
}

impl Relevance {
    const fn confidence(&self) -> u8 {
        match self {
            Self::Core(_) => confidence::CORE_RELEVANCE,
            Self::Service(_) => confidence::SERVICE_RELEVANCE,
            Self::CpvCode(_) => confidence::CPV_RELEVANCE,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Core(kw) => format!("core keyword '{kw}'"),
            Self::Service(kw) => format!("service keyword '{kw}'"),
            Self::CpvCode(code) => format!("health-services cpv code '{code}'"),
        }
    }
}

/// Ordered, short-circuiting decision pipeline. Pure over the shared
/// registry: the same notice always classifies the same way.
pub struct Classifier {
    data: Arc<ReferenceData>,
}

impl Classifier {
    #[must_use]
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn classify(&self, notice: &Notice) -> ClassificationResult {
        let result = self.run_stages(notice);
        tracing::debug!(
            identifier = %notice.identifier,
            classification = %result.classification,
            confidence = result.confidence,
            "classified notice"
        );
        result
    }

    fn run_stages(&self, notice: &Notice) -> ClassificationResult {
        let keyword_text = notice.title_and_description();

        // Stage 1: frameworks are never single opportunities.
        if let Some(result) = detect_framework(&keyword_text) {
            return result;
        }

        // Stage 2: obviously non-healthcare procurement.
        if let Some(result) = check_exclusions(&keyword_text) {
            return result;
        }

        // Stage 3: must look like healthcare or insourcing work at all.
        let relevance = match check_relevance(&keyword_text, &notice.cpv_codes) {
            Ok(relevance) => relevance,
            Err(result) => return result,
        };

        // Stage 4: must name a known provider or parent body somewhere.
        let entity_text = notice.combined_text();
        let Some(matched) = self.match_entity(&entity_text) else {
            return ClassificationResult::discard(
                format!(
                    "no provider or parent body matched ({})",
                    relevance.describe()
                ),
                confidence::NO_ENTITY,
            );
        };

        // Stage 5: weed out non-staffing procurement aimed at a provider.
        verify_opportunity(&keyword_text, &relevance, matched)
    }

    fn match_entity(&self, text: &str) -> Option<MatchedEntity> {
        for set in self.data.provider_variant_sets() {
            if variant_hit(&set.variants, text) {
                return Some(MatchedEntity {
                    kind: EntityKind::Provider,
                    code: set.code.clone(),
                    name: set.name.clone(),
                    parent_code: set.parent_code.clone(),
                    parent_name: set.parent_name.clone(),
                });
            }
        }
        for set in self.data.parent_variant_sets() {
            if variant_hit(&set.variants, text) {
                return Some(MatchedEntity {
                    kind: EntityKind::ParentBody,
                    code: set.code.clone(),
                    name: set.name.clone(),
                    parent_code: None,
                    parent_name: None,
                });
            }
        }
        None
    }

    #[must_use]
    pub fn classify_batch(&self, notices: &[Notice]) -> HashMap<String, ClassificationResult> {
        let mut results = HashMap::with_capacity(notices.len());
        for notice in notices {
            results.insert(notice.identifier.clone(), self.classify(notice));
        }
        results
    }
}

fn variant_hit(variants: &[String], text: &str) -> bool {
    variants
        .iter()
        .any(|v| v.len() >= MIN_SCAN_LEN && text.contains(v.as_str()))
}

fn detect_framework(text: &str) -> Option<ClassificationResult> {
    if let Some(phrase) = rules::first_match(FRAMEWORK_PHRASES, text) {
        return Some(ClassificationResult::framework(
            format!("framework indicator '{phrase}'"),
            None,
        ));
    }
    NAMED_FRAMEWORKS
        .iter()
        .find(|f| text.contains(f.needle))
        .map(|f| {
            ClassificationResult::framework(
                format!("named framework '{}'", f.name),
                Some(f.name.to_string()),
            )
        })
}

fn check_exclusions(text: &str) -> Option<ClassificationResult> {
    EXCLUSION_RULES.iter().find_map(|rule| {
        rule.fires(text).map(|trigger| {
            ClassificationResult::discard(
                format!("non-healthcare procurement ({}: '{trigger}')", rule.label),
                confidence::EXCLUSION,
            )
        })
    })
}

fn check_relevance(text: &str, cpv_codes: &[String]) -> Result<Relevance, ClassificationResult> {
    if let Some(kw) = rules::first_match(CORE_KEYWORDS, text) {
        return Ok(Relevance::Core(kw));
    }
    if let Some(kw) = rules::first_match(SERVICE_KEYWORDS, text) {
        return Ok(Relevance::Service(kw));
    }
    if let Some(code) = cpv_codes
        .iter()
        .find(|c| c.trim().starts_with(CPV_HEALTH_PREFIX))
    {
        return Ok(Relevance::CpvCode(code.trim().to_string()));
    }
    Err(ClassificationResult::discard(
        "no insourcing or healthcare keywords present",
        confidence::NOT_RELEVANT,
    ))
}

fn verify_opportunity(
    text: &str,
    relevance: &Relevance,
    matched: MatchedEntity,
) -> ClassificationResult {
    for category in NON_STAFFING_CATEGORIES {
        if let Some(kw) = category.hit(text) {
            // The entity match is kept on the discard for audit review.
            return ClassificationResult::discard(
                format!("non-staffing procurement ({}: '{kw}')", category.label),
                confidence::NON_STAFFING,
            )
            .with_match(Some(matched));
        }
    }

    match rules::first_match(POSITIVE_INDICATORS, text) {
        Some(indicator) => ClassificationResult::opportunity(
            format!(
                "{} with staffing indicator '{indicator}' for {}",
                relevance.describe(),
                matched.name
            ),
            Some(matched),
        ),
        None => ClassificationResult::discard(
            "no clinical staffing or service-delivery indicators",
            confidence::NO_POSITIVE,
        )
        .with_match(Some(matched)),
    }
}

/// Per-label counts for a classified batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchClassifyStats {
    pub opportunities: usize,
    pub frameworks: usize,
    pub discarded: usize,
}

impl BatchClassifyStats {
    #[must_use]
    pub fn summarize<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ClassificationResult>,
    {
        let mut stats = Self::default();
        for result in results {
            match result.classification {
                Classification::InsourcingOpportunity => stats.opportunities += 1,
                Classification::Framework => stats.frameworks += 1,
                Classification::Discard => stats.discarded += 1,
            }
        }
        stats
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.opportunities + self.frameworks + self.discarded
    }
}
