use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::notice::Notice;
use crate::registry::ReferenceData;
use crate::resolve::{EntityMapping, EntityResolver};

const DAYS_PER_MONTH: i64 = 30;

pub const FALLBACK_CATEGORY: &str = "Other Healthcare Services";

/// Persistence-ready projection of a notice, with the resolved buyer,
/// service category, and derived contract duration attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedNotice {
    pub identifier: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub buyer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub cpv_codes: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<EntityMapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_months: Option<i64>,
}

#[derive(Debug, Default)]
pub struct BatchEnrichOutcome {
    pub enriched: Vec<EnrichedNotice>,
    pub failed: Vec<(String, Error)>,
}

impl BatchEnrichOutcome {
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.enriched.len()
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }
}

/// Builds persistence-ready records. Resolution here is the tiered
/// resolver, deliberately separate from the classifier's substring match.
pub struct Enricher {
    data: Arc<ReferenceData>,
    resolver: Arc<EntityResolver>,
}

impl Enricher {
    #[must_use]
    pub fn new(data: Arc<ReferenceData>, resolver: Arc<EntityResolver>) -> Self {
        Self { data, resolver }
    }

    pub fn enrich(&self, notice: &Notice) -> Result<EnrichedNotice> {
        if notice.identifier.trim().is_empty() {
            return Err(Error::MissingIdentifier(notice.title.clone()));
        }

        let mapping = if notice.buyer.name.trim().is_empty() {
            None
        } else {
            self.resolver.resolve(&notice.buyer.name)
        };

        Ok(EnrichedNotice {
            identifier: notice.identifier.clone(),
            title: notice.title.clone(),
            description: notice.description.clone(),
            buyer_name: notice.buyer.name.clone(),
            status: notice.status.clone(),
            amount_min: notice.value.amount_min,
            amount_max: notice.value.amount_max,
            currency: notice.value.currency.clone(),
            contract_type: notice.contract_type.clone(),
            published_date: notice.published_date,
            closing_date: notice.closing_date,
            start_date: notice.start_date,
            end_date: notice.end_date,
            cpv_codes: notice.cpv_codes.clone(),
            links: notice.links.clone(),
            mapping,
            category: self.service_category(notice),
            duration_months: contract_duration_months(notice.start_date, notice.end_date),
        })
    }

    pub fn enrich_batch(&self, notices: &[Notice]) -> BatchEnrichOutcome {
        let mut outcome = BatchEnrichOutcome::default();
        for notice in notices {
            match self.enrich(notice) {
                Ok(enriched) => outcome.enriched.push(enriched),
                Err(e) => {
                    tracing::warn!(
                        identifier = %notice.identifier,
                        error = %e,
                        "skipping notice during enrichment"
                    );
                    outcome.failed.push((notice.identifier.clone(), e));
                }
            }
        }
        outcome
    }

    /// Most keyword hits wins; ties keep the earliest registered category.
    fn service_category(&self, notice: &Notice) -> Option<String> {
        let definitions = self.data.categories();
        if definitions.is_empty() {
            return None;
        }

        let haystack = notice.title_and_description();
        let mut best: Option<(&str, usize)> = None;
        for definition in definitions {
            let hits = definition
                .keywords
                .iter()
                .filter(|k| haystack.contains(k.to_lowercase().as_str()))
                .count();
            if hits > 0 && best.is_none_or(|(_, best_hits)| hits > best_hits) {
                best = Some((definition.name.as_str(), hits));
            }
        }

        Some(best.map_or_else(|| FALLBACK_CATEGORY.to_string(), |(name, _)| name.to_string()))
    }
}

fn contract_duration_months(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<i64> {
    let (start, end) = (start?, end?);
    let days = (end - start).num_days();
    if days < 0 {
        tracing::warn!(%start, %end, "contract end precedes start");
        return None;
    }
    Some(days / DAYS_PER_MONTH)
}
