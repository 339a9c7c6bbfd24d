use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::variants::{parent_body_variants, provider_variants};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
}

impl Provider {
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            parent_code: None,
            parent_name: None,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.parent_code = Some(code.into());
        self.parent_name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentBody {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub name: String,
    pub keywords: Vec<String>,
}

impl CategoryDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            name: name.into(),
            keywords,
        }
    }
}

#[async_trait::async_trait]
pub trait RegistrySource: Send + Sync {
    async fn fetch_providers(&self) -> Result<Vec<Provider>>;

    async fn fetch_categories(&self) -> Result<Vec<CategoryDefinition>>;
}

/// In-memory registry for tests and hosts that already hold the tuples.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    providers: Vec<Provider>,
    categories: Vec<CategoryDefinition>,
}

impl StaticRegistry {
    #[must_use]
    pub fn new(providers: Vec<Provider>, categories: Vec<CategoryDefinition>) -> Self {
        Self {
            providers,
            categories,
        }
    }
}

#[async_trait::async_trait]
impl RegistrySource for StaticRegistry {
    async fn fetch_providers(&self) -> Result<Vec<Provider>> {
        Ok(self.providers.clone())
    }

    async fn fetch_categories(&self) -> Result<Vec<CategoryDefinition>> {
        Ok(self.categories.clone())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct VariantSet {
    pub code: String,
    pub name: String,
    pub parent_code: Option<String>,
    pub parent_name: Option<String>,
    pub variants: Vec<String>,
}

/// Canonical provider registry plus everything derived from it. Built once
/// by the host and shared read-only; sharing the built value is the
/// re-entry guard.
#[derive(Debug)]
pub struct ReferenceData {
    providers: Vec<Provider>,
    parent_bodies: Vec<ParentBody>,
    provider_variant_sets: Vec<VariantSet>,
    parent_variant_sets: Vec<VariantSet>,
    categories: Vec<CategoryDefinition>,
}

impl ReferenceData {
    /// Fetches the registry and derives parent bodies and name variants.
    /// A failing or empty fetch is fatal; an incomplete registry would
    /// silently under-match.
    pub async fn load(source: &dyn RegistrySource) -> Result<Self> {
        let providers = source.fetch_providers().await?;
        if providers.is_empty() {
            return Err(Error::RegistryLoad(
                "registry returned no providers".to_string(),
            ));
        }
        let categories = source.fetch_categories().await?;
        Ok(Self::from_parts(providers, categories))
    }

    #[must_use]
    pub fn from_parts(providers: Vec<Provider>, categories: Vec<CategoryDefinition>) -> Self {
        let providers = dedupe_by_code(providers);
        let parent_bodies = project_parent_bodies(&providers);

        let provider_variant_sets = providers
            .iter()
            .map(|p| VariantSet {
                code: p.code.clone(),
                name: p.name.clone(),
                parent_code: p.parent_code.clone(),
                parent_name: p.parent_name.clone(),
                variants: provider_variants(&p.name),
            })
            .collect();

        let parent_variant_sets = parent_bodies
            .iter()
            .map(|b| VariantSet {
                code: b.code.clone(),
                name: b.name.clone(),
                parent_code: None,
                parent_name: None,
                variants: parent_body_variants(&b.name),
            })
            .collect();

        Self {
            providers,
            parent_bodies,
            provider_variant_sets,
            parent_variant_sets,
            categories,
        }
    }

    #[must_use]
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    #[must_use]
    pub fn parent_bodies(&self) -> &[ParentBody] {
        &self.parent_bodies
    }

    #[must_use]
    pub fn categories(&self) -> &[CategoryDefinition] {
        &self.categories
    }

    #[must_use]
    pub fn find_provider(&self, code: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.code == code)
    }

    pub(crate) fn provider_variant_sets(&self) -> &[VariantSet] {
        &self.provider_variant_sets
    }

    pub(crate) fn parent_variant_sets(&self) -> &[VariantSet] {
        &self.parent_variant_sets
    }
}

fn dedupe_by_code(providers: Vec<Provider>) -> Vec<Provider> {
    let mut seen = HashSet::new();
    providers
        .into_iter()
        .filter(|p| seen.insert(p.code.clone()))
        .collect()
}

fn project_parent_bodies(providers: &[Provider]) -> Vec<ParentBody> {
    let mut seen = HashSet::new();
    let mut bodies = Vec::new();
    for provider in providers {
        let (Some(code), Some(name)) = (&provider.parent_code, &provider.parent_name) else {
            continue;
        };
        if seen.insert(code.clone()) {
            bodies.push(ParentBody {
                code: code.clone(),
                name: name.clone(),
            });
        }
    }
    bodies
}
