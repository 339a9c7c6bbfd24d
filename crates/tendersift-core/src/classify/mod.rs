pub mod engine;
pub mod rules;

pub use engine::{BatchClassifyStats, Classifier};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    InsourcingOpportunity,
    Framework,
    Discard,
}

impl Classification {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InsourcingOpportunity => "insourcing_opportunity",
            Self::Framework => "framework",
            Self::Discard => "discard",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Classification {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "insourcing_opportunity" => Ok(Self::InsourcingOpportunity),
            "framework" => Ok(Self::Framework),
            "discard" => Ok(Self::Discard),
            _ => Err(crate::Error::InvalidClassification(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Provider,
    ParentBody,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::ParentBody => "parent_body",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "provider" => Ok(Self::Provider),
            "parent_body" => Ok(Self::ParentBody),
            _ => Err(crate::Error::InvalidEntityKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedEntity {
    pub kind: EntityKind,
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub classification: Classification,
    pub reason: String,
    pub confidence: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<MatchedEntity>,
    #[serde(default)]
    pub is_framework: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework_name: Option<String>,
}

impl ClassificationResult {
    #[must_use]
    pub fn discard(reason: impl Into<String>, confidence: u8) -> Self {
        Self {
            classification: Classification::Discard,
            reason: reason.into(),
            confidence,
            matched: None,
            is_framework: false,
            framework_name: None,
        }
    }

    #[must_use]
    pub fn framework(reason: impl Into<String>, framework_name: Option<String>) -> Self {
        Self {
            classification: Classification::Framework,
            reason: reason.into(),
            confidence: rules::confidence::FRAMEWORK,
            matched: None,
            is_framework: true,
            framework_name,
        }
    }

    #[must_use]
    pub fn opportunity(reason: impl Into<String>, matched: Option<MatchedEntity>) -> Self {
        Self {
            classification: Classification::InsourcingOpportunity,
            reason: reason.into(),
            confidence: rules::confidence::OPPORTUNITY,
            matched,
            is_framework: false,
            framework_name: None,
        }
    }

    #[must_use]
    pub fn with_match(mut self, matched: Option<MatchedEntity>) -> Self {
        self.matched = matched;
        self
    }
}
