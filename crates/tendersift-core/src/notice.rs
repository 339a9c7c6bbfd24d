use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Buyer {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Buyer {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoticeValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suitability {
    #[serde(default)]
    pub sme: bool,
    #[serde(default)]
    pub vcse: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub identifier: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub buyer: Buyer,
    #[serde(default)]
    pub value: NoticeValue,
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
    #[serde(default)]
    pub suitability: Suitability,
}

impl Notice {
    #[must_use]
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_buyer(mut self, name: impl Into<String>) -> Self {
        self.buyer = Buyer::named(name);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: NoticeValue) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn with_contract_type(mut self, contract_type: impl Into<String>) -> Self {
        self.contract_type = Some(contract_type.into());
        self
    }

    #[must_use]
    pub const fn with_contract_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    #[must_use]
    pub fn with_cpv_codes(mut self, codes: Vec<String>) -> Self {
        self.cpv_codes = codes;
        self
    }

    #[must_use]
    pub fn with_links(mut self, links: Vec<String>) -> Self {
        self.links = links;
        self
    }

    /// Lower-cased title plus description, the haystack for keyword stages.
    #[must_use]
    pub fn title_and_description(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }

    /// Lower-cased buyer name, title, and description, the haystack for
    /// entity matching.
    #[must_use]
    pub fn combined_text(&self) -> String {
        format!("{} {} {}", self.buyer.name, self.title, self.description).to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_fields() {
        let notice = Notice::new("T-001", "Endoscopy Insourcing")
            .with_buyer("Leeds Teaching Hospitals NHS Trust")
            .with_description("Weekend endoscopy lists")
            .with_cpv_codes(vec!["85111000".into()]);

        assert_eq!(notice.identifier, "T-001");
        assert_eq!(notice.buyer.name, "Leeds Teaching Hospitals NHS Trust");
        assert_eq!(notice.cpv_codes, vec!["85111000".to_string()]);
    }

    #[test]
    fn combined_text_is_lowercase_and_includes_buyer() {
        let notice = Notice::new("T-002", "Provision of Locum Doctors")
            .with_buyer("Cambridge University Hospitals NHS Foundation Trust");

        let text = notice.combined_text();
        assert!(text.contains("cambridge university hospitals"));
        assert!(text.contains("provision of locum doctors"));
        assert_eq!(text, text.to_lowercase());
    }

    #[test]
    fn serde_skips_absent_optionals() {
        let notice = Notice::new("T-003", "Test");
        let json = serde_json::to_string(&notice).unwrap();
        assert!(!json.contains("closing_date"));
        assert!(!json.contains("contract_type"));
    }

    #[test]
    fn serde_roundtrip() {
        let notice = Notice::new("T-004", "Radiology Reporting")
            .with_buyer("Imperial College Healthcare NHS Trust")
            .with_contract_dates(
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            );
        let json = serde_json::to_string(&notice).unwrap();
        let parsed: Notice = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, notice);
    }
}
