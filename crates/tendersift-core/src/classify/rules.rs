//! Ordered rule tables for the classification pipeline. Order is
//! behaviorally significant: stages report the first matching entry.

pub mod confidence {
    pub const FRAMEWORK: u8 = 95;
    pub const EXCLUSION: u8 = 95;
    pub const CORE_RELEVANCE: u8 = 95;
    pub const SERVICE_RELEVANCE: u8 = 80;
    pub const CPV_RELEVANCE: u8 = 70;
    pub const NOT_RELEVANT: u8 = 85;
    pub const NO_ENTITY: u8 = 80;
    pub const NON_STAFFING: u8 = 90;
    pub const NO_POSITIVE: u8 = 85;
    pub const OPPORTUNITY: u8 = 95;
}

#[derive(Debug, Clone, Copy)]
pub struct ExclusionRule {
    pub label: &'static str,
    pub triggers: &'static [&'static str],
    /// Empty context makes the rule unconditional.
    pub context: &'static [&'static str],
}

impl ExclusionRule {
    #[must_use]
    pub fn fires(&self, text: &str) -> Option<&'static str> {
        let trigger = first_match(self.triggers, text)?;
        if self.context.is_empty() || first_match(self.context, text).is_some() {
            Some(trigger)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NamedFramework {
    pub needle: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct NonStaffingCategory {
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

impl NonStaffingCategory {
    #[must_use]
    pub fn hit(&self, text: &str) -> Option<&'static str> {
        first_match(self.keywords, text)
    }
}

#[must_use]
pub fn first_match(keywords: &[&'static str], text: &str) -> Option<&'static str> {
    keywords.iter().find(|k| text.contains(*k)).copied()
}

pub const FRAMEWORK_PHRASES: &[&str] = &[
    "framework agreement",
    "dynamic purchasing system",
    "(dps)",
    "multi-supplier framework",
    "multi supplier framework",
    "national framework",
    "framework for the provision",
    "pseudo framework",
    "call-off competition",
    "approved supplier list",
    "preferred supplier list",
];

pub const NAMED_FRAMEWORKS: &[NamedFramework] = &[
    NamedFramework {
        needle: "nhs workforce alliance",
        name: "NHS Workforce Alliance",
    },
    NamedFramework {
        needle: "crown commercial service",
        name: "Crown Commercial Service",
    },
    NamedFramework {
        needle: "healthtrust europe",
        name: "HealthTrust Europe",
    },
    NamedFramework {
        needle: "noe cpc",
        name: "NOE CPC",
    },
    NamedFramework {
        needle: "north of england commercial procurement collaborative",
        name: "NOE CPC",
    },
    NamedFramework {
        needle: "london procurement partnership",
        name: "London Procurement Partnership",
    },
    NamedFramework {
        needle: "nhs shared business services",
        name: "NHS Shared Business Services",
    },
    NamedFramework {
        needle: "nhs commercial solutions",
        name: "NHS Commercial Solutions",
    },
];

pub const EXCLUSION_RULES: &[ExclusionRule] = &[
    ExclusionRule {
        label: "grounds maintenance",
        triggers: &["grounds maintenance", "landscape maintenance", "arboricultur"],
        context: &["grass cutting", "grass", "hedge", "tree", "horticultur"],
    },
    ExclusionRule {
        label: "catering",
        triggers: &["catering"],
        context: &["food", "meals", "canteen", "restaurant", "vending"],
    },
    ExclusionRule {
        label: "cleaning",
        triggers: &["cleaning services", "domestic cleaning", "window cleaning"],
        context: &[],
    },
    ExclusionRule {
        label: "security guarding",
        triggers: &["security services", "manned guarding", "cctv"],
        context: &[],
    },
    ExclusionRule {
        label: "waste",
        triggers: &["waste collection", "waste disposal", "waste management"],
        context: &[],
    },
    ExclusionRule {
        label: "pest control",
        triggers: &["pest control"],
        context: &[],
    },
    ExclusionRule {
        label: "laundry and linen",
        triggers: &["laundry services", "linen services"],
        context: &[],
    },
    ExclusionRule {
        label: "asbestos and demolition",
        triggers: &["asbestos", "demolition"],
        context: &[],
    },
    ExclusionRule {
        label: "parking",
        triggers: &["car parking", "parking enforcement"],
        context: &[],
    },
    ExclusionRule {
        label: "utilities",
        triggers: &["electricity supply", "gas supply", "water supply", "utilities"],
        context: &[],
    },
];

pub const CORE_KEYWORDS: &[&str] = &[
    "insourcing",
    "insourced",
    "in-sourcing",
    "locum",
    "agency staff",
    "medical staffing",
    "clinical staffing",
    "nurse staffing",
    "temporary staffing",
    "staff bank",
    "bank staff",
    "workforce supply",
];

pub const SERVICE_KEYWORDS: &[&str] = &[
    "outpatient",
    "endoscopy",
    "radiology",
    "diagnostic imaging",
    "elective care",
    "waiting list",
    "theatre session",
    "surgical procedure",
    "ophthalmology",
    "dermatology",
    "audiology",
    "echocardiography",
    "clinical service",
    "patient care",
    "healthcare service",
];

pub const CPV_HEALTH_PREFIX: &str = "85";

pub const NON_STAFFING_CATEGORIES: &[NonStaffingCategory] = &[
    NonStaffingCategory {
        label: "equipment supply",
        keywords: &[
            "supply of equipment",
            "equipment supply",
            "medical devices",
            "supply and delivery",
            "surgical instruments",
        ],
    },
    NonStaffingCategory {
        label: "vehicles and fleet",
        keywords: &["vehicle", "fleet hire", "fleet management", "minibus"],
    },
    NonStaffingCategory {
        label: "facilities management",
        keywords: &[
            "facilities management",
            "hard fm",
            "soft fm",
            "estates and facilities",
        ],
    },
    NonStaffingCategory {
        label: "it hardware",
        keywords: &[
            "laptop",
            "desktop",
            "server",
            "network infrastructure",
            "telephony",
            "printer",
            "wifi",
        ],
    },
    NonStaffingCategory {
        label: "construction",
        keywords: &[
            "construction",
            "refurbishment",
            "building works",
            "new build",
        ],
    },
    NonStaffingCategory {
        label: "commodity supplies",
        keywords: &[
            "stationery",
            "furniture",
            "uniforms",
            "bedding",
            "food supplies",
            "janitorial supplies",
        ],
    },
    NonStaffingCategory {
        label: "software and systems",
        keywords: &[
            "software",
            " system",
            " solution",
            "licence",
            "license",
            "digital platform",
        ],
    },
    NonStaffingCategory {
        label: "fire safety",
        keywords: &[
            "fire safety",
            "fire alarm",
            "fire risk assessment",
            "fire extinguisher",
            "fire door",
        ],
    },
    NonStaffingCategory {
        label: "payroll and financial",
        keywords: &[
            "payroll",
            "accountancy",
            "audit services",
            "insurance services",
            "banking services",
            "pension",
        ],
    },
    NonStaffingCategory {
        label: "alternative therapies",
        keywords: &[
            "acupuncture",
            "homeopathy",
            "hypnotherapy",
            "reflexology",
            "aromatherapy",
            "reiki",
        ],
    },
    NonStaffingCategory {
        label: "training and education",
        keywords: &[
            "training course",
            "training programme",
            "training provision",
            "apprenticeship",
            "e-learning",
            "education and training",
        ],
    },
    NonStaffingCategory {
        label: "rental and maintenance",
        keywords: &[
            "rental",
            "leasing",
            "hire of",
            "maintenance contract",
            "support contract",
            "service and maintenance",
        ],
    },
    NonStaffingCategory {
        label: "marketing",
        keywords: &[
            "marketing",
            "advertising",
            "media buying",
            "communications campaign",
            "branding",
        ],
    },
    NonStaffingCategory {
        label: "property and estates",
        keywords: &[
            "property",
            "estates strategy",
            "land at",
            "lease of",
            "premises",
            "car park",
        ],
    },
    NonStaffingCategory {
        label: "machinery parts and printing",
        keywords: &[
            "spare parts",
            "machinery",
            "printing",
            "print services",
            "franking",
        ],
    },
    NonStaffingCategory {
        label: "provider appointment",
        keywords: &[
            "any qualified provider",
            "appointment of a provider",
            "lead provider",
            "prime provider",
            "provider selection",
        ],
    },
];

pub const POSITIVE_INDICATORS: &[&str] = &[
    // clinical staffing
    "locum",
    "doctor",
    "nurse",
    "consultant",
    "surgeon",
    "anaesthetist",
    "radiographer",
    "sonographer",
    "clinical staff",
    "medical staff",
    // clinical service delivery
    "insourc",
    "provision of clinical",
    "clinical service",
    "service delivery",
    "outsourced clinical",
    // patient-facing services
    "outpatient",
    "inpatient",
    "patient",
    "clinic",
    "ward",
    // procedure performance
    "endoscopy",
    "surgery",
    "surgical",
    "theatre",
    "procedure",
    "diagnostic",
    "scan",
    "treatment",
];
