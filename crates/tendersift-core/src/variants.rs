use std::sync::OnceLock;

use regex::Regex;

/// Variants shorter than this are kept in the derived set but skipped by
/// substring scans, which would otherwise fire on almost any text.
pub const MIN_SCAN_LEN: usize = 4;

const NAME_SUFFIXES: &[&str] = &[
    " nhs foundation trust",
    " nhs trust",
    " foundation trust",
    " nhs ft",
    " ft",
];

const NAME_PREFIXES: &[&str] = &["the "];

const PARENT_PREFIX: &str = "nhs ";
const PARENT_SUFFIX: &str = " integrated care board";

fn location_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(.*?)\s+(?:nhs|university|hospitals?|teaching|healthcare|community|foundation)\b",
        )
        .expect("valid pattern")
    })
}

fn buyer_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(.*?)\s+(?:nhs|trust|foundation|university)\b").expect("valid pattern")
    })
}

fn push_unique(variants: &mut Vec<String>, candidate: &str) {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return;
    }
    if !variants.iter().any(|v| v == candidate) {
        variants.push(candidate.to_string());
    }
}

fn strip_suffixes(name: &str) -> String {
    let mut stripped = name.to_string();
    for suffix in NAME_SUFFIXES {
        if let Some(prefix) = stripped.strip_suffix(suffix) {
            stripped = prefix.trim_end().to_string();
        }
    }
    stripped
}

fn strip_prefixes(name: &str) -> String {
    let mut stripped = name.to_string();
    for prefix in NAME_PREFIXES {
        if let Some(rest) = stripped.strip_prefix(prefix) {
            stripped = rest.trim_start().to_string();
        }
    }
    stripped
}

/// Text preceding the first organizational marker word, e.g.
/// "Leeds" from "Leeds Teaching Hospitals NHS Trust". Input is expected
/// lower-cased.
#[must_use]
pub fn location_token(name: &str) -> Option<String> {
    location_marker()
        .captures(name)
        .map(|c| c[1].trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Leading token of a buyer name for the resolver's keyword tier: text
/// before `nhs|trust|foundation|university`, or before " and " when no
/// marker is present.
#[must_use]
pub fn leading_token(name: &str) -> Option<String> {
    let lowered = name.to_lowercase();
    let token = match buyer_marker().captures(&lowered) {
        Some(c) => c[1].trim().to_string(),
        None => match lowered.split_once(" and ") {
            Some((head, _)) => head.trim().to_string(),
            None => return None,
        },
    };
    (!token.is_empty()).then_some(token)
}

/// Ordered, deduplicated lower-case variants of a provider name.
#[must_use]
pub fn provider_variants(name: &str) -> Vec<String> {
    let lowered = name.trim().to_lowercase();
    let unprefixed = strip_prefixes(&lowered);
    let mut variants = Vec::new();

    push_unique(&mut variants, &lowered);
    push_unique(&mut variants, &strip_suffixes(&lowered));
    push_unique(&mut variants, &unprefixed);
    push_unique(&mut variants, &strip_suffixes(&unprefixed));
    if let Some(token) = location_token(&unprefixed) {
        push_unique(&mut variants, &token);
    }

    variants
}

/// Variants of a parent body name, including bracketed abbreviation forms.
#[must_use]
pub fn parent_body_variants(name: &str) -> Vec<String> {
    let lowered = name.trim().to_lowercase();
    let mut variants = Vec::new();

    push_unique(&mut variants, &lowered);

    let mut base = lowered.clone();
    if let Some(rest) = base.strip_prefix(PARENT_PREFIX) {
        base = rest.to_string();
    }
    if let Some(head) = base.strip_suffix(PARENT_SUFFIX) {
        base = head.to_string();
    }
    push_unique(&mut variants, &base);
    push_unique(&mut variants, &format!("{base} (icb)"));
    push_unique(&mut variants, &format!("{base} [icb]"));
    if let Some(token) = location_token(&lowered) {
        push_unique(&mut variants, &token);
    }

    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_variants_cover_all_forms() {
        let variants = provider_variants("Leeds Teaching Hospitals NHS Trust");
        assert_eq!(
            variants,
            vec![
                "leeds teaching hospitals nhs trust".to_string(),
                "leeds teaching hospitals".to_string(),
                "leeds".to_string(),
            ]
        );
    }

    #[test]
    fn provider_variants_strip_leading_the() {
        let variants = provider_variants("The Rotherham NHS Foundation Trust");
        assert!(variants.contains(&"rotherham nhs foundation trust".to_string()));
        assert!(variants.contains(&"rotherham".to_string()));
    }

    #[test]
    fn provider_variants_are_deduplicated() {
        let variants = provider_variants("Airedale NHS Foundation Trust");
        let mut seen = variants.clone();
        seen.dedup();
        assert_eq!(variants, seen);
    }

    #[test]
    fn parent_variants_include_bracketed_abbreviations() {
        let variants = parent_body_variants("NHS West Yorkshire Integrated Care Board");
        assert!(variants.contains(&"nhs west yorkshire integrated care board".to_string()));
        assert!(variants.contains(&"west yorkshire".to_string()));
        assert!(variants.contains(&"west yorkshire (icb)".to_string()));
        assert!(variants.contains(&"west yorkshire [icb]".to_string()));
    }

    #[test]
    fn location_token_stops_at_first_marker() {
        assert_eq!(
            location_token("cambridge university hospitals nhs foundation trust"),
            Some("cambridge".to_string())
        );
        assert_eq!(
            location_token("university college london hospitals nhs foundation trust"),
            Some("university college london".to_string())
        );
        assert_eq!(location_token("acme recruitment ltd"), None);
    }

    #[test]
    fn leading_token_uses_marker_then_and() {
        assert_eq!(
            leading_token("Gateshead Health NHS Foundation Trust"),
            Some("gateshead health".to_string())
        );
        assert_eq!(
            leading_token("Herefordshire and Worcestershire Health and Care"),
            Some("herefordshire".to_string())
        );
        assert_eq!(leading_token("Acme Recruitment Ltd"), None);
    }

    #[test]
    fn variants_never_contain_empty_strings() {
        for variants in [
            provider_variants("FT"),
            provider_variants("  "),
            parent_body_variants("NHS Integrated Care Board"),
        ] {
            assert!(variants.iter().all(|v| !v.trim().is_empty()));
        }
    }
}
