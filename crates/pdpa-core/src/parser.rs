//! Deterministic extraction of the structured advice record from the
//! model's free-form IRAC response, and of section identifiers from the
//! retrieval response.
//!
//! The advice parser never fails: malformed or partially-labeled input
//! yields a complete record with placeholders filling the gaps. The
//! upstream text format is not contractually guaranteed, so a best-effort
//! record beats aborting a user-facing report.

use crate::{
    catalog::SectionCatalog,
    types::{LegalAdvice, RiskLevel, Section},
};

pub const ISSUE_PLACEHOLDER: &str = "Issue not identified";
pub const RULE_PLACEHOLDER: &str = "Rule not identified";
pub const ANALYSIS_PLACEHOLDER: &str = "Analysis not available";
pub const CONCLUSION_PLACEHOLDER: &str = "Conclusion not available";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Issue,
    Rule,
    Analysis,
    Conclusion,
    RiskLevel,
    Recommendations,
}

impl Field {
    /// Header spellings accepted for this field, lowercase.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Issue => &["issue:"],
            Field::Rule => &["rule:"],
            Field::Analysis => &["analysis:"],
            Field::Conclusion => &["conclusion:"],
            Field::RiskLevel => &["risk_level:", "risk level:"],
            Field::Recommendations => &["recommendations:"],
        }
    }
}

const ALL_FIELDS: [Field; 6] = [
    Field::Issue,
    Field::Rule,
    Field::Analysis,
    Field::Conclusion,
    Field::RiskLevel,
    Field::Recommendations,
];

/// A recognized header occurrence: where the header starts, and where its
/// segment body begins.
#[derive(Clone, Copy)]
struct HeaderHit {
    field: Field,
    start: usize,
    body_start: usize,
}

/// Parse the raw synthesis response into a complete `LegalAdvice`,
/// attaching `relevant_sections` unchanged.
pub fn parse_advice(raw: &str, relevant_sections: Vec<Section>) -> LegalAdvice {
    let lower = raw.to_ascii_lowercase();

    let mut hits: Vec<HeaderHit> = ALL_FIELDS
        .iter()
        .filter_map(|&field| find_header(&lower, field))
        .collect();
    hits.sort_by_key(|h| h.start);

    let mut issue = None;
    let mut rule = None;
    let mut analysis = None;
    let mut conclusion = None;
    let mut risk_body = None;
    let mut recommendations_body = None;

    for (i, hit) in hits.iter().enumerate() {
        let end = hits.get(i + 1).map_or(raw.len(), |next| next.start);
        let body = raw[hit.body_start..end]
            .trim_matches(|c: char| c == '*' || c.is_whitespace())
            .to_string();
        match hit.field {
            Field::Issue => issue = Some(body),
            Field::Rule => rule = Some(body),
            Field::Analysis => analysis = Some(body),
            Field::Conclusion => conclusion = Some(body),
            Field::RiskLevel => risk_body = Some(body),
            Field::Recommendations => recommendations_body = Some(body),
        }
    }

    LegalAdvice {
        issue: non_empty_or(issue, ISSUE_PLACEHOLDER),
        rule: non_empty_or(rule, RULE_PLACEHOLDER),
        analysis: non_empty_or(analysis, ANALYSIS_PLACEHOLDER),
        conclusion: non_empty_or(conclusion, CONCLUSION_PLACEHOLDER),
        risk_level: risk_body.as_deref().map_or(RiskLevel::Unknown, classify_risk),
        relevant_sections,
        recommendations: recommendations_body
            .as_deref()
            .map_or_else(Vec::new, split_recommendations),
    }
}

fn non_empty_or(value: Option<String>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => placeholder.to_string(),
    }
}

/// Find the first plausible occurrence of a header in the lowercased text.
/// Occurrences that start their own line (allowing list markers and
/// markdown emphasis before them) are preferred over mid-sentence matches,
/// so prose like "the issue: ..." inside another segment does not steal a
/// header when a real one exists.
fn find_header(lower: &str, field: Field) -> Option<HeaderHit> {
    let mut first_any: Option<HeaderHit> = None;
    let mut first_anchored: Option<HeaderHit> = None;

    for alias in field.aliases() {
        let mut from = 0;
        while let Some(rel) = lower[from..].find(alias) {
            let start = from + rel;
            let hit = HeaderHit {
                field,
                start,
                body_start: start + alias.len(),
            };
            if first_any.map_or(true, |h| start < h.start) {
                first_any = Some(hit);
            }
            if line_anchored(lower, start) && first_anchored.map_or(true, |h| start < h.start) {
                first_anchored = Some(hit);
            }
            from = start + alias.len();
        }
    }

    first_anchored.or(first_any)
}

/// True when only list/emphasis decoration sits between the previous
/// newline and `pos`.
fn line_anchored(text: &str, pos: usize) -> bool {
    let line_start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    text[line_start..pos]
        .chars()
        .all(|c| c.is_whitespace() || matches!(c, '#' | '*' | '-' | '.' | ')') || c.is_ascii_digit())
}

/// Classify a risk segment by substring, High > Medium > Low priority:
/// "Medium to High risk" resolves to High. Unrecognised text maps to
/// `Unknown` rather than failing.
pub fn classify_risk(body: &str) -> RiskLevel {
    let lower = body.to_ascii_lowercase();
    if lower.contains("high") {
        RiskLevel::High
    } else if lower.contains("medium") {
        RiskLevel::Medium
    } else if lower.contains("low") {
        RiskLevel::Low
    } else {
        RiskLevel::Unknown
    }
}

/// Split a recommendations segment into ordered items, one per non-blank
/// line, with leading bullet markers and numbering stripped.
pub fn split_recommendations(body: &str) -> Vec<String> {
    body.lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    let rest = line.trim_start_matches(['-', '*', '•', '–']).trim_start();
    // Numbered markers: "1." / "2)" / "10."
    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let after = &rest[digits..];
        if let Some(stripped) = after.strip_prefix('.').or_else(|| after.strip_prefix(')')) {
            return stripped.trim_start();
        }
    }
    rest
}

/// Parse the retrieval response into catalog sections.
///
/// The prompt asks for a JSON list, so that is tried first (accepting both
/// string and numeric elements); otherwise the text is split on common
/// delimiters and identifier-shaped tokens are kept. Tokens that match no
/// catalog entry are silently discarded; duplicates keep their first
/// (highest-ranked) position. The result is capped at `top_k`.
pub fn parse_section_ids(response: &str, catalog: &SectionCatalog, top_k: usize) -> Vec<Section> {
    let tokens = extract_json_ids(response).unwrap_or_else(|| split_id_tokens(response));

    let mut out: Vec<Section> = Vec::new();
    for token in tokens {
        if out.len() >= top_k {
            break;
        }
        if let Some(section) = catalog.get(&token) {
            if !out.iter().any(|s| s.id == section.id) {
                out.push(section.clone());
            }
        }
    }
    out
}

fn extract_json_ids(response: &str) -> Option<Vec<String>> {
    let start = response.find('[')?;
    let end = response[start..].rfind(']')? + start;
    let list: Vec<serde_json::Value> = serde_json::from_str(&response[start..=end]).ok()?;
    Some(
        list.into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
    )
}

fn split_id_tokens(response: &str) -> Vec<String> {
    response
        .split([',', '\n', ';', ' '])
        .map(|t| t.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
        .filter(|t| {
            !t.is_empty()
                && t.chars().all(|c| c.is_ascii_alphanumeric())
                && t.chars().any(|c| c.is_ascii_digit())
        })
        .map(str::to_string)
        .collect()
}
