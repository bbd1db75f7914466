// Response-parser behaviour: header extraction in any order, placeholder
// fill for missing segments, risk-keyword priority, and bullet handling.

use pdpa_core::parser::{
    self, parse_advice, ANALYSIS_PLACEHOLDER, CONCLUSION_PLACEHOLDER, ISSUE_PLACEHOLDER,
    RULE_PLACEHOLDER,
};
use pdpa_core::types::{RiskLevel, Section};

fn section(id: &str) -> Section {
    Section {
        id: id.into(),
        title: format!("Title {id}"),
        text: format!("Text of section {id}"),
    }
}

// =============================================================================
// Well-formed responses
// =============================================================================

#[test]
fn well_formed_response_recovers_all_fields_verbatim() {
    let raw = "ISSUE: Did consent occur?\nRULE: Section 13 requires consent.\n\
               ANALYSIS: No consent was obtained.\nCONCLUSION: Non-compliant.\n\
               RISK_LEVEL: High risk of enforcement.\n\
               RECOMMENDATIONS:\n1. Obtain consent\n2. Update policy";
    let advice = parse_advice(raw, vec![section("13")]);

    assert_eq!(advice.issue, "Did consent occur?");
    assert_eq!(advice.rule, "Section 13 requires consent.");
    assert_eq!(advice.analysis, "No consent was obtained.");
    assert_eq!(advice.conclusion, "Non-compliant.");
    assert_eq!(advice.risk_level, RiskLevel::High);
    assert_eq!(advice.recommendations, vec!["Obtain consent", "Update policy"]);
    assert_eq!(advice.relevant_sections.len(), 1);
    assert!(!advice.is_degraded());
}

#[test]
fn headers_are_recognised_in_any_order() {
    let raw = "CONCLUSION: C.\nISSUE: I.\nRECOMMENDATIONS:\n- r1\nRULE: R.\n\
               RISK_LEVEL: low\nANALYSIS: A.";
    let advice = parse_advice(raw, Vec::new());
    assert_eq!(advice.issue, "I.");
    assert_eq!(advice.rule, "R.");
    assert_eq!(advice.analysis, "A.");
    assert_eq!(advice.conclusion, "C.");
    assert_eq!(advice.risk_level, RiskLevel::Low);
    assert_eq!(advice.recommendations, vec!["r1"]);
}

#[test]
fn headers_match_case_insensitively_and_with_markdown() {
    let raw = "**Issue:** consent missing\n**Rule:** s13\n**Analysis:** applied\n\
               **Conclusion:** breach\n**Risk Level:** Medium\n**Recommendations:**\n* fix it";
    let advice = parse_advice(raw, Vec::new());
    assert_eq!(advice.issue, "consent missing");
    assert_eq!(advice.rule, "s13");
    assert_eq!(advice.risk_level, RiskLevel::Medium);
    assert_eq!(advice.recommendations, vec!["fix it"]);
}

// =============================================================================
// Missing headers and placeholders
// =============================================================================

#[test]
fn missing_header_fills_only_that_field() {
    // No RULE header anywhere.
    let raw = "ISSUE: I.\nANALYSIS: A.\nCONCLUSION: C.\nRISK_LEVEL: low\nRECOMMENDATIONS:\n- r";
    let advice = parse_advice(raw, Vec::new());
    assert_eq!(advice.rule, RULE_PLACEHOLDER);
    assert_eq!(advice.issue, "I.");
    assert_eq!(advice.analysis, "A.");
    assert_eq!(advice.conclusion, "C.");
    assert!(advice.is_degraded());
}

#[test]
fn unlabeled_text_yields_all_placeholders_without_failing() {
    let advice = parse_advice("The model wrote an essay with no headers at all.", Vec::new());
    assert_eq!(advice.issue, ISSUE_PLACEHOLDER);
    assert_eq!(advice.rule, RULE_PLACEHOLDER);
    assert_eq!(advice.analysis, ANALYSIS_PLACEHOLDER);
    assert_eq!(advice.conclusion, CONCLUSION_PLACEHOLDER);
    assert_eq!(advice.risk_level, RiskLevel::Unknown);
    assert!(advice.recommendations.is_empty());
    assert!(advice.is_degraded());
}

#[test]
fn empty_segment_body_falls_back_to_placeholder() {
    let raw = "ISSUE:\nRULE: something";
    let advice = parse_advice(raw, Vec::new());
    assert_eq!(advice.issue, ISSUE_PLACEHOLDER);
    assert_eq!(advice.rule, "something");
}

// =============================================================================
// Risk classification
// =============================================================================

#[test]
fn risk_priority_is_high_over_medium_over_low() {
    assert_eq!(parser::classify_risk("Medium to High risk"), RiskLevel::High);
    assert_eq!(parser::classify_risk("not low but high risk"), RiskLevel::High);
    assert_eq!(parser::classify_risk("between low and medium"), RiskLevel::Medium);
    assert_eq!(parser::classify_risk("LOW"), RiskLevel::Low);
}

#[test]
fn unrecognised_risk_text_maps_to_unknown() {
    assert_eq!(parser::classify_risk("severe"), RiskLevel::Unknown);
    assert_eq!(parser::classify_risk(""), RiskLevel::Unknown);
}

// =============================================================================
// Recommendations
// =============================================================================

#[test]
fn bullets_and_numbering_are_stripped() {
    let body = "- first\n* second\n3) third\n\n  4. fourth  ";
    assert_eq!(
        parser::split_recommendations(body),
        vec!["first", "second", "third", "fourth"]
    );
}

#[test]
fn three_bulleted_lines_yield_three_items_in_order() {
    let raw = "RECOMMENDATIONS:\n- Obtain consent\n- Update the privacy policy\n- Train staff";
    let advice = parse_advice(raw, Vec::new());
    assert_eq!(
        advice.recommendations,
        vec!["Obtain consent", "Update the privacy policy", "Train staff"]
    );
}

// =============================================================================
// Retrieval-response id parsing
// =============================================================================

use pdpa_core::SectionCatalog;

fn catalog() -> SectionCatalog {
    SectionCatalog::from_sections(vec![section("11"), section("13"), section("26A")])
        .unwrap_or_else(|_| unreachable!("non-empty fixture"))
}

#[test]
fn json_list_response_is_parsed_in_order() {
    let found = parser::parse_section_ids(r#"["13", "11"]"#, &catalog(), 5);
    let ids: Vec<&str> = found.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["13", "11"]);
}

#[test]
fn unknown_ids_are_silently_dropped() {
    let found = parser::parse_section_ids(r#"["13", "99", "26A"]"#, &catalog(), 5);
    let ids: Vec<&str> = found.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["13", "26A"]);
}

#[test]
fn ids_match_case_insensitively_and_deduplicate() {
    let found = parser::parse_section_ids(r#"["26a", "26A", "11"]"#, &catalog(), 5);
    let ids: Vec<&str> = found.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["26A", "11"]);
}

#[test]
fn plain_text_response_falls_back_to_token_splitting() {
    let found = parser::parse_section_ids(
        "The most relevant sections are 13, 26A and 11.",
        &catalog(),
        5,
    );
    let ids: Vec<&str> = found.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["13", "26A", "11"]);
}

#[test]
fn result_is_capped_at_top_k() {
    let found = parser::parse_section_ids(r#"["11", "13", "26A"]"#, &catalog(), 2);
    assert_eq!(found.len(), 2);
}

#[test]
fn unparseable_response_yields_empty_not_error() {
    assert!(parser::parse_section_ids("no sections apply", &catalog(), 5).is_empty());
}
