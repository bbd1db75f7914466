use serde::{Deserialize, Serialize};

use crate::parser;

// ── Catalog ──────────────────────────────────────────────────────────────

/// One statutory section from the PDPA catalog. Immutable for the process
/// lifetime once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    /// Section identifier as printed in the Act, e.g. "11" or "26A".
    pub id: String,
    pub title: String,
    /// Full statutory text.
    pub text: String,
}

// ── Advice record ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Unknown => "Unknown",
        }
    }
}

/// Structured IRAC advice record. Built once by the response parser and
/// never mutated afterwards. Narrative fields are always populated: when a
/// segment could not be extracted the field holds its documented
/// placeholder, so consumers never need to null-check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalAdvice {
    pub issue: String,
    pub rule: String,
    pub analysis: String,
    pub conclusion: String,
    pub risk_level: RiskLevel,
    /// Always a subsequence of the loaded catalog, in relevance order.
    pub relevant_sections: Vec<Section>,
    pub recommendations: Vec<String>,
}

/// Issue text of the record returned for scenarios the input screen
/// rejects. Sentinel for `is_rejection`.
pub const REJECTION_ISSUE: &str = "Input validation failed";

impl LegalAdvice {
    /// Complete record returned for scenarios the keyword screen rejects
    /// before any model call. Not an error and not degraded: the surfaces
    /// render it like any other advice.
    pub fn rejection(reason: String) -> Self {
        LegalAdvice {
            issue: REJECTION_ISSUE.into(),
            rule: "This advisor handles data protection and privacy law scenarios only".into(),
            analysis: reason,
            conclusion: "Provide a scenario involving personal data, privacy or legal compliance."
                .into(),
            risk_level: RiskLevel::Unknown,
            relevant_sections: Vec::new(),
            recommendations: vec![
                "Describe how personal data is collected, used or disclosed".into(),
                "Include the organisations and individuals involved".into(),
            ],
        }
    }

    /// True when the input screen rejected the scenario and no model call
    /// was made.
    pub fn is_rejection(&self) -> bool {
        self.issue == REJECTION_ISSUE
    }

    /// True when any narrative field fell back to its placeholder or the
    /// risk level could not be classified. Degraded advice is still a
    /// complete, renderable record. A rejection record is not degraded:
    /// nothing was extracted because nothing was asked.
    pub fn is_degraded(&self) -> bool {
        !self.is_rejection()
            && (self.issue == parser::ISSUE_PLACEHOLDER
                || self.rule == parser::RULE_PLACEHOLDER
                || self.analysis == parser::ANALYSIS_PLACEHOLDER
                || self.conclusion == parser::CONCLUSION_PLACEHOLDER
                || self.risk_level == RiskLevel::Unknown)
    }
}
