use chrono::Utc;

use crate::types::LegalAdvice;

/// Render an advice record as a plain-text report for the CLI and for
/// text-mode API responses.
pub fn render(advice: &LegalAdvice) -> String {
    let mut out = String::new();
    out.push_str("PDPA LEGAL ADVICE REPORT\n");
    out.push_str(&format!("Generated: {}\n", Utc::now().to_rfc3339()));
    out.push_str("========================\n\n");

    out.push_str(&format!("ISSUE:\n{}\n\n", advice.issue));
    out.push_str(&format!("RULE:\n{}\n\n", advice.rule));
    out.push_str(&format!("ANALYSIS:\n{}\n\n", advice.analysis));
    out.push_str(&format!("CONCLUSION:\n{}\n\n", advice.conclusion));
    out.push_str(&format!("RISK LEVEL: {}\n", advice.risk_level.as_str()));

    if !advice.relevant_sections.is_empty() {
        out.push_str("\nRELEVANT SECTIONS:\n");
        for section in &advice.relevant_sections {
            out.push_str(&format!("  - Section {}: {}\n", section.id, section.title));
        }
    }

    if !advice.recommendations.is_empty() {
        out.push_str("\nRECOMMENDATIONS:\n");
        for (i, rec) in advice.recommendations.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, rec));
        }
    }

    if advice.is_degraded() {
        out.push_str(
            "\nNote: parts of this report could not be extracted from the model \
             response and were filled with placeholders.\n",
        );
    }

    out
}
