use crate::types::Section;

/// Longest slice of statutory text embedded per section in the synthesis
/// prompt. Keeps the request inside typical context limits.
const SECTION_TEXT_CLIP: usize = 1000;

pub const SYSTEM_PROMPT: &str = "You are a legal expert specialising in Singapore's \
Personal Data Protection Act 2012. You answer precisely, cite section numbers, and \
never invent sections that were not provided to you.";

/// Build the retrieval prompt: the scenario plus a compact `(id, title)`
/// listing of every catalog section, asking for the most relevant ids.
pub fn retrieval_prompt(scenario: &str, sections: &[Section], top_k: usize) -> String {
    let mut s = String::new();
    s.push_str(&format!(
        "Given this factual scenario about data protection:\n\n\"{scenario}\"\n\n"
    ));
    s.push_str(
        "Identify which sections of the Singapore Personal Data Protection Act 2012 \
         are most relevant. The available sections are:\n\n",
    );
    for section in sections {
        s.push_str(&format!("Section {}: {}\n", section.id, section.title));
    }
    s.push_str(&format!(
        "\nReturn a JSON list of the {top_k} most relevant section numbers, ordered by \
         relevance. Format: [\"11\", \"26A\", ...]. Return only the list."
    ));
    s
}

/// Build the IRAC synthesis prompt: the scenario plus the full text of
/// each retrieved section, demanding exactly six labeled segments.
pub fn synthesis_prompt(scenario: &str, sections: &[Section]) -> String {
    let mut s = String::new();
    s.push_str("Analyse the following factual scenario and provide legal advice using \
                the IRAC framework.\n\nFACTUAL SCENARIO:\n");
    s.push_str(scenario);

    if sections.is_empty() {
        s.push_str(
            "\n\nNo specific PDPA sections were retrieved for this scenario; reason \
             from the Act's general obligations.\n",
        );
    } else {
        s.push_str("\n\nRELEVANT PDPA SECTIONS:\n");
        for section in sections {
            s.push_str(&format!("\nSection {}: {}\n", section.id, section.title));
            s.push_str(&clip(&section.text));
            s.push('\n');
        }
    }

    s.push_str(
        "\n\nAnswer using exactly these six labeled segments, each starting on its \
         own line:\n\
         ISSUE: the key legal issues raised by the scenario\n\
         RULE: the relevant legal rules and principles from the PDPA sections\n\
         ANALYSIS: application of the rules to the specific facts\n\
         CONCLUSION: your legal conclusion\n\
         RISK_LEVEL: Low, Medium or High, with one sentence of reasoning\n\
         RECOMMENDATIONS: a bulleted list of specific compliance recommendations\n",
    );
    s
}

fn clip(text: &str) -> String {
    if text.chars().count() <= SECTION_TEXT_CLIP {
        return text.to_string();
    }
    let clipped: String = text.chars().take(SECTION_TEXT_CLIP).collect();
    format!("{clipped}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_leaves_short_text_alone() {
        assert_eq!(clip("short"), "short");
    }

    #[test]
    fn clip_truncates_long_text_with_ellipsis() {
        let long = "x".repeat(1500);
        let clipped = clip(&long);
        assert!(clipped.ends_with("..."));
        assert_eq!(clipped.chars().count(), SECTION_TEXT_CLIP + 3);
    }

    #[test]
    fn synthesis_prompt_mentions_every_section_id() {
        let sections = vec![
            Section {
                id: "13".into(),
                title: "Consent required".into(),
                text: "An organisation shall not collect...".into(),
            },
            Section {
                id: "26A".into(),
                title: "Notifiable data breaches".into(),
                text: "Where a data breach...".into(),
            },
        ];
        let p = synthesis_prompt("A vendor leaked customer emails.", &sections);
        assert!(p.contains("Section 13:"));
        assert!(p.contains("Section 26A:"));
        assert!(p.contains("RISK_LEVEL:"));
    }
}
