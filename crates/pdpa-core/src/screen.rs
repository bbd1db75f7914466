//! Cheap keyword screen that rejects scenarios with no data-protection
//! content before any network call is made.

/// Terms that suggest the scenario is about personal data or compliance.
const LEGAL_KEYWORDS: &[&str] = &[
    "data", "personal", "privacy", "consent", "collection", "disclosure", "breach", "access",
    "correction", "retention", "protection", "purpose", "organisation", "organization",
    "individual", "customer", "client", "employee", "user", "information", "records", "database",
    "processing", "storage", "transfer", "compliance", "policy", "procedure", "notification",
    "request", "rights", "unauthorised", "unauthorized", "security", "confidential", "sensitive",
    "identifiable", "pdpa", "gdpr", "regulation", "law", "legal", "statute", "act", "company",
    "business", "entity", "corporation",
];

/// Terms that suggest the input is chatter rather than a legal scenario.
/// Their presence raises the keyword threshold instead of rejecting
/// outright, since real scenarios can mention them incidentally.
const NON_LEGAL_INDICATORS: &[&str] = &[
    "recipe", "cooking", "gaming", "entertainment", "music", "movie", "weather", "sports",
    "travel", "vacation", "hobby", "joke", "meme", "hello",
];

/// Returns `None` when the scenario looks like a data-protection matter,
/// otherwise a caller-facing reason for the rejection.
pub fn rejection_reason(scenario: &str) -> Option<String> {
    let lower = scenario.to_lowercase();

    let keyword_count = LEGAL_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .count();
    let has_noise = NON_LEGAL_INDICATORS.iter().any(|ind| lower.contains(ind));
    let threshold = if has_noise { 3 } else { 2 };

    if keyword_count < threshold {
        Some(
            "The scenario does not appear to involve personal data, privacy or legal \
             compliance. Please describe a factual situation about how personal data \
             is collected, used, disclosed or protected."
                .to_string(),
        )
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_data_protection_scenario() {
        let s = "Our company collected customer personal data without consent.";
        assert!(rejection_reason(s).is_none());
    }

    #[test]
    fn rejects_chatter() {
        assert!(rejection_reason("What is a good matcha recipe?").is_some());
    }

    #[test]
    fn noise_raises_threshold() {
        // Two keywords would pass normally, but not alongside a noise term.
        let s = "A joke about data privacy";
        assert!(rejection_reason(s).is_some());
    }
}
