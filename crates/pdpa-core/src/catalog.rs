use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::{error::AdvisorError, types::Section};

/// Raw CSV row. Column names match the bundled `pdpa_sections.csv`.
#[derive(Debug, Deserialize)]
struct SectionRow {
    section_number: String,
    #[serde(default)]
    section_title: String,
    #[serde(default)]
    text: String,
}

/// Read-only lookup over the statutory sections, loaded once at startup
/// and shared by reference afterwards. Identifier matching is
/// case-insensitive ("26a" finds "26A").
#[derive(Debug, Clone)]
pub struct SectionCatalog {
    sections: Vec<Section>,
}

impl SectionCatalog {
    /// Load the catalog from a CSV file with `section_number`,
    /// `section_title`, `text` columns. Rows with an empty identifier are
    /// skipped. An unreadable file or an empty result is a
    /// `Configuration` error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AdvisorError> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            AdvisorError::Configuration(format!("cannot open {}: {e}", path.display()))
        })?;

        let mut sections = Vec::new();
        let mut skipped = 0usize;
        for row in reader.deserialize::<SectionRow>() {
            let row = match row {
                Ok(r) => r,
                Err(e) => {
                    warn!("skipping malformed catalog row: {e}");
                    skipped += 1;
                    continue;
                }
            };
            let id = row.section_number.trim().to_string();
            if id.is_empty() {
                skipped += 1;
                continue;
            }
            sections.push(Section {
                id,
                title: row.section_title.trim().to_string(),
                text: row.text.trim().to_string(),
            });
        }

        if sections.is_empty() {
            return Err(AdvisorError::Configuration(format!(
                "no usable sections in {}",
                path.display()
            )));
        }

        info!(
            count = sections.len(),
            skipped,
            path = %path.display(),
            "section catalog loaded"
        );
        Ok(Self { sections })
    }

    /// Build a catalog from already-materialised sections (tests, embedded
    /// fixtures).
    pub fn from_sections(sections: Vec<Section>) -> Result<Self, AdvisorError> {
        if sections.is_empty() {
            return Err(AdvisorError::Configuration(
                "section catalog is empty".into(),
            ));
        }
        Ok(Self { sections })
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Case-insensitive lookup by section identifier.
    pub fn get(&self, id: &str) -> Option<&Section> {
        let id = id.trim();
        self.sections
            .iter()
            .find(|s| s.id.eq_ignore_ascii_case(id))
    }
}
