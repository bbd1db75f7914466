// Catalog loading: CSV parsing, row hygiene, case-insensitive lookup.

use std::io::Write;

use pdpa_core::{AdvisorError, SectionCatalog};

fn write_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_sections_from_csv() {
    let file = write_csv(
        "section_number,section_title,text\n\
         11,Compliance with Act,An organisation is responsible...\n\
         26A,Notifiable data breaches,Where a data breach occurs...\n",
    );
    let catalog = SectionCatalog::load(file.path()).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.sections()[0].id, "11");
    assert_eq!(catalog.sections()[1].title, "Notifiable data breaches");
}

#[test]
fn rows_with_empty_id_are_skipped() {
    let file = write_csv(
        "section_number,section_title,text\n\
         ,orphan title,orphan text\n\
         13,Consent required,An organisation shall not...\n",
    );
    let catalog = SectionCatalog::load(file.path()).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.sections()[0].id, "13");
}

#[test]
fn lookup_is_case_insensitive_and_trims() {
    let file = write_csv("section_number,section_title,text\n26A,Breaches,Text\n");
    let catalog = SectionCatalog::load(file.path()).unwrap();
    assert!(catalog.get("26a").is_some());
    assert!(catalog.get(" 26A ").is_some());
    assert!(catalog.get("99").is_none());
}

#[test]
fn missing_file_is_a_configuration_error() {
    let err = SectionCatalog::load("/nonexistent/pdpa.csv").unwrap_err();
    assert!(matches!(err, AdvisorError::Configuration(_)));
}

#[test]
fn csv_with_no_usable_rows_is_a_configuration_error() {
    let file = write_csv("section_number,section_title,text\n,,\n");
    let err = SectionCatalog::load(file.path()).unwrap_err();
    assert!(matches!(err, AdvisorError::Configuration(_)));
}
