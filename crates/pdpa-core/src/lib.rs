pub mod catalog;
pub mod config;
pub mod error;
pub mod llm;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod report;
pub mod screen;
pub mod types;

pub use catalog::SectionCatalog;
pub use error::AdvisorError;
pub use pipeline::Advisor;
pub use types::{LegalAdvice, RiskLevel, Section};
