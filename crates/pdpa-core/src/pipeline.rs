use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    catalog::SectionCatalog,
    error::AdvisorError,
    llm::{ChatMessage, CompletionBackend, CompletionRequest},
    parser, prompt, screen,
    types::{LegalAdvice, Section},
};

/// The scenario-to-structured-advice pipeline: retrieval, synthesis,
/// parsing, strictly in that order. Holds only read-only shared state, so
/// concurrent requests are safe.
pub struct Advisor {
    catalog: Arc<SectionCatalog>,
    backend: Arc<dyn CompletionBackend>,
    /// Sections cited per request unless the caller overrides it.
    pub top_k: usize,
}

impl Advisor {
    pub fn new(catalog: Arc<SectionCatalog>, backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            catalog,
            backend,
            top_k: 5,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn catalog(&self) -> &SectionCatalog {
        &self.catalog
    }

    /// Ask the model which catalog sections bear on the scenario.
    ///
    /// Unknown identifiers in the response are dropped, never fabricated;
    /// an empty result is valid. A failed service call is a `Retrieval`
    /// error, which `generate_advice` downgrades to zero citations.
    pub async fn retrieve(
        &self,
        scenario: &str,
        top_k: usize,
    ) -> Result<Vec<Section>, AdvisorError> {
        if scenario.trim().is_empty() {
            return Err(AdvisorError::InvalidRequest("scenario is empty".into()));
        }
        if top_k == 0 {
            return Err(AdvisorError::InvalidRequest("top_k must be at least 1".into()));
        }
        if self.catalog.is_empty() {
            return Err(AdvisorError::Configuration(
                "section catalog is empty".into(),
            ));
        }

        let prompt = prompt::retrieval_prompt(scenario, self.catalog.sections(), top_k);
        let request = CompletionRequest::new(vec![ChatMessage::user(prompt)]).with_max_tokens(500);

        let response = self
            .backend
            .complete(&request)
            .await
            .map_err(AdvisorError::Retrieval)?;

        let sections = parser::parse_section_ids(&response, &self.catalog, top_k);
        info!(
            backend = self.backend.name(),
            requested = top_k,
            matched = sections.len(),
            "section retrieval complete"
        );
        Ok(sections)
    }

    /// Ask the model for the six-segment IRAC answer. Returns the raw
    /// response text; shape validation is entirely the parser's job.
    pub async fn synthesize(
        &self,
        scenario: &str,
        sections: &[Section],
    ) -> Result<String, AdvisorError> {
        let prompt = prompt::synthesis_prompt(scenario, sections);
        let request = CompletionRequest::new(vec![
            ChatMessage::system(prompt::SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ]);

        self.backend
            .complete(&request)
            .await
            .map_err(AdvisorError::Synthesis)
    }

    /// The single entry point for external callers: screen, retrieve
    /// (degrading to zero citations on failure), synthesize, parse.
    pub async fn generate_advice(&self, scenario: &str) -> Result<LegalAdvice, AdvisorError> {
        self.generate_advice_with_top_k(scenario, self.top_k).await
    }

    /// `generate_advice` with a per-request citation limit. Callers with a
    /// custom `top_k` go through here so the screen and degradation rules
    /// apply identically.
    pub async fn generate_advice_with_top_k(
        &self,
        scenario: &str,
        top_k: usize,
    ) -> Result<LegalAdvice, AdvisorError> {
        let scenario = scenario.trim();
        if scenario.is_empty() {
            return Err(AdvisorError::InvalidRequest("scenario is empty".into()));
        }

        if let Some(reason) = screen::rejection_reason(scenario) {
            info!("scenario rejected by keyword screen");
            return Ok(LegalAdvice::rejection(reason));
        }

        let sections = match self.retrieve(scenario, top_k).await {
            Ok(s) => s,
            Err(AdvisorError::Retrieval(e)) => {
                warn!("retrieval failed, proceeding without citations: {e}");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let raw = self.synthesize(scenario, &sections).await?;
        let advice = parser::parse_advice(&raw, sections);

        info!(
            risk = advice.risk_level.as_str(),
            sections = advice.relevant_sections.len(),
            degraded = advice.is_degraded(),
            "advice generated"
        );
        Ok(advice)
    }
}
