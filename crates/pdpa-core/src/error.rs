use thiserror::Error;

/// Typed failures of the advice pipeline.
///
/// Parse degradation is deliberately not represented here: the response
/// parser never fails, it fills placeholders instead (see
/// `LegalAdvice::is_degraded`).
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// The section catalog could not be loaded. Fatal at startup; no
    /// advice is possible without it.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The section-retrieval call failed. Recoverable: the pipeline
    /// proceeds with zero citations.
    #[error("section retrieval failed: {0}")]
    Retrieval(anyhow::Error),

    /// The advice-generation call failed. Fatal for the request.
    #[error("advice synthesis failed: {0}")]
    Synthesis(anyhow::Error),

    /// Caller supplied unusable input (empty scenario, zero top_k).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
