use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use pdpa_core::{
    config::Config, llm::CompletionBackend, report, Advisor, SectionCatalog,
};
use pdpa_llm::{OllamaBackend, OpenAiBackend};

/// PDPA legal advisor: IRAC analysis of data-protection scenarios.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Factual scenario to analyse.
    scenario: String,

    /// Path to the PDPA sections CSV (overrides PDPA_CSV_PATH).
    #[arg(long)]
    csv: Option<String>,

    /// Number of sections to cite.
    #[arg(long)]
    top_k: Option<usize>,

    /// Model to use (overrides the configured fallback list).
    #[arg(long)]
    model: Option<String>,

    /// Backend: "openai" or "ollama" (overrides BACKEND).
    #[arg(long)]
    backend: Option<String>,

    /// Emit the advice record as JSON instead of a text report.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdpa_core=warn,pdpa_llm=warn".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(csv) = args.csv {
        config.csv_path = csv;
    }
    if let Some(top_k) = args.top_k {
        config.top_k = top_k.max(1);
    }
    if let Some(model) = args.model {
        config.models = vec![model.clone()];
        config.ollama_model = model;
    }
    if let Some(backend) = args.backend {
        config.backend = backend;
    }

    let catalog = Arc::new(SectionCatalog::load(&config.csv_path)?);

    let backend: Arc<dyn CompletionBackend> = match config.backend.as_str() {
        "ollama" => Arc::new(
            OllamaBackend::new(&config.ollama_base_url, &config.ollama_model)
                .with_timeout(config.request_timeout_s),
        ),
        _ => Arc::new(
            OpenAiBackend::new(
                &config.openai_base_url,
                &config.openai_api_key,
                config.models.clone(),
            )
            .with_timeout(config.request_timeout_s),
        ),
    };

    let advisor = Advisor::new(catalog, backend).with_top_k(config.top_k);

    eprintln!("Analysing scenario...");
    let advice = advisor.generate_advice(&args.scenario).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&advice)?);
    } else {
        println!("{}", report::render(&advice));
    }

    if advice.is_degraded() {
        eprintln!("Advice generated, but some fields could not be extracted and were filled with placeholders.");
    }

    Ok(())
}
