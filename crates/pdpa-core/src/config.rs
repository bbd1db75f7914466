use std::collections::HashMap;

use anyhow::Result;

/// Full application configuration.
/// Sensitive fields (API keys) come from env/.env only; everything else
/// has a usable default so the binaries start without a config file.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the PDPA sections CSV.
    pub csv_path: String,

    /// "openai" (default) or "ollama".
    pub backend: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    /// Models tried in order; the first one the service accepts wins.
    pub models: Vec<String>,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub request_timeout_s: u64,

    /// Sections cited per request unless the caller overrides it.
    pub top_k: usize,

    // Web server
    pub web_bind: String,
    pub web_port: u16,
    pub web_static_dir: String,
}

fn parse_dotenv() -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return map;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
    map
}

fn get(key: &str, dotenv: &HashMap<String, String>) -> Option<String> {
    std::env::var(key).ok().or_else(|| dotenv.get(key).cloned())
}

fn get_str(key: &str, dotenv: &HashMap<String, String>, default: &str) -> String {
    get(key, dotenv).unwrap_or_else(|| default.to_string())
}

fn get_u64(key: &str, dotenv: &HashMap<String, String>, default: u64) -> u64 {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn get_u16(key: &str, dotenv: &HashMap<String, String>, default: u16) -> u16 {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn get_usize(key: &str, dotenv: &HashMap<String, String>, default: usize) -> usize {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let dotenv = parse_dotenv();

        let models = get_str("MODELS", &dotenv, "gpt-4o-mini,gpt-3.5-turbo,gpt-4")
            .split(',')
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();

        Ok(Config {
            csv_path: get_str("PDPA_CSV_PATH", &dotenv, "data/pdpa_sections.csv"),
            backend: get_str("BACKEND", &dotenv, "openai"),
            openai_api_key: get_str("OPENAI_API_KEY", &dotenv, ""),
            openai_base_url: get_str("OPENAI_BASE_URL", &dotenv, "https://api.openai.com"),
            models,
            ollama_base_url: get_str("OLLAMA_BASE_URL", &dotenv, "http://localhost:11434"),
            ollama_model: get_str("OLLAMA_MODEL", &dotenv, "llama3.1"),
            request_timeout_s: get_u64("REQUEST_TIMEOUT_S", &dotenv, 120),
            top_k: get_usize("TOP_K", &dotenv, 5).max(1),
            web_bind: get_str("WEB_BIND", &dotenv, "127.0.0.1"),
            web_port: get_u16("WEB_PORT", &dotenv, 8080),
            web_static_dir: get_str("WEB_STATIC_DIR", &dotenv, "web"),
        })
    }
}
