use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::squad::Roster;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
// Completions for a full squad routinely take tens of seconds.
const REQUEST_TIMEOUT_SECS: u64 = 60;

static CLIENT: OnceCell<Client> = OnceCell::new();

const SYSTEM_PROMPT: &str = "You are a football squad analyst. Using the squad data with fields \
like Name, Age, CA, PA and attributes, provide a concise assessment outlining strengths, areas \
needing upgrades or depth, and players who could be offloaded due to age or low potential.";

#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl AssessmentConfig {
    pub fn from_env() -> Self {
        let enabled = env_bool("ASSESSMENT_ENABLED", true);
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let model = env::var("OPENAI_MODEL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = env::var("OPENAI_BASE_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            enabled,
            api_key,
            model,
            base_url,
        }
    }
}

/// Name, Age, CA, PA and every attribute per player. Missing numbers are
/// sent as `null`.
pub fn squad_summary(roster: &Roster) -> Value {
    let rows: Vec<Value> = roster
        .iter()
        .map(|p| {
            let mut row = Map::new();
            row.insert("Name".to_string(), json!(p.name));
            row.insert("Age".to_string(), json!(p.age));
            row.insert("CA".to_string(), json!(p.ca));
            row.insert("PA".to_string(), json!(p.pa));
            for code in p.attributes.keys() {
                row.insert(code.clone(), json!(p.attribute(code)));
            }
            Value::Object(row)
        })
        .collect();
    Value::Array(rows)
}

pub fn assessment_request(cfg: &AssessmentConfig, roster: &Roster) -> Value {
    json!({
        "model": cfg.model,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": squad_summary(roster).to_string() },
        ],
    })
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

pub fn parse_completion(raw: &str) -> Result<String> {
    let resp: CompletionResponse =
        serde_json::from_str(raw).context("parse completion response")?;
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("completion response has no content"))
}

/// Free-text assessment of the squad from a chat-completions endpoint.
pub fn assess_squad(cfg: &AssessmentConfig, roster: &Roster) -> Result<String> {
    if !cfg.enabled {
        bail!("assessment disabled (ASSESSMENT_ENABLED)");
    }
    let Some(api_key) = cfg.api_key.as_deref() else {
        bail!("OPENAI_API_KEY not set");
    };
    if roster.is_empty() {
        bail!("no squad loaded");
    }

    let client = assessment_client()?;
    let url = format!("{}/chat/completions", cfg.base_url);
    let resp = client
        .post(&url)
        .header(AUTHORIZATION, format!("Bearer {api_key}"))
        .header(CONTENT_TYPE, "application/json")
        .body(assessment_request(cfg, roster).to_string())
        .send()
        .context("assessment request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading assessment body")?;
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, body));
    }
    parse_completion(&body)
}

fn assessment_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("fm_squad_terminal/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build assessment http client")
    })
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| {
            let t = v.trim().to_ascii_lowercase();
            !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
        })
        .unwrap_or(default)
}
