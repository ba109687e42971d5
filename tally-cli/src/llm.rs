//! OpenAI-compatible chat-completions client used as the extractor.
//!
//! The first attempt asks for a `json_schema` response; if that request
//! fails (some models or providers reject the format) the call is retried
//! once without it, with an explicit "JSON only" instruction instead.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tally_core::{CandidateRecord, Taxonomy};
use tally_ingest::parse_extractor_reply;
use tally_ingest::prompt::{JSON_ONLY_SUFFIX, response_schema, system_prompt, user_message};
use tracing::{debug, warn};

use crate::auth;
use crate::config::LlmSection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    Groq,
}

impl Provider {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAI),
            "groq" => Ok(Provider::Groq),
            other => bail!("unknown llm provider {other:?} (expected openai or groq)"),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OpenAI",
            Provider::Groq => "Groq",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::Groq => "https://api.groq.com/openai/v1",
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Groq => "GROQ_API_KEY",
        }
    }

    pub fn paste_command(&self) -> &'static str {
        match self {
            Provider::OpenAI => "paste-openai-api-key",
            Provider::Groq => "paste-groq-api-key",
        }
    }
}

fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

#[derive(Debug, Clone, Serialize)]
struct Msg {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: &'a [Msg],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: Option<String>,
}

pub struct Extractor {
    client: reqwest::Client,
    provider: Provider,
    model: String,
    url: String,
    temperature: f32,
    max_tokens: u32,
    api_key: String,
}

impl Extractor {
    pub fn from_config(cfg: &LlmSection) -> Result<Self> {
        let provider = Provider::parse(&cfg.provider)?;
        let api_key = auth::api_key(provider)?;
        let base_url = cfg.base_url.as_deref().unwrap_or(provider.default_base_url());
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            provider,
            model: cfg.model.clone(),
            url: completions_url(base_url),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            api_key,
        })
    }

    /// Ask the model to turn `text` into a candidate record. Nothing here
    /// is trusted: the result still has to go through normalization.
    pub async fn extract(
        &self,
        text: &str,
        taxonomy: &Taxonomy,
        timezone: &str,
        today: NaiveDate,
    ) -> Result<CandidateRecord> {
        let system = Msg {
            role: "system",
            content: system_prompt(taxonomy, timezone),
        };
        let user = user_message(text, today);

        let structured = [
            system.clone(),
            Msg {
                role: "user",
                content: user.clone(),
            },
        ];
        let format = json!({ "type": "json_schema", "json_schema": response_schema(taxonomy) });

        let content = match self.complete(&structured, Some(format)).await {
            Ok(c) => c,
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "structured request failed; retrying with plain JSON");
                let plain = [
                    system,
                    Msg {
                        role: "user",
                        content: format!("{user}{JSON_ONLY_SUFFIX}"),
                    },
                ];
                self.complete(&plain, None).await?
            }
        };
        debug!(reply = %content, "extractor reply");
        parse_extractor_reply(&content)
    }

    async fn complete(&self, messages: &[Msg], response_format: Option<Value>) -> Result<String> {
        let body = Req {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format,
        };

        let resp = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("{} request", self.provider.name()))?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("{} error: {status} {txt}", self.provider.name());
        }

        let out: Resp = resp.json().await.context("parse completion response")?;
        let content = out
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();
        if content.trim().is_empty() {
            bail!("{} returned an empty completion", self.provider.name());
        }
        Ok(content.trim().to_string())
    }
}
