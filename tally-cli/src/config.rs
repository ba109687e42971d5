use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tally_core::time::parse_timezone;
use tally_core::{DateWindow, ResolvePolicy, TieBreak};
use tally_ingest::SAMPLE_TAXONOMY;

use crate::state::{default_taxonomy_path, ensure_tally_home};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub runtime: RuntimeSection,
    #[serde(default)]
    pub policy: PolicySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// "openai" or "groq"
    pub provider: String,
    pub model: String,
    /// Overrides the provider's default endpoint (any OpenAI-compatible API).
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini-2024-07-18".to_string(),
            base_url: None,
            temperature: 0.0,
            max_tokens: 300,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSection {
    pub timezone: String,
    /// Defaults to `~/.tally/taxonomy.toml`.
    pub taxonomy_file: Option<PathBuf>,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            timezone: "Europe/Rome".to_string(),
            taxonomy_file: None,
        }
    }
}

impl RuntimeSection {
    pub fn taxonomy_path(&self) -> Result<PathBuf> {
        match &self.taxonomy_file {
            Some(p) => Ok(p.clone()),
            None => default_taxonomy_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySection {
    pub tie_break: TieBreak,
    pub fallback_expense: Option<String>,
    pub past_days: u32,
    pub future_days: u32,
}

impl Default for PolicySection {
    fn default() -> Self {
        let window = DateWindow::default();
        Self {
            tie_break: TieBreak::default(),
            fallback_expense: None,
            past_days: window.past_days,
            future_days: window.future_days,
        }
    }
}

/// Largest accepted date window on either side of today.
pub const MAX_WINDOW_DAYS: u32 = 36_500;

impl PolicySection {
    pub fn resolve_policy(&self) -> ResolvePolicy {
        ResolvePolicy {
            tie_break: self.tie_break,
            fallback_expense: self.fallback_expense.clone(),
        }
    }

    fn check(&self) -> Result<()> {
        for (name, days) in [("past_days", self.past_days), ("future_days", self.future_days)] {
            if days > MAX_WINDOW_DAYS {
                bail!("policy.{name} = {days} is out of range (max {MAX_WINDOW_DAYS})");
            }
        }
        Ok(())
    }

    pub fn window(&self) -> DateWindow {
        DateWindow {
            past_days: self.past_days,
            future_days: self.future_days,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_tally_home()?.join("config.toml"))
}

pub fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s).context("parse config.toml")?;
    parse_timezone(&cfg.runtime.timezone)?;
    cfg.policy.check()?;
    Ok(cfg)
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Write a default config and a starter taxonomy file, leaving existing
/// files alone.
pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
    } else {
        save_config(&Config::default())?;
        println!("Wrote {}", p.display());
    }

    let t = default_taxonomy_path()?;
    if t.exists() {
        println!("Taxonomy already exists: {}", t.display());
    } else {
        fs::write(&t, SAMPLE_TAXONOMY).with_context(|| format!("write {}", t.display()))?;
        println!("Wrote {}", t.display());
    }
    Ok(())
}
