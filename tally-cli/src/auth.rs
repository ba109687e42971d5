use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};

use crate::llm::Provider;
use crate::state::ensure_tally_home;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthState {
    pub openai_api_key: Option<String>,
    pub groq_api_key: Option<String>,
}

impl AuthState {
    fn stored_key(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::OpenAI => self.openai_api_key.as_deref(),
            Provider::Groq => self.groq_api_key.as_deref(),
        }
    }
}

fn auth_path() -> Result<std::path::PathBuf> {
    Ok(ensure_tally_home()?.join("auth.json"))
}

pub fn load_auth() -> Result<AuthState> {
    let p = auth_path()?;
    if !p.exists() {
        return Ok(AuthState::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(serde_json::from_str(&s)?)
}

pub fn save_auth(auth: &AuthState) -> Result<()> {
    let p = auth_path()?;
    let s = serde_json::to_string_pretty(auth)?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// API key for `provider`: the environment variable wins over auth.json.
pub fn api_key(provider: Provider) -> Result<String> {
    if let Some(key) = std::env::var(provider.env_var()).ok().filter(|k| !k.trim().is_empty()) {
        return Ok(key.trim().to_string());
    }
    let auth = load_auth()?;
    auth.stored_key(provider).map(str::to_string).ok_or_else(|| {
        anyhow!(
            "missing {} API key; set {} or run: tally auth {}",
            provider.name(),
            provider.env_var(),
            provider.paste_command()
        )
    })
}

fn prompt_secret(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn openai_paste_api_key() -> Result<()> {
    let mut auth = load_auth()?;
    let key = prompt_secret("Paste OpenAI API key (starts with sk-)")?;
    if !key.starts_with("sk-") {
        bail!("key didn't look like an OpenAI API key (expected prefix sk-)");
    }
    auth.openai_api_key = Some(key);
    save_auth(&auth)?;
    println!("Saved OpenAI API key to auth.json");
    Ok(())
}

pub fn groq_paste_api_key() -> Result<()> {
    let mut auth = load_auth()?;
    let key = prompt_secret("Paste Groq API key (starts with gsk_)")?;
    if !key.starts_with("gsk_") {
        bail!("key didn't look like a Groq API key (expected prefix gsk_)");
    }
    auth.groq_api_key = Some(key);
    save_auth(&auth)?;
    println!("Saved Groq API key to auth.json");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_key_per_provider() {
        let auth: AuthState = serde_json::from_str(r#"{"groq_api_key":"gsk_abc"}"#).unwrap();
        assert_eq!(auth.stored_key(Provider::Groq), Some("gsk_abc"));
        assert_eq!(auth.stored_key(Provider::OpenAI), None);
    }
}
