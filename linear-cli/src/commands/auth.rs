// ABOUTME: Handlers for auth login, status and logout
// ABOUTME: Stores the API key in the credential file and reports which source is active

use anyhow::{Context, Result};
use chrono::Utc;
use dialoguer::Password;
use linear_sdk::{CredentialStore, LinearError};
use serde_json::json;
use std::io::{BufRead, Write};

use crate::credentials::resolve_api_key;
use crate::output::Renderer;

/// Where login reads the key from when no flag is given.
pub struct Prompt<'a> {
    pub input: &'a mut dyn BufRead,
    /// Use a hidden terminal prompt instead of reading a line from `input`
    pub interactive: bool,
    pub no_input: bool,
}

fn read_api_key(prompt: &mut Prompt<'_>) -> Result<String> {
    if prompt.no_input {
        return Err(LinearError::validation("API key required with --no-input").into());
    }
    if prompt.interactive {
        return Password::new()
            .with_prompt("Linear API key")
            .allow_empty_password(true)
            .interact()
            .context("read API key");
    }
    let mut line = String::new();
    prompt.input.read_line(&mut line).context("read API key")?;
    Ok(line)
}

pub fn login<W: Write>(
    store: &CredentialStore,
    flag_key: Option<&str>,
    prompt: &mut Prompt<'_>,
    out: &mut Renderer<W>,
) -> Result<()> {
    let api_key = match flag_key {
        Some(key) => key.to_string(),
        None => read_api_key(prompt)?,
    };
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(LinearError::validation("API key cannot be empty").into());
    }

    store.save(api_key, Utc::now())?;

    if out.is_json() {
        return out.json(&json!({"saved": true, "path": store.path().display().to_string()}));
    }
    out.line(format!("Saved API key to {}", store.path().display()))
}

pub fn status<W: Write>(
    store: &CredentialStore,
    flag_key: Option<&str>,
    out: &mut Renderer<W>,
) -> Result<()> {
    let source = resolve_api_key(flag_key, store)?.map(|(_, source)| source);

    if out.is_json() {
        out.json(&json!({"authenticated": source.is_some(), "source": source}))?;
    } else {
        match source {
            Some(source) => out.line(format!("Authenticated via {}", source))?,
            None => out.line("Not authenticated")?,
        }
    }

    match source {
        Some(_) => Ok(()),
        None => Err(anyhow::Error::new(LinearError::Unauthorized).context("No API key configured")),
    }
}

pub fn logout<W: Write>(store: &CredentialStore, out: &mut Renderer<W>) -> Result<()> {
    store.delete()?;
    if out.is_json() {
        return out.json(&json!({"deleted": true, "path": store.path().display().to_string()}));
    }
    out.line("Logged out")
}
