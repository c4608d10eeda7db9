// ABOUTME: API key resolution across the --api-key flag, LINEAR_API_KEY and the credential store
// ABOUTME: Also locates the data directory holding auth.json and the schema cache

use anyhow::{anyhow, Result};
use linear_sdk::constants::schema::SCHEMA_FILE_NAME;
use linear_sdk::constants::storage::AUTH_FILE_NAME;
use linear_sdk::storage::data_file;
use linear_sdk::CredentialStore;
use secrecy::SecretString;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::constants::env;

/// Where the active API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySource {
    Flag,
    Env,
    File,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::Flag => "flag",
            KeySource::Env => "env",
            KeySource::File => "file",
        }
    }
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

/// First non-empty key of flag, environment and stored credential.
pub fn resolve_api_key(
    flag: Option<&str>,
    store: &CredentialStore,
) -> Result<Option<(SecretString, KeySource)>> {
    if let Some(key) = non_empty(flag) {
        return Ok(Some((SecretString::new(key.to_string().into_boxed_str()), KeySource::Flag)));
    }

    let from_env = std::env::var(env::API_KEY).ok();
    if let Some(key) = non_empty(from_env.as_deref()) {
        return Ok(Some((SecretString::new(key.to_string().into_boxed_str()), KeySource::Env)));
    }

    Ok(store
        .load()?
        .map(|credential| (credential.api_key(), KeySource::File)))
}

/// `$XDG_DATA_HOME`, else `~/.local/share`.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(base) = std::env::var_os(env::XDG_DATA_HOME).filter(|base| !base.is_empty()) {
        return Ok(PathBuf::from(base));
    }
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not resolve home directory"))?;
    Ok(home.join(".local").join("share"))
}

pub fn default_store() -> Result<CredentialStore> {
    Ok(CredentialStore::new(data_file(&data_dir()?, AUTH_FILE_NAME)))
}

pub fn schema_cache_path() -> Result<PathBuf> {
    Ok(data_file(&data_dir()?, SCHEMA_FILE_NAME))
}
