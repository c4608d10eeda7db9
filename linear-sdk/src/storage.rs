// ABOUTME: Owner-only file persistence for credentials and cached data
// ABOUTME: Atomic temp-file-and-rename writes plus the API key credential store

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::constants::storage::{APP_DIR, AUTH_FILE_NAME};
use crate::error::LinearError;

/// Write `contents` next to `path`, then rename over it. Files are 0600, directories 0700.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        create_private_dir(dir)?;
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let result = (|| {
        let mut file = open_private(&tmp)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// Default location of a data file: `<data dir>/linear/<file>`.
pub fn data_file(data_dir: &Path, file_name: &str) -> PathBuf {
    data_dir.join(APP_DIR).join(file_name)
}

#[derive(Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    api_key: String,
    pub saved_at: DateTime<Utc>,
}

impl StoredCredential {
    pub fn api_key(&self) -> SecretString {
        SecretString::new(self.api_key.clone().into_boxed_str())
    }
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field("api_key", &"[REDACTED]")
            .field("saved_at", &self.saved_at)
            .finish()
    }
}

/// API key persisted as `{"api_key", "saved_at"}` JSON.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_file(data_dir, AUTH_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file or an empty key both mean "no credential".
    pub fn load(&self) -> Result<Option<StoredCredential>, LinearError> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(LinearError::Configuration(format!(
                    "open auth file {}: {err}",
                    self.path.display()
                )));
            }
        };

        let credential: StoredCredential = serde_json::from_slice(&contents).map_err(|err| {
            LinearError::Configuration(format!("decode auth file {}: {err}", self.path.display()))
        })?;

        if credential.api_key.is_empty() {
            return Ok(None);
        }
        Ok(Some(credential))
    }

    pub fn save(&self, api_key: &str, saved_at: DateTime<Utc>) -> Result<(), LinearError> {
        if api_key.is_empty() {
            return Err(LinearError::validation("api key is empty"));
        }

        let credential = StoredCredential {
            api_key: api_key.to_string(),
            saved_at,
        };
        let mut contents = serde_json::to_vec_pretty(&credential)?;
        contents.push(b'\n');

        write_atomic(&self.path, &contents).map_err(|err| {
            LinearError::Configuration(format!("write auth file {}: {err}", self.path.display()))
        })?;
        log::debug!("saved credential to {}", self.path.display());
        Ok(())
    }

    pub fn delete(&self) -> Result<(), LinearError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(LinearError::Configuration(format!(
                "remove auth file {}: {err}",
                self.path.display()
            ))),
        }
    }
}
