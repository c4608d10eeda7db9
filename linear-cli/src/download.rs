// ABOUTME: Streams attachment downloads to disk through a temp file and an atomic rename
// ABOUTME: Picks unique file names and only sends the API key to linear.app hosts

use anyhow::{anyhow, Context, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use linear_sdk::attachments::{preferred_file_name, sanitize_file_name};
use linear_sdk::Attachment;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::constants::files::DOWNLOAD_TEMP_PREFIX;
use crate::constants::timeouts::PROGRESS_BAR_TICK_MS;

const LINEAR_DOMAIN: &str = "linear.app";

/// True for `linear.app` and its subdomains.
pub fn should_send_auth(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    host == LINEAR_DOMAIN || host.ends_with(&format!(".{LINEAR_DOMAIN}"))
}

/// File name to save an attachment under.
pub fn attachment_file_name(attachment: &Attachment) -> String {
    if !attachment.file_name.trim().is_empty() {
        return sanitize_file_name(&attachment.file_name);
    }
    preferred_file_name(attachment.title.as_deref().unwrap_or_default(), &attachment.url)
}

/// `path` itself when free (or when overwriting), else `stem-N.ext` for the first free N.
pub fn unique_path(path: &Path, overwrite: bool) -> PathBuf {
    if overwrite || !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    (1..)
        .map(|n| path.with_file_name(format!("{stem}-{n}{extension}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

pub struct Downloader {
    client: Client,
    api_key: Option<SecretString>,
    show_progress: bool,
}

impl Downloader {
    pub fn new(timeout: Duration, api_key: Option<SecretString>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("linear-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            api_key,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Downloads `url` into `dest`, returning the number of bytes written.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let parsed = Url::parse(url).with_context(|| format!("invalid url: {url}"))?;

        let mut request = self.client.get(parsed.clone());
        if let Some(key) = &self.api_key {
            if parsed.host_str().is_some_and(should_send_auth) {
                request = request.header(AUTHORIZATION, key.expose_secret());
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed for {}: {}", url, e))?;
        if !response.status().is_success() {
            return Err(anyhow!("download failed: {} ({})", response.status(), url));
        }

        let dir = dest
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = dest
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp = dir.join(format!("{DOWNLOAD_TEMP_PREFIX}{file_name}.part"));

        let progress = self.spinner(&file_name);
        let result = Self::stream_to(response, &tmp, progress.as_ref()).await;
        let result = result.and_then(|written| {
            fs::rename(&tmp, dest)
                .with_context(|| format!("Failed to move download to {}", dest.display()))?;
            Ok(written)
        });

        if let Some(pb) = progress {
            match &result {
                Ok(_) => pb.finish_and_clear(),
                Err(_) => pb.abandon_with_message(format!("Download failed: {file_name}")),
            }
        }
        match &result {
            Ok(written) => log::debug!("downloaded {} bytes from {} to {}", written, url, dest.display()),
            Err(_) => {
                let _ = fs::remove_file(&tmp);
            }
        }
        result
    }

    async fn stream_to(
        response: reqwest::Response,
        tmp: &Path,
        progress: Option<&ProgressBar>,
    ) -> Result<u64> {
        let mut file = fs::File::create(tmp)
            .with_context(|| format!("Failed to create {}", tmp.display()))?;
        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| anyhow!("Failed to read response body: {}", e))?;
            file.write_all(&chunk)?;
            written += chunk.len() as u64;
            if let Some(pb) = progress {
                pb.set_position(written);
            }
        }

        file.sync_all()?;
        Ok(written)
    }

    fn spinner(&self, file_name: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} {bytes}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Downloading {}", file_name));
        pb.enable_steady_tick(Duration::from_millis(PROGRESS_BAR_TICK_MS));
        Some(pb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use tempfile::TempDir;

    fn attachment(file_name: &str, title: Option<&str>, url: &str) -> Attachment {
        Attachment {
            id: "a1".to_string(),
            title: title.map(str::to_string),
            url: url.to_string(),
            file_name: file_name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_should_send_auth() {
        assert!(should_send_auth("uploads.linear.app"));
        assert!(should_send_auth("Uploads.Linear.App"));
        assert!(should_send_auth("linear.app"));
        assert!(!should_send_auth("evillinear.app"));
        assert!(!should_send_auth("linear.app.example.com"));
        assert!(!should_send_auth("127.0.0.1"));
    }

    #[test]
    fn test_attachment_file_name() {
        assert_eq!(
            attachment_file_name(&attachment("a/b.txt", None, "https://x.test/y")),
            "a_b.txt"
        );
        assert_eq!(
            attachment_file_name(&attachment("", Some("PR #42"), "https://github.com/o/r/pull/42")),
            "42"
        );
        assert_eq!(
            attachment_file_name(&attachment("", Some("notes"), "https://x.test/")),
            "notes"
        );
    }

    #[test]
    fn test_unique_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.csv");
        assert_eq!(unique_path(&path, false), path);

        fs::write(&path, "x").unwrap();
        assert_eq!(unique_path(&path, true), path);
        assert_eq!(unique_path(&path, false), dir.path().join("report-1.csv"));

        fs::write(dir.path().join("report-1.csv"), "x").unwrap();
        assert_eq!(unique_path(&path, false), dir.path().join("report-2.csv"));

        let bare = dir.path().join("LICENSE");
        fs::write(&bare, "x").unwrap();
        assert_eq!(unique_path(&bare, false), dir.path().join("LICENSE-1"));
    }

    #[tokio::test]
    async fn test_download_writes_file_without_foreign_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/files/trace.log")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("line one\nline two\n")
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("trace.log");
        let downloader = Downloader::new(Duration::from_secs(5), Some(SecretString::new("key".to_string().into_boxed_str())))
            .unwrap();
        let written = downloader
            .download(&format!("{}/files/trace.log", server.url()), &dest)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(written, 18);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "line one\nline two\n");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(DOWNLOAD_TEMP_PREFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_failed_download_leaves_nothing() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("missing.bin");
        let downloader = Downloader::new(Duration::from_secs(5), None).unwrap();
        let err = downloader
            .download(&format!("{}/missing", server.url()), &dest)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("404"));
        assert!(!dest.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_url_is_an_error() {
        let dir = TempDir::new().unwrap();
        let downloader = Downloader::new(Duration::from_secs(5), None).unwrap();
        assert!(downloader
            .download("not a url", &dir.path().join("x"))
            .await
            .is_err());
    }
}
