//! Source archive fetching
//!
//! Downloads versioned library archives from the source host with retry and
//! exponential backoff, verifies nothing beyond a logged digest (the host
//! serves tags, not checksummed release files), and unpacks each archive
//! into a directory named after the library short name.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use crate::config::{defaults, urls};
use crate::core::build::SourceHost;
use crate::error::FetchError;

/// Fetches `<host>/<library>/archive/<label>.tar.gz` archives
#[derive(Debug, Clone)]
pub struct GithubSourceHost {
    client: reqwest::Client,
    host_base: String,
    version_label: String,
    max_retries: u32,
    base_delay_ms: u64,
}

impl GithubSourceHost {
    /// Create a fetcher for one host and version label
    pub fn new(host_base: impl Into<String>, version_label: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(300))
                .connect_timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            host_base: host_base.into(),
            version_label: version_label.into(),
            max_retries: defaults::MAX_DOWNLOAD_RETRIES,
            base_delay_ms: defaults::DOWNLOAD_RETRY_BASE_DELAY_MS,
        }
    }

    /// Override the retry policy
    #[must_use]
    pub fn with_retry_config(mut self, max_retries: u32, base_delay_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.base_delay_ms = base_delay_ms;
        self
    }

    /// Download one URL to a file, retrying with exponential backoff
    async fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let mut attempt = 0;
        loop {
            match self.try_download(url, dest).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        tracing::warn!("giving up on {url}: {e}");
                        return Err(FetchError::MaxRetriesExceeded {
                            url: url.to_string(),
                            retries: self.max_retries,
                        });
                    }
                    let delay = self.base_delay_ms * 2u64.pow(attempt - 1);
                    tracing::debug!("retrying {url} in {delay}ms: {e}");
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }

    async fn try_download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                error: e.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let io_err = |e: std::io::Error| FetchError::Io {
            path: dest.to_path_buf(),
            error: e.to_string(),
        };
        let mut file = tokio::fs::File::create(dest).await.map_err(io_err)?;
        let mut hasher = Sha256::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FetchError::Network {
                url: url.to_string(),
                error: e.to_string(),
            })?;
            hasher.update(&chunk);
            file.write_all(&chunk).await.map_err(io_err)?;
        }
        file.flush().await.map_err(io_err)?;

        tracing::debug!("downloaded {url} (sha256 {})", hex::encode(hasher.finalize()));
        Ok(())
    }

    async fn unpack(&self, archive: &Path, destination: &Path) -> Result<(), FetchError> {
        let status = tokio::process::Command::new("tar")
            .arg("xzf")
            .arg(archive)
            .arg("-C")
            .arg(destination)
            .status()
            .await
            .map_err(|e| FetchError::Unpack {
                archive: archive.to_path_buf(),
                error: e.to_string(),
            })?;
        if !status.success() {
            return Err(FetchError::Unpack {
                archive: archive.to_path_buf(),
                error: format!("tar exited with {status}"),
            });
        }
        Ok(())
    }
}

impl SourceHost for GithubSourceHost {
    async fn fetch_archive(&self, library: &str, destination: &Path) -> Result<(), FetchError> {
        let url = urls::archive_url(&self.host_base, library, &self.version_label);
        let io_err = |path: &Path, e: std::io::Error| FetchError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        };

        let downloads = destination.join(".downloads");
        tokio::fs::create_dir_all(&downloads)
            .await
            .map_err(|e| io_err(&downloads, e))?;
        let archive = downloads.join(format!("{library}-{}.tar.gz", self.version_label));

        self.download(&url, &archive).await?;
        self.unpack(&archive, destination).await?;

        // Archives unpack to <library>-<label>; rename to the short name.
        let unpacked = destination.join(urls::unpacked_dir_name(library, &self.version_label));
        let target = destination.join(library);
        tokio::fs::rename(&unpacked, &target)
            .await
            .map_err(|e| io_err(&unpacked, e))?;

        tracing::info!("fetched {library} into {}", target.display());
        Ok(())
    }
}
