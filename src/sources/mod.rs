pub mod deezer;
pub mod itunes;
pub mod musicbrainz;

use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::config::HttpConfig;
use crate::models::AudioFormat;

/// Why a provider produced no media URL. Never fatal: the caller moves on
/// to the next provider.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("no matching result")]
    NoMatch,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Album artwork provider.
#[cfg_attr(test, mockall::automock)]
pub trait ArtworkSource {
    fn name(&self) -> &'static str;
    /// Resolves the URL of the cover image for an album.
    fn find_artwork(&self, artist: &str, album: &str) -> Result<String, LookupError>;
}

/// Audio preview provider.
#[cfg_attr(test, mockall::automock)]
pub trait PreviewSource {
    fn name(&self) -> &'static str;
    /// Container of the clips this provider serves.
    fn format(&self) -> AudioFormat;
    /// Resolves the URL of a short preview clip for a track.
    fn find_preview(&self, artist: &str, track: &str) -> Result<String, LookupError>;
}

/// Builds the blocking HTTP client shared by all providers and the downloader.
pub fn http_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.timeout())
        .user_agent(&config.user_agent)
        .build()
        .context("Failed to build HTTP client")
}

/// Sends `request` and decodes a JSON body, mapping every failure to a
/// [`LookupError`].
fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, LookupError> {
    let resp = request.send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(LookupError::Status(status));
    }
    let body = resp.text()?;
    Ok(serde_json::from_str(&body)?)
}
