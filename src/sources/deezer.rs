use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::Endpoints;
use crate::models::AudioFormat;
use crate::sources::{fetch_json, LookupError, PreviewSource};

/// Deezer search client. Previews are ~30s mp3 clips.
pub struct DeezerClient {
    client: Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    // Deezer reports quota errors as `{"error": {...}}` with status 200.
    #[serde(default)]
    data: Vec<DeezerTrack>,
}

#[derive(Deserialize)]
struct DeezerTrack {
    preview: Option<String>,
}

impl DeezerClient {
    pub fn new(client: Client, endpoints: &Endpoints) -> Self {
        Self {
            client,
            endpoint: endpoints.deezer.clone(),
        }
    }

    fn query(artist: &str, track: &str) -> String {
        format!("artist:\"{artist}\" track:\"{track}\"")
    }

    fn pick_preview(tracks: &[DeezerTrack]) -> Result<String, LookupError> {
        tracks
            .iter()
            .filter_map(|t| t.preview.as_deref())
            .find(|u| !u.is_empty())
            .map(str::to_string)
            .ok_or(LookupError::NoMatch)
    }
}

impl PreviewSource for DeezerClient {
    fn name(&self) -> &'static str {
        "Deezer"
    }

    fn format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }

    fn find_preview(&self, artist: &str, track: &str) -> Result<String, LookupError> {
        let request = self
            .client
            .get(&self.endpoint)
            .query(&[("q", Self::query(artist, track))]);
        let resp: SearchResponse = fetch_json(request)?;
        Self::pick_preview(&resp.data)
    }
}
