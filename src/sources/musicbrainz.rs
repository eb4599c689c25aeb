use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::Endpoints;
use crate::core::normalize::normalize;
use crate::sources::{fetch_json, ArtworkSource, LookupError};

/// Image variants probed on the Cover Art Archive, in order.
const COVER_VARIANTS: [&str; 2] = ["front-500", "front"];

const PREFERRED_TYPES: [&str; 3] = ["Album", "Single", "EP"];

/// Resolves a MusicBrainz release-group, then its front cover on the
/// Cover Art Archive.
pub struct MusicBrainzClient {
    client: Client,
    search_endpoint: String,
    cover_endpoint: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(rename = "release-groups", default)]
    release_groups: Vec<ReleaseGroup>,
}

#[derive(Deserialize)]
struct ReleaseGroup {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(rename = "primary-type")]
    primary_type: Option<String>,
}

impl MusicBrainzClient {
    pub fn new(client: Client, endpoints: &Endpoints) -> Self {
        Self {
            client,
            search_endpoint: endpoints.musicbrainz.clone(),
            cover_endpoint: endpoints.cover_art_archive.clone(),
        }
    }

    /// First group with the album's title and an Album/Single/EP primary
    /// type, otherwise the first group.
    fn pick_release_group<'a>(groups: &'a [ReleaseGroup], album: &str) -> Option<&'a ReleaseGroup> {
        let n_album = normalize(album);
        groups
            .iter()
            .find(|g| {
                normalize(&g.title) == n_album
                    && g.primary_type
                        .as_deref()
                        .is_some_and(|t| PREFERRED_TYPES.contains(&t))
            })
            .or_else(|| groups.first())
    }

    fn find_release_group(&self, artist: &str, album: &str) -> Result<String, LookupError> {
        let query = format!("artist:\"{artist}\" AND releasegroup:\"{album}\"");
        let request = self.client.get(&self.search_endpoint).query(&[
            ("query", query.as_str()),
            ("fmt", "json"),
            ("limit", "5"),
        ]);
        let resp: SearchResponse = fetch_json(request)?;
        Self::pick_release_group(&resp.release_groups, album)
            .map(|g| g.id.clone())
            .filter(|id| !id.is_empty())
            .ok_or(LookupError::NoMatch)
    }

    /// Returns the final URL of the first variant that answers with an image.
    fn probe_cover(&self, mbid: &str) -> Result<String, LookupError> {
        for variant in COVER_VARIANTS {
            let url = format!("{}/{}/{}", self.cover_endpoint, mbid, variant);
            match self.client.get(&url).send() {
                Ok(resp) if resp.status().is_success() && is_image(&resp) => {
                    return Ok(resp.url().to_string());
                }
                Ok(resp) => log::debug!("Cover Art Archive {url}: status {}", resp.status()),
                Err(e) => log::debug!("Cover Art Archive {url}: {e}"),
            }
        }
        Err(LookupError::NoMatch)
    }
}

fn is_image(resp: &reqwest::blocking::Response) -> bool {
    resp.headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("image/"))
}

impl ArtworkSource for MusicBrainzClient {
    fn name(&self) -> &'static str {
        "MusicBrainz/CAA"
    }

    fn find_artwork(&self, artist: &str, album: &str) -> Result<String, LookupError> {
        let mbid = self.find_release_group(artist, album)?;
        log::debug!("MusicBrainz release-group for {artist} - {album}: {mbid}");
        self.probe_cover(&mbid)
    }
}
