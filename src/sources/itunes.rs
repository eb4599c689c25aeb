use std::sync::LazyLock;

use regex::Regex;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::{Endpoints, ItunesConfig};
use crate::core::matcher::{best_match, Candidate};
use crate::models::AudioFormat;
use crate::sources::{fetch_json, ArtworkSource, LookupError, PreviewSource};

static ARTWORK_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+x\d+(bb)?\.(jpg|png)").unwrap());

/// iTunes Search API client. Serves album artwork and m4a track previews.
pub struct ItunesClient {
    client: Client,
    endpoint: String,
    country: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ItunesItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItunesItem {
    #[serde(default)]
    collection_name: String,
    #[serde(default)]
    artist_name: String,
    artwork_url100: Option<String>,
    preview_url: Option<String>,
}

impl Candidate for ItunesItem {
    fn title(&self) -> &str {
        &self.collection_name
    }

    fn artist(&self) -> &str {
        &self.artist_name
    }
}

/// Rewrites the size template of an iTunes artwork URL to 1000x1000.
pub fn upscale_artwork_url(url: &str) -> String {
    ARTWORK_SIZE.replace_all(url, "/1000x1000bb.jpg").into_owned()
}

impl ItunesClient {
    pub fn new(client: Client, endpoints: &Endpoints, config: &ItunesConfig) -> Self {
        Self {
            client,
            endpoint: endpoints.itunes.clone(),
            country: config.country.clone(),
        }
    }

    fn search(&self, entity: &str, limit: u32, term: &str) -> Result<Vec<ItunesItem>, LookupError> {
        let limit = limit.to_string();
        let request = self.client.get(&self.endpoint).query(&[
            ("media", "music"),
            ("entity", entity),
            ("country", self.country.as_str()),
            ("limit", limit.as_str()),
            ("term", term),
        ]);
        let resp: SearchResponse = fetch_json(request)?;
        Ok(resp.results)
    }

    fn pick_artwork(results: &[ItunesItem], artist: &str, album: &str) -> Result<String, LookupError> {
        let best = best_match(results, artist, album).ok_or(LookupError::NoMatch)?;
        best.artwork_url100
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(upscale_artwork_url)
            .ok_or(LookupError::NoMatch)
    }

    fn pick_preview(results: &[ItunesItem]) -> Result<String, LookupError> {
        results
            .iter()
            .filter_map(|r| r.preview_url.as_deref())
            .find(|u| !u.is_empty())
            .map(str::to_string)
            .ok_or(LookupError::NoMatch)
    }
}

impl ArtworkSource for ItunesClient {
    fn name(&self) -> &'static str {
        "iTunes"
    }

    fn find_artwork(&self, artist: &str, album: &str) -> Result<String, LookupError> {
        let results = self.search("album", 10, &format!("{artist} {album}"))?;
        Self::pick_artwork(&results, artist, album)
    }
}

impl PreviewSource for ItunesClient {
    fn name(&self) -> &'static str {
        "iTunes"
    }

    fn format(&self) -> AudioFormat {
        AudioFormat::M4a
    }

    fn find_preview(&self, artist: &str, track: &str) -> Result<String, LookupError> {
        let results = self.search("song", 5, &format!("{artist} {track}"))?;
        Self::pick_preview(&results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{query_of, request_url, serve, serve_recorded, StubResponse};

    const ALBUM_RESULTS: &str = r#"{
        "resultCount": 3,
        "results": [
            {"collectionName": "Nevermind (Deluxe Edition)", "artistName": "Nirvana",
             "artworkUrl100": "https://is1.example/a/100x100bb.jpg"},
            {"collectionName": "Nevermind", "artistName": "Nirvana",
             "artworkUrl100": "https://is1.example/b/100x100bb.jpg"},
            {"collectionName": "Nevermind", "artistName": "Tribute Band"}
        ]
    }"#;

    fn parse(json: &str) -> Vec<ItunesItem> {
        serde_json::from_str::<SearchResponse>(json).unwrap().results
    }

    fn client_for(base: &str) -> ItunesClient {
        let endpoints = Endpoints {
            itunes: format!("{base}/search"),
            ..Endpoints::default()
        };
        ItunesClient::new(Client::new(), &endpoints, &ItunesConfig::default())
    }

    #[test]
    fn test_upscale_artwork_url() {
        assert_eq!(
            upscale_artwork_url("https://example/100x100bb.jpg"),
            "https://example/1000x1000bb.jpg"
        );
        assert_eq!(
            upscale_artwork_url("https://example/x/60x60.png"),
            "https://example/x/1000x1000bb.jpg"
        );
        assert_eq!(upscale_artwork_url("https://example/cover.jpg"), "https://example/cover.jpg");
    }

    #[test]
    fn test_pick_artwork_prefers_exact_title() {
        let results = parse(ALBUM_RESULTS);
        let url = ItunesClient::pick_artwork(&results, "Nirvana", "Nevermind").unwrap();
        assert_eq!(url, "https://is1.example/b/1000x1000bb.jpg");
    }

    #[test]
    fn test_pick_artwork_falls_back_to_first() {
        let results = parse(ALBUM_RESULTS);
        let url = ItunesClient::pick_artwork(&results, "Nirvana", "In Utero").unwrap();
        assert_eq!(url, "https://is1.example/a/1000x1000bb.jpg");
    }

    #[test]
    fn test_pick_artwork_without_url_is_no_match() {
        let results = parse(r#"{"results": [{"collectionName": "Nevermind", "artistName": "Nirvana"}]}"#);
        assert!(matches!(
            ItunesClient::pick_artwork(&results, "Nirvana", "Nevermind"),
            Err(LookupError::NoMatch)
        ));
        assert!(matches!(
            ItunesClient::pick_artwork(&[], "Nirvana", "Nevermind"),
            Err(LookupError::NoMatch)
        ));
    }

    #[test]
    fn test_pick_preview_skips_items_without_url() {
        let results = parse(
            r#"{"results": [
                {"trackName": "Lithium"},
                {"trackName": "Lithium", "previewUrl": ""},
                {"trackName": "Lithium", "previewUrl": "https://audio.example/lithium.m4a"}
            ]}"#,
        );
        assert_eq!(
            ItunesClient::pick_preview(&results).unwrap(),
            "https://audio.example/lithium.m4a"
        );
    }

    #[test]
    fn test_find_artwork_over_http() {
        let base = serve(vec![StubResponse::json(ALBUM_RESULTS)]);
        let url = client_for(&base).find_artwork("Nirvana", "Nevermind").unwrap();
        assert_eq!(url, "https://is1.example/b/1000x1000bb.jpg");
    }

    #[test]
    fn test_search_parameters() {
        let (base, requests) = serve_recorded(vec![
            StubResponse::json(ALBUM_RESULTS),
            StubResponse::json(r#"{"results": [{"previewUrl": "https://audio.example/lithium.m4a"}]}"#),
        ]);
        let client = client_for(&base);
        client.find_artwork("Nirvana", "Nevermind").unwrap();
        client.find_preview("Nirvana", "Lithium").unwrap();

        let album_search = requests.recv().unwrap();
        assert_eq!(request_url(&album_search).path(), "/search");
        assert_eq!(
            query_of(&album_search),
            [
                ("media", "music"),
                ("entity", "album"),
                ("country", "US"),
                ("limit", "10"),
                ("term", "Nirvana Nevermind"),
            ]
            .map(|(k, v)| (k.to_string(), v.to_string()))
        );

        let song_search = requests.recv().unwrap();
        assert_eq!(
            query_of(&song_search),
            [
                ("media", "music"),
                ("entity", "song"),
                ("country", "US"),
                ("limit", "5"),
                ("term", "Nirvana Lithium"),
            ]
            .map(|(k, v)| (k.to_string(), v.to_string()))
        );
    }

    #[test]
    fn test_find_preview_error_status() {
        let base = serve(vec![StubResponse::status(503)]);
        let err = client_for(&base).find_preview("Nirvana", "Lithium").unwrap_err();
        assert!(matches!(err, LookupError::Status(s) if s.as_u16() == 503));
    }

    #[test]
    fn test_find_preview_malformed_body() {
        let base = serve(vec![StubResponse::json("<html>")]);
        let err = client_for(&base).find_preview("Nirvana", "Lithium").unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
    }

    /// Hits the real iTunes API.
    /// Run with: cargo test itunes -- --ignored
    #[test]
    #[ignore]
    fn test_live_artwork() {
        let client = ItunesClient::new(Client::new(), &Endpoints::default(), &ItunesConfig::default());
        let url = client.find_artwork("Nirvana", "Nevermind").expect("lookup failed");
        assert!(url.contains("1000x1000bb"), "not upscaled: {url}");
    }
}
