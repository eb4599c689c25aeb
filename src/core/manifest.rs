use std::path::Path;

use serde::Serialize;

use crate::config::ManifestConfig;
use crate::core::normalize::slug;
use crate::models::{existing_preview, AlbumRecord, AudioFormat};

/// One seeded track as the catalog app's database seeder expects it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ManifestEntry {
    pub track: String,
    pub genre: String,
    pub artist: String,
    pub album: String,
    pub audio_url: String,
    pub artwork_url: String,
    pub audio_present: bool,
    pub artwork_present: bool,
}

/// Describes every catalog track with the media URLs the app should serve.
///
/// The audio extension follows what is on disk under `audio_root`: `m4a`
/// when only an iTunes preview exists, `mp3` otherwise.
pub fn build(
    albums: &[AlbumRecord],
    audio_root: &Path,
    artwork_root: &Path,
    config: &ManifestConfig,
) -> Vec<ManifestEntry> {
    let audio_base = with_trailing_slash(&config.audio_base);
    let artwork_base = with_trailing_slash(&config.artwork_base);

    let mut entries = Vec::new();
    for album in albums {
        let artwork_present = album.artwork_path(artwork_root).is_file();
        let artwork_url = format!("{artwork_base}{}", album.artwork);
        for track in &album.tracks {
            let existing = existing_preview(&album.preview_stem(audio_root, track));
            let format = existing.as_ref().map_or(AudioFormat::Mp3, |(f, _)| *f);
            entries.push(ManifestEntry {
                track: track.clone(),
                genre: album.genre.clone(),
                artist: album.artist.clone(),
                album: album.album.clone(),
                audio_url: format!(
                    "{audio_base}{}/{}/{}.{}",
                    slug(&album.artist),
                    slug(&album.album),
                    slug(track),
                    format.extension()
                ),
                artwork_url: artwork_url.clone(),
                audio_present: existing.is_some(),
                artwork_present,
            });
        }
    }
    entries
}

fn with_trailing_slash(base: &str) -> String {
    format!("{}/", base.trim_end_matches('/'))
}
