use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::core::normalize::slug;
use crate::models::AlbumRecord;

/// The dataset shipped with the binary.
const BUNDLED: &str = include_str!("catalog.toml");

#[derive(Deserialize)]
struct CatalogFile {
    albums: Vec<AlbumRecord>,
}

/// Parses a catalog from TOML text. Every album needs an artist, a title
/// and an artwork filename.
///
/// Artist, album and track names must keep at least one ASCII letter or
/// digit after slugging, since the slugs become directory and file names.
pub fn parse(content: &str) -> Result<Vec<AlbumRecord>> {
    let file: CatalogFile = toml::from_str(content).context("Failed to parse catalog")?;
    for (i, album) in file.albums.iter().enumerate() {
        if album.artist.trim().is_empty() || album.album.trim().is_empty() {
            bail!("Catalog entry #{} is missing artist or album", i + 1);
        }
        if album.artwork.trim().is_empty() {
            bail!("Catalog entry #{} ({}) has no artwork filename", i + 1, album.summary());
        }
        if slug(&album.artist).is_empty() || slug(&album.album).is_empty() {
            bail!(
                "Catalog entry #{} ({}) has no usable characters for its audio directory",
                i + 1,
                album.summary()
            );
        }
        if let Some(track) = album.tracks.iter().find(|t| slug(t).is_empty()) {
            bail!(
                "Catalog entry #{} ({}) has track {:?} with no usable characters for a file name",
                i + 1,
                album.summary(),
                track
            );
        }
    }
    Ok(file.albums)
}

pub fn bundled() -> Result<Vec<AlbumRecord>> {
    parse(BUNDLED)
}

/// Loads the catalog from `path`, or the bundled one when no path is given.
pub fn load(path: Option<&Path>) -> Result<Vec<AlbumRecord>> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read catalog {}", path.display()))?;
            parse(&content)
        }
        None => bundled(),
    }
}
