use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::normalize::slug;

/// One album of the demo catalog, with its artwork filename and track list.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AlbumRecord {
    pub artist: String,
    pub album: String,
    #[serde(default)]
    pub genre: String,
    pub artwork: String,
    #[serde(default)]
    pub tracks: Vec<String>,
}

impl AlbumRecord {
    pub fn summary(&self) -> String {
        format!("{} - {}", self.artist, self.album)
    }

    /// Artwork destination: the literal filename under the artwork root.
    pub fn artwork_path(&self, root: &Path) -> PathBuf {
        root.join(&self.artwork)
    }

    /// `<artist-slug>/<album-slug>`, relative to the audio root.
    pub fn audio_dir(&self) -> PathBuf {
        PathBuf::from(slug(&self.artist)).join(slug(&self.album))
    }

    /// Preview destination without extension.
    pub fn preview_stem(&self, root: &Path, track: &str) -> PathBuf {
        root.join(self.audio_dir()).join(slug(track))
    }
}

/// Container of a downloaded preview. Decides the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Mp3,
    M4a,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 2] = [AudioFormat::Mp3, AudioFormat::M4a];

    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::M4a => "m4a",
        }
    }

    pub fn path_for(self, stem: &Path) -> PathBuf {
        stem.with_extension(self.extension())
    }
}

/// Returns the first existing preview file for the given stem, if any.
pub fn existing_preview(stem: &Path) -> Option<(AudioFormat, PathBuf)> {
    AudioFormat::ALL
        .iter()
        .map(|f| (*f, f.path_for(stem)))
        .find(|(_, p)| p.exists())
}
