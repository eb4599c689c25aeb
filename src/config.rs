use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub itunes: ItunesConfig,
    #[serde(default)]
    pub artwork: ArtworkConfig,
    #[serde(default)]
    pub previews: PreviewsConfig,
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default)]
    pub manifest: ManifestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: "mediaseed/0.1 (demo catalog seeder)".to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ItunesConfig {
    pub country: String,
}

impl Default for ItunesConfig {
    fn default() -> Self {
        Self {
            country: "US".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArtworkConfig {
    pub output_dir: PathBuf,
    pub delay_ms: u64,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("public/media/artworks"),
            delay_ms: 400,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreviewsConfig {
    pub output_dir: PathBuf,
    pub sample: PathBuf,
    pub delay_ms: u64,
}

impl Default for PreviewsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("public/media/audio"),
            sample: PathBuf::from("sample.mp3"),
            delay_ms: 500,
        }
    }
}

/// Base URLs of the external services. Overridable for mirrors and tests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Endpoints {
    pub itunes: String,
    pub musicbrainz: String,
    pub cover_art_archive: String,
    pub deezer: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            itunes: "https://itunes.apple.com/search".to_string(),
            musicbrainz: "https://musicbrainz.org/ws/2/release-group".to_string(),
            cover_art_archive: "https://coverartarchive.org/release-group".to_string(),
            deezer: "https://api.deezer.com/search".to_string(),
        }
    }
}

/// URL prefixes the catalog app serves media under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ManifestConfig {
    pub audio_base: String,
    pub artwork_base: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            audio_base: "/media/audio/".to_string(),
            artwork_base: "/media/artworks/".to_string(),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".config")
        .join("mediaseed")
        .join("config.toml")
}

/// Reads the config at `path`. A missing or unreadable file yields defaults.
pub fn load_config(path: &Path) -> Config {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Config::default();
    }
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Ignoring invalid config {}: {}", path.display(), e);
            Config::default()
        }),
        Err(e) => {
            log::warn!("Cannot read config {}: {}", path.display(), e);
            Config::default()
        }
    }
}

pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)
        .with_context(|| format!("Cannot write config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("nope.toml"));
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.http.timeout(), Duration::from_secs(15));
        assert_eq!(cfg.itunes.country, "US");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[itunes]\ncountry = \"AR\"\n\n[artwork]\ndelay_ms = 0\n").unwrap();

        let cfg = load_config(&path);
        assert_eq!(cfg.itunes.country, "AR");
        assert_eq!(cfg.artwork.delay_ms, 0);
        assert_eq!(cfg.artwork.output_dir, PathBuf::from("public/media/artworks"));
        assert_eq!(cfg.endpoints, Endpoints::default());
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert_eq!(load_config(&path), Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        let mut cfg = Config::default();
        cfg.previews.sample = PathBuf::from("/srv/sample.mp3");
        cfg.http.timeout_secs = 5;

        save_config(&cfg, &path).unwrap();
        assert_eq!(load_config(&path), cfg);
    }
}
