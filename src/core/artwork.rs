use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::download::Transfer;
use crate::core::pause;
use crate::core::report::SeedReport;
use crate::models::AlbumRecord;
use crate::sources::ArtworkSource;

/// Downloads one cover per album, trying artwork sources in priority order.
/// There is no local fallback: an album no source can serve counts as failed.
pub struct ArtworkJob<'a> {
    sources: Vec<&'a dyn ArtworkSource>,
    transfer: &'a dyn Transfer,
    output_dir: PathBuf,
    delay: Duration,
}

impl<'a> ArtworkJob<'a> {
    pub fn new(
        sources: Vec<&'a dyn ArtworkSource>,
        transfer: &'a dyn Transfer,
        output_dir: PathBuf,
        delay: Duration,
    ) -> Self {
        Self {
            sources,
            transfer,
            output_dir,
            delay,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn run(&self, albums: &[AlbumRecord]) -> SeedReport {
        let mut report = SeedReport::with_sources(self.sources.iter().map(|s| s.name()));

        for album in albums {
            let dest = album.artwork_path(&self.output_dir);
            if dest.exists() {
                println!("✓ Exists: {} (skipping)", album.artwork);
                report.skipped += 1;
                continue;
            }

            println!("→ Searching: {}", album.summary());
            match self.fetch(album, &dest) {
                Some(source) => {
                    println!("  ✓ Saved: {}", dest.display());
                    report.record_download(source);
                }
                None => {
                    println!("  × No artwork found for {}", album.summary());
                    report.failed += 1;
                }
            }

            pause(self.delay);
        }

        report
    }

    /// Returns the name of the source whose artwork ended up at `dest`.
    fn fetch(&self, album: &AlbumRecord, dest: &Path) -> Option<&'static str> {
        for source in &self.sources {
            let url = match source.find_artwork(&album.artist, &album.album) {
                Ok(url) => url,
                Err(e) => {
                    log::info!("{}: no artwork for {}: {}", source.name(), album.summary(), e);
                    continue;
                }
            };

            println!("  {}: {}", source.name(), url);
            match self.transfer.download(&url, dest) {
                Ok(_) => return Some(source.name()),
                Err(e) => {
                    println!("  × {} download failed, trying next source", source.name());
                    log::warn!("{e:#}");
                }
            }
        }
        None
    }
}
