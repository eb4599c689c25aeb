use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::download::{copy_sample, Transfer};
use crate::core::pause;
use crate::core::report::SeedReport;
use crate::models::{existing_preview, AlbumRecord, AudioFormat};
use crate::sources::PreviewSource;

/// Downloads a preview clip per track. Sources are tried in priority order,
/// then the sample clip is copied as an mp3 when one is configured.
pub struct PreviewJob<'a> {
    sources: Vec<&'a dyn PreviewSource>,
    transfer: &'a dyn Transfer,
    output_dir: PathBuf,
    sample: Option<PathBuf>,
    delay: Duration,
}

impl<'a> PreviewJob<'a> {
    pub fn new(
        sources: Vec<&'a dyn PreviewSource>,
        transfer: &'a dyn Transfer,
        output_dir: PathBuf,
        delay: Duration,
    ) -> Self {
        Self {
            sources,
            transfer,
            output_dir,
            sample: None,
            delay,
        }
    }

    /// Local clip copied when no source has a preview. Must be non-empty.
    pub fn with_sample(mut self, sample: Option<PathBuf>) -> Self {
        self.sample = sample;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn run(&self, albums: &[AlbumRecord]) -> SeedReport {
        let mut report = SeedReport::with_sources(self.sources.iter().map(|s| s.name()));

        for album in albums {
            for track in &album.tracks {
                let stem = album.preview_stem(&self.output_dir, track);
                if let Some((_, existing)) = existing_preview(&stem) {
                    log::debug!("Skipping {}, already present", existing.display());
                    report.skipped += 1;
                    continue;
                }

                if let Some((source, format)) = self.fetch(album, track, &stem) {
                    println!("[+] {}", self.relative(&format.path_for(&stem)));
                    report.record_download(source);
                } else if let Some(sample) = &self.sample {
                    let dest = AudioFormat::Mp3.path_for(&stem);
                    match copy_sample(sample, &dest) {
                        Ok(_) => {
                            println!("[~] sample fallback -> {}", self.relative(&dest));
                            report.sample_copies += 1;
                        }
                        Err(e) => {
                            println!("[x] sample fallback failed: {} - {}", album.artist, track);
                            log::warn!("{e:#}");
                            report.failed += 1;
                        }
                    }
                } else {
                    println!("[!] no preview: {} - {}", album.artist, track);
                    report.failed += 1;
                }

                pause(self.delay);
            }
        }

        report
    }

    fn fetch(&self, album: &AlbumRecord, track: &str, stem: &Path) -> Option<(&'static str, AudioFormat)> {
        for source in &self.sources {
            let url = match source.find_preview(&album.artist, track) {
                Ok(url) => url,
                Err(e) => {
                    log::info!("{}: no preview for {} - {}: {}", source.name(), album.artist, track, e);
                    continue;
                }
            };

            let format = source.format();
            match self.transfer.download(&url, &format.path_for(stem)) {
                Ok(_) => return Some((source.name(), format)),
                Err(e) => {
                    println!("[x] download failed: {url}");
                    log::warn!("{e:#}");
                }
            }
        }
        None
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.output_dir)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
