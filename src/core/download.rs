use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;

const CHUNK_SIZE: usize = 8192;

/// Moves remote media onto the local filesystem.
#[cfg_attr(test, mockall::automock)]
pub trait Transfer {
    /// Downloads `url` to `dest` and returns the number of bytes written.
    fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Streams response bodies to disk through a `.part` file that is renamed
/// onto the destination once the body is complete.
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Transfer for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let mut resp = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("Download of {url} was rejected"))?;

        create_parent(dest)?;
        let part = part_path(dest);
        match write_body(&mut resp, &part) {
            Ok(0) => {
                let _ = fs::remove_file(&part);
                bail!("Empty response body from {url}");
            }
            Ok(written) => {
                if let Err(e) = fs::rename(&part, dest) {
                    let _ = fs::remove_file(&part);
                    return Err(e).with_context(|| format!("Cannot move download to {}", dest.display()));
                }
                log::debug!("{written} bytes from {url} -> {}", dest.display());
                Ok(written)
            }
            Err(e) => {
                let _ = fs::remove_file(&part);
                Err(e.context(format!("Download of {url} was interrupted")))
            }
        }
    }
}

/// True when `sample` exists and is non-empty.
pub fn sample_is_usable(sample: &Path) -> bool {
    fs::metadata(sample).map(|m| m.is_file() && m.len() > 0).unwrap_or(false)
}

/// Copies the bundled sample clip to `dest`, creating parent directories.
pub fn copy_sample(sample: &Path, dest: &Path) -> Result<u64> {
    create_parent(dest)?;
    fs::copy(sample, dest)
        .with_context(|| format!("Cannot copy {} to {}", sample.display(), dest.display()))
}

fn create_parent(dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory {}", parent.display()))?;
    }
    Ok(())
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

fn write_body(reader: &mut impl Read, path: &Path) -> Result<u64> {
    let file = File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
    let written = io::copy(reader, &mut writer)?;
    writer.flush()?;
    Ok(written)
}
