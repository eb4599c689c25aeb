use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};
use dialoguer::Input;

use crate::catalog;
use crate::config::{self, Config};
use crate::core::artwork::ArtworkJob;
use crate::core::download::{sample_is_usable, HttpDownloader};
use crate::core::manifest;
use crate::core::previews::PreviewJob;
use crate::sources::deezer::DeezerClient;
use crate::sources::itunes::ItunesClient;
use crate::sources::musicbrainz::MusicBrainzClient;
use crate::sources::{http_client, ArtworkSource, PreviewSource};

#[derive(Parser)]
#[command(
    name = "mediaseed",
    about = "Seeds album artwork and preview clips for the demo music catalog"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: ~/.config/mediaseed/config.toml)
    #[arg(long = "config", global = true, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download album covers (iTunes, then MusicBrainz/Cover Art Archive)
    Artwork {
        /// Catalog TOML file (default: bundled catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Artwork output directory
        #[arg(long)]
        output: Option<PathBuf>,
        /// Delay between albums in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Download track previews (Deezer, then iTunes, then the sample clip)
    Previews {
        /// Catalog TOML file (default: bundled catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Audio output directory
        #[arg(long)]
        output: Option<PathBuf>,
        /// Sample mp3 copied when no preview is found
        #[arg(long)]
        sample: Option<PathBuf>,
        /// Delay between tracks in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Show the catalog
    Catalog {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Write a JSON manifest of seeded media for the app's database seeder
    Manifest {
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Edit output directories, country and timeouts
    Config,
}

pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_file.unwrap_or_else(config::default_config_path);
    let cfg = config::load_config(&config_path);

    match cli.command {
        Some(Commands::Artwork {
            catalog,
            output,
            delay_ms,
        }) => cmd_artwork(&cfg, catalog.as_deref(), output, delay_ms),
        Some(Commands::Previews {
            catalog,
            output,
            sample,
            delay_ms,
        }) => cmd_previews(&cfg, catalog.as_deref(), output, sample, delay_ms),
        Some(Commands::Catalog { catalog }) => cmd_catalog(catalog.as_deref()),
        Some(Commands::Manifest { catalog, out }) => {
            cmd_manifest(&cfg, catalog.as_deref(), out.as_deref())
        }
        Some(Commands::Config) => cmd_config(cfg, &config_path),
        None => {
            println!("Usage: mediaseed <artwork|previews|catalog|manifest|config>");
            println!("Run mediaseed --help for details.");
            Ok(())
        }
    }
}

fn cmd_artwork(
    cfg: &Config,
    catalog_path: Option<&Path>,
    output: Option<PathBuf>,
    delay_ms: Option<u64>,
) -> Result<()> {
    let albums = catalog::load(catalog_path)?;
    let client = http_client(&cfg.http)?;
    let itunes = ItunesClient::new(client.clone(), &cfg.endpoints, &cfg.itunes);
    let musicbrainz = MusicBrainzClient::new(client.clone(), &cfg.endpoints);
    let downloader = HttpDownloader::new(client);

    let sources: Vec<&dyn ArtworkSource> = vec![&itunes, &musicbrainz];
    let job = ArtworkJob::new(
        sources,
        &downloader,
        output.unwrap_or_else(|| cfg.artwork.output_dir.clone()),
        Duration::from_millis(delay_ms.unwrap_or(cfg.artwork.delay_ms)),
    );

    let report = job.run(&albums);
    report.print("Artwork summary", job.output_dir(), false);
    Ok(())
}

fn cmd_previews(
    cfg: &Config,
    catalog_path: Option<&Path>,
    output: Option<PathBuf>,
    sample: Option<PathBuf>,
    delay_ms: Option<u64>,
) -> Result<()> {
    let albums = catalog::load(catalog_path)?;
    let output_dir = output.unwrap_or_else(|| cfg.previews.output_dir.clone());
    println!("[i] Audio root: {}", output_dir.display());

    let sample = sample.unwrap_or_else(|| cfg.previews.sample.clone());
    let sample = if sample_is_usable(&sample) {
        Some(sample)
    } else {
        println!(
            "[!] {} not found or empty: tracks without a preview will fail.",
            sample.display()
        );
        None
    };

    let client = http_client(&cfg.http)?;
    let deezer = DeezerClient::new(client.clone(), &cfg.endpoints);
    let itunes = ItunesClient::new(client.clone(), &cfg.endpoints, &cfg.itunes);
    let downloader = HttpDownloader::new(client);

    let sources: Vec<&dyn PreviewSource> = vec![&deezer, &itunes];
    let job = PreviewJob::new(
        sources,
        &downloader,
        output_dir,
        Duration::from_millis(delay_ms.unwrap_or(cfg.previews.delay_ms)),
    )
    .with_sample(sample);

    let report = job.run(&albums);
    report.print("Preview summary", job.output_dir(), true);
    println!("Previews are for demo and development use only.");
    Ok(())
}

fn cmd_catalog(catalog_path: Option<&Path>) -> Result<()> {
    let albums = catalog::load(catalog_path)?;

    let mut table = Table::new();
    table.set_header(vec!["Artist", "Album", "Genre", "Artwork", "Tracks"]);
    for album in &albums {
        table.add_row(vec![
            Cell::new(&album.artist),
            Cell::new(&album.album),
            Cell::new(&album.genre),
            Cell::new(&album.artwork),
            Cell::new(album.tracks.len()),
        ]);
    }

    println!("{table}");
    println!(
        "\n{} albums, {} tracks",
        albums.len(),
        albums.iter().map(|a| a.tracks.len()).sum::<usize>()
    );
    Ok(())
}

fn cmd_manifest(cfg: &Config, catalog_path: Option<&Path>, out: Option<&Path>) -> Result<()> {
    let albums = catalog::load(catalog_path)?;
    let entries = manifest::build(
        &albums,
        &cfg.previews.output_dir,
        &cfg.artwork.output_dir,
        &cfg.manifest,
    );
    let json = serde_json::to_string_pretty(&entries)?;

    match out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Cannot write manifest {}", path.display()))?;
            let missing = entries.iter().filter(|e| !e.audio_present).count();
            println!(
                "Manifest with {} tracks written to {} ({} without audio)",
                entries.len(),
                path.display(),
                missing
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_config(mut cfg: Config, path: &Path) -> Result<()> {
    println!("mediaseed configuration ({})\n", path.display());

    let artwork_dir: String = Input::new()
        .with_prompt("Artwork output directory")
        .with_initial_text(cfg.artwork.output_dir.display().to_string())
        .interact_text()?;

    let audio_dir: String = Input::new()
        .with_prompt("Audio output directory")
        .with_initial_text(cfg.previews.output_dir.display().to_string())
        .interact_text()?;

    let sample: String = Input::new()
        .with_prompt("Sample mp3 (fallback clip)")
        .with_initial_text(cfg.previews.sample.display().to_string())
        .interact_text()?;

    let country: String = Input::new()
        .with_prompt("iTunes country code")
        .with_initial_text(cfg.itunes.country.clone())
        .interact_text()?;

    let timeout_secs: u64 = Input::new()
        .with_prompt("HTTP timeout (seconds)")
        .default(cfg.http.timeout_secs)
        .interact_text()?;

    cfg.artwork.output_dir = PathBuf::from(artwork_dir);
    cfg.previews.output_dir = PathBuf::from(audio_dir);
    cfg.previews.sample = PathBuf::from(sample);
    cfg.itunes.country = country.trim().to_uppercase();
    cfg.http.timeout_secs = timeout_secs;

    config::save_config(&cfg, path)?;
    println!("\nConfiguration saved.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_previews_args() {
        let cli = Cli::parse_from([
            "mediaseed",
            "--config",
            "/tmp/cfg.toml",
            "previews",
            "--output",
            "out/audio",
            "--delay-ms",
            "0",
        ]);
        assert_eq!(cli.config_file, Some(PathBuf::from("/tmp/cfg.toml")));
        match cli.command {
            Some(Commands::Previews {
                output,
                delay_ms,
                sample,
                ..
            }) => {
                assert_eq!(output, Some(PathBuf::from("out/audio")));
                assert_eq!(delay_ms, Some(0));
                assert!(sample.is_none());
            }
            _ => panic!("expected previews command"),
        }
    }

    #[test]
    fn test_manifest_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::default();
        cfg.previews.output_dir = dir.path().join("audio");
        cfg.artwork.output_dir = dir.path().join("art");
        let out = dir.path().join("manifest.json");

        cmd_manifest(&cfg, None, Some(&out)).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 100);
        assert_eq!(
            json[0]["audio_url"],
            "/media/audio/michael-jackson/thriller/wanna-be-startin-somethin.mp3"
        );
    }
}
