use std::path::Path;

use comfy_table::{Cell, Table};

/// Aggregate outcome of one seeding run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    downloads: Vec<(&'static str, usize)>,
    pub sample_copies: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SeedReport {
    /// Creates an empty report listing `sources` in priority order.
    pub fn with_sources(sources: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            downloads: sources.into_iter().map(|s| (s, 0)).collect(),
            ..Default::default()
        }
    }

    pub fn record_download(&mut self, source: &'static str) {
        match self.downloads.iter_mut().find(|(name, _)| *name == source) {
            Some((_, count)) => *count += 1,
            None => self.downloads.push((source, 1)),
        }
    }

    #[cfg(test)]
    pub fn downloads_from(&self, source: &str) -> usize {
        self.downloads
            .iter()
            .find(|(name, _)| *name == source)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn downloaded(&self) -> usize {
        self.downloads.iter().map(|(_, count)| count).sum()
    }

    /// Files written in this run, downloads and sample copies alike.
    pub fn created(&self) -> usize {
        self.downloaded() + self.sample_copies
    }

    pub fn to_table(&self, with_sample: bool) -> Table {
        let mut table = Table::new();
        table.set_header(vec!["Result", "Count"]);
        for (name, count) in &self.downloads {
            table.add_row(vec![Cell::new(format!("downloaded from {name}")), Cell::new(count)]);
        }
        if with_sample {
            table.add_row(vec![Cell::new("sample copies"), Cell::new(self.sample_copies)]);
        }
        table.add_row(vec![Cell::new("skipped (already present)"), Cell::new(self.skipped)]);
        table.add_row(vec![Cell::new("failed"), Cell::new(self.failed)]);
        table
    }

    pub fn print(&self, title: &str, root: &Path, with_sample: bool) {
        println!("\n=== {title} ===");
        println!("{}", self.to_table(with_sample));
        println!("New files: {}", self.created());
        let root = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        println!("Output: {}", root.display());
    }
}
