pub mod check;
pub mod replay;

pub use check::{check, CheckArgs};
pub use replay::{replay, ReplayArgs};

use anyhow::{Context, Result};
use scriptcard_editor::EditorConfig;
use scriptcard_page::Page;
use std::fs;
use std::path::{Path, PathBuf};

/// Read and build a page description
pub fn load_page(path: &Path) -> Result<Page> {
    let markup = fs::read_to_string(path)
        .with_context(|| format!("Failed to read page {}", path.display()))?;
    Page::from_json(&markup).with_context(|| format!("Invalid page {}", path.display()))
}

/// Explicit `--config` file, else the default config in `cwd`
pub fn load_config(config: Option<&PathBuf>, cwd: &Path) -> Result<EditorConfig> {
    match config {
        Some(path) => EditorConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => EditorConfig::load(cwd).context("Failed to load config"),
    }
}
