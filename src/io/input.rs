use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::InputError;
use crate::directory::SpeakerDirectory;
use crate::models::PageText;

/// Page separator emitted by common PDF text extractors
pub const FORM_FEED: char = '\u{0C}';

/// Load extracted pages from a JSON page list or form-feed separated text
pub fn load_pages(path: &Path) -> Result<Vec<PageText>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;

    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        || content.trim_start().starts_with('[');
    let pages = if is_json {
        parse_pages_json(&content).with_context(|| format!("Failed to parse pages in {:?}", path))?
    } else {
        parse_pages_text(&content)
    };

    debug!("Loaded {} page(s) from {:?}", pages.len(), path);
    Ok(pages)
}

/// Parse a JSON array of `{ "page": N, "text": "..." }` objects
pub fn parse_pages_json(json: &str) -> Result<Vec<PageText>> {
    let pages: Vec<PageText> = serde_json::from_str(json).context("Failed to parse page JSON")?;
    validate_pages(&pages)?;
    Ok(pages)
}

/// Split plain text on form feeds into pages numbered from 1
///
/// A trailing empty page left by a final form feed is dropped.
pub fn parse_pages_text(text: &str) -> Vec<PageText> {
    let mut parts: Vec<&str> = text.split(FORM_FEED).collect();
    if parts.len() > 1 && parts.last().is_some_and(|p| p.trim().is_empty()) {
        parts.pop();
    }

    parts
        .into_iter()
        .zip(1..)
        .map(|(text, page)| PageText::new(page, text))
        .collect()
}

pub fn validate_pages(pages: &[PageText]) -> Result<(), InputError> {
    match pages.iter().position(|p| p.page == 0) {
        Some(index) => Err(InputError::InvalidPage { index }),
        None => Ok(()),
    }
}

/// Load a speaker directory, starting empty when the file does not exist yet
pub fn load_directory(path: &Path) -> Result<SpeakerDirectory> {
    if !path.exists() {
        info!("No speaker directory at {:?}; starting empty", path);
        return Ok(SpeakerDirectory::default());
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    let directory: SpeakerDirectory = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse speaker directory {:?}", path))?;
    info!(
        "Loaded {} speaker(s) and {} alias(es) from {:?}",
        directory.len(),
        directory.aliases().len(),
        path
    );
    Ok(directory)
}

/// Page files (`.json` or `.txt`) in a directory, sorted by file name
pub fn list_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read directory: {:?}", dir))? {
        let path = entry?.path();
        let is_document = path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "json" | "txt"));
        if is_document {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}
