use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use super::{parse_document, resolve_document, PipelineConfig};
use crate::directory::SpeakerDirectory;
use crate::heuristics::Lexicon;
use crate::io::{list_documents, load_directory, load_pages, save_directory, write_json};

/// Counts from one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Documents resolved and written
    pub processed: usize,
    /// Documents without any speech
    pub skipped: usize,
    /// Documents that could not be loaded, parsed or written
    pub failed: usize,
    /// Matched speeches across processed documents
    pub matched: usize,
    /// Speeches across processed documents
    pub total: usize,
}

impl BatchSummary {
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }
}

/// Parse every document in `input_dir` and resolve it against one directory
///
/// Documents are parsed concurrently, at most `pipeline.jobs` at a time, then
/// resolved one by one in file-name order so the shared directory evolves
/// deterministically. The file stem stands in for the source URL slug. A
/// document that fails is counted and skipped; the directory is saved to
/// `directory_path` at the end either way.
pub async fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    directory_path: Option<&Path>,
    lexicon: Arc<Lexicon>,
    pipeline: &PipelineConfig,
) -> Result<BatchSummary> {
    let mut directory = match directory_path {
        Some(path) => load_directory(path)?,
        None => SpeakerDirectory::default(),
    };
    let paths = list_documents(input_dir)?;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {:?}", output_dir))?;

    info!("Parsing {} document(s) with {} worker(s)", paths.len(), pipeline.jobs);
    let semaphore = Arc::new(Semaphore::new(pipeline.jobs.max(1)));
    let mut handles = Vec::with_capacity(paths.len());
    for path in paths {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let lexicon = Arc::clone(&lexicon);
        let task_path = path.clone();
        let task = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let pages = load_pages(&task_path)?;
            anyhow::Ok(parse_document(&pages, &lexicon))
        });
        handles.push((path, task));
    }

    let mut summary = BatchSummary::default();
    for (path, task) in handles {
        let parsed = match task.await {
            Ok(Ok(parsed)) => parsed,
            Ok(Err(err)) => {
                warn!("FAIL: {:?} - {:#}", path, err);
                summary.failed += 1;
                continue;
            }
            Err(err) => {
                warn!("FAIL: {:?} - parse task aborted: {}", path, err);
                summary.failed += 1;
                continue;
            }
        };
        if parsed.speeches.is_empty() {
            warn!("No speeches found in {:?}, skipping", path);
            summary.skipped += 1;
            continue;
        }

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document")
            .to_string();
        let document = resolve_document(parsed, &mut directory, Some(&stem), pipeline);
        if let Err(err) = write_json(&document, &output_dir.join(format!("{stem}.json"))) {
            warn!("FAIL: {:?} - {:#}", path, err);
            summary.failed += 1;
            continue;
        }

        summary.matched += document.stats.matched;
        summary.total += document.stats.total();
        summary.processed += 1;
    }

    if let Some(path) = directory_path {
        save_directory(&directory, path)?;
        info!("Speaker directory saved to {:?}", path);
    }

    info!(
        "Processed: {}, skipped: {}, failed: {}",
        summary.processed, summary.skipped, summary.failed
    );
    if summary.total > 0 {
        info!(
            "Match rate: {}/{} ({:.1}%)",
            summary.matched,
            summary.total,
            summary.match_rate() * 100.0
        );
    }
    info!(
        "Speakers in directory: {}, aliases: {}",
        directory.len(),
        directory.aliases().len()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary_rate() {
        assert_eq!(BatchSummary::default().match_rate(), 0.0);
        let summary = BatchSummary {
            matched: 1,
            total: 4,
            ..Default::default()
        };
        assert_eq!(summary.match_rate(), 0.25);
    }
}
