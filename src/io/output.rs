use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::directory::SpeakerDirectory;
use crate::stages::{ResolvedDocument, ResolvedSpeech};

/// Characters per line in the human-readable rendering
pub const DEFAULT_WRAP_WIDTH: usize = 40;

/// Write any serialisable value as pretty-printed JSON
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, value).context("Failed to write JSON")?;
    Ok(())
}

pub fn save_directory(directory: &SpeakerDirectory, path: &Path) -> Result<()> {
    write_json(directory, path)
}

/// Human-readable minutes: one header per speech followed by wrapped text
pub struct HumanMinutes<'a> {
    document: &'a ResolvedDocument,
    width: usize,
}

impl<'a> HumanMinutes<'a> {
    pub fn new(document: &'a ResolvedDocument) -> Self {
        Self {
            document,
            width: DEFAULT_WRAP_WIDTH,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    pub fn format(&self) -> String {
        let mut output = String::new();

        if let Some(session) = &self.document.session {
            let title = session.meeting_title.as_deref().unwrap_or(&session.session_name);
            output.push_str(&format!("{}\n\n", title));
        }

        for speech in &self.document.speeches {
            output.push_str(&format_header(speech));
            output.push('\n');
            output.push_str(&wrap_text(&speech.speech_text, self.width));
            output.push_str("\n\n");
        }

        output
    }

    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// `[p.3] 大下正幸 議長 (exact_family/1.00)`
fn format_header(speech: &ResolvedSpeech) -> String {
    let pages = if speech.page_start == speech.page_end {
        format!("p.{}", speech.page_start)
    } else {
        format!("p.{}-{}", speech.page_start, speech.page_end)
    };
    let name = speech.full_name.as_deref().unwrap_or(&speech.speaker_name);
    let mut header = format!("[{}] {}", pages, name);
    if !speech.speaker_role.is_empty() {
        header.push(' ');
        header.push_str(&speech.speaker_role);
    }
    header.push_str(&format!(
        " ({}/{:.2})",
        speech.match_strategy.as_str(),
        speech.confidence
    ));
    header
}

/// Wrap each line at `width` characters; Japanese text has no spaces to break on
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();

    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            result.push('\n');
        }
        let chars: Vec<char> = line.chars().collect();
        for (j, chunk) in chars.chunks(width.max(1)).enumerate() {
            if j > 0 {
                result.push('\n');
            }
            result.extend(chunk);
        }
    }

    result
}
