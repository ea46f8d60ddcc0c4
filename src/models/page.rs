use serde::{Deserialize, Serialize};

/// Extracted text of a single document page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based page number as reported by the extractor
    pub page: u32,
    /// Raw page text, lines separated by `\n`
    pub text: String,
}

impl PageText {
    pub fn new(page: u32, text: impl Into<String>) -> Self {
        Self {
            page,
            text: text.into(),
        }
    }
}
