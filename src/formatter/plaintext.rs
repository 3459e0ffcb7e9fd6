use super::{render_sections, FileRecord, Formatter};
use crate::errors::AggregationError;
use crate::settings::AggregationSettings;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

static CODE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").expect("Invalid regex"));
// Only at line start, so a literal `#` mid-sentence survives.
static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]+").expect("Invalid regex"));
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("Invalid regex"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("Invalid regex"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").expect("Invalid regex"));
static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("Invalid regex"));

pub const CODE_BLOCK_MARKER: &str = "[CODE BLOCK]";

/// Removes markdown markup, keeping the readable text.
///
/// Fenced code blocks go first so the inline passes never see their contents.
/// Heading markers are only removed at the start of a line.
pub fn strip_markdown(content: &str) -> String {
    let text = CODE_BLOCK.replace_all(content, CODE_BLOCK_MARKER);
    let text = HEADING.replace_all(&text, "");
    let text = BOLD.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = INLINE_CODE.replace_all(&text, "$1");
    let text = LINK.replace_all(&text, "$1");
    text.into_owned()
}

pub struct PlainTextFormatter {}

impl PlainTextFormatter {
    pub fn new() -> Self {
        PlainTextFormatter {}
    }
}

impl Default for PlainTextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for PlainTextFormatter {
    fn format(
        &self,
        records: &[FileRecord],
        folder_label: Option<&str>,
        settings: &AggregationSettings,
        _timestamp: DateTime<Utc>,
    ) -> Result<String, AggregationError> {
        let banner = folder_label
            .filter(|_| settings.include_folder_structure)
            .map(|label| format!("FOLDER: {}", label.to_uppercase()));

        let output = render_sections(
            records,
            banner,
            &settings.custom_separator,
            |record| {
                settings
                    .include_file_names
                    .then(|| format!("FILE: {}", record.path))
            },
            |record| strip_markdown(&record.content),
        );
        trace!("Plain text output length: {}", output.len());
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_headings_and_emphasis() {
        let stripped = strip_markdown("# Title\n**bold** and *em* and `code`");
        assert_eq!(stripped, "Title\nbold and em and code");
    }

    #[test]
    fn replaces_fenced_blocks_wholesale() {
        let stripped = strip_markdown("before\n```rust\nlet x = *y;\n```\nafter");
        assert_eq!(stripped, "before\n[CODE BLOCK]\nafter");
    }

    #[test]
    fn rewrites_links_to_their_text() {
        let stripped = strip_markdown("see [the docs](https://example.com/guide) now");
        assert_eq!(stripped, "see the docs now");
        assert_eq!(strip_markdown("[a](b) and [c](d)"), "a and c");
    }

    #[test]
    fn keeps_hashes_that_are_not_headings() {
        assert_eq!(strip_markdown("issue #42 is open"), "issue #42 is open");
        assert_eq!(strip_markdown("###### Deep"), "Deep");
        assert_eq!(strip_markdown("Intro ## Sub"), "Intro ## Sub");
    }
}
