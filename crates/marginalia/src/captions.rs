//! Caption conversion through pandoc.

use std::process::Command;
use std::time::Duration;

use marginalia_ast::{Block, Document, Inline};
use marginalia_figures::command;
use marginalia_filter::{CaptionError, CaptionFormatter};

/// Parses caption markdown by running `pandoc -f markdown -t json`.
pub(crate) struct PandocCaptions {
    pandoc: String,
    timeout: Duration,
}

impl PandocCaptions {
    pub(crate) fn new(pandoc: impl Into<String>, timeout: Duration) -> Self {
        Self {
            pandoc: pandoc.into(),
            timeout,
        }
    }
}

impl CaptionFormatter for PandocCaptions {
    fn to_inlines(&self, markdown: &str) -> Result<Vec<Inline>, CaptionError> {
        let error = |message: String| CaptionError {
            caption: markdown.to_owned(),
            message,
        };

        let output = command::run(
            Command::new(&self.pandoc).args(["-f", "markdown", "-t", "json"]),
            Some(markdown.as_bytes()),
            self.timeout,
        )
        .map_err(|e| error(e.to_string()))?;
        let json = String::from_utf8(output).map_err(|e| error(e.to_string()))?;
        let document = Document::from_json(&json).map_err(|e| error(e.to_string()))?;

        Ok(first_inlines(document.blocks))
    }
}

/// Inline content of the first paragraph, or nothing.
fn first_inlines(blocks: Vec<Block>) -> Vec<Inline> {
    blocks
        .into_iter()
        .find_map(|block| match block {
            Block::Para(content) | Block::Plain(content) => Some(content),
            _ => None,
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_inlines_skips_other_blocks() {
        let blocks = vec![
            Block::HorizontalRule,
            Block::Para(vec![Inline::Emph(vec![Inline::Str("great".to_owned())])]),
            Block::Para(vec![Inline::Str("ignored".to_owned())]),
        ];

        assert_eq!(
            first_inlines(blocks),
            vec![Inline::Emph(vec![Inline::Str("great".to_owned())])]
        );
    }

    #[test]
    fn test_first_inlines_empty() {
        assert!(first_inlines(vec![Block::HorizontalRule]).is_empty());
    }

    #[test]
    fn test_missing_pandoc_is_caption_error() {
        let captions = PandocCaptions::new("marginalia-no-such-pandoc", Duration::from_secs(5));

        let err = captions.to_inlines("My caption").unwrap_err();

        assert_eq!(err.caption, "My caption");
        assert!(err.message.contains("marginalia-no-such-pandoc"));
    }

    #[cfg(unix)]
    #[test]
    fn test_parses_pandoc_output() {
        use std::os::unix::fs::PermissionsExt;

        let bin = tempfile::tempdir().unwrap();
        let path = bin.path().join("pandoc");
        let json = r#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[{"t":"Para","c":[{"t":"Str","c":"My"},{"t":"Space"},{"t":"Emph","c":[{"t":"Str","c":"great"}]}]}]}"#;
        std::fs::write(&path, format!("#!/bin/sh\ncat >/dev/null\necho '{json}'\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        let captions = PandocCaptions::new(path.to_string_lossy(), Duration::from_secs(5));

        let inlines = captions.to_inlines("My *great*").unwrap();

        assert_eq!(
            inlines,
            vec![
                Inline::Str("My".to_owned()),
                Inline::Space,
                Inline::Emph(vec![Inline::Str("great".to_owned())]),
            ]
        );
    }
}
