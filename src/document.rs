//! the page side of the pipeline: style blocks and the head they are appended to
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::RwLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{traits::WideSerialize, utils::fmt_err, STYLE_TITLE, STYLE_TYPE};

/// default StyleBlock type for use in json output
fn serialized_type() -> String {
    String::from("style")
}

/// A single `<style>` element carrying the fragments one extraction produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleBlock {
    #[serde(rename = "type", default = "serialized_type")]
    /// Name of this type of struct, used for serialization, i.e. `{"type":"style"}`
    kind: String,

    /// value of the element's `type` attribute
    pub content_type: String,

    /// value of the element's `title` attribute
    pub title: String,

    /// subreddit whose stylesheet the fragments came from
    pub source: String,

    /// the element's text content: matched fragments joined by newlines
    pub text: String,
}

impl StyleBlock {
    /// build a block from fragments matched in the stylesheet of `source`
    ///
    /// returns `None` when there is nothing to inject
    pub fn from_fragments<S: AsRef<str>>(source: &str, fragments: &[S]) -> Option<Self> {
        if fragments.is_empty() {
            return None;
        }

        let text = fragments
            .iter()
            .map(|fragment| fragment.as_ref())
            .collect::<Vec<_>>()
            .join("\n");

        Some(Self {
            kind: serialized_type(),
            content_type: STYLE_TYPE.to_string(),
            title: STYLE_TITLE.to_string(),
            source: source.to_string(),
            text,
        })
    }
}

impl Display for StyleBlock {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<style type=\"{}\" title=\"{}\">{}</style>",
            self.content_type, self.title, self.text
        )
    }
}

impl WideSerialize for StyleBlock {
    /// the html representation of the element, followed by a newline
    fn as_str(&self) -> String {
        format!("{self}\n")
    }

    /// Create an NDJSON representation of the StyleBlock
    ///
    /// (expanded for clarity)
    /// ex:
    /// {
    ///   "type": "style",
    ///   "content_type": "text/css",
    ///   "title": "applied_subreddit_stylesheet",
    ///   "source": "fffffffuuuuuuuuuuuu",
    ///   "text": "a[href=\"/rage1\"]{background:url(x.png)}"
    /// }\n
    fn as_json(&self) -> Result<String> {
        let mut json = serde_json::to_string(&self).with_context(|| {
            fmt_err(&format!(
                "Could not convert style block from {} to JSON",
                self.source
            ))
        })?;
        json.push('\n');
        Ok(json)
    }
}

/// Anything style blocks can be appended to
///
/// appends are the only mutation; implementors must accept them from any task
pub trait StyleSink: Debug + Send + Sync {
    /// append `block` as the last child of the head
    fn append_style(&self, block: StyleBlock);
}

/// In-memory stand-in for a page's `<head>` element
#[derive(Debug, Default)]
pub struct Head {
    /// appended blocks, in append order
    blocks: RwLock<Vec<StyleBlock>>,
}

impl Head {
    /// create an empty head
    pub fn new() -> Self {
        Self::default()
    }

    /// snapshot of every block appended so far
    pub fn blocks(&self) -> Vec<StyleBlock> {
        if let Ok(guard) = self.blocks.read() {
            return guard.clone();
        }
        Vec::new()
    }

    /// number of blocks appended so far
    pub fn len(&self) -> usize {
        self.blocks.read().map(|guard| guard.len()).unwrap_or_default()
    }

    /// whether nothing has been appended yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// render the head and all of its style blocks as html
    pub fn to_html(&self) -> String {
        let mut html = String::from("<head>\n");

        for block in self.blocks() {
            html.push_str(&block.as_str());
        }

        html.push_str("</head>\n");
        html
    }
}

impl StyleSink for Head {
    fn append_style(&self, block: StyleBlock) {
        log::trace!("enter: append_style({:?})", block);

        match self.blocks.write() {
            Ok(mut guard) => guard.push(block),
            Err(e) => log::error!("could not append style block: {}", e),
        }

        log::trace!("exit: append_style");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// no fragments means no block
    fn from_fragments_with_no_fragments_returns_none() {
        let fragments: Vec<String> = Vec::new();
        assert!(StyleBlock::from_fragments("pics", &fragments).is_none());
    }

    #[test]
    /// fragments are joined by newlines and the fixed attributes are set
    fn from_fragments_joins_with_newline() {
        let block = StyleBlock::from_fragments("pics", &["a{}", "b{}"]).unwrap();

        assert_eq!(block.text, "a{}\nb{}");
        assert_eq!(block.title, "applied_subreddit_stylesheet");
        assert_eq!(block.content_type, "text/css");
        assert_eq!(block.source, "pics");
    }

    #[test]
    /// display renders the style element
    fn style_block_display_renders_element() {
        let block = StyleBlock::from_fragments("pics", &["a{}"]).unwrap();

        assert_eq!(
            block.to_string(),
            r#"<style type="text/css" title="applied_subreddit_stylesheet">a{}</style>"#
        );
        assert!(block.as_str().ends_with('\n'));
    }

    #[test]
    /// json output round trips through serde and ends with a newline
    fn style_block_as_json() {
        let block = StyleBlock::from_fragments("pics", &["a{}"]).unwrap();
        let json = block.as_json().unwrap();

        assert!(json.ends_with('\n'));
        assert!(json.contains(r#""type":"style""#));

        let parsed: StyleBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, block);
    }

    #[test]
    /// appends are kept in order and rendered inside a head element
    fn head_keeps_append_order() {
        let head = Head::new();
        assert!(head.is_empty());

        head.append_style(StyleBlock::from_fragments("one", &["a{}"]).unwrap());
        head.append_style(StyleBlock::from_fragments("two", &["b{}"]).unwrap());

        let blocks = head.blocks();
        assert_eq!(head.len(), 2);
        assert_eq!(blocks[0].source, "one");
        assert_eq!(blocks[1].source, "two");

        let html = head.to_html();
        assert!(html.starts_with("<head>\n"));
        assert!(html.ends_with("</head>\n"));
        assert!(html.find("a{}").unwrap() < html.find("b{}").unwrap());
    }
}
