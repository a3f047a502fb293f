//! CLAUDE.md section lookup.
//!
//! Uses comrak for AST-based section extraction. A section runs from a
//! level-2 heading to the next heading of level 1 or 2, so `###`
//! subsections stay inside their parent. HTML (including comments) never
//! counts as section text.

use std::collections::HashMap;
use std::path::Path;

use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, Options};

/// File name looked up at the repository root.
pub const CLAUDE_MD: &str = "CLAUDE.md";

/// Parsed CLAUDE.md, keyed by level-2 heading text.
#[derive(Debug, Clone, Default)]
pub struct ClaudeMd {
    sections: HashMap<String, String>,
}

impl ClaudeMd {
    /// Load `CLAUDE.md` from a directory. `None` if it is missing or unreadable.
    pub async fn load(dir: &Path) -> Option<Self> {
        let path = dir.join(CLAUDE_MD);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Some(Self::from_content(&content)),
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    tracing::debug!(path = %path.display(), "No CLAUDE.md found");
                } else {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to read CLAUDE.md");
                }
                None
            }
        }
    }

    #[must_use]
    pub fn from_content(content: &str) -> Self {
        Self {
            sections: Self::parse_sections(content),
        }
    }

    /// Text of a section, trimmed. Empty string if the section has no text.
    #[must_use]
    pub fn section(&self, title: &str) -> Option<&str> {
        self.sections.get(title).map(String::as_str)
    }

    /// Whether the section exists and holds any text.
    #[must_use]
    pub fn section_has_content(&self, title: &str) -> bool {
        self.section(title).is_some_and(|s| !s.is_empty())
    }

    fn parse_sections(content: &str) -> HashMap<String, String> {
        let arena = Arena::new();
        let options = Options::default();
        let root = parse_document(&arena, content, &options);

        let mut sections = HashMap::new();
        let mut current: Option<(String, String)> = None;

        for node in root.children() {
            let level = match &node.data.borrow().value {
                NodeValue::Heading(h) => Some(h.level),
                _ => None,
            };

            match level {
                Some(level) if level <= 2 => {
                    if let Some((title, body)) = current.take() {
                        sections.entry(title).or_insert_with(|| body.trim().to_string());
                    }
                    if level == 2 {
                        current = Some((Self::node_text(node).trim().to_string(), String::new()));
                    }
                }
                _ => {
                    if let Some((_, body)) = current.as_mut() {
                        let text = Self::node_text(node);
                        if !text.trim().is_empty() {
                            if !body.is_empty() {
                                body.push_str("\n\n");
                            }
                            body.push_str(&text);
                        }
                    }
                }
            }
        }

        if let Some((title, body)) = current {
            sections.entry(title).or_insert_with(|| body.trim().to_string());
        }

        sections
    }

    fn node_text<'a>(node: &'a AstNode<'a>) -> String {
        let mut text = String::new();
        Self::collect_text(node, &mut text);
        text
    }

    fn collect_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
        match &node.data.borrow().value {
            NodeValue::HtmlBlock(_) | NodeValue::HtmlInline(_) => {}
            NodeValue::Text(t) => out.push_str(t),
            NodeValue::Code(c) => out.push_str(&c.literal),
            NodeValue::CodeBlock(cb) => out.push_str(&cb.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
            NodeValue::Item(_) => {
                out.push_str("- ");
                for child in node.children() {
                    Self::collect_text(child, out);
                }
                out.push('\n');
            }
            _ => {
                for child in node.children() {
                    Self::collect_text(child, out);
                }
            }
        }
    }
}
