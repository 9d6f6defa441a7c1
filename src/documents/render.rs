// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::documents::names::extension;
use pulldown_cmark::{Options, Parser, html};

/// How a document's content is served, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Markdown,
    PlainText,
}

impl DocumentKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match extension(name)? {
            ".md" => Some(DocumentKind::Markdown),
            ".txt" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }
}

pub fn render_markdown(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(text, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_extension() {
        assert_eq!(DocumentKind::from_name("a.md"), Some(DocumentKind::Markdown));
        assert_eq!(
            DocumentKind::from_name("a.txt"),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(DocumentKind::from_name("a.png"), None);
        assert_eq!(DocumentKind::from_name("noext"), None);
    }

    #[test]
    fn renders_basic_markdown() {
        let html = render_markdown("# Title\n\nSome **bold** text.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn renders_extended_syntax() {
        let html = render_markdown("~~old~~\n\n| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<del>old</del>"));
        assert!(html.contains("<table>"));
    }
}
