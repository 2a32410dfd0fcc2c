//! Markdown Parser
//!
//! Turns article text into an outline: title plus flat sections.
//! Tokenization and outline construction are kept separate.

pub mod ast;
pub mod lexer;

pub use ast::{Block, BlockKind, Outline, Section};
pub use lexer::{tokenize, Token, TokenKind};

/// Parse a Markdown document into its outline
///
/// This is the main entry point for parsing. It tokenizes the text into
/// blocks and folds them into sections.
pub fn parse_markdown(content: &str) -> Outline {
    let tokens = lexer::tokenize(content);
    ast::tokens_to_outline(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_article() {
        let outline = parse_markdown(
            "# Sunday Classes\n\nWhy Sundays work.\n\n## Where to Go\n\n- Studio A\n- Studio B\n\n## What to Bring\n\nWater.\n",
        );

        assert_eq!(outline.title.as_deref(), Some("Sunday Classes"));
        let headings: Vec<&str> = outline.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec!["", "Where to Go", "What to Bring"]);
        assert_eq!(outline.sections[1].blocks.len(), 2);
        assert_eq!(outline.sections[1].blocks[1].kind, BlockKind::ListItem);
    }

    #[test]
    fn test_parse_without_title() {
        let outline = parse_markdown("## Only a subheading\n\ntext\n");
        assert!(outline.title.is_none());
        assert_eq!(outline.sections.len(), 1);
    }

    #[test]
    fn test_parse_empty() {
        let outline = parse_markdown("");
        assert!(outline.title.is_none());
        assert!(outline.sections.is_empty());
    }
}
