//! Markdown Lexer
//!
//! Flattens the CommonMark event stream into block-level tokens.
//! Inline markup (emphasis, links, inline code) is reduced to its text.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// Block-level token types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// ATX or setext heading with its level (1-6)
    Heading(u8),
    /// Top-level paragraph
    Paragraph,
    /// A single list item, nested items are separate tokens
    ListItem,
    /// Fenced or indented code block
    CodeBlock,
    /// Paragraph inside a block quote
    BlockQuote,
}

/// A token with its text content and the 1-based line it starts on
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    /// Inside a block quote or list item
    pub nested: bool,
}

impl Token {
    fn open(kind: TokenKind, line: usize) -> Self {
        Self {
            kind,
            text: String::new(),
            line,
            nested: false,
        }
    }
}

/// Tokenize a Markdown document into block tokens
pub fn tokenize(content: &str) -> Vec<Token> {
    let lines = LineIndex::new(content);
    let mut tokens = Vec::new();
    let mut current: Option<Token> = None;
    let mut quote_depth = 0usize;
    let mut list_depth = 0usize;

    for (event, range) in Parser::new(content).into_offset_iter() {
        let line = lines.line_of(range.start);

        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                flush(&mut current, &mut tokens);
                current = Some(Token {
                    nested: quote_depth > 0 || list_depth > 0,
                    ..Token::open(TokenKind::Heading(level as u8), line)
                });
            }
            Event::Start(Tag::Paragraph) => match current.as_mut() {
                // Loose list: paragraphs belong to the enclosing item
                Some(token) if token.kind == TokenKind::ListItem => {
                    if !token.text.is_empty() && !token.text.ends_with('\n') {
                        token.text.push('\n');
                    }
                }
                _ => {
                    flush(&mut current, &mut tokens);
                    let kind = if quote_depth > 0 {
                        TokenKind::BlockQuote
                    } else {
                        TokenKind::Paragraph
                    };
                    current = Some(Token::open(kind, line));
                }
            },
            Event::Start(Tag::List(_)) => {
                flush(&mut current, &mut tokens);
                list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                flush(&mut current, &mut tokens);
                list_depth = list_depth.saturating_sub(1);
            }
            Event::Start(Tag::Item) => {
                flush(&mut current, &mut tokens);
                current = Some(Token::open(TokenKind::ListItem, line));
            }
            Event::Start(Tag::CodeBlock { .. }) => {
                flush(&mut current, &mut tokens);
                current = Some(Token::open(TokenKind::CodeBlock, line));
            }
            Event::Start(Tag::BlockQuote { .. }) => {
                flush(&mut current, &mut tokens);
                quote_depth += 1;
            }
            Event::End(TagEnd::BlockQuote { .. }) => {
                flush(&mut current, &mut tokens);
                quote_depth = quote_depth.saturating_sub(1);
            }
            Event::End(TagEnd::Paragraph) => {
                if current
                    .as_ref()
                    .is_some_and(|token| token.kind != TokenKind::ListItem)
                {
                    flush(&mut current, &mut tokens);
                }
            }
            Event::End(TagEnd::Heading { .. } | TagEnd::Item | TagEnd::CodeBlock) => {
                flush(&mut current, &mut tokens);
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(token) = current.as_mut() {
                    token.text.push_str(&text);
                }
            }
            Event::SoftBreak => {
                if let Some(token) = current.as_mut() {
                    token.text.push(' ');
                }
            }
            Event::HardBreak => {
                if let Some(token) = current.as_mut() {
                    token.text.push('\n');
                }
            }
            // HTML, rules, footnotes and task markers carry no prose
            _ => {}
        }
    }

    flush(&mut current, &mut tokens);
    tokens
}

/// Close the open token, dropping blocks that ended up empty
fn flush(current: &mut Option<Token>, tokens: &mut Vec<Token>) {
    let Some(mut token) = current.take() else {
        return;
    };

    token.text = match token.kind {
        TokenKind::CodeBlock => token.text.trim_end().to_string(),
        _ => token.text.trim().to_string(),
    };

    if token.text.is_empty() && !matches!(token.kind, TokenKind::Heading(_)) {
        return;
    }

    tokens.push(token);
}

/// Byte offset to line number lookup
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(content: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(content.match_indices('\n').map(|(idx, _)| idx + 1));
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_headings_and_paragraphs() {
        let tokens = tokenize("# Title\n\nIntro text.\n\n## Details\n\nMore text.\n");

        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Heading(1),
                TokenKind::Paragraph,
                TokenKind::Heading(2),
                TokenKind::Paragraph,
            ]
        );
        assert_eq!(tokens[0].text, "Title");
        assert_eq!(tokens[3].text, "More text.");
    }

    #[test]
    fn test_inline_markup_is_stripped() {
        let tokens = tokenize("Mix *emphasis*, **strong** and `code` with a [link](https://x.test).");

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "Mix emphasis, strong and code with a link.");
    }

    #[test]
    fn test_soft_breaks_become_spaces() {
        let tokens = tokenize("first line\nsecond line");
        assert_eq!(tokens[0].text, "first line second line");
    }

    #[test]
    fn test_tight_and_nested_list_items() {
        let tokens = tokenize("- one\n- two\n  - nested\n- three\n");

        assert_eq!(tokens.len(), 4);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::ListItem));
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "nested", "three"]);
    }

    #[test]
    fn test_loose_list_item_keeps_paragraphs_together() {
        let tokens = tokenize("- first para\n\n  second para\n- next\n");

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::ListItem);
        assert_eq!(tokens[0].text, "first para\nsecond para");
        assert_eq!(tokens[1].text, "next");
    }

    #[test]
    fn test_code_block_is_not_parsed_as_heading() {
        let tokens = tokenize("```\n# not a heading\n    indented\n```\n");

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::CodeBlock);
        assert_eq!(tokens[0].text, "# not a heading\n    indented");
    }

    #[test]
    fn test_block_quote() {
        let tokens = tokenize("> quoted words\n\nplain\n");

        assert_eq!(kinds(&tokens), vec![TokenKind::BlockQuote, TokenKind::Paragraph]);
        assert_eq!(tokens[0].text, "quoted words");
    }

    #[test]
    fn test_line_numbers() {
        let tokens = tokenize("# Title\n\ntext\n\n\n## Later\n");

        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 3);
        assert_eq!(tokens[2].line, 6);
    }

    #[test]
    fn test_setext_heading() {
        let tokens = tokenize("Title\n=====\n\nbody\n");
        assert_eq!(tokens[0].kind, TokenKind::Heading(1));
        assert_eq!(tokens[0].text, "Title");
    }

    #[test]
    fn test_headings_inside_containers_are_nested() {
        let tokens = tokenize("> # Quoted\n\n- # Listed\n\n# Top\n");

        let headings: Vec<(&str, bool)> = tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Heading(1)))
            .map(|t| (t.text.as_str(), t.nested))
            .collect();
        assert_eq!(
            headings,
            vec![("Quoted", true), ("Listed", true), ("Top", false)]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\n").is_empty());
    }
}
