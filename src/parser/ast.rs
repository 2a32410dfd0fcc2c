//! Document Outline
//!
//! Minimal types for the structure of a parsed article: a title and a flat
//! list of sections holding opaque text blocks.

use serde::Serialize;

use crate::parser::lexer::{Token, TokenKind};

/// Kind of a text block inside a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph,
    ListItem,
    CodeBlock,
    BlockQuote,
}

/// A paragraph, list item, code block or quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

/// A heading and the blocks that follow it up to the next heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Heading text, empty for the lead section
    pub heading: String,
    /// Heading level (1-6), 0 for the lead section
    pub level: u8,
    /// 1-based line of the heading
    pub line: usize,
    /// Heading sits inside a block quote or list item
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub nested: bool,
    pub blocks: Vec<Block>,
}

impl Section {
    fn lead() -> Self {
        Self {
            heading: String::new(),
            level: 0,
            line: 1,
            nested: false,
            blocks: Vec::new(),
        }
    }

    /// True for the untitled section holding text before the first heading
    pub fn is_lead(&self) -> bool {
        self.level == 0
    }
}

/// Parsed structure of a whole document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    /// Text of the first non-empty top-level `#` heading, if any
    pub title: Option<String>,
    pub sections: Vec<Section>,
}

/// Fold block tokens into an outline
///
/// The first non-empty level-1 heading outside quotes and lists becomes the
/// title and does not open a section. Every other heading opens a new flat
/// section.
pub fn tokens_to_outline(tokens: Vec<Token>) -> Outline {
    let mut title = None;
    let mut sections = Vec::new();
    let mut current = Section::lead();

    for token in tokens {
        let kind = match token.kind {
            TokenKind::Heading(1) if title.is_none() && is_title(&token) => {
                title = Some(token.text);
                continue;
            }
            TokenKind::Heading(level) => {
                let next = Section {
                    heading: token.text,
                    level,
                    line: token.line,
                    nested: token.nested,
                    blocks: Vec::new(),
                };
                push_section(&mut sections, std::mem::replace(&mut current, next));
                continue;
            }
            TokenKind::Paragraph => BlockKind::Paragraph,
            TokenKind::ListItem => BlockKind::ListItem,
            TokenKind::CodeBlock => BlockKind::CodeBlock,
            TokenKind::BlockQuote => BlockKind::BlockQuote,
        };

        current.blocks.push(Block {
            kind,
            text: token.text,
        });
    }

    push_section(&mut sections, current);

    Outline { title, sections }
}

fn is_title(token: &Token) -> bool {
    !token.nested && !token.text.is_empty()
}

fn push_section(sections: &mut Vec<Section>, section: Section) {
    if section.is_lead() && section.blocks.is_empty() {
        return;
    }
    sections.push(section);
}
