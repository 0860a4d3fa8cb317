//! CSS-like selectors for document queries.
//!
//! Supports:
//! - `"button"` - by tag
//! - `"#modal-1"` - by id
//! - `".modality-portal"` - by class
//! - `"[data-testid='login']"` - by test id
//! - `"[role='dialog']"` - by attribute
//! - `"section button"` - descendant combinator
//! - `"section > header"` - child combinator

use modality_core::{Document, NodeId};
use thiserror::Error;

/// Parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Match by tag name
    Type(String),
    /// Match by `id` attribute
    Id(String),
    /// Match by `data-testid`
    TestId(String),
    /// Match by class
    Class(String),
    /// Match by attribute value
    Attribute {
        /// Attribute name
        name: String,
        /// Expected value
        value: String,
    },
    /// `ancestor descendant`
    Descendant(Box<Selector>, Box<Selector>),
    /// `parent > child`
    Child(Box<Selector>, Box<Selector>),
}

impl Selector {
    /// Parse a selector string.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector is invalid.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        SelectorParser::new(input).parse()
    }

    /// Check if `node` matches.
    #[must_use]
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        match self {
            Self::Type(tag) => doc.tag(node) == Some(tag.as_str()),
            Self::Id(id) => doc.attribute(node, "id") == Some(id.as_str()),
            Self::TestId(id) => doc.attribute(node, "data-testid") == Some(id.as_str()),
            Self::Class(class) => doc
                .attribute(node, "class")
                .is_some_and(|c| c.split_whitespace().any(|c| c == class)),
            Self::Attribute { name, value } => doc.attribute(node, name) == Some(value.as_str()),
            Self::Descendant(ancestor, inner) => {
                inner.matches(doc, node)
                    && doc
                        .ancestors(node)
                        .into_iter()
                        .any(|a| ancestor.matches(doc, a))
            }
            Self::Child(parent, inner) => {
                inner.matches(doc, node)
                    && doc.parent(node).is_some_and(|p| parent.matches(doc, p))
            }
        }
    }

    /// First connected element matching, in document order.
    #[must_use]
    pub fn query(&self, doc: &Document) -> Option<NodeId> {
        doc.descendants(doc.root())
            .into_iter()
            .find(|&n| self.matches(doc, n))
    }

    /// All connected elements matching, in document order.
    #[must_use]
    pub fn query_all(&self, doc: &Document) -> Vec<NodeId> {
        doc.descendants(doc.root())
            .into_iter()
            .filter(|&n| self.matches(doc, n))
            .collect()
    }
}

/// Selector parser.
pub struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    /// Create a new parser.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse the selector.
    pub fn parse(&mut self) -> Result<Selector, SelectorError> {
        self.skip_whitespace();
        if self.peek_char().is_none() {
            return Err(SelectorError::Empty);
        }

        let mut selector = self.parse_simple()?;
        loop {
            let had_space = self.skip_whitespace();
            match self.peek_char() {
                None => return Ok(selector),
                Some('>') => {
                    self.advance();
                    self.skip_whitespace();
                    let child = self.parse_simple()?;
                    selector = Selector::Child(Box::new(selector), Box::new(child));
                }
                Some(_) if had_space => {
                    let inner = self.parse_simple()?;
                    selector = Selector::Descendant(Box::new(selector), Box::new(inner));
                }
                Some(c) => return Err(SelectorError::UnexpectedChar(c)),
            }
        }
    }

    fn parse_simple(&mut self) -> Result<Selector, SelectorError> {
        let first = self.peek_char().ok_or(SelectorError::Empty)?;

        match first {
            '#' => {
                self.advance();
                Ok(Selector::Id(self.read_identifier()?))
            }
            '.' => {
                self.advance();
                Ok(Selector::Class(self.read_identifier()?))
            }
            '[' => self.parse_attribute(),
            _ if first.is_alphabetic() => Ok(Selector::Type(self.read_identifier()?)),
            _ => Err(SelectorError::UnexpectedChar(first)),
        }
    }

    fn parse_attribute(&mut self) -> Result<Selector, SelectorError> {
        self.advance(); // '['

        let name = self.read_until_any(&['=', ']']).trim().to_string();
        if name.is_empty() || self.peek_char() != Some('=') {
            return Err(SelectorError::InvalidAttribute);
        }
        self.advance(); // '='

        let quote = self.peek_char().filter(|c| *c == '\'' || *c == '"');
        if quote.is_some() {
            self.advance();
        }
        let value = match quote {
            Some(q) => self.read_until_any(&[q]),
            None => self.read_until_any(&[']']),
        };
        if quote.is_some() {
            if self.peek_char() != quote {
                return Err(SelectorError::UnclosedAttribute);
            }
            self.advance();
        }

        if self.peek_char() != Some(']') {
            return Err(SelectorError::UnclosedAttribute);
        }
        self.advance();

        if name == "data-testid" {
            Ok(Selector::TestId(value))
        } else {
            Ok(Selector::Attribute { name, value })
        }
    }

    fn read_identifier(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(SelectorError::ExpectedIdentifier);
        }

        Ok(self.input[start..self.pos].to_string())
    }

    fn read_until_any(&mut self, stops: &[char]) -> String {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if stops.contains(&c) {
                break;
            }
            self.advance();
        }
        self.input[start..self.pos].to_string()
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
        self.pos != start
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }
}

/// Selector parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// Empty selector
    #[error("empty selector")]
    Empty,
    /// Unexpected character
    #[error("unexpected character: '{0}'")]
    UnexpectedChar(char),
    /// Expected identifier
    #[error("expected identifier")]
    ExpectedIdentifier,
    /// Invalid attribute syntax
    #[error("invalid attribute syntax")]
    InvalidAttribute,
    /// Unclosed attribute bracket
    #[error("unclosed attribute bracket")]
    UnclosedAttribute,
}
