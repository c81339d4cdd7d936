//! Newick serialization and parsing.
//!
//! The writer emits the standard parenthesized form with branch lengths,
//! quoting any label containing delimiter characters in single quotes (the
//! curated labels contain `|` and `/`, which many downstream tools would
//! otherwise misparse). The parser accepts the same dialect, so a written
//! tree round-trips losslessly.

use crate::core::models::ids::NodeId;
use crate::core::models::label::TaxonLabel;
use crate::core::models::tree::Tree;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewickError {
    #[error("Tree has no root")]
    MissingRoot,

    #[error("Unexpected end of input")]
    UnexpectedEnd,

    #[error("Unexpected character '{found}' at byte {pos}")]
    Unexpected { pos: usize, found: char },

    #[error("Invalid branch length '{text}' at byte {pos}")]
    InvalidNumber { pos: usize, text: String },

    #[error("Trailing data after ';' at byte {pos}")]
    TrailingData { pos: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Serializes the tree to a Newick string, terminated with `;`.
pub fn to_newick(tree: &Tree) -> Result<String, NewickError> {
    let root = tree.root().ok_or(NewickError::MissingRoot)?;
    let mut out = String::new();
    write_node(tree, root, true, &mut out);
    out.push(';');
    Ok(out)
}

/// Writes the Newick form of the tree, with a trailing newline.
pub fn write_tree(tree: &Tree, writer: &mut impl Write) -> Result<(), NewickError> {
    let text = to_newick(tree)?;
    writer.write_all(text.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

fn write_node(tree: &Tree, id: NodeId, is_root: bool, out: &mut String) {
    let node = tree.node(id).expect("id belongs to this tree");
    if !node.is_leaf() {
        out.push('(');
        for (i, &child) in node.children.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_node(tree, child, false, out);
        }
        out.push(')');
    }
    if let Some(label) = &node.label {
        write_label(label.raw(), out);
    }
    if !is_root {
        out.push(':');
        out.push_str(&node.branch_length.to_string());
    }
}

fn write_label(raw: &str, out: &mut String) {
    let safe = raw
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if safe {
        out.push_str(raw);
    } else {
        out.push('\'');
        for c in raw.chars() {
            if c == '\'' {
                out.push('\'');
            }
            out.push(c);
        }
        out.push('\'');
    }
}

/// Parses a Newick string into a rooted [`Tree`].
///
/// Supports quoted labels (with `''` escapes), labeled internal nodes, and
/// branch lengths on any edge; a length on the root is accepted and ignored.
pub fn parse(input: &str) -> Result<Tree, NewickError> {
    let mut parser = Parser {
        bytes: input.as_bytes(),
        pos: 0,
    };
    let mut tree = Tree::new();

    parser.skip_whitespace();
    let root = parser.subtree(&mut tree)?;
    if parser.peek() == Some(b':') {
        parser.pos += 1;
        parser.number()?;
    }
    parser.skip_whitespace();
    match parser.peek() {
        Some(b';') => parser.pos += 1,
        Some(other) => {
            return Err(NewickError::Unexpected {
                pos: parser.pos,
                found: other as char,
            });
        }
        None => return Err(NewickError::UnexpectedEnd),
    }
    parser.skip_whitespace();
    if parser.pos != parser.bytes.len() {
        return Err(NewickError::TrailingData { pos: parser.pos });
    }

    tree.set_root(root).expect("root id was just created");
    Ok(tree)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn subtree(&mut self, tree: &mut Tree) -> Result<NodeId, NewickError> {
        self.skip_whitespace();
        if self.peek() == Some(b'(') {
            self.pos += 1;
            let node = tree.add_internal();
            loop {
                let (child, length) = self.branch(tree)?;
                tree.attach(node, child, length)
                    .expect("freshly parsed child is unattached");
                self.skip_whitespace();
                match self.peek() {
                    Some(b',') => self.pos += 1,
                    Some(b')') => {
                        self.pos += 1;
                        break;
                    }
                    Some(other) => {
                        return Err(NewickError::Unexpected {
                            pos: self.pos,
                            found: other as char,
                        });
                    }
                    None => return Err(NewickError::UnexpectedEnd),
                }
            }
            if let Some(label) = self.label()? {
                tree.node_mut(node).expect("node just created").label =
                    Some(TaxonLabel::new(label));
            }
            Ok(node)
        } else {
            let label = self.label()?.ok_or_else(|| match self.peek() {
                Some(found) => NewickError::Unexpected {
                    pos: self.pos,
                    found: found as char,
                },
                None => NewickError::UnexpectedEnd,
            })?;
            Ok(tree.add_leaf(TaxonLabel::new(label)))
        }
    }

    fn branch(&mut self, tree: &mut Tree) -> Result<(NodeId, f64), NewickError> {
        let node = self.subtree(tree)?;
        self.skip_whitespace();
        let length = if self.peek() == Some(b':') {
            self.pos += 1;
            self.number()?
        } else {
            0.0
        };
        Ok((node, length))
    }

    fn label(&mut self) -> Result<Option<String>, NewickError> {
        self.skip_whitespace();
        if self.peek() == Some(b'\'') {
            self.pos += 1;
            let mut text = String::new();
            loop {
                match self.peek() {
                    Some(b'\'') => {
                        self.pos += 1;
                        // A doubled quote is an escaped quote inside the label.
                        if self.peek() == Some(b'\'') {
                            self.pos += 1;
                            text.push('\'');
                        } else {
                            return Ok(Some(text));
                        }
                    }
                    Some(_) => {
                        let start = self.pos;
                        while self
                            .peek()
                            .is_some_and(|b| b != b'\'')
                        {
                            self.pos += 1;
                        }
                        text.push_str(
                            std::str::from_utf8(&self.bytes[start..self.pos])
                                .expect("input is valid UTF-8"),
                        );
                    }
                    None => return Err(NewickError::UnexpectedEnd),
                }
            }
        } else {
            let start = self.pos;
            while self
                .peek()
                .is_some_and(|b| !matches!(b, b'(' | b')' | b',' | b':' | b';') && !b.is_ascii_whitespace())
            {
                self.pos += 1;
            }
            if start == self.pos {
                return Ok(None);
            }
            Ok(Some(
                std::str::from_utf8(&self.bytes[start..self.pos])
                    .expect("input is valid UTF-8")
                    .to_string(),
            ))
        }
    }

    fn number(&mut self) -> Result<f64, NewickError> {
        self.skip_whitespace();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| matches!(b, b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E'))
        {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).expect("ASCII digits");
        text.parse().map_err(|_| NewickError::InvalidNumber {
            pos: start,
            text: text.to_string(),
        })
    }
}
