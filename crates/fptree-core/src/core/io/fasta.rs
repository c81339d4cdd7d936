//! Reader for aligned FASTA files.
//!
//! The upstream curation pipeline writes headers of the form
//! `>'Cpop|CpYGFP|508/518'`, optionally followed by free-text description.
//! The record id is the quoted token (quotes stripped) or, unquoted, the
//! text up to the first whitespace. Sequence data may wrap over any number
//! of lines.

use crate::core::models::alignment::{Alignment, AlignmentError};
use crate::core::models::label::TaxonLabel;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Line {line}: expected a '>' header before sequence data")]
    MissingHeader { line: usize },

    #[error("Line {line}: header has no identifier")]
    EmptyIdentifier { line: usize },

    #[error("Record '{id}' has no sequence data")]
    EmptyRecord { id: String },

    #[error("Input contains no FASTA records")]
    Empty,

    #[error("Invalid alignment: {0}")]
    Alignment(#[from] AlignmentError),
}

/// Reads an aligned FASTA stream into a validated [`Alignment`].
///
/// # Errors
///
/// Returns a [`FastaError`] on malformed records or when the resulting rows
/// violate the alignment invariants (unequal lengths, duplicate labels).
pub fn read_alignment(reader: &mut impl BufRead) -> Result<Alignment, FastaError> {
    let mut rows: Vec<(TaxonLabel, Vec<u8>)> = Vec::new();
    let mut current: Option<(String, Vec<u8>, usize)> = None;

    for (line_idx, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(header) = trimmed.strip_prefix('>') {
            if let Some(record) = current.take() {
                rows.push(finish_record(record)?);
            }
            let id = parse_identifier(header)
                .ok_or(FastaError::EmptyIdentifier { line: line_num })?;
            current = Some((id, Vec::new(), line_num));
        } else {
            match current.as_mut() {
                Some((_, residues, _)) => {
                    residues.extend(trimmed.bytes().filter(|b| !b.is_ascii_whitespace()));
                }
                None => return Err(FastaError::MissingHeader { line: line_num }),
            }
        }
    }

    if let Some(record) = current.take() {
        rows.push(finish_record(record)?);
    }
    if rows.is_empty() {
        return Err(FastaError::Empty);
    }

    Ok(Alignment::new(rows)?)
}

/// Convenience wrapper opening `path` with a buffered reader.
pub fn read_alignment_from_path(path: impl AsRef<Path>) -> Result<Alignment, FastaError> {
    let file = File::open(path)?;
    read_alignment(&mut BufReader::new(file))
}

fn finish_record(
    (id, residues, _line): (String, Vec<u8>, usize),
) -> Result<(TaxonLabel, Vec<u8>), FastaError> {
    if residues.is_empty() {
        return Err(FastaError::EmptyRecord { id });
    }
    Ok((TaxonLabel::new(id), residues))
}

fn parse_identifier(header: &str) -> Option<String> {
    let header = header.trim_start();
    let id = if let Some(rest) = header.strip_prefix('\'') {
        // Quoted identifier; may contain whitespace.
        rest.split('\'').next()?
    } else {
        header.split_ascii_whitespace().next()?
    };
    if id.is_empty() { None } else { Some(id.to_string()) }
}
