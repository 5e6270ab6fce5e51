//! Reading the operation type (`natOp`) out of an NF-e document.
//!
//! The value sits at `NFe/infNFe/ide/natOp`, or one level deeper when the
//! invoice is wrapped in its authorization envelope (`nfeProc`). Element
//! names are matched by local name so namespace prefixes do not matter.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

const BARE_PATH: &[&[u8]] = &[b"NFe", b"infNFe", b"ide", b"natOp"];
const ENVELOPED_PATH: &[&[u8]] = &[b"nfeProc", b"NFe", b"infNFe", b"ide", b"natOp"];

#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("{0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("document has no root element")]
    Empty,

    #[error("unexpected end of document inside <{0}>")]
    Unclosed(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Classification of the document at `path`.
///
/// # Errors
///
/// See [`read_classification`]; also fails if the file cannot be opened.
pub fn classification_of(path: &Path) -> Result<Option<String>, ClassificationError> {
    read_classification(BufReader::new(File::open(path)?))
}

/// Trimmed `natOp` text, or `None` when absent or blank.
///
/// # Errors
///
/// Returns a [`ClassificationError`] for malformed XML, non-UTF-8 text, or a
/// document without a root element.
pub fn read_classification<R: BufRead>(input: R) -> Result<Option<String>, ClassificationError> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut capture: Option<String> = None;
    let mut saw_root = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                saw_root = true;
                stack.push(start.local_name().as_ref().to_vec());
                if is_classification(&stack) {
                    capture = Some(String::new());
                }
            }
            Event::Empty(_) => saw_root = true,
            Event::Text(text) => {
                if let Some(value) = capture.as_mut() {
                    value.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(value) = capture.as_mut() {
                    value.push_str(std::str::from_utf8(&data)?);
                }
            }
            Event::End(_) => {
                if is_classification(&stack)
                    && let Some(value) = capture.take()
                {
                    let value = value.trim();
                    if !value.is_empty() {
                        return Ok(Some(value.to_string()));
                    }
                }
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ClassificationError::Unclosed(
            String::from_utf8_lossy(open).into_owned(),
        ));
    }
    if !saw_root {
        return Err(ClassificationError::Empty);
    }
    Ok(None)
}

fn is_classification(stack: &[Vec<u8>]) -> bool {
    [BARE_PATH, ENVELOPED_PATH].iter().any(|path| {
        path.len() == stack.len()
            && path
                .iter()
                .zip(stack)
                .all(|(expected, actual)| *expected == actual.as_slice())
    })
}
