use log::{debug, warn};
use std::{mem, str::FromStr};

use super::{
    document::Document,
    error::{FormatError, FormatErrorKind},
};

const COMMENT: char = '#';
const SPLITTER: char = '=';
const SECTION_START: char = '[';
const SECTION_END: char = ']';
const BOM: char = '\u{feff}';

/// Parses credentials-file text into a [`Document`].
///
/// Comment and blank lines are attached to the header or key that follows
/// them. Any left over at the end of the input precede nothing and are
/// dropped.
pub fn parse(text: &str) -> Result<Document, FormatError> {
    Parser::new(text).into_document()
}

impl FromStr for Document {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Represents an on-going parse.
struct Parser<'a> {
    lines: std::str::Lines<'a>,
    line: usize,
    document: Document,
    pending: Vec<String>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.strip_prefix(BOM).unwrap_or(text).lines(),
            line: 0,
            document: Document::new(),
            pending: Vec::new(),
        }
    }

    fn into_document(mut self) -> Result<Document, FormatError> {
        while let Some(raw) = self.lines.next() {
            self.line += 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with(COMMENT) {
                self.pending.push(line.to_string());
            } else if line.starts_with(SECTION_START) {
                self.parse_section(line)?;
            } else {
                self.parse_entry(line)?;
            }
        }

        let dropped = comment_count(&self.pending);
        if dropped > 0 {
            warn!("dropping {dropped} comment line(s) after the last key");
        }
        debug!(
            "parsed {} line(s) into {} section(s)",
            self.line,
            self.document.len()
        );
        Ok(self.document)
    }

    fn parse_section(&mut self, line: &str) -> Result<(), FormatError> {
        let name = line[SECTION_START.len_utf8()..]
            .strip_suffix(SECTION_END)
            .ok_or_else(|| self.error(FormatErrorKind::UnterminatedSection, line))?;

        let comments = mem::take(&mut self.pending);
        if !self.document.push_section(name, comments) {
            return Err(self.error(FormatErrorKind::DuplicateSection, line));
        }
        Ok(())
    }

    fn parse_entry(&mut self, line: &str) -> Result<(), FormatError> {
        let (key, value) = line
            .split_once(SPLITTER)
            .map(|(key, value)| (key.trim(), value.trim()))
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| self.error(FormatErrorKind::MissingSplitter, line))?;

        let line_no = self.line;
        let section = self
            .document
            .last_section_mut()
            .ok_or_else(|| FormatError::new(FormatErrorKind::KeyBeforeSection, line_no, line))?;

        if !section.push_entry(key, value, mem::take(&mut self.pending)) {
            return Err(FormatError::new(FormatErrorKind::DuplicateKey, line_no, line));
        }
        Ok(())
    }

    fn error(&self, kind: FormatErrorKind, line: &str) -> FormatError {
        FormatError::new(kind, self.line, line)
    }
}

/// Non-blank lines in a pending block.
fn comment_count(pending: &[String]) -> usize {
    pending.iter().filter(|l| !l.is_empty()).count()
}
